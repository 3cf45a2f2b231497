//! Column auto-mapping and per-row validation for bulk import.
//!
//! Source headers rarely match our field keys exactly, so mapping runs in
//! two passes: exact normalized match, then a small synonym table.

use std::collections::HashMap;

use serde::Serialize;

use crate::infrastructure::imports::table::normalize_header;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Url,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub key: &'static str,
    pub required: bool,
    pub max_length: usize,
    pub kind: FieldKind,
}

pub const CONTACT_FIELDS: &[FieldSpec] = &[
    FieldSpec { key: "companyname", required: true, max_length: 200, kind: FieldKind::Text },
    FieldSpec { key: "name", required: true, max_length: 100, kind: FieldKind::Text },
    FieldSpec { key: "email", required: true, max_length: 200, kind: FieldKind::Email },
    FieldSpec { key: "roletitle", required: false, max_length: 100, kind: FieldKind::Text },
    FieldSpec { key: "linkedinurl", required: false, max_length: 300, kind: FieldKind::Url },
    FieldSpec { key: "notes", required: false, max_length: 2000, kind: FieldKind::Text },
];

pub const COMPANY_FIELDS: &[FieldSpec] = &[
    FieldSpec { key: "name", required: true, max_length: 200, kind: FieldKind::Text },
    FieldSpec { key: "website", required: false, max_length: 300, kind: FieldKind::Url },
    FieldSpec { key: "careersurl", required: false, max_length: 300, kind: FieldKind::Url },
    FieldSpec { key: "country", required: false, max_length: 100, kind: FieldKind::Text },
    FieldSpec { key: "notes", required: false, max_length: 5000, kind: FieldKind::Text },
];

/// Synonyms are stored normalized (lowercase, separators stripped).
const SYNONYMS: &[(&str, &[&str])] = &[
    ("companyname", &["company", "organization", "organisation", "employer"]),
    ("name", &["fullname", "contactname", "contact", "person"]),
    ("email", &["emailaddress", "mail", "contactemail"]),
    ("roletitle", &["title", "role", "jobtitle", "position", "designation"]),
    ("linkedinurl", &["linkedin", "linkedinprofile", "profileurl"]),
    ("notes", &["note", "comments", "comment", "remarks"]),
    ("website", &["url", "site", "homepage", "web"]),
    ("careersurl", &["careers", "careerspage", "careerssite", "jobspage"]),
    ("country", &["location", "region"]),
];

#[derive(Debug, Clone, Serialize)]
pub struct RowError {
    /// 1-based data row number; the header row counts, so the first data
    /// row is 2 to match what the user sees in a spreadsheet.
    pub row: usize,
    pub field: Option<String>,
    pub message: String,
}

/// Map normalized source headers to expected field keys. Headers that
/// match nothing are left out; the caller keeps their values untouched.
pub fn auto_map_columns(headers: &[String], fields: &[FieldSpec]) -> HashMap<String, String> {
    let mut mapping = HashMap::new();

    for header in headers {
        if fields.iter().any(|f| f.key == header) {
            mapping.insert(header.clone(), header.clone());
            continue;
        }

        let matched = SYNONYMS.iter().find(|(key, alternates)| {
            fields.iter().any(|f| f.key == *key) && alternates.contains(&header.as_str())
        });
        if let Some((key, _)) = matched {
            // First source column wins when two map to the same field.
            if !mapping.values().any(|v| v == key) {
                mapping.insert(header.clone(), key.to_string());
            }
        }
    }

    mapping
}

/// Rename row keys through a mapping (auto-derived or user-supplied).
/// Unmapped keys pass through unchanged.
pub fn apply_mapping(
    row: &HashMap<String, String>,
    mapping: &HashMap<String, String>,
) -> HashMap<String, String> {
    row.iter()
        .map(|(key, value)| {
            let mapped = mapping.get(key).cloned().unwrap_or_else(|| key.clone());
            (mapped, value.clone())
        })
        .collect()
}

/// Normalize the keys of a user-supplied column mapping so it can be
/// applied to normalized rows.
pub fn normalize_mapping(mapping: &HashMap<String, String>) -> HashMap<String, String> {
    mapping
        .iter()
        .map(|(source, field)| (normalize_header(source), normalize_header(field)))
        .collect()
}

pub fn validate_row(
    row: &HashMap<String, String>,
    fields: &[FieldSpec],
    row_number: usize,
) -> Vec<RowError> {
    let mut errors = Vec::new();

    for field in fields {
        let value = row.get(field.key).map(|v| v.trim()).unwrap_or("");

        if field.required && value.is_empty() {
            errors.push(RowError {
                row: row_number,
                field: Some(field.key.to_string()),
                message: format!("{} is required", field.key),
            });
            continue;
        }

        if value.is_empty() {
            continue;
        }

        if value.len() > field.max_length {
            errors.push(RowError {
                row: row_number,
                field: Some(field.key.to_string()),
                message: format!("{} exceeds maximum length of {}", field.key, field.max_length),
            });
        }

        match field.kind {
            FieldKind::Email if !is_valid_email(value) => {
                errors.push(RowError {
                    row: row_number,
                    field: Some(field.key.to_string()),
                    message: "Invalid email format".to_string(),
                });
            }
            FieldKind::Url if !is_valid_url(value) => {
                errors.push(RowError {
                    row: row_number,
                    field: Some(field.key.to_string()),
                    message: "Invalid URL".to_string(),
                });
            }
            _ => {}
        }
    }

    errors
}

pub fn is_valid_email(email: &str) -> bool {
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty() && !domain.is_empty() && !email.contains(char::is_whitespace)
        }
        _ => false,
    }
}

/// Loose by intent: spreadsheet URLs often come without a scheme.
pub fn is_valid_url(url: &str) -> bool {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return true;
    }

    let candidate = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    url::Url::parse(&candidate).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn exact_keys_map_to_themselves() {
        let mapping = auto_map_columns(&headers(&["name", "email"]), CONTACT_FIELDS);
        assert_eq!(mapping["name"], "name");
        assert_eq!(mapping["email"], "email");
    }

    #[test]
    fn synonyms_map_to_field_keys() {
        let mapping = auto_map_columns(
            &headers(&["company", "fullname", "jobtitle", "linkedin"]),
            CONTACT_FIELDS,
        );
        assert_eq!(mapping["company"], "companyname");
        assert_eq!(mapping["fullname"], "name");
        assert_eq!(mapping["jobtitle"], "roletitle");
        assert_eq!(mapping["linkedin"], "linkedinurl");
    }

    #[test]
    fn unknown_headers_stay_unmapped() {
        let mapping = auto_map_columns(&headers(&["favoritecolor"]), CONTACT_FIELDS);
        assert!(mapping.is_empty());
    }

    #[test]
    fn first_column_wins_on_synonym_collision() {
        let mapping = auto_map_columns(&headers(&["company", "employer"]), CONTACT_FIELDS);
        assert_eq!(mapping["company"], "companyname");
        assert!(!mapping.contains_key("employer"));
    }

    #[test]
    fn required_fields_are_enforced() {
        let row: HashMap<String, String> =
            [("name".to_string(), "Grace".to_string())].into_iter().collect();

        let errors = validate_row(&row, CONTACT_FIELDS, 2);
        let missing: Vec<_> = errors.iter().filter_map(|e| e.field.as_deref()).collect();
        assert!(missing.contains(&"companyname"));
        assert!(missing.contains(&"email"));
    }

    #[test]
    fn invalid_email_is_reported_with_row_number() {
        let row: HashMap<String, String> = [
            ("companyname".to_string(), "Initech".to_string()),
            ("name".to_string(), "Grace".to_string()),
            ("email".to_string(), "not an email".to_string()),
        ]
        .into_iter()
        .collect();

        let errors = validate_row(&row, CONTACT_FIELDS, 4);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].row, 4);
        assert_eq!(errors[0].field.as_deref(), Some("email"));
    }

    #[test]
    fn urls_without_scheme_are_accepted() {
        assert!(is_valid_url("linkedin.com/in/grace"));
        assert!(is_valid_url("https://linkedin.com/in/grace"));
        assert!(!is_valid_url("ht tp://bad"));
    }

    #[test]
    fn apply_mapping_renames_only_mapped_keys() {
        let row: HashMap<String, String> = [
            ("company".to_string(), "Initech".to_string()),
            ("extra".to_string(), "kept".to_string()),
        ]
        .into_iter()
        .collect();
        let mapping: HashMap<String, String> =
            [("company".to_string(), "companyname".to_string())].into_iter().collect();

        let mapped = apply_mapping(&row, &mapping);
        assert_eq!(mapped["companyname"], "Initech");
        assert_eq!(mapped["extra"], "kept");
    }
}
