//! `{{variable}}` placeholder extraction and substitution for outreach
//! templates.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

static VAR_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\{([^{}]+)\}\}").expect("valid regex"));

/// All distinct placeholder names in order of first appearance.
/// Names are trimmed, so `{{ name }}` and `{{name}}` are the same variable.
pub fn extract_variables(template: &str) -> Vec<String> {
    let mut variables = Vec::new();
    for capture in VAR_PATTERN.captures_iter(template) {
        let name = capture[1].trim().to_string();
        if !name.is_empty() && !variables.contains(&name) {
            variables.push(name);
        }
    }
    variables
}

/// Replace every known placeholder with its value. Unknown or blank
/// variables keep the original `{{name}}` token so the gap stays visible.
pub fn replace_variables(template: &str, values: &HashMap<String, String>) -> String {
    VAR_PATTERN
        .replace_all(template, |capture: &regex::Captures<'_>| {
            let name = capture[1].trim();
            match values.get(name) {
                Some(value) if !value.trim().is_empty() => value.clone(),
                _ => format!("{{{{{}}}}}", name),
            }
        })
        .to_string()
}

/// Variables present in the template but missing (or blank) in the map.
pub fn unfilled_variables(template: &str, values: &HashMap<String, String>) -> Vec<String> {
    extract_variables(template)
        .into_iter()
        .filter(|name| values.get(name).map_or(true, |v| v.trim().is_empty()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn extraction_dedupes_and_preserves_order() {
        let template = "Hi {{name}}, I saw {{company}} is hiring. Best, {{name}}";
        assert_eq!(extract_variables(template), vec!["name", "company"]);
    }

    #[test]
    fn extraction_trims_whitespace() {
        assert_eq!(extract_variables("{{ name }} at {{company }}"), vec!["name", "company"]);
    }

    #[test]
    fn unknown_variables_keep_their_token() {
        let out = replace_variables("Hi {{name}} at {{company}}", &values(&[("name", "Grace")]));
        assert_eq!(out, "Hi Grace at {{company}}");
    }

    #[test]
    fn full_map_leaves_no_tokens() {
        let template = "Hi {{name}}, {{company}} looks great.";
        let map = values(&[("name", "Grace"), ("company", "Initech")]);

        let out = replace_variables(template, &map);
        assert!(!out.contains("{{"));
        assert!(unfilled_variables(template, &map).is_empty());
    }

    #[test]
    fn blank_values_count_as_unfilled() {
        let template = "Hi {{name}}";
        let map = values(&[("name", "  ")]);

        assert_eq!(unfilled_variables(template, &map), vec!["name"]);
        assert_eq!(replace_variables(template, &map), "Hi {{name}}");
    }

    #[test]
    fn missing_variables_are_reported() {
        let template = "{{a}} {{b}} {{c}}";
        let map = values(&[("b", "filled")]);
        assert_eq!(unfilled_variables(template, &map), vec!["a", "c"]);
    }
}
