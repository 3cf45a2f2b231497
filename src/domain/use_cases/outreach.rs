use std::collections::HashMap;

use chrono::Utc;
use validator::Validate;

use crate::{
    ai::draft::{build_draft_prompt, split_subject_body, DraftClient, DraftContext},
    constants::MAX_FOLLOW_UPS,
    entities::{
        outreach::{
            Company, Contact, DraftEmailRequest, ImportReport, ListCompaniesQuery,
            ListContactsQuery, ListOutreachEmailsQuery, MarkRepliedRequest, NewCompanyRequest,
            NewContactRequest, NewOutreachEmailRequest, NewTemplateRequest, OutreachDraft,
            OutreachDraftInsert, OutreachEmail, OutreachEmailInsert, OutreachStats,
            RenderTemplateRequest, RenderedTemplate, ScheduleFollowUpRequest, Template,
            TemplateKind, TemplateRow, UpdateCompanyRequest, UpdateContactRequest,
            UpdateTemplateRequest,
        },
        Paginated,
    },
    errors::AppError,
    imports::{
        mapping::{
            apply_mapping, auto_map_columns, normalize_mapping, validate_row, FieldSpec,
            RowError, COMPANY_FIELDS, CONTACT_FIELDS,
        },
        table::parse_table,
    },
    repositories::outreach::OutreachRepository,
    use_cases::page_params,
    utils::{
        template_vars::{extract_variables, replace_variables, unfilled_variables},
        valid_uuid::valid_uuid,
    },
};

const PREVIEW_ROWS: usize = 5;
const DRAFT_PROJECTS: i64 = 3;
const DRAFT_LIST_LIMIT: i64 = 50;

pub struct OutreachHandler<R>
where
    R: OutreachRepository,
{
    pub repo: R,
    pub ai: Option<DraftClient>,
    pub sender_name: String,
    pub sender_bio: String,
}

impl<R> OutreachHandler<R>
where
    R: OutreachRepository,
{
    pub fn new(repo: R, ai: Option<DraftClient>, sender_name: String, sender_bio: String) -> Self {
        OutreachHandler {
            repo,
            ai,
            sender_name,
            sender_bio,
        }
    }

    // ───── Companies ─────────────────────────────────────────────────

    pub async fn create_company(&self, request: NewCompanyRequest) -> Result<Company, AppError> {
        request.validate()?;
        self.repo.create_company(&request).await
    }

    pub async fn get_company(&self, id: &str) -> Result<Company, AppError> {
        let id = valid_uuid(id)?;
        self.repo.get_company(&id).await.map_err(company_not_found)
    }

    pub async fn list_companies(
        &self,
        query: &ListCompaniesQuery,
    ) -> Result<Paginated<Company>, AppError> {
        let (page, per_page) = page_params(query.page, query.per_page);
        let (companies, total) = self.repo.list_companies(query, page, per_page).await?;

        Ok(Paginated {
            items: companies,
            total,
            page,
            per_page,
        })
    }

    pub async fn update_company(
        &self,
        id: &str,
        patch: UpdateCompanyRequest,
    ) -> Result<Company, AppError> {
        patch.validate()?;
        let id = valid_uuid(id)?;
        self.repo
            .update_company(&id, &patch)
            .await
            .map_err(company_not_found)
    }

    pub async fn star_company(&self, id: &str, starred: bool) -> Result<Company, AppError> {
        let id = valid_uuid(id)?;
        self.repo
            .set_company_starred(&id, starred)
            .await
            .map_err(company_not_found)
    }

    pub async fn archive_company(&self, id: &str, archived: bool) -> Result<Company, AppError> {
        let id = valid_uuid(id)?;
        self.repo
            .set_company_archived(&id, archived)
            .await
            .map_err(company_not_found)
    }

    pub async fn delete_company(&self, id: &str) -> Result<(), AppError> {
        let id = valid_uuid(id)?;
        self.repo.delete_company(&id).await
    }

    // ───── Contacts ──────────────────────────────────────────────────

    pub async fn create_contact(&self, request: NewContactRequest) -> Result<Contact, AppError> {
        request.validate()?;
        self.repo.create_contact(&request).await
    }

    pub async fn get_contact(&self, id: &str) -> Result<Contact, AppError> {
        let id = valid_uuid(id)?;
        self.repo.get_contact(&id).await.map_err(contact_not_found)
    }

    pub async fn list_contacts(
        &self,
        query: &ListContactsQuery,
    ) -> Result<Paginated<Contact>, AppError> {
        let (page, per_page) = page_params(query.page, query.per_page);
        let (contacts, total) = self.repo.list_contacts(query, page, per_page).await?;

        Ok(Paginated {
            items: contacts,
            total,
            page,
            per_page,
        })
    }

    pub async fn update_contact(
        &self,
        id: &str,
        patch: UpdateContactRequest,
    ) -> Result<Contact, AppError> {
        patch.validate()?;
        let id = valid_uuid(id)?;
        self.repo
            .update_contact(&id, &patch)
            .await
            .map_err(contact_not_found)
    }

    pub async fn star_contact(&self, id: &str, starred: bool) -> Result<Contact, AppError> {
        let id = valid_uuid(id)?;
        self.repo
            .set_contact_starred(&id, starred)
            .await
            .map_err(contact_not_found)
    }

    pub async fn delete_contact(&self, id: &str) -> Result<(), AppError> {
        let id = valid_uuid(id)?;
        self.repo.delete_contact(&id).await
    }

    // ───── Templates ─────────────────────────────────────────────────

    pub async fn create_template(&self, request: NewTemplateRequest) -> Result<Template, AppError> {
        request.validate()?;
        let row = self.repo.create_template(&request).await?;
        Ok(to_template(row))
    }

    pub async fn get_template(&self, id: &str) -> Result<Template, AppError> {
        let id = valid_uuid(id)?;
        let row = self
            .repo
            .get_template(&id)
            .await
            .map_err(template_not_found)?;
        Ok(to_template(row))
    }

    pub async fn list_templates(&self) -> Result<Vec<Template>, AppError> {
        let rows = self.repo.list_templates().await?;
        Ok(rows.into_iter().map(to_template).collect())
    }

    pub async fn update_template(
        &self,
        id: &str,
        patch: UpdateTemplateRequest,
    ) -> Result<Template, AppError> {
        patch.validate()?;
        let id = valid_uuid(id)?;
        let row = self
            .repo
            .update_template(&id, &patch)
            .await
            .map_err(template_not_found)?;
        Ok(to_template(row))
    }

    pub async fn delete_template(&self, id: &str) -> Result<(), AppError> {
        let id = valid_uuid(id)?;
        self.repo.delete_template(&id).await
    }

    /// Fill a template's placeholders from the contact and its company,
    /// with request overrides taking precedence. Unfilled variables are
    /// reported so the caller can show gaps instead of sending them.
    pub async fn render_template(
        &self,
        template_id: &str,
        request: RenderTemplateRequest,
    ) -> Result<RenderedTemplate, AppError> {
        let template_id = valid_uuid(template_id)?;
        let template = self
            .repo
            .get_template(&template_id)
            .await
            .map_err(template_not_found)?;

        let contact = self
            .repo
            .get_contact(&request.contact_id)
            .await
            .map_err(contact_not_found)?;
        let company = self
            .repo
            .get_company(&contact.company_id)
            .await
            .map_err(company_not_found)?;

        let mut values = variable_map(&contact, &company);
        for (key, value) in request.overrides {
            values.insert(key, value);
        }

        let subject = replace_variables(&template.subject, &values);
        let body = replace_variables(&template.body, &values);

        let mut unfilled = unfilled_variables(&template.subject, &values);
        for name in unfilled_variables(&template.body, &values) {
            if !unfilled.contains(&name) {
                unfilled.push(name);
            }
        }

        Ok(RenderedTemplate {
            subject,
            body,
            unfilled,
        })
    }

    // ───── Emails ────────────────────────────────────────────────────

    /// Record an email the user already sent from their own client. The
    /// company is resolved through the contact.
    pub async fn log_email(
        &self,
        request: NewOutreachEmailRequest,
    ) -> Result<OutreachEmail, AppError> {
        request.validate()?;

        let contact = self
            .repo
            .get_contact(&request.contact_id)
            .await
            .map_err(contact_not_found)?;

        let insert = OutreachEmailInsert {
            contact_id: contact.id,
            company_id: contact.company_id,
            template_id: request.template_id,
            subject: request.subject,
            body: request.body,
            sent_at: request.sent_at.unwrap_or_else(Utc::now),
            follow_up_date: request.follow_up_date,
        };

        self.repo.create_email(&insert).await
    }

    pub async fn get_email(&self, id: &str) -> Result<OutreachEmail, AppError> {
        let id = valid_uuid(id)?;
        self.repo.get_email(&id).await.map_err(email_not_found)
    }

    pub async fn list_emails(
        &self,
        query: &ListOutreachEmailsQuery,
    ) -> Result<Paginated<OutreachEmail>, AppError> {
        let (page, per_page) = page_params(query.page, query.per_page);
        let (emails, total) = self.repo.list_emails(query, page, per_page).await?;

        Ok(Paginated {
            items: emails,
            total,
            page,
            per_page,
        })
    }

    pub async fn mark_replied(
        &self,
        id: &str,
        request: MarkRepliedRequest,
    ) -> Result<OutreachEmail, AppError> {
        request.validate()?;
        let id = valid_uuid(id)?;

        self.repo
            .mark_replied(
                &id,
                request.outcome,
                request.reply_note.as_deref(),
                request.reply_received_at.unwrap_or_else(Utc::now),
            )
            .await
            .map_err(email_not_found)
    }

    pub async fn close_email(&self, id: &str) -> Result<OutreachEmail, AppError> {
        let id = valid_uuid(id)?;
        self.repo.close_email(&id).await.map_err(email_not_found)
    }

    /// Each email allows a bounded number of follow-ups.
    pub async fn schedule_follow_up(
        &self,
        id: &str,
        request: ScheduleFollowUpRequest,
    ) -> Result<OutreachEmail, AppError> {
        let id = valid_uuid(id)?;

        let email = self.repo.get_email(&id).await.map_err(email_not_found)?;
        if email.follow_up_count >= MAX_FOLLOW_UPS {
            return Err(AppError::Conflict("Follow-up limit reached".to_string()));
        }

        // The UPDATE re-checks the cap, so a concurrent scheduler loses here.
        self.repo
            .schedule_follow_up(&id, request.follow_up_date)
            .await
            .map_err(|e| match e {
                AppError::NotFound(_) => AppError::Conflict("Follow-up limit reached".to_string()),
                other => other,
            })
    }

    pub async fn due_follow_ups(&self) -> Result<Vec<OutreachEmail>, AppError> {
        self.repo.list_due_follow_ups().await
    }

    pub async fn delete_email(&self, id: &str) -> Result<(), AppError> {
        let id = valid_uuid(id)?;
        self.repo.delete_email(&id).await
    }

    pub async fn stats(&self) -> Result<OutreachStats, AppError> {
        self.repo.stats().await
    }

    // ───── Bulk import ───────────────────────────────────────────────

    pub async fn import_contacts(
        &self,
        data: &[u8],
        mapping_override: Option<&HashMap<String, String>>,
        preview: bool,
    ) -> Result<ImportReport, AppError> {
        let (table, mapping) = prepare_import(data, mapping_override, CONTACT_FIELDS)?;

        let mut report = ImportReport {
            mapping: mapping.clone(),
            total_rows: table.rows.len(),
            imported: 0,
            updated: 0,
            skipped: 0,
            errors: Vec::new(),
            preview_rows: None,
        };

        if preview {
            let rows = table
                .rows
                .iter()
                .take(PREVIEW_ROWS)
                .map(|row| apply_mapping(row, &mapping))
                .collect();
            report.preview_rows = Some(rows);

            for (index, row) in table.rows.iter().enumerate() {
                let mapped = apply_mapping(row, &mapping);
                report.errors.extend(validate_row(&mapped, CONTACT_FIELDS, index + 2));
            }
            return Ok(report);
        }

        for (index, row) in table.rows.iter().enumerate() {
            let row_number = index + 2;
            let mapped = apply_mapping(row, &mapping);

            let errors = validate_row(&mapped, CONTACT_FIELDS, row_number);
            if !errors.is_empty() {
                report.errors.extend(errors);
                report.skipped += 1;
                continue;
            }

            let company_name = mapped.get("companyname").map(String::as_str).unwrap_or("");
            let Some(company) = self.repo.find_company_by_name(company_name).await? else {
                report.errors.push(RowError {
                    row: row_number,
                    field: Some("companyname".to_string()),
                    message: format!("Unknown company: {}", company_name),
                });
                report.skipped += 1;
                continue;
            };

            let email = mapped.get("email").map(String::as_str).unwrap_or("");
            match self.repo.find_contact_by_email(email).await? {
                Some(existing) => {
                    // Existing contacts only gain fields they were missing.
                    self.repo
                        .merge_contact_missing_fields(
                            &existing.id,
                            non_empty(&mapped, "roletitle"),
                            non_empty(&mapped, "linkedinurl"),
                            non_empty(&mapped, "notes"),
                        )
                        .await?;
                    report.updated += 1;
                }
                None => {
                    let request = NewContactRequest {
                        company_id: company.id,
                        name: mapped.get("name").cloned().unwrap_or_default(),
                        email: email.to_string(),
                        role_title: non_empty(&mapped, "roletitle").map(str::to_string),
                        linkedin_url: non_empty(&mapped, "linkedinurl").map(str::to_string),
                        notes: non_empty(&mapped, "notes").map(str::to_string),
                    };
                    match self.repo.create_contact(&request).await {
                        Ok(_) => report.imported += 1,
                        Err(AppError::Conflict(message)) => {
                            report.errors.push(RowError {
                                row: row_number,
                                field: Some("email".to_string()),
                                message,
                            });
                            report.skipped += 1;
                        }
                        Err(other) => return Err(other),
                    }
                }
            }
        }

        Ok(report)
    }

    pub async fn import_companies(
        &self,
        data: &[u8],
        mapping_override: Option<&HashMap<String, String>>,
        preview: bool,
    ) -> Result<ImportReport, AppError> {
        let (table, mapping) = prepare_import(data, mapping_override, COMPANY_FIELDS)?;

        let mut report = ImportReport {
            mapping: mapping.clone(),
            total_rows: table.rows.len(),
            imported: 0,
            updated: 0,
            skipped: 0,
            errors: Vec::new(),
            preview_rows: None,
        };

        if preview {
            let rows = table
                .rows
                .iter()
                .take(PREVIEW_ROWS)
                .map(|row| apply_mapping(row, &mapping))
                .collect();
            report.preview_rows = Some(rows);

            for (index, row) in table.rows.iter().enumerate() {
                let mapped = apply_mapping(row, &mapping);
                report.errors.extend(validate_row(&mapped, COMPANY_FIELDS, index + 2));
            }
            return Ok(report);
        }

        for (index, row) in table.rows.iter().enumerate() {
            let row_number = index + 2;
            let mapped = apply_mapping(row, &mapping);

            let errors = validate_row(&mapped, COMPANY_FIELDS, row_number);
            if !errors.is_empty() {
                report.errors.extend(errors);
                report.skipped += 1;
                continue;
            }

            let name = mapped.get("name").map(String::as_str).unwrap_or("");
            if self.repo.find_company_by_name(name).await?.is_some() {
                report.skipped += 1;
                continue;
            }

            let request = NewCompanyRequest {
                name: name.to_string(),
                website: non_empty(&mapped, "website").map(str::to_string),
                careers_url: non_empty(&mapped, "careersurl").map(str::to_string),
                country: non_empty(&mapped, "country").map(str::to_string),
                notes: non_empty(&mapped, "notes").map(str::to_string),
            };
            match self.repo.create_company(&request).await {
                Ok(_) => report.imported += 1,
                Err(AppError::Conflict(_)) => report.skipped += 1,
                Err(other) => return Err(other),
            }
        }

        Ok(report)
    }

    // ───── AI drafts ─────────────────────────────────────────────────

    pub async fn draft_email(&self, request: DraftEmailRequest) -> Result<OutreachDraft, AppError> {
        request.validate()?;

        let Some(ai) = &self.ai else {
            return Err(AppError::InternalError(
                "AI drafting is not configured".to_string(),
            ));
        };

        let contact = self
            .repo
            .get_contact(&request.contact_id)
            .await
            .map_err(contact_not_found)?;
        let company = self
            .repo
            .get_company(&contact.company_id)
            .await
            .map_err(company_not_found)?;

        let projects = self.repo.portfolio_projects_snapshot(DRAFT_PROJECTS).await?;
        let skills = self.repo.portfolio_skill_names().await?;

        let context = DraftContext {
            contact_name: &contact.name,
            company_name: &company.name,
            job_title: &request.job_title,
            job_description: request.job_description.as_deref(),
            tone: request.tone.as_str(),
            sender_name: &self.sender_name,
            sender_bio: &self.sender_bio,
            projects: &projects,
            skills: &skills,
        };

        let prompt = build_draft_prompt(&context);
        let generated = ai.generate(&prompt).await.map_err(|e| {
            tracing::error!("Draft generation failed: {:#}", e);
            AppError::InternalError("Draft generation failed".to_string())
        })?;

        let fallback = format!("Regarding the {} role at {}", request.job_title, company.name);
        let (subject, body) = split_subject_body(&generated, &fallback);

        let insert = OutreachDraftInsert {
            contact_id: Some(contact.id),
            company_id: Some(company.id),
            job_title: request.job_title,
            tone: request.tone.as_str().to_string(),
            subject,
            body,
        };

        self.repo.create_draft(&insert).await
    }

    pub async fn list_drafts(&self) -> Result<Vec<OutreachDraft>, AppError> {
        self.repo.list_drafts(DRAFT_LIST_LIMIT).await
    }
}

// ───── Helpers ───────────────────────────────────────────────────────

fn to_template(row: TemplateRow) -> Template {
    let mut variables = extract_variables(&row.subject);
    for name in extract_variables(&row.body) {
        if !variables.contains(&name) {
            variables.push(name);
        }
    }

    Template {
        id: row.id,
        name: row.name,
        kind: row.kind.parse().unwrap_or(TemplateKind::Cold),
        subject: row.subject,
        body: row.body,
        variables,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

fn variable_map(contact: &Contact, company: &Company) -> HashMap<String, String> {
    let mut values = HashMap::new();

    values.insert("name".to_string(), contact.name.clone());

    let mut parts = contact.name.split_whitespace();
    if let Some(first) = parts.next() {
        values.insert("first_name".to_string(), first.to_string());
    }
    if let Some(last) = parts.next_back() {
        values.insert("last_name".to_string(), last.to_string());
    }

    values.insert("email".to_string(), contact.email.clone());
    values.insert(
        "role_title".to_string(),
        contact.role_title.clone().unwrap_or_default(),
    );
    values.insert(
        "linkedin_url".to_string(),
        contact.linkedin_url.clone().unwrap_or_default(),
    );

    values.insert("company".to_string(), company.name.clone());
    values.insert(
        "company_country".to_string(),
        company.country.clone().unwrap_or_default(),
    );
    values.insert(
        "company_website".to_string(),
        company.website.clone().unwrap_or_default(),
    );
    values.insert(
        "company_careers".to_string(),
        company.careers_url.clone().unwrap_or_default(),
    );

    values.insert("date".to_string(), Utc::now().format("%B %d, %Y").to_string());

    values
}

fn prepare_import(
    data: &[u8],
    mapping_override: Option<&HashMap<String, String>>,
    fields: &[FieldSpec],
) -> Result<(crate::imports::table::ImportTable, HashMap<String, String>), AppError> {
    let table = parse_table(data).map_err(|e| AppError::InvalidInput(e.to_string()))?;

    let mapping = match mapping_override {
        Some(overrides) => normalize_mapping(overrides),
        None => auto_map_columns(&table.headers, fields),
    };

    if mapping.is_empty() {
        return Err(AppError::InvalidInput(
            "No recognizable columns found; supply an explicit mapping".to_string(),
        ));
    }

    Ok((table, mapping))
}

fn non_empty<'a>(row: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    row.get(key).map(String::as_str).map(str::trim).filter(|v| !v.is_empty())
}

fn company_not_found(e: AppError) -> AppError {
    match e {
        AppError::NotFound(_) => AppError::NotFound("Company not found".to_string()),
        other => other,
    }
}

fn contact_not_found(e: AppError) -> AppError {
    match e {
        AppError::NotFound(_) => AppError::NotFound("Contact not found".to_string()),
        other => other,
    }
}

fn template_not_found(e: AppError) -> AppError {
    match e {
        AppError::NotFound(_) => AppError::NotFound("Template not found".to_string()),
        other => other,
    }
}

fn email_not_found(e: AppError) -> AppError {
    match e {
        AppError::NotFound(_) => AppError::NotFound("Outreach email not found".to_string()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::outreach::OutreachEmailStatus;
    use crate::repositories::outreach::MockOutreachRepository;
    use mockall::predicate::eq;
    use uuid::Uuid;

    fn handler(repo: MockOutreachRepository) -> OutreachHandler<MockOutreachRepository> {
        OutreachHandler::new(repo, None, "Ada".into(), "Systems programmer".into())
    }

    fn company(name: &str) -> Company {
        Company {
            id: Uuid::new_v4(),
            name: name.to_string(),
            name_lower: name.to_lowercase(),
            website: Some("https://initech.test".into()),
            careers_url: None,
            country: Some("Germany".into()),
            starred: false,
            archived: false,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn contact(company_id: Uuid) -> Contact {
        Contact {
            id: Uuid::new_v4(),
            company_id,
            name: "Grace Hopper".into(),
            email: "grace@initech.test".into(),
            email_lower: "grace@initech.test".into(),
            role_title: Some("Engineering Manager".into()),
            linkedin_url: None,
            starred: false,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn email(follow_up_count: i32) -> OutreachEmail {
        OutreachEmail {
            id: Uuid::new_v4(),
            contact_id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            template_id: None,
            subject: "Hello".into(),
            body: "Body".into(),
            status: OutreachEmailStatus::Sent,
            sent_at: Utc::now(),
            follow_up_date: None,
            follow_up_count,
            reply_received_at: None,
            outcome: None,
            reply_note: None,
            closed_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn follow_up_cap_is_enforced() {
        let capped = email(MAX_FOLLOW_UPS);
        let id = capped.id;

        let mut repo = MockOutreachRepository::new();
        repo.expect_get_email()
            .with(eq(id))
            .return_once(move |_| Ok(capped));
        repo.expect_schedule_follow_up().never();

        let handler = handler(repo);
        let err = handler
            .schedule_follow_up(
                &id.to_string(),
                ScheduleFollowUpRequest {
                    follow_up_date: Utc::now(),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn render_fills_contact_and_company_variables() {
        let company = company("Initech");
        let contact = contact(company.id);
        let contact_id = contact.id;
        let company_id = company.id;
        let template_id = Uuid::new_v4();

        let mut repo = MockOutreachRepository::new();
        repo.expect_get_template().return_once(move |_| {
            Ok(TemplateRow {
                id: template_id,
                name: "Cold intro".into(),
                kind: "cold".into(),
                subject: "Hello from {{first_name}}".into(),
                body: "Hi {{first_name}}, I saw {{company}} is hiring. {{missing}}".into(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
        });
        repo.expect_get_contact()
            .with(eq(contact_id))
            .return_once(move |_| Ok(contact));
        repo.expect_get_company()
            .with(eq(company_id))
            .return_once(move |_| Ok(company));

        let handler = handler(repo);
        let rendered = handler
            .render_template(
                &template_id.to_string(),
                RenderTemplateRequest {
                    contact_id,
                    overrides: HashMap::new(),
                },
            )
            .await
            .unwrap();

        assert_eq!(rendered.subject, "Hello from Grace");
        assert!(rendered.body.contains("Initech"));
        assert_eq!(rendered.unfilled, vec!["missing"]);
        assert!(rendered.body.contains("{{missing}}"));
    }

    #[tokio::test]
    async fn import_skips_rows_with_unknown_companies() {
        let known = company("Initech");

        let mut repo = MockOutreachRepository::new();
        repo.expect_find_company_by_name()
            .with(eq("Initech"))
            .returning(move |_| Ok(Some(known.clone())));
        repo.expect_find_company_by_name()
            .with(eq("Globex"))
            .returning(|_| Ok(None));
        repo.expect_find_contact_by_email().returning(|_| Ok(None));
        repo.expect_create_contact()
            .times(1)
            .returning(|r| {
                let mut c = contact(r.company_id);
                c.name = r.name.clone();
                c.email = r.email.clone();
                Ok(c)
            });

        let csv = "Company Name,Name,Email\n\
                   Initech,Grace,grace@initech.test\n\
                   Globex,Hank,hank@globex.test\n";

        let handler = handler(repo);
        let report = handler.import_contacts(csv.as_bytes(), None, false).await.unwrap();

        assert_eq!(report.total_rows, 2);
        assert_eq!(report.imported, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].row, 3);
    }

    #[tokio::test]
    async fn import_preview_writes_nothing() {
        let mut repo = MockOutreachRepository::new();
        repo.expect_find_company_by_name().never();
        repo.expect_create_contact().never();

        let csv = "Company Name,Name,Email\nInitech,Grace,grace@initech.test\n";

        let handler = handler(repo);
        let report = handler.import_contacts(csv.as_bytes(), None, true).await.unwrap();

        assert_eq!(report.imported, 0);
        let preview = report.preview_rows.unwrap();
        assert_eq!(preview.len(), 1);
        assert_eq!(preview[0]["name"], "Grace");
    }

    #[tokio::test]
    async fn draft_requires_a_configured_provider() {
        let mut repo = MockOutreachRepository::new();
        repo.expect_get_contact().never();

        let handler = handler(repo);
        let err = handler
            .draft_email(DraftEmailRequest {
                contact_id: Uuid::new_v4(),
                job_title: "Backend Engineer".into(),
                job_description: None,
                tone: crate::entities::outreach::DraftTone::Professional,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InternalError(_)));
    }
}
