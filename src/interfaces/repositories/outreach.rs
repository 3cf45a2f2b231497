use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    entities::outreach::{
        Company, CompanyEmailCount, Contact, ListCompaniesQuery, ListContactsQuery,
        ListOutreachEmailsQuery, NewCompanyRequest, NewContactRequest, NewTemplateRequest,
        OutreachDraft, OutreachDraftInsert, OutreachEmail, OutreachEmailInsert, OutreachEmailRow,
        OutreachStats, ReplyOutcome, TemplateRow, UpdateCompanyRequest, UpdateContactRequest,
        UpdateTemplateRequest, WeeklyCount,
    },
    errors::AppError,
    repositories::{page_offset, sqlx_repo::SqlxOutreachRepo},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OutreachRepository: Send + Sync {
    // Companies
    async fn create_company(&self, request: &NewCompanyRequest) -> Result<Company, AppError>;
    async fn get_company(&self, id: &Uuid) -> Result<Company, AppError>;
    async fn find_company_by_name(&self, name: &str) -> Result<Option<Company>, AppError>;
    async fn list_companies(
        &self,
        filter: &ListCompaniesQuery,
        page: u32,
        per_page: u32,
    ) -> Result<(Vec<Company>, i64), AppError>;
    async fn update_company(
        &self,
        id: &Uuid,
        patch: &UpdateCompanyRequest,
    ) -> Result<Company, AppError>;
    async fn set_company_starred(&self, id: &Uuid, starred: bool) -> Result<Company, AppError>;
    async fn set_company_archived(&self, id: &Uuid, archived: bool) -> Result<Company, AppError>;
    async fn delete_company(&self, id: &Uuid) -> Result<(), AppError>;

    // Contacts
    async fn create_contact(&self, request: &NewContactRequest) -> Result<Contact, AppError>;
    async fn get_contact(&self, id: &Uuid) -> Result<Contact, AppError>;
    async fn find_contact_by_email(&self, email: &str) -> Result<Option<Contact>, AppError>;
    async fn list_contacts(
        &self,
        filter: &ListContactsQuery,
        page: u32,
        per_page: u32,
    ) -> Result<(Vec<Contact>, i64), AppError>;
    async fn update_contact(
        &self,
        id: &Uuid,
        patch: &UpdateContactRequest,
    ) -> Result<Contact, AppError>;
    async fn set_contact_starred(&self, id: &Uuid, starred: bool) -> Result<Contact, AppError>;
    /// Fills only fields that are currently NULL; used by import merges.
    async fn merge_contact_missing_fields<'a>(
        &self,
        id: &Uuid,
        role_title: Option<&'a str>,
        linkedin_url: Option<&'a str>,
        notes: Option<&'a str>,
    ) -> Result<Contact, AppError>;
    async fn delete_contact(&self, id: &Uuid) -> Result<(), AppError>;

    // Templates
    async fn create_template(&self, request: &NewTemplateRequest) -> Result<TemplateRow, AppError>;
    async fn get_template(&self, id: &Uuid) -> Result<TemplateRow, AppError>;
    async fn list_templates(&self) -> Result<Vec<TemplateRow>, AppError>;
    async fn update_template(
        &self,
        id: &Uuid,
        patch: &UpdateTemplateRequest,
    ) -> Result<TemplateRow, AppError>;
    async fn delete_template(&self, id: &Uuid) -> Result<(), AppError>;

    // Emails
    async fn create_email(&self, insert: &OutreachEmailInsert) -> Result<OutreachEmail, AppError>;
    async fn get_email(&self, id: &Uuid) -> Result<OutreachEmail, AppError>;
    async fn list_emails(
        &self,
        filter: &ListOutreachEmailsQuery,
        page: u32,
        per_page: u32,
    ) -> Result<(Vec<OutreachEmail>, i64), AppError>;
    async fn mark_replied<'a>(
        &self,
        id: &Uuid,
        outcome: ReplyOutcome,
        reply_note: Option<&'a str>,
        reply_received_at: DateTime<Utc>,
    ) -> Result<OutreachEmail, AppError>;
    async fn close_email(&self, id: &Uuid) -> Result<OutreachEmail, AppError>;
    async fn schedule_follow_up(
        &self,
        id: &Uuid,
        follow_up_date: DateTime<Utc>,
    ) -> Result<OutreachEmail, AppError>;
    async fn list_due_follow_ups(&self) -> Result<Vec<OutreachEmail>, AppError>;
    async fn delete_email(&self, id: &Uuid) -> Result<(), AppError>;
    async fn stats(&self) -> Result<OutreachStats, AppError>;

    // Drafts
    async fn create_draft(&self, insert: &OutreachDraftInsert) -> Result<OutreachDraft, AppError>;
    async fn list_drafts(&self, limit: i64) -> Result<Vec<OutreachDraft>, AppError>;

    // Portfolio snapshot for draft prompts
    async fn portfolio_projects_snapshot(
        &self,
        limit: i64,
    ) -> Result<Vec<(String, String, Vec<String>)>, AppError>;
    async fn portfolio_skill_names(&self) -> Result<Vec<String>, AppError>;
}

impl SqlxOutreachRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxOutreachRepo { pool }
    }
}

fn push_company_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &ListCompaniesQuery) {
    if let Some(starred) = filter.starred {
        builder.push(" AND starred = ").push_bind(starred);
    }
    if let Some(archived) = filter.archived {
        builder.push(" AND archived = ").push_bind(archived);
    }
    if let Some(search) = &filter.search {
        let search = search.trim();
        if !search.is_empty() {
            builder.push(" AND name ILIKE ").push_bind(format!("%{}%", search));
        }
    }
}

fn push_contact_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &ListContactsQuery) {
    if let Some(company_id) = filter.company_id {
        builder.push(" AND company_id = ").push_bind(company_id);
    }
    if let Some(starred) = filter.starred {
        builder.push(" AND starred = ").push_bind(starred);
    }
    if let Some(search) = &filter.search {
        let search = search.trim();
        if !search.is_empty() {
            let pattern = format!("%{}%", search);
            builder.push(" AND (name ILIKE ").push_bind(pattern.clone());
            builder.push(" OR email ILIKE ").push_bind(pattern);
            builder.push(")");
        }
    }
}

fn push_email_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &ListOutreachEmailsQuery) {
    if let Some(status) = filter.status {
        builder.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(contact_id) = filter.contact_id {
        builder.push(" AND contact_id = ").push_bind(contact_id);
    }
    if let Some(company_id) = filter.company_id {
        builder.push(" AND company_id = ").push_bind(company_id);
    }
}

#[async_trait]
impl OutreachRepository for SqlxOutreachRepo {
    async fn create_company(&self, request: &NewCompanyRequest) -> Result<Company, AppError> {
        let name = request.name.trim();

        let company = sqlx::query_as::<_, Company>(
            r#"
            INSERT INTO outreach_companies (name, name_lower, website, careers_url, country, notes)
            VALUES ($1, LOWER($1), $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(&request.website)
        .bind(&request.careers_url)
        .bind(&request.country)
        .bind(&request.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23505") {
                    return AppError::Conflict("Company already exists".into());
                }
            }
            AppError::from(e)
        })?;

        Ok(company)
    }

    async fn get_company(&self, id: &Uuid) -> Result<Company, AppError> {
        let company =
            sqlx::query_as::<_, Company>("SELECT * FROM outreach_companies WHERE id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        Ok(company)
    }

    async fn find_company_by_name(&self, name: &str) -> Result<Option<Company>, AppError> {
        let company = sqlx::query_as::<_, Company>(
            "SELECT * FROM outreach_companies WHERE name_lower = LOWER($1)",
        )
        .bind(name.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(company)
    }

    async fn list_companies(
        &self,
        filter: &ListCompaniesQuery,
        page: u32,
        per_page: u32,
    ) -> Result<(Vec<Company>, i64), AppError> {
        let mut builder = QueryBuilder::new("SELECT * FROM outreach_companies WHERE TRUE");
        push_company_filters(&mut builder, filter);
        builder.push(" ORDER BY starred DESC, name_lower ASC");
        builder.push(" LIMIT ").push_bind(per_page as i64);
        builder.push(" OFFSET ").push_bind(page_offset(page, per_page));

        let companies: Vec<Company> = builder.build_query_as().fetch_all(&self.pool).await?;

        let mut count_builder =
            QueryBuilder::new("SELECT COUNT(*) FROM outreach_companies WHERE TRUE");
        push_company_filters(&mut count_builder, filter);
        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        Ok((companies, total))
    }

    async fn update_company(
        &self,
        id: &Uuid,
        patch: &UpdateCompanyRequest,
    ) -> Result<Company, AppError> {
        let company = sqlx::query_as::<_, Company>(
            r#"
            UPDATE outreach_companies SET
                name = COALESCE($1, name),
                name_lower = COALESCE(LOWER($1), name_lower),
                website = CASE WHEN $2 THEN $3 ELSE website END,
                careers_url = CASE WHEN $4 THEN $5 ELSE careers_url END,
                country = CASE WHEN $6 THEN $7 ELSE country END,
                notes = CASE WHEN $8 THEN $9 ELSE notes END,
                updated_at = NOW()
            WHERE id = $10
            RETURNING *
            "#,
        )
        .bind(patch.name.flatten_str().map(str::trim))
        .bind(!patch.website.is_unchanged())
        .bind(patch.website.flatten_str())
        .bind(!patch.careers_url.is_unchanged())
        .bind(patch.careers_url.flatten_str())
        .bind(!patch.country.is_unchanged())
        .bind(patch.country.flatten_str())
        .bind(!patch.notes.is_unchanged())
        .bind(patch.notes.flatten_str())
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23505") {
                    return AppError::Conflict("Company already exists".into());
                }
            }
            AppError::from(e)
        })?;

        Ok(company)
    }

    async fn set_company_starred(&self, id: &Uuid, starred: bool) -> Result<Company, AppError> {
        let company = sqlx::query_as::<_, Company>(
            "UPDATE outreach_companies SET starred = $1, updated_at = NOW() WHERE id = $2 RETURNING *",
        )
        .bind(starred)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(company)
    }

    async fn set_company_archived(&self, id: &Uuid, archived: bool) -> Result<Company, AppError> {
        let company = sqlx::query_as::<_, Company>(
            "UPDATE outreach_companies SET archived = $1, updated_at = NOW() WHERE id = $2 RETURNING *",
        )
        .bind(archived)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(company)
    }

    async fn delete_company(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM outreach_companies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Company not found".into()));
        }

        Ok(())
    }

    async fn create_contact(&self, request: &NewContactRequest) -> Result<Contact, AppError> {
        let contact = sqlx::query_as::<_, Contact>(
            r#"
            INSERT INTO outreach_contacts (
                company_id, name, email, email_lower, role_title, linkedin_url, notes
            )
            VALUES ($1, $2, $3, LOWER($3), $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(request.company_id)
        .bind(request.name.trim())
        .bind(request.email.trim())
        .bind(&request.role_title)
        .bind(&request.linkedin_url)
        .bind(&request.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                match db_err.code().as_deref() {
                    Some("23505") => return AppError::Conflict("Contact email already exists".into()),
                    Some("23503") => return AppError::InvalidInput("Unknown company".into()),
                    _ => {}
                }
            }
            AppError::from(e)
        })?;

        Ok(contact)
    }

    async fn get_contact(&self, id: &Uuid) -> Result<Contact, AppError> {
        let contact = sqlx::query_as::<_, Contact>("SELECT * FROM outreach_contacts WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(contact)
    }

    async fn find_contact_by_email(&self, email: &str) -> Result<Option<Contact>, AppError> {
        let contact = sqlx::query_as::<_, Contact>(
            "SELECT * FROM outreach_contacts WHERE email_lower = LOWER($1)",
        )
        .bind(email.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(contact)
    }

    async fn list_contacts(
        &self,
        filter: &ListContactsQuery,
        page: u32,
        per_page: u32,
    ) -> Result<(Vec<Contact>, i64), AppError> {
        let mut builder = QueryBuilder::new("SELECT * FROM outreach_contacts WHERE TRUE");
        push_contact_filters(&mut builder, filter);
        builder.push(" ORDER BY starred DESC, name ASC");
        builder.push(" LIMIT ").push_bind(per_page as i64);
        builder.push(" OFFSET ").push_bind(page_offset(page, per_page));

        let contacts: Vec<Contact> = builder.build_query_as().fetch_all(&self.pool).await?;

        let mut count_builder =
            QueryBuilder::new("SELECT COUNT(*) FROM outreach_contacts WHERE TRUE");
        push_contact_filters(&mut count_builder, filter);
        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        Ok((contacts, total))
    }

    async fn update_contact(
        &self,
        id: &Uuid,
        patch: &UpdateContactRequest,
    ) -> Result<Contact, AppError> {
        let contact = sqlx::query_as::<_, Contact>(
            r#"
            UPDATE outreach_contacts SET
                company_id = COALESCE($1, company_id),
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                email_lower = COALESCE(LOWER($3), email_lower),
                role_title = CASE WHEN $4 THEN $5 ELSE role_title END,
                linkedin_url = CASE WHEN $6 THEN $7 ELSE linkedin_url END,
                notes = CASE WHEN $8 THEN $9 ELSE notes END,
                updated_at = NOW()
            WHERE id = $10
            RETURNING *
            "#,
        )
        .bind(patch.company_id.flatten_ref())
        .bind(patch.name.flatten_str())
        .bind(patch.email.flatten_str().map(str::trim))
        .bind(!patch.role_title.is_unchanged())
        .bind(patch.role_title.flatten_str())
        .bind(!patch.linkedin_url.is_unchanged())
        .bind(patch.linkedin_url.flatten_str())
        .bind(!patch.notes.is_unchanged())
        .bind(patch.notes.flatten_str())
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23505") {
                    return AppError::Conflict("Contact email already exists".into());
                }
            }
            AppError::from(e)
        })?;

        Ok(contact)
    }

    async fn set_contact_starred(&self, id: &Uuid, starred: bool) -> Result<Contact, AppError> {
        let contact = sqlx::query_as::<_, Contact>(
            "UPDATE outreach_contacts SET starred = $1, updated_at = NOW() WHERE id = $2 RETURNING *",
        )
        .bind(starred)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(contact)
    }

    async fn merge_contact_missing_fields<'a>(
        &self,
        id: &Uuid,
        role_title: Option<&'a str>,
        linkedin_url: Option<&'a str>,
        notes: Option<&'a str>,
    ) -> Result<Contact, AppError> {
        let contact = sqlx::query_as::<_, Contact>(
            r#"
            UPDATE outreach_contacts SET
                role_title = COALESCE(role_title, $1),
                linkedin_url = COALESCE(linkedin_url, $2),
                notes = COALESCE(notes, $3),
                updated_at = NOW()
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(role_title)
        .bind(linkedin_url)
        .bind(notes)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(contact)
    }

    async fn delete_contact(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM outreach_contacts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Contact not found".into()));
        }

        Ok(())
    }

    async fn create_template(&self, request: &NewTemplateRequest) -> Result<TemplateRow, AppError> {
        let template = sqlx::query_as::<_, TemplateRow>(
            r#"
            INSERT INTO outreach_templates (name, kind, subject, body)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&request.name)
        .bind(request.kind.as_str())
        .bind(&request.subject)
        .bind(&request.body)
        .fetch_one(&self.pool)
        .await?;

        Ok(template)
    }

    async fn get_template(&self, id: &Uuid) -> Result<TemplateRow, AppError> {
        let template =
            sqlx::query_as::<_, TemplateRow>("SELECT * FROM outreach_templates WHERE id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        Ok(template)
    }

    async fn list_templates(&self) -> Result<Vec<TemplateRow>, AppError> {
        let templates = sqlx::query_as::<_, TemplateRow>(
            "SELECT * FROM outreach_templates ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(templates)
    }

    async fn update_template(
        &self,
        id: &Uuid,
        patch: &UpdateTemplateRequest,
    ) -> Result<TemplateRow, AppError> {
        let template = sqlx::query_as::<_, TemplateRow>(
            r#"
            UPDATE outreach_templates SET
                name = COALESCE($1, name),
                kind = COALESCE($2, kind),
                subject = COALESCE($3, subject),
                body = COALESCE($4, body),
                updated_at = NOW()
            WHERE id = $5
            RETURNING *
            "#,
        )
        .bind(patch.name.flatten_str())
        .bind(patch.kind.flatten_ref().map(|k| k.as_str()))
        .bind(patch.subject.flatten_str())
        .bind(patch.body.flatten_str())
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(template)
    }

    async fn delete_template(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM outreach_templates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Template not found".into()));
        }

        Ok(())
    }

    async fn create_email(&self, insert: &OutreachEmailInsert) -> Result<OutreachEmail, AppError> {
        let row = sqlx::query_as::<_, OutreachEmailRow>(
            r#"
            INSERT INTO outreach_emails (
                contact_id, company_id, template_id, subject, body, sent_at, follow_up_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(insert.contact_id)
        .bind(insert.company_id)
        .bind(insert.template_id)
        .bind(&insert.subject)
        .bind(&insert.body)
        .bind(insert.sent_at)
        .bind(insert.follow_up_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn get_email(&self, id: &Uuid) -> Result<OutreachEmail, AppError> {
        let row = sqlx::query_as::<_, OutreachEmailRow>(
            "SELECT * FROM outreach_emails WHERE id = $1",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn list_emails(
        &self,
        filter: &ListOutreachEmailsQuery,
        page: u32,
        per_page: u32,
    ) -> Result<(Vec<OutreachEmail>, i64), AppError> {
        let mut builder = QueryBuilder::new("SELECT * FROM outreach_emails WHERE TRUE");
        push_email_filters(&mut builder, filter);
        builder.push(" ORDER BY sent_at DESC");
        builder.push(" LIMIT ").push_bind(per_page as i64);
        builder.push(" OFFSET ").push_bind(page_offset(page, per_page));

        let rows: Vec<OutreachEmailRow> = builder.build_query_as().fetch_all(&self.pool).await?;

        let mut count_builder = QueryBuilder::new("SELECT COUNT(*) FROM outreach_emails WHERE TRUE");
        push_email_filters(&mut count_builder, filter);
        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    async fn mark_replied<'a>(
        &self,
        id: &Uuid,
        outcome: ReplyOutcome,
        reply_note: Option<&'a str>,
        reply_received_at: DateTime<Utc>,
    ) -> Result<OutreachEmail, AppError> {
        let row = sqlx::query_as::<_, OutreachEmailRow>(
            r#"
            UPDATE outreach_emails SET
                status = 'replied',
                reply_received_at = $1,
                outcome = $2,
                reply_note = $3,
                updated_at = NOW()
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(reply_received_at)
        .bind(outcome.as_str())
        .bind(reply_note)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn close_email(&self, id: &Uuid) -> Result<OutreachEmail, AppError> {
        let row = sqlx::query_as::<_, OutreachEmailRow>(
            r#"
            UPDATE outreach_emails SET
                status = 'closed',
                closed_at = COALESCE(closed_at, NOW()),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn schedule_follow_up(
        &self,
        id: &Uuid,
        follow_up_date: DateTime<Utc>,
    ) -> Result<OutreachEmail, AppError> {
        let row = sqlx::query_as::<_, OutreachEmailRow>(
            r#"
            UPDATE outreach_emails SET
                follow_up_date = $1,
                follow_up_count = follow_up_count + 1,
                updated_at = NOW()
            WHERE id = $2 AND follow_up_count < 2
            RETURNING *
            "#,
        )
        .bind(follow_up_date)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn list_due_follow_ups(&self) -> Result<Vec<OutreachEmail>, AppError> {
        let rows = sqlx::query_as::<_, OutreachEmailRow>(
            r#"
            SELECT * FROM outreach_emails
            WHERE status = 'sent' AND follow_up_date IS NOT NULL AND follow_up_date <= NOW()
            ORDER BY follow_up_date ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn delete_email(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM outreach_emails WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Outreach email not found".into()));
        }

        Ok(())
    }

    async fn stats(&self) -> Result<OutreachStats, AppError> {
        let (total, sent, replied, no_response, closed): (i64, i64, i64, i64, i64) =
            sqlx::query_as(
                r#"
                SELECT
                    COUNT(*),
                    COUNT(*) FILTER (WHERE status = 'sent'),
                    COUNT(*) FILTER (WHERE status = 'replied'),
                    COUNT(*) FILTER (WHERE status = 'no_response'),
                    COUNT(*) FILTER (WHERE status = 'closed')
                FROM outreach_emails
                "#,
            )
            .fetch_one(&self.pool)
            .await?;

        let emails_per_week = sqlx::query_as::<_, WeeklyCount>(
            r#"
            SELECT DATE_TRUNC('week', sent_at) AS week_start, COUNT(*) AS count
            FROM outreach_emails
            WHERE sent_at >= NOW() - INTERVAL '8 weeks'
            GROUP BY week_start
            ORDER BY week_start ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let top_companies = sqlx::query_as::<_, CompanyEmailCount>(
            r#"
            SELECT e.company_id, c.name AS company_name, COUNT(*) AS count
            FROM outreach_emails e
            JOIN outreach_companies c ON c.id = e.company_id
            GROUP BY e.company_id, c.name
            ORDER BY count DESC, c.name ASC
            LIMIT 5
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let reply_rate = if total > 0 {
            replied as f64 / total as f64
        } else {
            0.0
        };

        Ok(OutreachStats {
            total_emails: total,
            sent,
            replied,
            no_response,
            closed,
            reply_rate,
            emails_per_week,
            top_companies,
        })
    }

    async fn create_draft(&self, insert: &OutreachDraftInsert) -> Result<OutreachDraft, AppError> {
        let draft = sqlx::query_as::<_, OutreachDraft>(
            r#"
            INSERT INTO outreach_drafts (contact_id, company_id, job_title, tone, subject, body)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(insert.contact_id)
        .bind(insert.company_id)
        .bind(&insert.job_title)
        .bind(&insert.tone)
        .bind(&insert.subject)
        .bind(&insert.body)
        .fetch_one(&self.pool)
        .await?;

        Ok(draft)
    }

    async fn list_drafts(&self, limit: i64) -> Result<Vec<OutreachDraft>, AppError> {
        let drafts = sqlx::query_as::<_, OutreachDraft>(
            "SELECT * FROM outreach_drafts ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(drafts)
    }

    async fn portfolio_projects_snapshot(
        &self,
        limit: i64,
    ) -> Result<Vec<(String, String, Vec<String>)>, AppError> {
        let rows: Vec<(String, String, Vec<String>)> = sqlx::query_as(
            r#"
            SELECT title, description, technologies
            FROM projects
            WHERE status <> 'archived'
            ORDER BY featured DESC, sort_order ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn portfolio_skill_names(&self) -> Result<Vec<String>, AppError> {
        let names: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM skills ORDER BY proficiency DESC, sort_order ASC LIMIT 12",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(names)
    }
}
