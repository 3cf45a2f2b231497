//! Recruiting-outreach tracker entities: companies, contacts, email
//! templates, logged outreach emails, and AI-generated drafts.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::entities::{
    blog_post::{new_validation_error, validate_http_url},
    option_fields::OptionField,
};

// ───── Enums ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutreachEmailStatus {
    Sent,
    Replied,
    NoResponse,
    Closed,
}

impl OutreachEmailStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutreachEmailStatus::Sent => "sent",
            OutreachEmailStatus::Replied => "replied",
            OutreachEmailStatus::NoResponse => "no_response",
            OutreachEmailStatus::Closed => "closed",
        }
    }
}

impl FromStr for OutreachEmailStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sent" => Ok(OutreachEmailStatus::Sent),
            "replied" => Ok(OutreachEmailStatus::Replied),
            "no_response" => Ok(OutreachEmailStatus::NoResponse),
            "closed" => Ok(OutreachEmailStatus::Closed),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyOutcome {
    Positive,
    Neutral,
    Rejection,
}

impl ReplyOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReplyOutcome::Positive => "positive",
            ReplyOutcome::Neutral => "neutral",
            ReplyOutcome::Rejection => "rejection",
        }
    }
}

impl FromStr for ReplyOutcome {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "positive" => Ok(ReplyOutcome::Positive),
            "neutral" => Ok(ReplyOutcome::Neutral),
            "rejection" => Ok(ReplyOutcome::Rejection),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateKind {
    Cold,
    FollowUp,
    Referral,
    PostApplication,
}

impl TemplateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateKind::Cold => "cold",
            TemplateKind::FollowUp => "follow_up",
            TemplateKind::Referral => "referral",
            TemplateKind::PostApplication => "post_application",
        }
    }
}

impl FromStr for TemplateKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cold" => Ok(TemplateKind::Cold),
            "follow_up" => Ok(TemplateKind::FollowUp),
            "referral" => Ok(TemplateKind::Referral),
            "post_application" => Ok(TemplateKind::PostApplication),
            _ => Err(()),
        }
    }
}

// ───── Companies ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing)]
    pub name_lower: String,
    pub website: Option<String>,
    pub careers_url: Option<String>,
    pub country: Option<String>,
    pub starred: bool,
    pub archived: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewCompanyRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[validate(custom(function = "validate_optional_url"))]
    pub website: Option<String>,

    #[validate(custom(function = "validate_optional_url"))]
    pub careers_url: Option<String>,

    #[validate(length(max = 100))]
    pub country: Option<String>,

    #[validate(length(max = 5000))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, Default)]
#[serde(default)]
pub struct UpdateCompanyRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: OptionField<String>,

    #[validate(custom(function = "validate_optional_url_field"))]
    pub website: OptionField<String>,

    #[validate(custom(function = "validate_optional_url_field"))]
    pub careers_url: OptionField<String>,

    #[validate(length(max = 100))]
    pub country: OptionField<String>,

    #[validate(length(max = 5000))]
    pub notes: OptionField<String>,
}

#[derive(Debug, Deserialize)]
pub struct StarRequest {
    pub starred: bool,
}

#[derive(Debug, Deserialize)]
pub struct ArchiveRequest {
    pub archived: bool,
}

#[derive(Debug, Deserialize)]
pub struct ListCompaniesQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub search: Option<String>,
    pub starred: Option<bool>,
    pub archived: Option<bool>,
}

// ───── Contacts ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Contact {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub email_lower: String,
    pub role_title: Option<String>,
    pub linkedin_url: Option<String>,
    pub starred: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewContactRequest {
    pub company_id: Uuid,

    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(max = 100))]
    pub role_title: Option<String>,

    #[validate(custom(function = "validate_optional_url"))]
    pub linkedin_url: Option<String>,

    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, Default)]
#[serde(default)]
pub struct UpdateContactRequest {
    pub company_id: OptionField<Uuid>,

    #[validate(length(min = 1, max = 100))]
    pub name: OptionField<String>,

    #[validate(custom(function = "validate_optional_email_field"))]
    pub email: OptionField<String>,

    #[validate(length(max = 100))]
    pub role_title: OptionField<String>,

    #[validate(custom(function = "validate_optional_url_field"))]
    pub linkedin_url: OptionField<String>,

    #[validate(length(max = 2000))]
    pub notes: OptionField<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListContactsQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub company_id: Option<Uuid>,
    pub search: Option<String>,
    pub starred: Option<bool>,
}

// ───── Templates ─────────────────────────────────────────────────────

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TemplateRow {
    pub id: Uuid,
    pub name: String,
    pub kind: String,
    pub subject: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Template {
    pub id: Uuid,
    pub name: String,
    pub kind: TemplateKind,
    pub subject: String,
    pub body: String,
    pub variables: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewTemplateRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[serde(default = "default_template_kind")]
    pub kind: TemplateKind,

    #[validate(length(min = 1, max = 300))]
    pub subject: String,

    #[validate(length(min = 1, max = 12000))]
    pub body: String,
}

fn default_template_kind() -> TemplateKind {
    TemplateKind::Cold
}

#[derive(Debug, Deserialize, Validate, Default)]
#[serde(default)]
pub struct UpdateTemplateRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: OptionField<String>,

    pub kind: OptionField<TemplateKind>,

    #[validate(length(min = 1, max = 300))]
    pub subject: OptionField<String>,

    #[validate(length(min = 1, max = 12000))]
    pub body: OptionField<String>,
}

#[derive(Debug, Deserialize)]
pub struct RenderTemplateRequest {
    pub contact_id: Uuid,
    /// Extra variables layered over the contact/company-derived map.
    #[serde(default)]
    pub overrides: std::collections::HashMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct RenderedTemplate {
    pub subject: String,
    pub body: String,
    pub unfilled: Vec<String>,
}

// ───── Emails ────────────────────────────────────────────────────────

#[derive(Debug, sqlx::FromRow)]
pub struct OutreachEmailRow {
    pub id: Uuid,
    pub contact_id: Uuid,
    pub company_id: Uuid,
    pub template_id: Option<Uuid>,
    pub subject: String,
    pub body: String,
    pub status: String,
    pub sent_at: DateTime<Utc>,
    pub follow_up_date: Option<DateTime<Utc>>,
    pub follow_up_count: i32,
    pub reply_received_at: Option<DateTime<Utc>>,
    pub outcome: Option<String>,
    pub reply_note: Option<String>,
    pub closed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutreachEmail {
    pub id: Uuid,
    pub contact_id: Uuid,
    pub company_id: Uuid,
    pub template_id: Option<Uuid>,
    pub subject: String,
    pub body: String,
    pub status: OutreachEmailStatus,
    pub sent_at: DateTime<Utc>,
    pub follow_up_date: Option<DateTime<Utc>>,
    pub follow_up_count: i32,
    pub reply_received_at: Option<DateTime<Utc>>,
    pub outcome: Option<ReplyOutcome>,
    pub reply_note: Option<String>,
    pub closed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<OutreachEmailRow> for OutreachEmail {
    fn from(row: OutreachEmailRow) -> Self {
        OutreachEmail {
            id: row.id,
            contact_id: row.contact_id,
            company_id: row.company_id,
            template_id: row.template_id,
            subject: row.subject,
            body: row.body,
            status: row.status.parse().unwrap_or(OutreachEmailStatus::Sent),
            sent_at: row.sent_at,
            follow_up_date: row.follow_up_date,
            follow_up_count: row.follow_up_count,
            reply_received_at: row.reply_received_at,
            outcome: row.outcome.and_then(|o| o.parse().ok()),
            reply_note: row.reply_note,
            closed_at: row.closed_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Shaped by the use case: `company_id` comes from the contact, `sent_at`
/// defaults to now.
#[derive(Debug)]
pub struct OutreachEmailInsert {
    pub contact_id: Uuid,
    pub company_id: Uuid,
    pub template_id: Option<Uuid>,
    pub subject: String,
    pub body: String,
    pub sent_at: DateTime<Utc>,
    pub follow_up_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewOutreachEmailRequest {
    pub contact_id: Uuid,

    pub template_id: Option<Uuid>,

    #[validate(length(min = 1, max = 300))]
    pub subject: String,

    #[validate(length(min = 1, max = 12000))]
    pub body: String,

    /// Defaults to now; the email was sent manually by the user.
    pub sent_at: Option<DateTime<Utc>>,

    pub follow_up_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct MarkRepliedRequest {
    pub outcome: ReplyOutcome,

    #[validate(length(max = 2000))]
    pub reply_note: Option<String>,

    pub reply_received_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct ScheduleFollowUpRequest {
    pub follow_up_date: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct ListOutreachEmailsQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub status: Option<OutreachEmailStatus>,
    pub contact_id: Option<Uuid>,
    pub company_id: Option<Uuid>,
}

// ───── AI drafts ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OutreachDraft {
    pub id: Uuid,
    pub contact_id: Option<Uuid>,
    pub company_id: Option<Uuid>,
    pub job_title: String,
    pub tone: String,
    pub subject: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DraftTone {
    Professional,
    Friendly,
}

impl DraftTone {
    pub fn as_str(&self) -> &'static str {
        match self {
            DraftTone::Professional => "professional",
            DraftTone::Friendly => "friendly",
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct DraftEmailRequest {
    pub contact_id: Uuid,

    #[validate(length(min = 1, max = 200))]
    pub job_title: String,

    #[validate(length(max = 8000))]
    pub job_description: Option<String>,

    #[serde(default = "default_tone")]
    pub tone: DraftTone,
}

fn default_tone() -> DraftTone {
    DraftTone::Professional
}

#[derive(Debug)]
pub struct OutreachDraftInsert {
    pub contact_id: Option<Uuid>,
    pub company_id: Option<Uuid>,
    pub job_title: String,
    pub tone: String,
    pub subject: String,
    pub body: String,
}

// ───── Bulk import ───────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ImportReport {
    /// Normalized source header → expected field key.
    pub mapping: std::collections::HashMap<String, String>,
    pub total_rows: usize,
    pub imported: usize,
    pub updated: usize,
    pub skipped: usize,
    pub errors: Vec<crate::imports::mapping::RowError>,
    /// Mapped sample rows, present only for preview requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_rows: Option<Vec<std::collections::HashMap<String, String>>>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ImportQuery {
    #[serde(default)]
    pub preview: bool,
}

// ───── Stats ─────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct OutreachStats {
    pub total_emails: i64,
    pub sent: i64,
    pub replied: i64,
    pub no_response: i64,
    pub closed: i64,
    pub reply_rate: f64,
    pub emails_per_week: Vec<WeeklyCount>,
    pub top_companies: Vec<CompanyEmailCount>,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct WeeklyCount {
    pub week_start: DateTime<Utc>,
    pub count: i64,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct CompanyEmailCount {
    pub company_id: Uuid,
    pub company_name: String,
    pub count: i64,
}

// ───── Validation helpers ────────────────────────────────────────────

fn validate_optional_url(url: &str) -> Result<(), ValidationError> {
    validate_http_url(url)
}

fn validate_optional_url_field(value: &OptionField<String>) -> Result<(), ValidationError> {
    if let OptionField::SetToValue(url) = value {
        validate_http_url(url)?;
    }
    Ok(())
}

fn validate_optional_email_field(value: &OptionField<String>) -> Result<(), ValidationError> {
    if let OptionField::SetToValue(email) = value {
        if !email.contains('@') || email.contains(char::is_whitespace) {
            return Err(new_validation_error("invalid_email", "Invalid email format"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_status_round_trips() {
        for status in [
            OutreachEmailStatus::Sent,
            OutreachEmailStatus::Replied,
            OutreachEmailStatus::NoResponse,
            OutreachEmailStatus::Closed,
        ] {
            assert_eq!(status.as_str().parse::<OutreachEmailStatus>().unwrap(), status);
        }
    }

    #[test]
    fn contact_requires_valid_email() {
        let request = NewContactRequest {
            company_id: Uuid::new_v4(),
            name: "Grace".into(),
            email: "not-an-email".into(),
            role_title: None,
            linkedin_url: None,
            notes: None,
        };
        assert!(request.validate().is_err());
    }
}
