use std::collections::HashMap;

use actix_multipart::Multipart;
use actix_web::{web, Responder};
use futures::{StreamExt, TryStreamExt};
use tracing::instrument;

use crate::{
    constants::MAX_UPLOAD_BYTES,
    entities::outreach::{
        ArchiveRequest, DraftEmailRequest, ImportQuery, ListCompaniesQuery, ListContactsQuery,
        ListOutreachEmailsQuery, MarkRepliedRequest, NewCompanyRequest, NewContactRequest,
        NewOutreachEmailRequest, NewTemplateRequest, RenderTemplateRequest,
        ScheduleFollowUpRequest, StarRequest, UpdateCompanyRequest, UpdateContactRequest,
        UpdateTemplateRequest,
    },
    errors::AppError,
    handlers::{created, ok},
    AppState,
};

// ───── Companies ─────────────────────────────────────────────────────

#[instrument(skip(state, data))]
pub async fn create_company(
    state: web::Data<AppState>,
    data: web::Json<NewCompanyRequest>,
) -> Result<impl Responder, AppError> {
    let company = state.outreach_handler.create_company(data.into_inner()).await?;
    Ok(created(company))
}

#[instrument(skip(state, query))]
pub async fn list_companies(
    state: web::Data<AppState>,
    query: web::Query<ListCompaniesQuery>,
) -> Result<impl Responder, AppError> {
    let companies = state.outreach_handler.list_companies(&query).await?;
    Ok(ok(companies))
}

#[instrument(skip(state))]
pub async fn get_company(
    company_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let company = state.outreach_handler.get_company(&company_id).await?;
    Ok(ok(company))
}

#[instrument(skip(state, data))]
pub async fn update_company(
    company_id: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<UpdateCompanyRequest>,
) -> Result<impl Responder, AppError> {
    let company = state
        .outreach_handler
        .update_company(&company_id, data.into_inner())
        .await?;
    Ok(ok(company))
}

#[instrument(skip(state, data))]
pub async fn star_company(
    company_id: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<StarRequest>,
) -> Result<impl Responder, AppError> {
    let company = state
        .outreach_handler
        .star_company(&company_id, data.starred)
        .await?;
    Ok(ok(company))
}

#[instrument(skip(state, data))]
pub async fn archive_company(
    company_id: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<ArchiveRequest>,
) -> Result<impl Responder, AppError> {
    let company = state
        .outreach_handler
        .archive_company(&company_id, data.archived)
        .await?;
    Ok(ok(company))
}

#[instrument(skip(state))]
pub async fn delete_company(
    company_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.outreach_handler.delete_company(&company_id).await?;
    Ok(ok(serde_json::json!({ "deleted": true })))
}

// ───── Contacts ──────────────────────────────────────────────────────

#[instrument(skip(state, data))]
pub async fn create_contact(
    state: web::Data<AppState>,
    data: web::Json<NewContactRequest>,
) -> Result<impl Responder, AppError> {
    let contact = state.outreach_handler.create_contact(data.into_inner()).await?;
    Ok(created(contact))
}

#[instrument(skip(state, query))]
pub async fn list_contacts(
    state: web::Data<AppState>,
    query: web::Query<ListContactsQuery>,
) -> Result<impl Responder, AppError> {
    let contacts = state.outreach_handler.list_contacts(&query).await?;
    Ok(ok(contacts))
}

#[instrument(skip(state))]
pub async fn get_contact(
    contact_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let contact = state.outreach_handler.get_contact(&contact_id).await?;
    Ok(ok(contact))
}

#[instrument(skip(state, data))]
pub async fn update_contact(
    contact_id: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<UpdateContactRequest>,
) -> Result<impl Responder, AppError> {
    let contact = state
        .outreach_handler
        .update_contact(&contact_id, data.into_inner())
        .await?;
    Ok(ok(contact))
}

#[instrument(skip(state, data))]
pub async fn star_contact(
    contact_id: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<StarRequest>,
) -> Result<impl Responder, AppError> {
    let contact = state
        .outreach_handler
        .star_contact(&contact_id, data.starred)
        .await?;
    Ok(ok(contact))
}

#[instrument(skip(state))]
pub async fn delete_contact(
    contact_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.outreach_handler.delete_contact(&contact_id).await?;
    Ok(ok(serde_json::json!({ "deleted": true })))
}

// ───── Templates ─────────────────────────────────────────────────────

#[instrument(skip(state, data))]
pub async fn create_template(
    state: web::Data<AppState>,
    data: web::Json<NewTemplateRequest>,
) -> Result<impl Responder, AppError> {
    let template = state.outreach_handler.create_template(data.into_inner()).await?;
    Ok(created(template))
}

#[instrument(skip(state))]
pub async fn list_templates(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let templates = state.outreach_handler.list_templates().await?;
    Ok(ok(templates))
}

#[instrument(skip(state))]
pub async fn get_template(
    template_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let template = state.outreach_handler.get_template(&template_id).await?;
    Ok(ok(template))
}

#[instrument(skip(state, data))]
pub async fn update_template(
    template_id: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<UpdateTemplateRequest>,
) -> Result<impl Responder, AppError> {
    let template = state
        .outreach_handler
        .update_template(&template_id, data.into_inner())
        .await?;
    Ok(ok(template))
}

#[instrument(skip(state))]
pub async fn delete_template(
    template_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.outreach_handler.delete_template(&template_id).await?;
    Ok(ok(serde_json::json!({ "deleted": true })))
}

#[instrument(skip(state, data))]
pub async fn render_template(
    template_id: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<RenderTemplateRequest>,
) -> Result<impl Responder, AppError> {
    let rendered = state
        .outreach_handler
        .render_template(&template_id, data.into_inner())
        .await?;
    Ok(ok(rendered))
}

// ───── Emails ────────────────────────────────────────────────────────

#[instrument(skip(state, data))]
pub async fn log_email(
    state: web::Data<AppState>,
    data: web::Json<NewOutreachEmailRequest>,
) -> Result<impl Responder, AppError> {
    let email = state.outreach_handler.log_email(data.into_inner()).await?;
    Ok(created(email))
}

#[instrument(skip(state, query))]
pub async fn list_emails(
    state: web::Data<AppState>,
    query: web::Query<ListOutreachEmailsQuery>,
) -> Result<impl Responder, AppError> {
    let emails = state.outreach_handler.list_emails(&query).await?;
    Ok(ok(emails))
}

#[instrument(skip(state))]
pub async fn get_email(
    email_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let email = state.outreach_handler.get_email(&email_id).await?;
    Ok(ok(email))
}

#[instrument(skip(state, data))]
pub async fn mark_replied(
    email_id: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<MarkRepliedRequest>,
) -> Result<impl Responder, AppError> {
    let email = state
        .outreach_handler
        .mark_replied(&email_id, data.into_inner())
        .await?;
    Ok(ok(email))
}

#[instrument(skip(state))]
pub async fn close_email(
    email_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let email = state.outreach_handler.close_email(&email_id).await?;
    Ok(ok(email))
}

#[instrument(skip(state, data))]
pub async fn schedule_follow_up(
    email_id: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<ScheduleFollowUpRequest>,
) -> Result<impl Responder, AppError> {
    let email = state
        .outreach_handler
        .schedule_follow_up(&email_id, data.into_inner())
        .await?;
    Ok(ok(email))
}

#[instrument(skip(state))]
pub async fn due_follow_ups(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let emails = state.outreach_handler.due_follow_ups().await?;
    Ok(ok(emails))
}

#[instrument(skip(state))]
pub async fn delete_email(
    email_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.outreach_handler.delete_email(&email_id).await?;
    Ok(ok(serde_json::json!({ "deleted": true })))
}

#[instrument(skip(state))]
pub async fn outreach_stats(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let stats = state.outreach_handler.stats().await?;
    Ok(ok(stats))
}

// ───── Bulk import ───────────────────────────────────────────────────

/// Multipart pieces accepted by the import endpoints: a required `file`
/// part and an optional `mapping` part holding a JSON object.
struct ImportUpload {
    file: Vec<u8>,
    mapping: Option<HashMap<String, String>>,
}

async fn read_import_upload(mut payload: Multipart) -> Result<ImportUpload, AppError> {
    let mut file: Option<Vec<u8>> = None;
    let mut mapping = None;

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Malformed multipart payload: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk =
                chunk.map_err(|e| AppError::InvalidInput(format!("Upload read failed: {}", e)))?;
            if bytes.len() + chunk.len() > MAX_UPLOAD_BYTES {
                return Err(AppError::InvalidInput("Uploaded file is too large".to_string()));
            }
            bytes.extend_from_slice(&chunk);
        }

        match name.as_str() {
            "file" => file = Some(bytes),
            "mapping" => {
                let parsed: HashMap<String, String> = serde_json::from_slice(&bytes)
                    .map_err(|_| {
                        AppError::InvalidInput("Mapping must be a JSON object of strings".to_string())
                    })?;
                mapping = Some(parsed);
            }
            _ => {}
        }
    }

    let file = file.ok_or_else(|| AppError::InvalidInput("Missing file part".to_string()))?;
    if file.is_empty() {
        return Err(AppError::InvalidInput("Uploaded file is empty".to_string()));
    }

    Ok(ImportUpload { file, mapping })
}

#[instrument(skip(state, payload, query))]
pub async fn import_contacts(
    state: web::Data<AppState>,
    payload: Multipart,
    query: web::Query<ImportQuery>,
) -> Result<impl Responder, AppError> {
    let upload = read_import_upload(payload).await?;
    let report = state
        .outreach_handler
        .import_contacts(&upload.file, upload.mapping.as_ref(), query.preview)
        .await?;
    Ok(ok(report))
}

#[instrument(skip(state, payload, query))]
pub async fn import_companies(
    state: web::Data<AppState>,
    payload: Multipart,
    query: web::Query<ImportQuery>,
) -> Result<impl Responder, AppError> {
    let upload = read_import_upload(payload).await?;
    let report = state
        .outreach_handler
        .import_companies(&upload.file, upload.mapping.as_ref(), query.preview)
        .await?;
    Ok(ok(report))
}

// ───── AI drafts ─────────────────────────────────────────────────────

#[instrument(skip(state, data))]
pub async fn draft_email(
    state: web::Data<AppState>,
    data: web::Json<DraftEmailRequest>,
) -> Result<impl Responder, AppError> {
    let draft = state.outreach_handler.draft_email(data.into_inner()).await?;
    Ok(created(draft))
}

#[instrument(skip(state))]
pub async fn list_drafts(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let drafts = state.outreach_handler.list_drafts().await?;
    Ok(ok(drafts))
}
