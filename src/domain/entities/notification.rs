use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::entities::blog_post::new_validation_error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Message,
    Comment,
    Like,
    System,
    Update,
    Warning,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Message => "message",
            NotificationKind::Comment => "comment",
            NotificationKind::Like => "like",
            NotificationKind::System => "system",
            NotificationKind::Update => "update",
            NotificationKind::Warning => "warning",
        }
    }
}

impl FromStr for NotificationKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "message" => Ok(NotificationKind::Message),
            "comment" => Ok(NotificationKind::Comment),
            "like" => Ok(NotificationKind::Like),
            "system" => Ok(NotificationKind::System),
            "update" => Ok(NotificationKind::Update),
            "warning" => Ok(NotificationKind::Warning),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl FromStr for Priority {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(()),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct NotificationRow {
    pub id: Uuid,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub priority: String,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub related_id: Option<String>,
    pub related_kind: Option<String>,
    pub action_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub priority: Priority,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub related_id: Option<String>,
    pub related_kind: Option<String>,
    pub action_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<NotificationRow> for Notification {
    fn from(row: NotificationRow) -> Self {
        Notification {
            id: row.id,
            kind: row.kind.parse().unwrap_or(NotificationKind::System),
            title: row.title,
            message: row.message,
            priority: row.priority.parse().unwrap_or(Priority::Medium),
            is_read: row.is_read,
            read_at: row.read_at,
            related_id: row.related_id,
            related_kind: row.related_kind,
            action_url: row.action_url,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewNotificationRequest {
    pub kind: NotificationKind,

    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(min = 1, max = 1000))]
    pub message: String,

    #[serde(default = "default_priority")]
    pub priority: Priority,

    pub related_id: Option<String>,

    #[validate(length(max = 50))]
    pub related_kind: Option<String>,

    #[validate(custom(function = "validate_action_url"))]
    pub action_url: Option<String>,
}

fn default_priority() -> Priority {
    Priority::Medium
}

// Action URLs are app-internal paths, never absolute URLs.
fn validate_action_url(url: &str) -> Result<(), ValidationError> {
    if !url.starts_with('/') {
        return Err(new_validation_error("action_url", "Action URL must be a relative path"));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct ListNotificationsQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub unread_only: Option<bool>,
    pub kind: Option<NotificationKind>,
}

#[derive(Debug, Deserialize, Validate, Default)]
#[serde(default)]
#[validate(schema(function = "validate_bulk_delete"))]
pub struct BulkDeleteNotificationsRequest {
    pub ids: Option<Vec<Uuid>>,
    pub older_than_days: Option<i64>,
    pub read_only: bool,
}

fn validate_bulk_delete(request: &BulkDeleteNotificationsRequest) -> Result<(), ValidationError> {
    let modes = [
        request.ids.is_some(),
        request.older_than_days.is_some(),
        request.read_only,
    ];
    if modes.iter().filter(|m| **m).count() != 1 {
        return Err(new_validation_error(
            "bulk_delete_mode",
            "Provide exactly one of: ids, older_than_days, read_only",
        ));
    }
    if let Some(days) = request.older_than_days {
        if days < 1 {
            return Err(new_validation_error("older_than_days", "Must be at least 1 day"));
        }
    }
    Ok(())
}

impl NewNotificationRequest {
    /// Shortcut for the notification raised by a new contact-form message.
    pub fn for_message(message_id: Uuid, sender: &str) -> Self {
        NewNotificationRequest {
            kind: NotificationKind::Message,
            title: "New contact message".to_string(),
            message: format!("{} sent you a message", sender),
            priority: Priority::Medium,
            related_id: Some(message_id.to_string()),
            related_kind: Some("message".to_string()),
            action_url: Some(format!("/dashboard/messages/{}", message_id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_url_must_be_relative() {
        let mut request = NewNotificationRequest::for_message(Uuid::new_v4(), "Ada");
        assert!(request.validate().is_ok());

        request.action_url = Some("https://evil.example".into());
        assert!(request.validate().is_err());
    }

    #[test]
    fn bulk_delete_rejects_ambiguous_modes() {
        let both = BulkDeleteNotificationsRequest {
            ids: Some(vec![Uuid::new_v4()]),
            older_than_days: Some(7),
            read_only: false,
        };
        assert!(both.validate().is_err());

        let read_only = BulkDeleteNotificationsRequest {
            ids: None,
            older_than_days: None,
            read_only: true,
        };
        assert!(read_only.validate().is_ok());
    }
}
