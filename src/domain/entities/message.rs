use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::entities::blog_post::new_validation_error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Unread,
    Read,
    Replied,
    Archived,
}

impl MessageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageStatus::Unread => "unread",
            MessageStatus::Read => "read",
            MessageStatus::Replied => "replied",
            MessageStatus::Archived => "archived",
        }
    }
}

impl FromStr for MessageStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unread" => Ok(MessageStatus::Unread),
            "read" => Ok(MessageStatus::Read),
            "replied" => Ok(MessageStatus::Replied),
            "archived" => Ok(MessageStatus::Archived),
            _ => Err(()),
        }
    }
}

/// One reply in the per-message thread (JSONB column).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageReply {
    pub body: String,
    pub sent_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct MessageRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub category: String,
    pub content: String,
    pub status: String,
    pub replies: Json<Vec<MessageReply>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub category: String,
    pub content: String,
    pub status: MessageStatus,
    pub replies: Vec<MessageReply>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MessageRow> for Message {
    fn from(row: MessageRow) -> Self {
        Message {
            id: row.id,
            name: row.name,
            email: row.email,
            subject: row.subject,
            category: row.category,
            content: row.content,
            status: row.status.parse().unwrap_or(MessageStatus::Unread),
            replies: row.replies.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct NewMessageRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(max = 150))]
    pub subject: Option<String>,

    #[serde(default = "default_category")]
    #[validate(length(min = 1, max = 50))]
    pub category: String,

    #[validate(length(min = 5, max = 5000))]
    pub message: String,
}

fn default_category() -> String {
    "general".to_string()
}

#[derive(Debug, Deserialize)]
pub struct UpdateMessageStatusRequest {
    pub status: MessageStatus,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ReplyRequest {
    #[validate(length(min = 1, max = 10000))]
    pub body: String,
}

/// Exactly one deletion mode must be supplied.
#[derive(Debug, Deserialize, Validate, Default)]
#[serde(default)]
#[validate(schema(function = "validate_bulk_delete"))]
pub struct BulkDeleteMessagesRequest {
    pub ids: Option<Vec<Uuid>>,
    pub older_than_days: Option<i64>,
    pub all: bool,
}

fn validate_bulk_delete(request: &BulkDeleteMessagesRequest) -> Result<(), ValidationError> {
    let modes = [
        request.ids.is_some(),
        request.older_than_days.is_some(),
        request.all,
    ];
    if modes.iter().filter(|m| **m).count() != 1 {
        return Err(new_validation_error(
            "bulk_delete_mode",
            "Provide exactly one of: ids, older_than_days, all",
        ));
    }
    if let Some(days) = request.older_than_days {
        if days < 1 {
            return Err(new_validation_error("older_than_days", "Must be at least 1 day"));
        }
    }
    if let Some(ids) = &request.ids {
        if ids.is_empty() {
            return Err(new_validation_error("ids", "Id list cannot be empty"));
        }
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct ListMessagesQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub status: Option<MessageStatus>,
}

#[derive(Debug, Serialize)]
pub struct MessageCreatedResponse {
    pub id: Uuid,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bulk_delete_requires_one_mode() {
        let none = BulkDeleteMessagesRequest::default();
        assert!(none.validate().is_err());

        let two = BulkDeleteMessagesRequest {
            ids: Some(vec![Uuid::new_v4()]),
            older_than_days: Some(5),
            all: false,
        };
        assert!(two.validate().is_err());

        let by_age = BulkDeleteMessagesRequest {
            ids: None,
            older_than_days: Some(30),
            all: false,
        };
        assert!(by_age.validate().is_ok());
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in [MessageStatus::Unread, MessageStatus::Read, MessageStatus::Replied, MessageStatus::Archived] {
            assert_eq!(status.as_str().parse::<MessageStatus>().unwrap(), status);
        }
    }
}
