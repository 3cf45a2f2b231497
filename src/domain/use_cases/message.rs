use chrono::Utc;
use validator::Validate;

use crate::{
    email::mailer::Mailer,
    entities::{
        message::{
            BulkDeleteMessagesRequest, ListMessagesQuery, Message, MessageCreatedResponse,
            MessageReply, MessageStatus, NewMessageRequest, ReplyRequest,
        },
        notification::NewNotificationRequest,
        Paginated,
    },
    errors::AppError,
    limiter::rate_limiter::RateLimiterStore,
    repositories::{message::MessageRepository, notification::NotificationRepository},
    use_cases::page_params,
    utils::valid_uuid::valid_uuid,
};

pub struct MessageHandler<R, N>
where
    R: MessageRepository,
    N: NotificationRepository,
{
    pub repo: R,
    pub notifications: N,
    pub mailer: Option<Mailer>,
    pub limiter: RateLimiterStore,
}

impl<R, N> MessageHandler<R, N>
where
    R: MessageRepository,
    N: NotificationRepository,
{
    pub fn new(repo: R, notifications: N, mailer: Option<Mailer>, limiter: RateLimiterStore) -> Self {
        MessageHandler {
            repo,
            notifications,
            mailer,
            limiter,
        }
    }

    /// Public contact-form submission, rate limited per client IP.
    /// Notification and admin email are best-effort side effects.
    pub async fn submit(
        &self,
        client_ip: &str,
        request: NewMessageRequest,
    ) -> Result<MessageCreatedResponse, AppError> {
        if let Err(retry_after_secs) = self.limiter.check(client_ip) {
            return Err(AppError::RateLimited { retry_after_secs });
        }

        request.validate()?;

        let message = self.repo.create(&request).await?;

        let notification = NewNotificationRequest::for_message(message.id, &message.name);
        if let Err(e) = self.notifications.create(&notification).await {
            tracing::warn!("Failed to create notification for message {}: {}", message.id, e);
        }

        if let Some(mailer) = &self.mailer {
            if let Err(e) = mailer
                .send_contact_notification(
                    &message.name,
                    &message.email,
                    message.subject.as_deref(),
                    &message.content,
                )
                .await
            {
                tracing::warn!("Failed to email admin about message {}: {}", message.id, e);
            }
        }

        Ok(MessageCreatedResponse {
            id: message.id,
            message: "Message received".to_string(),
        })
    }

    pub async fn list(&self, query: &ListMessagesQuery) -> Result<Paginated<Message>, AppError> {
        let (page, per_page) = page_params(query.page, query.per_page);
        let (messages, total) = self.repo.list(query.status, page, per_page).await?;

        Ok(Paginated {
            items: messages,
            total,
            page,
            per_page,
        })
    }

    pub async fn unread_count(&self) -> Result<i64, AppError> {
        self.repo.count_unread().await
    }

    /// Fetching a message marks it read.
    pub async fn get(&self, id: &str) -> Result<Message, AppError> {
        let id = valid_uuid(id)?;
        self.repo.get_marking_read(&id).await.map_err(not_found)
    }

    pub async fn set_status(&self, id: &str, status: MessageStatus) -> Result<Message, AppError> {
        let id = valid_uuid(id)?;
        self.repo.set_status(&id, status).await.map_err(not_found)
    }

    /// Append a reply to the thread and deliver it to the sender when SMTP
    /// is configured. Delivery failure does not undo the stored reply.
    pub async fn reply(&self, id: &str, request: ReplyRequest) -> Result<Message, AppError> {
        request.validate()?;
        let id = valid_uuid(id)?;

        let reply = MessageReply {
            body: request.body,
            sent_at: Utc::now(),
        };

        let message = self
            .repo
            .append_reply(&id, &reply)
            .await
            .map_err(not_found)?;

        if let Some(mailer) = &self.mailer {
            if let Err(e) = mailer
                .send_reply(&message.email, message.subject.as_deref(), &reply.body)
                .await
            {
                tracing::warn!("Failed to deliver reply for message {}: {}", message.id, e);
            }
        }

        Ok(message)
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let id = valid_uuid(id)?;
        self.repo.delete(&id).await
    }

    pub async fn bulk_delete(&self, request: &BulkDeleteMessagesRequest) -> Result<u64, AppError> {
        request.validate()?;
        self.repo.bulk_delete(request).await
    }
}

fn not_found(e: AppError) -> AppError {
    match e {
        AppError::NotFound(_) => AppError::NotFound("Message not found".to_string()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{
        message::MockMessageRepository, notification::MockNotificationRepository,
    };
    use std::time::Duration;
    use uuid::Uuid;

    fn handler(
        repo: MockMessageRepository,
        notifications: MockNotificationRepository,
        limit: u64,
    ) -> MessageHandler<MockMessageRepository, MockNotificationRepository> {
        MessageHandler::new(
            repo,
            notifications,
            None,
            RateLimiterStore::new(limit, Duration::from_secs(3600)),
        )
    }

    fn request() -> NewMessageRequest {
        NewMessageRequest {
            name: "Grace".into(),
            email: "grace@example.test".into(),
            subject: None,
            category: "general".into(),
            message: "Hello there, nice site.".into(),
        }
    }

    fn stored(request: &NewMessageRequest) -> Message {
        Message {
            id: Uuid::new_v4(),
            name: request.name.clone(),
            email: request.email.clone(),
            subject: request.subject.clone(),
            category: request.category.clone(),
            content: request.message.clone(),
            status: MessageStatus::Unread,
            replies: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn submit_creates_message_and_notification() {
        let mut repo = MockMessageRepository::new();
        repo.expect_create().returning(|r| Ok(stored(r)));

        let mut notifications = MockNotificationRepository::new();
        notifications
            .expect_create()
            .times(1)
            .returning(|r| {
                Ok(crate::entities::notification::Notification {
                    id: Uuid::new_v4(),
                    kind: r.kind,
                    title: r.title.clone(),
                    message: r.message.clone(),
                    priority: r.priority,
                    is_read: false,
                    read_at: None,
                    related_id: r.related_id.clone(),
                    related_kind: r.related_kind.clone(),
                    action_url: r.action_url.clone(),
                    created_at: Utc::now(),
                })
            });

        let handler = handler(repo, notifications, 5);
        let response = handler.submit("10.0.0.1", request()).await.unwrap();
        assert_eq!(response.message, "Message received");
    }

    #[tokio::test]
    async fn submit_survives_notification_failure() {
        let mut repo = MockMessageRepository::new();
        repo.expect_create().returning(|r| Ok(stored(r)));

        let mut notifications = MockNotificationRepository::new();
        notifications
            .expect_create()
            .returning(|_| Err(AppError::InternalError("boom".into())));

        let handler = handler(repo, notifications, 5);
        assert!(handler.submit("10.0.0.1", request()).await.is_ok());
    }

    #[tokio::test]
    async fn submit_is_rate_limited_per_ip() {
        let mut repo = MockMessageRepository::new();
        repo.expect_create().returning(|r| Ok(stored(r)));

        let mut notifications = MockNotificationRepository::new();
        notifications.expect_create().returning(|_| {
            Err(AppError::InternalError("unused".into()))
        });

        let handler = handler(repo, notifications, 1);
        assert!(handler.submit("10.0.0.1", request()).await.is_ok());

        let err = handler.submit("10.0.0.1", request()).await.unwrap_err();
        assert!(matches!(err, AppError::RateLimited { .. }));
    }

    #[tokio::test]
    async fn submit_rejects_invalid_email_before_storing() {
        let mut repo = MockMessageRepository::new();
        repo.expect_create().never();

        let handler = handler(repo, MockNotificationRepository::new(), 5);
        let mut bad = request();
        bad.email = "not-an-email".into();

        let err = handler.submit("10.0.0.1", bad).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }
}
