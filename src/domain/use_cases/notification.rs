use validator::Validate;

use crate::{
    entities::{
        notification::{
            BulkDeleteNotificationsRequest, ListNotificationsQuery, NewNotificationRequest,
            Notification,
        },
        Paginated,
    },
    errors::AppError,
    repositories::notification::NotificationRepository,
    use_cases::page_params,
    utils::valid_uuid::valid_uuid,
};

pub struct NotificationHandler<R>
where
    R: NotificationRepository,
{
    pub repo: R,
}

impl<R> NotificationHandler<R>
where
    R: NotificationRepository,
{
    pub fn new(repo: R) -> Self {
        NotificationHandler { repo }
    }

    pub async fn create(&self, request: NewNotificationRequest) -> Result<Notification, AppError> {
        request.validate()?;
        self.repo.create(&request).await
    }

    pub async fn list(
        &self,
        query: &ListNotificationsQuery,
    ) -> Result<Paginated<Notification>, AppError> {
        let (page, per_page) = page_params(query.page, query.per_page);
        let (notifications, total) = self.repo.list(query, page, per_page).await?;

        Ok(Paginated {
            items: notifications,
            total,
            page,
            per_page,
        })
    }

    pub async fn unread_count(&self) -> Result<i64, AppError> {
        self.repo.count_unread().await
    }

    pub async fn mark_read(&self, id: &str) -> Result<Notification, AppError> {
        let id = valid_uuid(id)?;
        self.repo.mark_read(&id).await.map_err(not_found)
    }

    /// Returns the number of notifications flipped to read.
    pub async fn mark_all_read(&self) -> Result<u64, AppError> {
        self.repo.mark_all_read().await
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let id = valid_uuid(id)?;
        self.repo.delete(&id).await
    }

    pub async fn bulk_delete(
        &self,
        request: &BulkDeleteNotificationsRequest,
    ) -> Result<u64, AppError> {
        request.validate()?;
        self.repo.bulk_delete(request).await
    }
}

fn not_found(e: AppError) -> AppError {
    match e {
        AppError::NotFound(_) => AppError::NotFound("Notification not found".to_string()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::notification::MockNotificationRepository;
    use uuid::Uuid;

    #[tokio::test]
    async fn malformed_id_is_rejected_before_the_repo() {
        let mut repo = MockNotificationRepository::new();
        repo.expect_mark_read().never();

        let handler = NotificationHandler::new(repo);
        let err = handler.mark_read("not-a-uuid").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn bulk_delete_requires_exactly_one_mode() {
        let mut repo = MockNotificationRepository::new();
        repo.expect_bulk_delete().never();

        let handler = NotificationHandler::new(repo);
        let ambiguous = BulkDeleteNotificationsRequest {
            ids: Some(vec![Uuid::new_v4()]),
            older_than_days: Some(7),
            read_only: false,
        };

        assert!(handler.bulk_delete(&ambiguous).await.is_err());
    }
}
