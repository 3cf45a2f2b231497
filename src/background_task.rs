use tokio::time::{interval, Duration};

use crate::repositories::{notification::NotificationRepository, sqlx_repo::SqlxNotificationRepo};

/// Daily sweep that deletes read notifications older than the configured
/// retention age.
pub async fn start_notification_purge_task(repo: SqlxNotificationRepo, retention_days: i64) {
    let mut interval = interval(Duration::from_secs(60 * 60 * 24));

    loop {
        interval.tick().await;

        match repo.purge_read_older_than(retention_days).await {
            Ok(count) => tracing::info!("Purged {} expired notifications", count),
            Err(e) => tracing::error!("Notification purge failed: {}", e)
        }
    }
}
