use crate::{
    entities::dashboard::{ActivityItem, DashboardStats},
    errors::AppError,
    repositories::stats::StatsRepository,
};

const TRENDING_LIMIT: i64 = 5;
const ACTIVITY_FETCH: i64 = 10;
const ACTIVITY_LIMIT: usize = 10;

pub struct StatsHandler<R>
where
    R: StatsRepository,
{
    pub repo: R,
}

impl<R> StatsHandler<R>
where
    R: StatsRepository,
{
    pub fn new(repo: R) -> Self {
        StatsHandler { repo }
    }

    /// One dashboard payload assembled from the per-resource counts plus a
    /// merged recent-activity feed.
    pub async fn dashboard(&self) -> Result<DashboardStats, AppError> {
        let blogs = self.repo.blog_counts().await?;
        let trending_posts = self.repo.trending_posts(TRENDING_LIMIT).await?;
        let projects = self.repo.project_counts().await?;
        let messages = self.repo.message_counts().await?;
        let unread_notifications = self.repo.unread_notifications().await?;
        let skill_count = self.repo.skill_count().await?;

        let mut recent_activity: Vec<ActivityItem> = Vec::new();
        for (id, name, occurred_at) in self.repo.recent_messages(ACTIVITY_FETCH).await? {
            recent_activity.push(ActivityItem {
                kind: "message",
                id,
                title: format!("Message from {}", name),
                occurred_at,
            });
        }
        for (id, title, occurred_at) in self.repo.recent_published_posts(ACTIVITY_FETCH).await? {
            recent_activity.push(ActivityItem {
                kind: "blog_post",
                id,
                title,
                occurred_at,
            });
        }
        recent_activity.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
        recent_activity.truncate(ACTIVITY_LIMIT);

        Ok(DashboardStats {
            blogs,
            trending_posts,
            projects,
            messages,
            unread_notifications,
            skill_count,
            recent_activity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::dashboard::{BlogCounts, MessageCounts, ProjectStatusCounts};
    use crate::repositories::stats::MockStatsRepository;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn quiet_repo() -> MockStatsRepository {
        let mut repo = MockStatsRepository::new();
        repo.expect_blog_counts().returning(|| {
            Ok(BlogCounts {
                total: 4,
                published: 3,
                draft: 1,
            })
        });
        repo.expect_trending_posts().returning(|_| Ok(vec![]));
        repo.expect_project_counts().returning(|| {
            Ok(ProjectStatusCounts {
                total: 2,
                active: 1,
                completed: 1,
                archived: 0,
                featured: 1,
            })
        });
        repo.expect_message_counts().returning(|| Ok(MessageCounts { total: 5, unread: 2 }));
        repo.expect_unread_notifications().returning(|| Ok(3));
        repo.expect_skill_count().returning(|| Ok(8));
        repo
    }

    #[tokio::test]
    async fn activity_feed_merges_sources_newest_first() {
        let now = Utc::now();
        let mut repo = quiet_repo();

        let older = now - Duration::hours(2);
        let newest = now;
        let middle = now - Duration::hours(1);

        repo.expect_recent_messages().returning(move |_| {
            Ok(vec![
                (Uuid::new_v4(), "Grace".to_string(), older),
                (Uuid::new_v4(), "Hank".to_string(), newest),
            ])
        });
        repo.expect_recent_published_posts().returning(move |_| {
            Ok(vec![(Uuid::new_v4(), "Launch notes".to_string(), middle)])
        });

        let handler = StatsHandler::new(repo);
        let stats = handler.dashboard().await.unwrap();

        let kinds: Vec<&str> = stats.recent_activity.iter().map(|a| a.kind).collect();
        assert_eq!(kinds, vec!["message", "blog_post", "message"]);
        assert_eq!(stats.recent_activity[0].title, "Message from Hank");
    }

    #[tokio::test]
    async fn activity_feed_is_truncated() {
        let now = Utc::now();
        let mut repo = quiet_repo();

        repo.expect_recent_messages().returning(move |_| {
            Ok((0..10)
                .map(|i| (Uuid::new_v4(), format!("Visitor {}", i), now - Duration::minutes(i)))
                .collect())
        });
        repo.expect_recent_published_posts().returning(move |_| {
            Ok((0..10)
                .map(|i| (Uuid::new_v4(), format!("Post {}", i), now - Duration::minutes(i + 20)))
                .collect())
        });

        let handler = StatsHandler::new(repo);
        let stats = handler.dashboard().await.unwrap();

        assert_eq!(stats.recent_activity.len(), 10);
    }
}
