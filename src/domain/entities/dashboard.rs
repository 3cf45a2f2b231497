//! Read-only aggregation shapes for the admin dashboard.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub blogs: BlogCounts,
    pub trending_posts: Vec<TrendingPost>,
    pub projects: ProjectStatusCounts,
    pub messages: MessageCounts,
    pub unread_notifications: i64,
    pub skill_count: i64,
    pub recent_activity: Vec<ActivityItem>,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct BlogCounts {
    pub total: i64,
    pub published: i64,
    pub draft: i64,
}

/// Scored `views + 5*likes + 10*comments`; the weights favour the rarer
/// signals.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct TrendingPost {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub views: i64,
    pub likes: i64,
    pub comments: i64,
    pub score: i64,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct ProjectStatusCounts {
    pub total: i64,
    pub active: i64,
    pub completed: i64,
    pub archived: i64,
    pub featured: i64,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct MessageCounts {
    pub total: i64,
    pub unread: i64,
}

#[derive(Debug, Serialize)]
pub struct ActivityItem {
    pub kind: &'static str,
    pub id: Uuid,
    pub title: String,
    pub occurred_at: DateTime<Utc>,
}
