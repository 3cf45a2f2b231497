use std::time::Duration;

mod domain;
mod infrastructure;
mod interfaces;
pub mod background_task;
pub mod constants;
pub mod errors;
pub mod graceful_shutdown;
pub mod settings;

pub use domain::{entities, use_cases};
pub use infrastructure::{ai, db, email, imports, limiter, media, utils};
pub use interfaces::{handlers, repositories, routes};

use ai::draft::DraftClient;
use email::mailer::Mailer;
use limiter::rate_limiter::RateLimiterStore;
use media::cdn::CdnClient;
use repositories::sqlx_repo::{
    SqlxBlogPostRepo, SqlxMessageRepo, SqlxNotificationRepo, SqlxOutreachRepo, SqlxPortfolioRepo,
    SqlxProjectRepo, SqlxStatsRepo,
};
use use_cases::{
    blog::BlogHandler, message::MessageHandler, notification::NotificationHandler,
    outreach::OutreachHandler, portfolio::PortfolioHandler, project::ProjectHandler,
    stats::StatsHandler,
};

pub struct AppState {
    pub blog_handler: BlogHandler<SqlxBlogPostRepo>,
    pub project_handler: ProjectHandler<SqlxProjectRepo>,
    pub message_handler: MessageHandler<SqlxMessageRepo, SqlxNotificationRepo>,
    pub notification_handler: NotificationHandler<SqlxNotificationRepo>,
    pub portfolio_handler: PortfolioHandler<SqlxPortfolioRepo>,
    pub outreach_handler: OutreachHandler<SqlxOutreachRepo>,
    pub stats_handler: StatsHandler<SqlxStatsRepo>,
    pub cdn: Option<CdnClient>,
}

impl AppState {
    pub fn new(config: &settings::AppConfig, pool: sqlx::PgPool) -> anyhow::Result<Self> {
        let mailer = Mailer::from_config(config)?;
        let cdn = CdnClient::from_config(config)?;
        let ai = DraftClient::from_config(config)?;

        let limiter = RateLimiterStore::new(
            config.contact_rate_limit,
            Duration::from_secs(config.contact_rate_window_secs),
        );

        let blog_handler = BlogHandler::new(SqlxBlogPostRepo::new(pool.clone()));
        let project_handler = ProjectHandler::new(SqlxProjectRepo::new(pool.clone()), cdn.clone());
        let message_handler = MessageHandler::new(
            SqlxMessageRepo::new(pool.clone()),
            SqlxNotificationRepo::new(pool.clone()),
            mailer,
            limiter,
        );
        let notification_handler =
            NotificationHandler::new(SqlxNotificationRepo::new(pool.clone()));
        let portfolio_handler = PortfolioHandler::new(SqlxPortfolioRepo::new(pool.clone()));
        let outreach_handler = OutreachHandler::new(
            SqlxOutreachRepo::new(pool.clone()),
            ai,
            config.owner_name.clone(),
            config.owner_bio.clone(),
        );
        let stats_handler = StatsHandler::new(SqlxStatsRepo::new(pool));

        Ok(AppState {
            blog_handler,
            project_handler,
            message_handler,
            notification_handler,
            portfolio_handler,
            outreach_handler,
            stats_handler,
            cdn,
        })
    }
}
