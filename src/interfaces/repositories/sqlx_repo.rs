use sqlx::PgPool;

#[derive(Clone)]
pub struct SqlxBlogPostRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxProjectRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxMessageRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxNotificationRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxPortfolioRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxOutreachRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxStatsRepo {
    pub pool: PgPool,
}
