use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

/// Words-per-minute figure used for the fallback read-time estimate.
pub const READ_TIME_WPM: usize = 200;

/// Hard cap on scheduled follow-ups per outreach email.
pub const MAX_FOLLOW_UPS: i32 = 2;

/// Upload size ceiling for images forwarded to the CDN.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
