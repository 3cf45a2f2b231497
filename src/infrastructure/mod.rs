pub mod ai;
pub mod db;
pub mod email;
pub mod imports;
pub mod limiter;
pub mod media;
pub mod utils;
