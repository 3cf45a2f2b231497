pub mod get_client_ip;
pub mod sanitize;
pub mod template_vars;
pub mod valid_uuid;
