pub mod mapping;
pub mod table;
