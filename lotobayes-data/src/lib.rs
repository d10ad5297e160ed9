pub mod models;
pub mod parser;
pub mod registry;
pub mod source;
