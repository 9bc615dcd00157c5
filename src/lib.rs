pub mod config;
pub mod errors;
pub mod http;
pub mod mcp;
pub mod store;
pub mod types;
