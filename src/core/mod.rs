pub mod config;
pub mod download;
pub mod http;
pub mod metadata;
pub mod registry;
pub mod resolver;
