pub mod available;
pub mod download;
pub mod list;
