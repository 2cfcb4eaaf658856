//! mcserver library
//!
//! Resolves Minecraft server jar download URLs for each supported server
//! software family and streams the jars to disk. The `mcserver` CLI is a thin
//! layer over [`core::registry::ServerManager`].

pub mod commands;
pub mod core;
pub mod error;
pub mod utils;

pub use crate::core::registry::{
    list_software_families, software_status, ServerManager, SoftwareStatus,
};
pub use crate::error::{McServerError, Result};
