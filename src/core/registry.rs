//! Supported software families and the public download surface.

use crate::core::config::Config;
use crate::core::download::ServerDownloader;
use crate::core::http::{HttpClient, RetryPolicy, RetryingClient, UreqClient};
use crate::core::metadata::{BuiltinMetadata, FileMetadata, MetadataSource};
use crate::core::resolver::{BuildsResolver, ReleaseResolver, VanillaResolver, LEAF, PAPER};
use crate::error::{McServerError, Result};
use log::debug;
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Family {
    Vanilla,
    Paper,
    Leaf,
}

impl Family {
    pub fn name(self) -> &'static str {
        match self {
            Family::Vanilla => "vanilla",
            Family::Paper => "paper",
            Family::Leaf => "leaf",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoftwareStatus {
    Active,
    /// Known family whose resolver is switched off.
    Disabled {
        reason: &'static str,
    },
    Unknown,
}

struct RegistryEntry {
    family: Family,
    disabled: Option<&'static str>,
}

const REGISTRY: &[RegistryEntry] = &[
    RegistryEntry {
        family: Family::Vanilla,
        disabled: None,
    },
    RegistryEntry {
        family: Family::Paper,
        disabled: None,
    },
    RegistryEntry {
        family: Family::Leaf,
        disabled: Some("the LeafMC API rejects build requests"),
    },
];

fn entry(name: &str) -> Option<&'static RegistryEntry> {
    REGISTRY.iter().find(|e| e.family.name() == name)
}

pub fn software_status(name: &str) -> SoftwareStatus {
    match entry(name).map(|e| e.disabled) {
        Some(Some(reason)) => SoftwareStatus::Disabled { reason },
        Some(None) => SoftwareStatus::Active,
        None => SoftwareStatus::Unknown,
    }
}

/// Every registered family with its status, in registry order.
pub fn all_software() -> Vec<(Family, SoftwareStatus)> {
    REGISTRY
        .iter()
        .map(|e| (e.family, software_status(e.family.name())))
        .collect()
}

/// Names of the families that can currently be downloaded.
pub fn list_software_families() -> BTreeSet<String> {
    all_software()
        .into_iter()
        .filter(|(_, status)| *status == SoftwareStatus::Active)
        .map(|(family, _)| family.name().to_string())
        .collect()
}

/// Map a family name to an active family.
pub fn lookup(name: &str) -> Result<Family> {
    match (entry(name), software_status(name)) {
        (Some(e), SoftwareStatus::Active) => Ok(e.family),
        (_, SoftwareStatus::Disabled { reason }) => Err(McServerError::SoftwareDisabled {
            name: name.to_string(),
            reason: reason.to_string(),
        }),
        _ => Err(McServerError::UnknownSoftware {
            name: name.to_string(),
        }),
    }
}

/// Entry point tying the HTTP client and metadata lookup to the family
/// resolvers.
pub struct ServerManager {
    http: Arc<dyn HttpClient>,
    metadata: Arc<dyn MetadataSource>,
}

impl ServerManager {
    pub fn new(http: Arc<dyn HttpClient>, metadata: Arc<dyn MetadataSource>) -> Self {
        Self { http, metadata }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let client = UreqClient::new(
            Duration::from_secs(config.timeout_secs),
            config.user_agent.clone(),
        );
        let http: Arc<dyn HttpClient> = if config.retries > 0 {
            let policy = RetryPolicy::with_retries(
                config.retries,
                Duration::from_millis(config.retry_backoff_ms),
            );
            Arc::new(RetryingClient::new(client, policy))
        } else {
            Arc::new(client)
        };

        let metadata: Arc<dyn MetadataSource> = match &config.metadata_file {
            Some(path) => {
                debug!("Loading endpoint metadata from {}", path.display());
                Arc::new(FileMetadata::load(path)?)
            }
            None => Arc::new(BuiltinMetadata),
        };

        Ok(Self::new(http, metadata))
    }

    /// Build the resolver for `name`.
    ///
    /// Unknown and disabled families fail before any metadata lookup or
    /// network access.
    pub fn get_resolver(&self, name: &str) -> Result<Box<dyn ReleaseResolver>> {
        self.resolver_for(lookup(name)?)
    }

    /// Build a resolver for `family` regardless of its registry status.
    pub fn resolver_for(&self, family: Family) -> Result<Box<dyn ReleaseResolver>> {
        let endpoints = self.metadata.endpoints(family.name())?;
        let http = Arc::clone(&self.http);

        Ok(match family {
            Family::Vanilla => Box::new(VanillaResolver::new(http, endpoints)),
            Family::Paper => Box::new(BuildsResolver::new(http, endpoints, PAPER)),
            Family::Leaf => Box::new(BuildsResolver::new(http, endpoints, LEAF)),
        })
    }

    pub fn get_downloader(&self, name: &str) -> Result<ServerDownloader> {
        let resolver = self.get_resolver(name)?;
        Ok(ServerDownloader::new(resolver, Arc::clone(&self.http)))
    }

    pub fn get_versions(&self, family: &str) -> Result<Vec<String>> {
        self.get_downloader(family)?.get_versions()
    }

    pub fn get_url(&self, family: &str, version: &str) -> Result<String> {
        self.get_downloader(family)?.get_url(version)
    }

    pub fn download(&self, family: &str, version: &str, destination: &Path) -> Result<PathBuf> {
        self.get_downloader(family)?.download(version, destination)
    }
}
