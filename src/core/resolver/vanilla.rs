use super::ReleaseResolver;
use crate::core::http::{fetch_json, HttpClient};
use crate::core::metadata::{Endpoints, VERSION_MANIFEST};
use crate::error::{McServerError, Result};
use log::debug;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

const RELEASE_TYPE: &str = "release";
const SERVER_DOWNLOAD: &str = "server";

#[derive(Debug, Clone, Deserialize)]
pub struct VersionManifest {
    pub versions: Vec<VersionEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VersionEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// Location of this version's [`ReleaseManifest`].
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseManifest {
    #[serde(default)]
    pub downloads: HashMap<String, ReleaseDownload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseDownload {
    pub url: String,
    pub sha1: Option<String>,
    pub size: Option<u64>,
}

impl VersionManifest {
    /// Exact, case-sensitive lookup by version id.
    pub fn find(&self, version: &str) -> Option<&VersionEntry> {
        self.versions.iter().find(|v| v.id == version)
    }

    pub fn release_ids(&self) -> Vec<String> {
        self.versions
            .iter()
            .filter(|v| v.kind == RELEASE_TYPE)
            .map(|v| v.id.clone())
            .collect()
    }
}

/// Mojang's manifest-of-manifests: the top-level version manifest points at a
/// per-version manifest which carries the server jar URL.
pub struct VanillaResolver {
    http: Arc<dyn HttpClient>,
    endpoints: Endpoints,
}

impl VanillaResolver {
    pub fn new(http: Arc<dyn HttpClient>, endpoints: Endpoints) -> Self {
        Self { http, endpoints }
    }

    fn fetch_manifest(&self) -> Result<VersionManifest> {
        let url = self.endpoints.get(VERSION_MANIFEST)?;
        fetch_json(self.http.as_ref(), url)
    }
}

impl ReleaseResolver for VanillaResolver {
    fn family(&self) -> &str {
        self.endpoints.family()
    }

    fn get_url(&self, version: &str) -> Result<String> {
        let manifest = self.fetch_manifest()?;

        let entry = manifest
            .find(version)
            .ok_or_else(|| McServerError::UnknownVersion {
                version: version.to_string(),
            })?;
        debug!("Vanilla {version} release manifest: {}", entry.url);

        let release: ReleaseManifest = fetch_json(self.http.as_ref(), &entry.url)?;

        // Versions before 1.2.5 have no server download at all.
        release
            .downloads
            .get(SERVER_DOWNLOAD)
            .map(|download| download.url.clone())
            .ok_or_else(|| McServerError::malformed(&entry.url, "no server download listed"))
    }

    fn get_versions(&self) -> Result<Vec<String>> {
        Ok(self.fetch_manifest()?.release_ids())
    }
}
