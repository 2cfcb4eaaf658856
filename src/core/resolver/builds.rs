use super::ReleaseResolver;
use crate::core::http::{fetch_json, HttpClient};
use crate::core::metadata::{Endpoints, LEAF_DATA, PAPER_DATA, VERSIONS_DATA};
use crate::error::{McServerError, Result};
use log::debug;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// What differs between projects served by a builds API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildsFlavor {
    /// Endpoint holding the project document with its `versions` list.
    pub project_endpoint: &'static str,
    /// Key of the server jar in a build's `downloads` section.
    pub artifact: &'static str,
}

pub const PAPER: BuildsFlavor = BuildsFlavor {
    project_endpoint: PAPER_DATA,
    artifact: "application",
};

pub const LEAF: BuildsFlavor = BuildsFlavor {
    project_endpoint: LEAF_DATA,
    artifact: "primary",
};

/// Build identifiers are numbers on PaperMC, but nothing guarantees it
/// for every fork.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum BuildId {
    Number(u64),
    Text(String),
}

impl fmt::Display for BuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildId::Number(n) => write!(f, "{n}"),
            BuildId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProjectIndex {
    versions: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct BuildsIndex {
    builds: Vec<BuildId>,
}

#[derive(Debug, Deserialize)]
struct BuildInfo {
    downloads: HashMap<String, BuildDownload>,
}

#[derive(Debug, Deserialize)]
struct BuildDownload {
    name: String,
}

/// Resolver for PaperMC-style APIs: version, then builds list, then build
/// detail naming the jar.
pub struct BuildsResolver {
    http: Arc<dyn HttpClient>,
    endpoints: Endpoints,
    flavor: BuildsFlavor,
}

impl BuildsResolver {
    pub fn new(http: Arc<dyn HttpClient>, endpoints: Endpoints, flavor: BuildsFlavor) -> Self {
        Self {
            http,
            endpoints,
            flavor,
        }
    }

    /// Latest build of `version`: the last entry in upstream order.
    pub fn latest_build(&self, version: &str) -> Result<BuildId> {
        check_version(version)?;
        let url = format!("{}{version}", self.endpoints.get(VERSIONS_DATA)?);

        let index: BuildsIndex = match fetch_json(self.http.as_ref(), &url) {
            Err(e) if e.status() == Some(404) => {
                return Err(McServerError::UnknownVersion {
                    version: version.to_string(),
                })
            }
            other => other?,
        };

        index
            .builds
            .last()
            .cloned()
            .ok_or_else(|| McServerError::NoBuilds {
                version: version.to_string(),
            })
    }
}

/// Versions are spliced into URL paths, so anything that could change the
/// requested path is rejected up front.
fn check_version(version: &str) -> Result<()> {
    let invalid = version.is_empty()
        || version == "."
        || version.contains("..")
        || version
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '/' | '\\' | '?' | '#' | '%'));

    if invalid {
        return Err(McServerError::UnknownVersion {
            version: version.to_string(),
        });
    }
    Ok(())
}

impl ReleaseResolver for BuildsResolver {
    fn family(&self) -> &str {
        self.endpoints.family()
    }

    fn get_url(&self, version: &str) -> Result<String> {
        let data_url = self.endpoints.get(VERSIONS_DATA)?;

        let build = self.latest_build(version)?;
        debug!("{} {version}: latest build {build}", self.family());

        let build_url = format!("{data_url}{version}/builds/{build}");
        let info: BuildInfo = fetch_json(self.http.as_ref(), &build_url)?;

        let download = info.downloads.get(self.flavor.artifact).ok_or_else(|| {
            McServerError::malformed(
                &build_url,
                format!("no '{}' download listed", self.flavor.artifact),
            )
        })?;

        Ok(format!("{build_url}/downloads/{}", download.name))
    }

    fn get_versions(&self) -> Result<Vec<String>> {
        let url = self.endpoints.get(self.flavor.project_endpoint)?;
        let project: ProjectIndex = fetch_json(self.http.as_ref(), url)?;

        // Upstream lists oldest first.
        Ok(project.versions.into_iter().rev().collect())
    }
}
