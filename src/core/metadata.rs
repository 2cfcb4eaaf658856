//! Named API endpoints for each server software family.

use crate::error::{McServerError, Result};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

pub const VERSION_MANIFEST: &str = "version-manifest";
pub const VERSIONS_DATA: &str = "versions-data";
pub const PAPER_DATA: &str = "paper-data";
pub const LEAF_DATA: &str = "leaf-data";

/// Endpoint name to URL (or URL prefix) for one family.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Endpoints {
    family: String,
    urls: BTreeMap<String, String>,
}

impl Endpoints {
    pub fn new<F, I, K, V>(family: F, urls: I) -> Self
    where
        F: Into<String>,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            family: family.into(),
            urls: urls
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn get(&self, endpoint: &str) -> Result<&str> {
        self.urls
            .get(endpoint)
            .map(String::as_str)
            .ok_or_else(|| McServerError::MissingEndpoint {
                family: self.family.clone(),
                endpoint: endpoint.to_string(),
            })
    }
}

/// Lookup service mapping a family name to its endpoints.
pub trait MetadataSource: Send + Sync {
    fn endpoints(&self, family: &str) -> Result<Endpoints>;
}

/// Upstream endpoints compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinMetadata;

impl MetadataSource for BuiltinMetadata {
    fn endpoints(&self, family: &str) -> Result<Endpoints> {
        let urls: &[(&str, &str)] = match family {
            "vanilla" => &[(
                VERSION_MANIFEST,
                "https://piston-meta.mojang.com/mc/game/version_manifest_v2.json",
            )],
            "paper" => &[
                (
                    VERSIONS_DATA,
                    "https://api.papermc.io/v2/projects/paper/versions/",
                ),
                (PAPER_DATA, "https://api.papermc.io/v2/projects/paper"),
            ],
            "leaf" => &[
                (
                    VERSIONS_DATA,
                    "https://api.leafmc.one/v2/projects/leaf/versions/",
                ),
                (LEAF_DATA, "https://api.leafmc.one/v2/projects/leaf"),
            ],
            _ => {
                return Err(McServerError::MetadataNotFound {
                    family: family.to_string(),
                })
            }
        };

        Ok(Endpoints::new(family, urls.iter().copied()))
    }
}

/// Endpoint table read from a TOML document, one table per family:
///
/// ```toml
/// [paper]
/// versions-data = "https://api.papermc.io/v2/projects/paper/versions/"
/// paper-data = "https://api.papermc.io/v2/projects/paper"
/// ```
#[derive(Debug, Clone, Default)]
pub struct FileMetadata {
    families: HashMap<String, Endpoints>,
}

impl FileMetadata {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let raw: HashMap<String, BTreeMap<String, String>> = toml::from_str(content)
            .map_err(|e| McServerError::config_error(format!("invalid metadata file: {e}")))?;

        let families = raw
            .into_iter()
            .map(|(family, urls)| {
                let endpoints = Endpoints::new(family.as_str(), urls);
                (family, endpoints)
            })
            .collect();

        Ok(Self { families })
    }
}

impl MetadataSource for FileMetadata {
    fn endpoints(&self, family: &str) -> Result<Endpoints> {
        self.families
            .get(family)
            .cloned()
            .ok_or_else(|| McServerError::MetadataNotFound {
                family: family.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_endpoints() {
        let vanilla = BuiltinMetadata.endpoints("vanilla").unwrap();
        assert!(vanilla.get(VERSION_MANIFEST).unwrap().ends_with(".json"));

        let paper = BuiltinMetadata.endpoints("paper").unwrap();
        assert!(paper.get(VERSIONS_DATA).unwrap().ends_with('/'));
        assert!(paper.get(PAPER_DATA).is_ok());

        let leaf = BuiltinMetadata.endpoints("leaf").unwrap();
        assert!(leaf.get(LEAF_DATA).is_ok());
    }

    #[test]
    fn test_builtin_unknown_family() {
        let err = BuiltinMetadata.endpoints("bedrock").unwrap_err();
        assert!(matches!(err, McServerError::MetadataNotFound { .. }));
    }

    #[test]
    fn test_missing_endpoint() {
        let vanilla = BuiltinMetadata.endpoints("vanilla").unwrap();
        match vanilla.get(PAPER_DATA).unwrap_err() {
            McServerError::MissingEndpoint { family, endpoint } => {
                assert_eq!(family, "vanilla");
                assert_eq!(endpoint, PAPER_DATA);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_metadata_file() {
        let content = r#"
[paper]
versions-data = "http://localhost:9000/paper/versions/"
paper-data = "http://localhost:9000/paper"

[vanilla]
version-manifest = "http://localhost:9000/manifest.json"
"#;

        let metadata = FileMetadata::parse(content).unwrap();
        let paper = metadata.endpoints("paper").unwrap();
        assert_eq!(paper.family(), "paper");
        assert_eq!(
            paper.get(VERSIONS_DATA).unwrap(),
            "http://localhost:9000/paper/versions/"
        );
        assert!(metadata.endpoints("leaf").is_err());
    }

    #[test]
    fn test_parse_invalid_metadata_file() {
        let err = FileMetadata::parse("[paper]\nversions-data = 3").unwrap_err();
        assert!(matches!(err, McServerError::ConfigError { .. }));
    }

    #[test]
    fn test_load_metadata_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("software.toml");
        std::fs::write(&path, "[vanilla]\nversion-manifest = \"http://localhost/m.json\"\n")
            .unwrap();

        let metadata = FileMetadata::load(&path).unwrap();
        assert!(metadata.endpoints("vanilla").is_ok());
    }
}
