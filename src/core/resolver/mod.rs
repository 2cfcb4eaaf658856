//! Per-family release resolution.
//!
//! Each software family publishes releases through its own metadata API. A
//! [`ReleaseResolver`] hides that traversal behind two operations: turning a
//! version string into a download URL, and listing the versions on offer.

mod builds;
mod vanilla;

pub use builds::{BuildId, BuildsFlavor, BuildsResolver, LEAF, PAPER};
pub use vanilla::{ReleaseManifest, VanillaResolver, VersionEntry, VersionManifest};

use crate::error::Result;

pub trait ReleaseResolver: Send + Sync {
    /// Family this resolver serves, e.g. "paper".
    fn family(&self) -> &str;

    /// Resolve the server jar download URL for `version`.
    ///
    /// Every call performs a fresh traversal of the upstream API.
    fn get_url(&self, version: &str) -> Result<String>;

    /// Release identifiers in the order they should be offered to a user.
    fn get_versions(&self) -> Result<Vec<String>>;
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::core::http::MockHttpClient;
    use crate::error::McServerError;
    use serde_json::Value;

    /// Mock client answering each listed URL exactly once.
    pub(crate) fn json_routes(routes: Vec<(&str, Value)>) -> MockHttpClient {
        let mut client = MockHttpClient::new();
        for (url, body) in routes {
            let url = url.to_string();
            client
                .expect_get_json()
                .withf(move |u| u == url.as_str())
                .times(1)
                .returning(move |_| Ok(body.clone()));
        }
        client
    }

    /// Add a URL that fails with the given HTTP status.
    pub(crate) fn fail_route(client: &mut MockHttpClient, url: &str, status: u16) {
        let url = url.to_string();
        client
            .expect_get_json()
            .withf({
                let url = url.clone();
                move |u| u == url.as_str()
            })
            .times(1)
            .returning(move |_| {
                Err(McServerError::FetchFailed {
                    url: url.clone(),
                    status: Some(status),
                    reason: format!("HTTP status {status}"),
                })
            });
    }
}
