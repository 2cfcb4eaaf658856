use crate::core::config::Config;
use crate::core::registry::ServerManager;
use anyhow::{Context, Result};
use dialoguer::Select;
use std::path::PathBuf;

pub fn download_server(
    manager: &ServerManager,
    config: &Config,
    family: &str,
    version: Option<&str>,
    output: Option<PathBuf>,
) -> Result<()> {
    // Resolve the downloader first so unknown software fails before any prompt.
    let downloader = manager.get_downloader(family)?;

    let version = match version {
        Some(version) => version.to_string(),
        None => {
            println!("Fetching available {family} versions...");
            let versions = downloader.get_versions()?;
            if versions.is_empty() {
                return Err(anyhow::anyhow!("No {family} releases available"));
            }

            let selection = Select::new()
                .with_prompt(format!("Select {family} version"))
                .items(&versions)
                .default(0)
                .interact()?;
            versions[selection].clone()
        }
    };

    let destination = output.unwrap_or_else(|| config.get_server_jar(family, &version));

    println!("Downloading {family} {version}...");
    let path = downloader
        .download(&version, &destination)
        .with_context(|| format!("Failed to download {family} {version}"))?;

    println!("Downloaded to {}", path.display());
    Ok(())
}

pub fn print_download_url(manager: &ServerManager, family: &str, version: &str) -> Result<()> {
    let url = manager.get_url(family, version)?;
    println!("{url}");
    Ok(())
}
