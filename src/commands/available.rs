use crate::core::registry::ServerManager;
use anyhow::Result;

pub fn list_available_versions(
    manager: &ServerManager,
    family: &str,
    limit: Option<usize>,
) -> Result<()> {
    let versions = manager.get_versions(family)?;

    if versions.is_empty() {
        println!("No {family} releases available.");
        return Ok(());
    }

    println!("Available {family} versions:");

    let shown = limit.unwrap_or(versions.len()).min(versions.len());
    for version in &versions[..shown] {
        println!("  {version}");
    }
    if shown < versions.len() {
        println!(
            "  ... and {} more (use --all to list every version)",
            versions.len() - shown
        );
    }

    println!();
    println!("Download: mcserver download {family} <version>");

    Ok(())
}
