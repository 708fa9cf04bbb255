use anyhow::{Context, Result};
use skillsrc_state::{download_concurrency, ConfigStore, FileConfigStore};
use skillsrc_sync::{GithubClient, RemoteRepository, SyncReport, SyncService};
use std::path::Path;

/// Handle the `sync` command.
pub(crate) async fn handle_sync_command(root: &Path) -> Result<()> {
    let report = sync_project(root, GithubClient::new()).await?;
    for skipped in &report.files.skipped {
        println!("  skipped: {}", skipped.description());
        if let Some(guidance) = skipped.guidance() {
            println!("           {guidance}");
        }
    }
    Ok(())
}

/// Runs the full sync for the project at `root` and prints its summary.
pub(crate) async fn sync_project<R: RemoteRepository>(
    root: &Path,
    remote: R,
) -> Result<SyncReport> {
    let store = FileConfigStore::with_root(root);
    let config = store
        .load()?
        .context(".skillsrc not found. Run `skillsrc init` first")?;
    println!("Syncing skills from {}...", config.registry);

    let service = SyncService::new(root, remote, store).with_concurrency(download_concurrency());
    let report = service.run().await.context("Sync failed")?;
    print!("{}", report.format_summary(&config.registry));
    Ok(report)
}
