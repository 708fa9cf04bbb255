use crate::upgrade::{check_for_upgrade, install_release, manual_upgrade_command, UpgradeCheck};
use anyhow::Result;
use skillsrc_sync::GithubClient;

/// Handle the `upgrade` command.
pub(crate) async fn handle_upgrade_command(dry_run: bool) -> Result<()> {
    println!("Checking for updates...");
    let remote = GithubClient::new();
    let check = check_for_upgrade(&remote, env!("CARGO_PKG_VERSION")).await?;

    let (current, latest) = match check {
        UpgradeCheck::UpToDate { current } => {
            println!("  Current version: {current}");
            println!("You are already using the latest version!");
            return Ok(());
        }
        UpgradeCheck::Available { current, latest } => (current, latest),
    };
    println!("  Current version: {current}");
    println!("  Latest version:  {latest}");

    if dry_run {
        println!("A new version ({latest}) is available! Run without --dry-run to upgrade.");
        return Ok(());
    }

    println!("Upgrading to v{latest}...");
    match install_release(&latest) {
        Ok(()) => println!("Successfully upgraded to v{latest}!"),
        Err(e) => {
            tracing::warn!(error = %e, "Automatic upgrade failed");
            println!("Automatic upgrade failed.");
            println!("Please run manually: {}", manual_upgrade_command());
        }
    }
    Ok(())
}
