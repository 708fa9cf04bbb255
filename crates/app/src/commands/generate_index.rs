use anyhow::{bail, Result};
use skillsrc_sync::{generate_fragments, write_fragments};
use std::path::Path;

/// Handle the `generate-index` command.
pub(crate) fn handle_generate_index_command(skills_dir: &Path) -> Result<()> {
    if !skills_dir.is_dir() {
        bail!("Skills directory not found: {}", skills_dir.display());
    }
    let fragments = generate_fragments(skills_dir);
    let path = write_fragments(skills_dir, &fragments)?;
    println!(
        "Generated indices for {} frameworks in {}",
        fragments.len(),
        path.display()
    );
    Ok(())
}
