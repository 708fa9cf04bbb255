use anyhow::{bail, Result};
use skillsrc_validate::{
    find_project_root, validate_registry, Severity, ValidationRun, ValidationScope,
};
use std::path::Path;

/// Handle the `validate` command.
pub(crate) fn handle_validate_command(cwd: &Path, all: bool) -> Result<()> {
    let scope = if all {
        ValidationScope::All
    } else {
        ValidationScope::Changed
    };
    let run = validate_registry(&find_project_root(cwd), scope)?;
    print!("{}", format_run(&run));

    if run.failed() {
        bail!("Validation failed");
    }
    Ok(())
}

fn format_run(run: &ValidationRun) -> String {
    let mut out = String::new();
    if run.results.is_empty() {
        out.push_str("No skills to validate.\n");
    }
    for result in &run.results {
        let status = if result.passed() { "ok" } else { "FAIL" };
        out.push_str(&format!("{status:>4}  {}\n", result.path.display()));
        for issue in &result.issues {
            let label = match issue.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
                _ => "info",
            };
            out.push_str(&format!("      {label}: {issue}\n"));
            if let Some(suggestion) = &issue.suggestion {
                out.push_str(&format!("        hint: {suggestion}\n"));
            }
        }
    }

    match &run.metadata_error {
        Some(error) => out.push_str(&format!("\n{error}\n")),
        None => {
            for (category, version, prefix) in &run.categories {
                let line = format!("  {category}: {version} (tag {prefix}{version})\n");
                out.push_str(&line);
            }
        }
    }

    out.push_str(&format!(
        "\nValidated {} skills: {} passed, {} failed, {} warnings\n",
        run.summary.total, run.summary.passed, run.summary.failed, run.summary.warnings
    ));
    out
}
