//! Command-line interface for the `skillsrc` application.
//!
//! This crate serves as the main entry point for the executable, delegating
//! its core functionality to the `skillsrc-app` crate.

fn main() -> anyhow::Result<()> {
    skillsrc_app::run()
}
