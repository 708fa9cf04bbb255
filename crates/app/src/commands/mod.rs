//! CLI command handlers for the skillsrc application.

mod feedback;
mod generate_index;
mod init;
mod list_skills;
mod sync;
mod upgrade;
mod validate;

pub(crate) use feedback::handle_feedback_command;
pub(crate) use generate_index::handle_generate_index_command;
pub(crate) use init::handle_init_command;
pub(crate) use list_skills::handle_list_skills_command;
pub(crate) use sync::handle_sync_command;
pub(crate) use upgrade::handle_upgrade_command;
pub(crate) use validate::handle_validate_command;
