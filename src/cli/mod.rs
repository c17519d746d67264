//! CLI commands
//!
//! Command implementations for the `bidline` binary.

mod auth;
mod draft;
mod progress;
mod style;
mod submit;
mod validate;

pub use auth::{run_auth_setup, run_auth_test};
pub use draft::{
    run_attach, run_detach, run_milestone_add, run_milestone_move, run_milestone_remove,
    run_milestone_update, run_new, run_set, run_show, MilestoneArgs,
};
pub use submit::{run_submit, SubmitOptions};
pub use validate::run_validate;
