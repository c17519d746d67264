//! Proposal service factory
//!
//! Creates the submission service from configuration.

use crate::auth::get_auth;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::service::{HttpProposalService, ProposalService};

/// Create a proposal service from configuration
///
/// Handles authentication and client construction.
pub fn create_proposal_service(
    config: &ClientConfig,
    token_flag: Option<&str>,
) -> Result<Box<dyn ProposalService>> {
    let auth = get_auth(token_flag)?;
    Ok(Box::new(HttpProposalService::new(config, auth.token)?))
}
