//! bidline - proposal drafting and submission for marketplace bids
//!
//! A provider bids on an opportunity with a draft proposal: a bid amount,
//! a delivery timeline, a cover letter, and an ordered list of milestones
//! whose amounts must add up to the bid exactly. This crate owns that
//! draft, validates it against the opportunity's constraints, and packages
//! it for the marketplace's submission endpoint.

pub mod auth;
pub mod config;
pub mod draft;
pub mod error;
pub mod listing;
pub mod service;
pub mod session;
pub mod submit;
pub mod types;
pub mod validate;
