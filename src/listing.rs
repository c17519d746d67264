//! Locally cached opportunity listing
//!
//! The listing never talks to the backend. It learns about accepted
//! proposals from [`ProposalSubmitted`] events.

use crate::error::Error;
use crate::submit::{Phase, ProgressCallback, ProposalPayload, ProposalSubmitted};
use crate::types::Opportunity;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Opportunities as last seen by the provider
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpportunityListing {
    opportunities: Vec<Opportunity>,
}

impl OpportunityListing {
    /// Listing over `opportunities`, in display order
    pub const fn new(opportunities: Vec<Opportunity>) -> Self {
        Self { opportunities }
    }

    /// Look up an opportunity by id
    pub fn get(&self, id: &str) -> Option<&Opportunity> {
        self.opportunities.iter().find(|o| o.id == id)
    }

    /// All cached opportunities
    pub fn opportunities(&self) -> &[Opportunity] {
        &self.opportunities
    }

    /// Apply a submission event
    ///
    /// Returns whether anything changed. Unknown ids and repeated events
    /// are ignored.
    pub fn apply(&mut self, event: &ProposalSubmitted) -> bool {
        let changed = self
            .opportunities
            .iter_mut()
            .find(|o| o.id == event.opportunity_id)
            .is_some_and(Opportunity::record_submission);
        if changed {
            debug!("Marked {} as proposed", event.opportunity_id);
        }
        changed
    }
}

/// Progress subscriber that keeps a shared listing current
#[derive(Debug, Clone, Default)]
pub struct ListingSubscriber {
    listing: Arc<Mutex<OpportunityListing>>,
}

impl ListingSubscriber {
    /// Subscribe `listing` to submission events
    pub const fn new(listing: Arc<Mutex<OpportunityListing>>) -> Self {
        Self { listing }
    }

    /// The shared listing
    pub fn listing(&self) -> Arc<Mutex<OpportunityListing>> {
        Arc::clone(&self.listing)
    }
}

#[async_trait]
impl ProgressCallback for ListingSubscriber {
    async fn on_phase(&self, _phase: Phase) {}
    async fn on_payload(&self, _payload: &ProposalPayload) {}

    async fn on_submitted(&self, event: &ProposalSubmitted) {
        // A poisoned lock still holds a usable listing
        let mut listing = self
            .listing
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        listing.apply(event);
    }

    async fn on_error(&self, _error: &Error) {}
    async fn on_message(&self, _message: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opportunity(id: &str, proposals: u32) -> Opportunity {
        serde_json::from_value(serde_json::json!({ "id": id, "proposals": proposals })).unwrap()
    }

    fn event(id: &str) -> ProposalSubmitted {
        ProposalSubmitted {
            opportunity_id: id.to_string(),
            message: None,
        }
    }

    #[test]
    fn test_apply_marks_matching_opportunity() {
        let mut listing = OpportunityListing::new(vec![opportunity("a", 2), opportunity("b", 7)]);

        assert!(listing.apply(&event("b")));

        let b = listing.get("b").unwrap();
        assert!(b.has_submitted);
        assert_eq!(b.proposals, 8);
        assert!(!listing.get("a").unwrap().has_submitted);
    }

    #[test]
    fn test_apply_unknown_or_repeated() {
        let mut listing = OpportunityListing::new(vec![opportunity("a", 0)]);
        assert!(!listing.apply(&event("zzz")));
        assert!(listing.apply(&event("a")));
        assert!(!listing.apply(&event("a")));
        assert_eq!(listing.get("a").unwrap().proposals, 1);
    }

    #[test]
    fn test_subscriber_updates_shared_listing() {
        let shared = Arc::new(Mutex::new(OpportunityListing::new(vec![opportunity("a", 0)])));
        let subscriber = ListingSubscriber::new(Arc::clone(&shared));

        tokio_test::block_on(subscriber.on_submitted(&event("a")));

        assert!(shared.lock().unwrap().get("a").unwrap().has_submitted);
    }
}
