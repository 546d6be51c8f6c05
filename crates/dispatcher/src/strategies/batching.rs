//! BatchingStrategy - hands messages to the batching collaborator

use contracts::{BatchCollaborator, Delivery, DeliveryStrategy, Destination, Message, Outcome};
use tracing::{debug, instrument, warn};

use crate::policy::BatchingRoute;

pub struct BatchingStrategy<C> {
    route: BatchingRoute,
    collaborator: C,
}

impl<C> BatchingStrategy<C> {
    pub fn new(route: BatchingRoute, collaborator: C) -> Self {
        Self {
            route,
            collaborator,
        }
    }

    pub fn collaborator(&self) -> &C {
        &self.collaborator
    }
}

impl<C: BatchCollaborator + Sync> DeliveryStrategy for BatchingStrategy<C> {
    fn destination(&self) -> Destination {
        Destination::Batching
    }

    #[instrument(name = "batching_strategy_submit", skip(self, message))]
    async fn submit(&self, topic: &str, message: &Message) -> Delivery {
        match self.route {
            // OpenShift deployments route through the HTTP message server
            BatchingRoute::Skipped => Delivery::skipped(),
            BatchingRoute::Disabled => {
                debug!("Real-time logging disabled, ignoring message");
                Delivery::reported(Outcome::ok(Destination::Batching, "disabled"))
            }
            BatchingRoute::Enabled => {
                match self.collaborator.accept_message(topic, message).await {
                    Ok(()) => Delivery::reported(Outcome::ok(Destination::Batching, "logged")),
                    Err(e) => {
                        warn!(error = %e, "Collaborator call failed, message stays in batch for retry");
                        Delivery::reported(Outcome::fail(Destination::Batching, "retry queued"))
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockCollaborator;
    use contracts::OutcomeStatus;

    #[tokio::test]
    async fn test_skipped_route_reports_nothing() {
        let collaborator = MockCollaborator::default();
        let strategy = BatchingStrategy::new(BatchingRoute::Skipped, collaborator.clone());

        let delivery = strategy.submit("audit", &Message::new()).await;
        assert!(delivery.outcome.is_none());
        assert!(delivery.error.is_none());
        assert_eq!(collaborator.accepted_count(), 0);
    }

    #[tokio::test]
    async fn test_disabled_route_does_not_call_collaborator() {
        let collaborator = MockCollaborator::default();
        let strategy = BatchingStrategy::new(BatchingRoute::Disabled, collaborator.clone());

        let outcome = strategy.submit("audit", &Message::new()).await.outcome.unwrap();
        assert_eq!(outcome.status, OutcomeStatus::Ok);
        assert_eq!(outcome.reason, "disabled");
        assert_eq!(collaborator.accepted_count(), 0);
    }

    #[tokio::test]
    async fn test_enabled_route_logs_to_collaborator() {
        let collaborator = MockCollaborator::default();
        let strategy = BatchingStrategy::new(BatchingRoute::Enabled, collaborator.clone());

        let outcome = strategy.submit("audit", &Message::new()).await.outcome.unwrap();
        assert_eq!(outcome.status, OutcomeStatus::Ok);
        assert_eq!(outcome.reason, "logged");
        assert_eq!(outcome.handler, "logMessageToMBaaS");

        let accepted = collaborator.accepted.lock().unwrap();
        assert_eq!(accepted.len(), 1);
        assert_eq!(accepted[0].0, "audit");
    }

    #[tokio::test]
    async fn test_collaborator_failure_is_fail_outcome_not_error() {
        let collaborator = MockCollaborator::failing();
        let strategy = BatchingStrategy::new(BatchingRoute::Enabled, collaborator.clone());

        let delivery = strategy.submit("audit", &Message::new()).await;
        let outcome = delivery.outcome.unwrap();
        assert_eq!(outcome.status, OutcomeStatus::Fail);
        assert_eq!(outcome.reason, "retry queued");
        assert!(delivery.error.is_none());
        // Submitted exactly once, no local retry
        assert_eq!(collaborator.accepted_count(), 1);
    }
}
