//! DeliveryStrategy trait - one destination of the dispatcher fan-out

use crate::{Delivery, Destination, Message};

/// Delivery strategy trait
///
/// Strategies never fail the dispatch: problems are reported through the
/// returned [`Delivery`].
#[trait_variant::make(DeliveryStrategy: Send)]
pub trait LocalDeliveryStrategy {
    /// Destination served by this strategy
    fn destination(&self) -> Destination;

    /// Attempt delivery of an already stamped message
    async fn submit(&self, topic: &str, message: &Message) -> Delivery;
}
