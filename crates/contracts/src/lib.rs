//! # Contracts
//!
//! Shared interface contracts for the reporting workspace: configuration
//! shape, message and record types, delivery outcomes and the traits at each
//! external seam (batching collaborator, HTTP transport, delivery strategy).
//! All business crates depend on this crate, never the other way round.

mod collaborator;
mod config;
mod error;
mod message;
mod outcome;
mod strategy;
mod transport;

pub use collaborator::BatchCollaborator;
pub use config::*;
pub use error::*;
pub use message::*;
pub use outcome::*;
pub use strategy::DeliveryStrategy;
pub use transport::{HttpReply, HttpTransport};
