//! The `relay` module is the core of the service: it carries messages
//! between the HTTP ingress and the managed Pub/Sub broker.
//!
//! It defines the message entities, the publish client, the supervised
//! subscribe loop with its ack/nack policy, and the message handler that
//! decides between the two. Delivery semantics are at-least-once; anything
//! stronger is owned by the broker, not by this module.

pub mod handler;
pub mod message;
pub mod publisher;
pub mod subscriber;

pub use handler::Outcome;
pub use message::{InboundMessage, OutboundMessage};
pub use publisher::Publisher;
pub use subscriber::SubscriptionAdmin;
