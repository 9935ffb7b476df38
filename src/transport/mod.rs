//! The `transport` module is responsible for the HTTP surface of the
//! relay.
//!
//! It defines the request/response shapes of the publish endpoints and the
//! push-delivery webhook, and implements the server itself: validating and
//! shaping inbound requests, driving the publish client and blob store
//! gateway, and converting every failure into a structured error response.

pub mod http;
pub mod message;

pub use http::{AppState, router, serve};
