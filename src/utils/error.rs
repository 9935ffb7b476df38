//! The `error` module defines the error taxonomy used within the `pubrelay`
//! application.
//!
//! Every backend or decoding failure is represented here and converted into
//! a structured HTTP response at the transport boundary; none of these
//! variants is allowed to crash a serving task.

use thiserror::Error;

/// Errors produced by the relay.
///
/// The `Display` strings double as the `detail` field of HTTP error
/// responses, so their wording is part of the external contract.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Malformed or missing required input. Surfaced as HTTP 400.
    #[error("{0}")]
    Validation(String),

    /// The broker rejected or failed a publish call. Surfaced as HTTP 500.
    #[error("Failed to publish message: {0}")]
    Publish(String),

    /// The blob store rejected or failed an upload. Surfaced as HTTP 500.
    #[error("Failed to store file: {0}")]
    Storage(String),

    /// A payload was not valid under its expected encoding. Surfaced as a
    /// nack for subscription-sourced messages and HTTP 500 for
    /// webhook-sourced ones.
    #[error("Error processing message: {0}")]
    Decode(String),

    /// The startup subscription-provisioning step failed. Logged; the
    /// process continues in degraded mode without live delivery.
    #[error("Failed to set up subscription: {0}")]
    SubscriptionSetup(String),
}
