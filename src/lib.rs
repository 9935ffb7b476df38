//! # PubRelay
//!
//! `pubrelay` is a minimal relay between an HTTP-facing API and a managed
//! publish/subscribe backend. It accepts inbound messages over HTTP,
//! forwards them to a publish topic, and concurrently drains a
//! subscription, acknowledging or rejecting each delivered message after
//! logging it. File attachments are proxied into a managed blob store and
//! replaced by a time-limited retrieval link in the outgoing payload.
//!
//! ## Core Modules
//!
//! The library is structured into several modules, each with a distinct responsibility:
//!
//! - `relay`: The core publish client, subscribe loop, and message handler with the ack/nack policy.
//! - `storage`: The blob store gateway and the file-reference payloads it produces.
//! - `transport`: The HTTP ingress - request shaping, the push-delivery webhook, and error responses.
//! - `config`: Handles loading and managing service configuration.
//! - `utils`: Contains shared utilities, such as error handling and logging setup.

pub mod config;
pub mod relay;
pub mod storage;
pub mod transport;
pub mod utils;
