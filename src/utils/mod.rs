//! The `utils` module provides a collection of utility functions and common
//! definitions used across the `pubrelay` application.
//!
//! This module centralizes reusable components, such as the error taxonomy
//! and the logging bootstrap, to promote code consistency and reduce
//! duplication.

pub mod error;
pub mod logging;
