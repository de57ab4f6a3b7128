//! Abstract Syntax Tree for choreographic protocols
//!
//! This module defines the core tree types: global protocols, local (projected)
//! protocols, roles, and message types.

/// Local protocols resulting from projection
pub mod local_type;

/// Message type definitions
pub mod message;

/// Global protocol combinators and builder
pub mod protocol;

/// Role definitions
pub mod role;

/// Validation errors
pub mod validation;

pub use local_type::*;
pub use message::*;
pub use protocol::*;
pub use role::*;
pub use validation::*;
