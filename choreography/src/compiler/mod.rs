//! Choreography compilation pipeline
//!
//! This module contains the passes that turn a global protocol into local
//! protocols, plus the printer used to inspect either side.

pub mod merge;
pub mod pretty;
pub mod projection;

pub use merge::*;
pub use pretty::*;
pub use projection::*;
