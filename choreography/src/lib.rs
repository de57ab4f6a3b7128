//! Endpoint projection for Rumpsteak choreographies
//!
//! This crate models a choreography as a single global protocol (a set of
//! roles plus an ordered tree of transfers, choices and loops) and projects it
//! into one local protocol per role: the sends, receives, choices and offers
//! that role performs, in order.
//!
//! Roles that neither make nor receive a choice still get a deterministic view:
//! their per-branch continuations are merged into an implicit offer, keyed by
//! the first message they receive.

pub mod ast;
pub mod compiler;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// Re-export main APIs
pub use ast::{
    BranchBuilder, BranchOption, ChooseOption, GlobalAction, GlobalProtocol, LocalAction,
    LocalProtocol, MessageType, OfferOption, ProtocolBuilder, Role, SequenceBuilder,
    ValidationError,
};
pub use compiler::{
    format_global, format_local, format_projection, merge, project, project_role, render,
    render_with_config, BranchShape, MergeError, MergedOffer, Pretty, PrettyConfig,
    ProjectionError,
};
