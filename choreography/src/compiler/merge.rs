//! Branch merging for non-choosing roles
//!
//! When a role neither makes nor receives a choice, projection still has to
//! give it a deterministic local view. Each branch of the choice yields one
//! continuation for that role; merging turns those continuations into a single
//! implicit offer, keyed by the first message the role receives.
//!
//! # Merge Rules
//!
//! 1. All continuations empty: the role is not involved, nothing is offered.
//! 2. Continuations must be uniformly empty or uniformly non-empty.
//! 3. Every non-empty continuation starts with a receive, and all of those
//!    receives come from the same sender.
//! 4. Continuations announced by the same message must agree after that
//!    receive; identical ones collapse into a single option.
//!
//! Options keep the order in which their messages were first seen.

use crate::ast::{LocalAction, MessageType, OfferOption, Role};
use std::fmt;
use thiserror::Error;

/// Why a set of branch continuations cannot form an implicit offer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchShape {
    /// Some continuations are empty and some are not
    MixedEmptiness,
    /// The continuation of branch `option` does not start with a receive
    NotReceive {
        /// Index of the offending branch
        option: usize,
    },
}

impl fmt::Display for BranchShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BranchShape::MixedEmptiness => {
                f.write_str("all branches must be empty or all must be non-empty")
            }
            BranchShape::NotReceive { option } => {
                write!(f, "branch {option} does not begin with a receive")
            }
        }
    }
}

/// Errors that can occur while merging branch continuations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    /// Continuations are not uniformly shaped
    #[error("{0}")]
    BranchShapeMismatch(BranchShape),

    /// Continuations start with receives from different roles
    #[error("branches must be told apart by one sender: expected {expected}, found {found}")]
    BranchSenderMismatch {
        /// Sender of the first continuation's receive
        expected: Role,
        /// The disagreeing sender
        found: Role,
    },

    /// Continuations with the same first message differ afterwards
    #[error("branches announced by {message} continue differently")]
    MergeConflict {
        /// The shared first message
        message: MessageType,
    },
}

/// The implicit offer a non-choosing role performs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedOffer {
    /// The role whose message reveals which branch was taken
    pub sender: Role,
    /// One option per distinct first message, in first-seen order
    pub options: Vec<OfferOption>,
}

impl From<MergedOffer> for LocalAction {
    fn from(offer: MergedOffer) -> Self {
        LocalAction::Offer {
            sender: offer.sender,
            options: offer.options,
        }
    }
}

/// Merge one role's per-branch continuations into a single offer.
///
/// Returns `Ok(None)` when every continuation is empty (including when there
/// are no branches at all).
///
/// ```
/// use rumpsteak_epp_choreography::{merge, LocalAction, OfferOption, Role};
///
/// let go = vec![LocalAction::receive("B", "go")];
/// let offer = merge(vec![go.clone(), go]).unwrap().unwrap();
/// assert_eq!(offer.sender, Role::new("B"));
/// assert_eq!(offer.options, vec![OfferOption::new("go", vec![])]);
/// ```
pub fn merge(continuations: Vec<Vec<LocalAction>>) -> Result<Option<MergedOffer>, MergeError> {
    let empty = continuations.iter().filter(|c| c.is_empty()).count();
    if empty == continuations.len() {
        return Ok(None);
    }
    if empty != 0 {
        return Err(MergeError::BranchShapeMismatch(BranchShape::MixedEmptiness));
    }

    let mut sender: Option<Role> = None;
    let mut options: Vec<OfferOption> = Vec::new();

    for (option, continuation) in continuations.into_iter().enumerate() {
        let mut actions = continuation.into_iter();
        let (from, message) = match actions.next() {
            Some(LocalAction::Receive { sender, message }) => (sender, message),
            _ => {
                return Err(MergeError::BranchShapeMismatch(BranchShape::NotReceive {
                    option,
                }))
            }
        };

        match &sender {
            Some(expected) if *expected != from => {
                return Err(MergeError::BranchSenderMismatch {
                    expected: expected.clone(),
                    found: from,
                });
            }
            Some(_) => {}
            None => sender = Some(from),
        }

        let tail: Vec<LocalAction> = actions.collect();
        match options.iter().find(|o| o.message == message) {
            Some(existing) if existing.continuation == tail => {}
            Some(_) => return Err(MergeError::MergeConflict { message }),
            None => options.push(OfferOption::new(message, tail)),
        }
    }

    Ok(sender.map(|sender| MergedOffer { sender, options }))
}
