//! Local (projected) protocol definitions
//!
//! A local protocol is one role's private view of a choreography: the sends,
//! receives, choices and offers it performs, in order. Local protocols are
//! always derived by projection and never authored directly.
//!
//! Equality is structural and recursive through nested option lists, which
//! is what branch merging relies on to detect ambiguous continuations.

use super::{MessageType, Role};

/// One step of a role's local protocol
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum LocalAction {
    /// Send `message` to `receiver`
    Send {
        /// Destination role
        receiver: Role,
        /// Tag of the message sent
        message: MessageType,
    },

    /// Receive `message` from `sender`
    Receive {
        /// Source role
        sender: Role,
        /// Tag of the message expected
        message: MessageType,
    },

    /// Make a choice and announce it to `receiver` (internal choice)
    Choose {
        /// Role told about the choice
        receiver: Role,
        /// Options this role may pick from
        options: Vec<ChooseOption>,
    },

    /// Wait for `sender` to reveal a choice (external choice)
    Offer {
        /// Role whose message reveals the choice
        sender: Role,
        /// Options this role must handle
        options: Vec<OfferOption>,
    },

    /// Loop construct
    Loop {
        /// Actions repeated on every iteration
        body: Vec<LocalAction>,
    },

    /// Leave the innermost loop
    Break,
}

impl LocalAction {
    /// `!receiver: message`
    pub fn send(receiver: impl Into<Role>, message: impl Into<MessageType>) -> Self {
        LocalAction::Send {
            receiver: receiver.into(),
            message: message.into(),
        }
    }

    /// `?sender: message`
    pub fn receive(sender: impl Into<Role>, message: impl Into<MessageType>) -> Self {
        LocalAction::Receive {
            sender: sender.into(),
            message: message.into(),
        }
    }

    /// Internal choice announced to `receiver`
    pub fn choose(receiver: impl Into<Role>, options: Vec<ChooseOption>) -> Self {
        LocalAction::Choose {
            receiver: receiver.into(),
            options,
        }
    }

    /// External choice revealed by `sender`
    pub fn offer(sender: impl Into<Role>, options: Vec<OfferOption>) -> Self {
        LocalAction::Offer {
            sender: sender.into(),
            options,
        }
    }

    /// A loop around `body`
    pub fn repeat(body: Vec<LocalAction>) -> Self {
        LocalAction::Loop { body }
    }

    /// Whether this is a bare `break`
    pub fn is_break(&self) -> bool {
        matches!(self, LocalAction::Break)
    }
}

/// A choice this role may make, tagged by the message announcing it
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct ChooseOption {
    /// Label sent to announce this option
    pub message: MessageType,
    /// What this role does after choosing it
    pub continuation: Vec<LocalAction>,
}

impl ChooseOption {
    /// Create a choose option
    pub fn new(message: impl Into<MessageType>, continuation: Vec<LocalAction>) -> Self {
        ChooseOption {
            message: message.into(),
            continuation,
        }
    }
}

/// A choice this role must be ready for, selected by the message it receives
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct OfferOption {
    /// Label whose arrival selects this option
    pub message: MessageType,
    /// What this role does once the label arrives
    pub continuation: Vec<LocalAction>,
}

impl OfferOption {
    /// Create an offer option
    pub fn new(message: impl Into<MessageType>, continuation: Vec<LocalAction>) -> Self {
        OfferOption {
            message: message.into(),
            continuation,
        }
    }
}

/// One role's projected protocol
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct LocalProtocol {
    body: Vec<LocalAction>,
}

impl LocalProtocol {
    pub(crate) fn new(body: Vec<LocalAction>) -> Self {
        LocalProtocol { body }
    }

    /// Actions this role performs, in order
    pub fn body(&self) -> &[LocalAction] {
        &self.body
    }

    /// Whether the role takes no part in the protocol
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Consume the protocol, returning its actions
    pub fn into_body(self) -> Vec<LocalAction> {
        self.body
    }
}
