//! Validation errors for global protocols

use super::{MessageType, Role};

/// Choreography validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A role appears twice in the declaration list
    #[error("role {0} declared more than once")]
    DuplicateRole(Role),

    /// A role has an empty name
    #[error("role names must not be empty")]
    EmptyRole,

    /// A transfer or branch label has an empty message tag
    #[error("transfer from {sender} to {receiver} has an empty message type")]
    EmptyMessageType {
        /// Sending role of the offending action
        sender: Role,
        /// Receiving role of the offending action
        receiver: Role,
    },

    /// An action names a role that was never declared
    #[error("role {0} not declared in choreography")]
    UndeclaredRole(Role),

    /// An action's sender and receiver are the same role
    #[error("role {0} cannot communicate with itself")]
    SelfCommunication(Role),

    /// A choice has no options
    #[error("choice from {sender} to {receiver} has no branches")]
    EmptyBranch {
        /// Role making the choice
        sender: Role,
        /// Role told about the choice
        receiver: Role,
    },

    /// Two options of one choice share a label
    #[error("choice from {sender} to {receiver} repeats label {message}")]
    DuplicateLabel {
        /// Role making the choice
        sender: Role,
        /// Role told about the choice
        receiver: Role,
        /// The repeated label
        message: MessageType,
    },
}
