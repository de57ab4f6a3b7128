//! Global protocol definitions
//!
//! A choreography is written once, from a bird's-eye view, as a list of
//! [`GlobalAction`]s over a fixed set of roles.

use super::*;
use std::collections::HashSet;

/// One step of a global choreography
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum GlobalAction {
    /// Message transfer: sender -> receiver: message
    Transfer {
        /// Role sending the message
        sender: Role,
        /// Role receiving the message
        receiver: Role,
        /// Tag of the message sent
        message: MessageType,
    },

    /// Choice made by `sender` and announced to `receiver`
    Branch {
        /// Role making the choice
        sender: Role,
        /// Role told which option was picked
        receiver: Role,
        /// Available options, in declaration order
        branches: Vec<BranchOption>,
    },

    /// Loop construct, left only through `Break`
    Loop {
        /// Actions repeated on every iteration
        body: Vec<GlobalAction>,
    },

    /// Leave the innermost loop, for every role at once
    Break,
}

/// A branch in a choice, tagged by the message announcing it
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct BranchOption {
    /// Label announcing this option to the receiver
    pub message: MessageType,
    /// What happens once this option is taken
    pub body: Vec<GlobalAction>,
}

impl BranchOption {
    /// Create a branch option
    pub fn new(message: impl Into<MessageType>, body: Vec<GlobalAction>) -> Self {
        BranchOption {
            message: message.into(),
            body,
        }
    }
}

impl GlobalAction {
    /// `sender -> receiver: message`
    pub fn transfer(
        sender: impl Into<Role>,
        receiver: impl Into<Role>,
        message: impl Into<MessageType>,
    ) -> Self {
        GlobalAction::Transfer {
            sender: sender.into(),
            receiver: receiver.into(),
            message: message.into(),
        }
    }

    /// A choice by `sender`, announced to `receiver`
    pub fn branch(
        sender: impl Into<Role>,
        receiver: impl Into<Role>,
        branches: Vec<BranchOption>,
    ) -> Self {
        GlobalAction::Branch {
            sender: sender.into(),
            receiver: receiver.into(),
            branches,
        }
    }

    /// A loop around `body`
    pub fn repeat(body: Vec<GlobalAction>) -> Self {
        GlobalAction::Loop { body }
    }

    /// Does this action (or anything nested in it) name `role` as a sender or receiver?
    pub fn mentions_role(&self, role: &Role) -> bool {
        match self {
            GlobalAction::Transfer {
                sender, receiver, ..
            } => sender == role || receiver == role,
            GlobalAction::Branch {
                sender,
                receiver,
                branches,
            } => {
                sender == role
                    || receiver == role
                    || branches
                        .iter()
                        .any(|b| b.body.iter().any(|a| a.mentions_role(role)))
            }
            GlobalAction::Loop { body } => body.iter().any(|a| a.mentions_role(role)),
            GlobalAction::Break => false,
        }
    }

    fn validate(&self, roles: &HashSet<&Role>) -> Result<(), ValidationError> {
        match self {
            GlobalAction::Transfer {
                sender,
                receiver,
                message,
            } => {
                check_endpoints(sender, receiver, roles)?;
                if message.name().is_empty() {
                    return Err(ValidationError::EmptyMessageType {
                        sender: sender.clone(),
                        receiver: receiver.clone(),
                    });
                }
                Ok(())
            }
            GlobalAction::Branch {
                sender,
                receiver,
                branches,
            } => {
                check_endpoints(sender, receiver, roles)?;
                if branches.is_empty() {
                    return Err(ValidationError::EmptyBranch {
                        sender: sender.clone(),
                        receiver: receiver.clone(),
                    });
                }
                let mut labels = HashSet::new();
                for branch in branches {
                    if branch.message.name().is_empty() {
                        return Err(ValidationError::EmptyMessageType {
                            sender: sender.clone(),
                            receiver: receiver.clone(),
                        });
                    }
                    if !labels.insert(&branch.message) {
                        return Err(ValidationError::DuplicateLabel {
                            sender: sender.clone(),
                            receiver: receiver.clone(),
                            message: branch.message.clone(),
                        });
                    }
                    for action in &branch.body {
                        action.validate(roles)?;
                    }
                }
                Ok(())
            }
            GlobalAction::Loop { body } => {
                for action in body {
                    action.validate(roles)?;
                }
                Ok(())
            }
            GlobalAction::Break => Ok(()),
        }
    }
}

fn check_endpoints(
    sender: &Role,
    receiver: &Role,
    roles: &HashSet<&Role>,
) -> Result<(), ValidationError> {
    for role in [sender, receiver] {
        if !roles.contains(role) {
            return Err(ValidationError::UndeclaredRole(role.clone()));
        }
    }
    if sender == receiver {
        return Err(ValidationError::SelfCommunication(sender.clone()));
    }
    Ok(())
}

/// A complete global protocol: the declared roles and the ordered action tree
///
/// Built once and treated as immutable input to projection.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct GlobalProtocol {
    roles: Vec<Role>,
    body: Vec<GlobalAction>,
}

impl GlobalProtocol {
    /// Assemble a protocol without checking it.
    ///
    /// Undeclared roles are still caught by projection; use [`GlobalProtocol::validate`]
    /// or the builder for the remaining well-formedness checks.
    pub fn new(roles: Vec<Role>, body: Vec<GlobalAction>) -> Self {
        GlobalProtocol { roles, body }
    }

    /// Start building a protocol
    pub fn builder() -> ProtocolBuilder {
        ProtocolBuilder::default()
    }

    /// Declared roles, in declaration order
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// Top-level actions
    pub fn body(&self) -> &[GlobalAction] {
        &self.body
    }

    /// Whether any action names `role` as a sender or receiver
    pub fn mentions_role(&self, role: &Role) -> bool {
        self.body.iter().any(|a| a.mentions_role(role))
    }

    /// Check the protocol for well-formedness
    ///
    /// Reports the first problem found: duplicate or empty role names, then
    /// undeclared or self-addressed endpoints, empty message tags, and
    /// choices without branches or with repeated labels, in source order.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let roles = check_roles(&self.roles)?;
        for action in &self.body {
            action.validate(&roles)?;
        }
        Ok(())
    }
}

fn check_roles(roles: &[Role]) -> Result<HashSet<&Role>, ValidationError> {
    let mut seen = HashSet::with_capacity(roles.len());
    for role in roles {
        if role.name().is_empty() {
            return Err(ValidationError::EmptyRole);
        }
        if !seen.insert(role) {
            return Err(ValidationError::DuplicateRole(role.clone()));
        }
    }
    Ok(seen)
}

/// Builder for [`GlobalProtocol`]
///
/// ```
/// use rumpsteak_epp_choreography::GlobalProtocol;
///
/// let protocol = GlobalProtocol::builder()
///     .roles(["A", "B"])
///     .transfer("A", "B", "ping")
///     .transfer("B", "A", "pong")
///     .build()
///     .unwrap();
/// assert_eq!(protocol.body().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProtocolBuilder {
    roles: Vec<Role>,
    body: SequenceBuilder,
}

impl ProtocolBuilder {
    /// Declare one role
    pub fn role(mut self, role: impl Into<Role>) -> Self {
        self.roles.push(role.into());
        self
    }

    /// Declare several roles, in order
    pub fn roles<I>(mut self, roles: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Role>,
    {
        self.roles.extend(roles.into_iter().map(Into::into));
        self
    }

    /// Append a transfer
    pub fn transfer(
        mut self,
        sender: impl Into<Role>,
        receiver: impl Into<Role>,
        message: impl Into<MessageType>,
    ) -> Self {
        self.body = self.body.transfer(sender, receiver, message);
        self
    }

    /// Append a choice whose options are collected by `options`
    pub fn branch(
        mut self,
        sender: impl Into<Role>,
        receiver: impl Into<Role>,
        options: impl FnOnce(BranchBuilder) -> BranchBuilder,
    ) -> Self {
        self.body = self.body.branch(sender, receiver, options);
        self
    }

    /// Append a loop whose body is built by `body`
    pub fn repeat(mut self, body: impl FnOnce(SequenceBuilder) -> SequenceBuilder) -> Self {
        self.body = self.body.repeat(body);
        self
    }

    /// Append a `break`
    pub fn break_loop(mut self) -> Self {
        self.body = self.body.break_loop();
        self
    }

    /// Append a prebuilt action
    pub fn action(mut self, action: GlobalAction) -> Self {
        self.body = self.body.action(action);
        self
    }

    /// Finish the protocol, rejecting duplicate or empty role names.
    ///
    /// Actions naming undeclared roles are accepted here; projection reports them.
    pub fn build(self) -> Result<GlobalProtocol, ValidationError> {
        check_roles(&self.roles)?;
        Ok(GlobalProtocol {
            roles: self.roles,
            body: self.body.into_actions(),
        })
    }
}

/// Builds an ordered sequence of global actions (a protocol, loop or branch body)
#[derive(Debug, Clone, Default)]
pub struct SequenceBuilder {
    actions: Vec<GlobalAction>,
}

impl SequenceBuilder {
    /// An empty sequence
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a transfer
    pub fn transfer(
        self,
        sender: impl Into<Role>,
        receiver: impl Into<Role>,
        message: impl Into<MessageType>,
    ) -> Self {
        self.action(GlobalAction::transfer(sender, receiver, message))
    }

    /// Append a choice whose options are collected by `options`
    pub fn branch(
        self,
        sender: impl Into<Role>,
        receiver: impl Into<Role>,
        options: impl FnOnce(BranchBuilder) -> BranchBuilder,
    ) -> Self {
        let branches = options(BranchBuilder::default()).options;
        self.action(GlobalAction::branch(sender, receiver, branches))
    }

    /// Append a nested loop
    pub fn repeat(self, body: impl FnOnce(SequenceBuilder) -> SequenceBuilder) -> Self {
        let body = body(SequenceBuilder::new()).into_actions();
        self.action(GlobalAction::repeat(body))
    }

    /// Append a `break`
    pub fn break_loop(self) -> Self {
        self.action(GlobalAction::Break)
    }

    /// Append a prebuilt action
    pub fn action(mut self, action: GlobalAction) -> Self {
        self.actions.push(action);
        self
    }

    /// The actions collected so far
    pub fn into_actions(self) -> Vec<GlobalAction> {
        self.actions
    }
}

/// Collects the options of a choice
#[derive(Debug, Clone, Default)]
pub struct BranchBuilder {
    options: Vec<BranchOption>,
}

impl BranchBuilder {
    /// Add an option labelled `message`
    pub fn option(
        mut self,
        message: impl Into<MessageType>,
        body: impl FnOnce(SequenceBuilder) -> SequenceBuilder,
    ) -> Self {
        let body = body(SequenceBuilder::new()).into_actions();
        self.options.push(BranchOption::new(message, body));
        self
    }
}
