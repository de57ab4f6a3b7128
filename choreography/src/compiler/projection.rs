//! Projection from global protocols to per-role local protocols

use crate::ast::{
    BranchOption, ChooseOption, GlobalAction, GlobalProtocol, LocalAction, LocalProtocol,
    MessageType, OfferOption, Role,
};
use crate::compiler::merge::{merge, BranchShape, MergeError};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, trace};

/// Project a global protocol onto every declared role
///
/// Returns one local protocol per declared role, including roles that never
/// take part in any action (their protocol is empty). The first error found
/// anywhere in the tree aborts the whole projection.
///
/// ```
/// use rumpsteak_epp_choreography::{project, GlobalProtocol, LocalAction, Role};
///
/// let protocol = GlobalProtocol::builder()
///     .roles(["A", "B"])
///     .transfer("A", "B", "ping")
///     .build()
///     .unwrap();
///
/// let projections = project(&protocol).unwrap();
/// assert_eq!(projections[&Role::new("A")].body(), [LocalAction::send("B", "ping")]);
/// assert_eq!(projections[&Role::new("B")].body(), [LocalAction::receive("A", "ping")]);
/// ```
pub fn project(protocol: &GlobalProtocol) -> Result<BTreeMap<Role, LocalProtocol>, ProjectionError> {
    let context = ProjectionContext::new(protocol.roles());
    debug!(
        roles = context.roles.len(),
        actions = protocol.body().len(),
        "Projecting global protocol"
    );

    let mut endpoints = context.project_actions(protocol.body())?;
    let projections: BTreeMap<_, _> = context
        .roles
        .iter()
        .map(|&role| (role.clone(), LocalProtocol::new(take(&mut endpoints, role))))
        .collect();

    debug!(roles = projections.len(), "Projection complete");
    Ok(projections)
}

/// Project a global protocol and keep only `role`'s local protocol
pub fn project_role(protocol: &GlobalProtocol, role: &Role) -> Result<LocalProtocol, ProjectionError> {
    let mut projections = project(protocol)?;
    projections
        .remove(role)
        .ok_or_else(|| ProjectionError::UndeclaredRole(role.clone()))
}

/// Errors that can occur during projection
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProjectionError {
    /// An action names a role missing from the declaration list
    #[error("role {0} not declared in choreography")]
    UndeclaredRole(Role),

    /// A third party's branch continuations have the wrong shape to merge
    #[error("cannot merge branches for role {role}: {shape}")]
    BranchShapeMismatch {
        /// The third party being merged
        role: Role,
        /// What was wrong with the continuations
        shape: BranchShape,
    },

    /// A third party learns the choice from more than one sender
    #[error("cannot merge branches for role {role}: expected messages from {expected}, found {found}")]
    BranchSenderMismatch {
        /// The third party being merged
        role: Role,
        /// Sender of the first branch's receive
        expected: Role,
        /// The disagreeing sender
        found: Role,
    },

    /// Two branches share a first message but continue differently
    #[error("cannot merge branches for role {role}: ambiguous continuations after {message}")]
    MergeConflict {
        /// The third party being merged
        role: Role,
        /// The shared first message
        message: MessageType,
    },
}

impl ProjectionError {
    fn from_merge(role: Role, error: MergeError) -> Self {
        match error {
            MergeError::BranchShapeMismatch(shape) => {
                ProjectionError::BranchShapeMismatch { role, shape }
            }
            MergeError::BranchSenderMismatch { expected, found } => {
                ProjectionError::BranchSenderMismatch {
                    role,
                    expected,
                    found,
                }
            }
            MergeError::MergeConflict { message } => ProjectionError::MergeConflict { role, message },
        }
    }
}

/// One append-only action sequence per declared role
type Endpoints = HashMap<Role, Vec<LocalAction>>;

/// Context for projection algorithm
///
/// Holds the declared roles (deduplicated, in declaration order). All mutable
/// state lives in the `Endpoints` maps created per call, so sibling branches
/// never observe each other's actions.
struct ProjectionContext<'a> {
    roles: Vec<&'a Role>,
}

impl<'a> ProjectionContext<'a> {
    fn new(roles: &'a [Role]) -> Self {
        let mut seen = HashSet::with_capacity(roles.len());
        let roles = roles.iter().filter(|role| seen.insert(*role)).collect();
        ProjectionContext { roles }
    }

    fn fresh(&self) -> Endpoints {
        self.roles
            .iter()
            .map(|&role| (role.clone(), Vec::new()))
            .collect()
    }

    /// Project a sequence into brand-new accumulators
    fn project_actions(&self, actions: &[GlobalAction]) -> Result<Endpoints, ProjectionError> {
        let mut endpoints = self.fresh();
        for action in actions {
            self.project_action(action, &mut endpoints)?;
        }
        Ok(endpoints)
    }

    fn project_action(
        &self,
        action: &GlobalAction,
        endpoints: &mut Endpoints,
    ) -> Result<(), ProjectionError> {
        match action {
            GlobalAction::Transfer {
                sender,
                receiver,
                message,
            } => self.project_transfer(sender, receiver, message, endpoints),

            GlobalAction::Branch {
                sender,
                receiver,
                branches,
            } => self.project_branch(sender, receiver, branches, endpoints),

            GlobalAction::Loop { body } => self.project_loop(body, endpoints),

            GlobalAction::Break => {
                trace!("break");
                for &role in &self.roles {
                    append(endpoints, role, LocalAction::Break)?;
                }
                Ok(())
            }
        }
    }

    /// `s -> r: m` becomes `!r: m` for the sender and `?s: m` for the receiver
    fn project_transfer(
        &self,
        sender: &Role,
        receiver: &Role,
        message: &MessageType,
        endpoints: &mut Endpoints,
    ) -> Result<(), ProjectionError> {
        trace!(%sender, %receiver, %message, "transfer");
        check_declared(endpoints, sender)?;
        check_declared(endpoints, receiver)?;

        append(endpoints, sender, LocalAction::send(receiver, message))?;
        append(endpoints, receiver, LocalAction::receive(sender, message))
    }

    /// Project a choice onto every role
    ///
    /// Each option is projected on its own. The sender collects the results as
    /// a `Choose`, the receiver as an `Offer`, and every other role gets its
    /// per-branch continuations merged into an implicit offer (or nothing, if
    /// the choice never reaches it).
    fn project_branch(
        &self,
        sender: &Role,
        receiver: &Role,
        branches: &[BranchOption],
        endpoints: &mut Endpoints,
    ) -> Result<(), ProjectionError> {
        trace!(%sender, %receiver, options = branches.len(), "branch");
        check_declared(endpoints, sender)?;
        check_declared(endpoints, receiver)?;

        let third_parties: Vec<&Role> = self
            .roles
            .iter()
            .copied()
            .filter(|&role| role != sender && role != receiver)
            .collect();

        let mut choices = Vec::with_capacity(branches.len());
        let mut offers = Vec::with_capacity(branches.len());
        let mut bundles = vec![Vec::with_capacity(branches.len()); third_parties.len()];

        for branch in branches {
            let mut projected = self.project_actions(&branch.body)?;

            choices.push(ChooseOption::new(
                &branch.message,
                projected.get(sender).cloned().unwrap_or_default(),
            ));
            offers.push(OfferOption::new(
                &branch.message,
                projected.get(receiver).cloned().unwrap_or_default(),
            ));
            for (bundle, &role) in bundles.iter_mut().zip(&third_parties) {
                bundle.push(take(&mut projected, role));
            }
        }

        append(endpoints, sender, LocalAction::choose(receiver, choices))?;
        append(endpoints, receiver, LocalAction::offer(sender, offers))?;

        for (continuations, role) in bundles.into_iter().zip(third_parties) {
            match merge(continuations) {
                Ok(Some(offer)) => {
                    trace!(%role, via = %offer.sender, options = offer.options.len(), "implicit offer");
                    append(endpoints, role, offer.into())?;
                }
                Ok(None) => {}
                Err(error) => {
                    debug!(%role, %error, "Branch merge failed");
                    return Err(ProjectionError::from_merge(role.clone(), error));
                }
            }
        }

        Ok(())
    }

    /// Loops are dropped for roles whose body would be empty or a lone `break`
    fn project_loop(
        &self,
        body: &[GlobalAction],
        endpoints: &mut Endpoints,
    ) -> Result<(), ProjectionError> {
        trace!(actions = body.len(), "loop");
        let mut projected = self.project_actions(body)?;

        for &role in &self.roles {
            let body = take(&mut projected, role);
            let idle = match body.as_slice() {
                [] => true,
                [only] => only.is_break(),
                _ => false,
            };
            if idle {
                trace!(%role, "loop elided");
                continue;
            }
            append(endpoints, role, LocalAction::repeat(body))?;
        }

        Ok(())
    }
}

fn check_declared(endpoints: &Endpoints, role: &Role) -> Result<(), ProjectionError> {
    if endpoints.contains_key(role) {
        Ok(())
    } else {
        Err(ProjectionError::UndeclaredRole(role.clone()))
    }
}

fn append(endpoints: &mut Endpoints, role: &Role, action: LocalAction) -> Result<(), ProjectionError> {
    endpoints
        .get_mut(role)
        .map(|actions| actions.push(action))
        .ok_or_else(|| ProjectionError::UndeclaredRole(role.clone()))
}

fn take(endpoints: &mut Endpoints, role: &Role) -> Vec<LocalAction> {
    let actions = endpoints.remove(role);
    debug_assert!(actions.is_some(), "no accumulator for declared role {role}");
    actions.unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ProtocolBuilder;

    fn roles(names: &[&str]) -> ProtocolBuilder {
        GlobalProtocol::builder().roles(names.iter().copied())
    }

    fn body_of(projections: &BTreeMap<Role, LocalProtocol>, role: &str) -> Vec<LocalAction> {
        projections[&Role::new(role)].body().to_vec()
    }

    #[test]
    fn empty_protocol_projects_every_role_to_nothing() {
        let protocol = roles(&["A", "B", "C"]).build().unwrap();
        let projections = project(&protocol).unwrap();
        assert_eq!(projections.len(), 3);
        assert!(projections.values().all(LocalProtocol::is_empty));
    }

    #[test]
    fn transfer_sends_and_receives() {
        let protocol = roles(&["A", "B", "C"])
            .transfer("A", "B", "ping")
            .transfer("B", "A", "pong")
            .build()
            .unwrap();
        let projections = project(&protocol).unwrap();

        assert_eq!(
            body_of(&projections, "A"),
            vec![LocalAction::send("B", "ping"), LocalAction::receive("B", "pong")]
        );
        assert_eq!(
            body_of(&projections, "B"),
            vec![LocalAction::receive("A", "ping"), LocalAction::send("A", "pong")]
        );
        assert!(body_of(&projections, "C").is_empty());
    }

    #[test]
    fn undeclared_sender_or_receiver_fails() {
        let bad_receiver = roles(&["a", "b"]).transfer("a", "c", "x").build().unwrap();
        assert_eq!(
            project(&bad_receiver),
            Err(ProjectionError::UndeclaredRole(Role::new("c")))
        );

        let bad_sender = roles(&["a", "b"]).transfer("z", "b", "x").build().unwrap();
        assert_eq!(
            project(&bad_sender),
            Err(ProjectionError::UndeclaredRole(Role::new("z")))
        );
    }

    #[test]
    fn undeclared_role_in_branch_header_fails() {
        let protocol = roles(&["A", "B"])
            .branch("A", "Q", |b| b.option("x", |o| o))
            .build()
            .unwrap();
        assert_eq!(
            project(&protocol),
            Err(ProjectionError::UndeclaredRole(Role::new("Q")))
        );
    }

    #[test]
    fn nested_errors_abort_projection() {
        let protocol = roles(&["A", "B"])
            .repeat(|body| {
                body.branch("A", "B", |b| {
                    b.option("ok", |o| o.break_loop())
                        .option("bad", |o| o.transfer("B", "Nobody", "x"))
                })
            })
            .build()
            .unwrap();
        assert_eq!(
            project(&protocol),
            Err(ProjectionError::UndeclaredRole(Role::new("Nobody")))
        );
    }

    #[test]
    fn branch_builds_choose_and_offer() {
        let protocol = roles(&["A", "B"])
            .branch("A", "B", |b| {
                b.option("yes", |o| o.transfer("B", "A", "thanks"))
                    .option("no", |o| o)
            })
            .build()
            .unwrap();
        let projections = project(&protocol).unwrap();

        assert_eq!(
            body_of(&projections, "A"),
            vec![LocalAction::choose(
                "B",
                vec![
                    ChooseOption::new("yes", vec![LocalAction::receive("B", "thanks")]),
                    ChooseOption::new("no", vec![]),
                ]
            )]
        );
        assert_eq!(
            body_of(&projections, "B"),
            vec![LocalAction::offer(
                "A",
                vec![
                    OfferOption::new("yes", vec![LocalAction::send("A", "thanks")]),
                    OfferOption::new("no", vec![]),
                ]
            )]
        );
    }

    #[test]
    fn third_party_is_told_by_whoever_messages_it_first() {
        let protocol = roles(&["A", "B", "C", "D"])
            .branch("A", "B", |b| {
                b.option("left", |o| o.transfer("B", "D", "l").transfer("D", "C", "l"))
                    .option("right", |o| o.transfer("B", "D", "r").transfer("D", "C", "r"))
            })
            .build()
            .unwrap();
        let projections = project(&protocol).unwrap();

        assert_eq!(
            body_of(&projections, "C"),
            vec![LocalAction::offer(
                "D",
                vec![OfferOption::new("l", vec![]), OfferOption::new("r", vec![])]
            )]
        );
        assert_eq!(
            body_of(&projections, "D"),
            vec![LocalAction::offer(
                "B",
                vec![
                    OfferOption::new("l", vec![LocalAction::send("C", "l")]),
                    OfferOption::new("r", vec![LocalAction::send("C", "r")]),
                ]
            )]
        );
    }

    #[test]
    fn uninvolved_third_party_gets_no_offer() {
        let protocol = roles(&["A", "B", "C"])
            .branch("A", "B", |b| b.option("x", |o| o).option("y", |o| o))
            .build()
            .unwrap();
        let projections = project(&protocol).unwrap();
        assert!(body_of(&projections, "C").is_empty());
    }

    #[test]
    fn merge_errors_carry_the_third_party() {
        let mixed = roles(&["A", "B", "C"])
            .branch("A", "B", |b| {
                b.option("x", |o| o.transfer("B", "C", "go")).option("y", |o| o)
            })
            .build()
            .unwrap();
        assert_eq!(
            project(&mixed),
            Err(ProjectionError::BranchShapeMismatch {
                role: Role::new("C"),
                shape: BranchShape::MixedEmptiness,
            })
        );

        let leading_send = roles(&["A", "B", "C"])
            .branch("A", "B", |b| {
                b.option("x", |o| o.transfer("C", "B", "go"))
                    .option("y", |o| o.transfer("C", "B", "stop"))
            })
            .build()
            .unwrap();
        assert_eq!(
            project(&leading_send),
            Err(ProjectionError::BranchShapeMismatch {
                role: Role::new("C"),
                shape: BranchShape::NotReceive { option: 0 },
            })
        );

        let senders = roles(&["A", "B", "C"])
            .branch("A", "B", |b| {
                b.option("x", |o| o.transfer("A", "C", "go"))
                    .option("y", |o| o.transfer("B", "C", "go"))
            })
            .build()
            .unwrap();
        assert_eq!(
            project(&senders),
            Err(ProjectionError::BranchSenderMismatch {
                role: Role::new("C"),
                expected: Role::new("A"),
                found: Role::new("B"),
            })
        );
    }

    #[test]
    fn loop_is_elided_for_roles_outside_it() {
        let protocol = roles(&["A", "B", "C"])
            .repeat(|body| body.transfer("A", "B", "tick"))
            .build()
            .unwrap();
        let projections = project(&protocol).unwrap();

        assert_eq!(
            body_of(&projections, "A"),
            vec![LocalAction::repeat(vec![LocalAction::send("B", "tick")])]
        );
        assert!(body_of(&projections, "C").is_empty());
    }

    #[test]
    fn loop_holding_only_break_is_elided() {
        let protocol = roles(&["A", "B"])
            .repeat(|body| body.break_loop())
            .build()
            .unwrap();
        let projections = project(&protocol).unwrap();
        assert!(projections.values().all(LocalProtocol::is_empty));
    }

    #[test]
    fn break_reaches_every_role() {
        let protocol = roles(&["A", "B", "C"])
            .repeat(|body| body.transfer("A", "B", "tick").break_loop())
            .build()
            .unwrap();
        let projections = project(&protocol).unwrap();

        assert_eq!(
            body_of(&projections, "B"),
            vec![LocalAction::repeat(vec![
                LocalAction::receive("A", "tick"),
                LocalAction::Break,
            ])]
        );
        // C only sees the break, so the loop disappears for it
        assert!(body_of(&projections, "C").is_empty());
    }

    #[test]
    fn duplicate_declarations_do_not_duplicate_actions() {
        let protocol = GlobalProtocol::new(
            vec![Role::new("A"), Role::new("B"), Role::new("A")],
            vec![GlobalAction::Break],
        );
        let projections = project(&protocol).unwrap();
        assert_eq!(projections.len(), 2);
        assert_eq!(body_of(&projections, "A"), vec![LocalAction::Break]);
    }

    #[test]
    fn project_role_picks_one_view() {
        let protocol = roles(&["A", "B"]).transfer("A", "B", "m").build().unwrap();
        assert_eq!(
            project_role(&protocol, &Role::new("B")).unwrap().into_body(),
            vec![LocalAction::receive("A", "m")]
        );
        assert_eq!(
            project_role(&protocol, &Role::new("X")),
            Err(ProjectionError::UndeclaredRole(Role::new("X")))
        );
    }
}
