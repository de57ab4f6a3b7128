//! Pretty-printer for global and local protocols.
//!
//! Global protocols print as a `ROLES` section followed by a `PROTOCOL`
//! section; local protocols print as a bare action list. Every nesting level
//! adds one indent unit (a tab by default).

use crate::ast::{
    BranchOption, ChooseOption, GlobalAction, GlobalProtocol, LocalAction, LocalProtocol,
    OfferOption, Role,
};
use std::collections::BTreeMap;
use std::fmt;

const BANNER: &str = "=====================================";

/// Layout options for the pretty-printer
#[derive(Debug, Clone)]
pub struct PrettyConfig {
    /// Text emitted once per nesting level
    pub indent: String,
}

impl Default for PrettyConfig {
    fn default() -> Self {
        Self {
            indent: "\t".to_string(),
        }
    }
}

/// Anything the pretty-printer can render
pub trait Pretty {
    /// Append this tree to `out`, nested `depth` levels deep
    fn pretty(&self, depth: usize, config: &PrettyConfig, out: &mut String);
}

/// Render any tree with the default layout
pub fn render<T: Pretty + ?Sized>(tree: &T) -> String {
    render_with_config(tree, &PrettyConfig::default())
}

/// Render any tree with a custom layout
pub fn render_with_config<T: Pretty + ?Sized>(tree: &T, config: &PrettyConfig) -> String {
    let mut out = String::new();
    tree.pretty(0, config, &mut out);
    out
}

/// Render a global protocol as its `ROLES` and `PROTOCOL` sections
pub fn format_global(protocol: &GlobalProtocol) -> String {
    render(protocol)
}

/// Render one role's local protocol
pub fn format_local(protocol: &LocalProtocol) -> String {
    render(protocol)
}

/// Render every role's local protocol under a banner naming the role
pub fn format_projection(projections: &BTreeMap<Role, LocalProtocol>) -> String {
    format_projection_with_config(projections, &PrettyConfig::default())
}

/// [`format_projection`] with a custom layout
pub fn format_projection_with_config(
    projections: &BTreeMap<Role, LocalProtocol>,
    config: &PrettyConfig,
) -> String {
    let mut out = String::new();
    for (role, protocol) in projections {
        write_line(&mut out, 0, config, BANNER);
        write_line(&mut out, 0, config, role.name());
        write_line(&mut out, 0, config, BANNER);
        protocol.pretty(0, config, &mut out);
        out.push('\n');
    }
    out
}

fn write_line(out: &mut String, depth: usize, config: &PrettyConfig, line: &str) {
    for _ in 0..depth {
        out.push_str(&config.indent);
    }
    out.push_str(line);
    out.push('\n');
}

/// `header {`, the body one level deeper, then `}`
fn write_block<T: Pretty>(
    out: &mut String,
    depth: usize,
    config: &PrettyConfig,
    header: &str,
    body: &[T],
) {
    write_line(out, depth, config, &format!("{header} {{"));
    body.pretty(depth + 1, config, out);
    write_line(out, depth, config, "}");
}

impl<T: Pretty> Pretty for [T] {
    fn pretty(&self, depth: usize, config: &PrettyConfig, out: &mut String) {
        for item in self {
            item.pretty(depth, config, out);
        }
    }
}

impl Pretty for GlobalProtocol {
    fn pretty(&self, depth: usize, config: &PrettyConfig, out: &mut String) {
        write_line(out, 0, config, "ROLES");
        for role in self.roles() {
            write_line(out, 0, config, role.name());
        }
        out.push('\n');
        write_line(out, 0, config, "PROTOCOL");
        self.body().pretty(depth, config, out);
    }
}

impl Pretty for GlobalAction {
    fn pretty(&self, depth: usize, config: &PrettyConfig, out: &mut String) {
        match self {
            GlobalAction::Transfer {
                sender,
                receiver,
                message,
            } => write_line(out, depth, config, &format!("{sender} -> {receiver}: {message};")),
            GlobalAction::Branch {
                sender,
                receiver,
                branches,
            } => write_block(out, depth, config, &format!("{sender} -> {receiver}"), branches),
            GlobalAction::Loop { body } => write_block(out, depth, config, "loop", body),
            GlobalAction::Break => write_line(out, depth, config, "break"),
        }
    }
}

impl Pretty for BranchOption {
    fn pretty(&self, depth: usize, config: &PrettyConfig, out: &mut String) {
        write_block(out, depth, config, self.message.name(), &self.body);
    }
}

impl Pretty for LocalProtocol {
    fn pretty(&self, depth: usize, config: &PrettyConfig, out: &mut String) {
        self.body().pretty(depth, config, out);
    }
}

impl Pretty for LocalAction {
    fn pretty(&self, depth: usize, config: &PrettyConfig, out: &mut String) {
        match self {
            LocalAction::Send { receiver, message } => {
                write_line(out, depth, config, &format!("!{receiver}: {message}"))
            }
            LocalAction::Receive { sender, message } => {
                write_line(out, depth, config, &format!("?{sender}: {message}"))
            }
            LocalAction::Choose { receiver, options } => {
                write_block(out, depth, config, &format!("!{receiver}"), options)
            }
            LocalAction::Offer { sender, options } => {
                write_block(out, depth, config, &format!("?{sender}"), options)
            }
            LocalAction::Loop { body } => write_block(out, depth, config, "loop", body),
            LocalAction::Break => write_line(out, depth, config, "break"),
        }
    }
}

impl Pretty for ChooseOption {
    fn pretty(&self, depth: usize, config: &PrettyConfig, out: &mut String) {
        write_block(out, depth, config, self.message.name(), &self.continuation);
    }
}

impl Pretty for OfferOption {
    fn pretty(&self, depth: usize, config: &PrettyConfig, out: &mut String) {
        write_block(out, depth, config, self.message.name(), &self.continuation);
    }
}

impl fmt::Display for GlobalProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self))
    }
}

impl fmt::Display for LocalProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self))
    }
}
