//! Converts regular expressions straight into DFAs using the
//! followpos construction: an augmented syntax tree annotated with
//! `nullable`, `firstpos` and `lastpos`, a followpos relation over its
//! leaves, and subset construction over that relation.
//!
//! Supported syntax: symbols, juxtaposition or `.` for concatenation,
//! `|`, `*` and parentheses. `#` is reserved as the end marker.

pub use crate::dfa::{Dfa, State, StateId};
pub use crate::followpos::Followpos;
pub use crate::regex::{ParseError, Symbol, END_MARKER};
pub use crate::tree::{Node, NodeKind, Position, Positions, Tree};

pub mod dfa;
pub mod followpos;
pub mod regex;
pub mod tree;

/// Everything built from one expression.
#[derive(Debug, Clone)]
pub struct Construction {
    pub tree: Tree,
    pub followpos: Followpos,
    pub dfa: Dfa,
}

/// Runs the whole pipeline on a raw expression.
pub fn construct(expr: &str) -> Result<Construction, ParseError> {
    let tree: Tree = expr.parse()?;
    let followpos = Followpos::compute(&tree);
    let dfa = Dfa::from_tree(&tree, &followpos);
    Ok(Construction { tree: tree, followpos: followpos, dfa: dfa })
}
