//! Lossless syntax trees for Hack/PHP source
//!
//! This module implements the immutable, fully lossless syntax tree the
//! migration engine operates on. The tree preserves all source information
//! including whitespace and comments, enabling:
//! - Exact source-to-source transformations
//! - Byte-for-byte round-tripping: `tree.full_text() == source`
//! - Identity-based subtree replacement with structural sharing
//!
//! ## Architecture
//!
//! Every tree value is a [`NodeRef`] (`Arc<Node>`). [`Node`] is a closed sum
//! type:
//!
//! - **`Syntax`**: an interior node, holding a fixed ordered set of named
//!   children determined entirely by its [`SyntaxKind`]
//! - **`Token`**: a leaf carrying exact source text plus leading/trailing
//!   [`Trivia`]
//! - **`List`**: an ordered sequence of nodes (delimited lists, statement
//!   sequences)
//! - **`Missing`**: an explicitly absent child slot
//! - **`Error`**: a parse error region wrapping the skipped node
//!
//! Trees are never mutated: every edit builds a new root while unchanged
//! subtrees are shared by reference between the old and new versions. Node
//! identity (`Arc::ptr_eq`) is therefore distinct from structural equality
//! (`PartialEq`), and the rewrite engine relies on identity to detect no-ops
//! without comparing content.
//!
//! ## Trivia handling
//!
//! Trivia is attached to tokens only:
//! - **Leading trivia**: whitespace/comments before the token text
//! - **Trailing trivia**: whitespace/comments up to the next line break
//!
//! Concatenating leading + text + trailing for every token in document order
//! reproduces the original source exactly.

mod builder;
mod catalogue;
mod node;
mod rewrite;
mod token;
mod trivia;

pub use builder::from_parse_tree;
pub use catalogue::*;
pub use node::{Node, NodeRef};
pub use rewrite::{
    NodeExt, descendants_where, replace, replace_tracking, rewrite, rewrite_within,
};
pub use token::{Token, TokenKind};
pub use trivia::Trivia;
