//! The node sum type and its derived properties

use std::sync::Arc;

use biome_text_size::TextSize;

use super::catalogue::{Syntax, SyntaxKind};
use super::token::{Token, TokenKind};
use crate::error::NaoshiError;
use crate::result::Result;

/// Shared handle to an immutable tree node.
///
/// Identity (`Arc::ptr_eq`) is distinct from structural equality
/// (`PartialEq`): the rewrite engine and identity-based replace key on the
/// former, tests and pattern matches on the latter. `Arc` ownership lets one
/// physical subtree be co-owned by several historical tree versions.
pub type NodeRef = Arc<Node>;

/// A syntax tree node.
///
/// The tree is immutable once built: every edit produces a new root and
/// shares all unchanged subtrees by reference with the previous version.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Interior node: fixed ordered named children determined by its kind.
    Syntax(Syntax),
    /// Leaf: source text plus leading/trailing trivia.
    Token(Token),
    /// Ordered sequence of nodes.
    List(Vec<NodeRef>),
    /// Explicitly absent child slot.
    Missing,
    /// Parse error region wrapping the skipped node.
    Error(NodeRef),
}

impl Node {
    pub fn syntax(syntax: Syntax) -> NodeRef {
        Arc::new(Self::Syntax(syntax))
    }

    pub fn token(token: Token) -> NodeRef {
        Arc::new(Self::Token(token))
    }

    pub fn list(items: Vec<NodeRef>) -> NodeRef {
        Arc::new(Self::List(items))
    }

    pub fn missing() -> NodeRef {
        Arc::new(Self::Missing)
    }

    pub fn error(inner: NodeRef) -> NodeRef {
        Arc::new(Self::Error(inner))
    }

    /// The interior kind, if this is an interior node.
    pub fn syntax_kind(&self) -> Option<SyntaxKind> {
        match self {
            Node::Syntax(syntax) => Some(syntax.kind()),
            _ => None,
        }
    }

    pub fn as_syntax(&self) -> Option<&Syntax> {
        match self {
            Node::Syntax(syntax) => Some(syntax),
            _ => None,
        }
    }

    pub fn as_token(&self) -> Option<&Token> {
        match self {
            Node::Token(token) => Some(token),
            _ => None,
        }
    }

    /// Typed token accessor; signals a shape mismatch when the node is not a
    /// token. Pattern-matching callers should prefer [`Node::as_token`].
    pub fn token_checked(&self) -> Result<&Token> {
        self.as_token()
            .ok_or_else(|| NaoshiError::shape_mismatch("token", self.describe()))
    }

    pub fn as_list(&self) -> Option<&[NodeRef]> {
        match self {
            Node::List(items) => Some(items),
            _ => None,
        }
    }

    /// Typed list accessor; signals a shape mismatch when the node is not a
    /// list.
    pub fn list_checked(&self) -> Result<&[NodeRef]> {
        self.as_list()
            .ok_or_else(|| NaoshiError::shape_mismatch("list", self.describe()))
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Node::Missing)
    }

    /// True when this node is a token of the given kind.
    pub fn is_token(&self, kind: TokenKind) -> bool {
        self.as_token().is_some_and(|token| token.kind() == kind)
    }

    /// Short human-readable description, used in shape mismatch reports.
    pub fn describe(&self) -> String {
        match self {
            Node::Syntax(syntax) => syntax.kind().tag().to_string(),
            Node::Token(token) => format!("token `{}`", token.text()),
            Node::List(_) => "list".to_string(),
            Node::Missing => "missing".to_string(),
            Node::Error(_) => "error".to_string(),
        }
    }

    /// Child nodes in document order. Tokens and missing slots have none.
    pub fn children(&self) -> Vec<&NodeRef> {
        match self {
            Node::Syntax(syntax) => syntax.children().into_iter().map(|(_, child)| child).collect(),
            Node::List(items) => items.iter().collect(),
            Node::Error(inner) => vec![inner],
            Node::Token(_) | Node::Missing => Vec::new(),
        }
    }

    /// Total text width covered by this subtree, derived from its tokens.
    pub fn full_width(&self) -> TextSize {
        match self {
            Node::Token(token) => token.full_width(),
            Node::Missing => TextSize::default(),
            _ => self
                .children()
                .into_iter()
                .fold(TextSize::default(), |acc, child| acc + child.full_width()),
        }
    }

    /// Reconstruct the exact source text covered by this subtree.
    ///
    /// For a tree built by the deserializer and not edited since, this equals
    /// the original source byte for byte.
    pub fn full_text(&self) -> String {
        let mut out = String::new();
        self.write_text(&mut out);
        out
    }

    /// Append every token's leading + text + trailing, in document order.
    pub fn write_text(&self, out: &mut String) {
        match self {
            Node::Token(token) => token.write_text(out),
            Node::Missing => {}
            _ => {
                for child in self.children() {
                    child.write_text(out);
                }
            }
        }
    }
}
