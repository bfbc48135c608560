//! Building trees from the external parser's output
//!
//! The parse-tree description is a kind-tagged, recursively nested JSON
//! value. Node text is not stored in the description: tokens and trivia
//! carry widths, and the builder recovers the exact bytes by slicing the
//! original source with a running offset. The description is produced by a
//! trusted parser and is not validated against the grammar; an unrecognized
//! kind or a missing field is a fatal deserialization error and no partial
//! tree is returned.

use biome_text_size::TextSize;
use serde_json::{Map, Value};

use super::catalogue::{Syntax, SyntaxKind};
use super::node::{Node, NodeRef};
use super::token::{Token, TokenKind};
use super::trivia::Trivia;
use crate::error::NaoshiError;
use crate::result::Result;

/// Build a tree from a parse-tree description and the source it describes.
///
/// The resulting tree is lossless: `root.full_text() == source` whenever the
/// description covers the whole source.
pub fn from_parse_tree(description: &Value, source: &str) -> Result<NodeRef> {
    let mut builder = TreeBuilder::new(source);
    builder.build(description)
}

/// Recursive-descent tree builder with a running source offset.
pub(crate) struct TreeBuilder<'s> {
    source: &'s str,
    offset: TextSize,
}

impl<'s> TreeBuilder<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            offset: TextSize::default(),
        }
    }

    /// Build the named child of an interior node. Called once per field, in
    /// declaration order, by the generated catalogue code.
    pub(crate) fn field(&mut self, fields: &Map<String, Value>, name: &str) -> Result<NodeRef> {
        let value = fields.get(name).ok_or_else(|| {
            NaoshiError::deserialize(format!("missing field `{name}` in parse-tree description"))
        })?;
        self.build(value)
    }

    fn build(&mut self, value: &Value) -> Result<NodeRef> {
        let fields = value.as_object().ok_or_else(|| {
            NaoshiError::deserialize("expected a kind-tagged object in parse-tree description")
        })?;
        let kind = fields.get("kind").and_then(Value::as_str).ok_or_else(|| {
            NaoshiError::deserialize("parse-tree node is missing its `kind` tag")
        })?;
        match kind {
            "token" => {
                let token = fields.get("token").and_then(Value::as_object).ok_or_else(|| {
                    NaoshiError::deserialize("token node is missing its `token` payload")
                })?;
                self.token(token)
            }
            "list" => {
                let elements = fields
                    .get("elements")
                    .and_then(Value::as_array)
                    .ok_or_else(|| {
                        NaoshiError::deserialize("list node is missing its `elements` array")
                    })?;
                let items = elements
                    .iter()
                    .map(|element| self.build(element))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Node::list(items))
            }
            "missing" => Ok(Node::missing()),
            "error" => {
                let inner = self.field(fields, "error_error")?;
                Ok(Node::error(inner))
            }
            tag => {
                let kind = SyntaxKind::from_tag(tag).ok_or_else(|| {
                    NaoshiError::deserialize(format!(
                        "unrecognized syntax kind `{tag}` at offset {}",
                        u32::from(self.offset)
                    ))
                })?;
                Ok(Node::syntax(Syntax::from_parse_tree(kind, fields, self)?))
            }
        }
    }

    fn token(&mut self, fields: &Map<String, Value>) -> Result<NodeRef> {
        let name = fields.get("kind").and_then(Value::as_str).ok_or_else(|| {
            NaoshiError::deserialize("token payload is missing its `kind` tag")
        })?;
        let kind = TokenKind::from_name(name).ok_or_else(|| {
            NaoshiError::deserialize(format!(
                "unrecognized token kind `{name}` at offset {}",
                u32::from(self.offset)
            ))
        })?;
        let leading = self.trivia(fields.get("leading"))?;
        let width = Self::width(fields.get("width"))?;
        let text = self.take(width)?.to_string();
        let trailing = self.trivia(fields.get("trailing"))?;
        Ok(Node::token(Token::new(kind, leading, text, trailing)))
    }

    /// Consume a trivia piece list: widths are summed and the covered bytes
    /// become one opaque span.
    fn trivia(&mut self, value: Option<&Value>) -> Result<Trivia> {
        let pieces = value.and_then(Value::as_array).ok_or_else(|| {
            NaoshiError::deserialize("token payload is missing a trivia list")
        })?;
        let mut width = TextSize::default();
        for piece in pieces {
            width += Self::width(piece.get("width"))?;
        }
        Ok(Trivia::new(self.take(width)?))
    }

    fn width(value: Option<&Value>) -> Result<TextSize> {
        value
            .and_then(Value::as_u64)
            .and_then(|width| u32::try_from(width).ok())
            .map(TextSize::from)
            .ok_or_else(|| NaoshiError::deserialize("missing or invalid width"))
    }

    /// Slice `width` bytes at the running offset and advance past them.
    fn take(&mut self, width: TextSize) -> Result<&'s str> {
        let start = u32::from(self.offset) as usize;
        let end = start + u32::from(width) as usize;
        let slice = self.source.get(start..end).ok_or_else(|| {
            NaoshiError::deserialize(format!(
                "parse tree reports {} bytes at offset {start}, but the source is {} bytes long",
                u32::from(width),
                self.source.len()
            ))
        })?;
        self.offset += width;
        Ok(slice)
    }
}
