//! Generic bottom-up tree rewriting
//!
//! The engine visits every node exactly once, depth-first and post-order:
//! children are rewritten before their parent, and a node whose children all
//! came back reference-identical is reused rather than reallocated. The
//! transform then runs on the candidate node together with its ancestor
//! chain (root down to, but excluding, the current node). Transforms must be
//! pure functions of `(node, ancestors)`; sibling visit order is not part of
//! the contract.
//!
//! Identity-based replace is a one-shot application of the engine whose
//! transform matches on `Arc::ptr_eq`.

use std::cell::Cell;
use std::sync::Arc;

use super::node::{Node, NodeRef};
use super::trivia::Trivia;

/// Rewrite the whole tree with `transform`, sharing every unchanged subtree.
///
/// With an identity transform the result is reference-identical to `root`,
/// at the root and at every interior node.
pub fn rewrite<F>(root: &NodeRef, transform: &F) -> NodeRef
where
    F: Fn(NodeRef, &[NodeRef]) -> NodeRef,
{
    rewrite_within(root, transform, Vec::new())
}

/// Like [`rewrite`], but for a subtree with known context: `ancestors` seeds
/// the chain handed to the transform, outermost first.
pub fn rewrite_within<F>(root: &NodeRef, transform: &F, mut ancestors: Vec<NodeRef>) -> NodeRef
where
    F: Fn(NodeRef, &[NodeRef]) -> NodeRef,
{
    rewrite_in(root, transform, &mut ancestors)
}

pub(crate) fn rewrite_in<F>(node: &NodeRef, transform: &F, ancestors: &mut Vec<NodeRef>) -> NodeRef
where
    F: Fn(NodeRef, &[NodeRef]) -> NodeRef,
{
    let candidate = match &**node {
        Node::Token(_) | Node::Missing => Arc::clone(node),
        Node::Syntax(syntax) => {
            ancestors.push(Arc::clone(node));
            let rewritten = syntax.rewrite_children(transform, ancestors);
            ancestors.pop();
            match rewritten {
                Some(changed) => Arc::new(Node::Syntax(changed)),
                None => Arc::clone(node),
            }
        }
        Node::List(items) => {
            ancestors.push(Arc::clone(node));
            let rewritten: Vec<NodeRef> = items
                .iter()
                .map(|item| rewrite_in(item, transform, ancestors))
                .collect();
            ancestors.pop();
            if items
                .iter()
                .zip(&rewritten)
                .all(|(before, after)| Arc::ptr_eq(before, after))
            {
                Arc::clone(node)
            } else {
                Arc::new(Node::List(rewritten))
            }
        }
        Node::Error(inner) => {
            ancestors.push(Arc::clone(node));
            let rewritten = rewrite_in(inner, transform, ancestors);
            ancestors.pop();
            if Arc::ptr_eq(inner, &rewritten) {
                Arc::clone(node)
            } else {
                Arc::new(Node::Error(rewritten))
            }
        }
    };
    transform(candidate, ancestors)
}

/// Replace every occurrence of `target` (by reference identity) with
/// `replacement`, rebuilding only the paths from the root to each occurrence.
///
/// A target that does not occur anywhere in `root` is a silent no-op: the
/// result is reference-identical to the input. Callers that need to
/// distinguish a miss should use [`replace_tracking`].
pub fn replace(root: &NodeRef, target: &NodeRef, replacement: NodeRef) -> NodeRef {
    rewrite(root, &|node, _ancestors| {
        if Arc::ptr_eq(&node, target) {
            Arc::clone(&replacement)
        } else {
            node
        }
    })
}

/// Like [`replace`], but also reports how many occurrences were replaced.
pub fn replace_tracking(
    root: &NodeRef,
    target: &NodeRef,
    replacement: NodeRef,
) -> (NodeRef, usize) {
    let hits = Cell::new(0usize);
    let rewritten = rewrite(root, &|node, _ancestors| {
        if Arc::ptr_eq(&node, target) {
            hits.set(hits.get() + 1);
            Arc::clone(&replacement)
        } else {
            node
        }
    });
    (rewritten, hits.get())
}

/// Collect every descendant of `root` (excluding `root` itself) for which
/// `predicate(node, ancestors)` holds, in document order.
pub fn descendants_where<F>(root: &NodeRef, predicate: F) -> Vec<NodeRef>
where
    F: Fn(&NodeRef, &[NodeRef]) -> bool,
{
    fn walk<F>(node: &NodeRef, predicate: &F, ancestors: &mut Vec<NodeRef>, out: &mut Vec<NodeRef>)
    where
        F: Fn(&NodeRef, &[NodeRef]) -> bool,
    {
        ancestors.push(Arc::clone(node));
        let children: Vec<NodeRef> = node.children().into_iter().map(Arc::clone).collect();
        for child in &children {
            if predicate(child, ancestors) {
                out.push(Arc::clone(child));
            }
            walk(child, predicate, ancestors, out);
        }
        ancestors.pop();
    }

    let mut out = Vec::new();
    let mut ancestors = Vec::new();
    walk(root, &predicate, &mut ancestors, &mut out);
    out
}

fn first_token_in(node: &NodeRef) -> Option<NodeRef> {
    match &**node {
        Node::Token(_) => Some(Arc::clone(node)),
        Node::Missing => None,
        _ => node.children().into_iter().find_map(first_token_in),
    }
}

fn last_token_in(node: &NodeRef) -> Option<NodeRef> {
    match &**node {
        Node::Token(_) => Some(Arc::clone(node)),
        Node::Missing => None,
        _ => node.children().into_iter().rev().find_map(last_token_in),
    }
}

/// Traversal and editing helpers on shared node handles.
pub trait NodeExt {
    /// See [`rewrite`].
    fn rewrite<F>(&self, transform: &F) -> NodeRef
    where
        F: Fn(NodeRef, &[NodeRef]) -> NodeRef;

    /// See [`replace`].
    fn replace(&self, target: &NodeRef, replacement: NodeRef) -> NodeRef;

    /// See [`replace_tracking`].
    fn replace_tracking(&self, target: &NodeRef, replacement: NodeRef) -> (NodeRef, usize);

    /// See [`descendants_where`].
    fn descendants_where<F>(&self, predicate: F) -> Vec<NodeRef>
    where
        F: Fn(&NodeRef, &[NodeRef]) -> bool;

    /// The first token in this subtree, in document order.
    fn first_token(&self) -> Option<NodeRef>;

    /// The last token in this subtree, in document order.
    fn last_token(&self) -> Option<NodeRef>;

    /// Rebuild this subtree with its first token's leading trivia replaced.
    /// Returns the subtree unchanged when it contains no token.
    fn with_leading_trivia(&self, leading: Trivia) -> NodeRef;

    /// Rebuild this subtree with its last token's trailing trivia replaced.
    /// Returns the subtree unchanged when it contains no token.
    fn with_trailing_trivia(&self, trailing: Trivia) -> NodeRef;
}

impl NodeExt for NodeRef {
    fn rewrite<F>(&self, transform: &F) -> NodeRef
    where
        F: Fn(NodeRef, &[NodeRef]) -> NodeRef,
    {
        rewrite(self, transform)
    }

    fn replace(&self, target: &NodeRef, replacement: NodeRef) -> NodeRef {
        replace(self, target, replacement)
    }

    fn replace_tracking(&self, target: &NodeRef, replacement: NodeRef) -> (NodeRef, usize) {
        replace_tracking(self, target, replacement)
    }

    fn descendants_where<F>(&self, predicate: F) -> Vec<NodeRef>
    where
        F: Fn(&NodeRef, &[NodeRef]) -> bool,
    {
        descendants_where(self, predicate)
    }

    fn first_token(&self) -> Option<NodeRef> {
        first_token_in(self)
    }

    fn last_token(&self) -> Option<NodeRef> {
        last_token_in(self)
    }

    fn with_leading_trivia(&self, leading: Trivia) -> NodeRef {
        match self.first_token() {
            Some(token_node) => {
                let Node::Token(token) = &*token_node else {
                    return Arc::clone(self);
                };
                self.replace(&token_node, Node::token(token.with_leading(leading)))
            }
            None => Arc::clone(self),
        }
    }

    fn with_trailing_trivia(&self, trailing: Trivia) -> NodeRef {
        match self.last_token() {
            Some(token_node) => {
                let Node::Token(token) = &*token_node else {
                    return Arc::clone(self);
                };
                self.replace(&token_node, Node::token(token.with_trailing(trailing)))
            }
            None => Arc::clone(self),
        }
    }
}
