//! Migration step framework
//!
//! A migration is an ordered pipeline of named, kind-constrained pure
//! transforms. Each step is one complete tree-wide rewrite pass; the tree
//! produced by step *i* is the input of step *i + 1*, so a later step always
//! sees fully-updated state, never a mix.
//!
//! Well-formed steps are idempotent by construction: a step's pattern guard
//! must no longer match the shape it produces, so re-running a migration is
//! a no-op. The framework stores steps as data and does not enforce this
//! contract; it is on step authors.

use std::sync::Arc;

use crate::syntax::{NodeExt, NodeRef, SyntaxKind, TypedSyntax};

/// One tree-wide transformation pass.
pub trait MigrationStep: Send + Sync {
    fn name(&self) -> &str;

    /// Kind of the nodes this step inspects.
    fn source_kind(&self) -> SyntaxKind;

    /// Kind of the nodes this step produces on a match.
    fn result_kind(&self) -> SyntaxKind;

    /// Apply this step to the whole tree, returning the (possibly
    /// unchanged) new tree.
    fn apply(&self, root: &NodeRef) -> NodeRef;
}

/// A step constrained to a declared source kind `S` and result kind `R`.
///
/// The transform runs on every node of kind `S`; every other node passes
/// through untouched. Returning `None` keeps the original node reference, so
/// a guard rejection costs no allocation anywhere in the tree.
pub struct TypedMigrationStep<S, R>
where
    S: TypedSyntax,
    R: TypedSyntax,
{
    name: String,
    transform: Box<dyn Fn(&S) -> Option<R> + Send + Sync>,
}

impl<S, R> TypedMigrationStep<S, R>
where
    S: TypedSyntax,
    R: TypedSyntax,
{
    pub fn new(
        name: impl Into<String>,
        transform: impl Fn(&S) -> Option<R> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            transform: Box::new(transform),
        }
    }
}

impl<S, R> MigrationStep for TypedMigrationStep<S, R>
where
    S: TypedSyntax,
    R: TypedSyntax,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn source_kind(&self) -> SyntaxKind {
        S::KIND
    }

    fn result_kind(&self) -> SyntaxKind {
        R::KIND
    }

    fn apply(&self, root: &NodeRef) -> NodeRef {
        root.rewrite(&|node, _ancestors| {
            let replacement = match S::cast(&node) {
                Some(typed) => (self.transform)(typed),
                None => None,
            };
            match replacement {
                Some(rewritten) => rewritten.into_node(),
                None => node,
            }
        })
    }
}

/// A named, ordered sequence of migration steps.
pub trait Migration: Send + Sync {
    fn name(&self) -> &str;

    fn steps(&self) -> Vec<Box<dyn MigrationStep>>;

    /// Fold the tree through every step, left to right.
    fn migrate(&self, root: &NodeRef) -> NodeRef {
        let mut tree = Arc::clone(root);
        for step in self.steps() {
            tracing::debug!(migration = self.name(), step = step.name(), "applying step");
            tree = step.apply(&tree);
        }
        tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{
        EchoStatement, Node, Token, TokenKind, Trivia, VariableExpression,
    };

    fn var(name: &str) -> NodeRef {
        VariableExpression::new(Node::token(Token::new(
            TokenKind::Variable,
            Trivia::empty(),
            name,
            Trivia::empty(),
        )))
        .into_node()
    }

    fn echo(expression: NodeRef) -> NodeRef {
        EchoStatement::new(
            Node::token(Token::new(
                TokenKind::Echo,
                Trivia::empty(),
                "echo",
                Trivia::new(" "),
            )),
            expression,
            Node::token(Token::new(
                TokenKind::Semicolon,
                Trivia::empty(),
                ";",
                Trivia::empty(),
            )),
        )
        .into_node()
    }

    fn rename_step(from: &str, to: &str) -> TypedMigrationStep<VariableExpression, VariableExpression> {
        let from = from.to_string();
        let to = to.to_string();
        TypedMigrationStep::new("rename variable", move |node: &VariableExpression| {
            let token = node.expression().as_token()?;
            if token.text() != from {
                return None;
            }
            Some(VariableExpression::new(Node::token(Token::new(
                TokenKind::Variable,
                token.leading().clone(),
                to.clone(),
                token.trailing().clone(),
            ))))
        })
    }

    #[test]
    fn typed_step_rewrites_matching_nodes_only() {
        let tree = echo(var("$a"));
        let step = rename_step("$a", "$b");

        let rewritten = step.apply(&tree);
        assert_eq!(rewritten.full_text(), "echo $b;");
        assert_eq!(step.source_kind(), crate::syntax::SyntaxKind::VariableExpression);
    }

    #[test]
    fn typed_step_is_a_noop_without_matches() {
        let tree = echo(var("$other"));
        let step = rename_step("$a", "$b");

        let rewritten = step.apply(&tree);
        assert!(Arc::ptr_eq(&tree, &rewritten));
    }

    struct RenamePipeline;

    impl Migration for RenamePipeline {
        fn name(&self) -> &str {
            "rename pipeline"
        }

        fn steps(&self) -> Vec<Box<dyn MigrationStep>> {
            vec![
                Box::new(rename_step("$a", "$b")),
                Box::new(rename_step("$b", "$c")),
            ]
        }
    }

    #[test]
    fn migration_feeds_each_step_the_previous_steps_output() {
        let tree = echo(var("$a"));

        // The second step sees the first step's output, so $a ends as $c.
        let migrated = RenamePipeline.migrate(&tree);
        assert_eq!(migrated.full_text(), "echo $c;");
    }
}
