//! Repairs by-reference value bindings in `foreach` loops

use std::sync::Arc;

use naoshi_core::syntax::{
    ForeachStatement, FunctionCallExpression, Node, NodeExt, PrefixUnaryExpression,
    SubscriptExpression, Token, TokenKind, Trivia, TypedSyntax, VariableExpression,
};
use naoshi_core::{Migration, MigrationStep, TypedMigrationStep};

/// Rewrites `foreach ($xs as &$x)` loops into by-key loops:
/// `foreach (array_keys($xs) as $x_key)`, with every reference to `$x` in
/// the loop body replaced by `$xs[$x_key]`.
///
/// The match is purely structural and conservative. Loops with an explicit
/// key binding, a value binding that is not a by-reference simple variable,
/// or a collection that is neither a variable nor a subscript expression are
/// left unchanged.
pub struct ArrayRefInForeachMigration;

impl Migration for ArrayRefInForeachMigration {
    fn name(&self) -> &str {
        "array-ref-in-foreach"
    }

    fn steps(&self) -> Vec<Box<dyn MigrationStep>> {
        vec![Box::new(TypedMigrationStep::new(
            "repair array refs in foreach loops",
            rewrite_by_ref_foreach,
        ))]
    }
}

fn rewrite_by_ref_foreach(foreach: &ForeachStatement) -> Option<ForeachStatement> {
    if foreach.collection().is_missing() || foreach.value().is_missing() {
        return None;
    }

    // Skip `foreach ($xs as $key => $value)`.
    if !foreach.key().is_missing() {
        return None;
    }

    // The value binding must be `&$variable`.
    let value = PrefixUnaryExpression::cast(foreach.value())?;
    if !value.operator().is_token(TokenKind::Ampersand) {
        return None;
    }
    let operand = VariableExpression::cast(value.operand())?;
    let operand_token = operand.expression().as_token()?.clone();

    let collection = foreach.collection();
    if VariableExpression::cast(collection).is_none()
        && SubscriptExpression::cast(collection).is_none()
    {
        return None;
    }

    // Strategy:
    // 1. `foreach ($xs as &$x)` becomes `foreach (array_keys($xs) as $x_key)`.
    // 2. References to `$x` in the body become `$xs[$x_key]`.
    //
    // Risks: `$x` or `$x_key` may also be used after the loop, and this
    // rewrite changes what they hold there. The match does not look outside
    // the statement.

    let first = collection.first_token()?;
    let last = collection.last_token()?;
    let collection_leading = first.as_token()?.leading().clone();
    let collection_trailing = last.as_token()?.trailing().clone();
    let stripped = collection
        .with_leading_trivia(Trivia::empty())
        .with_trailing_trivia(Trivia::empty());

    let keys_call = FunctionCallExpression::new(
        Node::token(Token::new(
            TokenKind::Name,
            collection_leading,
            "array_keys",
            Trivia::empty(),
        )),
        Node::token(Token::new(
            TokenKind::LeftParen,
            Trivia::empty(),
            "(",
            Trivia::empty(),
        )),
        Arc::clone(&stripped),
        Node::token(Token::new(
            TokenKind::RightParen,
            Trivia::empty(),
            ")",
            collection_trailing,
        )),
    )
    .into_node();

    // The key variable is named after the original binding. One instance is
    // shared between the loop header and every body subscript.
    let key_variable = VariableExpression::new(Node::token(Token::new(
        TokenKind::Variable,
        operand_token.leading().clone(),
        format!("{}_key", operand_token.text()),
        operand_token.trailing().clone(),
    )))
    .into_node();

    // References are matched by exact token text, collected before the
    // header is rebuilt; the body subtree itself is unchanged by that
    // rebuild, so the collected references stay valid.
    let references = foreach.body().descendants_where(|node, _ancestors| {
        VariableExpression::cast(node)
            .and_then(|variable| variable.expression().as_token())
            .is_some_and(|token| token.text() == operand_token.text())
    });

    let mut rewritten = foreach
        .with_collection(keys_call)
        .with_value(Arc::clone(&key_variable))
        .into_node();

    for reference in references {
        let Some(reference_token_node) = reference.first_token() else {
            continue;
        };
        let Some(reference_token) = reference_token_node.as_token() else {
            continue;
        };
        let subscript = SubscriptExpression::new(
            stripped.with_leading_trivia(reference_token.leading().clone()),
            Node::token(Token::new(
                TokenKind::LeftBracket,
                Trivia::empty(),
                "[",
                Trivia::empty(),
            )),
            Arc::clone(&key_variable),
            Node::token(Token::new(
                TokenKind::RightBracket,
                Trivia::empty(),
                "]",
                reference_token.trailing().clone(),
            )),
        )
        .into_node();
        rewritten = rewritten.replace(&reference, subscript);
    }

    ForeachStatement::cast(&rewritten).cloned()
}
