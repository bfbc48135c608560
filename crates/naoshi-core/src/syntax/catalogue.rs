//! The per-kind node catalogue
//!
//! One record per grammar production, mechanically produced by the
//! `syntax_kinds!` macro: named `NodeRef` fields in document order, a
//! constructor, per-field accessors and `with_*` builders, parse-tree
//! deserialization with the field tags the external parser emits, and the
//! child-rewrite hook used by the rewrite engine.
//!
//! The table below covers the statement/expression subset exercised by the
//! built-in migrations. Growing the catalogue is a table edit: add a row with
//! the kind tag and its field tags.

use std::sync::Arc;

use super::builder::TreeBuilder;
use super::node::{Node, NodeRef};
use super::rewrite::rewrite_in;
use crate::error::NaoshiError;
use crate::result::Result;

/// A typed view of an interior node of one specific kind.
///
/// `cast` is the guard form (`None` means "pattern does not apply");
/// `cast_checked` is the asserting form and signals a shape mismatch.
pub trait TypedSyntax: Sized + Clone + Into<Syntax> + 'static {
    const KIND: SyntaxKind;

    fn cast(node: &NodeRef) -> Option<&Self>;

    fn cast_checked(node: &NodeRef) -> Result<&Self> {
        Self::cast(node)
            .ok_or_else(|| NaoshiError::shape_mismatch(Self::KIND.tag(), node.describe()))
    }

    /// Wrap this payload back into a shared tree node.
    fn into_node(self) -> NodeRef {
        Node::syntax(self.into())
    }
}

macro_rules! syntax_kinds {
    ($(
        $(#[$meta:meta])*
        $name:ident = $tag:literal {
            $( $field:ident / $with_field:ident : $json:literal ),+ $(,)?
        }
    ),+ $(,)?) => {
        /// Discriminant identifying the grammar production of an interior
        /// node. Fixes the number, order, and role of its children.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum SyntaxKind {
            $( $name ),+
        }

        impl SyntaxKind {
            /// The kind tag used by the parse-tree description.
            pub fn tag(self) -> &'static str {
                match self {
                    $( Self::$name => $tag ),+
                }
            }

            /// Resolve a parse-tree kind tag; `None` for tags outside the
            /// catalogue.
            pub fn from_tag(tag: &str) -> Option<Self> {
                match tag {
                    $( $tag => Some(Self::$name), )+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for SyntaxKind {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.tag())
            }
        }

        /// Interior node payload: one fixed named-child record per kind.
        #[derive(Debug, Clone, PartialEq)]
        pub enum Syntax {
            $( $name($name) ),+
        }

        impl Syntax {
            pub fn kind(&self) -> SyntaxKind {
                match self {
                    $( Self::$name(_) => SyntaxKind::$name ),+
                }
            }

            /// Named child slots in document order.
            pub fn children(&self) -> Vec<(&'static str, &NodeRef)> {
                match self {
                    $( Self::$name(node) => node.children() ),+
                }
            }

            pub(crate) fn from_parse_tree(
                kind: SyntaxKind,
                fields: &serde_json::Map<String, serde_json::Value>,
                builder: &mut TreeBuilder<'_>,
            ) -> Result<Self> {
                match kind {
                    $( SyntaxKind::$name => {
                        Ok(Self::$name($name::from_parse_tree(fields, builder)?))
                    } ),+
                }
            }

            pub(crate) fn rewrite_children<F>(
                &self,
                transform: &F,
                ancestors: &mut Vec<NodeRef>,
            ) -> Option<Self>
            where
                F: Fn(NodeRef, &[NodeRef]) -> NodeRef,
            {
                match self {
                    $( Self::$name(node) => {
                        node.rewrite_children(transform, ancestors).map(Self::$name)
                    } ),+
                }
            }
        }

        $(
            $(#[$meta])*
            #[derive(Debug, Clone, PartialEq)]
            pub struct $name {
                $( $field: NodeRef ),+
            }

            impl $name {
                pub fn new($( $field: NodeRef ),+) -> Self {
                    Self { $( $field ),+ }
                }

                $(
                    pub fn $field(&self) -> &NodeRef {
                        &self.$field
                    }

                    /// Returns a new node with exactly this child replaced;
                    /// all other children are retained by reference.
                    pub fn $with_field(&self, $field: NodeRef) -> Self {
                        Self {
                            $field,
                            ..self.clone()
                        }
                    }
                )+

                pub fn children(&self) -> Vec<(&'static str, &NodeRef)> {
                    vec![ $( (stringify!($field), &self.$field) ),+ ]
                }

                pub(crate) fn from_parse_tree(
                    fields: &serde_json::Map<String, serde_json::Value>,
                    builder: &mut TreeBuilder<'_>,
                ) -> Result<Self> {
                    Ok(Self {
                        $( $field: builder.field(fields, $json)?, )+
                    })
                }

                pub(crate) fn rewrite_children<F>(
                    &self,
                    transform: &F,
                    ancestors: &mut Vec<NodeRef>,
                ) -> Option<Self>
                where
                    F: Fn(NodeRef, &[NodeRef]) -> NodeRef,
                {
                    $( let $field = rewrite_in(&self.$field, transform, ancestors); )+
                    if $( Arc::ptr_eq(&$field, &self.$field) )&&+ {
                        return None;
                    }
                    Some(Self { $( $field ),+ })
                }
            }

            impl TypedSyntax for $name {
                const KIND: SyntaxKind = SyntaxKind::$name;

                fn cast(node: &NodeRef) -> Option<&Self> {
                    match &**node {
                        Node::Syntax(Syntax::$name(inner)) => Some(inner),
                        _ => None,
                    }
                }
            }

            impl From<$name> for Syntax {
                fn from(node: $name) -> Self {
                    Self::$name(node)
                }
            }
        )+
    };
}

syntax_kinds! {
    /// A whole source file: its declaration list.
    Script = "script" {
        declarations / with_declarations: "script_declarations",
    },
    /// `<?hh` / inline markup section at the top of a file.
    MarkupSection = "markup_section" {
        prefix / with_prefix: "markup_prefix",
        text / with_text: "markup_text",
        suffix / with_suffix: "markup_suffix",
        expression / with_expression: "markup_expression",
    },
    MarkupSuffix = "markup_suffix" {
        less_than_question / with_less_than_question: "markup_suffix_less_than_question",
        name / with_name: "markup_suffix_name",
    },
    ExpressionStatement = "expression_statement" {
        expression / with_expression: "expression_statement_expression",
        semicolon / with_semicolon: "expression_statement_semicolon",
    },
    /// `{ ... }` statement block.
    CompoundStatement = "compound_statement" {
        left_brace / with_left_brace: "compound_left_brace",
        statements / with_statements: "compound_statements",
        right_brace / with_right_brace: "compound_right_brace",
    },
    EchoStatement = "echo_statement" {
        keyword / with_keyword: "echo_keyword",
        expressions / with_expressions: "echo_expressions",
        semicolon / with_semicolon: "echo_semicolon",
    },
    /// `foreach (collection [await] as [key =>] value) body`
    ForeachStatement = "foreach_statement" {
        keyword / with_keyword: "foreach_keyword",
        left_paren / with_left_paren: "foreach_left_paren",
        collection / with_collection: "foreach_collection",
        await_keyword / with_await_keyword: "foreach_await_keyword",
        as_keyword / with_as_keyword: "foreach_as",
        key / with_key: "foreach_key",
        arrow / with_arrow: "foreach_arrow",
        value / with_value: "foreach_value",
        right_paren / with_right_paren: "foreach_right_paren",
        body / with_body: "foreach_body",
    },
    IfStatement = "if_statement" {
        keyword / with_keyword: "if_keyword",
        left_paren / with_left_paren: "if_left_paren",
        condition / with_condition: "if_condition",
        right_paren / with_right_paren: "if_right_paren",
        statement / with_statement: "if_statement",
        elseif_clauses / with_elseif_clauses: "if_elseif_clauses",
        else_clause / with_else_clause: "if_else_clause",
    },
    ElseifClause = "elseif_clause" {
        keyword / with_keyword: "elseif_keyword",
        left_paren / with_left_paren: "elseif_left_paren",
        condition / with_condition: "elseif_condition",
        right_paren / with_right_paren: "elseif_right_paren",
        statement / with_statement: "elseif_statement",
    },
    ElseClause = "else_clause" {
        keyword / with_keyword: "else_keyword",
        statement / with_statement: "else_statement",
    },
    WhileStatement = "while_statement" {
        keyword / with_keyword: "while_keyword",
        left_paren / with_left_paren: "while_left_paren",
        condition / with_condition: "while_condition",
        right_paren / with_right_paren: "while_right_paren",
        body / with_body: "while_body",
    },
    /// An operator applied before its operand, e.g. `&$x`, `-$n`.
    PrefixUnaryExpression = "prefix_unary_expression" {
        operator / with_operator: "prefix_unary_operator",
        operand / with_operand: "prefix_unary_operand",
    },
    BinaryExpression = "binary_expression" {
        left_operand / with_left_operand: "binary_left_operand",
        operator / with_operator: "binary_operator",
        right_operand / with_right_operand: "binary_right_operand",
    },
    /// `callee(arguments)`
    FunctionCallExpression = "function_call_expression" {
        receiver / with_receiver: "function_call_receiver",
        left_paren / with_left_paren: "function_call_left_paren",
        argument_list / with_argument_list: "function_call_argument_list",
        right_paren / with_right_paren: "function_call_right_paren",
    },
    /// `receiver[index]`
    SubscriptExpression = "subscript_expression" {
        receiver / with_receiver: "subscript_receiver",
        left_bracket / with_left_bracket: "subscript_left_bracket",
        index / with_index: "subscript_index",
        right_bracket / with_right_bracket: "subscript_right_bracket",
    },
    /// A simple `$variable` reference; wraps the variable token.
    VariableExpression = "variable" {
        expression / with_expression: "variable_expression",
    },
    LiteralExpression = "literal" {
        expression / with_expression: "literal_expression",
    },
    QualifiedNameExpression = "qualified_name" {
        expression / with_expression: "qualified_name_expression",
    },
    /// `object->name`
    MemberSelectionExpression = "member_selection_expression" {
        object / with_object: "member_object",
        operator / with_operator: "member_operator",
        name / with_name: "member_name",
    },
    ParenthesizedExpression = "parenthesized_expression" {
        left_paren / with_left_paren: "parenthesized_expression_left_paren",
        expression / with_expression: "parenthesized_expression_expression",
        right_paren / with_right_paren: "parenthesized_expression_right_paren",
    },
    /// One element of a delimited list, with its optional separator.
    ListItem = "list_item" {
        item / with_item: "list_item",
        separator / with_separator: "list_separator",
    },
}
