//! Tokens: the leaves of the syntax tree

use biome_text_size::TextSize;

use super::trivia::Trivia;

macro_rules! token_kinds {
    ($( $name:ident = $tag:literal ),+ $(,)?) => {
        /// Discriminant identifying a token's type.
        ///
        /// The tag strings match the token kinds emitted by the external
        /// parser's full-fidelity output.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum TokenKind {
            $( $name ),+
        }

        impl TokenKind {
            /// The kind tag used by the parse-tree description.
            pub fn name(self) -> &'static str {
                match self {
                    $( Self::$name => $tag ),+
                }
            }

            /// Resolve a parse-tree token tag; `None` for tags outside the
            /// catalogue.
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $( $tag => Some(Self::$name), )+
                    _ => None,
                }
            }
        }
    };
}

token_kinds! {
    // Keywords
    Foreach = "foreach",
    As = "as",
    Await = "await",
    Echo = "echo",
    If = "if",
    Elseif = "elseif",
    Else = "else",
    While = "while",

    // Punctuation and operators
    LeftParen = "left_paren",
    RightParen = "right_paren",
    LeftBracket = "left_bracket",
    RightBracket = "right_bracket",
    LeftBrace = "left_brace",
    RightBrace = "right_brace",
    Semicolon = "semicolon",
    Comma = "comma",
    Ampersand = "ampersand",
    Equal = "equal",
    EqualGreaterThan = "equal_greater_than",
    MinusGreaterThan = "minus_greater_than",
    Dot = "dot",
    Plus = "plus",
    Minus = "minus",
    LessThanQuestion = "less_than_question",
    QuestionGreaterThan = "question_greater_than",

    // Identifiers and literals
    Variable = "variable",
    Name = "name",
    DecimalLiteral = "decimal_literal",
    SingleQuotedStringLiteral = "single_quoted_string_literal",
    DoubleQuotedStringLiteral = "double_quoted_string_literal",
    BooleanLiteral = "boolean_literal",

    // Markers
    Markup = "markup",
    EndOfFile = "end_of_file",
}

/// A leaf of the syntax tree: exact source text plus surrounding trivia.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    leading: Trivia,
    text: String,
    trailing: Trivia,
}

impl Token {
    pub fn new(
        kind: TokenKind,
        leading: Trivia,
        text: impl Into<String>,
        trailing: Trivia,
    ) -> Self {
        Self {
            kind,
            leading,
            text: text.into(),
            trailing,
        }
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// The token's semantic text, without trivia.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn leading(&self) -> &Trivia {
        &self.leading
    }

    pub fn trailing(&self) -> &Trivia {
        &self.trailing
    }

    /// Total width covered by this token: leading + text + trailing.
    pub fn full_width(&self) -> TextSize {
        self.leading.width() + TextSize::of(&self.text) + self.trailing.width()
    }

    /// Returns a copy of this token with different leading trivia.
    pub fn with_leading(&self, leading: Trivia) -> Self {
        Self {
            leading,
            ..self.clone()
        }
    }

    /// Returns a copy of this token with different trailing trivia.
    pub fn with_trailing(&self, trailing: Trivia) -> Self {
        Self {
            trailing,
            ..self.clone()
        }
    }

    /// Write leading + text + trailing into `out`.
    pub fn write_text(&self, out: &mut String) {
        out.push_str(self.leading.text());
        out.push_str(&self.text);
        out.push_str(self.trailing.text());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_kind_tags_round_trip() {
        for kind in [
            TokenKind::Foreach,
            TokenKind::Ampersand,
            TokenKind::Variable,
            TokenKind::EndOfFile,
        ] {
            assert_eq!(TokenKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(TokenKind::from_name("no_such_token"), None);
    }

    #[test]
    fn token_width_includes_trivia() {
        let token = Token::new(
            TokenKind::Variable,
            Trivia::new("  "),
            "$xs",
            Trivia::new("\n"),
        );
        assert_eq!(token.full_width(), TextSize::from(6));

        let mut text = String::new();
        token.write_text(&mut text);
        assert_eq!(text, "  $xs\n");
    }

    #[test]
    fn with_leading_keeps_other_parts() {
        let token = Token::new(TokenKind::Name, Trivia::new(" "), "array_keys", Trivia::empty());
        let moved = token.with_leading(Trivia::empty());
        assert_eq!(moved.text(), "array_keys");
        assert!(moved.leading().is_empty());
        assert_eq!(moved.trailing(), token.trailing());
    }
}
