//! Whitespace and comment spans attached to tokens

use biome_text_size::TextSize;

/// An opaque span of whitespace and comments attached to a token.
///
/// Trivia is excluded from a token's semantic text but required for lossless
/// reconstruction. It is never independently addressable in the tree; moving
/// formatting around means building new tokens with different trivia.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trivia {
    text: String,
}

impl Trivia {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn width(&self) -> TextSize {
        TextSize::of(&self.text)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_trivia_has_zero_width() {
        let trivia = Trivia::empty();
        assert!(trivia.is_empty());
        assert_eq!(trivia.width(), TextSize::from(0));
    }

    #[test]
    fn trivia_width_counts_bytes() {
        let trivia = Trivia::new("  // note\n");
        assert_eq!(trivia.width(), TextSize::from(10));
        assert_eq!(trivia.text(), "  // note\n");
    }
}
