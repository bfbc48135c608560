//! Naoshi Core
//!
//! Core engine for programmatic Hack/PHP source migrations: a fully
//! lossless, immutable syntax tree, a generic bottom-up rewrite engine with
//! structural sharing, identity-based subtree replacement, and a framework
//! for composing pattern-matched transforms into multi-pass codemods.

pub mod config;
pub mod error;
pub mod migrate;
pub mod parser;
pub mod result;
pub mod syntax; // Lossless syntax tree (immutable, structurally shared)

// Re-export commonly used types
pub use config::{CONFIG_FILE_NAME, MigrationSettings, NaoshiConfig, ParserSettings};
pub use error::{ErrorKind, NaoshiError};
pub use migrate::{Migration, MigrationStep, TypedMigrationStep};
pub use parser::{ExternalParser, ParseResult, from_parser_output};
pub use result::{Result, ResultExt};
pub use syntax::{
    Node, NodeExt, NodeRef, Syntax, SyntaxKind, Token, TokenKind, Trivia, TypedSyntax,
    from_parse_tree,
};

/// Initialize the tracing subscriber for logging
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("naoshi=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
