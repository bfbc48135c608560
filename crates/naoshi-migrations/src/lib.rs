//! Naoshi Migrations
//!
//! Built-in migrations for the Naoshi codemod toolkit, plus the registry the
//! CLI resolves migration names against. Each migration is an ordered list
//! of kind-constrained pure transforms applied tree-wide by
//! `naoshi-core`'s rewrite engine.

pub mod builtin;
mod registry;

pub use builtin::ArrayRefInForeachMigration;
pub use registry::MigrationRegistry;
