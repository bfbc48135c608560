//! Built-in migrations

mod array_ref_in_foreach;

pub use array_ref_in_foreach::ArrayRefInForeachMigration;
