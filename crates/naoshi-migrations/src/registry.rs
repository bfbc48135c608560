//! Registry for resolving migrations by name

use std::collections::HashMap;
use std::sync::Arc;

use naoshi_core::Migration;

/// Registry for managing named migrations
pub struct MigrationRegistry {
    migrations: HashMap<String, Arc<dyn Migration>>,
}

impl MigrationRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            migrations: HashMap::new(),
        }
    }

    /// Create a registry with every built-in migration registered
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(crate::builtin::ArrayRefInForeachMigration));
        registry
    }

    /// Register a migration under its own name
    pub fn register(&mut self, migration: Arc<dyn Migration>) {
        let name = migration.name().to_string();
        if self.migrations.insert(name.clone(), migration).is_some() {
            tracing::warn!(migration = %name, "replacing previously registered migration");
        }
    }

    /// Look up a migration by name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Migration>> {
        self.migrations.get(name)
    }

    /// Registered migration names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.migrations.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.migrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.migrations.is_empty()
    }
}

impl Default for MigrationRegistry {
    fn default() -> Self {
        Self::new()
    }
}
