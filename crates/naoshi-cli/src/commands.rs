//! CLI command implementations

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use naoshi_core::{ExternalParser, Migration, NaoshiConfig, ParseResult, Result as CoreResult};
use naoshi_migrations::MigrationRegistry;
use tracing::{debug, error, info};
use walkdir::WalkDir;

/// Extensions treated as Hack/PHP source when walking directories.
const SOURCE_EXTENSIONS: &[&str] = &["php", "hack", "hh"];

pub struct MigrateOptions {
    pub paths: Vec<PathBuf>,
    pub migrations: Vec<String>,
    pub write: bool,
}

/// Run migrations over the requested paths. Returns the process exit code:
/// non-zero when any file failed to parse.
pub async fn migrate(config: &NaoshiConfig, options: MigrateOptions) -> anyhow::Result<i32> {
    let registry = MigrationRegistry::with_builtins();
    let selected = select_migrations(&registry, config, &options.migrations)?;
    let files = collect_files(&options.paths)?;
    if files.is_empty() {
        bail!("no source files found in the given paths");
    }

    info!(
        files = files.len(),
        migrations = selected.len(),
        "starting migration run"
    );

    // Parse concurrently; the parser lease caps how many subprocesses
    // actually run at once.
    let parser = Arc::new(ExternalParser::new(&config.parser));
    let parses = files.iter().map(|file| {
        let parser = Arc::clone(&parser);
        async move { parser.parse_file(file).await }
    });
    let parsed: Vec<CoreResult<ParseResult>> = futures::future::join_all(parses).await;

    let mut changed = 0usize;
    let mut failed = 0usize;
    for (file, result) in files.iter().zip(parsed) {
        let parsed = match result {
            Ok(parsed) => parsed,
            Err(err) => {
                // One unparseable file must not block the rest of the run.
                error!("{err}");
                failed += 1;
                continue;
            }
        };

        let mut tree = Arc::clone(parsed.root());
        for migration in &selected {
            tree = migration.migrate(&tree);
        }

        let output = tree.full_text();
        if output == parsed.source() {
            debug!(file = %file.display(), "unchanged");
            continue;
        }

        changed += 1;
        if options.write {
            tokio::fs::write(file, &output)
                .await
                .with_context(|| format!("cannot write {}", file.display()))?;
            info!(file = %file.display(), "rewrote");
        } else {
            println!("would rewrite {}", file.display());
        }
    }

    let verb = if options.write { "rewrote" } else { "would rewrite" };
    println!(
        "{verb} {changed} of {} files ({failed} failed to parse)",
        files.len()
    );

    Ok(if failed > 0 { 1 } else { 0 })
}

/// Print every registered migration and its steps.
pub fn list_migrations() {
    let registry = MigrationRegistry::with_builtins();
    for name in registry.names() {
        println!("{name}");
        if let Some(migration) = registry.get(name) {
            for step in migration.steps() {
                println!("  - {}", step.name());
            }
        }
    }
}

fn select_migrations(
    registry: &MigrationRegistry,
    config: &NaoshiConfig,
    requested: &[String],
) -> anyhow::Result<Vec<Arc<dyn Migration>>> {
    let names: Vec<String> = if !requested.is_empty() {
        requested.to_vec()
    } else if !config.migrations.enabled.is_empty() {
        config.migrations.enabled.clone()
    } else {
        registry.names().into_iter().map(String::from).collect()
    };

    names
        .iter()
        .map(|name| {
            registry.get(name).map(Arc::clone).ok_or_else(|| {
                anyhow::anyhow!(
                    "unknown migration '{name}' (available: {})",
                    registry.names().join(", ")
                )
            })
        })
        .collect()
}

fn collect_files(paths: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            for entry in WalkDir::new(path) {
                let entry = entry.with_context(|| format!("cannot walk {}", path.display()))?;
                if entry.file_type().is_file() && has_source_extension(entry.path()) {
                    files.push(entry.into_path());
                }
            }
        } else {
            bail!("path does not exist: {}", path.display());
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn has_source_extension(path: &std::path::Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| SOURCE_EXTENSIONS.contains(&extension))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collect_files_walks_directories_for_source_files() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join("a.php"), "").unwrap();
        std::fs::write(nested.join("b.hack"), "").unwrap();
        std::fs::write(nested.join("notes.txt"), "").unwrap();

        let files = collect_files(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|file| has_source_extension(file)));
    }

    #[test]
    fn collect_files_keeps_explicit_files_regardless_of_extension() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("script");
        std::fs::write(&file, "").unwrap();

        let files = collect_files(&[file.clone()]).unwrap();
        assert_eq!(files, vec![file]);
    }

    #[test]
    fn collect_files_rejects_missing_paths() {
        let err = collect_files(&[PathBuf::from("/definitely/not/here")]).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn unknown_migrations_are_reported_with_the_available_set() {
        let registry = MigrationRegistry::with_builtins();
        let config = NaoshiConfig::default();

        let err = match select_migrations(&registry, &config, &["no-such".to_string()]) {
            Ok(_) => panic!("expected select_migrations to fail"),
            Err(err) => err,
        };
        assert!(err.to_string().contains("no-such"));
        assert!(err.to_string().contains("array-ref-in-foreach"));
    }

    #[test]
    fn default_selection_uses_every_registered_migration() {
        let registry = MigrationRegistry::with_builtins();
        let config = NaoshiConfig::default();

        let selected = select_migrations(&registry, &config, &[]).unwrap();
        assert_eq!(selected.len(), registry.len());
    }
}
