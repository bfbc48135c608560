//! External parser invocation
//!
//! Parsing is delegated to the `hh_parse` executable: it receives a file and
//! prints a JSON document holding the kind-tagged parse tree plus the exact
//! program text. This module runs that subprocess, bounded by a concurrency
//! lease, and hands the output to the deserializer. A non-zero exit or
//! malformed output surfaces as a parse error carrying the file identifier;
//! failures are never retried and never swallowed.
//!
//! All tree construction after the subprocess returns is synchronous; the
//! lease is the only genuine concurrency in the system.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;

use serde_json::Value;
use tokio::process::Command;
use tokio::sync::Semaphore;

use crate::config::ParserSettings;
use crate::error::NaoshiError;
use crate::result::Result;
use crate::syntax::{NodeRef, from_parse_tree};

/// Outcome of parsing one file.
#[derive(Debug)]
pub struct ParseResult {
    /// File the source came from.
    pub file: PathBuf,
    /// Exact original source bytes.
    pub source: Arc<str>,
    /// Root of the lossless tree.
    pub root: NodeRef,
}

impl ParseResult {
    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> &NodeRef {
        &self.root
    }
}

/// Handle to the external parser executable.
///
/// Stateless apart from the lease: a semaphore permit is held for the
/// lifetime of each subprocess and released on every exit path, capping how
/// many parsers run simultaneously.
pub struct ExternalParser {
    binary: PathBuf,
    php5_compat: bool,
    lease: Arc<Semaphore>,
}

impl ExternalParser {
    pub fn new(settings: &ParserSettings) -> Self {
        Self {
            binary: settings.binary.clone(),
            php5_compat: settings.php5_compat,
            lease: Arc::new(Semaphore::new(settings.max_concurrency.max(1))),
        }
    }

    /// Parse a file on disk.
    pub async fn parse_file(&self, file: impl AsRef<Path>) -> Result<ParseResult> {
        let file = file.as_ref();
        let json = self.invoke(file).await?;
        from_parser_output(file, &json)
    }

    /// Parse source text by writing it to a temporary file first; the
    /// external parser only accepts files.
    pub async fn parse_source(&self, source: &str) -> Result<ParseResult> {
        let temp = tempfile::Builder::new()
            .prefix("naoshi-")
            .suffix(".php")
            .tempfile()
            .map_err(|err| NaoshiError::io("<temp>", err))?;
        tokio::fs::write(temp.path(), source)
            .await
            .map_err(|err| NaoshiError::io(temp.path(), err))?;
        self.parse_file(temp.path()).await
    }

    async fn invoke(&self, file: &Path) -> Result<Value> {
        // Lease permit held until the subprocess finishes; dropped on every
        // exit path including errors.
        let _permit = Arc::clone(&self.lease)
            .acquire_owned()
            .await
            .map_err(|err| NaoshiError::internal(format!("parser lease closed: {err}")))?;

        tracing::debug!(file = %file.display(), parser = %self.binary.display(), "invoking parser");

        let mut command = Command::new(&self.binary);
        if self.php5_compat {
            command.arg("--php5-compat-mode");
        }
        command
            .arg("--full-fidelity-json")
            .arg(file)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let output = command.output().await.map_err(|err| {
            NaoshiError::parse(
                file,
                format!("failed to launch `{}`: {err}", self.binary.display()),
            )
        })?;

        if !output.status.success() {
            return Err(NaoshiError::parse(
                file,
                format!(
                    "`{}` exited with {}: {}",
                    self.binary.display(),
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            ));
        }

        serde_json::from_slice(&output.stdout)
            .map_err(|err| NaoshiError::parse(file, format!("parser emitted malformed JSON: {err}")))
    }
}

/// Turn a complete parser output document (`parse_tree` + `program_text`)
/// into a [`ParseResult`].
pub fn from_parser_output(file: &Path, output: &Value) -> Result<ParseResult> {
    let description = output
        .get("parse_tree")
        .ok_or_else(|| NaoshiError::parse(file, "parser output is missing `parse_tree`"))?;
    let source = output
        .get("program_text")
        .and_then(Value::as_str)
        .ok_or_else(|| NaoshiError::parse(file, "parser output is missing `program_text`"))?;
    let root = from_parse_tree(description, source)?;
    Ok(ParseResult {
        file: file.to_path_buf(),
        source: Arc::from(source),
        root,
    })
}
