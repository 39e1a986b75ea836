//! Model loading and compilation.

use crate::formatter::Formatter;
use crate::Args;
use backforge_core::{CompileConfig, Compiler, DomainModel};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Execution errors.
#[derive(Debug, Error)]
pub enum ExecuteError {
    /// An input file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Loading, verifying, or compiling the model failed.
    #[error(transparent)]
    Compile(#[from] backforge_core::Error),
}

impl From<&Args> for CompileConfig {
    fn from(args: &Args) -> Self {
        CompileConfig::new().with_nested_creations(args.nested_creations.unwrap_or(false))
    }
}

fn read(path: &Path) -> Result<String, ExecuteError> {
    std::fs::read_to_string(path).map_err(|source| ExecuteError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Build the compile options: the config file if one is given, overridden by
/// any flag given on the command line.
pub fn load_config(args: &Args) -> Result<CompileConfig, ExecuteError> {
    let Some(path) = &args.config else {
        return Ok(CompileConfig::from(args));
    };

    let file = CompileConfig::from_json(&read(path)?)?;
    debug!(path = %path.display(), ?file, "loaded compile config");

    let nested_creations = args.nested_creations.unwrap_or(file.nested_creations);
    Ok(file.with_nested_creations(nested_creations))
}

/// Load a model from a JSON file.
pub fn load_model(path: &Path) -> Result<DomainModel, ExecuteError> {
    Ok(DomainModel::from_json(&read(path)?)?)
}

/// Compile the model at `path` and return formatted output.
pub fn execute(
    path: &Path,
    config: &CompileConfig,
    formatter: &dyn Formatter,
) -> Result<String, ExecuteError> {
    let model = load_model(path)?;
    let compiled = Compiler::new(config.clone()).compile(&model)?;
    Ok(formatter.format_compiled(&compiled)?)
}
