//! `falsec` — the command-line driver that ties the three compiler
//! phases together: read a FALSE source file, parse it (which drives
//! the lexer internally), lower the AST to LLVM textual IR, and write
//! the result next to the input.
//!
//! This crate owns only orchestration. None of the three phases know
//! about files, paths, or the CLI; all of that lives here, keeping
//! "run the compiler" separate from "what the compiler does."

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser as ClapParser;
use falsec_util::{FalseError, Result as FalseResult};

/// `falsec <input> [<output>]`.
///
/// `input` is `Option` rather than a required positional so a missing
/// filename can be reported with the documented `Filename required`
/// message instead of clap's generic usage error.
#[derive(Debug, ClapParser)]
#[command(name = "falsec", about = "Compiles FALSE source to LLVM textual IR")]
pub struct Cli {
    /// FALSE source file to compile.
    pub input: Option<PathBuf>,

    /// Output path for the emitted `.ll` file.
    ///
    /// Defaults to the input path with its extension replaced by `.ll`.
    pub output: Option<PathBuf>,
}

/// Everything that can send `falsec` to a non-zero exit, kept separate
/// from [`FalseError`] so the no-filename case can be reported without
/// going through clap's own error formatting.
#[derive(Debug)]
pub enum DriverError {
    MissingFilename,
    Compile(anyhow::Error),
}

impl std::fmt::Display for DriverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DriverError::MissingFilename => write!(f, "Filename required"),
            DriverError::Compile(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for DriverError {}

/// Runs one `falsec` invocation end to end.
pub fn run(cli: Cli) -> Result<(), DriverError> {
    let input = cli.input.ok_or(DriverError::MissingFilename)?;
    let output = cli.output.unwrap_or_else(|| default_output(&input));

    let span = tracing::info_span!("falsec", input = %input.display(), output = %output.display());
    let _guard = span.enter();

    compile_file(&input, &output).map_err(|e| {
        DriverError::Compile(anyhow::Error::new(e).context(format!("compiling {}", input.display())))
    })
}

/// Derives the default output path by stripping the first extension
/// from the input's file name and appending `.ll` (e.g. `main.f` ->
/// `main.ll`, `a.b.false` -> `a.ll`, not `a.b.ll`).
pub fn default_output(input: &Path) -> PathBuf {
    let name = input.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    let stem = name.split('.').next().expect("split always yields at least one element");
    input.with_file_name(format!("{stem}.ll"))
}

/// Runs the lex/parse/codegen pipeline over one file and writes the
/// emitted IR, printing the two documented informational lines on
/// success.
fn compile_file(input: &Path, output: &Path) -> FalseResult<()> {
    tracing::debug!("reading source");
    let source = fs::read_to_string(input).map_err(FalseError::Io)?;

    tracing::debug!("parsing");
    let ast = falsec_par::Parser::new(&source)?.parse_program()?;
    println!("Parsed AST");

    tracing::debug!(nodes = ast.len(), "generating code");
    let ir = falsec_gen::compile(&ast)?;

    fs::write(output, ir).map_err(FalseError::Io)?;
    println!("Compiled to {}", output.display());

    Ok(())
}

/// Initializes the `tracing` subscriber from `RUST_LOG`, matching the
/// level `falsec-drv`'s own `tracing`/`tracing-subscriber` pair uses
/// across this workspace's crates.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_output_replaces_the_extension() {
        assert_eq!(default_output(Path::new("main.f")), PathBuf::from("main.ll"));
    }

    #[test]
    fn default_output_adds_extension_when_input_has_none() {
        assert_eq!(default_output(Path::new("main")), PathBuf::from("main.ll"));
    }

    #[test]
    fn default_output_strips_the_first_extension_not_the_last() {
        assert_eq!(default_output(Path::new("a.b.false")), PathBuf::from("a.ll"));
    }

    #[test]
    fn default_output_keeps_the_parent_directory() {
        assert_eq!(default_output(Path::new("dir/main.f")), PathBuf::from("dir/main.ll"));
    }

    #[test]
    fn missing_input_is_reported_distinctly() {
        let cli = Cli { input: None, output: None };
        let err = run(cli).unwrap_err();
        assert!(matches!(err, DriverError::MissingFilename));
        assert_eq!(err.to_string(), "Filename required");
    }
}
