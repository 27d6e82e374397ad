//! KIDL CLI - Command line driver for the annotation pass

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use kidl_annotations::{
    annotate, parse_path, strip_keys_of, validate_path, AnnotationReport, AnnotatorConfig,
    PathError, PathSyntaxError,
};
use kidl_ast::Compilation;

#[derive(Parser)]
#[command(name = "kidl")]
#[command(about = "KIDL doc-comment annotation pass", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Annotate a compilation and output it as JSON
    Annotate {
        /// Input compilation (JSON)
        file: PathBuf,
        /// Output file; stdout if omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Pretty print the output
        #[arg(short, long)]
        pretty: bool,
        #[command(flatten)]
        settings: Settings,
    },
    /// Report annotation warnings without writing output
    Check {
        /// Input compilation (JSON)
        file: PathBuf,
        #[command(flatten)]
        settings: Settings,
    },
    /// Parse and validate one searchable path expression
    Path {
        /// Input compilation (JSON)
        file: PathBuf,
        /// Typedef to validate against, as Module.Type
        target: String,
        /// Path expression, e.g. "features.[*].(id,location)"
        expr: String,
        /// Treat the expression as keys_of(...)
        #[arg(long)]
        keys_of: bool,
    },
}

#[derive(clap::Args)]
struct Settings {
    /// Annotator config file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Do not print the warning log
    #[arg(long)]
    ignore_warnings: bool,
    /// Exit with an error if any annotation warning was produced
    #[arg(long)]
    deny_warnings: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid compilation in {path}: {source}")]
    Compilation {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid config in {path}: {source}")]
    Config {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("cannot serialize compilation: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("'{0}' is not of the form Module.Type")]
    TargetName(String),

    #[error("no type named '{0}'")]
    UnknownType(String),

    #[error("path syntax error: {0}")]
    PathSyntax(#[from] PathSyntaxError),

    #[error("invalid path: {0}")]
    Path(#[from] PathError),

    #[error("{0} annotation warning(s) with --deny-warnings")]
    DeniedWarnings(usize),
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Annotate {
            file,
            output,
            pretty,
            settings,
        } => cmd_annotate(&file, output.as_deref(), pretty, &settings),
        Commands::Check { file, settings } => cmd_check(&file, &settings),
        Commands::Path {
            file,
            target,
            expr,
            keys_of,
        } => cmd_path(&file, &target, &expr, keys_of),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_annotate(
    file: &Path,
    output: Option<&Path>,
    pretty: bool,
    settings: &Settings,
) -> Result<(), CliError> {
    let mut compilation = load_compilation(file)?;
    let report = annotate(&mut compilation, &settings.load()?);

    if let Some(log) = report.render() {
        eprint!("{}", log);
    }

    let json = if pretty {
        serde_json::to_string_pretty(&compilation)?
    } else {
        serde_json::to_string(&compilation)?
    };
    match output {
        Some(path) => fs::write(path, json).map_err(|source| CliError::Write {
            path: path.to_path_buf(),
            source,
        })?,
        None => println!("{}", json),
    }

    settings.enforce(&report)
}

fn cmd_check(file: &Path, settings: &Settings) -> Result<(), CliError> {
    let mut compilation = load_compilation(file)?;
    let report = annotate(&mut compilation, &settings.load()?);

    if let Some(log) = report.render() {
        print!("{}", log);
    }
    println!(
        "{} - {} modules, {} types, {} functions, {} warnings",
        file.display(),
        report.modules,
        report.types,
        report.functions,
        report.warning_count()
    );

    settings.enforce(&report)
}

fn cmd_path(file: &Path, target: &str, expr: &str, keys_of: bool) -> Result<(), CliError> {
    let compilation = load_compilation(file)?;

    let (module, name) = target
        .split_once('.')
        .ok_or_else(|| CliError::TargetName(target.to_string()))?;
    let id = compilation
        .types
        .lookup(module, name)
        .ok_or_else(|| CliError::UnknownType(target.to_string()))?;

    let (expr, wrapped) = strip_keys_of(expr);
    let tree = parse_path(expr)?;
    validate_path(&compilation.types, &tree, id, keys_of || wrapped)?;

    println!("{}", serde_json::to_string_pretty(&tree)?);
    Ok(())
}

fn load_compilation(path: &Path) -> Result<Compilation, CliError> {
    let source = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&source).map_err(|source| CliError::Compilation {
        path: path.to_path_buf(),
        source,
    })
}

impl Settings {
    /// Config file if given, with the command line flag on top
    fn load(&self) -> Result<AnnotatorConfig, CliError> {
        let mut config = match &self.config {
            Some(path) => {
                let source = fs::read_to_string(path).map_err(|source| CliError::Read {
                    path: path.clone(),
                    source,
                })?;
                serde_json::from_str(&source).map_err(|source| CliError::Config {
                    path: path.clone(),
                    source,
                })?
            }
            None => AnnotatorConfig::default(),
        };
        if self.ignore_warnings {
            config.ignore_warnings = true;
        }
        tracing::debug!(?config, "annotator config");
        Ok(config)
    }

    fn enforce(&self, report: &AnnotationReport) -> Result<(), CliError> {
        if self.deny_warnings && report.has_warnings() {
            return Err(CliError::DeniedWarnings(report.warning_count()));
        }
        Ok(())
    }
}
