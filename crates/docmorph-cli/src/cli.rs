//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API.

use clap::{Parser, Subcommand, ValueEnum};
use is_terminal::IsTerminal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Docmorph - convert structured documents and reshape them with rules
///
/// Reads JSON or XML input, evaluates JSONPath rules against it and writes
/// the extracted document in the requested format.
#[derive(Parser, Debug)]
#[command(
    name = "docmorph",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "DOCMORPH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results [default: from config, else human]
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract data from a document using a rule group
    Extract(ExtractArgs),

    /// Convert a document to JSON without applying rules
    Convert(ConvertArgs),

    /// Evaluate a JSONPath query and list every match
    Query(QueryArgs),

    /// Work with rule group files
    Rules(RulesArgs),

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

/// Arguments for the extract command
#[derive(Parser, Debug)]
pub struct ExtractArgs {
    /// Input document, or `-` for stdin
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Rule file (JSON or YAML) holding one or more rule groups
    #[arg(short, long, value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// Rule group id; looked up in the rules directory when --rules is absent
    #[arg(short, long, value_name = "ID")]
    pub group: Option<String>,

    /// MIME type of the input, detected from its content when omitted
    #[arg(short, long, value_name = "TYPE")]
    pub mime: Option<String>,

    /// Extractor to use instead of the configured default
    #[arg(short, long, value_name = "NAME")]
    pub extractor: Option<String>,

    /// Also write the extracted document to a file
    #[arg(long = "save-to", value_name = "OUTPUT_FILE")]
    pub save_to: Option<PathBuf>,
}

/// Arguments for the convert command
#[derive(Parser, Debug)]
pub struct ConvertArgs {
    /// Input document, or `-` for stdin
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// MIME type of the input, detected from its content when omitted
    #[arg(short, long, value_name = "TYPE")]
    pub mime: Option<String>,

    /// Also write the converted document to a file
    #[arg(long = "save-to", value_name = "OUTPUT_FILE")]
    pub save_to: Option<PathBuf>,
}

/// Arguments for the query command
#[derive(Parser, Debug)]
pub struct QueryArgs {
    /// JSONPath expression, e.g. `$.store.book[*].title`
    #[arg(value_name = "EXPR")]
    pub expression: String,

    /// Input document, or `-` for stdin
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// MIME type of the input, detected from its content when omitted
    #[arg(short, long, value_name = "TYPE")]
    pub mime: Option<String>,
}

/// Arguments for the rules command
#[derive(Parser, Debug)]
pub struct RulesArgs {
    #[command(subcommand)]
    pub action: RulesAction,
}

/// Rule file actions
#[derive(Subcommand, Debug)]
pub enum RulesAction {
    /// Check that every rule in a file compiles
    Validate(RulesValidateArgs),
}

/// Arguments for rules validate
#[derive(Parser, Debug)]
pub struct RulesValidateArgs {
    /// Rule file (JSON or YAML)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

/// Arguments for generating shell completions
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Human-readable formatted output
    #[default]
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

/// Supported shells for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }
}

impl Shell {
    /// Convert to clap_complete shell type
    pub fn to_clap_shell(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}
