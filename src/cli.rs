use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::model::Verbosity;

#[derive(Parser, Debug)]
#[command(
    name = "esgdraft",
    version,
    about = "Drafts sustainability-questionnaire answers from company data"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a questionnaire file into normalized questions
    Parse(ParseArgs),
    /// Match a single question against the domain taxonomy
    Match(MatchArgs),
    /// Generate answer drafts for a full questionnaire
    Answer(AnswerArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ParseArgs {
    /// Questionnaire file (csv, tsv, txt or md)
    #[arg(long)]
    pub input: PathBuf,

    /// JSON file with a manual column mapping (tabular sources only)
    #[arg(long)]
    pub column_mapping: Option<PathBuf>,

    /// Write the parse result to this path instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct MatchArgs {
    /// Question text to match
    #[arg(long)]
    pub question: String,

    #[arg(long)]
    pub category: Option<String>,

    /// JSON file with structured matching rules
    #[arg(long)]
    pub rules: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct AnswerArgs {
    /// Questionnaire file (csv, tsv, txt or md)
    #[arg(long)]
    pub questionnaire: PathBuf,

    /// Flat company-data snapshot (JSON)
    #[arg(long)]
    pub company_data: PathBuf,

    /// Company profile with informal practices (JSON)
    #[arg(long)]
    pub profile: Option<PathBuf>,

    /// JSON file with structured matching rules
    #[arg(long)]
    pub rules: Option<PathBuf>,

    /// JSON file with a manual column mapping (tabular sources only)
    #[arg(long)]
    pub column_mapping: Option<PathBuf>,

    /// Write the answer drafts to this path instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = VerbosityArg::Standard)]
    pub verbosity: VerbosityArg,

    #[arg(long, default_value_t = false)]
    pub no_methodology: bool,

    #[arg(long, default_value_t = false)]
    pub no_assumptions: bool,

    #[arg(long, default_value_t = false)]
    pub no_limitations: bool,

    /// Report per site instead of aggregating across sites
    #[arg(long, default_value_t = false)]
    pub per_site: bool,

    /// Recognized for interface compatibility; the engine is rule-based
    #[arg(long, default_value_t = false)]
    pub use_llm: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum VerbosityArg {
    Concise,
    Standard,
    Detailed,
}

impl From<VerbosityArg> for Verbosity {
    fn from(value: VerbosityArg) -> Self {
        match value {
            VerbosityArg::Concise => Verbosity::Concise,
            VerbosityArg::Standard => Verbosity::Standard,
            VerbosityArg::Detailed => Verbosity::Detailed,
        }
    }
}
