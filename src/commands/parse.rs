use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::ParseArgs;
use crate::commands::{emit, read_json};
use crate::engine::parser::{self, ColumnMapping};

pub fn run(args: ParseArgs) -> Result<()> {
    let bytes = std::fs::read(&args.input)
        .with_context(|| format!("failed to read questionnaire: {}", args.input.display()))?;
    let file_name = args
        .input
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("questionnaire")
        .to_string();

    let result = match &args.column_mapping {
        Some(path) => {
            let mapping: ColumnMapping = read_json(path)?;
            parser::parse_with_mapping(&bytes, &file_name, &mapping)
        }
        None => parser::parse_source(&bytes, &file_name),
    };

    if result.success {
        info!(
            file = %file_name,
            questions = result.questions.len(),
            total_rows = result.metadata.total_rows,
            framework = ?result.metadata.detected_framework,
            "questionnaire parsed"
        );
    } else {
        for error in &result.errors {
            warn!(file = %file_name, error = %error, "questionnaire parse issue");
        }
    }

    emit(&result, args.output.as_deref())
}
