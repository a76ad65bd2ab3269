pub mod answer;
pub mod match_question;
pub mod parse;

use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::util::write_json_pretty;

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = std::fs::read(path)
        .with_context(|| format!("failed to read json file: {}", path.display()))?;
    serde_json::from_slice(&data)
        .with_context(|| format!("failed to parse json file: {}", path.display()))
}

pub(crate) fn emit<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => write_json_pretty(path, value),
        None => {
            let rendered =
                serde_json::to_string_pretty(value).context("failed to serialize output")?;
            println!("{rendered}");
            Ok(())
        }
    }
}
