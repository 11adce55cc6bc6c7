use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::blocks::opamp_multi::OpAmpMultiParams;

/// Reads package parameters from a `.toml` or `.json` file.
///
/// The extension is matched case-insensitively. Files with any other
/// extension are read as TOML.
pub fn parse_params(path: impl AsRef<Path>) -> Result<OpAmpMultiParams> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {path:?}"))?;

    let has_extension = |expected: &str| {
        path.extension()
            .and_then(|e| e.to_str())
            .map_or(false, |e| e.eq_ignore_ascii_case(expected))
    };

    let params: OpAmpMultiParams = if has_extension("json") {
        serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse JSON config {path:?}"))?
    } else {
        if !has_extension("toml") {
            log::warn!("config file {path:?} has no .toml extension, reading as TOML");
        }
        toml::from_str(&contents).with_context(|| format!("failed to parse TOML config {path:?}"))?
    };
    params.validate()?;
    Ok(params)
}
