//! The `optimize-settings` prompt.

use serde_json::{Map, Value};

use crate::templates::OptimizationPreset;

pub const OPTIMIZE_SETTINGS: &str = "optimize-settings";
pub const DESCRIPTION: &str = "Configure optimal settings for common use cases";

/// `(name, description)` of every argument; all are required.
pub const ARGUMENTS: [(&str, &str); 2] = [
    (
        "useCase",
        "The use case to optimize for (e.g., 'search-as-you-type', 'exact-search', 'fuzzy-search')",
    ),
    ("indexUid", "Index to apply settings to"),
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PromptError {
    #[error("Unknown prompt: {0}")]
    UnknownPrompt(String),
    #[error("Missing required arguments")]
    MissingArguments,
}

/// Render the single user message for `name` with `arguments`.
///
/// An unrecognised use case still renders, listing the accepted ones.
pub fn render(name: &str, arguments: Option<&Map<String, Value>>) -> Result<String, PromptError> {
    if name != OPTIMIZE_SETTINGS {
        return Err(PromptError::UnknownPrompt(name.to_string()));
    }
    let args = arguments.ok_or(PromptError::MissingArguments)?;
    let (Some(use_case), Some(index_uid)) = (
        args.get("useCase").and_then(Value::as_str),
        args.get("indexUid").and_then(Value::as_str),
    ) else {
        return Err(PromptError::MissingArguments);
    };

    Ok(match use_case.parse::<OptimizationPreset>() {
        Ok(preset) => format!(
            "Updating settings for index {index_uid} with {} configuration:\n{}",
            preset.as_str(),
            serde_json::to_string_pretty(&preset.settings()).unwrap_or_default()
        ),
        Err(unknown) => format!(
            "Unknown use case: {unknown}. Available use cases: {}",
            OptimizationPreset::available()
        ),
    })
}
