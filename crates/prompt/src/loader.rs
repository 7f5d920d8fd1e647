//! Prompt loader for built-in and YAML prompt definitions.

use crate::templates::{default_definition, DEFAULT_PROMPT_ID};
use crate::types::PromptDefinition;
use policyguide_core::config::WORKSPACE_DIR;
use policyguide_core::{AppError, AppResult};
use std::path::{Path, PathBuf};

/// Directory holding prompt overrides, relative to the workspace root.
fn prompts_dir(workspace_path: &Path) -> PathBuf {
    workspace_path.join(WORKSPACE_DIR).join("prompts")
}

/// Load a prompt definition by ID.
///
/// A `<id>.yml` file in `.policyguide/prompts/` takes precedence. Without one,
/// the built-in assistant prompt is returned for its own id and any other id
/// is an error.
///
/// # Example
/// ```no_run
/// use policyguide_prompt::load_prompt;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let prompt = load_prompt(Path::new("."), "assistant.policy.default")?;
/// println!("Loaded prompt: {}", prompt.title);
/// # Ok(())
/// # }
/// ```
pub fn load_prompt(workspace_path: &Path, prompt_id: &str) -> AppResult<PromptDefinition> {
    let prompt_file = prompts_dir(workspace_path).join(format!("{}.yml", prompt_id));

    if !prompt_file.exists() {
        if prompt_id == DEFAULT_PROMPT_ID {
            tracing::debug!("Using built-in prompt: {}", prompt_id);
            return Ok(default_definition());
        }
        return Err(AppError::Prompt(format!(
            "Prompt file not found: {:?}",
            prompt_file
        )));
    }

    tracing::debug!("Loading prompt from: {:?}", prompt_file);

    let contents = std::fs::read_to_string(&prompt_file).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to read prompt file {:?}: {}",
            prompt_file, e
        ))
    })?;

    let definition: PromptDefinition = serde_yaml::from_str(&contents).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to parse prompt YAML {:?}: {}",
            prompt_file, e
        ))
    })?;

    validate_prompt(&definition)?;

    if definition.id != prompt_id {
        tracing::warn!(
            file_id = %definition.id,
            "Prompt id does not match file name {}.yml",
            prompt_id
        );
    }

    tracing::info!("Loaded prompt: {} ({})", definition.id, definition.title);

    Ok(definition)
}

/// List available prompt IDs: the built-in one, then workspace overrides.
pub fn list_prompts(workspace_path: &Path) -> AppResult<Vec<String>> {
    let mut prompt_ids = vec![DEFAULT_PROMPT_ID.to_string()];

    let dir = prompts_dir(workspace_path);
    if !dir.exists() {
        return Ok(prompt_ids);
    }

    let mut overrides = Vec::new();
    for entry in walkdir::WalkDir::new(&dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("yml") {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if stem != DEFAULT_PROMPT_ID {
                    overrides.push(stem.to_string());
                }
            }
        }
    }
    overrides.sort();
    prompt_ids.extend(overrides);

    Ok(prompt_ids)
}

/// Validate a prompt definition.
fn validate_prompt(def: &PromptDefinition) -> AppResult<()> {
    if def.id.is_empty() {
        return Err(AppError::Prompt("Prompt ID cannot be empty".to_string()));
    }

    if def.title.is_empty() {
        return Err(AppError::Prompt("Prompt title cannot be empty".to_string()));
    }

    if def.template.trim().is_empty() {
        return Err(AppError::Prompt(
            "Prompt template cannot be empty".to_string(),
        ));
    }

    if !def.api_version.contains('.') {
        return Err(AppError::Prompt(format!(
            "Invalid apiVersion format: '{}'. Expected format: 'x.y'",
            def.api_version
        )));
    }

    if def.max_passages == Some(0) {
        return Err(AppError::Prompt(
            "Prompt maxPassages must be at least 1".to_string(),
        ));
    }

    Ok(())
}
