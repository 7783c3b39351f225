use std::path::Path;

use tracing::{info, warn};

use crate::error::{Result, ScenarioError};

/// Instruction used when no system prompt file is available
pub const DEFAULT_SYSTEM_PROMPT: &str = r#"You are an expert data analyst and scenario generator.
Your task is to analyze the provided conversation history between a user and an assistant.
Based on the conversation, you must generate a scenario description object.

IMPORTANT: The content of the values (scenario, user_description, expected_outcome) MUST BE in the SAME LANGUAGE as the input conversation.
- If the conversation is in Vietnamese, the values must be in Vietnamese.
- If the conversation is in English, the values must be in English.
- The keys (scenario_id, scenario, user_description, expected_outcome) must remain in English.

The output must be a valid JSON object with the following structure:
{
  "scenario_id": "A unique identifier for the scenario (can be based on the topic)",
  "scenario": "A concise title or summary of the scenario (IN INPUT LANGUAGE)",
  "user_description": "A description of the user's role, intent, and persona in this conversation (IN INPUT LANGUAGE)",
  "expected_outcome": "The intended or successful outcome of the conversation (IN INPUT LANGUAGE)"
}
"#;

/// Everything sent to the generation service for one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioRequest<'a> {
    /// Fixed instruction shared by every record
    pub instruction: &'a str,
    /// Per-record prompt embedding the conversation
    pub prompt: String,
}

/// Load the system prompt from `path`, falling back to the built-in default
/// when the file does not exist.
pub fn load_system_prompt(path: Option<&Path>) -> Result<String> {
    let Some(path) = path else {
        return Ok(DEFAULT_SYSTEM_PROMPT.to_string());
    };

    if !path.exists() {
        warn!(
            "System prompt file not found at {:?}. Using default.",
            path
        );
        return Ok(DEFAULT_SYSTEM_PROMPT.to_string());
    }

    let prompt = std::fs::read_to_string(path).map_err(|e| {
        ScenarioError::configuration(format!(
            "Failed to read system prompt file {:?}: {}",
            path, e
        ))
    })?;
    info!("Loaded system prompt from {:?}", path);
    Ok(prompt)
}

/// Pretty-print conversation content that is JSON; leave anything else as-is.
///
/// Object keys keep their source order.
pub fn normalize_conversation(raw: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(value) => serde_json::to_string_pretty(&value).unwrap_or_else(|_| raw.to_string()),
        Err(_) => raw.to_string(),
    }
}

/// Build the user prompt for a normalized conversation
pub fn build_scenario_prompt(conversation: &str) -> String {
    let mut prompt = String::new();
    prompt.push_str("Please analyze the following conversation and generate a scenario ");
    prompt.push_str("according to the system instructions.\n\n");
    prompt.push_str("Conversation History:\n");
    prompt.push_str(conversation);
    prompt.push('\n');
    prompt
}

/// Compose the request for one raw conversation
pub fn compose_request<'a>(raw_conversation: &str, instruction: &'a str) -> ScenarioRequest<'a> {
    let conversation = normalize_conversation(raw_conversation);
    ScenarioRequest {
        instruction,
        prompt: build_scenario_prompt(&conversation),
    }
}
