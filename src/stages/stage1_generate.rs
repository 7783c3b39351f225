use std::time::Duration;

use tracing::{info, warn};

use crate::error::Result;
use crate::llm::{RequestPacer, ScenarioGenerator, compose_request, parse_scenario_response};
use crate::models::{InputRecord, ResultSet, ScenarioRecord};

/// Configuration for Stage 1
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// Idle gap between the end of one generation request and the start of the next
    pub request_interval: Duration,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            request_interval: Duration::from_secs(1),
        }
    }
}

/// A record that produced no scenario
#[derive(Debug, Clone)]
pub struct RecordFailure {
    /// Line number of the row in the input file
    pub line: u64,
    pub source_id: Option<String>,
    pub error: String,
}

/// Result of Stage 1 processing
#[derive(Debug)]
pub struct GenerationResult {
    /// Scenarios generated, in input order
    pub scenarios: ResultSet,
    /// Number of records sent to the model
    pub attempted: usize,
    /// Records skipped because generation or validation failed
    pub failures: Vec<RecordFailure>,
}

/// Execute Stage 1: scenario generation
///
/// For each record, in input order:
/// 1. Compose the prompt from the conversation
/// 2. Call the generator, keeping the idle gap after the previous call
/// 3. Validate the returned JSON
/// 4. Attach the source id and collect the scenario
///
/// A failing record is logged and skipped; it never stops the run.
pub async fn execute_stage1<G: ScenarioGenerator>(
    generator: &G,
    records: &[InputRecord],
    instruction: &str,
    config: &GenerationConfig,
) -> GenerationResult {
    let total = records.len();
    let mut pacer = RequestPacer::new(config.request_interval);
    let mut scenarios = ResultSet::new();
    let mut failures = Vec::new();

    info!("Stage 1: Processing {} records...", total);

    for (index, record) in records.iter().enumerate() {
        pacer.wait().await;
        let outcome = process_record(generator, record, instruction).await;
        pacer.finish();

        match outcome {
            Ok(scenario) => {
                info!(
                    "[{}/{}] {}: scenario '{}'",
                    index + 1,
                    total,
                    record.label(),
                    scenario.scenario_id
                );
                scenarios.push(scenario);
            }
            Err(e) => {
                warn!(
                    "[{}/{}] Error processing {}: {}",
                    index + 1,
                    total,
                    record.label(),
                    e
                );
                failures.push(RecordFailure {
                    line: record.line,
                    source_id: record.source_id.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    GenerationResult {
        scenarios,
        attempted: total,
        failures,
    }
}

/// Process a single record
async fn process_record<G: ScenarioGenerator>(
    generator: &G,
    record: &InputRecord,
    instruction: &str,
) -> Result<ScenarioRecord> {
    let request = compose_request(&record.conversation, instruction);
    let text = generator
        .generate(&request.prompt, request.instruction)
        .await?;
    let response = parse_scenario_response(&text)?;

    Ok(ScenarioRecord::from_response(
        response,
        record.source_id.as_deref(),
    ))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use tokio::time::Instant;

    use super::*;
    use crate::error::ScenarioError;

    /// Generator that answers based on markers found in the prompt
    #[derive(Default)]
    struct ScriptedGenerator {
        latency: Duration,
        prompts: Mutex<Vec<String>>,
        started: Mutex<Vec<Instant>>,
        finished: Mutex<Vec<Instant>>,
    }

    impl ScriptedGenerator {
        fn with_latency(latency: Duration) -> Self {
            Self {
                latency,
                ..Default::default()
            }
        }

        fn answer(prompt: &str) -> Result<String> {
            if prompt.contains("fail-network") {
                return Err(ScenarioError::Api {
                    status: 503,
                    body: "unavailable".to_string(),
                });
            }
            if prompt.contains("fail-garbage") {
                return Ok("I cannot answer that".to_string());
            }

            let scenario_id = if prompt.contains("no-id") { "" } else { "generated" };
            Ok(serde_json::json!({
                "scenario_id": scenario_id,
                "scenario": "s",
                "user_description": "u",
                "expected_outcome": "e",
            })
            .to_string())
        }
    }

    impl ScenarioGenerator for ScriptedGenerator {
        async fn generate(&self, prompt: &str, instruction: &str) -> Result<String> {
            assert_eq!(instruction, "instr");
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.started.lock().unwrap().push(Instant::now());

            if !self.latency.is_zero() {
                tokio::time::sleep(self.latency).await;
            }

            let answer = Self::answer(prompt);
            self.finished.lock().unwrap().push(Instant::now());
            answer
        }
    }

    fn config() -> GenerationConfig {
        GenerationConfig {
            request_interval: Duration::ZERO,
        }
    }

    fn record(line: u64, id: &str, conversation: &str) -> InputRecord {
        InputRecord::new(line, Some(id.to_string()), conversation)
    }

    #[test]
    fn test_generation_config_default() {
        let config = GenerationConfig::default();
        assert_eq!(config.request_interval, Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_failed_record_is_skipped() {
        let generator = ScriptedGenerator::default();
        let records = vec![
            record(2, "1", "row one"),
            record(3, "2", "row two"),
            record(4, "3", "row three fail-network"),
            record(5, "4", "row four"),
            record(6, "5", "row five"),
        ];

        let result = execute_stage1(&generator, &records, "instr", &config()).await;

        assert_eq!(result.attempted, 5);
        let ids: Vec<&str> = result
            .scenarios
            .iter()
            .filter_map(|s| s.source_id.as_deref())
            .collect();
        assert_eq!(ids, vec!["1", "2", "4", "5"]);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].line, 4);
        assert_eq!(result.failures[0].source_id.as_deref(), Some("3"));
        assert!(result.failures[0].error.contains("503"));
    }

    #[tokio::test]
    async fn test_invalid_json_is_skipped() {
        let generator = ScriptedGenerator::default();
        let records = vec![record(2, "a", "fail-garbage"), record(3, "b", "fine")];

        let result = execute_stage1(&generator, &records, "instr", &config()).await;

        assert_eq!(result.scenarios.len(), 1);
        assert_eq!(result.scenarios.as_slice()[0].source_id.as_deref(), Some("b"));
        assert!(result.failures[0].error.contains("not valid JSON"));
    }

    #[tokio::test]
    async fn test_empty_scenario_id_uses_source_id() {
        let generator = ScriptedGenerator::default();
        let records = vec![record(2, "42", "no-id please")];

        let result = execute_stage1(&generator, &records, "instr", &config()).await;

        let scenario = &result.scenarios.as_slice()[0];
        assert_eq!(scenario.scenario_id, "42");
        assert_eq!(scenario.source_id.as_deref(), Some("42"));
    }

    #[tokio::test]
    async fn test_records_without_source_id() {
        let generator = ScriptedGenerator::default();
        let records = vec![InputRecord::new(2, None, "hello")];

        let result = execute_stage1(&generator, &records, "instr", &config()).await;

        let scenario = &result.scenarios.as_slice()[0];
        assert_eq!(scenario.scenario_id, "generated");
        assert!(scenario.source_id.is_none());
    }

    #[tokio::test]
    async fn test_json_conversation_is_pretty_printed_in_prompt() {
        let generator = ScriptedGenerator::default();
        let records = vec![record(2, "1", r#"{"a":1}"#)];

        execute_stage1(&generator, &records, "instr", &config()).await;

        let prompts = generator.prompts.lock().unwrap();
        assert!(prompts[0].contains("{\n  \"a\": 1\n}"));
    }

    #[tokio::test]
    async fn test_idle_gap_follows_each_call_even_after_failures() {
        let generator = ScriptedGenerator::with_latency(Duration::from_millis(40));
        let records = vec![
            record(2, "1", "fail-network"),
            record(3, "2", "fail-garbage"),
            record(4, "3", "ok"),
        ];
        let interval = Duration::from_millis(25);
        let config = GenerationConfig {
            request_interval: interval,
        };

        execute_stage1(&generator, &records, "instr", &config).await;

        let started = generator.started.lock().unwrap();
        let finished = generator.finished.lock().unwrap();
        assert_eq!(started.len(), 3);
        assert_eq!(finished.len(), 3);
        for i in 1..started.len() {
            assert!(started[i] - finished[i - 1] >= interval);
        }
    }

    #[tokio::test]
    async fn test_no_records() {
        let generator = ScriptedGenerator::default();

        let result = execute_stage1(&generator, &[], "instr", &config()).await;

        assert_eq!(result.attempted, 0);
        assert!(result.scenarios.is_empty());
        assert!(generator.prompts.lock().unwrap().is_empty());
    }
}
