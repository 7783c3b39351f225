pub mod error;
pub mod io;
pub mod llm;
pub mod models;
pub mod stages;

pub use error::{Result, ScenarioError};
pub use io::{load_input_records, read_input_records, write_scenarios};
pub use llm::{
    DEFAULT_MODEL, DEFAULT_SYSTEM_PROMPT, GeminiClient, GeminiConfig, ScenarioGenerator,
    compose_request, load_system_prompt, parse_scenario_response,
};
pub use models::{InputRecord, LoadedInput, ResultSet, ScenarioRecord, ScenarioResponse};
pub use stages::{
    GenerationConfig, GenerationResult, execute_stage0, execute_stage1, execute_stage2,
};
