use serde::{Deserialize, Serialize};

/// Shape the model is instructed to return for a conversation
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScenarioResponse {
    /// Identifier proposed by the model, often empty
    #[serde(default)]
    pub scenario_id: Option<String>,
    /// Concise title or summary of the scenario
    pub scenario: String,
    /// The user's role, intent, and persona
    pub user_description: String,
    /// Intended outcome of the conversation
    pub expected_outcome: String,
}

/// A generated scenario as written to the output file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioRecord {
    pub scenario_id: String,
    pub scenario: String,
    pub user_description: String,
    pub expected_outcome: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
}

impl ScenarioRecord {
    /// Merge a validated response with the identifier of the row it came from.
    ///
    /// A blank or missing `scenario_id` falls back to the source id.
    pub fn from_response(response: ScenarioResponse, source_id: Option<&str>) -> Self {
        let scenario_id = response
            .scenario_id
            .filter(|id| !id.trim().is_empty())
            .or_else(|| source_id.map(str::to_string))
            .unwrap_or_default();

        Self {
            scenario_id,
            scenario: response.scenario,
            user_description: response.user_description,
            expected_outcome: response.expected_outcome,
            source_id: source_id.map(str::to_string),
        }
    }
}

/// Successfully generated scenarios, in input order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultSet {
    scenarios: Vec<ScenarioRecord>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, scenario: ScenarioRecord) {
        self.scenarios.push(scenario);
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScenarioRecord> {
        self.scenarios.iter()
    }

    pub fn as_slice(&self) -> &[ScenarioRecord] {
        &self.scenarios
    }
}

impl FromIterator<ScenarioRecord> for ResultSet {
    fn from_iter<I: IntoIterator<Item = ScenarioRecord>>(iter: I) -> Self {
        Self {
            scenarios: iter.into_iter().collect(),
        }
    }
}
