use std::path::Path;

use tracing::{error, info};

use crate::error::Result;
use crate::io::write_scenarios;
use crate::models::ResultSet;

/// Execute Stage 2: write all scenarios to the output file
pub fn execute_stage2(output: &Path, scenarios: &ResultSet) -> Result<()> {
    info!("Saving {} scenarios to {:?}...", scenarios.len(), output);

    if let Err(e) = write_scenarios(output, scenarios) {
        error!("Error saving output: {}", e);
        return Err(e);
    }

    info!("Successfully saved output.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScenarioError;

    #[test]
    fn test_stage2_writes_empty_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");

        execute_stage2(&path, &ResultSet::new()).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]\n");
    }

    #[test]
    fn test_stage2_reports_persistence_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.json");

        let err = execute_stage2(&path, &ResultSet::new()).unwrap_err();

        assert!(matches!(err, ScenarioError::Persistence { .. }));
    }
}
