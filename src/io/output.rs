use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{Result, ScenarioError};
use crate::models::ResultSet;

/// Write the whole result set to `path` as a pretty-printed JSON array.
///
/// Non-ASCII text is written as-is. Nothing is written incrementally: the
/// file is created only once all scenarios are available.
pub fn write_scenarios(path: &Path, scenarios: &ResultSet) -> Result<()> {
    let persistence = |source: std::io::Error| ScenarioError::Persistence {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(persistence)?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, scenarios)
        .map_err(|e| persistence(std::io::Error::from(e)))?;
    writer.write_all(b"\n").map_err(persistence)?;
    writer.flush().map_err(persistence)?;

    Ok(())
}
