use std::path::Path;

use tracing::{info, warn};

use crate::error::Result;
use crate::io::load_input_records;
use crate::models::LoadedInput;

/// Execute Stage 0: read and validate the input table
pub fn execute_stage0(input: &Path) -> Result<LoadedInput> {
    info!("Reading input CSV: {:?}", input);
    let loaded = load_input_records(input)?;

    if loaded.skipped_rows > 0 {
        warn!("{} malformed rows skipped", loaded.skipped_rows);
    }
    if !loaded.has_id_column {
        info!("No 'id' column found; scenarios will carry no source_id");
    }

    info!("Loaded {} records", loaded.records.len());
    Ok(loaded)
}
