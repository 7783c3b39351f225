/// One row of the source table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRecord {
    /// Line number of the row in the source file (1-based, header is line 1)
    pub line: u64,
    /// Verbatim value of the optional `id` column
    pub source_id: Option<String>,
    /// Verbatim value of the `input` column, JSON or free text
    pub conversation: String,
}

impl InputRecord {
    pub fn new(line: u64, source_id: Option<String>, conversation: impl Into<String>) -> Self {
        Self {
            line,
            source_id,
            conversation: conversation.into(),
        }
    }

    /// Short label for progress and diagnostics
    pub fn label(&self) -> String {
        match &self.source_id {
            Some(id) => format!("line {} (id {})", self.line, id),
            None => format!("line {}", self.line),
        }
    }
}

/// Records read from the input file plus rows that had to be dropped
#[derive(Debug, Default)]
pub struct LoadedInput {
    pub records: Vec<InputRecord>,
    /// Number of malformed rows skipped while reading
    pub skipped_rows: usize,
    /// Whether the header carried an `id` column
    pub has_id_column: bool,
}
