//! Helpful error types for CLI commands
//!
//! Every error includes:
//! - What went wrong
//! - Context about the situation
//! - Suggestions for how to fix it

use pitchflow_pipeline::PipelineError;
use pitchflow_schema::SchemaError;
use std::fmt;
use std::path::Path;

/// An error with helpful context and suggestions
#[derive(Debug)]
pub struct HelpfulError {
    /// The main error message
    pub message: String,
    /// Additional context about what was happening
    pub context: Option<String>,
    /// Suggestions for how to fix the error
    pub suggestions: Vec<String>,
}

impl HelpfulError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_suggestions(mut self, suggestions: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.suggestions.extend(suggestions.into_iter().map(|s| s.into()));
        self
    }

    // === Common error constructors ===

    /// File does not exist
    pub fn file_not_found(path: &Path) -> Self {
        Self::new(format!("CSV file not found at {}", path.display()))
            .with_context("The specified file does not exist")
            .with_suggestions([
                format!("TRY: Check if the file exists: ls -la {}", path.display()),
                "TRY: Pass the file explicitly: pitchflow schema --input <file.csv>".to_string(),
            ])
    }

    /// File cannot be read (permission or encoding error)
    pub fn cannot_read_file(path: &Path, reason: &str) -> Self {
        Self::new(format!("Cannot read file: {}", path.display()))
            .with_context(reason.to_string())
            .with_suggestions([
                format!("TRY: Check file permissions: ls -la {}", path.display()),
                "TRY: Ensure the file is UTF-8 encoded".to_string(),
            ])
    }

    /// CSV parsing error
    pub fn csv_parse_error(path: &Path, details: &str) -> Self {
        Self::new(format!("Error reading CSV file: {}", details))
            .with_context(format!("Failed to parse CSV file: {}", path.display()))
            .with_suggestions([
                "TRY: Verify the CSV file is well-formed and comma-separated".to_string(),
                format!("TRY: Inspect the raw file: head -n 20 {}", path.display()),
            ])
    }

    /// Inference produced no columns
    pub fn empty_schema(path: &Path) -> Self {
        Self::new("Schema inference failed or returned an empty schema.")
            .with_context(format!("No columns found in {}", path.display()))
            .with_suggestion("TRY: Check that the first line of the file is a header row")
    }

    /// Statistics API key missing
    pub fn missing_api_key() -> Self {
        Self::new("Statistics API key is not configured")
            .with_context("The fetch command calls the statistics API and needs a key")
            .with_suggestions([
                "TRY: export PITCHFLOW_API_KEY=<your key>".to_string(),
                "TRY: Or set api.api_key in the config file (see: pitchflow config)".to_string(),
            ])
    }

    /// Map a schema inference error for the given input.
    pub fn from_schema_error(path: &Path, err: &SchemaError) -> Self {
        match err {
            SchemaError::InputNotFound { .. } => Self::file_not_found(path),
            SchemaError::InputRead { source, .. } => Self::csv_parse_error(path, &source.to_string()),
            SchemaError::MalformedRow { .. } => Self::csv_parse_error(path, &err.to_string()),
            SchemaError::Io(e) => Self::cannot_read_file(path, &e.to_string()),
            SchemaError::Json(e) => Self::new(format!("Failed to serialize schema: {}", e)),
        }
    }

    /// Map a pipeline error, adding suggestions where there is a known fix.
    pub fn from_pipeline_error(err: PipelineError) -> Self {
        match err {
            PipelineError::MissingApiKey => Self::missing_api_key(),
            PipelineError::ObjectExists(uri) => Self::new(format!("Object already exists: {}", uri))
                .with_context("Landing files are named by the second they were written")
                .with_suggestion("TRY: Wait a second and run the command again"),
            PipelineError::TableNotFound(table) => Self::new(format!("Table not found: {}", table))
                .with_context("Nothing has been loaded into the raw table yet")
                .with_suggestion("TRY: Run a load first: pitchflow handle --message job_started --records <file>"),
            PipelineError::InvalidEnvelope(reason) | PipelineError::InvalidPayload(reason) => {
                Self::new(format!("Invalid trigger message: {}", reason)).with_suggestion(
                    "TRY: Envelopes look like {\"message\": {\"data\": \"am9iX3N0YXJ0ZWQ=\"}}",
                )
            }
            other => Self::new(other.to_string()),
        }
    }
}

impl fmt::Display for HelpfulError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ERROR: {}", self.message)?;

        if let Some(ctx) = &self.context {
            writeln!(f, "CONTEXT: {}", ctx)?;
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            for suggestion in &self.suggestions {
                writeln!(f, "  {}", suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for HelpfulError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_helpful_error_display() {
        let err = HelpfulError::new("Something went wrong")
            .with_context("While processing data")
            .with_suggestion("Try again");

        let output = err.to_string();
        assert!(output.contains("ERROR: Something went wrong"));
        assert!(output.contains("CONTEXT: While processing data"));
        assert!(output.contains("Try again"));
    }

    #[test]
    fn test_from_schema_error_not_found() {
        let path = PathBuf::from("/missing/events.csv");
        let err = SchemaError::InputNotFound { path: path.clone() };
        let helpful = HelpfulError::from_schema_error(&path, &err);
        assert!(helpful.message.contains("not found"));
        assert!(helpful.suggestions.iter().any(|s| s.contains("ls -la")));
    }

    #[test]
    fn test_from_pipeline_error_missing_key() {
        let helpful = HelpfulError::from_pipeline_error(PipelineError::MissingApiKey);
        assert!(helpful.suggestions.iter().any(|s| s.contains("PITCHFLOW_API_KEY")));
    }
}
