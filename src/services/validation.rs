use crate::errors::ToolError;

/// Field-level checks applied to tool arguments after deserialization and
/// before any network activity.
#[derive(Clone)]
pub struct Validation;

impl Validation {
    pub fn new() -> Self {
        Self
    }

    pub fn ensure_non_empty(&self, value: &str, label: &str) -> Result<(), ToolError> {
        if value.trim().is_empty() {
            return Err(ToolError::invalid_params(format!(
                "{} must be a non-empty string",
                label
            )));
        }
        Ok(())
    }

    pub fn ensure_at_least(&self, value: u64, min: u64, label: &str) -> Result<(), ToolError> {
        if value < min {
            return Err(ToolError::invalid_params(format!(
                "{} must be at least {}",
                label, min
            )));
        }
        Ok(())
    }

    pub fn ensure_line_range(&self, start: u64, end: Option<u64>) -> Result<(), ToolError> {
        self.ensure_at_least(start, 1, "startLine")?;
        if let Some(end) = end {
            if end < start {
                return Err(ToolError::invalid_params(format!(
                    "endLine ({}) must not precede startLine ({})",
                    end, start
                )));
            }
        }
        Ok(())
    }
}

impl Default for Validation {
    fn default() -> Self {
        Self::new()
    }
}
