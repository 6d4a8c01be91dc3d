//! One-line feedback messages.

use std::fmt;

/// Tone of an [`OperationStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Notice,
    Failure,
}

/// A short confirmation, hint or error shown after a command.
pub struct OperationStatus {
    pub message: String,
    pub tone: Tone,
}

impl OperationStatus {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            tone: Tone::Success,
        }
    }

    /// Informational message, e.g. a coaching insight or a skipped step.
    pub fn notice(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            tone: Tone::Notice,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            tone: Tone::Failure,
        }
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.tone {
            Tone::Success => "**Done:**",
            Tone::Notice => "**Note:**",
            Tone::Failure => "**Error:**",
        };
        writeln!(f, "{prefix} {}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_status_display() {
        assert_eq!(
            OperationStatus::success("Settings saved").to_string(),
            "**Done:** Settings saved\n"
        );
        assert!(OperationStatus::notice("Try a walk").to_string().contains("Note:"));
        assert!(OperationStatus::failure("No such task").to_string().contains("Error:"));
    }
}
