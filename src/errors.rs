use thiserror::Error;

#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("Browser launch failed: {0}")]
    LaunchFailed(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("JavaScript execution failed: {0}")]
    JavaScriptFailed(String),

    #[error("Assertion failed for {step}: expected {expected:?}, got {actual:?}")]
    AssertionFailed {
        step: String,
        expected: String,
        actual: String,
    },

    #[error("Timed out after {timeout_ms}ms waiting for {condition}")]
    WaitTimeout { timeout_ms: u64, condition: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, VerifyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assertion_failure_names_step_and_values() {
        let err = VerifyError::AssertionFailed {
            step: "initial vote count".to_string(),
            expected: "0".to_string(),
            actual: "3".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("initial vote count"));
        assert!(msg.contains("\"0\""));
        assert!(msg.contains("\"3\""));
    }

    #[test]
    fn timeout_reports_budget_and_condition() {
        let err = VerifyError::WaitTimeout {
            timeout_ms: 30_000,
            condition: ".vote-count to read \"1\"".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("30000ms"));
        assert!(msg.contains(".vote-count"));
    }
}
