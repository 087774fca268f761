//! State management-specific error types.

/// Errors that can occur during state operations.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// Nothing is selected in the current list
    #[error("No item selected")]
    NothingSelected,

    /// Network worker is not running
    #[error("Network channel closed: {0}")]
    NetworkUnavailable(String),

    /// Config saver is not running
    #[error("Config channel closed: {0}")]
    ConfigUnavailable(String),

    /// Clipboard could not be used
    #[error("Clipboard error: {0}")]
    Clipboard(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_error_display() {
        let error = StateError::NothingSelected;
        assert!(error.to_string().contains("No item selected"));

        let error = StateError::NetworkUnavailable("sending on a closed channel".to_string());
        assert!(error.to_string().contains("Network channel closed"));
        assert!(error.to_string().contains("closed channel"));

        let error = StateError::Clipboard("no display".to_string());
        assert!(error.to_string().contains("Clipboard error"));
    }
}
