use thiserror::Error;

#[derive(Error, Debug)]
pub enum GridderError {
    #[error("Grafana API request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Grafana API returned {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Layout cannot be empty")]
    EmptyLayout,

    #[error("Panel count does not match layout: layout has {expected} slots, got {actual} panels")]
    PanelCountMismatch { expected: usize, actual: usize },

    #[error("Row height count does not match layout: layout has {expected} rows, got {actual} heights")]
    RowHeightCountMismatch { expected: usize, actual: usize },

    #[error("Row {row} has {panels} panels, more than the grid width of {width}")]
    RowTooWide {
        row: usize,
        panels: usize,
        width: u32,
    },

    #[error("Layout reaches y={bottom}, beyond the grid limit of {max}")]
    LayoutTooTall { bottom: u64, max: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Layout,
    Network,
    Io,
    Serialization,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl GridderError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            GridderError::HttpError(_) | GridderError::ApiError { .. } => ErrorCategory::Network,
            GridderError::IoError(_) => ErrorCategory::Io,
            GridderError::SerializationError(_) => ErrorCategory::Serialization,
            GridderError::TomlError(_)
            | GridderError::ConfigError { .. }
            | GridderError::ConfigValidationError { .. }
            | GridderError::InvalidConfigValueError { .. }
            | GridderError::MissingConfigError { .. } => ErrorCategory::Configuration,
            GridderError::EmptyLayout
            | GridderError::PanelCountMismatch { .. }
            | GridderError::RowHeightCountMismatch { .. }
            | GridderError::RowTooWide { .. }
            | GridderError::LayoutTooTall { .. } => ErrorCategory::Layout,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 網路錯誤通常重試即可
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Layout => ErrorSeverity::High,
            ErrorCategory::Io | ErrorCategory::Serialization => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            GridderError::HttpError(_) => {
                "Check that the Grafana URL is reachable and retry"
            }
            GridderError::ApiError { status: 401 | 403, .. } => {
                "Check that the API key is valid and has Editor rights on the target folder"
            }
            GridderError::ApiError { status: 412, .. } => {
                "A dashboard with the same uid or title exists; set grafana.overwrite = true"
            }
            GridderError::ApiError { .. } => "Inspect the Grafana server logs and retry",
            GridderError::IoError(_) => "Check that the file exists and the path is writable",
            GridderError::SerializationError(_) => {
                "Check that panel options only contain JSON-compatible values"
            }
            GridderError::TomlError(_) => "Fix the TOML syntax in the configuration file",
            GridderError::ConfigError { .. }
            | GridderError::ConfigValidationError { .. }
            | GridderError::InvalidConfigValueError { .. } => {
                "Correct the configuration value and run again"
            }
            GridderError::MissingConfigError { .. } => {
                "Add the missing field to the configuration file or pass it on the command line"
            }
            GridderError::EmptyLayout => "Give the group at least one row of panel sizes",
            GridderError::PanelCountMismatch { .. } => {
                "Make the number of panels equal to the number of sizes in the layout"
            }
            GridderError::RowHeightCountMismatch { .. } => {
                "Give one row height per layout row, or a single height for all rows"
            }
            GridderError::RowTooWide { .. } => "Split the row into several rows of at most 24 panels",
            GridderError::LayoutTooTall { .. } => "Use smaller row heights or fewer rows",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Layout => format!("Invalid panel layout: {}", self),
            ErrorCategory::Network => format!("Could not publish dashboard: {}", self),
            ErrorCategory::Io => format!("File operation failed: {}", self),
            ErrorCategory::Serialization => format!("Could not render dashboard JSON: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, GridderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_errors_are_high_severity() {
        let err = GridderError::PanelCountMismatch {
            expected: 4,
            actual: 3,
        };
        assert_eq!(err.category(), ErrorCategory::Layout);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.user_friendly_message().contains("4 slots"));
    }

    #[test]
    fn test_api_error_suggestions() {
        let unauthorized = GridderError::ApiError {
            status: 401,
            message: "Invalid API key".to_string(),
        };
        assert!(unauthorized.recovery_suggestion().contains("API key"));
        assert_eq!(unauthorized.severity(), ErrorSeverity::Medium);

        let conflict = GridderError::ApiError {
            status: 412,
            message: "version-mismatch".to_string(),
        };
        assert!(conflict.recovery_suggestion().contains("overwrite"));
    }
}
