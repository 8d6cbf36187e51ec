use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Column '{column}' is missing from the spreadsheet")]
    MissingColumn { column: String },

    #[error("Unsupported spreadsheet format: {path}")]
    UnsupportedFormat { path: String },

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("CSV processing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CRM request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("CRM responded with status {status}: {body}")]
    ApiStatus { status: u16, body: String },

    #[error("CRM accepted the request but returned no result id: {body}")]
    MissingResultId { body: String },

    #[error("CRM response is not valid JSON: {message}")]
    InvalidResponse { message: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Transport,
    Api,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl ImportError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ImportError::ConfigError { .. }
            | ImportError::MissingConfigError { .. }
            | ImportError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            ImportError::MissingColumn { .. }
            | ImportError::UnsupportedFormat { .. }
            | ImportError::Spreadsheet(_)
            | ImportError::Csv(_)
            | ImportError::Io(_) => ErrorCategory::Input,
            ImportError::Transport(_) => ErrorCategory::Transport,
            ImportError::ApiStatus { .. }
            | ImportError::MissingResultId { .. }
            | ImportError::InvalidResponse { .. }
            | ImportError::SerializationError(_) => ErrorCategory::Api,
        }
    }

    /// 單筆失敗只影響該筆 lead，配置錯誤則整個流程無法開始
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::Critical,
            ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::Transport => ErrorSeverity::Medium,
            ErrorCategory::Api => ErrorSeverity::Medium,
        }
    }

    /// Process exit status: a missing or invalid configuration stops the run with 1.
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Configuration => 1,
            _ => self.severity().exit_code(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ImportError::MissingConfigError { field } => {
                format!("Configuration error: {} is not set.", field)
            }
            ImportError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration error: {} is invalid ({}).", field, reason)
            }
            ImportError::ConfigError { message } => format!("Configuration error: {}", message),
            ImportError::MissingColumn { column } => {
                format!("The file has no '{}' column.", column)
            }
            ImportError::UnsupportedFormat { path } => {
                format!("Cannot read '{}': unsupported file type.", path)
            }
            ImportError::Spreadsheet(_) | ImportError::Csv(_) | ImportError::Io(_) => {
                format!("Failed to read the spreadsheet: {}", self)
            }
            ImportError::Transport(_) => "Could not reach the CRM.".to_string(),
            ImportError::ApiStatus { status, .. } => {
                format!("The CRM rejected the request (HTTP {}).", status)
            }
            ImportError::MissingResultId { .. } => {
                "The CRM did not return the id of the created record.".to_string()
            }
            ImportError::InvalidResponse { .. } | ImportError::SerializationError(_) => {
                "The CRM returned an unreadable response.".to_string()
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ImportError::MissingConfigError { .. } => {
                "Add BITRIX_SUPERMET_WEBHOOK_URL to the .env file with the Bitrix24 webhook URL"
            }
            ImportError::InvalidConfigValueError { .. } | ImportError::ConfigError { .. } => {
                "Check the configuration file and environment variables"
            }
            ImportError::MissingColumn { .. } => {
                "Make sure the first row of the sheet contains a 'Телефон' header"
            }
            ImportError::UnsupportedFormat { .. } => "Save the file as .xlsx, .xls or .csv",
            ImportError::Spreadsheet(_) | ImportError::Csv(_) | ImportError::Io(_) => {
                "Check that the file exists and is not open in another program"
            }
            ImportError::Transport(_) => "Check the network connection and the webhook URL",
            ImportError::ApiStatus { .. }
            | ImportError::MissingResultId { .. }
            | ImportError::InvalidResponse { .. }
            | ImportError::SerializationError(_) => {
                "Inspect the log file for the full CRM response"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ImportError>;
