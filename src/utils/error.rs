use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Transfer error: {0}")]
    TransferError(#[from] suppaftp::FtpError),

    #[error("TLS setup failed: {0}")]
    TlsError(#[from] native_tls::Error),

    #[error("invalid inventory filename {path}")]
    InvalidInputFile { path: String },

    #[error("report file {file}, line {line}: {source}")]
    ReportDecodeError {
        file: String,
        line: u64,
        #[source]
        source: csv::Error,
    },

    #[error("malformed run date '{value}': {reason}")]
    MalformedRunDate { value: String, reason: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

impl EtlError {
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::InvalidInputFile { .. } => "check the -i path points at an existing report",
            EtlError::MalformedRunDate { .. } => {
                "rename the report so it starts with YYYYMMDDHHMM, or drop the date prefix"
            }
            EtlError::CsvError(_) | EtlError::ReportDecodeError { .. } => {
                "make sure the report is a comma separated UTF-8 export"
            }
            EtlError::MissingConfigError { .. } => {
                "set the value in the config file or environment, or pass -l to skip the upload"
            }
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => "review the TOML configuration file",
            EtlError::TransferError(_) | EtlError::TlsError(_) => {
                "verify the server, credentials and TLS mode"
            }
            EtlError::IoError(_) => "check file permissions and free disk space",
            EtlError::SerializationError(_) | EtlError::ValidationError { .. } => {
                "inspect the input data"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
