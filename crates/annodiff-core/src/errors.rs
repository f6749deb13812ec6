use thiserror::Error;

/// Result type alias using the canonical structured error
pub type Result<T> = std::result::Result<T, AnnoError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers (the CLI, a web
/// front end) can match on without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnoErrorKind {
    // Input
    /// A source line is not valid JSON or not a JSON object
    Parse,
    /// A record, subject or PII lacks a required field
    MissingField,
    /// Caller supplied an unusable argument (bad session id, bad file name)
    InvalidInput,

    // Storage
    NotFound,
    Io,
    Serialization,

    // Configuration
    Config,
}

impl AnnoErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            AnnoErrorKind::Parse => "ERR_PARSE",
            AnnoErrorKind::MissingField => "ERR_MISSING_FIELD",
            AnnoErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            AnnoErrorKind::NotFound => "ERR_NOT_FOUND",
            AnnoErrorKind::Io => "ERR_IO",
            AnnoErrorKind::Serialization => "ERR_SERIALIZATION",
            AnnoErrorKind::Config => "ERR_CONFIG",
        }
    }

    /// True for the kinds that mean "the input dataset is malformed"
    pub fn is_parse_error(&self) -> bool {
        matches!(self, AnnoErrorKind::Parse | AnnoErrorKind::MissingField)
    }
}

/// Canonical structured error type
#[derive(Debug, Clone)]
pub struct AnnoError {
    kind: AnnoErrorKind,
    op: Option<String>,
    source_name: Option<String>,
    line: Option<usize>,
    record_id: Option<String>,
    message: String,
}

impl AnnoError {
    pub fn new(kind: AnnoErrorKind) -> Self {
        Self {
            kind,
            op: None,
            source_name: None,
            line: None,
            record_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the name of the dataset or file being read
    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = Some(name.into());
        self
    }

    /// Add the 1-based line number of the offending input line
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Add the `data_id` of the record involved
    pub fn with_record_id(mut self, id: impl Into<String>) -> Self {
        self.record_id = Some(id.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> AnnoErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn source_name(&self) -> Option<&str> {
        self.source_name.as_deref()
    }

    pub fn line(&self) -> Option<usize> {
        self.line
    }

    pub fn record_id(&self) -> Option<&str> {
        self.record_id.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AnnoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(source_name) = &self.source_name {
            write!(f, " (source: {})", source_name)?;
        }
        if let Some(line) = self.line {
            write!(f, " (line: {})", line)?;
        }
        if let Some(record_id) = &self.record_id {
            write!(f, " (data_id: {})", record_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for AnnoError {}

// ========== End Error Facility ==========

/// Domain failures raised while loading, storing or configuring
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnnodiffError {
    /// A non-empty line is not a JSON object
    #[error("Malformed line {line} in {source_name}: {reason}")]
    MalformedLine {
        source_name: String,
        line: usize,
        reason: String,
    },

    /// A required field is absent or has the wrong type
    #[error("Missing or invalid field `{field}` on line {line} in {source_name}")]
    MissingField {
        source_name: String,
        line: usize,
        field: String,
    },

    /// Reading a source or writing a sink failed
    #[error("I/O error during {op}: {message}")]
    Io { op: String, message: String },

    /// JSON encoding or decoding of a report failed
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Configuration file could not be read or parsed
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// No report stored under this session id
    #[error("Report not found for session {session_id}")]
    ReportNotFound { session_id: String },

    /// Session id or file name rejected before touching the filesystem
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },
}

impl From<AnnodiffError> for AnnoError {
    fn from(err: AnnodiffError) -> Self {
        let message = err.to_string();
        match err {
            AnnodiffError::MalformedLine {
                source_name, line, ..
            } => AnnoError::new(AnnoErrorKind::Parse)
                .with_op("load_records")
                .with_source_name(source_name)
                .with_line(line)
                .with_message(message),

            AnnodiffError::MissingField {
                source_name, line, ..
            } => AnnoError::new(AnnoErrorKind::MissingField)
                .with_op("load_records")
                .with_source_name(source_name)
                .with_line(line)
                .with_message(message),

            AnnodiffError::Io { op, .. } => AnnoError::new(AnnoErrorKind::Io)
                .with_op(op)
                .with_message(message),

            AnnodiffError::Serialization { .. } => {
                AnnoError::new(AnnoErrorKind::Serialization).with_message(message)
            }

            AnnodiffError::Config { .. } => AnnoError::new(AnnoErrorKind::Config)
                .with_op("load_config")
                .with_message(message),

            AnnodiffError::ReportNotFound { .. } => AnnoError::new(AnnoErrorKind::NotFound)
                .with_op("load_report")
                .with_message(message),

            AnnodiffError::InvalidInput { .. } => {
                AnnoError::new(AnnoErrorKind::InvalidInput).with_message(message)
            }
        }
    }
}

impl From<serde_json::Error> for AnnodiffError {
    fn from(err: serde_json::Error) -> Self {
        AnnodiffError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for AnnodiffError {
    fn from(err: std::io::Error) -> Self {
        AnnodiffError::Io {
            op: "io".to_string(),
            message: err.to_string(),
        }
    }
}

/// Create an I/O error for the named operation
pub fn io_error(op: &str, err: std::io::Error) -> AnnoError {
    AnnodiffError::Io {
        op: op.to_string(),
        message: err.to_string(),
    }
    .into()
}
