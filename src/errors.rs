//! Console error taxonomy
//!
//! Every failure the console can produce is a `ConsoleError`. Validation
//! errors are raised before any network call; transport errors wrap
//! anything the HTTP layer reports, including non-2xx and non-JSON bodies.

use std::fmt;

#[derive(Debug, Clone)]
pub enum ConsoleError {
    /// Client-side validation failure, never sent to the network
    Validation(String),
    /// A required form field is missing; payload is the field name
    MissingField(String),
    /// Target URL failed absolute-URL validation
    InvalidUrl(String),
    /// Operation not allowed in the record's current lifecycle state
    InvalidState(String),
    NotFound(String),
    /// Network / timeout / non-2xx / non-JSON body
    Transport(String),
    /// Uploaded import file could not be parsed
    ImportParse(String),
    Serialization(String),
    FileOperation(String),
    Config(String),
    DateParse(String),
}

impl ConsoleError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ConsoleError::Validation(_) => "E001",
            ConsoleError::MissingField(_) => "E002",
            ConsoleError::InvalidUrl(_) => "E003",
            ConsoleError::InvalidState(_) => "E004",
            ConsoleError::NotFound(_) => "E005",
            ConsoleError::Transport(_) => "E006",
            ConsoleError::ImportParse(_) => "E007",
            ConsoleError::Serialization(_) => "E008",
            ConsoleError::FileOperation(_) => "E009",
            ConsoleError::Config(_) => "E010",
            ConsoleError::DateParse(_) => "E011",
        }
    }

    /// Human-readable error category
    pub fn error_type(&self) -> &'static str {
        match self {
            ConsoleError::Validation(_) => "Validation Error",
            ConsoleError::MissingField(_) => "Missing Field",
            ConsoleError::InvalidUrl(_) => "Invalid URL",
            ConsoleError::InvalidState(_) => "Invalid State",
            ConsoleError::NotFound(_) => "Resource Not Found",
            ConsoleError::Transport(_) => "Transport Error",
            ConsoleError::ImportParse(_) => "Import Parse Error",
            ConsoleError::Serialization(_) => "Serialization Error",
            ConsoleError::FileOperation(_) => "File Operation Error",
            ConsoleError::Config(_) => "Configuration Error",
            ConsoleError::DateParse(_) => "Date Parse Error",
        }
    }

    /// Error detail message
    pub fn message(&self) -> &str {
        match self {
            ConsoleError::Validation(msg)
            | ConsoleError::MissingField(msg)
            | ConsoleError::InvalidUrl(msg)
            | ConsoleError::InvalidState(msg)
            | ConsoleError::NotFound(msg)
            | ConsoleError::Transport(msg)
            | ConsoleError::ImportParse(msg)
            | ConsoleError::Serialization(msg)
            | ConsoleError::FileOperation(msg)
            | ConsoleError::Config(msg)
            | ConsoleError::DateParse(msg) => msg,
        }
    }

    /// True when the error was raised before any network call was made
    pub fn is_local(&self) -> bool {
        !matches!(self, ConsoleError::Transport(_) | ConsoleError::NotFound(_))
    }

    /// Format as colored terminal output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// Format as plain output
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for ConsoleError {}

// Convenience constructors
impl ConsoleError {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        ConsoleError::Validation(msg.into())
    }

    pub fn missing_field<T: Into<String>>(field: T) -> Self {
        ConsoleError::MissingField(field.into())
    }

    pub fn invalid_url<T: Into<String>>(msg: T) -> Self {
        ConsoleError::InvalidUrl(msg.into())
    }

    pub fn invalid_state<T: Into<String>>(msg: T) -> Self {
        ConsoleError::InvalidState(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        ConsoleError::NotFound(msg.into())
    }

    pub fn transport<T: Into<String>>(msg: T) -> Self {
        ConsoleError::Transport(msg.into())
    }

    pub fn import_parse<T: Into<String>>(msg: T) -> Self {
        ConsoleError::ImportParse(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        ConsoleError::Serialization(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        ConsoleError::FileOperation(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        ConsoleError::Config(msg.into())
    }

    pub fn date_parse<T: Into<String>>(msg: T) -> Self {
        ConsoleError::DateParse(msg.into())
    }
}

impl From<std::io::Error> for ConsoleError {
    fn from(err: std::io::Error) -> Self {
        ConsoleError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for ConsoleError {
    fn from(err: serde_json::Error) -> Self {
        ConsoleError::Serialization(err.to_string())
    }
}

impl From<csv::Error> for ConsoleError {
    fn from(err: csv::Error) -> Self {
        ConsoleError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for ConsoleError {
    fn from(err: chrono::ParseError) -> Self {
        ConsoleError::DateParse(err.to_string())
    }
}

impl From<reqwest::Error> for ConsoleError {
    fn from(err: reqwest::Error) -> Self {
        ConsoleError::Transport(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ConsoleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(ConsoleError::validation("x").code(), "E001");
        assert_eq!(ConsoleError::missing_field("service_type").code(), "E002");
        assert_eq!(ConsoleError::invalid_url("x").code(), "E003");
        assert_eq!(ConsoleError::invalid_state("x").code(), "E004");
        assert_eq!(ConsoleError::transport("x").code(), "E006");
        assert_eq!(ConsoleError::import_parse("x").code(), "E007");
    }

    #[test]
    fn test_display_uses_simple_format() {
        let err = ConsoleError::invalid_state("link 'abc' is not deleted");
        assert_eq!(
            format!("{}", err),
            "Invalid State: link 'abc' is not deleted"
        );
    }

    #[test]
    fn test_is_local() {
        assert!(ConsoleError::validation("x").is_local());
        assert!(ConsoleError::import_parse("x").is_local());
        assert!(!ConsoleError::transport("x").is_local());
        assert!(!ConsoleError::not_found("x").is_local());
    }

    #[test]
    fn test_from_serde_json() {
        let bad: std::result::Result<serde_json::Value, _> = serde_json::from_str("{nope");
        let err: ConsoleError = bad.unwrap_err().into();
        assert!(matches!(err, ConsoleError::Serialization(_)));
    }

    #[test]
    fn test_message_preserved() {
        let err = ConsoleError::missing_field("service_type");
        assert_eq!(err.message(), "service_type");
    }
}
