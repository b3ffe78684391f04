//! Configuration document trait abstraction.
//!
//! A project's configuration file is edited through these traits only; the
//! project synchronizer never looks at the text format itself.

use thiserror::Error;

/// Structured fields the SDK reads and writes on a configuration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentField {
    /// Human-readable application name
    Name,
    /// Reverse-DNS bundle identifier
    BundleId,
    /// Application version string
    Version,
}

impl std::fmt::Display for DocumentField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentField::Name => write!(f, "name"),
            DocumentField::BundleId => write!(f, "bundle id"),
            DocumentField::Version => write!(f, "version"),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigDocumentError {
    #[error("Malformed configuration document: {0}")]
    Malformed(String),

    #[error("Configuration document has no place for the {0} field")]
    MissingField(DocumentField),
}

/// A parsed, editable configuration document.
pub trait ConfigDocument: Send + Sync {
    /// Read a field, `None` when the document does not carry it.
    fn get(&self, field: DocumentField) -> Option<String>;

    /// Write a field in place.
    fn set(&mut self, field: DocumentField, value: &str) -> Result<(), ConfigDocumentError>;

    /// Render the document back to text.
    fn serialize(&self) -> String;
}

/// Factory turning configuration text into an editable document.
pub trait ConfigDocumentParser: Send + Sync {
    fn parse(&self, text: &str) -> Result<Box<dyn ConfigDocument>, ConfigDocumentError>;
}
