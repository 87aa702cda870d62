//! Error types for the object-graph engine.
//!
//! Only a handful of conditions are fatal here: a broken object source at
//! construction time, I/O failures, and a root catalog that cannot be
//! rendered. Everything else (unresolvable references, rejected page
//! shapes, out-of-range indices) degrades gracefully and is reported
//! through the `log` facade instead of unwinding.

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while building or serializing a document.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The object source handed to the document constructor is invalid
    #[error("Invalid object source: {0}")]
    Construction(String),

    /// The trailer /Root reference cannot be resolved to a numbered catalog
    #[error("No numbered catalog available for the trailer /Root entry")]
    MissingRoot,

    /// A PageWriter capability reported a failure while placing text
    #[error("Page writer error: {0}")]
    PageWriter(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
