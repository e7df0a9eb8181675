//! Error types for the JSON-LD to Turtle converter
use jsonld2ttl_rdf::RdfError;
use thiserror::Error;

/// Jsonld2TtlError is the error type for the converter.
///
/// Per-context failures (redirects, network, remote parse, cache) are logged
/// and skipped by the pipeline. Document, serialization and input errors abort
/// a conversion.
#[derive(Error, Debug)]
pub enum Jsonld2TtlError {
    /// More redirects were needed than are followed. Carries the original URL.
    #[error("Too many redirects: {0}")]
    TooManyRedirects(String),
    /// A redirect response had no usable Location header. Carries the original URL.
    #[error("Redirect without a usable Location header: {0}")]
    MalformedRedirect(String),
    /// Invalid URL, transport failure, timeout or HTTP error status.
    #[error("Network error: {0}")]
    Network(String),
    /// A fetched context document could not be read as a JSON-LD context.
    #[error("Remote context parse error: {0}")]
    RemoteContextParse(String),
    /// The namespace cache file exists but is not valid cache JSON.
    #[error("Namespace cache is corrupt: {0}")]
    CacheCorrupt(String),
    /// Reading or writing the namespace cache file failed.
    #[error("Namespace cache error: {0}")]
    Cache(String),
    /// The input document could not be parsed or expanded.
    #[error("Document parse error: {0}")]
    DocumentParse(String),
    /// The graph could not be written as Turtle.
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// Reading the input failed.
    #[error("IO error: {0}")]
    Io(String),
}

impl From<RdfError> for Jsonld2TtlError {
    fn from(err: RdfError) -> Self {
        match err {
            RdfError::SerializationError(msg) => Jsonld2TtlError::Serialization(msg),
            other => Jsonld2TtlError::DocumentParse(other.to_string()),
        }
    }
}

impl From<std::io::Error> for Jsonld2TtlError {
    fn from(err: std::io::Error) -> Self {
        Jsonld2TtlError::Io(err.to_string())
    }
}
