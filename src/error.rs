use std::fmt;

/// Structural failures raised while turning an OpenAPI document into mock data.
///
/// Only conditions that make the input unusable end up here. Circular references
/// and unknown stream events are recovered inline and reported through `tracing`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockGenError {
    /// A `$ref` points at a location that does not exist in the document
    UnresolvableReference {
        /// The reference string as written in the document
        reference: String,
    },
    /// A `$ref` that is not a local JSON pointer (`#/...`)
    ///
    /// Bundling multi-file documents is the loader's job; by the time the
    /// resolver runs every reference must be local.
    UnsupportedReference {
        /// The reference string as written in the document
        reference: String,
    },
    /// A recorded-request grouping key without the `method:url` separator
    MalformedGroupKey {
        /// The offending key
        key: String,
    },
    /// The document is not a usable OpenAPI 3 document
    InvalidDocument {
        /// What is wrong with it
        reason: String,
    },
}

impl MockGenError {
    pub fn invalid_document(reason: impl Into<String>) -> Self {
        MockGenError::InvalidDocument {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for MockGenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MockGenError::UnresolvableReference { reference } => {
                write!(
                    f,
                    "Unresolvable reference '{}': no such location in the document",
                    reference
                )
            }
            MockGenError::UnsupportedReference { reference } => {
                write!(
                    f,
                    "Unsupported reference '{}': only local references (#/...) are supported. \
                    Bundle external files before generating mocks.",
                    reference
                )
            }
            MockGenError::MalformedGroupKey { key } => {
                write!(
                    f,
                    "Malformed request key '{}': expected the form METHOD:URL",
                    key
                )
            }
            MockGenError::InvalidDocument { reason } => {
                write!(f, "Invalid OpenAPI document: {}", reason)
            }
        }
    }
}

impl std::error::Error for MockGenError {}
