use thiserror::Error;

/// Errors surfaced by the document model.
///
/// Parse failures are all-or-nothing: a malformed instance identifier or edit
/// script aborts the whole operation. Codec failures are forwarded from
/// `serde_json` unchanged.
#[derive(Error, Debug)]
pub enum Error {
    /// A malformed instance identifier.
    #[error("invalid instance identifier: {0}")]
    Parse(String),

    /// A failure reported by the JSON codec while encoding or decoding
    /// RFC 7951 data.
    #[error(transparent)]
    Codec(#[from] serde_json::Error),

    /// A path operation reached a node whose kind cannot satisfy it, such as
    /// writing through an existing leaf.
    #[error("invalid node access: {0}")]
    Node(String),
}

impl Error {
    pub(crate) fn parse(reason: impl Into<String>) -> Self {
        Error::Parse(reason.into())
    }

    pub(crate) fn node(reason: impl Into<String>) -> Self {
        Error::Node(reason.into())
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
