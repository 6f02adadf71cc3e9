use thiserror::Error;

/// Fatal configuration errors raised while (re)building a session.
///
/// Benign conditions such as typing after the session stopped are reported
/// through [`crate::session::InputResult`] flags, never through this type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("corpus resource not found: {path}")]
    MissingResource { path: String },

    #[error("corpus resource is malformed: {path}")]
    MalformedResource {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unable to read corpus resource: {path}")]
    ResourceIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported session duration: {0}s")]
    UnsupportedDuration(u32),
}

pub type Result<T> = std::result::Result<T, Error>;
