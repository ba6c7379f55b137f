pub type DynError = Box<dyn std::error::Error + Send + Sync + 'static>;
pub type Result<T> = std::result::Result<T, DynError>;

/// Failure of a single call to the book API.
///
/// Only used for logging: the table page collapses every variant into one
/// "request failed" outcome per action.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("invalid endpoint url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server responded with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Adds a human-readable prefix to an error, e.g. the file being written.
pub trait Context<T> {
    fn with_ctx<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

#[derive(Debug, thiserror::Error)]
#[error("{context}: {source}")]
pub struct WithContextError {
    pub context: String,
    pub source: DynError,
}

impl<T, E> Context<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_ctx<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let wrapped = WithContextError {
                context: f(),
                source: Box::new(e),
            };
            Box::new(wrapped) as DynError
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_wraps_source_message() {
        let res: std::result::Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"));
        let err = res.with_ctx(|| "read booktable.conf".to_string()).unwrap_err();
        assert_eq!(err.to_string(), "read booktable.conf: missing");
        assert!(err.source().is_some());
    }

    #[test]
    fn status_error_mentions_code() {
        let err = ServiceError::Status { status: 503, body: "busy".into() };
        assert_eq!(err.to_string(), "server responded with status 503: busy");
    }
}
