//! Error types for the crate.
//!
//! Internally we use `anyhow` for context chains. Anything that crosses the public API is wrapped
//! in `Error`, which carries an `ErrorType` so that callers can tell a transport failure from a
//! backend rejection without parsing the message.

use std::fmt::{Debug, Display, Formatter};

/// The broad category of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// The request never produced an HTTP response (connection refused, DNS, TLS, etc).
    Transport,
    /// A non-2xx response whose body carried a `message` field.
    HttpMessage,
    /// A non-2xx response whose body could not be parsed; the message is synthesized from the
    /// status code.
    Http,
    /// A 2xx response whose body did not decode into the expected type.
    Decode,
    /// The configuration directory or file is missing or invalid.
    Config,
    /// A local file operation failed.
    Io,
    /// The caller supplied invalid input.
    Input,
}

/// The public error type. Wraps an `anyhow::Error` together with an `ErrorType`.
pub struct Error {
    kind: ErrorType,
    inner: anyhow::Error,
}

impl Error {
    pub fn new(kind: ErrorType, inner: impl Into<anyhow::Error>) -> Self {
        Self {
            kind,
            inner: inner.into(),
        }
    }

    /// Create an error from a plain message.
    pub fn msg<S>(kind: ErrorType, message: S) -> Self
    where
        S: Display + Debug + Send + Sync + 'static,
    {
        Self {
            kind,
            inner: anyhow::Error::msg(message),
        }
    }

    pub fn kind(&self) -> ErrorType {
        self.kind
    }

    /// The single human-readable message for this error, i.e. the outermost context. This is what
    /// is stored in `AppState::error`.
    pub fn message(&self) -> String {
        self.inner.to_string()
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {:?}", self.kind, self.inner)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if f.alternate() {
            write!(f, "{:#}", self.inner)
        } else {
            Display::fmt(&self.inner, f)
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.inner.source()
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Internal result type used where no `ErrorType` has been decided yet.
pub(crate) type Res<T> = anyhow::Result<T>;

/// Converts an internal `anyhow` result into a public `Result` by tagging it with an `ErrorType`.
pub(crate) trait IntoResult<T> {
    fn pub_result(self, kind: ErrorType) -> Result<T>;
}

impl<T> IntoResult<T> for std::result::Result<T, anyhow::Error> {
    fn pub_result(self, kind: ErrorType) -> Result<T> {
        self.map_err(|e| Error::new(kind, e))
    }
}
