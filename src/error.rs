use std::fmt::{Display, Formatter};

pub type DynError = Box<dyn std::error::Error + Send + Sync + 'static>;
pub type Result<T> = std::result::Result<T, DynError>;

/// Message shown when a form is committed with an empty field.
pub const FILL_ALL_FIELDS: &str = "Please fill in all fields.";

/// A form commit was attempted with `name` or `age` left empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationError;

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(FILL_ALL_FIELDS)
    }
}

impl std::error::Error for ValidationError {}

/// Failure of the one-shot remote load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchError {
    /// Connection, TLS or transport failure.
    Network(String),
    /// The endpoint answered with a non-success status.
    Status(u16),
    /// The body was not a JSON array of objects with a `name`.
    Decode(String),
}

impl Display for FetchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Network(msg) => write!(f, "network error: {msg}"),
            FetchError::Status(code) => write!(f, "unexpected status {code}"),
            FetchError::Decode(msg) => write!(f, "invalid payload: {msg}"),
        }
    }
}

impl std::error::Error for FetchError {}

pub trait Context<T> {
    fn with_ctx<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

#[derive(Debug)]
pub struct WithContextError {
    pub context: String,
    pub source: DynError,
}

impl Display for WithContextError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.context, self.source)
    }
}

impl std::error::Error for WithContextError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&*self.source)
    }
}

impl<T, E> Context<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_ctx<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            Box::new(WithContextError {
                context: f(),
                source: e.into(),
            }) as DynError
        })
    }
}
