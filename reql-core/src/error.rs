use crate::{Error, Frame, ResponseType, Term, backtrace, error_type};
use std::fmt::{self, Display};

/// Category of a [`ReqlError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The driver was misused, or a local check failed.
    Driver,
    /// The server (or the transport to it) rejected the request.
    Server,
    /// The server says the client broke the protocol.
    Client,
    /// The query was rejected before execution.
    Compile,
    /// Runtime failure with a category the driver has no dedicated kind for.
    Runtime,
    Internal,
    ResourceLimit,
    QueryLogic,
    OpFailed,
    OpIndeterminate,
    /// Raised by the query itself through `r.error`.
    User,
}

impl ErrorKind {
    /// Runtime kind for the error type code of a runtime error response.
    pub fn from_error_type(code: i64) -> Self {
        match code {
            error_type::INTERNAL => Self::Internal,
            error_type::RESOURCE_LIMIT => Self::ResourceLimit,
            error_type::QUERY_LOGIC => Self::QueryLogic,
            error_type::OP_FAILED => Self::OpFailed,
            error_type::OP_INDETERMINATE => Self::OpIndeterminate,
            error_type::USER => Self::User,
            _ => Self::Runtime,
        }
    }

    pub fn is_runtime(self) -> bool {
        matches!(
            self,
            Self::Runtime
                | Self::Internal
                | Self::ResourceLimit
                | Self::QueryLogic
                | Self::OpFailed
                | Self::OpIndeterminate
                | Self::User
        )
    }

    /// Stable name of the category.
    pub fn name(self) -> &'static str {
        match self {
            Self::Driver => "ReqlDriverError",
            Self::Server => "ReqlServerError",
            Self::Client => "ReqlClientError",
            Self::Compile => "ReqlCompileError",
            Self::Runtime => "ReqlRuntimeError",
            Self::Internal => "ReqlInternalError",
            Self::ResourceLimit => "ReqlResourceLimitError",
            Self::QueryLogic => "ReqlQueryLogicError",
            Self::OpFailed => "ReqlOpFailedError",
            Self::OpIndeterminate => "ReqlOpIndeterminateError",
            Self::User => "ReqlUserError",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub type ReqlResult<T> = std::result::Result<T, ReqlError>;

/// Any failure surfaced to the user of the driver.
///
/// The message is rendered once, at construction. When a query is attached it
/// is printed back under the message. Runtime and compile errors print it only
/// when the server located the failure, with a caret line under it:
///
/// ```text
/// No attribute `age` in object in:
/// r.table("users")("age").add(1)
///                  ^^^^^
/// ```
///
/// Construction never fails, a query that cannot be printed leaves the plain message.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct ReqlError {
    kind: ErrorKind,
    message: String,
    frames: Option<Vec<Frame>>,
}

impl ReqlError {
    pub fn new(
        kind: ErrorKind,
        message: impl Into<String>,
        term: Option<&Term>,
        frames: Option<Vec<Frame>>,
    ) -> Self {
        let message = with_query_context(kind, message.into(), term, frames.as_deref());
        Self {
            kind,
            message,
            frames,
        }
    }

    /// Local misuse, `term` is the query that was being run.
    pub fn driver(message: impl Into<String>, term: Option<&Term>) -> Self {
        Self::new(ErrorKind::Driver, message, term, None)
    }

    pub fn server(message: impl Into<String>, term: Option<&Term>) -> Self {
        Self::new(ErrorKind::Server, message, term, None)
    }

    /// Runtime failure, `error_type` is the category code sent by the server.
    pub fn runtime(
        error_type: i64,
        message: impl Into<String>,
        term: Option<&Term>,
        frames: Option<Vec<Frame>>,
    ) -> Self {
        Self::new(ErrorKind::from_error_type(error_type), message, term, frames)
    }

    pub fn compile(
        message: impl Into<String>,
        term: Option<&Term>,
        frames: Option<Vec<Frame>>,
    ) -> Self {
        Self::new(ErrorKind::Compile, message, term, frames)
    }

    pub fn client(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Client, message, None, None)
    }

    /// Error for an error response, `None` for any other response type.
    pub fn from_response(
        response_type: ResponseType,
        error_type: Option<i64>,
        message: impl Into<String>,
        term: Option<&Term>,
        frames: Option<Vec<Frame>>,
    ) -> Option<Self> {
        Some(match response_type {
            ResponseType::ClientError => Self::client(message),
            ResponseType::CompileError => Self::compile(message, term, frames),
            ResponseType::RuntimeError => {
                Self::runtime(error_type.unwrap_or_default(), message, term, frames)
            }
            _ => return None,
        })
    }

    /// Failure reported by the connection, kept as is when it already is a [`ReqlError`].
    pub fn from_transport(error: Error) -> Self {
        match error.downcast::<ReqlError>() {
            Ok(error) => error,
            Err(error) => Self::server(format!("{:#}", error), None),
        }
    }

    /// Append a second line of explanation.
    pub fn with_hint(mut self, hint: &str) -> Self {
        self.message.push('\n');
        self.message.push_str(hint);
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Location of the failing sub expression, as sent by the server.
    pub fn frames(&self) -> Option<&[Frame]> {
        self.frames.as_deref()
    }
}

fn without_period(mut message: String) -> String {
    if message.ends_with('.') {
        message.pop();
    }
    message
}

fn terminated(mut message: String) -> String {
    if !message.ends_with(['.', '?']) {
        message.push('.');
    }
    message
}

fn with_query_context(
    kind: ErrorKind,
    message: String,
    term: Option<&Term>,
    frames: Option<&[Frame]>,
) -> String {
    let header = match kind {
        ErrorKind::Client => return message,
        ErrorKind::Driver => "after",
        ErrorKind::Server => "for",
        _ => "in",
    };
    let underlined = kind == ErrorKind::Compile || kind.is_runtime();
    if underlined && frames.is_none() {
        return message;
    }
    let Some(term) = term else {
        return if underlined {
            message
        } else {
            terminated(message)
        };
    };
    let frames = if underlined { frames } else { None };
    match backtrace(term, frames) {
        Ok(backtrace) => {
            let query = if underlined {
                backtrace.annotated()
            } else {
                backtrace.text
            };
            format!("{} {}:\n{}", without_period(message), header, query)
        }
        Err(error) => {
            log::warn!("Could not print the query of a {}: {:#}", kind, error);
            if underlined {
                message
            } else {
                terminated(message)
            }
        }
    }
}
