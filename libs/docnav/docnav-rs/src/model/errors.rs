use std::backtrace::Backtrace;
use std::fmt::{self, Display, Formatter};
use std::io;
use std::panic::Location;

use http::StatusCode;
use serde::{Serialize, Serializer};
use tracing::error;

use crate::io::network::ApiError;

pub type NavResult<T> = Result<T, NavErr>;

#[derive(Debug)]
pub struct NavErr {
    pub kind: NavErrKind,
    pub backtrace: Option<Backtrace>,
}

impl Serialize for NavErr {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.kind.to_string())
    }
}

impl Display for NavErr {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for NavErr {}

/// The text here is what a user is expected to see, so it's kept short and free of
/// implementation detail. [NavErrKind::Unexpected] is the exception and carries a debug
/// rendering of whatever went wrong.
impl Display for NavErrKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            NavErrKind::NotAuthenticated => write!(f, "You need to sign in to do that"),
            NavErrKind::NoCompanySelected => write!(f, "Select a company first"),
            NavErrKind::InvalidAuth => {
                write!(f, "Your session is no longer valid, please sign in again")
            }
            NavErrKind::ServerUnreachable => write!(f, "Could not reach server"),
            NavErrKind::FolderNonexistent => write!(f, "That folder does not exist"),
            NavErrKind::DocumentNonexistent => write!(f, "That document does not exist"),
            NavErrKind::NothingSelected => write!(f, "Select a document first"),
            NavErrKind::FolderNameEmpty => write!(f, "A folder name cannot be empty"),
            NavErrKind::FileTooLarge => write!(f, "File exceeds maximum size"),
            NavErrKind::UnsupportedFileType => write!(f, "Unsupported format"),
            NavErrKind::Server { message, .. } => write!(f, "{message}"),
            NavErrKind::DiskPathInvalid => write!(f, "That disk path is invalid"),
            NavErrKind::Unexpected(msg) => write!(f, "Unexpected error: {msg}"),
        }
    }
}

impl From<NavErrKind> for NavErr {
    fn from(kind: NavErrKind) -> Self {
        Self { kind, backtrace: Some(Backtrace::force_capture()) }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavErrKind {
    NotAuthenticated,
    NoCompanySelected,
    InvalidAuth,
    ServerUnreachable,
    FolderNonexistent,
    DocumentNonexistent,
    NothingSelected,
    FolderNameEmpty,

    /// The file is larger than the deployment's upload ceiling, either checked locally
    /// against [crate::Config::max_upload_bytes] or reported by the server.
    FileTooLarge,
    UnsupportedFileType,

    /// The server rejected the request and told us why.
    Server {
        status: u16,
        message: String,
    },
    DiskPathInvalid,

    /// If no caller is expected to branch on a particular failure we debug format it
    /// here, commonly used for errors originating in other crates.
    Unexpected(String),
}

pub trait Unexpected<T> {
    fn log_and_ignore(self) -> Option<T>;
    fn map_unexpected(self) -> NavResult<T>;
}

impl<T, E: fmt::Debug> Unexpected<T> for Result<T, E> {
    #[track_caller]
    fn map_unexpected(self) -> NavResult<T> {
        let location = Location::caller();
        self.map_err(|err| {
            NavErrKind::Unexpected(format!(
                "unexpected error at {}:{} {err:?}",
                location.file(),
                location.line(),
            ))
            .into()
        })
    }

    #[track_caller]
    fn log_and_ignore(self) -> Option<T> {
        let location = Location::caller();
        if let Err(e) = &self {
            error!("error ignored at {}:{} {e:?}", location.file(), location.line());
        }

        self.ok()
    }
}

pub fn core_err_unexpected<T: fmt::Debug>(err: T) -> NavErrKind {
    NavErrKind::Unexpected(format!("{err:?}"))
}

pub fn unexpected<T: fmt::Debug>(err: T) -> NavErr {
    core_err_unexpected(err).into()
}

impl From<io::Error> for NavErr {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::NotFound
            | io::ErrorKind::PermissionDenied
            | io::ErrorKind::InvalidInput => NavErrKind::DiskPathInvalid,
            _ => core_err_unexpected(e),
        }
        .into()
    }
}

impl From<serde_json::Error> for NavErr {
    fn from(err: serde_json::Error) -> Self {
        NavErrKind::Unexpected(format!("{err}")).into()
    }
}

const SIZE_EXCEEDED_MSG: &str = "file size exceeds maximum";
const TYPE_UNSUPPORTED_MSG: &str = "not supported";

/// Servers report upload problems both through the status code and through the error body,
/// sometimes with a 2xx status. Only upload rejections go through here, other endpoints keep
/// the server's message as is. The body is checked first: a body that names the problem is
/// more precise than the status it was sent with.
pub fn classify_rejection(status: u16, message: &str) -> NavErrKind {
    let lowered = message.to_lowercase();
    if lowered.contains(SIZE_EXCEEDED_MSG) {
        NavErrKind::FileTooLarge
    } else if lowered.contains(TYPE_UNSUPPORTED_MSG) {
        NavErrKind::UnsupportedFileType
    } else if status == StatusCode::PAYLOAD_TOO_LARGE.as_u16() {
        NavErrKind::FileTooLarge
    } else {
        NavErrKind::Server { status, message: message.to_string() }
    }
}

impl From<ApiError> for NavErr {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::SendFailed(_) => NavErrKind::ServerUnreachable,
            ApiError::InvalidAuth => NavErrKind::InvalidAuth,
            ApiError::Endpoint { status, message } => NavErrKind::Server { status, message },
            e => core_err_unexpected(e),
        }
        .into()
    }
}
