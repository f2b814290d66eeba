use std::fmt;

use serde::{Deserialize, Serialize};

use super::document::Document;
use super::errors::{NavErr, NavErrKind};
use super::ids::FolderId;

/// A file picked by the user, from a file dialog or dropped onto the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: &str, mime_type: &str, bytes: Vec<u8>) -> Self {
        Self { name: name.to_string(), mime_type: mime_type.to_string(), bytes }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum UploadFailureKind {
    SizeExceeded,
    UnsupportedType,
    Generic(String),
}

impl From<&NavErr> for UploadFailureKind {
    fn from(err: &NavErr) -> Self {
        match &err.kind {
            NavErrKind::FileTooLarge => UploadFailureKind::SizeExceeded,
            NavErrKind::UnsupportedFileType => UploadFailureKind::UnsupportedType,
            NavErrKind::Server { message, .. } if !message.is_empty() => {
                UploadFailureKind::Generic(message.clone())
            }
            kind => UploadFailureKind::Generic(kind.to_string()),
        }
    }
}

impl fmt::Display for UploadFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadFailureKind::SizeExceeded => write!(f, "file exceeds maximum size"),
            UploadFailureKind::UnsupportedType => write!(f, "unsupported format"),
            UploadFailureKind::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UploadFailure {
    pub file_name: String,
    pub kind: UploadFailureKind,
}

impl fmt::Display for UploadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file_name, self.kind)
    }
}

/// Per-file outcome of one batch, in submission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSummary {
    pub target: Option<FolderId>,
    pub submitted: usize,
    pub uploaded: Vec<Document>,
    pub failures: Vec<UploadFailure>,
}

/// What the user should be told once a batch is done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadReport {
    AllSucceeded { count: usize },
    Partial { succeeded: usize, failures: Vec<UploadFailure> },
    Failed { failures: Vec<UploadFailure> },
}

impl UploadSummary {
    pub fn new(target: Option<FolderId>, submitted: usize) -> Self {
        Self { target, submitted, uploaded: vec![], failures: vec![] }
    }

    pub fn success_count(&self) -> usize {
        self.uploaded.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// `None` when there is nothing worth interrupting the user for: a lone successful file is
    /// already visible in the refreshed list.
    pub fn report(&self) -> Option<UploadReport> {
        let succeeded = self.success_count();
        match (succeeded, self.failures.is_empty()) {
            (0, true) => None,
            (0, false) => Some(UploadReport::Failed { failures: self.failures.clone() }),
            (_, false) => {
                Some(UploadReport::Partial { succeeded, failures: self.failures.clone() })
            }
            (1, true) if self.submitted == 1 => None,
            (count, true) => Some(UploadReport::AllSucceeded { count }),
        }
    }
}

impl fmt::Display for UploadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadReport::AllSucceeded { count } => {
                write!(f, "Successfully uploaded {count} files")
            }
            UploadReport::Partial { succeeded, failures } => {
                writeln!(f, "Uploaded {succeeded} files.")?;
                writeln!(f, "Errors:")?;
                write_failures(f, failures)
            }
            UploadReport::Failed { failures } => {
                writeln!(f, "Upload failed:")?;
                write_failures(f, failures)
            }
        }
    }
}

fn write_failures(f: &mut fmt::Formatter<'_>, failures: &[UploadFailure]) -> fmt::Result {
    for (i, failure) in failures.iter().enumerate() {
        if i > 0 {
            writeln!(f)?;
        }
        write!(f, "{failure}")?;
    }
    Ok(())
}
