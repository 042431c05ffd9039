use thiserror::Error;

use crate::page::error::DiscoveryError;
use crate::printer::transport::TransportError;
use crate::state::state_model::CertificateId;

pub type Result<T> = std::result::Result<T, PrinterError>;

/// Errors surfaced by printer operations.
///
/// Every variant that comes out of a request/response step carries `stage`,
/// a short label such as `"delete: confirm"`, so a caller can tell where a
/// workflow stopped.
#[derive(Debug, Error)]
pub enum PrinterError {
    /// The request never produced a response.
    #[error("{stage}: request failed: {source}")]
    Transport {
        stage: &'static str,
        #[source]
        source: TransportError,
    },

    /// The device answered with something other than 200 OK.
    #[error("{stage}: unexpected status {status}")]
    Status { stage: &'static str, status: u16 },

    /// A page no longer matches the shape we know how to fill in.
    #[error("{stage}: {source}")]
    Discovery {
        stage: &'static str,
        #[source]
        source: DiscoveryError,
    },

    /// Caller supplied an ID we refuse to act on.
    #[error("invalid certificate id '{id}': {reason}")]
    Validation { id: String, reason: &'static str },

    /// Submissions went through but the device state does not show the effect.
    #[error(transparent)]
    Verification(#[from] VerificationError),

    #[error("PKCS#12 conversion failed: {0}")]
    Pkcs12(String),

    #[error("invalid printer URL: {0}")]
    Url(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    #[error("certificate {id} is still present after delete")]
    StillPresent { id: CertificateId },

    #[error("cannot attribute upload: {} new certificates appeared ({})", new_ids.len(), join_ids(new_ids))]
    AmbiguousUpload { new_ids: Vec<CertificateId> },
}

fn join_ids(ids: &[CertificateId]) -> String {
    ids.iter()
        .map(|id| id.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Coarse classification of a [`PrinterError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Discovery,
    Validation,
    Verification,
    Local,
}

impl PrinterError {
    pub fn transport(stage: &'static str, source: impl Into<TransportError>) -> Self {
        PrinterError::Transport {
            stage,
            source: source.into(),
        }
    }

    pub fn discovery(stage: &'static str, source: DiscoveryError) -> Self {
        PrinterError::Discovery { stage, source }
    }

    pub fn validation(id: &CertificateId, reason: &'static str) -> Self {
        PrinterError::Validation {
            id: id.to_string(),
            reason,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            PrinterError::Transport { .. } | PrinterError::Status { .. } => ErrorKind::Transport,
            PrinterError::Discovery { .. } => ErrorKind::Discovery,
            PrinterError::Validation { .. } => ErrorKind::Validation,
            PrinterError::Verification(_) => ErrorKind::Verification,
            PrinterError::Pkcs12(_) | PrinterError::Url(_) => ErrorKind::Local,
        }
    }

    /// The workflow stage that failed, when the error came from a device round trip.
    pub fn stage(&self) -> Option<&'static str> {
        match self {
            PrinterError::Transport { stage, .. }
            | PrinterError::Status { stage, .. }
            | PrinterError::Discovery { stage, .. } => Some(stage),
            _ => None,
        }
    }
}
