//! Certificate management for printers whose only management surface is an
//! HTML admin console.
//!
//! The console has no API: every change is a form post guarded by a
//! per-page CSRF token, and most field names are generated by the firmware.
//! [`page`] finds the fields by structure, [`workflow`] drives the
//! multi-step form sequences, and [`state`] reconciles certificate-ID
//! snapshots taken before and after a change.

pub mod cert;
pub mod cli;
pub mod page;
pub mod printer;
pub mod state;
pub mod trace;
pub mod workflow;

pub use page::error::DiscoveryError;
pub use printer::session::Printer;
pub use printer::transport::{HttpTransport, PageResponse, Transport, TransportError, TransportSettings};
pub use state::state_model::{CertificateId, CertificateIdSet};
pub use workflow::error::{ErrorKind, PrinterError, Result, VerificationError};
pub use workflow::settle::SettlePolicy;
