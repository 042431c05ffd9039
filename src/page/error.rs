use thiserror::Error;

use crate::page::page_model::{FieldRole, PageShape};

/// A page body did not contain an element the workflow cannot do without.
///
/// This almost always means the firmware changed the markup. We report it
/// instead of submitting an incomplete form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscoveryError {
    #[error("{shape} page: no element found for required role '{role}'")]
    MissingField { shape: PageShape, role: FieldRole },

    #[error("no CSRF token found in page body")]
    MissingToken,

    #[error("{shape} page: certificate selector has no selected option")]
    NoSelectedCertificate { shape: PageShape },
}
