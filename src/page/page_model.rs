use std::fmt;

use serde::Serialize;

// ============================================================================
// Page shapes and logical field roles
// ============================================================================

/// The admin pages whose forms we know how to fill in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PageShape {
    /// HTTP server settings: choose the active certificate.
    HttpSettings,
    /// Certificate delete page, used for both the propose and confirm steps.
    Delete,
    /// Certificate import page (multipart upload).
    Import,
}

impl fmt::Display for PageShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PageShape::HttpSettings => "http settings",
            PageShape::Delete => "certificate delete",
            PageShape::Import => "certificate import",
        };
        f.write_str(name)
    }
}

/// What a discovered field is used for, independent of its firmware name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FieldRole {
    CertificateSelect,
    HttpsWebCheckbox,
    HttpsIppCheckbox,
    FirstCompanion,
    SecondCompanion,
    FileUpload,
    Password,
}

impl fmt::Display for FieldRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldRole::CertificateSelect => "certificate selector",
            FieldRole::HttpsWebCheckbox => "https web checkbox",
            FieldRole::HttpsIppCheckbox => "https ipp checkbox",
            FieldRole::FirstCompanion => "hidden companion field #1",
            FieldRole::SecondCompanion => "hidden companion field #2",
            FieldRole::FileUpload => "file upload field",
            FieldRole::Password => "password field",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Discovered field sets (one shape per page)
// ============================================================================
//
// These are only valid for the page fetch they were discovered from. The
// firmware may rename fields between sessions, so they are never cached.

/// Unnamed hidden inputs with an empty value that the device expects echoed back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompanionFields {
    pub first: Option<String>,
    pub second: Option<String>,
}

impl CompanionFields {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.first.iter().chain(self.second.iter()).map(String::as_str)
    }

    pub fn count(&self) -> usize {
        self.iter().count()
    }

    /// Both companions were found, as on a device's first form page.
    pub fn is_complete(&self) -> bool {
        self.first.is_some() && self.second.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HttpSettingsFields {
    pub cert_select: String,
    pub https_web: Option<String>,
    pub https_ipp: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeleteFields {
    pub companions: CompanionFields,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportFields {
    pub companions: CompanionFields,
    pub file: String,
    pub password: String,
}

/// Discovery result for any page shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FormFieldSet {
    HttpSettings(HttpSettingsFields),
    Delete(DeleteFields),
    Import(ImportFields),
}

impl FormFieldSet {
    pub fn shape(&self) -> PageShape {
        match self {
            FormFieldSet::HttpSettings(_) => PageShape::HttpSettings,
            FormFieldSet::Delete(_) => PageShape::Delete,
            FormFieldSet::Import(_) => PageShape::Import,
        }
    }

    /// Every discovered role with its device-assigned name, absent roles skipped.
    pub fn roles(&self) -> Vec<(FieldRole, &str)> {
        fn companions(c: &CompanionFields) -> Vec<(FieldRole, &str)> {
            let mut out = Vec::new();
            if let Some(name) = &c.first {
                out.push((FieldRole::FirstCompanion, name.as_str()));
            }
            if let Some(name) = &c.second {
                out.push((FieldRole::SecondCompanion, name.as_str()));
            }
            out
        }

        match self {
            FormFieldSet::HttpSettings(f) => {
                let mut out = vec![(FieldRole::CertificateSelect, f.cert_select.as_str())];
                if let Some(name) = &f.https_web {
                    out.push((FieldRole::HttpsWebCheckbox, name.as_str()));
                }
                if let Some(name) = &f.https_ipp {
                    out.push((FieldRole::HttpsIppCheckbox, name.as_str()));
                }
                out
            }
            FormFieldSet::Delete(f) => companions(&f.companions),
            FormFieldSet::Import(f) => {
                let mut out = companions(&f.companions);
                out.push((FieldRole::FileUpload, f.file.as_str()));
                out.push((FieldRole::Password, f.password.as_str()));
                out
            }
        }
    }

    pub fn name_of(&self, role: FieldRole) -> Option<&str> {
        self.roles()
            .into_iter()
            .find(|(r, _)| *r == role)
            .map(|(_, name)| name)
    }
}

// ============================================================================
// CSRF token and the parsed-form pair handed from one step to the next
// ============================================================================

/// Anti-forgery token scraped from one page body. Only good for the next POST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrfToken(String);

impl CsrfToken {
    pub fn new(token: impl Into<String>) -> Self {
        CsrfToken(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Token plus discovered fields from a single page body.
///
/// Each workflow step consumes one of these and, when the device answers with
/// another form, produces the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormPage<F> {
    pub token: CsrfToken,
    pub fields: F,
}

// ============================================================================
// Stable field names
// ============================================================================
//
// Unlike the firmware-generated names these never change between firmware
// revisions and are always submitted verbatim.

pub const PAGE_ID_FIELD: &str = "pageid";
pub const CSRF_TOKEN_FIELD: &str = "CSRFToken";
pub const SECONDARY_CSRF_TOKEN_FIELD: &str = "CSRFToken1";
pub const PROCESS_CONTROL_FIELD: &str = "hidden_certificate_process_control";
pub const CERTIFICATE_IDX_FIELD: &str = "hidden_certificate_idx";
pub const IMPORT_PASSWORD_FIELD: &str = "hidden_cert_import_password";
pub const HTTP_PAGE_MODE_FIELD: &str = "http_page_mode";
