use crate::page::error::DiscoveryError;
use crate::page::matcher::{ElementPattern, PageDocument, ValueShape};
use crate::page::page_model::{
    CERTIFICATE_IDX_FIELD, CSRF_TOKEN_FIELD, CompanionFields, DeleteFields, FieldRole,
    FormFieldSet, FormPage, HttpSettingsFields, IMPORT_PASSWORD_FIELD, ImportFields,
    PAGE_ID_FIELD, PROCESS_CONTROL_FIELD, PageShape, SECONDARY_CSRF_TOKEN_FIELD,
};
use crate::page::token::extract_csrf_token;
use crate::state::state_model::CertificateId;

// ============================================================================
// Patterns
// ============================================================================

const HIDDEN_EMPTY: ElementPattern<'static> =
    ElementPattern::input("hidden").with_value(ValueShape::Empty);

const CERT_SELECT: ElementPattern<'static> = ElementPattern::tag("select");

/// An enabled-style checkbox (`value="1"`) whose label text starts right after it.
const HTTPS_CHECKBOX: ElementPattern<'static> = ElementPattern::input("checkbox")
    .with_value(ValueShape::Equals("1"))
    .followed_by("HTTPS");

const FILE_INPUT: ElementPattern<'static> = ElementPattern::input("file");

const PASSWORD_INPUT: ElementPattern<'static> = ElementPattern::input("password");

/// Hidden fields on the delete page that are submitted by name elsewhere.
const DELETE_KNOWN_HIDDEN: &[&str] = &[
    CSRF_TOKEN_FIELD,
    SECONDARY_CSRF_TOKEN_FIELD,
    PAGE_ID_FIELD,
    PROCESS_CONTROL_FIELD,
    CERTIFICATE_IDX_FIELD,
];

/// Hidden fields on the import page that are submitted by name elsewhere.
const IMPORT_KNOWN_HIDDEN: &[&str] = &[
    CSRF_TOKEN_FIELD,
    SECONDARY_CSRF_TOKEN_FIELD,
    PAGE_ID_FIELD,
    PROCESS_CONTROL_FIELD,
    IMPORT_PASSWORD_FIELD,
];

// ============================================================================
// Discovery entry points
// ============================================================================

/// Locate the form fields a workflow needs on a page of the given shape.
///
/// Pure function of `body`: the same bytes always produce the same set.
pub fn discover(body: &[u8], shape: PageShape) -> Result<FormFieldSet, DiscoveryError> {
    let doc = PageDocument::parse(body);
    discover_in(&doc, shape)
}

pub fn discover_in(doc: &PageDocument, shape: PageShape) -> Result<FormFieldSet, DiscoveryError> {
    Ok(match shape {
        PageShape::HttpSettings => FormFieldSet::HttpSettings(discover_http_settings_fields(doc)?),
        PageShape::Delete => FormFieldSet::Delete(discover_delete_fields(doc)),
        PageShape::Import => FormFieldSet::Import(discover_import_fields(doc)?),
    })
}

/// Parse `body` once and pull out both the CSRF token and the page's fields.
pub fn read_form_page<F>(
    body: &[u8],
    discover_fields: impl FnOnce(&PageDocument) -> Result<F, DiscoveryError>,
) -> Result<FormPage<F>, DiscoveryError> {
    let doc = PageDocument::parse(body);
    let token = extract_csrf_token(&doc)?;
    let fields = discover_fields(&doc)?;
    Ok(FormPage { token, fields })
}

/// HTTP settings page: the certificate `<select>` is required, the two HTTPS
/// checkboxes are optional.
///
/// The checkboxes are told apart only by position: the first one in document
/// order is taken as the web UI switch, the second as the IPP switch. A
/// firmware that reorders them will silently swap the mapping; there is no
/// stronger signal in the markup.
pub fn discover_http_settings_fields(
    doc: &PageDocument,
) -> Result<HttpSettingsFields, DiscoveryError> {
    let cert_select = doc
        .field_names(CERT_SELECT)
        .into_iter()
        .next()
        .ok_or(DiscoveryError::MissingField {
            shape: PageShape::HttpSettings,
            role: FieldRole::CertificateSelect,
        })?;

    let mut checkboxes = doc.field_names(HTTPS_CHECKBOX).into_iter();
    let https_web = checkboxes.next();
    let https_ipp = checkboxes.next();

    Ok(HttpSettingsFields {
        cert_select,
        https_web,
        https_ipp,
    })
}

/// Delete page: only the companion hidden fields, all of them optional.
pub fn discover_delete_fields(doc: &PageDocument) -> DeleteFields {
    DeleteFields {
        companions: companion_fields(doc, DELETE_KNOWN_HIDDEN),
    }
}

/// Import page: companions are optional, file and password inputs are required.
pub fn discover_import_fields(doc: &PageDocument) -> Result<ImportFields, DiscoveryError> {
    let missing = |role| DiscoveryError::MissingField {
        shape: PageShape::Import,
        role,
    };

    let file = doc
        .field_names(FILE_INPUT)
        .into_iter()
        .next()
        .ok_or_else(|| missing(FieldRole::FileUpload))?;
    let password = doc
        .field_names(PASSWORD_INPUT)
        .into_iter()
        .next()
        .ok_or_else(|| missing(FieldRole::Password))?;

    Ok(ImportFields {
        companions: companion_fields(doc, IMPORT_KNOWN_HIDDEN),
        file,
        password,
    })
}

/// The certificate currently chosen in the settings page's selector.
pub fn selected_certificate(doc: &PageDocument) -> Result<CertificateId, DiscoveryError> {
    let select = doc
        .find(CERT_SELECT)
        .next()
        .ok_or(DiscoveryError::MissingField {
            shape: PageShape::HttpSettings,
            role: FieldRole::CertificateSelect,
        })?;

    select
        .descendants()
        .filter_map(scraper::ElementRef::wrap)
        .filter(|el| el.value().name() == "option")
        .find(|el| el.value().attr("selected").is_some())
        .and_then(|el| el.value().attr("value").map(CertificateId::from))
        .ok_or(DiscoveryError::NoSelectedCertificate {
            shape: PageShape::HttpSettings,
        })
}

// ============================================================================
// Helpers
// ============================================================================

/// First two empty hidden inputs whose names are not in `known`, in document order.
fn companion_fields(doc: &PageDocument, known: &[&str]) -> CompanionFields {
    let mut unknown = doc
        .field_names(HIDDEN_EMPTY)
        .into_iter()
        .filter(|name| !known.contains(&name.as_str()));

    let companions = CompanionFields {
        first: unknown.next(),
        second: unknown.next(),
    };

    // Confirmation pages routinely carry none; workflows warn on the pages
    // where both are expected.
    tracing::debug!(found = companions.count(), "companion fields discovered");

    companions
}
