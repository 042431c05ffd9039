use crate::page::error::DiscoveryError;
use crate::page::matcher::PageDocument;
use crate::page::page_model::{CSRF_TOKEN_FIELD, CsrfToken};

/// Pull the anti-forgery token out of a page.
///
/// Takes the `value` of the first `<input>` named (or, failing that, with the
/// id) `CSRFToken`. An empty value is treated the same as a missing field.
pub fn extract_csrf_token(doc: &PageDocument) -> Result<CsrfToken, DiscoveryError> {
    doc.elements()
        .filter(|el| el.value().name() == "input")
        .find(|el| {
            let element = el.value();
            element.attr("name") == Some(CSRF_TOKEN_FIELD)
                || (element.attr("name").is_none() && element.attr("id") == Some(CSRF_TOKEN_FIELD))
        })
        .and_then(|el| el.value().attr("value"))
        .filter(|value| !value.is_empty())
        .map(CsrfToken::new)
        .ok_or(DiscoveryError::MissingToken)
}

/// Convenience wrapper over raw page bytes.
pub fn extract_csrf_token_from(body: &[u8]) -> Result<CsrfToken, DiscoveryError> {
    extract_csrf_token(&PageDocument::parse(body))
}
