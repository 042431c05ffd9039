use reqwest::Url;

use crate::page::discover::selected_certificate;
use crate::page::matcher::PageDocument;
use crate::printer::paths::{AdminPage, CERTIFICATE_IDX_PARAM};
use crate::printer::session::Printer;
use crate::state::state_model::{CertificateId, CertificateIdSet};
use crate::workflow::error::{PrinterError, Result};

impl Printer {
    /// Snapshot the IDs of every certificate installed on the device.
    ///
    /// `stage` labels a failed read, so a caller can tell a pre-check from a
    /// verification read taken after the device was already changed.
    pub fn certificate_ids(&self, stage: &'static str) -> Result<CertificateIdSet> {
        let page = AdminPage::CertificateList;
        let body = self.get_page(stage, page, None)?;
        let ids = parse_certificate_ids(&body, &self.page_url(page));
        tracing::debug!(count = ids.len(), ids = %ids, "certificate list read");
        Ok(ids)
    }

    /// The certificate the HTTPS server currently presents.
    pub fn current_certificate_id(&self) -> Result<CertificateId> {
        let stage = "current certificate";
        let body = self.get_page(stage, AdminPage::HttpSettings, None)?;
        let doc = PageDocument::parse(&body);
        selected_certificate(&doc).map_err(|e| PrinterError::discovery(stage, e))
    }
}

/// IDs referenced by `idx=` in the list page's links, first occurrence wins.
///
/// Each installed certificate gets a row with view / export / delete links
/// that all carry the same index. Relative links resolve against `page_url`
/// and query values are percent-decoded.
pub fn parse_certificate_ids(body: &[u8], page_url: &Url) -> CertificateIdSet {
    let doc = PageDocument::parse(body);
    doc.elements()
        .filter(|el| el.value().name() == "a")
        .filter_map(|el| el.value().attr("href"))
        .filter_map(|href| idx_from_href(page_url, href))
        .map(CertificateId::from)
        .collect()
}

fn idx_from_href(page_url: &Url, href: &str) -> Option<String> {
    let url = page_url.join(href).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == CERTIFICATE_IDX_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}
