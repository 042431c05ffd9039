use crate::page::discover::{discover_http_settings_fields, read_form_page};
use crate::page::page_model::{CsrfToken, FormPage, HTTP_PAGE_MODE_FIELD, HttpSettingsFields};
use crate::page::token::extract_csrf_token_from;
use crate::printer::form::FormBody;
use crate::printer::paths::{AdminPage, HTTP_SETTINGS_PAGE_ID};
use crate::printer::session::Printer;
use crate::state::state_model::CertificateId;
use crate::workflow::delete::ensure_actionable;
use crate::workflow::error::{PrinterError, Result};

const STAGE_FETCH: &str = "activate: fetch settings page";
const STAGE_SELECT: &str = "activate: select certificate";
const STAGE_CONFIRM: &str = "activate: confirm";

/// `http_page_mode` for "apply, and enable the other secure protocols too".
/// `4` would apply without touching them.
pub const ACTIVATE_WITH_SECURE_PROTOCOLS: &str = "5";

impl Printer {
    /// Make `id` the certificate used by the HTTPS web UI and IPP.
    ///
    /// The ID does not need to appear in the settings page's drop-down: the
    /// device also accepts certificates it hides there, such as ones without a
    /// Common Name. On success the printer starts restarting; this returns
    /// without waiting for it to come back. Nothing is rolled back on failure,
    /// so an error after the selection step does not prove the certificate
    /// was left inactive.
    pub fn activate_certificate(&self, id: &CertificateId) -> Result<()> {
        ensure_actionable(id)?;

        let body = self.get_page(STAGE_FETCH, AdminPage::HttpSettings, None)?;
        let settings = read_form_page(&body, |doc| discover_http_settings_fields(doc))
            .map_err(|e| PrinterError::discovery(STAGE_FETCH, e))?;
        tracing::info!(
            select = %settings.fields.cert_select,
            https_web = ?settings.fields.https_web,
            https_ipp = ?settings.fields.https_ipp,
            "discovered http settings fields"
        );

        let confirm_token = self.select_certificate(id, settings)?;
        self.confirm_activation(confirm_token)?;

        tracing::info!(id = %id, "certificate activation submitted; printer is restarting");
        Ok(())
    }

    /// Submit the selection and return the token of the confirmation page.
    fn select_certificate(
        &self,
        id: &CertificateId,
        page: FormPage<HttpSettingsFields>,
    ) -> Result<CsrfToken> {
        let mut form = FormBody::for_page(HTTP_SETTINGS_PAGE_ID, &page.token);
        form.set(page.fields.cert_select.as_str(), id.as_str());
        if let Some(web) = &page.fields.https_web {
            form.set(web.as_str(), "1");
        }
        if let Some(ipp) = &page.fields.https_ipp {
            form.set(ipp.as_str(), "1");
        }

        let body = self.post_form(STAGE_SELECT, AdminPage::HttpSettings, &form)?;
        extract_csrf_token_from(&body).map_err(|e| PrinterError::discovery(STAGE_SELECT, e))
    }

    fn confirm_activation(&self, token: CsrfToken) -> Result<()> {
        let mut form = FormBody::for_page(HTTP_SETTINGS_PAGE_ID, &token);
        form.set(HTTP_PAGE_MODE_FIELD, ACTIVATE_WITH_SECURE_PROTOCOLS);

        self.post_form(STAGE_CONFIRM, AdminPage::HttpSettings, &form)?;
        Ok(())
    }
}
