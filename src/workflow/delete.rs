use crate::page::discover::{discover_delete_fields, read_form_page};
use crate::page::page_model::{
    CERTIFICATE_IDX_FIELD, DeleteFields, FormPage, PROCESS_CONTROL_FIELD,
};
use crate::printer::form::FormBody;
use crate::printer::paths::{AdminPage, CERTIFICATE_DELETE_PAGE_ID, CERTIFICATE_IDX_PARAM};
use crate::printer::session::Printer;
use crate::state::state_model::CertificateId;
use crate::workflow::error::{PrinterError, Result, VerificationError};

const STAGE_CHECK: &str = "delete: check id";
const STAGE_FETCH: &str = "delete: fetch delete page";
const STAGE_PROPOSE: &str = "delete: propose";
const STAGE_CONFIRM: &str = "delete: confirm";
const STAGE_VERIFY: &str = "delete: verify";

const PROPOSE: &str = "1";
const CONFIRM: &str = "2";

/// Reject IDs no workflow may target. Runs before any request is made.
pub(crate) fn ensure_actionable(id: &CertificateId) -> Result<()> {
    if id.is_empty() {
        return Err(PrinterError::validation(id, "empty id"));
    }
    if id.is_preset() {
        return Err(PrinterError::validation(id, "reserved for the preset certificate"));
    }
    Ok(())
}

impl Printer {
    /// Remove certificate `id` from the device and check that it is gone.
    pub fn delete_certificate(&self, id: &CertificateId) -> Result<()> {
        ensure_actionable(id)?;

        let installed = self.certificate_ids(STAGE_CHECK)?;
        if !installed.contains(id) {
            return Err(PrinterError::validation(id, "not installed on the device"));
        }

        let page = self.open_delete_page(id)?;
        let confirm_page = self.propose_delete(id, page)?;
        self.confirm_delete(id, confirm_page)?;

        let remaining = self
            .settle_policy()
            .settle(|| self.certificate_ids(STAGE_VERIFY), |ids| !ids.contains(id))?;
        if remaining.contains(id) {
            tracing::warn!(id = %id, remaining = %remaining, "device accepted delete but still lists certificate");
            return Err(VerificationError::StillPresent { id: id.clone() }.into());
        }

        tracing::info!(id = %id, "certificate deleted");
        Ok(())
    }

    fn open_delete_page(&self, id: &CertificateId) -> Result<FormPage<DeleteFields>> {
        let body = self.get_page(
            STAGE_FETCH,
            AdminPage::CertificateDelete,
            Some((CERTIFICATE_IDX_PARAM, id.as_str())),
        )?;
        let page = read_form_page(&body, |doc| Ok(discover_delete_fields(doc)))
            .map_err(|e| PrinterError::discovery(STAGE_FETCH, e))?;
        if !page.fields.companions.is_complete() {
            tracing::warn!(
                stage = STAGE_FETCH,
                found = page.fields.companions.count(),
                "fewer hidden companion fields than expected; submitting without the missing ones"
            );
        }
        Ok(page)
    }

    /// First submission; the device answers with a confirmation form.
    fn propose_delete(
        &self,
        id: &CertificateId,
        page: FormPage<DeleteFields>,
    ) -> Result<FormPage<DeleteFields>> {
        let form = delete_form(id, PROPOSE, &page);
        let body = self.post_form(STAGE_PROPOSE, AdminPage::CertificateDelete, &form)?;
        read_form_page(&body, |doc| Ok(discover_delete_fields(doc)))
            .map_err(|e| PrinterError::discovery(STAGE_PROPOSE, e))
    }

    fn confirm_delete(&self, id: &CertificateId, page: FormPage<DeleteFields>) -> Result<()> {
        let form = delete_form(id, CONFIRM, &page);
        self.post_form(STAGE_CONFIRM, AdminPage::CertificateDelete, &form)?;
        Ok(())
    }
}

fn delete_form(id: &CertificateId, step: &str, page: &FormPage<DeleteFields>) -> FormBody {
    let mut form = FormBody::for_page(CERTIFICATE_DELETE_PAGE_ID, &page.token);
    for name in page.fields.companions.iter() {
        form.set(name, "");
    }
    form.set(PROCESS_CONTROL_FIELD, step);
    form.set(CERTIFICATE_IDX_FIELD, id.as_str());
    form
}
