use crate::cert::pkcs12::{BUNDLE_FILE_NAME, bundle_fingerprint};
use crate::page::discover::{discover_import_fields, read_form_page};
use crate::page::page_model::{FormPage, IMPORT_PASSWORD_FIELD, ImportFields, PROCESS_CONTROL_FIELD};
use crate::printer::form::MultipartBody;
use crate::printer::paths::{AdminPage, CERTIFICATE_IMPORT_PAGE_ID};
use crate::printer::session::Printer;
use crate::state::diff::diff_ids;
use crate::state::state_model::{CertificateId, CertificateIdSet};
use crate::workflow::error::{PrinterError, Result, VerificationError};

const STAGE_BASELINE: &str = "upload: baseline";
const STAGE_FETCH: &str = "upload: fetch import page";
const STAGE_SUBMIT: &str = "upload: submit bundle";
const STAGE_VERIFY: &str = "upload: verify";

impl Printer {
    /// Install a PEM key and certificate on the device.
    ///
    /// The device does not say which ID it gave the new certificate, so the
    /// ID list is read before and after the upload and compared. Returns
    /// `Ok(None)` when the upload was accepted but no new ID showed up, and a
    /// verification error when more than one did.
    pub fn upload_certificate(
        &self,
        key_pem: &[u8],
        cert_pem: &[u8],
    ) -> Result<Option<CertificateId>> {
        let bundle = self.encoder().encode(key_pem, cert_pem)?;
        tracing::info!(
            sha1 = %bundle_fingerprint(&bundle),
            bytes = bundle.len(),
            "built PKCS#12 bundle"
        );

        let baseline = self.certificate_ids(STAGE_BASELINE)?;

        let body = self.get_page(STAGE_FETCH, AdminPage::CertificateImport, None)?;
        let page = read_form_page(&body, |doc| discover_import_fields(doc))
            .map_err(|e| PrinterError::discovery(STAGE_FETCH, e))?;
        tracing::info!(
            file = %page.fields.file,
            password = %page.fields.password,
            companions = page.fields.companions.count(),
            "discovered import fields"
        );
        if !page.fields.companions.is_complete() {
            tracing::warn!(
                stage = STAGE_FETCH,
                found = page.fields.companions.count(),
                "fewer hidden companion fields than expected; submitting without the missing ones"
            );
        }

        let form = import_form(&page, bundle);
        self.post_multipart(STAGE_SUBMIT, AdminPage::CertificateImport, form)?;

        let after = self.settle_policy().settle(
            || self.certificate_ids(STAGE_VERIFY),
            |ids| !diff_ids(&baseline, ids).added.is_empty(),
        )?;

        let new_id = reconcile_upload(&baseline, &after)?;
        match &new_id {
            Some(id) => tracing::info!(id = %id, "certificate uploaded"),
            None => tracing::warn!("upload accepted but no new certificate id appeared"),
        }
        Ok(new_id)
    }
}

/// Attribute an upload to the single ID that appeared between two snapshots.
pub fn reconcile_upload(
    baseline: &CertificateIdSet,
    after: &CertificateIdSet,
) -> Result<Option<CertificateId>> {
    let mut added = diff_ids(baseline, after).added;
    match added.len() {
        0 => Ok(None),
        1 => Ok(added.pop()),
        _ => Err(VerificationError::AmbiguousUpload { new_ids: added }.into()),
    }
}

fn import_form(page: &FormPage<ImportFields>, bundle: Vec<u8>) -> MultipartBody {
    let mut form = MultipartBody::for_page(CERTIFICATE_IMPORT_PAGE_ID, &page.token);
    for name in page.fields.companions.iter() {
        form.text(name, "");
    }
    form.text(PROCESS_CONTROL_FIELD, "1");
    form.file(page.fields.file.as_str(), BUNDLE_FILE_NAME, bundle);
    form.text(page.fields.password.as_str(), "");
    form.text(IMPORT_PASSWORD_FIELD, "");
    form
}
