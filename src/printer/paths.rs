/// Admin console pages the workflows talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdminPage {
    HttpSettings,
    CertificateDelete,
    CertificateImport,
    CertificateList,
}

impl AdminPage {
    pub fn path(self) -> &'static str {
        match self {
            AdminPage::HttpSettings => "/net/net/certificate/http.html",
            AdminPage::CertificateDelete => "/net/security/certificate/delete.html",
            AdminPage::CertificateImport => "/net/security/certificate/import.html",
            AdminPage::CertificateList => "/net/security/certificate/certificate.html",
        }
    }
}

/// `pageid` values each form must carry.
pub const HTTP_SETTINGS_PAGE_ID: &str = "326";
pub const CERTIFICATE_DELETE_PAGE_ID: &str = "383";
pub const CERTIFICATE_IMPORT_PAGE_ID: &str = "390";

/// Query parameter carrying the certificate index on delete and list links.
pub const CERTIFICATE_IDX_PARAM: &str = "idx";
