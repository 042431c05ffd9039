//! In-memory stand-in for the printer's admin console.
//!
//! Serves the fixture pages with a fresh CSRF token on every response,
//! rejects posts that do not echo the most recently issued token, and
//! mutates its certificate list the way the real device does once a
//! delete is confirmed or an import is submitted.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use printer_certs::cert::pkcs12::Pkcs12Encoder;
use printer_certs::printer::form::{FormBody, MultipartBody, MultipartPart};
use printer_certs::printer::paths::AdminPage;
use printer_certs::{PageResponse, Printer, SettlePolicy, Transport, TransportError};
use reqwest::Url;

use super::fixtures::{FIXTURE_TOKEN, certificate_list_page, fixture};

pub const BASE_URL: &str = "https://printer.test";

#[derive(Debug, Clone, PartialEq)]
pub enum RecordedBody {
    None,
    Form(Vec<(String, String)>),
    Multipart(Vec<MultipartPart>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub path: String,
    pub query: Option<String>,
    pub body: RecordedBody,
}

impl RecordedRequest {
    pub fn form_value(&self, name: &str) -> Option<&str> {
        match &self.body {
            RecordedBody::Form(fields) => fields
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.as_str()),
            RecordedBody::Multipart(parts) => parts.iter().find_map(|p| match p {
                MultipartPart::Text { name: n, value } if n == name => Some(value.as_str()),
                _ => None,
            }),
            RecordedBody::None => None,
        }
    }

    pub fn field_names(&self) -> Vec<String> {
        match &self.body {
            RecordedBody::Form(fields) => fields.iter().map(|(n, _)| n.clone()).collect(),
            RecordedBody::Multipart(parts) => parts.iter().map(|p| p.name().to_string()).collect(),
            RecordedBody::None => vec![],
        }
    }
}

#[derive(Debug, Default)]
pub struct DeviceState {
    pub ids: Vec<String>,
    pub active: Option<String>,
    pub pending_selection: Option<String>,
    pub issued_token: Option<String>,
    pub token_counter: u32,
    pub requests: Vec<RecordedRequest>,

    /// Confirmed deletes are acknowledged but not carried out.
    pub ignore_deletes: bool,
    /// IDs that appear after an import is submitted.
    pub ids_created_by_upload: Vec<String>,
    /// Replacement bodies for GETs, keyed by path.
    pub page_overrides: HashMap<String, String>,
    /// Forced status codes, keyed by (method, path).
    pub status_overrides: HashMap<(&'static str, String), u16>,
    /// Paths whose requests fail before a response is produced.
    pub broken_paths: Vec<String>,
    /// Paths that answer this many requests, then fail every later one.
    pub paths_failing_after: HashMap<String, usize>,
}

#[derive(Clone, Default)]
pub struct FakePrinter {
    state: Arc<Mutex<DeviceState>>,
}

impl FakePrinter {
    pub fn with_ids(ids: &[&str]) -> Self {
        let fake = FakePrinter::default();
        fake.state().ids = ids.iter().map(|s| s.to_string()).collect();
        fake
    }

    pub fn state(&self) -> MutexGuard<'_, DeviceState> {
        self.state.lock().expect("fake printer state poisoned")
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state().requests.clone()
    }

    pub fn posts(&self) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == "POST")
            .collect()
    }

    pub fn ids(&self) -> Vec<String> {
        self.state().ids.clone()
    }

    pub fn override_page(&self, page: AdminPage, body: impl Into<String>) {
        self.state()
            .page_overrides
            .insert(page.path().to_string(), body.into());
    }

    pub fn force_status(&self, method: &'static str, page: AdminPage, status: u16) {
        self.state()
            .status_overrides
            .insert((method, page.path().to_string()), status);
    }

    pub fn break_page(&self, page: AdminPage) {
        self.state().broken_paths.push(page.path().to_string());
    }

    /// Let the first `answered` requests to `page` through, then fail the rest.
    pub fn break_page_after(&self, page: AdminPage, answered: usize) {
        self.state()
            .paths_failing_after
            .insert(page.path().to_string(), answered);
    }

    /// A printer handle over this fake with no settle delay and a stub encoder.
    pub fn printer(&self) -> Printer {
        Printer::new(BASE_URL, self.clone())
            .expect("valid base url")
            .with_settle_policy(SettlePolicy::immediate())
            .with_encoder(StubEncoder)
    }

    fn respond(&self, method: &'static str, url: &Url, body: RecordedBody) -> Result<PageResponse, TransportError> {
        let mut state = self.state();
        let path = url.path().to_string();
        let request = RecordedRequest {
            method,
            path: path.clone(),
            query: url.query().map(str::to_string),
            body,
        };
        state.requests.push(request.clone());

        let seen = state.requests.iter().filter(|r| r.path == path).count();
        let exhausted = state
            .paths_failing_after
            .get(&path)
            .is_some_and(|answered| seen > *answered);
        if exhausted || state.broken_paths.contains(&path) {
            return Err(TransportError::Other(format!("connection reset on {}", path)));
        }
        if let Some(status) = state.status_overrides.get(&(method, path.clone())) {
            return Ok(PageResponse {
                status: *status,
                body: b"<html><body>Error</body></html>".to_vec(),
            });
        }

        if method == "GET" {
            if let Some(body) = state.page_overrides.get(&path).cloned() {
                return Ok(PageResponse::ok(state.issue_token(&body)));
            }
        }

        let list = AdminPage::CertificateList.path();
        let settings = AdminPage::HttpSettings.path();
        let delete = AdminPage::CertificateDelete.path();
        let import = AdminPage::CertificateImport.path();

        let page = match (method, path.as_str()) {
            ("GET", p) if p == list => certificate_list_page(&state.ids),
            ("GET", p) if p == settings => state.issue_token(&fixture("http_settings.html")),
            ("GET", p) if p == delete => state.issue_token(&fixture("delete.html")),
            ("GET", p) if p == import => state.issue_token(&fixture("import.html")),
            ("POST", p) if p == settings => {
                if !state.token_matches(&request) {
                    return Ok(forbidden());
                }
                if let Some(mode) = request.form_value("http_page_mode") {
                    assert_eq!(mode, "5", "activation must enable other secure protocols");
                    state.active = state.pending_selection.take();
                    "<html><body>Restarting...</body></html>".to_string()
                } else {
                    state.pending_selection = request.form_value("Bb23").map(str::to_string);
                    state.issue_token(&fixture("http_settings_confirm.html"))
                }
            }
            ("POST", p) if p == delete => {
                if !state.token_matches(&request) {
                    return Ok(forbidden());
                }
                let idx = request.form_value("hidden_certificate_idx").unwrap_or_default().to_string();
                match request.form_value("hidden_certificate_process_control") {
                    Some("1") => state.issue_token(&fixture("delete_confirm.html")),
                    Some("2") => {
                        if !state.ignore_deletes {
                            state.ids.retain(|id| *id != idx);
                        }
                        "<html><body>Deleting...</body></html>".to_string()
                    }
                    _ => return Ok(forbidden()),
                }
            }
            ("POST", p) if p == import => {
                if !state.token_matches(&request) {
                    return Ok(forbidden());
                }
                let created = state.ids_created_by_upload.clone();
                state.ids.extend(created);
                "<html><body>Importing...</body></html>".to_string()
            }
            _ => {
                return Ok(PageResponse {
                    status: 404,
                    body: b"<html><body>Not Found</body></html>".to_vec(),
                });
            }
        };

        Ok(PageResponse::ok(page))
    }
}

impl DeviceState {
    fn issue_token(&mut self, template: &str) -> String {
        self.token_counter += 1;
        let token = format!("tok-{}", self.token_counter);
        self.issued_token = Some(token.clone());
        template.replace(FIXTURE_TOKEN, &token)
    }

    fn token_matches(&self, request: &RecordedRequest) -> bool {
        request.form_value("CSRFToken").is_some() && request.form_value("CSRFToken") == self.issued_token.as_deref()
    }
}

fn forbidden() -> PageResponse {
    PageResponse {
        status: 403,
        body: b"<html><body>Invalid token</body></html>".to_vec(),
    }
}

impl Transport for FakePrinter {
    fn get(&self, url: &Url) -> Result<PageResponse, TransportError> {
        self.respond("GET", url, RecordedBody::None)
    }

    fn post_form(&self, url: &Url, form: &FormBody) -> Result<PageResponse, TransportError> {
        self.respond("POST", url, RecordedBody::Form(form.fields().to_vec()))
    }

    fn post_multipart(&self, url: &Url, form: MultipartBody) -> Result<PageResponse, TransportError> {
        self.respond("POST", url, RecordedBody::Multipart(form.into_parts()))
    }
}

pub const STUB_BUNDLE: &[u8] = b"stub-pkcs12-bundle";

/// Skips real PKCS#12 assembly so workflow tests can use placeholder PEMs.
pub struct StubEncoder;

impl Pkcs12Encoder for StubEncoder {
    fn encode(&self, _key_pem: &[u8], _cert_pem: &[u8]) -> printer_certs::Result<Vec<u8>> {
        Ok(STUB_BUNDLE.to_vec())
    }
}
