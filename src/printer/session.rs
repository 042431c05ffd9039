use reqwest::Url;

use crate::cert::pkcs12::{PemPkcs12Encoder, Pkcs12Encoder};
use crate::printer::form::{FormBody, MultipartBody};
use crate::printer::paths::AdminPage;
use crate::printer::transport::{
    HttpTransport, PageResponse, Transport, TransportError, TransportSettings,
};
use crate::trace::logger::TraceLogger;
use crate::trace::trace::TraceEvent;
use crate::workflow::error::{PrinterError, Result};
use crate::workflow::settle::SettlePolicy;

/// Handle on one printer's web admin console.
///
/// The console keeps per-session state (the current CSRF token, which page
/// the session is "on"), so operations against one printer must not overlap.
/// Every method takes `&self` and runs to completion before returning; callers
/// that share a `Printer` between threads are responsible for serializing use.
pub struct Printer {
    base_url: Url,
    transport: Box<dyn Transport>,
    encoder: Box<dyn Pkcs12Encoder>,
    settle: SettlePolicy,
    tracer: TraceLogger,
}

impl Printer {
    /// Build a printer handle over an arbitrary transport.
    pub fn new(base_url: &str, transport: impl Transport + 'static) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| PrinterError::Url(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(PrinterError::Url(format!(
                "{}: expected an http or https URL",
                base_url
            )));
        }

        Ok(Printer {
            base_url,
            transport: Box::new(transport),
            encoder: Box::new(PemPkcs12Encoder),
            settle: SettlePolicy::default(),
            tracer: TraceLogger::disabled(),
        })
    }

    /// Build a printer handle that talks HTTP(S) through reqwest.
    pub fn connect(base_url: &str, settings: &TransportSettings) -> Result<Self> {
        let transport = HttpTransport::new(settings)
            .map_err(|e| PrinterError::transport("connect", e))?;
        Printer::new(base_url, transport)
    }

    pub fn with_settle_policy(mut self, settle: SettlePolicy) -> Self {
        self.settle = settle;
        self
    }

    pub fn with_encoder(mut self, encoder: impl Pkcs12Encoder + 'static) -> Self {
        self.encoder = Box::new(encoder);
        self
    }

    pub fn with_tracer(mut self, tracer: TraceLogger) -> Self {
        self.tracer = tracer;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn settle_policy(&self) -> SettlePolicy {
        self.settle
    }

    pub(crate) fn encoder(&self) -> &dyn Pkcs12Encoder {
        self.encoder.as_ref()
    }

    pub(crate) fn trace(&self, event: TraceEvent) {
        self.tracer.log(&event);
    }

    pub fn page_url(&self, page: AdminPage) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(page.path());
        url.set_query(None);
        url.set_fragment(None);
        url
    }

    // =========================================================================
    // Request helpers
    // =========================================================================

    /// GET an admin page and return its body, failing unless the device says 200.
    pub(crate) fn get_page(
        &self,
        stage: &'static str,
        page: AdminPage,
        query: Option<(&str, &str)>,
    ) -> Result<Vec<u8>> {
        let mut url = self.page_url(page);
        if let Some((key, value)) = query {
            url.query_pairs_mut().append_pair(key, value);
        }
        let result = self.transport.get(&url);
        self.finish(stage, "GET", page, result)
    }

    pub(crate) fn post_form(
        &self,
        stage: &'static str,
        page: AdminPage,
        form: &FormBody,
    ) -> Result<Vec<u8>> {
        let url = self.page_url(page);
        let result = self.transport.post_form(&url, form);
        self.finish(stage, "POST", page, result)
    }

    pub(crate) fn post_multipart(
        &self,
        stage: &'static str,
        page: AdminPage,
        form: MultipartBody,
    ) -> Result<Vec<u8>> {
        let url = self.page_url(page);
        let result = self.transport.post_multipart(&url, form);
        self.finish(stage, "POST", page, result)
    }

    fn finish(
        &self,
        stage: &'static str,
        method: &str,
        page: AdminPage,
        result: std::result::Result<PageResponse, TransportError>,
    ) -> Result<Vec<u8>> {
        let event = TraceEvent::now(stage, method, page.path());

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(stage, method, path = page.path(), error = %e, "request failed");
                self.trace(event.with_error(&e));
                return Err(PrinterError::transport(stage, e));
            }
        };

        tracing::debug!(
            stage,
            method,
            path = page.path(),
            status = response.status,
            bytes = response.body.len(),
            "device responded"
        );
        self.trace(event.with_status(response.status));

        if !response.is_ok() {
            return Err(PrinterError::Status {
                stage,
                status: response.status,
            });
        }

        Ok(response.body)
    }
}
