use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::multipart::{Form, Part};
use thiserror::Error;

use crate::printer::form::{FormBody, MultipartBody, MultipartPart};

pub const USER_AGENT: &str = concat!("printer-certs/", env!("CARGO_PKG_VERSION"));

/// Status and body of one response. The body is read in full so the
/// connection can be reused for the next step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl PageResponse {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        PageResponse {
            status: 200,
            body: body.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}

/// Blocking request/response exchange with the device.
///
/// Implementations do not interpret status codes; that is left to the caller.
pub trait Transport {
    fn get(&self, url: &Url) -> Result<PageResponse, TransportError>;

    fn post_form(&self, url: &Url, form: &FormBody) -> Result<PageResponse, TransportError>;

    fn post_multipart(&self, url: &Url, form: MultipartBody)
    -> Result<PageResponse, TransportError>;
}

// ============================================================================
// reqwest-backed transport
// ============================================================================

#[derive(Debug, Clone)]
pub struct TransportSettings {
    pub timeout: Duration,
    /// Printers ship with self-signed certificates, so this is usually on.
    pub accept_invalid_certs: bool,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            accept_invalid_certs: true,
        }
    }
}

pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(settings: &TransportSettings) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(settings.timeout)
            .user_agent(USER_AGENT)
            .danger_accept_invalid_certs(settings.accept_invalid_certs)
            .build()?;
        Ok(HttpTransport { client })
    }

    fn read(response: reqwest::blocking::Response) -> Result<PageResponse, TransportError> {
        let status = response.status().as_u16();
        let body = response.bytes()?.to_vec();
        Ok(PageResponse { status, body })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &Url) -> Result<PageResponse, TransportError> {
        let response = self.client.get(url.clone()).send()?;
        Self::read(response)
    }

    fn post_form(&self, url: &Url, form: &FormBody) -> Result<PageResponse, TransportError> {
        let response = self.client.post(url.clone()).form(form.fields()).send()?;
        Self::read(response)
    }

    fn post_multipart(
        &self,
        url: &Url,
        form: MultipartBody,
    ) -> Result<PageResponse, TransportError> {
        let mut multipart = Form::new();
        for part in form.into_parts() {
            multipart = match part {
                MultipartPart::Text { name, value } => multipart.text(name, value),
                MultipartPart::File {
                    name,
                    file_name,
                    bytes,
                } => {
                    let part = Part::bytes(bytes)
                        .file_name(file_name)
                        .mime_str("application/octet-stream")?;
                    multipart.part(name, part)
                }
            };
        }

        let response = self.client.post(url.clone()).multipart(multipart).send()?;
        Self::read(response)
    }
}
