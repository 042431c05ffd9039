use serde::Serialize;

use crate::page::page_model::{CSRF_TOKEN_FIELD, CsrfToken, PAGE_ID_FIELD};

/// `application/x-www-form-urlencoded` body, in insertion order.
///
/// Setting a name that is already present replaces its value in place, so the
/// wire order stays the order in which names were first set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormBody {
    fields: Vec<(String, String)>,
}

impl FormBody {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a body with the page id and the token from the previous fetch.
    pub fn for_page(page_id: &str, token: &CsrfToken) -> Self {
        let mut body = FormBody::new();
        body.set(PAGE_ID_FIELD, page_id);
        body.set(CSRF_TOKEN_FIELD, token.as_str());
        body
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(existing) => existing.1 = value,
            None => self.fields.push((name, value)),
        }
        self
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }
}

/// One part of a `multipart/form-data` submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MultipartPart {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        bytes: Vec<u8>,
    },
}

impl MultipartPart {
    pub fn name(&self) -> &str {
        match self {
            MultipartPart::Text { name, .. } | MultipartPart::File { name, .. } => name,
        }
    }
}

/// `multipart/form-data` body, parts kept in the order they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartBody {
    parts: Vec<MultipartPart>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_page(page_id: &str, token: &CsrfToken) -> Self {
        let mut body = MultipartBody::new();
        body.text(PAGE_ID_FIELD, page_id);
        body.text(CSRF_TOKEN_FIELD, token.as_str());
        body
    }

    pub fn text(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.parts.push(MultipartPart::Text {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn file(
        &mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        bytes: Vec<u8>,
    ) -> &mut Self {
        self.parts.push(MultipartPart::File {
            name: name.into(),
            file_name: file_name.into(),
            bytes,
        });
        self
    }

    pub fn into_parts(self) -> Vec<MultipartPart> {
        self.parts
    }
}
