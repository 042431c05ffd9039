use std::fmt;

use serde::Serialize;

/// Identifier the printer assigns to an installed certificate.
///
/// Opaque to us: the device decides the format. `"0"` is reserved for the
/// factory preset and can never be deleted or activated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CertificateId(String);

pub const PRESET_CERTIFICATE_ID: &str = "0";

impl CertificateId {
    pub fn new(id: impl Into<String>) -> Self {
        CertificateId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_preset(&self) -> bool {
        self.0 == PRESET_CERTIFICATE_ID
    }
}

impl fmt::Display for CertificateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CertificateId {
    fn from(id: &str) -> Self {
        CertificateId(id.to_string())
    }
}

impl From<String> for CertificateId {
    fn from(id: String) -> Self {
        CertificateId(id)
    }
}

/// Full snapshot of the certificate IDs the device reports, in page order.
///
/// Snapshots are taken on demand and thrown away after comparison; nothing
/// keeps one resident between workflows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CertificateIdSet {
    ids: Vec<CertificateId>,
}

impl CertificateIdSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an ID unless it is already present. Returns whether it was added.
    pub fn insert(&mut self, id: CertificateId) -> bool {
        if self.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    pub fn contains(&self, id: &CertificateId) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CertificateId> {
        self.ids.iter()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl FromIterator<CertificateId> for CertificateIdSet {
    fn from_iter<I: IntoIterator<Item = CertificateId>>(iter: I) -> Self {
        let mut set = CertificateIdSet::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

impl<'a> FromIterator<&'a str> for CertificateIdSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter().map(CertificateId::from).collect()
    }
}

impl fmt::Display for CertificateIdSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.ids.iter().map(|id| id.as_str()).collect();
        write!(f, "{{{}}}", joined.join(", "))
    }
}
