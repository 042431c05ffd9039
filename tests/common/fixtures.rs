use std::path::PathBuf;

use reqwest::Url;

pub const FIXTURE_TOKEN: &str = "FIXTURE-TOKEN";

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name))
        .unwrap_or_else(|e| panic!("missing fixture {}: {}", name, e))
}

pub fn fixture_bytes(name: &str) -> Vec<u8> {
    fixture(name).into_bytes()
}

/// A certificate list page with one row (view + delete link) per ID.
///
/// IDs are percent-encoded into the links the way the device writes them.
pub fn certificate_list_page(ids: &[String]) -> String {
    let mut rows = String::new();
    for id in ids {
        let view = idx_link("view.html", id);
        let delete = idx_link("delete.html", id);
        rows.push_str(&format!(
            "<tr><td>cert {id}</td><td><a href=\"{view}\">View</a> \
             <a href=\"{delete}\">Delete</a></td></tr>\n"
        ));
    }
    format!(
        "<!DOCTYPE html><html><head><title>Certificate</title></head><body>\
         <table class=\"list\">{rows}</table>\
         <a href=\"/net/security/certificate/import.html\">Import</a></body></html>"
    )
}

fn idx_link(page: &str, id: &str) -> String {
    let mut url = Url::parse("https://printer.test/net/security/certificate/")
        .and_then(|base| base.join(page))
        .expect("static fixture url");
    url.query_pairs_mut().append_pair("idx", id);
    format!("{}?{}", url.path(), url.query().unwrap_or_default())
}
