//! HTTPS client shared by the completion transport and the history store.

use std::sync::Arc;

use hyper::client::HttpConnector;
use hyper::{Body, Client};
use hyper_rustls::HttpsConnector;
use rustls::{ClientConfig, OwnedTrustAnchor, RootCertStore};
use webpki_roots::TLS_SERVER_ROOTS;

/// Hyper client speaking HTTPS with the bundled web PKI roots.
///
/// Plain `http://` endpoints are also accepted, which local stores and test
/// servers rely on.
pub type HttpsClient = Client<HttpsConnector<HttpConnector>, Body>;

/// Builds a client trusting the Mozilla root set.
#[must_use]
pub fn build_https_client() -> HttpsClient {
    let mut roots = RootCertStore::empty();
    roots.add_trust_anchors(TLS_SERVER_ROOTS.iter().map(|anchor| {
        OwnedTrustAnchor::from_subject_spki_name_constraints(
            anchor.subject,
            anchor.spki,
            anchor.name_constraints,
        )
    }));

    let config = ClientConfig::builder()
        .with_safe_defaults()
        .with_root_certificates(roots)
        .with_no_client_auth();

    let mut http = HttpConnector::new();
    http.enforce_http(false);

    let connector = HttpsConnector::from((http, Arc::new(config)));

    Client::builder().build::<_, Body>(connector)
}

/// Normalises a base URL so that paths can be appended directly.
///
/// Returns `None` when the URL lacks an `http(s)://` scheme or does not parse.
#[must_use]
pub fn normalize_base_url(input: &str) -> Option<String> {
    let mut base = input.trim().to_owned();
    if !(base.starts_with("http://") || base.starts_with("https://")) {
        return None;
    }
    if !base.ends_with('/') {
        base.push('/');
    }
    base.parse::<hyper::Uri>().ok()?;
    Some(base)
}
