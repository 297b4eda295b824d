//! # Embedded Static Assets
//!
//! Files under `assets/webroot/` are compiled into the binary and served
//! for any path no route claims.

/// A file served verbatim.
struct Asset {
    path: &'static str,
    content_type: &'static str,
    body: &'static str,
}

const ASSETS: &[Asset] = &[
    Asset {
        path: "/style.css",
        content_type: "text/css; charset=utf-8",
        body: include_str!("../../assets/webroot/style.css"),
    },
    Asset {
        path: "/robots.txt",
        content_type: "text/plain; charset=utf-8",
        body: include_str!("../../assets/webroot/robots.txt"),
    },
];

/// Find the asset for a request path, returning its content type and body.
pub fn lookup(path: &str) -> Option<(&'static str, &'static str)> {
    ASSETS
        .iter()
        .find(|asset| asset.path == path)
        .map(|asset| (asset.content_type, asset.body))
}
