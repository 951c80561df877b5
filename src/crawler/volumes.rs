//! Volume-index discovery
//!
//! Journal sites list their volumes on an index page; each volume page is a
//! crawlable listing. This module scans an index page for anchors whose href
//! carries the configured marker and exports the matches as a CSV an
//! operator can feed back into crawl runs.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use std::path::Path;
use url::Url;

static NON_WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w]+").expect("valid regex"));

/// One discovered volume page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeLink {
    /// Absolute URL of the volume listing page
    pub url: String,

    /// Slug label derived from the volume query parameter
    pub label: String,
}

/// Scans the page for volume links, in document order
pub fn extract_volume_links(document: &Html, base_url: &Url, marker: &str) -> Vec<VolumeLink> {
    let anchor = Selector::parse("a[href]").expect("static selector is valid");
    let mut links = Vec::new();

    for a in document.select(&anchor) {
        let Some(href) = a.value().attr("href") else {
            continue;
        };
        if !href.contains(marker) {
            continue;
        }

        let absolute = match base_url.join(href) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Skipping unresolvable volume link '{}': {}", href, e);
                continue;
            }
        };

        let param = href.split('=').nth(1).unwrap_or("");
        links.push(VolumeLink {
            url: absolute.to_string(),
            label: format!("volume{}", sanitize_label(param)),
        });
    }

    links
}

/// Slugs a volume query parameter: non-word runs become single dashes
fn sanitize_label(param: &str) -> String {
    NON_WORD_RE
        .replace_all(param, "-")
        .trim_matches('-')
        .to_ascii_lowercase()
}

/// Writes discovered volume links as a two-column CSV
pub fn write_volume_csv(links: &[VolumeLink], path: &Path) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["url", "volume-issue"])?;
    for link in links {
        writer.write_record([&link.url, &link.label])?;
    }
    writer.flush()?;
    Ok(())
}
