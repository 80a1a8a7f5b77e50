//! Title derivation for auto-citations.

use url::Url;

const PUBMED_HOST: &str = "pubmed.ncbi.nlm.nih.gov";

/// Derive a display title for a source link.
///
/// PubMed article links become `PubMed: <id>`; anything else uses the host
/// without a leading `www.`. Links that do not parse fall back to the raw
/// text.
pub fn citation_title(link: &str) -> String {
    let link = link.trim();
    let Ok(url) = Url::parse(link) else {
        return link.to_string();
    };
    let Some(host) = url.host_str() else {
        return link.to_string();
    };

    if host.contains(PUBMED_HOST) {
        if let Some(id) = trailing_numeric_segment(&url) {
            return format!("PubMed: {id}");
        }
    }

    host.strip_prefix("www.").unwrap_or(host).to_string()
}

fn trailing_numeric_segment(url: &Url) -> Option<&str> {
    url.path_segments()?
        .filter(|segment| !segment.is_empty())
        .last()
        .filter(|segment| segment.bytes().all(|b| b.is_ascii_digit()))
}
