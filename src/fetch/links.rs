use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

static ANCHOR_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("anchor selector"));

/// Detail pages carry a numeric content id as a path segment.
static DETAIL_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"/(\d{4,})/").expect("detail id pattern"));

/// Collect up to `max` detail-page URLs from a listing page.
///
/// Anchors are resolved against `base`; a link qualifies when it stays on
/// the listing's host and its path contains a 4+ digit segment. First-seen
/// order is kept and exact duplicates are dropped. Fewer than `max`
/// qualifying links is not an error.
pub fn discover_detail_links(html: &str, base: &Url, max: usize) -> Vec<Url> {
    let doc = Html::parse_document(html);

    let mut seen = HashSet::new();
    let mut links = Vec::new();
    for anchor in doc.select(&ANCHOR_SEL) {
        if links.len() >= max {
            break;
        }
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Ok(url) = base.join(href) else {
            continue;
        };
        if url.host_str() != base.host_str() || !DETAIL_ID.is_match(url.path()) {
            continue;
        }
        if seen.insert(url.to_string()) {
            links.push(url);
        }
    }
    links
}

/// Return the URL with `kishu=all` set, replacing any existing `kishu`
/// value, so the detail page shows every machine type at once.
pub fn force_all_machine_types(url: &Url) -> Url {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != "kishu")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut out = url.clone();
    {
        let mut qp = out.query_pairs_mut();
        qp.clear();
        for (k, v) in &kept {
            qp.append_pair(k, v);
        }
        qp.append_pair("kishu", "all");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://min-repo.com/tag/some-hall/").unwrap()
    }

    const LISTING: &str = r#"
        <a href="https://min-repo.com/123456/">result A</a>
        <a href="/234567/">result B</a>
        <a href="https://min-repo.com/123456/">result A again</a>
        <a href="https://other-site.example/345678/">elsewhere</a>
        <a href="https://min-repo.com/about/">no id</a>
        <a href="https://min-repo.com/456789/">result C</a>
    "#;

    #[test]
    fn keeps_host_and_numeric_id_links_in_order() {
        let links = discover_detail_links(LISTING, &base(), 10);
        let got: Vec<String> = links.iter().map(|u| u.to_string()).collect();
        assert_eq!(
            got,
            vec![
                "https://min-repo.com/123456/",
                "https://min-repo.com/234567/",
                "https://min-repo.com/456789/",
            ]
        );
    }

    #[test]
    fn truncates_to_max() {
        let links = discover_detail_links(LISTING, &base(), 2);
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].as_str(), "https://min-repo.com/123456/");
    }

    #[test]
    fn short_numeric_segments_do_not_match() {
        let html = r#"<a href="https://min-repo.com/123/">short</a>"#;
        assert!(discover_detail_links(html, &base(), 10).is_empty());
    }

    #[test]
    fn kishu_param_is_added() {
        let url = Url::parse("https://min-repo.com/123456/").unwrap();
        let got = force_all_machine_types(&url);
        assert_eq!(got.as_str(), "https://min-repo.com/123456/?kishu=all");
    }

    #[test]
    fn existing_kishu_param_is_replaced() {
        let url = Url::parse("https://min-repo.com/123456/?kishu=juggler&p=2").unwrap();
        let got = force_all_machine_types(&url);
        assert_eq!(got.as_str(), "https://min-repo.com/123456/?p=2&kishu=all");
    }
}
