// src/extractors/page.rs
//
// Page-level sections shared by both dictionary families: the canonical
// page ID, the similar-word carousel, "word not found" detection with its
// search suggestions, and audio-URL reconstruction.

use once_cell::sync::Lazy;
use percent_encoding::percent_decode_str;
use regex::Regex;
use scraper::Html;

use crate::extractors::classify::{is_role, Role};
use crate::extractors::dom::{self, DomNode};
use crate::utils::error::ScrapeError;

/// Final `/`-delimited path segment of a dictionary URL, which is the
/// base-10 page ID.
static TRAILING_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/(\d+)$").expect("Failed to compile TRAILING_ID_RE"));

/// Returns the page's ID, read from the canonical `<link>` node.
pub fn page_id(doc: &Html) -> Result<i32, ScrapeError> {
    let node = dom::find_first(dom::root(doc), is_canonical_link)
        .ok_or_else(|| ScrapeError::structural("page_id", "", "Failed to find canonical link node"))?;
    let href = dom::attr(node, "href").unwrap_or("");
    page_id_from_url(href)
}

/// Extracts the page ID from the end of a dictionary URL, e.g.
/// `larousse.fr/dictionnaires/francais-anglais/court/19844` -> 19844.
/// A malformed trailing segment is a hard failure.
pub fn page_id_from_url(url: &str) -> Result<i32, ScrapeError> {
    let captures = TRAILING_ID_RE.captures(url).ok_or_else(|| {
        ScrapeError::structural("page_id_from_url", url, "No numeric trailing path segment")
    })?;
    captures[1]
        .parse::<i32>()
        .map_err(|e| ScrapeError::structural("page_id_from_url", url, e.to_string()))
}

/// Calls [`page_id_from_url`] on each URL in the slice.
pub fn page_ids_from_urls(urls: &[String]) -> Result<Vec<i32>, ScrapeError> {
    urls.iter().map(|u| page_id_from_url(u)).collect()
}

/// Returns true if this is a "word not found" page.
pub fn is_word_not_found(doc: &Html) -> bool {
    dom::find_first(dom::root(doc), is_role(Role::Corrector)).is_some()
}

/// Returns the search suggestions offered on a "word not found" page, or
/// an empty list when the page offers none.
pub fn search_suggestions(doc: &Html) -> Vec<String> {
    let mut out = Vec::new();
    if !is_word_not_found(doc) || !has_suggestions(doc) {
        return out;
    }
    let corrector = match dom::find_first(dom::root(doc), is_role(Role::Corrector)) {
        Some(n) => n,
        None => return out,
    };
    for li in dom::find_all(corrector, |n| dom::tag(n) == Some("li")) {
        let anchor = match dom::find_first(li, |n| dom::tag(n) == Some("a")) {
            Some(a) => a,
            None => continue,
        };
        if let Some(href) = dom::attr(anchor, "href") {
            out.push(format!("https://larousse.fr{}", href));
        }
    }
    out
}

/// Returns the URLs in the similar-word carousel near the bottom of a
/// page. The first carousel entry is the page's own word and is skipped.
pub fn similar_words(doc: &Html) -> Result<Vec<String>, ScrapeError> {
    let nodes = dom::find_all(dom::root(doc), is_role(Role::SimilarWord));
    if nodes.len() <= 1 {
        return Ok(Vec::new());
    }
    let mut out = Vec::new();
    for node in nodes.into_iter().skip(1) {
        let anchor = match node.first_child() {
            Some(a) => a,
            None => continue,
        };
        let href = dom::attr(anchor, "href").unwrap_or("");
        if href.is_empty() {
            continue;
        }
        let decoded = percent_decode_str(href)
            .decode_utf8()
            .map_err(|e| ScrapeError::structural("similar_words", href, e.to_string()))?;
        out.push(format!("https://larousse.fr{}", decoded));
    }
    Ok(out)
}

/// Rebuilds the audio URL from a pronunciation source attribute of the
/// shape `…/dictionnaires-prononciation/{lang}/…/{file}`. Unrecognized or
/// empty sources yield an empty string.
pub fn audio_url(src: &str) -> String {
    const MARKER: &str = "dictionnaires-prononciation/";
    let rest = match src.find(MARKER) {
        Some(i) => &src[i + MARKER.len()..],
        None => return String::new(),
    };
    let (lang, tail) = match rest.split_once('/') {
        Some(parts) => parts,
        None => return String::new(),
    };
    let filename = tail.rsplit('/').next().unwrap_or(tail);
    if lang.is_empty() || filename.is_empty() {
        return String::new();
    }
    format!("https://voix.larousse.fr/{}/{}.mp3", lang, filename)
}

/// Reads the audio URL from an `<audio>` node's `src` attribute.
pub fn audio_url_of(node: DomNode<'_>) -> String {
    audio_url(dom::attr(node, "src").unwrap_or(""))
}

/// Resolves the audio URL for an audio-link span (`lienson` and friends):
/// the `<audio>` element is the following sibling, sometimes separated by
/// one text node.
pub fn audio_link(node: DomNode<'_>) -> String {
    let mut next = match node.next_sibling() {
        Some(n) => n,
        None => return String::new(),
    };
    if next.value().is_text() {
        next = match next.next_sibling() {
            Some(n) => n,
            None => return String::new(),
        };
    } else if dom::tag(next) != Some("audio") {
        return String::new();
    }
    audio_url_of(next)
}

fn is_canonical_link(node: DomNode<'_>) -> bool {
    dom::tag(node) == Some("link") && dom::attr(node, "rel") == Some("canonical")
}

fn has_suggestions(doc: &Html) -> bool {
    dom::find_first(dom::root(doc), is_role(Role::NoSuggestions)).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::classify::NO_SUGGESTIONS_BANNER;

    #[test]
    fn page_id_comes_from_the_canonical_link() {
        let doc = Html::parse_document(
            r#"<html><head><link rel="canonical" href="https://www.larousse.fr/dictionnaires/francais/vert/81676"></head><body></body></html>"#,
        );
        assert_eq!(page_id(&doc).unwrap(), 81676);
    }

    #[test]
    fn missing_canonical_link_is_a_structural_failure() {
        let doc = Html::parse_document("<html><body></body></html>");
        assert!(matches!(
            page_id(&doc),
            Err(ScrapeError::StructuralFailure { function: "page_id", .. })
        ));
    }

    #[test]
    fn malformed_trailing_segment_is_a_hard_failure() {
        assert!(page_id_from_url("https://larousse.fr/dictionnaires/francais/vert").is_err());
        assert_eq!(page_id_from_url("x/123").unwrap(), 123);
    }

    #[test]
    fn audio_url_is_rebuilt_from_the_pronunciation_path() {
        assert_eq!(
            audio_url("/dictionnaires-prononciation/fra/tts/64636fra2"),
            "https://voix.larousse.fr/fra/64636fra2.mp3"
        );
        assert_eq!(
            audio_url("/dictionnaires-prononciation/francais/tts/sub/abc"),
            "https://voix.larousse.fr/francais/abc.mp3"
        );
        assert_eq!(audio_url(""), "");
        assert_eq!(audio_url("/something/else"), "");
        assert_eq!(audio_url("/dictionnaires-prononciation/fra"), "");
    }

    #[test]
    fn similar_words_skips_the_first_entry_and_unescapes() {
        let doc = Html::parse_document(
            r#"<body><ul>
            <li class="item-word"><a href="/dictionnaires/francais/vert/81676">vert</a></li>
            <li class="item-word"><a href="/dictionnaires/francais/verdure/81350">verdure</a></li>
            <li class="item-word"><a href="/dictionnaires/francais/vert%2Dde%2Dgris/81680">vert-de-gris</a></li>
            </ul></body>"#,
        );
        let words = similar_words(&doc).unwrap();
        assert_eq!(
            words,
            vec![
                "https://larousse.fr/dictionnaires/francais/verdure/81350",
                "https://larousse.fr/dictionnaires/francais/vert-de-gris/81680",
            ]
        );
    }

    #[test]
    fn a_single_carousel_entry_yields_nothing() {
        let doc = Html::parse_document(
            r#"<body><li class="item-word"><a href="/dictionnaires/francais/vert/81676">vert</a></li></body>"#,
        );
        assert!(similar_words(&doc).unwrap().is_empty());
    }

    #[test]
    fn suggestions_come_from_the_corrector_block() {
        let doc = Html::parse_document(
            r#"<body><div class="corrector"><ul>
            <li><a href="/dictionnaires/francais/vert/81676">vert</a></li>
            <li><a href="/dictionnaires/francais/verre/81672">verre</a></li>
            </ul></div></body>"#,
        );
        assert!(is_word_not_found(&doc));
        assert_eq!(
            search_suggestions(&doc),
            vec![
                "https://larousse.fr/dictionnaires/francais/vert/81676",
                "https://larousse.fr/dictionnaires/francais/verre/81672",
            ]
        );
    }

    #[test]
    fn no_suggestions_banner_suppresses_the_list() {
        let doc = Html::parse_document(&format!(
            r#"<body><div class="corrector"><p class="err">{}</p>
            <li><a href="/x/1">x</a></li></div></body>"#,
            NO_SUGGESTIONS_BANNER
        ));
        assert!(is_word_not_found(&doc));
        assert!(search_suggestions(&doc).is_empty());
    }

    #[test]
    fn regular_pages_are_not_word_not_found() {
        let doc = Html::parse_document("<body><p>ordinary</p></body>");
        assert!(!is_word_not_found(&doc));
        assert!(search_suggestions(&doc).is_empty());
    }
}
