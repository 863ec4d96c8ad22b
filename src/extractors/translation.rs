// src/extractors/translation.rs
//
// Extraction of bilingual translation pages. A page holds one or more
// words; each word is an entry block ("ZoneEntree") followed by a text
// zone holding its items. Words with subheader boundary markers in the
// text zone ("big" words) get one subheader per marker; the rest get a
// single untitled subheader wrapping every item.

use std::fmt;

use scraper::Html;
use tracing::debug;

use crate::client;
use crate::extractors::classify::{classify, is_role, Role};
use crate::extractors::dom::{self, DomNode};
use crate::extractors::page;
use crate::models::{Item, Meaning, Phrase, Subheader, TranslationPage, Word, WordHeader};
use crate::utils::error::{Error, ScrapeError};

/// A language supported by the bilingual dictionaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lang {
    French,
    English,
}

impl Lang {
    /// The language's name as it appears in dictionary URLs.
    pub fn as_str(self) -> &'static str {
        match self {
            Lang::French => "francais",
            Lang::English => "anglais",
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Looks up a word in the `from`->`to` bilingual dictionary and extracts
/// its page. Spaces in the word become hyphens in the URL.
///
/// A nonexistent word yields [`ScrapeError::WordNotFound`] carrying the
/// search suggestions the page offered, if any.
pub async fn lookup(word: &str, from: Lang, to: Lang) -> Result<TranslationPage, Error> {
    check_lookup_args(word, from, to)?;
    let slug = word.replace(' ', "-");
    let url = format!("https://www.larousse.fr/dictionnaires/{}-{}/{}", from, to, slug);
    from_file_or_url(&url).await
}

fn check_lookup_args(word: &str, from: Lang, to: Lang) -> Result<(), ScrapeError> {
    if word.is_empty() {
        return Err(ScrapeError::BadArgs("empty word".into()));
    }
    if from == to {
        return Err(ScrapeError::BadArgs(format!(
            "same source and target language: {}",
            from
        )));
    }
    Ok(())
}

/// Extracts a translation page given either a local HTML file path or a
/// dictionary URL.
pub async fn from_file_or_url(input: &str) -> Result<TranslationPage, Error> {
    if !client::is_file(input) {
        client::validate_translation_url(input)?;
    }
    let doc = client::fetch_document(input).await?;
    Ok(from_document(&doc)?)
}

/// Extracts a translation page from an already-parsed document.
pub fn from_document(doc: &Html) -> Result<TranslationPage, ScrapeError> {
    if page::is_word_not_found(doc) {
        return Err(ScrapeError::WordNotFound {
            suggestions: page::search_suggestions(doc),
        });
    }

    let res = TranslationPage {
        page_id: page::page_id(doc)?,
        words: scrape_words(doc)?,
        see_also: page::similar_words(doc)?,
    };
    debug!(page_id = res.page_id, words = res.words.len(), "extracted translation page");
    Ok(res)
}

/// Collects every word on the page: words with subheader markers first,
/// then the rest, each group in document order.
fn scrape_words(doc: &Html) -> Result<Vec<Word>, ScrapeError> {
    let mut words = Vec::new();
    let mut plain = Vec::new();
    let mut big_index = 0;
    let mut plain_index = 0;

    for entry in dom::find_all(dom::root(doc), is_role(Role::EntryZone)) {
        let zone = entry.next_sibling().ok_or_else(|| {
            ScrapeError::structural("scrape_words", dom::describe(entry), "Missing text zone after entry")
        })?;
        if has_subheader_markers(zone) {
            words.push(Word {
                code: word_code(big_index, doc, entry)?,
                header: parse_entry_header(entry)?,
                subheaders: scrape_subheaders(zone),
            });
            big_index += 1;
        } else {
            let item_nodes = item_nodes_of(zone);
            plain.push(Word {
                code: word_code(plain_index, doc, entry)?,
                header: parse_entry_header(entry)?,
                subheaders: vec![Subheader {
                    title: String::new(),
                    items: item_nodes.into_iter().map(scrape_item).collect(),
                }],
            });
            plain_index += 1;
        }
    }
    words.extend(plain);
    Ok(words)
}

fn has_subheader_markers(node: DomNode<'_>) -> bool {
    dom::find_first(node, is_role(Role::SubheaderBlockLead)).is_some()
}

/// Subheaders of a word with boundary markers: the lead marker first,
/// then the remaining markers in document order. A marker without a
/// title node yields an untitled subheader.
fn scrape_subheaders(zone: DomNode<'_>) -> Vec<Subheader> {
    let mut blocks = dom::find_all(zone, is_role(Role::SubheaderBlockLead));
    blocks.extend(dom::find_all(zone, is_role(Role::SubheaderBlock)));
    blocks
        .into_iter()
        .map(|block| Subheader {
            title: dom::find_first(block, is_role(Role::SubheaderTitle))
                .map(dom::text)
                .unwrap_or_default(),
            items: item_nodes_of(block).into_iter().map(scrape_item).collect(),
        })
        .collect()
}

/// The item nodes under a zone or subheader block. A block without
/// explicit item nodes is itself a single item.
fn item_nodes_of(node: DomNode<'_>) -> Vec<DomNode<'_>> {
    let nodes = dom::find_all(node, is_role(Role::ItemBlock));
    if nodes.is_empty() {
        vec![node]
    } else {
        nodes
    }
}

fn scrape_item(node: DomNode<'_>) -> Item {
    Item {
        meanings: scrape_meanings(node),
        phrases: scrape_phrases(node),
    }
}

/// Resolves the code of the word whose entry block is `index`-th within
/// its group. The first word's code is the page ID; later words carry
/// their code in a sibling or parent attribute, and fall back to the
/// page ID when it is missing or malformed.
fn word_code(index: usize, doc: &Html, entry: DomNode<'_>) -> Result<i32, ScrapeError> {
    if index == 0 {
        return page::page_id(doc);
    }
    match code_from_entry(entry) {
        Ok(code) => Ok(code),
        Err(_) => word_code(index - 1, doc, entry),
    }
}

/// Reads a word's code from the `id` attribute of the node before its
/// entry block, or from the `link` attribute of the parent when the
/// entry block opens its container.
fn code_from_entry(entry: DomNode<'_>) -> Result<i32, ScrapeError> {
    let raw = match entry.prev_sibling() {
        Some(prev) => dom::attr(prev, "id")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                ScrapeError::structural("code_from_entry", dom::describe(prev), "Missing id attribute")
            })?
            .to_string(),
        None => {
            let parent = entry.parent().ok_or_else(|| {
                ScrapeError::structural("code_from_entry", dom::describe(entry), "No prior sibling or parent")
            })?;
            let link = dom::attr(parent, "link").filter(|s| !s.is_empty()).ok_or_else(|| {
                ScrapeError::structural("code_from_entry", dom::describe(parent), "Missing link attribute")
            })?;
            // The code starts after a one-byte marker character; anything
            // else in the first position makes the attribute unreadable.
            link.get(1..)
                .ok_or_else(|| {
                    ScrapeError::structural(
                        "code_from_entry",
                        dom::describe(parent),
                        "Malformed link attribute",
                    )
                })?
                .to_string()
        }
    };
    raw.parse::<i32>()
        .map_err(|e| ScrapeError::structural("code_from_entry", raw, e.to_string()))
}

/// Extracts a word header from its entry block. Only the word text is
/// required; the rest extracts as empty when absent.
fn parse_entry_header(entry: DomNode<'_>) -> Result<WordHeader, ScrapeError> {
    let address = dom::find_first(entry, is_role(Role::Address)).ok_or_else(|| {
        ScrapeError::structural("parse_entry_header", dom::describe(entry), "Missing address node")
    })?;

    let text_alt = dom::find_first(entry, is_role(Role::AddressAlt))
        .map(|n| {
            let s = dom::text(n);
            match s.strip_prefix("( ") {
                Some(rest) => format!("({}", rest),
                None => s,
            }
        })
        .unwrap_or_default();

    let phonetic = dom::find_all(entry, is_role(Role::Phonetic))
        .into_iter()
        .map(dom::text)
        .collect::<String>();

    let audio = dom::find_first(entry, is_role(Role::EntryAudio))
        .map(page::audio_link)
        .unwrap_or_default();

    let gram_type = dom::find_first(entry, is_role(Role::GrammarZone))
        .or_else(|| dom::find_first(entry, is_role(Role::GrammarCategory)))
        .map(|n| clean_gram_type(&dom::text(n)))
        .unwrap_or_default();

    Ok(WordHeader {
        text: dom::text(address),
        text_alt,
        phonetic,
        audio,
        gram_type,
    })
}

/// The grammar zone text carries an inline conjugation-table link; its
/// label is removed and the spacing repaired.
fn clean_gram_type(raw: &str) -> String {
    raw.replace("Conjugaison", "").replace("  ", " ").trim_matches(' ').to_string()
}

/// Extracts the meanings of one item: the first meaning is assembled
/// from the run of meaning-carrying nodes at the start of the item, and
/// each nested semantic division contributes its own first meaning.
fn scrape_meanings(item: DomNode<'_>) -> Vec<Meaning> {
    let mut node = match item.first_child() {
        Some(n) => n,
        None => return Vec::new(),
    };
    if dom::is_whitespace_text(node) {
        node = match node.next_sibling() {
            Some(n) => n,
            None => return Vec::new(),
        };
    }

    let mut first = Meaning::default();
    let mut cursor = Some(node);
    while let Some(n) = cursor {
        if !still_on_first_meaning(n) {
            break;
        }
        update_meaning(&mut first, n);
        cursor = n.next_sibling();
    }

    let mut out = vec![first];
    for division in dom::find_all(item, is_role(Role::SemanticDivision)) {
        if division.id() == item.id() {
            continue;
        }
        let mut nested = scrape_meanings(division);
        if !nested.is_empty() {
            out.push(nested.remove(0));
        }
    }

    if out.len() == 1 && out[0].is_empty() {
        return Vec::new();
    }
    out
}

/// True while the walk from an item's first child is still inside the
/// nodes that make up its first meaning.
fn still_on_first_meaning(node: DomNode<'_>) -> bool {
    if dom::tag(node) == Some("audio") || dom::is_whitespace_text(node) {
        return true;
    }
    // A cross-reference arrow rendered as a bare text node.
    if dom::text_payload(node).map_or(false, |s| s.contains('→')) {
        return true;
    }
    matches!(
        classify(node),
        Some(
            Role::ContextNarrow
                | Role::TargetAudio
                | Role::Translation
                | Role::ContextDomain
                | Role::ContextMeta
                | Role::SubheaderTitle
                | Role::CrossReference
                | Role::Gloss
        )
    )
}

fn update_meaning(meaning: &mut Meaning, node: DomNode<'_>) {
    match classify(node) {
        Some(Role::CrossReference | Role::Gloss) => meaning.text = dom::text(node),
        Some(Role::Translation) => {
            if !meaning.text.is_empty() {
                meaning.text.push(' ');
            }
            meaning.text.push_str(&translation_text(node));
        }
        Some(Role::ContextNarrow) => meaning.context_narrow = dom::text(node),
        Some(Role::ContextDomain) => meaning.context_domain = dom::text(node).to_uppercase(),
        Some(Role::ContextMeta) => meaning.context_meta = dom::text(node),
        _ => {}
    }
}

/// Flattens a translation node into text: gender markers and commas get
/// a space, "or" markers render as " ou ", conjugation links and nested
/// meta text are dropped, and parenthesized additions get a space.
fn translation_text(node: DomNode<'_>) -> String {
    let mut out = String::new();
    let mut child = node.first_child();
    while let Some(n) = child {
        let text = dom::text(n);
        let role = classify(n);
        if role == Some(Role::Gender) || out.ends_with(',') {
            out.push(' ');
        }
        if role == Some(Role::OrMarker) {
            out.push_str(" ou ");
        } else if !matches!(role, Some(Role::ConjugationLink | Role::PhraseMeta)) {
            if text.starts_with('(') {
                out.push(' ');
            }
            out.push_str(&text);
        }
        child = n.next_sibling();
    }
    out
}

/// Extracts the phrases of one item: the ordinary phrase zones in
/// document order, then the expression-box phrases with their flag set.
fn scrape_phrases(item: DomNode<'_>) -> Vec<Phrase> {
    let mut zones = dom::find_all(item, is_role(Role::PhraseZoneLead));
    zones.extend(dom::find_all(item, is_role(Role::PhraseZone)));

    let mut out: Vec<Phrase> = zones.into_iter().map(phrase_from_zone).collect();
    out.extend(scrape_expressions(item));
    out
}

/// Phrases rendered in the blue EXPR box: the box itself is one phrase,
/// and each extra zone inside it another.
fn scrape_expressions(item: DomNode<'_>) -> Vec<Phrase> {
    let bloc = match dom::find_first(item, is_role(Role::ExpressionBlock)) {
        Some(n) => n,
        None => return Vec::new(),
    };

    let mut first = phrase_from_zone(bloc);
    first.set_expression(true);
    let mut out = vec![first];

    for zone in dom::find_all(item, is_role(Role::PhraseZoneExtra)) {
        let mut phrase = phrase_from_zone(zone);
        phrase.set_expression(true);
        out.push(phrase);
    }
    out
}

/// Builds a phrase from a phrase zone by walking its direct children.
/// A subphrase list child contributes one subphrase per `<li>`.
fn phrase_from_zone(zone: DomNode<'_>) -> Phrase {
    let mut phrase = Phrase::default();
    let mut child = zone.first_child();
    while let Some(n) = child {
        update_phrase(&mut phrase, n);
        if classify(n) == Some(Role::SubphraseList) {
            for li in dom::find_all(n, |m| dom::tag(m) == Some("li")) {
                phrase.subphrases.push(phrase_from_zone(li));
            }
        }
        child = n.next_sibling();
    }
    phrase
}

fn update_phrase(phrase: &mut Phrase, node: DomNode<'_>) {
    match classify(node) {
        Some(Role::PhraseText) => {
            phrase.text_source = dom::text(node);
            // The source audio link is sometimes buried inside the
            // phrase text node instead of following it.
            if let Some(inner) = dom::find_first(node, is_role(Role::SourceAudio)) {
                phrase.audio_source = page::audio_link(inner);
            }
        }
        Some(Role::Gloss | Role::PhraseTranslation | Role::CrossReference | Role::PhraseMeta) => {
            if !phrase.text_target.is_empty() {
                phrase.text_target.push(' ');
            }
            phrase.text_target.push_str(&translation_text(node));
        }
        Some(Role::SourceAudio) => phrase.audio_source = page::audio_link(node),
        Some(Role::TargetAudio) => phrase.audio_target = page::audio_link(node),
        Some(Role::ContextNarrow) => phrase.context_narrow = dom::text(node),
        Some(Role::ContextDomain) => phrase.context_domain = dom::text(node).to_uppercase(),
        Some(Role::ContextMeta) => phrase.context_meta = dom::text(node),
        _ => {}
    }
}
