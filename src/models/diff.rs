// src/models/diff.rs
//
// Recursive structural comparison of record trees, used to validate
// extracted records against golden fixtures. The first divergence is
// reported as a qualified path plus both values; fields are compared in
// their declared order, and every list length is checked before any
// element-wise comparison proceeds.

use std::fmt;

use crate::extractors::page::page_ids_from_urls;
use crate::models::{
    Citation, Definition, DefinitionHeader, DefinitionPage, Difficulty, Expression, Homonym,
    Item, Meaning, Phrase, Relation, Subheader, TranslationPage, Word, WordHeader,
};

/// The first point of divergence between two record trees.
#[derive(Debug, Clone, PartialEq)]
pub struct Mismatch {
    /// Qualified path, e.g. `words[2].subheaders[0].items[1].phrases[0].text_source`.
    pub path: String,
    pub expected: String,
    pub actual: String,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\nexpected: {}\nactual: {}",
            self.path, self.expected, self.actual
        )
    }
}

/// Deep structural equality with a first-divergence report.
pub trait StructuralEq {
    /// Compares `self` (expected) against `other` (actual) under the given
    /// path prefix. Returns `None` when structurally identical.
    fn structural_diff(&self, other: &Self, path: &str) -> Option<Mismatch>;
}

/// Compares two record trees, returning the first divergence if any.
pub fn diff<T: StructuralEq>(expected: &T, actual: &T) -> Option<Mismatch> {
    expected.structural_diff(actual, "")
}

fn join(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", path, name)
    }
}

fn value_diff<T: PartialEq + fmt::Display>(
    path: &str,
    name: &str,
    expected: &T,
    actual: &T,
) -> Option<Mismatch> {
    if expected != actual {
        return Some(Mismatch {
            path: join(path, name),
            expected: expected.to_string(),
            actual: actual.to_string(),
        });
    }
    None
}

fn len_diff<T>(path: &str, name: &str, expected: &[T], actual: &[T]) -> Option<Mismatch> {
    if expected.len() != actual.len() {
        return Some(Mismatch {
            path: join(path, name),
            expected: format!("len {}", expected.len()),
            actual: format!("len {}", actual.len()),
        });
    }
    None
}

fn list_diff<T: StructuralEq>(
    path: &str,
    name: &str,
    expected: &[T],
    actual: &[T],
) -> Option<Mismatch> {
    for (i, (e, a)) in expected.iter().zip(actual).enumerate() {
        let element_path = format!("{}[{}]", join(path, name), i);
        if let Some(m) = e.structural_diff(a, &element_path) {
            return Some(m);
        }
    }
    None
}

fn string_list_diff(
    path: &str,
    name: &str,
    expected: &[String],
    actual: &[String],
) -> Option<Mismatch> {
    for (i, (e, a)) in expected.iter().zip(actual).enumerate() {
        if e != a {
            return Some(Mismatch {
                path: format!("{}[{}]", join(path, name), i),
                expected: e.clone(),
                actual: a.clone(),
            });
        }
    }
    None
}

/// See-also URLs are compared by their trailing page ID only: upstream
/// rendering can alter the displayed characters of a URL component (a
/// registered-trademark glyph duplicated or dropped between two scrapes)
/// without changing the target page.
fn see_also_diff(path: &str, expected: &[String], actual: &[String]) -> Option<Mismatch> {
    let field = join(path, "see_also");
    let expected_ids = match page_ids_from_urls(expected) {
        Ok(ids) => ids,
        Err(e) => {
            return Some(Mismatch {
                path: field,
                expected: e.to_string(),
                actual: String::new(),
            })
        }
    };
    let actual_ids = match page_ids_from_urls(actual) {
        Ok(ids) => ids,
        Err(e) => {
            return Some(Mismatch {
                path: field,
                expected: String::new(),
                actual: e.to_string(),
            })
        }
    };
    for (i, (e, a)) in expected_ids.iter().zip(&actual_ids).enumerate() {
        if e != a {
            return Some(Mismatch {
                path: format!("{}[{}]", field, i),
                expected: expected[i].clone(),
                actual: actual[i].clone(),
            });
        }
    }
    None
}

impl StructuralEq for DefinitionPage {
    fn structural_diff(&self, other: &Self, path: &str) -> Option<Mismatch> {
        value_diff(path, "page_id", &self.page_id, &other.page_id)
            .or_else(|| self.header.structural_diff(&other.header, &join(path, "header")))
            .or_else(|| len_diff(path, "definitions", &self.definitions, &other.definitions))
            .or_else(|| len_diff(path, "expressions", &self.expressions, &other.expressions))
            .or_else(|| len_diff(path, "relations", &self.relations, &other.relations))
            .or_else(|| len_diff(path, "homonyms", &self.homonyms, &other.homonyms))
            .or_else(|| len_diff(path, "difficulties", &self.difficulties, &other.difficulties))
            .or_else(|| len_diff(path, "citations", &self.citations, &other.citations))
            .or_else(|| len_diff(path, "see_also", &self.see_also, &other.see_also))
            .or_else(|| list_diff(path, "definitions", &self.definitions, &other.definitions))
            .or_else(|| list_diff(path, "expressions", &self.expressions, &other.expressions))
            .or_else(|| list_diff(path, "relations", &self.relations, &other.relations))
            .or_else(|| list_diff(path, "homonyms", &self.homonyms, &other.homonyms))
            .or_else(|| list_diff(path, "difficulties", &self.difficulties, &other.difficulties))
            .or_else(|| list_diff(path, "citations", &self.citations, &other.citations))
            .or_else(|| see_also_diff(path, &self.see_also, &other.see_also))
    }
}

impl StructuralEq for DefinitionHeader {
    fn structural_diff(&self, other: &Self, path: &str) -> Option<Mismatch> {
        value_diff(path, "text", &self.text, &other.text)
            .or_else(|| value_diff(path, "audio", &self.audio, &other.audio))
            .or_else(|| value_diff(path, "gram_type", &self.gram_type, &other.gram_type))
    }
}

impl StructuralEq for Definition {
    fn structural_diff(&self, other: &Self, path: &str) -> Option<Mismatch> {
        value_diff(path, "text", &self.text, &other.text)
            .or_else(|| value_diff(path, "context_broad", &self.context_broad, &other.context_broad))
            .or_else(|| {
                value_diff(path, "context_narrow", &self.context_narrow, &other.context_narrow)
            })
    }
}

impl StructuralEq for Expression {
    fn structural_diff(&self, other: &Self, path: &str) -> Option<Mismatch> {
        value_diff(path, "text", &self.text, &other.text)
            .or_else(|| value_diff(path, "context_broad", &self.context_broad, &other.context_broad))
            .or_else(|| {
                value_diff(path, "context_narrow", &self.context_narrow, &other.context_narrow)
            })
    }
}

impl StructuralEq for Relation {
    fn structural_diff(&self, other: &Self, path: &str) -> Option<Mismatch> {
        value_diff(path, "text", &self.text, &other.text)
            .or_else(|| len_diff(path, "synonyms", &self.synonyms, &other.synonyms))
            .or_else(|| len_diff(path, "antonyms", &self.antonyms, &other.antonyms))
            .or_else(|| string_list_diff(path, "synonyms", &self.synonyms, &other.synonyms))
            .or_else(|| string_list_diff(path, "antonyms", &self.antonyms, &other.antonyms))
    }
}

impl StructuralEq for Homonym {
    fn structural_diff(&self, other: &Self, path: &str) -> Option<Mismatch> {
        value_diff(path, "text", &self.text, &other.text)
            .or_else(|| value_diff(path, "gram_type", &self.gram_type, &other.gram_type))
    }
}

impl StructuralEq for Difficulty {
    fn structural_diff(&self, other: &Self, path: &str) -> Option<Mismatch> {
        value_diff(path, "kind", &self.kind, &other.kind)
            .or_else(|| value_diff(path, "text", &self.text, &other.text))
    }
}

impl StructuralEq for Citation {
    fn structural_diff(&self, other: &Self, path: &str) -> Option<Mismatch> {
        value_diff(path, "id", &self.id, &other.id)
            .or_else(|| value_diff(path, "author", &self.author, &other.author))
            .or_else(|| value_diff(path, "author_info", &self.author_info, &other.author_info))
            .or_else(|| value_diff(path, "text", &self.text, &other.text))
            .or_else(|| value_diff(path, "info", &self.info, &other.info))
    }
}

impl StructuralEq for TranslationPage {
    fn structural_diff(&self, other: &Self, path: &str) -> Option<Mismatch> {
        value_diff(path, "page_id", &self.page_id, &other.page_id)
            .or_else(|| len_diff(path, "words", &self.words, &other.words))
            .or_else(|| len_diff(path, "see_also", &self.see_also, &other.see_also))
            .or_else(|| list_diff(path, "words", &self.words, &other.words))
            .or_else(|| see_also_diff(path, &self.see_also, &other.see_also))
    }
}

impl StructuralEq for Word {
    fn structural_diff(&self, other: &Self, path: &str) -> Option<Mismatch> {
        value_diff(path, "code", &self.code, &other.code)
            .or_else(|| len_diff(path, "subheaders", &self.subheaders, &other.subheaders))
            .or_else(|| self.header.structural_diff(&other.header, &join(path, "header")))
            .or_else(|| list_diff(path, "subheaders", &self.subheaders, &other.subheaders))
    }
}

impl StructuralEq for WordHeader {
    fn structural_diff(&self, other: &Self, path: &str) -> Option<Mismatch> {
        value_diff(path, "text", &self.text, &other.text)
            .or_else(|| value_diff(path, "text_alt", &self.text_alt, &other.text_alt))
            .or_else(|| value_diff(path, "phonetic", &self.phonetic, &other.phonetic))
            .or_else(|| value_diff(path, "audio", &self.audio, &other.audio))
            .or_else(|| value_diff(path, "gram_type", &self.gram_type, &other.gram_type))
    }
}

impl StructuralEq for Subheader {
    fn structural_diff(&self, other: &Self, path: &str) -> Option<Mismatch> {
        value_diff(path, "title", &self.title, &other.title)
            .or_else(|| len_diff(path, "items", &self.items, &other.items))
            .or_else(|| list_diff(path, "items", &self.items, &other.items))
    }
}

impl StructuralEq for Item {
    fn structural_diff(&self, other: &Self, path: &str) -> Option<Mismatch> {
        len_diff(path, "meanings", &self.meanings, &other.meanings)
            .or_else(|| len_diff(path, "phrases", &self.phrases, &other.phrases))
            .or_else(|| list_diff(path, "meanings", &self.meanings, &other.meanings))
            .or_else(|| list_diff(path, "phrases", &self.phrases, &other.phrases))
    }
}

impl StructuralEq for Meaning {
    fn structural_diff(&self, other: &Self, path: &str) -> Option<Mismatch> {
        value_diff(path, "text", &self.text, &other.text)
            .or_else(|| {
                value_diff(path, "context_narrow", &self.context_narrow, &other.context_narrow)
            })
            .or_else(|| {
                value_diff(path, "context_domain", &self.context_domain, &other.context_domain)
            })
            .or_else(|| value_diff(path, "context_meta", &self.context_meta, &other.context_meta))
    }
}

impl StructuralEq for Phrase {
    fn structural_diff(&self, other: &Self, path: &str) -> Option<Mismatch> {
        value_diff(path, "text_source", &self.text_source, &other.text_source)
            .or_else(|| value_diff(path, "text_target", &self.text_target, &other.text_target))
            .or_else(|| value_diff(path, "audio_source", &self.audio_source, &other.audio_source))
            .or_else(|| value_diff(path, "audio_target", &self.audio_target, &other.audio_target))
            .or_else(|| {
                value_diff(path, "context_narrow", &self.context_narrow, &other.context_narrow)
            })
            .or_else(|| {
                value_diff(path, "context_domain", &self.context_domain, &other.context_domain)
            })
            .or_else(|| value_diff(path, "context_meta", &self.context_meta, &other.context_meta))
            .or_else(|| {
                value_diff(path, "is_expression", &self.is_expression, &other.is_expression)
            })
            .or_else(|| len_diff(path, "subphrases", &self.subphrases, &other.subphrases))
            .or_else(|| list_diff(path, "subphrases", &self.subphrases, &other.subphrases))
    }
}
