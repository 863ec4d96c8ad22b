// src/models/mod.rs
//
// Typed records produced by the extraction pass. These are plain data:
// constructed once, bottom-up, and returned to callers unchanged. The one
// exception is the expression flag, which is pushed from a phrase onto its
// already-built subphrases (see `Phrase::set_expression`).

pub mod diff;

use serde::{Deserialize, Serialize};

pub use diff::{diff, Mismatch, StructuralEq};

// --- Definition pages (monolingual) ---

/// One page of the French definition dictionary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefinitionPage {
    pub page_id: i32,
    pub header: DefinitionHeader,
    pub definitions: Vec<Definition>,
    pub expressions: Vec<Expression>,
    /// The SYNONYMES ET CONTRAIRES section.
    pub relations: Vec<Relation>,
    pub homonyms: Vec<Homonym>,
    pub difficulties: Vec<Difficulty>,
    pub citations: Vec<Citation>,
    /// Similar-word URLs from the carousel; for a "word not found" page,
    /// the search suggestions instead.
    pub see_also: Vec<String>,
}

impl DefinitionPage {
    /// Record for a "word not found" page: empty content sections, with
    /// whatever search suggestions the page offered in `see_also`.
    pub fn from_suggestions(suggestions: Vec<String>) -> Self {
        DefinitionPage {
            see_also: suggestions,
            ..DefinitionPage::default()
        }
    }
}

/// The header area of a definition page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefinitionHeader {
    /// The word, both forms joined with ", " when applicable ("vert, verte").
    pub text: String,
    pub audio: String,
    /// Grammatical type ("adjectif"). Empty on some pages.
    pub gram_type: String,
}

/// An item from the DÉFINITIONS section.
///
/// `context_broad` is the large red rubric shown above a group of
/// definitions; `context_narrow` is the more specific red indicator
/// preceding the definition text itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    pub text: String,
    pub context_broad: String,
    pub context_narrow: String,
}

/// An item from the EXPRESSIONS section; contexts as for [`Definition`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Expression {
    pub text: String,
    pub context_broad: String,
    pub context_narrow: String,
}

/// An item from the SYNONYMES ET CONTRAIRES section. `text` is often,
/// but not always, the text of a corresponding definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    pub text: String,
    pub synonyms: Vec<String>,
    pub antonyms: Vec<String>,
}

/// An item from the HOMONYMES section. The type is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Homonym {
    pub text: String,
    pub gram_type: String,
}

/// An item from the DIFFICULTÉS section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    pub kind: String,
    pub text: String,
}

/// An item from the CITATIONS section. Author, author info and info are
/// all optional on real pages; the text and numeric ID are not.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    pub id: i32,
    pub author: String,
    pub author_info: String,
    pub text: String,
    pub info: String,
}

// --- Translation pages (bilingual) ---

/// One page of a bilingual dictionary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranslationPage {
    pub page_id: i32,
    pub words: Vec<Word>,
    pub see_also: Vec<String>,
}

impl TranslationPage {
    /// Record for a "word not found" page; see
    /// [`DefinitionPage::from_suggestions`].
    pub fn from_suggestions(suggestions: Vec<String>) -> Self {
        TranslationPage {
            see_also: suggestions,
            ..TranslationPage::default()
        }
    }
}

/// A word entry on a translation page.
///
/// `code` is an integer assigned to some words but is not a unique
/// identifier: the first word's code always equals the page ID, later
/// words may repeat or diverge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub code: i32,
    pub header: WordHeader,
    /// A word without explicit subheader boundaries holds exactly one
    /// untitled subheader wrapping all of its items.
    pub subheaders: Vec<Subheader>,
}

/// The header block of a word entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WordHeader {
    pub text: String,
    /// Alternate form shown in parentheses, typically the other
    /// grammatical gender.
    pub text_alt: String,
    /// IPA pronunciation in square brackets.
    pub phonetic: String,
    pub audio: String,
    pub gram_type: String,
}

/// A titled group of items within a word. Untitled subheaders occur both
/// synthetically (small words) and legitimately on some big words.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subheader {
    pub title: String,
    pub items: Vec<Item>,
}

/// One numbered item within a subheader.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub meanings: Vec<Meaning>,
    pub phrases: Vec<Phrase>,
}

/// A translation of a word.
///
/// The three context fields are graded: `context_narrow` is red
/// square-bracket text, `context_domain` red all-caps domain text, and
/// `context_meta` red parenthetical register/dialect text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meaning {
    pub text: String,
    pub context_narrow: String,
    pub context_domain: String,
    pub context_meta: String,
}

impl Meaning {
    /// True when every field is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
            && self.context_narrow.is_empty()
            && self.context_domain.is_empty()
            && self.context_meta.is_empty()
    }
}

/// An example phrase: source-language text, target-language text, their
/// audio clips, graded contexts, and up to one level of subphrases.
///
/// `is_expression` marks a phrase rendered in the blue EXPR box; the flag
/// is always uniform across a phrase and its subphrases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Phrase {
    pub text_source: String,
    pub text_target: String,
    pub audio_source: String,
    pub audio_target: String,
    pub context_narrow: String,
    pub context_domain: String,
    pub context_meta: String,
    pub is_expression: bool,
    /// Each subphrase's own `subphrases` list is always empty.
    pub subphrases: Vec<Phrase>,
}

impl Phrase {
    /// Sets the expression flag on this phrase and pushes it down onto
    /// every subphrase. Called after the subphrases have been built, so
    /// the flag ends up uniform.
    pub fn set_expression(&mut self, flag: bool) {
        self.is_expression = flag;
        for sub in &mut self.subphrases {
            sub.is_expression = flag;
        }
    }
}
