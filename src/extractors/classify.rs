// src/extractors/classify.rs
//
// Maps a node (plus limited ancestor/sibling context) to its semantic Role.
// The markup expresses meaning through raw class-attribute strings; this
// module is the single place where those strings are interpreted, so
// everything downstream can switch on a closed enum instead.

use crate::extractors::dom::{self, DomNode};

/// Banner shown on a "word not found" page that offers suggestions.
pub const SUGGESTIONS_BANNER: &str = "Suggestions proposées par le correcteur";
/// Banner shown on a "word not found" page without suggestions.
pub const NO_SUGGESTIONS_BANNER: &str = "Nous n'avons aucune suggestion pour votre recherche";

/// The semantic role a node carries.
///
/// Roles on the left of each group belong to monolingual definition pages,
/// the rest to bilingual translation pages. The class string a role is
/// recognized by is given in parentheses. A node maps to at most one role;
/// nodes with no recognized role are ignored by the extractors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    // --- Definition page: header ---
    /// Text node directly following the pronunciation audio element.
    HeaderText,
    /// The `<audio>` element in the header.
    HeaderAudio,
    /// Text node inside `<p class="CatgramDefinition">` (grammatical type).
    HeaderType,

    // --- Definition page: section items ---
    DefinitionItem,    // <li class="DivisionDefinition">, non-empty
    ExpressionItem,    // <li class="Locution">
    RelationItem,      // <div class="SensSynonymes"> with a lead-in child
    HomonymItem,       // <li class="Homonyme">
    DifficultyItem,    // <li class="Difficulte">
    CitationItem,      // <li class="Citation">

    // --- Definition page: fields within items ---
    DifficultyType,      // <p class="TypeDifficulte">
    DifficultyText,      // <p class="DefinitionDifficulte">
    CitationAuthor,      // <span class="AuteurCitation">
    CitationAuthorInfo,  // <span class="InfoAuteurCitation">
    CitationText,        // <span class="TexteCitation">
    CitationInfo,        // <span class="InfoCitation">
    SectionRubric,       // <p class="RubriqueDefinition"> (broad red context)
    DefinitionIndicator, // <span class="indicateurDefinition"> (narrow red context)
    ExpressionIndicator, // <span class="IndicateurLocution">
    ExpressionAddress,   // <h2 class="AdresseLocution">
    HomonymType,         // CatGramHomonyme

    // --- Word-not-found page ---
    Suggestions,   // <h1 class="icon-question-sign"> with the suggestions banner
    NoSuggestions, // <p class="err"> with the no-suggestions banner
    Corrector,     // corrector (marks the page as "word not found")

    // --- Translation page: structure ---
    EntryZone,          // ZoneEntree (entry anchor of one word)
    SubheaderBlockLead, // itemBLSEM1 (first boundary marker of a big word)
    SubheaderBlock,     // itemBLSEM (further boundary markers)
    SubheaderTitle,     // Indicateur2
    ItemBlock,          // itemZONESEM
    SemanticDivision,   // division-semantique

    // --- Translation page: word header ---
    Address,         // Adresse
    AddressAlt,      // FormeFlechieAdresse
    Phonetic,        // Phonetique
    GrammarZone,     // ZoneGram
    GrammarCategory, // CategorieGrammaticale
    EntryAudio,      // lienson

    // --- Translation page: meaning/phrase fields ---
    Translation,       // Traduction
    ContextNarrow,     // Indicateur (red square brackets)
    ContextDomain,     // IndicateurDomaine (red all caps)
    ContextMeta,       // Metalangue (red parentheses)
    CrossReference,    // Renvois
    Gloss,             // Glose2
    PhraseText,        // Locution2
    PhraseTranslation, // Traduction2
    PhraseMeta,        // Metalangue2
    SourceAudio,       // lienson3
    TargetAudio,       // lienson2
    PhraseZoneLead,    // ZoneExpression1
    PhraseZone,        // ZoneExpression
    PhraseZoneExtra,   // ZoneExpression2
    ExpressionBlock,   // BlocExpression (the blue box)
    SubphraseList,     // DivisionExpression
    OrMarker,          // <span class="oubien">
    ConjugationLink,   // lienconj2
    Gender,            // Genre

    // --- Shared page-level ---
    SimilarWord, // item-word (carousel entry)
}

/// Classifies a node. Returns `None` for unrecognized tag/class
/// combinations; that is the expected case for most nodes on a page.
pub fn classify(node: DomNode<'_>) -> Option<Role> {
    if node.value().is_text() {
        return classify_text(node);
    }
    let element = node.value().as_element()?;
    let tag = element.name();
    let class = element.attr("class").unwrap_or("");

    // Tag-sensitive rules come first: several class strings are shared
    // across tags and mean different things on each.
    match (tag, class) {
        ("audio", _) => return Some(Role::HeaderAudio),
        ("li", "DivisionDefinition") => {
            return node.first_child().map(|_| Role::DefinitionItem);
        }
        ("li", "Locution") => return Some(Role::ExpressionItem),
        ("li", "Homonyme") => return Some(Role::HomonymItem),
        ("li", "Difficulte") => return Some(Role::DifficultyItem),
        ("li", "Citation") => return Some(Role::CitationItem),
        ("div", "SensSynonymes") => {
            return has_relation_lead_in(node).then_some(Role::RelationItem);
        }
        ("p", "TypeDifficulte") => return Some(Role::DifficultyType),
        ("p", "DefinitionDifficulte") => return Some(Role::DifficultyText),
        ("p", "RubriqueDefinition") => return Some(Role::SectionRubric),
        ("span", "indicateurDefinition") => return Some(Role::DefinitionIndicator),
        ("span", "IndicateurLocution") => return Some(Role::ExpressionIndicator),
        ("h2", "AdresseLocution") => return Some(Role::ExpressionAddress),
        ("span", "AuteurCitation") => return Some(Role::CitationAuthor),
        ("span", "InfoAuteurCitation") => return Some(Role::CitationAuthorInfo),
        ("span", "TexteCitation") => return Some(Role::CitationText),
        ("span", "InfoCitation") => return Some(Role::CitationInfo),
        ("span", "oubien") => return Some(Role::OrMarker),
        ("h1", "icon-question-sign") => {
            return (dom::text(node) == SUGGESTIONS_BANNER).then_some(Role::Suggestions);
        }
        ("p", "err") => {
            return (dom::text(node) == NO_SUGGESTIONS_BANNER).then_some(Role::NoSuggestions);
        }
        _ => {}
    }

    // Class-only rules (any tag).
    let role = match class {
        "CatGramHomonyme" => Role::HomonymType,
        "corrector" => Role::Corrector,
        "item-word" => Role::SimilarWord,
        "ZoneEntree" => Role::EntryZone,
        "itemBLSEM1" => Role::SubheaderBlockLead,
        "itemBLSEM" => Role::SubheaderBlock,
        "Indicateur2" => Role::SubheaderTitle,
        "itemZONESEM" => Role::ItemBlock,
        "division-semantique" => Role::SemanticDivision,
        "Adresse" => Role::Address,
        "FormeFlechieAdresse" => Role::AddressAlt,
        "Phonetique" => Role::Phonetic,
        "ZoneGram" => Role::GrammarZone,
        "CategorieGrammaticale" => Role::GrammarCategory,
        "lienson" => Role::EntryAudio,
        "Traduction" => Role::Translation,
        "Indicateur" => Role::ContextNarrow,
        "IndicateurDomaine" => Role::ContextDomain,
        "Metalangue" => Role::ContextMeta,
        "Renvois" => Role::CrossReference,
        "Glose2" => Role::Gloss,
        "Locution2" => Role::PhraseText,
        "Traduction2" => Role::PhraseTranslation,
        "Metalangue2" => Role::PhraseMeta,
        "lienson3" => Role::SourceAudio,
        "lienson2" => Role::TargetAudio,
        "ZoneExpression1" => Role::PhraseZoneLead,
        "ZoneExpression" => Role::PhraseZone,
        "ZoneExpression2" => Role::PhraseZoneExtra,
        "BlocExpression" => Role::ExpressionBlock,
        "DivisionExpression" => Role::SubphraseList,
        "lienconj2" => Role::ConjugationLink,
        "Genre" => Role::Gender,
        _ => return None,
    };
    Some(role)
}

/// Predicate form of [`classify`], for use with the tree locators.
pub fn is_role(role: Role) -> impl Fn(DomNode<'_>) -> bool {
    move |n| classify(n) == Some(role)
}

fn classify_text(node: DomNode<'_>) -> Option<Role> {
    if let Some(parent) = node.parent() {
        if dom::tag(parent) == Some("p") && dom::class(parent) == "CatgramDefinition" {
            return Some(Role::HeaderType);
        }
    }
    if let Some(prev) = node.prev_sibling() {
        if dom::tag(prev) == Some("audio") {
            return Some(Role::HeaderText);
        }
    }
    None
}

/// A relation item opens with either a `<b>` lead-in or a child carrying
/// the `DivisionDefinition` class; trailing items on some pages mix the
/// two markers.
fn has_relation_lead_in(node: DomNode<'_>) -> bool {
    match node.first_child() {
        Some(child) => dom::tag(child) == Some("b") || dom::class(child) == "DivisionDefinition",
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::dom::{find_first, root};
    use scraper::Html;

    fn first_of_class(doc: &Html, class: &str) -> Option<Role> {
        let node = find_first(root(doc), |n| dom::class(n) == class).unwrap();
        classify(node)
    }

    #[test]
    fn tag_is_checked_before_class() {
        // The same class string means a definition item on <li> and
        // nothing at all on <span>.
        let doc = Html::parse_document(
            r#"<body><li class="DivisionDefinition">x</li><span class="DivisionDefinition">y</span></body>"#,
        );
        let nodes = crate::extractors::dom::find_all(root(&doc), |n| {
            dom::class(n) == "DivisionDefinition"
        });
        assert_eq!(classify(nodes[0]), Some(Role::DefinitionItem));
        assert_eq!(classify(nodes[1]), None);
    }

    #[test]
    fn empty_definition_item_is_not_classified() {
        let doc = Html::parse_document(r#"<body><li class="DivisionDefinition"></li></body>"#);
        assert_eq!(first_of_class(&doc, "DivisionDefinition"), None);
    }

    #[test]
    fn relation_item_accepts_bold_lead_in() {
        let doc = Html::parse_document(
            r#"<body><div class="SensSynonymes"><b>Texte.</b></div></body>"#,
        );
        assert_eq!(first_of_class(&doc, "SensSynonymes"), Some(Role::RelationItem));
    }

    #[test]
    fn relation_item_accepts_division_definition_lead_in_on_any_tag() {
        let with_p = Html::parse_document(
            r#"<body><div class="SensSynonymes"><p class="DivisionDefinition">t</p></div></body>"#,
        );
        let with_div = Html::parse_document(
            r#"<body><div class="SensSynonymes"><div class="DivisionDefinition">t</div></div></body>"#,
        );
        let without = Html::parse_document(
            r#"<body><div class="SensSynonymes"><span class="x">t</span></div></body>"#,
        );
        assert_eq!(first_of_class(&with_p, "SensSynonymes"), Some(Role::RelationItem));
        assert_eq!(first_of_class(&with_div, "SensSynonymes"), Some(Role::RelationItem));
        assert_eq!(first_of_class(&without, "SensSynonymes"), None);
    }

    #[test]
    fn header_text_follows_audio_sibling() {
        let doc = Html::parse_document(
            r#"<body><h2><audio src="x"></audio>vert, verte</h2></body>"#,
        );
        let audio = find_first(root(&doc), |n| dom::tag(n) == Some("audio")).unwrap();
        assert_eq!(classify(audio), Some(Role::HeaderAudio));
        let text_node = audio.next_sibling().unwrap();
        assert_eq!(classify(text_node), Some(Role::HeaderText));
    }

    #[test]
    fn header_type_is_text_inside_catgram_paragraph() {
        let doc = Html::parse_document(r#"<body><p class="CatgramDefinition">adjectif</p></body>"#);
        let p = find_first(root(&doc), |n| dom::class(n) == "CatgramDefinition").unwrap();
        assert_eq!(classify(p.first_child().unwrap()), Some(Role::HeaderType));
    }

    #[test]
    fn suggestion_banners_require_the_exact_phrase() {
        let good = Html::parse_document(&format!(
            r#"<body><h1 class="icon-question-sign">{}</h1></body>"#,
            SUGGESTIONS_BANNER
        ));
        let bad = Html::parse_document(
            r#"<body><h1 class="icon-question-sign">Autre chose</h1></body>"#,
        );
        assert_eq!(first_of_class(&good, "icon-question-sign"), Some(Role::Suggestions));
        assert_eq!(first_of_class(&bad, "icon-question-sign"), None);
    }

    #[test]
    fn unknown_combinations_are_silently_unclassified() {
        let doc = Html::parse_document(r#"<body><div class="TotallyNew">x</div></body>"#);
        assert_eq!(first_of_class(&doc, "TotallyNew"), None);
    }

    #[test]
    fn class_match_is_case_sensitive_and_exact() {
        let doc = Html::parse_document(r#"<body><li class="locution">x</li></body>"#);
        assert_eq!(first_of_class(&doc, "locution"), None);
    }
}
