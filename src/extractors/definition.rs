// src/extractors/definition.rs
//
// Extraction of monolingual French definition pages. Each section of the
// page (DÉFINITIONS, EXPRESSIONS, SYNONYMES ET CONTRAIRES, HOMONYMES,
// DIFFICULTÉS, CITATIONS) is located by role and parsed independently; a
// section that is absent simply yields an empty list.

use scraper::Html;
use tracing::debug;

use crate::client;
use crate::extractors::classify::{classify, is_role, Role};
use crate::extractors::dom::{self, DomNode};
use crate::extractors::page;
use crate::models::{
    Citation, Definition, DefinitionHeader, DefinitionPage, Difficulty, Expression, Homonym,
    Relation,
};
use crate::utils::error::{Error, ScrapeError};

/// Looks up a French word in the definition dictionary and extracts its
/// page. Spaces in the word become hyphens in the URL.
///
/// A nonexistent word yields [`ScrapeError::WordNotFound`] carrying the
/// search suggestions the page offered, if any.
pub async fn lookup(word: &str) -> Result<DefinitionPage, Error> {
    if word.is_empty() {
        return Err(ScrapeError::BadArgs("empty word".into()).into());
    }
    let slug = word.replace(' ', "-");
    let url = format!("https://www.larousse.fr/dictionnaires/francais/{}", slug);
    from_file_or_url(&url).await
}

/// Extracts a definition page given either a local HTML file path or a
/// dictionary URL.
pub async fn from_file_or_url(input: &str) -> Result<DefinitionPage, Error> {
    if !client::is_file(input) {
        client::validate_definition_url(input)?;
    }
    let doc = client::fetch_document(input).await?;
    Ok(from_document(&doc)?)
}

/// Extracts a definition page from an already-parsed document.
pub fn from_document(doc: &Html) -> Result<DefinitionPage, ScrapeError> {
    if page::is_word_not_found(doc) {
        return Err(ScrapeError::WordNotFound {
            suggestions: page::search_suggestions(doc),
        });
    }

    let res = DefinitionPage {
        page_id: page::page_id(doc)?,
        header: find_header(doc)?,
        definitions: find_definitions(doc),
        expressions: find_expressions(doc),
        relations: find_relations(doc)?,
        homonyms: find_homonyms(doc)?,
        difficulties: find_difficulties(doc)?,
        citations: find_citations(doc)?,
        see_also: page::similar_words(doc)?,
    };
    debug!(
        page_id = res.page_id,
        definitions = res.definitions.len(),
        expressions = res.expressions.len(),
        citations = res.citations.len(),
        "extracted definition page"
    );
    Ok(res)
}

/// Extracts the header. The word text is required; the audio link and the
/// grammatical type are both absent on some pages and extract as empty.
fn find_header(doc: &Html) -> Result<DefinitionHeader, ScrapeError> {
    let root = dom::root(doc);
    let audio = dom::find_first(root, is_role(Role::HeaderAudio))
        .map(page::audio_url_of)
        .unwrap_or_default();
    let gram_type = dom::find_first(root, is_role(Role::HeaderType))
        .map(dom::text)
        .unwrap_or_default();
    Ok(DefinitionHeader {
        text: find_header_text(doc)?,
        audio,
        gram_type,
    })
}

/// Joins the header text nodes, e.g. "vert" + "verte" -> "vert, verte".
/// A fragment already ending in a comma supplies its own separator.
fn find_header_text(doc: &Html) -> Result<String, ScrapeError> {
    let nodes = dom::find_all(dom::root(doc), is_role(Role::HeaderText));
    if nodes.is_empty() {
        return Err(ScrapeError::structural(
            "find_header_text",
            "",
            "Failed to find header text nodes",
        ));
    }
    let mut out = String::new();
    for (i, n) in nodes.into_iter().enumerate() {
        if i > 0 && !out.ends_with(',') {
            out.push_str(", ");
        }
        out.push_str(&dom::text(n));
    }
    Ok(out)
}

fn find_definitions(doc: &Html) -> Vec<Definition> {
    dom::find_all(dom::root(doc), is_role(Role::DefinitionItem))
        .into_iter()
        .map(parse_definition)
        .collect()
}

/// One definition item: child nodes carrying a context role fill the
/// context fields, everything else concatenates into the text.
fn parse_definition(node: DomNode<'_>) -> Definition {
    let mut def = Definition::default();
    let mut child = node.first_child();
    while let Some(m) = child {
        match classify(m) {
            Some(Role::SectionRubric) => def.context_broad = dom::text(m),
            Some(Role::DefinitionIndicator) => def.context_narrow = dom::text(m),
            _ => {
                if needs_space(&def.text) {
                    def.text.push(' ');
                }
                def.text.push_str(&dom::text(m));
            }
        }
        child = m.next_sibling();
    }
    def
}

fn needs_space(s: &str) -> bool {
    !s.is_empty() && !s.ends_with(' ')
}

fn find_expressions(doc: &Html) -> Vec<Expression> {
    dom::find_all(dom::root(doc), is_role(Role::ExpressionItem))
        .into_iter()
        .map(parse_expression)
        .collect()
}

/// One expression item. The text is split across one or more address
/// headings plus the explanation that follows each; the narrow context
/// sits inside an address heading and is stripped back out of the text.
fn parse_expression(node: DomNode<'_>) -> Expression {
    let context_broad = dom::find_first(node, is_role(Role::SectionRubric))
        .map(dom::text)
        .unwrap_or_default();

    let mut context_narrow = String::new();
    let mut parts: Vec<String> = Vec::new();
    for addr in dom::find_all(node, is_role(Role::ExpressionAddress)) {
        if let Some(ind) = dom::find_first(addr, is_role(Role::ExpressionIndicator)) {
            context_narrow = dom::text(ind);
        }
        let mut part = dom::text(addr);
        if let Some(next) = addr.next_sibling() {
            part.push(' ');
            part.push_str(&dom::text(next));
        }
        parts.push(part);
    }

    let mut text = parts.join(" ");
    if !context_narrow.is_empty() && text.starts_with(&context_narrow) {
        text = text.replacen(&context_narrow, "", 1);
    }
    Expression {
        text: cleanup_expression_text(&text),
        context_broad,
        context_narrow,
    }
}

/// Undoes the joining artifacts around apostrophes and full stops.
fn cleanup_expression_text(text: &str) -> String {
    text.replace("' ", "'").replace(" .", ".").trim_matches(' ').to_string()
}

fn find_relations(doc: &Html) -> Result<Vec<Relation>, ScrapeError> {
    dom::find_all(dom::root(doc), is_role(Role::RelationItem))
        .into_iter()
        .map(parse_relation)
        .collect()
}

/// One synonym/antonym item: a lead-in text child, then a label telling
/// which list comes first, then the " - "-separated list itself. When the
/// synonym list comes first, an antonym list may follow after one more
/// label node.
fn parse_relation(node: DomNode<'_>) -> Result<Relation, ScrapeError> {
    let lead = node.first_child().ok_or_else(|| {
        ScrapeError::structural("parse_relation", dom::describe(node), "Missing lead-in child")
    })?;
    let text = dom::text(lead);

    let label = lead.next_sibling().ok_or_else(|| {
        ScrapeError::structural("parse_relation", dom::describe(node), "Missing list label")
    })?;
    let synonyms_first = dom::text(label).starts_with("Synonyme");
    let list = label.next_sibling().ok_or_else(|| {
        ScrapeError::structural("parse_relation", dom::describe(node), "Missing term list")
    })?;

    let mut rel = Relation {
        text,
        ..Relation::default()
    };
    if synonyms_first {
        rel.synonyms = split_terms(&dom::text(list));
        // A second list, if present, sits after its own label node.
        if let Some(second) = list.next_sibling().and_then(|l| l.next_sibling()) {
            rel.antonyms = split_terms(&dom::text(second));
        }
    } else {
        rel.antonyms = split_terms(&dom::text(list));
    }
    Ok(rel)
}

fn split_terms(s: &str) -> Vec<String> {
    s.split(" - ").map(str::to_string).collect()
}

fn find_homonyms(doc: &Html) -> Result<Vec<Homonym>, ScrapeError> {
    dom::find_all(dom::root(doc), is_role(Role::HomonymItem))
        .into_iter()
        .map(parse_homonym)
        .collect()
}

/// One homonym item: the text is a cross-reference link when the homonym
/// has its own page, a plain `<b>` otherwise. The type is optional.
fn parse_homonym(node: DomNode<'_>) -> Result<Homonym, ScrapeError> {
    let text_node = dom::find_first(node, is_role(Role::CrossReference))
        .or_else(|| dom::find_first(node, |n| dom::tag(n) == Some("b")))
        .ok_or_else(|| {
            ScrapeError::structural("parse_homonym", dom::describe(node), "Missing text node")
        })?;
    let gram_type = dom::find_first(node, is_role(Role::HomonymType))
        .map(dom::text)
        .unwrap_or_default();
    Ok(Homonym {
        text: dom::text(text_node),
        gram_type,
    })
}

fn find_difficulties(doc: &Html) -> Result<Vec<Difficulty>, ScrapeError> {
    dom::find_all(dom::root(doc), is_role(Role::DifficultyItem))
        .into_iter()
        .map(parse_difficulty)
        .collect()
}

/// One difficulty item: a required kind node, then the text is the
/// concatenation of everything after it.
fn parse_difficulty(node: DomNode<'_>) -> Result<Difficulty, ScrapeError> {
    let kind_node = dom::find_first(node, is_role(Role::DifficultyType)).ok_or_else(|| {
        ScrapeError::structural("parse_difficulty", dom::describe(node), "Missing kind node")
    })?;
    let mut text = String::new();
    let mut sibling = kind_node.next_sibling();
    while let Some(m) = sibling {
        text.push_str(&dom::text(m));
        sibling = m.next_sibling();
    }
    Ok(Difficulty {
        kind: dom::text(kind_node),
        text,
    })
}

fn find_citations(doc: &Html) -> Result<Vec<Citation>, ScrapeError> {
    dom::find_all(dom::root(doc), is_role(Role::CitationItem))
        .into_iter()
        .map(parse_citation)
        .collect()
}

/// One citation item. The numeric `id` attribute and the text are
/// required; author, author info and info are all optional.
fn parse_citation(node: DomNode<'_>) -> Result<Citation, ScrapeError> {
    let id_str = dom::attr(node, "id").filter(|s| !s.is_empty()).ok_or_else(|| {
        ScrapeError::structural("parse_citation", dom::describe(node), "Missing id attribute")
    })?;
    let id = id_str.parse::<i32>().map_err(|e| {
        ScrapeError::structural("parse_citation", dom::describe(node), e.to_string())
    })?;

    let text_node = dom::find_first(node, is_role(Role::CitationText)).ok_or_else(|| {
        ScrapeError::structural("parse_citation", dom::describe(node), "Missing text node")
    })?;
    let field = |role: Role| {
        dom::find_first(node, is_role(role))
            .map(dom::text)
            .unwrap_or_default()
    };
    Ok(Citation {
        id,
        author: field(Role::CitationAuthor),
        author_info: field(Role::CitationAuthorInfo),
        text: dom::text(text_node),
        info: field(Role::CitationInfo),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(inner: &str) -> Html {
        Html::parse_document(&format!(
            r#"<html><head><link rel="canonical" href="https://www.larousse.fr/dictionnaires/francais/vert/81676"></head><body>{}</body></html>"#,
            inner
        ))
    }

    #[test]
    fn header_joins_both_forms_with_a_comma() {
        let doc = body(
            r#"<h2><audio src="/dictionnaires-prononciation/francais/tts/64636fra2"></audio>vert<audio src="/dictionnaires-prononciation/francais/tts/64637fra2"></audio>verte</h2>
            <p class="CatgramDefinition">adjectif</p>"#,
        );
        let header = find_header(&doc).unwrap();
        assert_eq!(header.text, "vert, verte");
        assert_eq!(header.audio, "https://voix.larousse.fr/francais/64636fra2.mp3");
        assert_eq!(header.gram_type, "adjectif");
    }

    #[test]
    fn header_audio_and_type_are_optional() {
        let doc = body(r#"<h2><audio>x</audio>auto</h2>"#);
        let header = find_header(&doc).unwrap();
        assert_eq!(header.text, "auto");
        assert_eq!(header.audio, "");
        assert_eq!(header.gram_type, "");
    }

    #[test]
    fn header_without_text_is_a_structural_failure() {
        let doc = body("<p>nothing here</p>");
        assert!(matches!(
            find_header(&doc),
            Err(ScrapeError::StructuralFailure { function: "find_header_text", .. })
        ));
    }

    #[test]
    fn definitions_pick_up_both_context_levels() {
        let doc = body(
            r#"<ul>
            <li class="DivisionDefinition"><p class="RubriqueDefinition">Botanique</p><span class="indicateurDefinition">Littéraire.</span>Qui est de la couleur verte.</li>
            <li class="DivisionDefinition">Se dit d'un fruit qui n'est pas mûr.</li>
            <li class="DivisionDefinition"></li>
            </ul>"#,
        );
        let defs = find_definitions(&doc);
        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].context_broad, "Botanique");
        assert_eq!(defs[0].context_narrow, "Littéraire.");
        assert_eq!(defs[0].text, "Qui est de la couleur verte.");
        assert_eq!(defs[1], Definition {
            text: "Se dit d'un fruit qui n'est pas mûr.".into(),
            ..Definition::default()
        });
    }

    #[test]
    fn expression_text_spans_the_address_and_its_explanation() {
        let doc = body(
            r#"<li class="Locution"><h2 class="AdresseLocution">Donner le feu vert,</h2> autoriser quelque chose.</li>"#,
        );
        let exprs = find_expressions(&doc);
        assert_eq!(exprs.len(), 1);
        assert_eq!(exprs[0].text, "Donner le feu vert, autoriser quelque chose.");
    }

    #[test]
    fn expression_indicator_is_stripped_from_the_text() {
        let doc = body(
            r#"<li class="Locution"><h2 class="AdresseLocution"><span class="IndicateurLocution">Familier.</span> En voir des vertes,</h2> subir des choses désagréables .</li>"#,
        );
        let exprs = find_expressions(&doc);
        assert_eq!(exprs[0].context_narrow, "Familier.");
        // The indicator prefix is removed and the " ." artifact repaired.
        assert_eq!(exprs[0].text, "En voir des vertes, subir des choses désagréables.");
    }

    #[test]
    fn relation_with_synonyms_then_antonyms() {
        let doc = body(
            r#"<div class="SensSynonymes"><b>Qui est de la couleur verte.</b><p>Synonymes :</p><p>glauque - olivâtre</p><p>Contraires :</p><p>rouge</p></div>"#,
        );
        let rels = find_relations(&doc).unwrap();
        assert_eq!(rels.len(), 1);
        assert_eq!(rels[0].text, "Qui est de la couleur verte.");
        assert_eq!(rels[0].synonyms, vec!["glauque", "olivâtre"]);
        assert_eq!(rels[0].antonyms, vec!["rouge"]);
    }

    #[test]
    fn relation_with_antonyms_only() {
        let doc = body(
            r#"<div class="SensSynonymes"><b>Mûr.</b><p>Contraires :</p><p>blet - vert</p></div>"#,
        );
        let rels = find_relations(&doc).unwrap();
        assert!(rels[0].synonyms.is_empty());
        assert_eq!(rels[0].antonyms, vec!["blet", "vert"]);
    }

    #[test]
    fn homonym_text_falls_back_to_bold() {
        let doc = body(
            r#"<ul>
            <li class="Homonyme"><a class="Renvois" href="/x/1">ver</a><span class="CatGramHomonyme">nom masculin</span></li>
            <li class="Homonyme"><b>verre</b></li>
            </ul>"#,
        );
        let homs = find_homonyms(&doc).unwrap();
        assert_eq!(homs[0], Homonym { text: "ver".into(), gram_type: "nom masculin".into() });
        assert_eq!(homs[1], Homonym { text: "verre".into(), gram_type: String::new() });
    }

    #[test]
    fn difficulty_text_concatenates_everything_after_the_kind() {
        let doc = body(
            r#"<li class="Difficulte"><p class="TypeDifficulte">ORTHOGRAPHE</p><p class="DefinitionDifficulte">Avec un t final.</p><p>Toujours.</p></li>"#,
        );
        let diffs = find_difficulties(&doc).unwrap();
        assert_eq!(diffs[0].kind, "ORTHOGRAPHE");
        assert_eq!(diffs[0].text, "Avec un t final.Toujours.");
    }

    #[test]
    fn citation_optional_fields_default_to_empty() {
        let doc = body(
            r#"<ul>
            <li class="Citation" id="351"><span class="AuteurCitation">Victor Hugo</span><span class="InfoAuteurCitation">Besançon 1802</span><span class="TexteCitation">Le vert paradis.</span><span class="InfoCitation">Les Contemplations</span></li>
            <li class="Citation" id="352"><span class="TexteCitation">Anonyme.</span></li>
            </ul>"#,
        );
        let cits = find_citations(&doc).unwrap();
        assert_eq!(cits[0].id, 351);
        assert_eq!(cits[0].author, "Victor Hugo");
        assert_eq!(cits[0].author_info, "Besançon 1802");
        assert_eq!(cits[0].info, "Les Contemplations");
        assert_eq!(cits[1], Citation { id: 352, text: "Anonyme.".into(), ..Citation::default() });
    }

    #[test]
    fn citation_without_numeric_id_is_a_structural_failure() {
        let doc = body(r#"<li class="Citation" id="abc"><span class="TexteCitation">x</span></li>"#);
        assert!(find_citations(&doc).is_err());
    }

    #[test]
    fn word_not_found_short_circuits_with_suggestions() {
        let doc = Html::parse_document(
            r#"<body><div class="corrector"><ul><li><a href="/dictionnaires/francais/vert/81676">vert</a></li></ul></div></body>"#,
        );
        match from_document(&doc) {
            Err(ScrapeError::WordNotFound { suggestions }) => {
                assert_eq!(suggestions, vec!["https://larousse.fr/dictionnaires/francais/vert/81676"]);
            }
            other => panic!("expected WordNotFound, got {:?}", other),
        }
    }

    #[test]
    fn full_page_assembles_every_section() {
        let doc = body(
            r#"<h2><audio src="/dictionnaires-prononciation/francais/tts/64636fra2"></audio>vert, verte</h2>
            <p class="CatgramDefinition">adjectif</p>
            <li class="DivisionDefinition">Qui est de la couleur verte.</li>
            <li class="Locution"><h2 class="AdresseLocution">Feu vert,</h2> autorisation.</li>
            <div class="SensSynonymes"><b>Qui est de la couleur verte.</b><p>Synonymes :</p><p>glauque</p></div>
            <li class="Homonyme"><b>ver</b></li>
            <li class="Citation" id="1"><span class="TexteCitation">Le vert.</span></li>
            <ul>
            <li class="item-word"><a href="/dictionnaires/francais/vert/81676">vert</a></li>
            <li class="item-word"><a href="/dictionnaires/francais/verdure/81350">verdure</a></li>
            </ul>"#,
        );
        let page = from_document(&doc).unwrap();
        assert_eq!(page.page_id, 81676);
        assert_eq!(page.header.text, "vert, verte");
        assert_eq!(page.definitions.len(), 1);
        assert_eq!(page.expressions.len(), 1);
        assert_eq!(page.relations.len(), 1);
        assert_eq!(page.homonyms.len(), 1);
        assert_eq!(page.citations.len(), 1);
        assert_eq!(page.see_also, vec!["https://larousse.fr/dictionnaires/francais/verdure/81350"]);
    }
}
