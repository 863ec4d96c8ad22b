// src/extractors/dom.rs
//
// Traversal helpers over the parsed page tree. scraper stores nodes in an
// ego_tree arena; a `DomNode` is a read-only handle into that arena, so
// walking parent/sibling/child links never aliases mutable state.

use scraper::{Html, Node};

/// A read-only handle to one node of a parsed page.
pub type DomNode<'a> = ego_tree::NodeRef<'a, Node>;

/// Returns the document root of a parsed page.
pub fn root(doc: &Html) -> DomNode<'_> {
    doc.tree.root()
}

/// Returns the first node in pre-order (the node itself included) matching
/// the predicate.
pub fn find_first<'a, P>(node: DomNode<'a>, pred: P) -> Option<DomNode<'a>>
where
    P: Fn(DomNode<'a>) -> bool,
{
    node.descendants().find(|n| pred(*n))
}

/// Returns all nodes in pre-order (the node itself included) matching the
/// predicate. Zero matches yields an empty vector.
pub fn find_all<'a, P>(node: DomNode<'a>, pred: P) -> Vec<DomNode<'a>>
where
    P: Fn(DomNode<'a>) -> bool,
{
    node.descendants().filter(|n| pred(*n)).collect()
}

/// Returns the element tag name, or `None` for non-element nodes.
pub fn tag<'a>(node: DomNode<'a>) -> Option<&'a str> {
    node.value().as_element().map(|e| e.name())
}

/// Returns the named attribute, or `None` if absent or not an element.
pub fn attr<'a>(node: DomNode<'a>, name: &str) -> Option<&'a str> {
    node.value().as_element().and_then(|e| e.attr(name))
}

/// Returns the full class-attribute string, or "" if absent.
/// Classification is by exact, case-sensitive match on this string.
pub fn class<'a>(node: DomNode<'a>) -> &'a str {
    attr(node, "class").unwrap_or("")
}

/// Collects the text of a node and its descendants: each text fragment is
/// trimmed, empty fragments are dropped, and the rest are joined with
/// single spaces.
pub fn text(node: DomNode<'_>) -> String {
    let mut out = String::new();
    for n in node.descendants() {
        if let Node::Text(t) = n.value() {
            let fragment: &str = &t.text;
            let trimmed = fragment.trim();
            if trimmed.is_empty() {
                continue;
            }
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(trimmed);
        }
    }
    out
}

/// Returns the raw text payload of a text node, or `None` otherwise.
pub fn text_payload<'a>(node: DomNode<'a>) -> Option<&'a str> {
    match node.value() {
        Node::Text(t) => Some(&t.text),
        _ => None,
    }
}

/// Returns true for a text node consisting entirely of whitespace.
pub fn is_whitespace_text(node: DomNode<'_>) -> bool {
    match text_payload(node) {
        Some(s) => s.chars().all(char::is_whitespace),
        None => false,
    }
}

/// Short human-readable description of a node, used when reporting
/// structural failures.
pub fn describe(node: DomNode<'_>) -> String {
    match node.value() {
        Node::Element(e) => match e.attr("class") {
            Some(c) => format!("<{} class=\"{}\">", e.name(), c),
            None => format!("<{}>", e.name()),
        },
        Node::Text(t) => {
            let s: &str = &t.text;
            format!("text {:?}", s.chars().take(40).collect::<String>())
        }
        other => format!("{:?}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(html: &str) -> Html {
        Html::parse_document(html)
    }

    #[test]
    fn find_all_preserves_document_order() {
        let doc = parse(r#"<body><p class="x">one</p><div><p class="x">two</p></div><p class="x">three</p></body>"#);
        let nodes = find_all(root(&doc), |n| class(n) == "x");
        let texts: Vec<String> = nodes.into_iter().map(text).collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
    }

    #[test]
    fn find_all_without_matches_is_empty() {
        let doc = parse(r#"<body><p>one</p></body>"#);
        assert!(find_all(root(&doc), |n| class(n) == "missing").is_empty());
    }

    #[test]
    fn find_first_matches_the_node_itself() {
        let doc = parse(r#"<body><div class="outer"><div class="outer">inner</div></div></body>"#);
        let first = find_first(root(&doc), |n| class(n) == "outer").unwrap();
        // The outer div comes first in pre-order; searching from it again
        // must return it, not its descendant.
        let again = find_first(first, |n| class(n) == "outer").unwrap();
        assert_eq!(first.id(), again.id());
    }

    #[test]
    fn text_joins_trimmed_fragments() {
        let doc = parse(r#"<body><p>  a  <b>b</b>   <i> </i>c </p></body>"#);
        let p = find_first(root(&doc), |n| tag(n) == Some("p")).unwrap();
        assert_eq!(text(p), "a b c");
    }

    #[test]
    fn class_is_the_exact_attribute_string() {
        let doc = parse(r#"<body><p class="a b">x</p></body>"#);
        let p = find_first(root(&doc), |n| tag(n) == Some("p")).unwrap();
        assert_eq!(class(p), "a b");
        assert_eq!(attr(p, "missing"), None);
    }

    #[test]
    fn whitespace_text_detection() {
        let doc = parse("<body><p>   </p><p>x</p></body>");
        let ps = find_all(root(&doc), |n| tag(n) == Some("p"));
        let blank = ps[0].first_child().unwrap();
        let filled = ps[1].first_child().unwrap();
        assert!(is_whitespace_text(blank));
        assert!(!is_whitespace_text(filled));
        assert!(!is_whitespace_text(ps[0]));
    }
}
