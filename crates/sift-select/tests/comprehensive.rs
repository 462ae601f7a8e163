//! End-to-end selector tests over hand-built documents.

use sift_dom::{Document, NodeId};
use sift_select::{select, select_first, select_roots, Query};

/// html > body > div#a > (p.x, p.y)
fn spec_tree() -> (Document, NodeId, NodeId, NodeId) {
    let mut doc = Document::new();
    let html = doc.create_element("html");
    doc.append_child(doc.document_node(), html);
    let body = doc.create_element("body");
    doc.append_child(html, body);
    let div_a = doc.create_element_with("div", &[("id", "a")]);
    doc.append_child(body, div_a);
    let p_x = doc.create_element_with("p", &[("class", "x")]);
    doc.append_child(div_a, p_x);
    let p_y = doc.create_element_with("p", &[("class", "y")]);
    doc.append_child(div_a, p_y);
    (doc, div_a, p_x, p_y)
}

fn names(doc: &Document, ids: &[NodeId]) -> Vec<String> {
    ids.iter().map(|&id| doc.normal_name(id).to_string()).collect()
}

#[test]
fn test_child_combinator_with_id_and_class() {
    let (doc, _, p_x, _) = spec_tree();
    let root = doc.document_node();
    let found = select("div#a > p.x", &doc, root).unwrap();
    assert_eq!(found, vec![p_x]);
}

#[test]
fn test_descendant_combinator_in_document_order() {
    let (doc, _, p_x, p_y) = spec_tree();
    let root = doc.document_node();
    let found = select("div p", &doc, root).unwrap();
    assert_eq!(found, vec![p_x, p_y]);
}

#[test]
fn test_nth_child_one() {
    let (doc, _, p_x, _) = spec_tree();
    let root = doc.document_node();
    let found = select("p:nth-child(1)", &doc, root).unwrap();
    assert_eq!(found, vec![p_x]);
}

#[test]
fn test_union_results_in_document_order() {
    let (doc, div_a, p_x, p_y) = spec_tree();
    let root = doc.document_node();
    // document order, independent of clause order in the query
    let found = select("p, div", &doc, root).unwrap();
    assert_eq!(found, vec![div_a, p_x, p_y]);
    let found = select("div, p", &doc, root).unwrap();
    assert_eq!(found, vec![div_a, p_x, p_y]);
}

#[test]
fn test_not_class() {
    let (doc, _, p_x, p_y) = spec_tree();
    let found = select_roots(":not(.x)", &doc, &[p_x, p_y]).unwrap();
    assert_eq!(found, vec![p_y]);

    let (doc, div_a, _, p_y) = spec_tree();
    let found = select("p:not(.x)", &doc, div_a).unwrap();
    assert_eq!(found, vec![p_y]);
}

fn five_paragraphs() -> (Document, Vec<NodeId>) {
    let mut doc = Document::new();
    let div = doc.create_element("div");
    doc.append_child(doc.document_node(), div);
    let ps: Vec<NodeId> = (0..5)
        .map(|_| {
            let p = doc.create_element("p");
            doc.append_child(div, p);
            p
        })
        .collect();
    (doc, ps)
}

#[test]
fn test_nth_child_formulas() {
    let (doc, ps) = five_paragraphs();
    let root = doc.document_node();

    let odd = select("p:nth-child(2n+1)", &doc, root).unwrap();
    assert_eq!(odd, vec![ps[0], ps[2], ps[4]], "2n+1 selects 1,3,5");

    let even = select("p:nth-child(even)", &doc, root).unwrap();
    assert_eq!(even, vec![ps[1], ps[3]], "even selects 2,4");

    let last_two = select("p:nth-last-child(-n+2)", &doc, root).unwrap();
    assert_eq!(last_two, vec![ps[3], ps[4]]);
}

#[test]
fn test_index_pseudo_classes() {
    let (doc, ps) = five_paragraphs();
    let root = doc.document_node();

    assert_eq!(select("p:eq(0)", &doc, root).unwrap(), vec![ps[0]]);
    assert_eq!(select("p:lt(2)", &doc, root).unwrap(), vec![ps[0], ps[1]]);
    assert_eq!(
        select("p:gt(2)", &doc, root).unwrap(),
        vec![ps[3], ps[4]]
    );

    // :lt never reports the evaluation root itself
    let from_first = select("p:lt(2)", &doc, ps[0]).unwrap();
    assert!(from_first.is_empty());
}

#[test]
fn test_select_first_agrees_with_select() {
    let (doc, ps) = five_paragraphs();
    let root = doc.document_node();

    assert_eq!(select_first("p", &doc, root).unwrap(), Some(ps[0]));
    assert_eq!(select_first("p:eq(3)", &doc, root).unwrap(), Some(ps[3]));
    assert_eq!(select_first("span", &doc, root).unwrap(), None);
    assert!(select("span", &doc, root).unwrap().is_empty());
}

#[test]
fn test_multi_root_deduplication() {
    let (doc, div_a, p_x, p_y) = spec_tree();
    let root = doc.document_node();

    // p.x reachable from both the document root and div#a: emitted once,
    // at its first-encountered position
    let found = select_roots("p", &doc, &[root, div_a]).unwrap();
    assert_eq!(found, vec![p_x, p_y]);

    let found = select_roots("*", &doc, &[div_a, p_y]).unwrap();
    assert_eq!(names(&doc, &found), ["div", "p", "p"]);
}

#[test]
fn test_attribute_selectors() {
    let mut doc = Document::new();
    let body = doc.create_element("body");
    doc.append_child(doc.document_node(), body);
    let a1 = doc.create_element_with("a", &[("href", "http://example.com/one.png")]);
    doc.append_child(body, a1);
    let a2 = doc.create_element_with("a", &[("href", "https://example.org/two.html"), ("rel", "nofollow")]);
    doc.append_child(body, a2);
    let a3 = doc.create_element_with("a", &[("data-kind", "x")]);
    doc.append_child(body, a3);
    let root = doc.document_node();

    assert_eq!(select("a[href]", &doc, root).unwrap(), vec![a1, a2]);
    assert_eq!(select("a[^data-]", &doc, root).unwrap(), vec![a3]);
    assert_eq!(
        select("a[href=http://example.com/one.png]", &doc, root).unwrap(),
        vec![a1]
    );
    assert_eq!(select("a[href^=HTTP:]", &doc, root).unwrap(), vec![a1]);
    assert_eq!(select("a[href$=.html]", &doc, root).unwrap(), vec![a2]);
    assert_eq!(select("a[href*=example]", &doc, root).unwrap(), vec![a1, a2]);
    assert_eq!(select("a[rel!=nofollow]", &doc, root).unwrap(), vec![a1, a3]);
    assert_eq!(
        select(r"a[href~=(?i)\.(png|jpe?g)]", &doc, root).unwrap(),
        vec![a1]
    );
}

#[test]
fn test_sibling_combinators() {
    let mut doc = Document::new();
    let div = doc.create_element("div");
    doc.append_child(doc.document_node(), div);
    let h1 = doc.create_element("h1");
    doc.append_child(div, h1);
    let p1 = doc.create_element("p");
    doc.append_child(div, p1);
    let p2 = doc.create_element("p");
    doc.append_child(div, p2);
    let root = doc.document_node();

    assert_eq!(select("h1 + p", &doc, root).unwrap(), vec![p1]);
    assert_eq!(select("h1 ~ p", &doc, root).unwrap(), vec![p1, p2]);
    assert_eq!(select("p + p", &doc, root).unwrap(), vec![p2]);
}

#[test]
fn test_has_and_not() {
    let (doc, div_a, p_x, _) = spec_tree();
    let root = doc.document_node();

    assert_eq!(select("div:has(p)", &doc, root).unwrap(), vec![div_a]);
    assert_eq!(select("div:has(.x)", &doc, root).unwrap(), vec![div_a]);
    assert!(select("p:has(p)", &doc, root).unwrap().is_empty());
    assert_eq!(
        select("body :not(p)", &doc, root).unwrap(),
        vec![div_a]
    );
    assert_eq!(select("div:has(> p.x)", &doc, root).unwrap(), vec![div_a]);
    let _ = p_x;
}

#[test]
fn test_text_pseudo_classes() {
    let mut doc = Document::new();
    let div = doc.create_element("div");
    doc.append_child(doc.document_node(), div);
    let p1 = doc.create_element("p");
    doc.append_child(div, p1);
    let t = doc.create_text("Hello  there");
    doc.append_child(p1, t);
    let p2 = doc.create_element("p");
    doc.append_child(div, p2);
    let b = doc.create_element("b");
    doc.append_child(p2, b);
    let t = doc.create_text("General");
    doc.append_child(b, t);
    let root = doc.document_node();

    // combined text descends; own text does not
    assert_eq!(select("p:contains(hello)", &doc, root).unwrap(), vec![p1]);
    assert_eq!(select("p:contains(general)", &doc, root).unwrap(), vec![p2]);
    assert!(select("p:containsOwn(general)", &doc, root)
        .unwrap()
        .is_empty());
    assert_eq!(select("b:containsOwn(general)", &doc, root).unwrap(), vec![b]);

    // whitespace-normalized for :contains, exact for :containsWholeText
    assert_eq!(select("p:contains(hello there)", &doc, root).unwrap(), vec![p1]);
    assert!(select("p:containsWholeText(hello there)", &doc, root)
        .unwrap()
        .is_empty());
    assert_eq!(
        select("p:containsWholeText(Hello  there)", &doc, root).unwrap(),
        vec![p1]
    );

    // regex matching is case-sensitive unless the pattern opts out
    assert!(select("p:matches(hello)", &doc, root).unwrap().is_empty());
    assert_eq!(select("p:matches((?i)hello)", &doc, root).unwrap(), vec![p1]);
    assert_eq!(select(r"p:matchesOwn(\bHello\b)", &doc, root).unwrap(), vec![p1]);
}

#[test]
fn test_contains_data() {
    let mut doc = Document::new();
    let script = doc.create_element("script");
    doc.append_child(doc.document_node(), script);
    let d = doc.create_data("var answer = 42;");
    doc.append_child(script, d);
    let root = doc.document_node();

    assert_eq!(
        select("script:containsData(answer)", &doc, root).unwrap(),
        vec![script]
    );
    assert!(select("script:contains(answer)", &doc, root)
        .unwrap()
        .is_empty());
}

#[test]
fn test_structural_pseudo_classes() {
    let mut doc = Document::new();
    let html = doc.create_element("html");
    doc.append_child(doc.document_node(), html);
    let body = doc.create_element("body");
    doc.append_child(html, body);
    let h1 = doc.create_element("h1");
    doc.append_child(body, h1);
    let p1 = doc.create_element("p");
    doc.append_child(body, p1);
    let p2 = doc.create_element("p");
    doc.append_child(body, p2);
    let empty = doc.create_element("hr");
    doc.append_child(body, empty);
    // comments and xml declarations do not disqualify :empty, text does
    let comment = doc.create_comment(" placeholder ");
    doc.append_child(p1, comment);
    let decl = doc.create_xml_decl("xml version=\"1.0\"");
    doc.append_child(p1, decl);
    let filler = doc.create_text("filler");
    doc.append_child(p2, filler);
    let root = doc.document_node();

    assert_eq!(select(":root", &doc, root).unwrap(), vec![html]);
    assert_eq!(select("body :first-child", &doc, root).unwrap(), vec![h1]);
    assert_eq!(select("body :last-child", &doc, root).unwrap(), vec![empty]);
    assert_eq!(select("p:first-of-type", &doc, root).unwrap(), vec![p1]);
    assert_eq!(select("p:last-of-type", &doc, root).unwrap(), vec![p2]);
    assert_eq!(select("h1:only-of-type", &doc, root).unwrap(), vec![h1]);
    assert!(select("p:only-of-type", &doc, root).unwrap().is_empty());
    assert_eq!(
        select("body :empty", &doc, root).unwrap(),
        vec![h1, p1, empty]
    );
}

#[test]
fn test_leading_combinator_binds_to_root() {
    let (doc, div_a, p_x, p_y) = spec_tree();

    // query evaluated relative to div#a: "> p" are its direct children
    assert_eq!(select("> p", &doc, div_a).unwrap(), vec![p_x, p_y]);
    assert!(select("> div", &doc, div_a).unwrap().is_empty());
}

#[test]
fn test_leading_combinator_from_document_node() {
    let (doc, _, _, _) = spec_tree();
    let root = doc.document_node();
    let html = doc.root_element().unwrap();

    // the document node is a valid left-hand side for a leading combinator
    assert_eq!(select("> *", &doc, root).unwrap(), vec![html]);
    assert_eq!(select("> html", &doc, root).unwrap(), vec![html]);
    // descendant form reaches the whole tree
    assert_eq!(names(&doc, &select("*", &doc, root).unwrap()).len(), 5);
}

#[test]
fn test_compiled_query_reuse() {
    let query = Query::parse("div > p").unwrap();
    let (doc_a, _, p_x, p_y) = spec_tree();
    let (doc_b, _, q_x, q_y) = spec_tree();

    assert_eq!(
        sift_select::select_with(&query, &doc_a, doc_a.document_node()),
        vec![p_x, p_y]
    );
    assert_eq!(
        sift_select::select_with(&query, &doc_b, doc_b.document_node()),
        vec![q_x, q_y]
    );
}

#[test]
fn test_parse_is_deterministic() {
    let (doc, ..) = spec_tree();
    let root = doc.document_node();
    for query in ["div#a > p.x", "p, div", "div :not(.x)", "p:nth-child(2n+1)"] {
        let a = select(query, &doc, root).unwrap();
        let b = select(query, &doc, root).unwrap();
        assert_eq!(a, b, "two parses of {query:?} must agree");
    }
}

#[test]
fn test_union_has_lowest_precedence() {
    let mut doc = Document::new();
    let body = doc.create_element("body");
    doc.append_child(doc.document_node(), body);
    let div = doc.create_element("div");
    doc.append_child(body, div);
    let span_in_div = doc.create_element("span");
    doc.append_child(div, span_in_div);
    let em = doc.create_element("em");
    doc.append_child(body, em);
    let span_in_em = doc.create_element("em");
    doc.append_child(em, span_in_em);
    let root = doc.document_node();

    // "em, div span" is (em) OR (div span), not (em, div) span
    let found = select("em, div span", &doc, root).unwrap();
    assert_eq!(found, vec![span_in_div, em, span_in_em]);

    // the combinator after the comma extends only the last clause
    let found = select("div, body > em", &doc, root).unwrap();
    assert_eq!(found, vec![div, em]);
}

#[test]
fn test_wildcard_namespace() {
    let mut doc = Document::new();
    let body = doc.create_element("body");
    doc.append_child(doc.document_node(), body);
    let plain = doc.create_element("name");
    doc.append_child(body, plain);
    let namespaced = doc.create_element("fb:name");
    doc.append_child(body, namespaced);
    let root = doc.document_node();

    assert_eq!(
        select("*|name", &doc, root).unwrap(),
        vec![plain, namespaced]
    );
    assert_eq!(select("fb|name", &doc, root).unwrap(), vec![namespaced]);
    assert_eq!(select("name", &doc, root).unwrap(), vec![plain]);
}
