//! Example: run a selector against a small hand-built document.
//!
//! The compiled query is logged at debug level; run with
//! `RUST_LOG=sift_select=debug` to see it.

use sift_dom::Document;
use sift_select::{select_with, Query};

fn main() {
    tracing_subscriber::fmt::init();

    let arg = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "div > p.note".to_string());
    let query = match Query::parse(&arg) {
        Ok(query) => query,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    let mut doc = Document::new();
    let html = doc.create_element("html");
    doc.append_child(doc.document_node(), html);
    let body = doc.create_element("body");
    doc.append_child(html, body);
    let div = doc.create_element_with("div", &[("id", "content")]);
    doc.append_child(body, div);
    let p = doc.create_element_with("p", &[("class", "note")]);
    doc.append_child(div, p);
    let text = doc.create_text("Hello from sift");
    doc.append_child(p, text);

    println!("query: {query}");
    for id in select_with(&query, &doc, doc.document_node()) {
        println!("  <{}> {}", doc.normal_name(id), doc.text(id));
    }
}
