/// Integration tests for xmlvalue-core
///
/// These tests verify:
/// 1. Tree shape produced from real markup
/// 2. Query behavior over built documents
/// 3. Error propagation and file loading

use rayon::prelude::*;
use serde_json::{json, Value};
use std::io::Write;
use xmlvalue_core::{
    parse_file, parse_html, parse_str, parse_str_with_options, Document, Node, ParseError,
    ParseOptions, Query,
};

fn parse(xml: &str) -> Document {
    parse_str(xml).expect("Should parse XML")
}

fn names<'a>(nodes: impl IntoIterator<Item = Node<'a>>) -> Vec<&'a str> {
    nodes.into_iter().map(|n| n.name().unwrap_or("")).collect()
}

#[test]
fn test_repeated_siblings_and_get_one() {
    let doc = parse(r#"<a><b x="1"/><b x="2"/></a>"#);
    let root = doc.root();

    assert_eq!(root.name(), Some("a"));
    let children: Vec<Node<'_>> = root.elements().collect();
    assert_eq!(names(children.iter().copied()), vec!["b", "b"]);
    assert_eq!(doc.value()["elements"][0]["attributes"], json!({"x": "1"}));
    assert_eq!(doc.value()["elements"][1]["attributes"], json!({"x": "2"}));

    let second = root.get_one(&Query::new("b").with_attribute("x", "2"));
    assert_eq!(second, children[1]);
}

#[test]
fn test_mixed_content_keeps_document_order() {
    let doc = parse("<a>hello<b/>world</a>");
    assert_eq!(
        doc.value(),
        &json!({
            "name": "a",
            "content": "hello",
            "elements": [
                {"name": "b"},
                {"name": "content", "content": "world"}
            ]
        })
    );
}

#[test]
fn test_children_follow_document_order() {
    let doc = parse("<r><z/><y/><x><w/></x><v/></r>");
    assert_eq!(names(doc.root().elements()), vec!["z", "y", "x", "v"]);
}

#[test]
fn test_indented_document_has_no_whitespace_content() {
    let xml = r#"
<catalog>
    <book id="b1">
        <title>Dune</title>
        <empty>   </empty>
    </book>
    <book id="b2">
        <title>Emma</title>
    </book>
</catalog>
"#;
    let doc = parse(xml);
    let root = doc.root();
    assert_eq!(root.content(), None);

    let books = root.get(&Query::new("book"));
    assert_eq!(books.len(), 2);
    for book in &books {
        assert_eq!(book.content(), None);
        // Whitespace after child elements never becomes a text node
        assert!(book.elements().all(|c| c.name() != Some("content")));
    }
    assert_eq!(books[0].get_one_named("empty").content(), None);
    assert_eq!(books[1].get_one_named("title").text().as_deref(), Some("Emma"));
}

#[test]
fn test_content_is_escape_encoded() {
    let doc = parse("<a>say \"hi\"\n\tnow</a>");
    assert_eq!(doc.root().content(), Some(r#"say \"hi\"\n\tnow"#));
    assert_eq!(doc.root().text().as_deref(), Some("say \"hi\"\n\tnow"));
}

#[test]
fn test_cdata_round_trips_as_bytes() {
    let doc = parse("<script><![CDATA[if (a < b) { run(); }]]></script>");
    assert_eq!(doc.root().cdata(), Some(b"if (a < b) { run(); }".to_vec()));
}

#[test]
fn test_non_recursive_results_are_not_nested() {
    let doc = parse("<r><s><s><s/></s></s><t><s/></t></r>");
    let found = doc.root().get(&Query::new("s"));
    assert_eq!(found.len(), 2);

    // No result may be a descendant of another result
    for outer in &found {
        let below = outer.get(&Query::new("s").with_recursive(true));
        for inner in &below[1..] {
            assert!(!found.iter().any(|f| std::ptr::eq(f.value(), inner.value())));
        }
    }

    let all = doc.root().get(&Query::new("s").with_recursive(true));
    assert_eq!(all.len(), 4);
}

#[test]
fn test_max_is_prefix_of_unbounded() {
    let doc = parse("<r><i n='1'/><g><i n='2'/><i n='3'/></g><i n='4'/></r>");
    let all = doc.root().get(&Query::new("i"));
    assert_eq!(all.len(), 4);
    for k in 0..=5 {
        let bounded = doc.root().get(&Query::new("i").with_max(k));
        assert!(bounded.len() <= k);
        assert_eq!(bounded[..], all[..bounded.len()]);
    }
}

#[test]
fn test_get_one_equals_first_of_bounded_get() {
    let doc = parse("<r><i n='1'/><i n='2'/></r>");
    let root = doc.root();
    let query = Query::new("i").with_attribute("n", 2);
    let first = root.get(&query.clone().with_max(1));
    assert_eq!(root.get_one(&query), first[0]);
    assert!(root.get_one_named("nope").is_empty());
}

#[test]
fn test_missing_name_returns_empty() {
    let doc = parse("<a><b/></a>");
    assert!(doc.root().get(&Query::new("missing")).is_empty());
    assert!(doc
        .root()
        .get(&Query::new("b").with_attribute("x", "never"))
        .is_empty());
}

#[test]
fn test_tokenizer_error_returns_no_tree() {
    let result = parse_str("<a><b>unterminated</a>");
    match result {
        Err(ParseError::Tokenizer(e)) => assert!(!e.message.is_empty()),
        other => panic!("expected tokenizer error, got {:?}", other),
    }
}

#[test]
fn test_namespace_processing() {
    let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom" xmlns:m="urn:m"><m:entry id="1"/></feed>"#;

    let plain = parse(xml);
    assert_eq!(plain.root().get_one_named("m:entry").attribute("id"), Some("1"));
    assert!(plain.root().attribute("xmlns").is_some());

    let options = ParseOptions::new().with_namespaces(true);
    let doc = parse_str_with_options(xml, &options).unwrap();
    let root = doc.root();
    assert_eq!(root.namespace_uri(), Some("http://www.w3.org/2005/Atom"));
    assert_eq!(root.attributes(), None);
    let entry = root.get_one_named("entry");
    assert_eq!(entry.namespace_uri(), Some("urn:m"));
    assert_eq!(entry.qualified_name(), Some("m:entry"));
}

#[test]
fn test_html_document() {
    let html = "<!DOCTYPE html>\n<html><head><meta charset=utf-8><title>T</title></head>\
                <body><p class=intro>Hi<br>there</p><p>x\u{1}y</body></html>";
    let doc = parse_html(html).expect("Should parse HTML");
    let root = doc.root();

    let intro = root.get_one(&Query::new("p").with_attribute("class", "intro"));
    assert_eq!(intro.content(), Some("Hi"));
    assert_eq!(names(intro.elements()), vec!["br", "content"]);

    let paragraphs = root.get(&Query::new("p"));
    assert_eq!(paragraphs.len(), 2);
    assert_eq!(paragraphs[1].content(), Some("xy"));
}

#[test]
fn test_parse_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "<config><item key=\"a\">1</item></config>").unwrap();

    let doc = parse_file(file.path()).expect("Should parse file");
    let item = doc.root().get_one(&Query::new("item").with_attribute("key", "a"));
    assert_eq!(item.content(), Some("1"));

    let err = parse_file(std::path::Path::new("/nonexistent/file.xml")).unwrap_err();
    assert!(matches!(err, ParseError::FileRead(_)));
}

#[test]
fn test_concurrent_readers_share_one_tree() {
    let mut xml = String::from("<r>");
    for i in 0..200 {
        xml.push_str(&format!("<i n=\"{}\"><v>{}</v></i>", i, i * 2));
    }
    xml.push_str("</r>");
    let doc = parse(&xml);

    let values: Vec<String> = (0..200usize)
        .into_par_iter()
        .map(|i| {
            let item = doc.root().get_one(&Query::new("i").with_attribute("n", i as u64));
            item.get_one_named("v").content().unwrap_or_default().to_string()
        })
        .collect();

    for (i, v) in values.iter().enumerate() {
        assert_eq!(v, &(i * 2).to_string());
    }
}

#[test]
fn test_independent_parses_in_parallel() {
    let inputs: Vec<String> = (0..32).map(|i| format!("<a><b>{}</b><b/></a>", i)).collect();
    let docs: Vec<Value> = inputs
        .par_iter()
        .map(|xml| parse_str(xml).unwrap().into_value())
        .collect();
    for (i, doc) in docs.iter().enumerate() {
        assert_eq!(doc["elements"][0]["content"], json!(i.to_string()));
        assert_eq!(doc["elements"].as_array().unwrap().len(), 2);
    }
}

#[test]
fn test_long_numeric_ids_match_exactly() {
    let doc = parse(r#"<r><o id="12345678901234567891"/><o id="18446744073709551615"/></r>"#);
    let root = doc.root();

    let near_miss = root.get_one(&Query::new("o").with_attribute("id", "12345678901234567890"));
    assert!(near_miss.is_empty());

    let exact = root.get_one(&Query::new("o").with_attribute("id", "12345678901234567891"));
    assert_eq!(exact.attribute("id"), Some("12345678901234567891"));

    let widest = root.get_one(&Query::new("o").with_attribute("id", u64::MAX));
    assert_eq!(widest.attribute("id"), Some("18446744073709551615"));
}
