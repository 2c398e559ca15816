//! Integration tests for loading documents into a registry
//!
//! These tests run complete documents through translation and compilation and
//! match the resulting patterns against real input.

use regexml::{
    DocumentError, EmbeddedResource, ExpressionRegistry, FileResource, LoadOptions, RegexmlError,
    SchemaError,
};

fn data_path(name: &str) -> String {
    format!("{}/tests/data/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn load_examples() -> ExpressionRegistry {
    ExpressionRegistry::load_with(
        &FileResource::new(data_path("expressions.xml")),
        LoadOptions::validated(),
    )
    .unwrap()
}

fn captures(registry: &ExpressionRegistry, id: &str, input: &str) -> Vec<Option<String>> {
    let caps = registry
        .get_pattern(id)
        .unwrap()
        .captures(input)
        .unwrap()
        .unwrap_or_else(|| panic!("{} did not match {}", id, input));
    (1..caps.len())
        .map(|i| caps.get(i).map(|m| m.as_str().to_string()))
        .collect()
}

fn some(values: &[&str]) -> Vec<Option<String>> {
    values.iter().map(|v| Some(v.to_string())).collect()
}

#[test]
fn test_phone_number() {
    let registry = load_examples();
    let phone = registry.get_expression("phone").unwrap();
    assert_eq!(phone.as_str(), "^\\((\\d{3})\\) (\\d{3})-(\\d{4})$");
    assert_eq!(
        captures(&registry, "phone", "(801) 796-3438"),
        some(&["801", "796", "3438"])
    );
    assert!(!phone.pattern().is_match("801-796-3438").unwrap());
}

#[test]
fn test_url() {
    let registry = load_examples();
    let url = registry.get_expression("url").unwrap();
    assert_eq!(
        url.as_str(),
        "^([a-z]+)://([^:/?#]+)(?::(\\d+))?(/[^?#]*)(?:\\?([^#]*))?(?:#(.*))?$"
    );
    assert!(url.flags().ignore_case);
    assert_eq!(
        captures(&registry, "url", "http://www.regexml.org:8080/test?param=1#anchor"),
        some(&["http", "www.regexml.org", "8080", "/test", "param=1", "anchor"])
    );
}

#[test]
fn test_url_ignores_case_and_optional_parts() {
    let registry = load_examples();
    let groups = captures(&registry, "url", "HTTPS://example.com/");
    assert_eq!(
        groups,
        vec![
            Some("HTTPS".to_string()),
            Some("example.com".to_string()),
            None,
            Some("/".to_string()),
            None,
            None,
        ]
    );
}

#[test]
fn test_zipcode() {
    let registry = load_examples();
    assert_eq!(
        registry.get_expression("zipcode").unwrap().as_str(),
        "^(\\d{5})(?:-(\\d{4}))?$"
    );
    assert_eq!(
        captures(&registry, "zipcode", "98765-4321"),
        some(&["98765", "4321"])
    );
    assert_eq!(
        captures(&registry, "zipcode", "98765"),
        vec![Some("98765".to_string()), None]
    );
}

#[test]
fn test_alternation_and_lookbehind() {
    let registry = load_examples();
    assert_eq!(
        registry.get_expression("color").unwrap().as_str(),
        "(red|green|blue)"
    );
    assert_eq!(captures(&registry, "color", "light blue"), some(&["blue"]));

    assert_eq!(
        registry.get_expression("price").unwrap().as_str(),
        "(?<=\\$)(\\d+)(?:\\.\\d{2})?"
    );
    assert_eq!(captures(&registry, "price", "costs $42.50"), some(&["42"]));
    assert!(!registry.get_pattern("price").unwrap().is_match("costs 42").unwrap());
}

#[test]
fn test_class_intersection_compiles() {
    let xml = r#"<regexml>
        <expression id="not-four">
            <start/>
            <match equals="[0-9]" except="[4]"/>
            <end/>
        </expression>
    </regexml>"#;
    let registry = ExpressionRegistry::from_xml("intersection.xml", xml).unwrap();
    let pattern = registry.get_pattern("not-four").unwrap();

    assert_eq!(registry.get_expression("not-four").unwrap().as_str(), "^[0-9&&[^4]]$");
    assert!(pattern.is_match("3").unwrap());
    assert!(!pattern.is_match("4").unwrap());
    assert!(!pattern.is_match("x").unwrap());
}

#[test]
fn test_quantified_class_sequence() {
    let xml = r#"<regexml>
        <expression id="pairs">
            <start/>
            <match equals="[0-9][a-z]" min="2" max="2"/>
            <end/>
        </expression>
        <expression id="either">
            <match equals="[ab]|[cd]" min="0" max="1"/>
        </expression>
    </regexml>"#;
    let registry = ExpressionRegistry::from_xml("sequence.xml", xml).unwrap();

    let pairs = registry.get_pattern("pairs").unwrap();
    assert!(pairs.is_match("1a2b").unwrap());
    assert!(!pairs.is_match("12ab").unwrap());

    // the bar is literal text, not an alternation
    let either = registry.get_pattern("either").unwrap();
    assert_eq!(either.find("a|c").unwrap().unwrap().as_str(), "a|c");
}

#[test]
fn test_ids_in_document_order() {
    let registry = load_examples();
    assert_eq!(
        registry.ids().collect::<Vec<_>>(),
        vec!["phone", "url", "zipcode", "color", "price"]
    );
}

#[test]
fn test_loading_is_deterministic() {
    let first = load_examples();
    let resource = FileResource::new(data_path("expressions.xml"));
    let second = ExpressionRegistry::load(&resource).unwrap();

    assert_eq!(first.len(), second.len());
    for expression in &first {
        let other = second.get_expression(expression.id()).unwrap();
        assert_eq!(expression.as_str(), other.as_str());
        assert_eq!(expression.flags(), other.flags());
    }
}

#[test]
fn test_unknown_id() {
    let registry = load_examples();
    assert_eq!(
        registry.get_pattern("ssn").unwrap_err(),
        RegexmlError::ExpressionNotFound("ssn".to_string())
    );
}

#[test]
fn test_missing_file() {
    let err = ExpressionRegistry::load(&FileResource::new(data_path("missing.xml"))).unwrap_err();
    assert!(matches!(err, RegexmlError::ResourceNotFound { .. }));
}

#[test]
fn test_unclosed_group_is_malformed() {
    // the XML is well formed; the group end is simply never reached before the expression closes
    let events = vec![
        regexml::Event::start("regexml", vec![]),
        regexml::Event::start(
            "expression",
            vec![regexml::Attribute::new("id", "broken")],
        ),
        regexml::Event::start("group", vec![]),
        regexml::Event::start("match", vec![regexml::Attribute::new("equals", "a")]),
        regexml::Event::end("match"),
        regexml::Event::end("expression"),
    ];
    let err = regexml::Translator::new()
        .translate(&mut std::collections::VecDeque::from(events))
        .unwrap_err();
    assert_eq!(
        err,
        RegexmlError::MalformedDocument(DocumentError::UnclosedGroup {
            id: "broken".to_string(),
            depth: 1,
        })
    );
}

#[test]
fn test_mismatched_xml_is_malformed() {
    let xml = r#"<regexml>
        <expression id="broken"><group><match equals="a"/></expression>
    </regexml>"#;
    let err = ExpressionRegistry::from_xml("broken.xml", xml).unwrap_err();
    assert!(matches!(
        err,
        RegexmlError::MalformedDocument(DocumentError::Xml(_))
    ));
}

#[test]
fn test_failed_load_returns_no_registry() {
    let xml = r#"<regexml>
        <expression id="good"><match equals="a"/></expression>
        <expression id="bad"><match equals="a" min="lots"/></expression>
    </regexml>"#;
    assert!(ExpressionRegistry::from_xml("partial.xml", xml).is_err());
}

#[test]
fn test_schema_validation_failure() {
    let resource = EmbeddedResource::new(
        "invalid.xml",
        r#"<regexml><expression id="x"><match equals="a" greedy="false"/></expression></regexml>"#,
    );
    let err = ExpressionRegistry::load_with(&resource, LoadOptions::validated()).unwrap_err();
    assert_eq!(
        err,
        RegexmlError::SchemaValidation {
            name: "invalid.xml".to_string(),
            source: SchemaError::UnknownAttribute {
                element: "match".to_string(),
                attribute: "greedy".to_string(),
            },
        }
    );

    // without validation the unknown attribute is ignored
    let registry = ExpressionRegistry::load(&resource).unwrap();
    assert_eq!(registry.get_expression("x").unwrap().as_str(), "a");
}

#[test]
fn test_embedded_resource() {
    let resource = EmbeddedResource::new(
        "embedded",
        r#"<regexml autoEscape="false">
            <expression id="raw" dotMatchesLineBreaks="true">
                <match equals="a.+b" lazy="true"/>
            </expression>
        </regexml>"#,
    );
    let registry = ExpressionRegistry::load_with(&resource, LoadOptions::validated()).unwrap();
    let raw = registry.get_expression("raw").unwrap();
    assert_eq!(raw.as_str(), "a.+b");
    assert!(raw.pattern().is_match("a\n\nb").unwrap());
}

#[test]
fn test_registry_is_shareable_across_threads() {
    let registry = std::sync::Arc::new(load_examples());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let registry = std::sync::Arc::clone(&registry);
            std::thread::spawn(move || {
                registry
                    .get_pattern("zipcode")
                    .unwrap()
                    .is_match("12345")
                    .unwrap()
            })
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap());
    }
}
