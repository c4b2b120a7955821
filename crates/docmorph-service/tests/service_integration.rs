//! End-to-end tests for the processing service

use docmorph_converters::{JsonConverter, XmlConverter};
use docmorph_core::{CoerceType, ExtendedValue, JsonPathExtractor, Rule, RuleGroup};
use docmorph_service::{DataProcessingService, ExtractOptions, MemoryRuleGroupStore, ServiceError};
use num_bigint::BigInt;
use serde_json::json;

fn json_service() -> DataProcessingService {
    DataProcessingService::builder()
        .store(MemoryRuleGroupStore::new())
        .converter(JsonConverter::new())
        .extractor(JsonPathExtractor::new())
        .build()
        .unwrap()
}

fn empty_group(service: &DataProcessingService) {
    service
        .rule_group_set(RuleGroup::new("aaa", "aaa", vec![]))
        .unwrap();
}

#[test]
fn test_missing_rule_group() {
    let service = json_service();
    let err = service
        .extract("aaa", &[], &ExtractOptions::default())
        .unwrap_err();
    assert!(matches!(err, ServiceError::RuleGroupNotFound { ref id } if id == "aaa"));
}

#[test]
fn test_missing_mime_type() {
    let service = json_service();
    empty_group(&service);
    let err = service
        .extract("aaa", &[], &ExtractOptions::default())
        .unwrap_err();
    assert!(matches!(err, ServiceError::MimeTypeNotFound));
}

#[test]
fn test_missing_converter() {
    let service = json_service();
    empty_group(&service);
    let err = service
        .extract("aaa", &[0], &ExtractOptions::default())
        .unwrap_err();
    assert!(matches!(err, ServiceError::ConverterNotFound { ref mime_type } if mime_type == "text/plain"));
}

#[test]
fn test_empty_ruleset() {
    let service = json_service();
    empty_group(&service);
    let out = service
        .extract("aaa", br#"{"foo":"bar"}"#, &ExtractOptions::default())
        .unwrap();
    assert_eq!(out, json!({}));
}

#[test]
fn test_simple_ruleset() {
    let service = json_service();
    service
        .rule_group_set(RuleGroup::new("aaa", "aaa", vec![Rule::new("$.foo", "goo")]))
        .unwrap();
    let out = service
        .extract("aaa", br#"{"foo":"bar"}"#, &ExtractOptions::default())
        .unwrap();
    assert_eq!(out, json!({"goo": "bar"}));
}

#[test]
fn test_extended_coercion() {
    let service = json_service();
    service
        .rule_group_set(RuleGroup::new(
            "aaa",
            "aaa",
            vec![Rule::new("$.foo", "goo").with_coerce(CoerceType::BigInt)],
        ))
        .unwrap();
    let out = service
        .extract("aaa", br#"{"foo":0}"#, &ExtractOptions::default())
        .unwrap();
    assert_eq!(out, json!({"goo": {"@ext": "bigint", "value": "0"}}));

    match ExtendedValue::decode(&out["goo"]).unwrap() {
        ExtendedValue::BigInt(value) => assert_eq!(value, BigInt::from(0)),
        other => panic!("unexpected value: {other:?}"),
    }
}

#[test]
fn test_convert() {
    let service = json_service();
    let converted = service.convert(br#"{"foo":0}"#, None).unwrap();
    assert_eq!(converted.source_mime_type, "application/json");
    assert_eq!(converted.object, json!({"foo": 0}));
}

#[test]
fn test_convert_with_mime_override() {
    let service = DataProcessingService::with_defaults();
    let converted = service
        .convert(b"<a><b>1</b></a>", Some("text/xml"))
        .unwrap();
    assert_eq!(converted.source_mime_type, "text/xml");
    assert_eq!(converted.object, json!({"a": {"b": "1"}}));

    let err = service.convert(b"{}", Some("text/csv")).unwrap_err();
    assert!(matches!(err, ServiceError::ConverterNotFound { ref mime_type } if mime_type == "text/csv"));
}

#[test]
fn test_extract_xml_with_detection() {
    let service = DataProcessingService::builder()
        .converter(JsonConverter::new())
        .converter(XmlConverter::new())
        .extractor(JsonPathExtractor::new())
        .default_extractor("jsonpath")
        .build()
        .unwrap();
    service
        .rule_group_set(RuleGroup::new(
            "orders",
            "Orders",
            vec![
                Rule::new("$.orders.order[*]['$'].id", "orders").with_retain_path_depth(3),
                Rule::new("$.orders.order[*].qty", "orders")
                    .with_retain_path_depth(2)
                    .with_coerce(CoerceType::Integer),
            ],
        ))
        .unwrap();

    let xml = br#"<orders><order id="o1"><qty>2</qty></order><order id="o2"><qty>5</qty></order></orders>"#;
    let out = service
        .extract("orders", xml, &ExtractOptions::default())
        .unwrap();
    assert_eq!(
        out,
        json!({
            "orders": [
                {"$": {"id": "o1"}, "qty": 2},
                {"$": {"id": "o2"}, "qty": 5}
            ]
        })
    );
}

#[test]
fn test_conversion_failure_is_reported() {
    let service = json_service();
    empty_group(&service);
    let options = ExtractOptions::default().with_mime_type("application/json");
    let err = service.extract("aaa", b"{oops", &options).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Core(docmorph_core::Error::InvalidFormat { .. })
    ));
}

#[test]
fn test_invalid_rule_is_reported() {
    let service = json_service();
    service
        .rule_group_set(RuleGroup::new("bad", "Bad", vec![Rule::new("foo", "x")]))
        .unwrap();
    let err = service
        .extract("bad", b"{}", &ExtractOptions::default())
        .unwrap_err();
    match err {
        ServiceError::Core(docmorph_core::Error::InvalidRule { rule, .. }) => assert_eq!(rule, "foo"),
        other => panic!("unexpected error: {other:?}"),
    }
}
