//! Property-based tests for XML to JSON conversion
//!
//! These tests use proptest to verify:
//! 1. Arbitrary input never panics and always renders valid JSON
//! 2. Conversion is deterministic
//! 3. Generated element trees keep their structure

use proptest::prelude::*;
use xmljson::{number, xml_to_json, xml_to_value, Value};

/// A generated element: tag name plus either text or child elements
#[derive(Clone, Debug)]
enum Node {
    Text(String, String),
    Parent(String, Vec<Node>),
}

impl Node {
    fn name(&self) -> &str {
        match self {
            Self::Text(name, _) | Self::Parent(name, _) => name,
        }
    }

    fn to_xml(&self) -> String {
        match self {
            Self::Text(name, text) => format!("<{name}>{text}</{name}>"),
            Self::Parent(name, children) => {
                let inner: String = children.iter().map(Self::to_xml).collect();
                format!("<{name}>{inner}</{name}>")
            }
        }
    }
}

fn arb_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,3}"
}

fn arb_node() -> impl Strategy<Value = Node> {
    let leaf = (arb_name(), "[a-zA-Z][a-zA-Z ]{0,8}[a-zA-Z]")
        .prop_map(|(name, text)| Node::Text(name, text));

    leaf.prop_recursive(4, 64, 6, |inner| {
        (arb_name(), prop::collection::vec(inner, 1..6))
            .prop_map(|(name, children)| Node::Parent(name, children))
    })
}

/// Expected value, mirroring the aggregation rules
fn expected(node: &Node) -> Value {
    match node {
        Node::Text(_, text) => Value::from(text.trim()),
        Node::Parent(_, children) => {
            let mut obj = xmljson::Object::new();
            for child in children {
                obj = xmljson::convert::aggregate(obj, child.name(), expected(child));
            }
            Value::Object(obj)
        }
    }
}

proptest! {
    /// Any input renders to valid JSON without panicking
    #[test]
    fn arbitrary_input_renders_json(s in "\\PC{0,64}") {
        let output = xml_to_json(&s);
        prop_assert!(serde_json::from_str::<serde_json::Value>(&output).is_ok());
    }

    /// Markup-heavy input renders to valid JSON without panicking
    #[test]
    fn markup_soup_renders_json(s in "[<>/a-c!?\\-\\[\\]&;# =\"']{0,48}") {
        let output = xml_to_json(&s);
        prop_assert!(serde_json::from_str::<serde_json::Value>(&output).is_ok());
    }

    /// Converting the same document twice yields identical output
    #[test]
    fn conversion_is_deterministic(node in arb_node()) {
        let xml = node.to_xml();
        prop_assert_eq!(xml_to_json(&xml), xml_to_json(&xml));
    }

    /// Generated trees convert to the structure the aggregation rules predict
    #[test]
    fn generated_trees_keep_structure(node in arb_node()) {
        let xml = node.to_xml();
        let value = xml_to_value(&xml);
        let mut wrapper = xmljson::Object::new();
        wrapper.insert(node.name(), expected(&node));
        prop_assert_eq!(value.ok(), Some(Value::Object(wrapper)));
    }

    /// Integer text becomes the same number
    #[test]
    fn integer_text_becomes_number(n in any::<i32>()) {
        let value = xml_to_value(&format!("<n> {n} </n>"));
        let mut wrapper = xmljson::Object::new();
        wrapper.insert("n", n);
        prop_assert_eq!(value.ok(), Some(Value::Object(wrapper)));
    }

    /// Formatted numbers read back as the same f64
    #[test]
    fn formatted_numbers_round_trip(f in any::<f64>().prop_filter("finite", |f| f.is_finite())) {
        let text = number::format(f);
        let parsed: f64 = text.parse().map_err(|e: std::num::ParseFloatError| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(parsed, f);
    }
}
