use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use uri_pattern::{Parameters, UriPattern};

#[derive(Debug, Deserialize)]
struct TestSuite(BTreeMap<String, TestSection>);

#[derive(Debug, Deserialize)]
struct TestSection {
    #[serde(default)]
    variables: BTreeMap<String, VariableValue>,
    testcases: Vec<ExpandCase>,
    #[serde(default)]
    matching: Vec<MatchCase>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum VariableValue {
    String(String),
    Array(Vec<String>),
}

/// `[template, expected]`, where `false` means the template is invalid.
#[derive(Debug, Deserialize)]
struct ExpandCase(String, Expected);

/// `[template, uri, bindings]`, where `false` means the uri does not match.
#[derive(Debug, Deserialize)]
struct MatchCase(String, String, Expected);

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Expected {
    String(String),
    Bool(bool),
    Bindings(BTreeMap<String, String>),
}

fn load_test_suite(file_name: &str) -> TestSuite {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("data");
    path.push(file_name);

    let json =
        fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {}: {}", file_name, e));
    serde_json::from_str(&json).unwrap_or_else(|e| panic!("Failed to parse {}: {}", file_name, e))
}

fn to_parameters(variables: &BTreeMap<String, VariableValue>) -> Parameters {
    let mut params = Parameters::new();
    for (k, v) in variables {
        match v {
            VariableValue::String(s) => params.set(k.as_str(), s.as_str()),
            VariableValue::Array(a) => params.set_values(k.as_str(), a.iter().map(String::as_str)),
        };
    }
    params
}

#[test]
fn check_expansion() {
    let suite = load_test_suite("scenarios.json");
    for (section_name, section) in &suite.0 {
        println!("Testing section: {}", section_name);
        let params = to_parameters(&section.variables);
        for ExpandCase(template, expected) in &section.testcases {
            match expected {
                Expected::String(expected) => {
                    let pattern = UriPattern::new(template).unwrap_or_else(|e| {
                        panic!("Failed to parse `{}` in {}: {}", template, section_name, e)
                    });
                    let expanded = pattern.expand(&params);
                    assert_eq!(
                        &expanded, expected,
                        "expand `{}` in {}",
                        template, section_name
                    );
                    assert!(
                        pattern.matches(&expanded),
                        "`{}` does not match its own expansion `{}`",
                        template,
                        expanded
                    );
                }
                Expected::Bool(false) => {
                    assert!(
                        UriPattern::new(template).is_err(),
                        "Expected `{}` to be rejected in {}",
                        template,
                        section_name
                    );
                }
                other => panic!("Unexpected expectation {:?} in {}", other, section_name),
            }
        }
    }
}

#[test]
fn check_matching() {
    let suite = load_test_suite("scenarios.json");
    for (section_name, section) in &suite.0 {
        for MatchCase(template, uri, expected) in &section.matching {
            let pattern = UriPattern::new(template).unwrap_or_else(|e| {
                panic!("Failed to parse `{}` in {}: {}", template, section_name, e)
            });
            match expected {
                Expected::Bindings(bindings) => {
                    let result = pattern.resolve(uri);
                    assert!(
                        result.is_resolved(),
                        "`{}` should resolve `{}` in {}",
                        template,
                        uri,
                        section_name
                    );
                    assert_eq!(
                        result.bindings(),
                        bindings,
                        "resolve `{}` with `{}` in {}",
                        template,
                        uri,
                        section_name
                    );
                }
                Expected::Bool(false) => {
                    assert!(
                        !pattern.matches(uri),
                        "`{}` should not match `{}` in {}",
                        template,
                        uri,
                        section_name
                    );
                    assert!(!pattern.resolve(uri).is_resolved());
                }
                other => panic!("Unexpected expectation {:?} in {}", other, section_name),
            }
        }
    }
}

#[test]
fn test_suite_shape() {
    let suite = load_test_suite("scenarios.json");
    let substitution = suite.0.get("Substitution").expect("Substitution not found");
    assert!(matches!(
        &substitution.variables["bar"],
        VariableValue::String(s) if s == "fred"
    ));
    let first = &substitution.testcases[0];
    assert_eq!(first.0, "http://example.org/?q={bar}");
    assert!(matches!(&first.1, Expected::String(s) if s == "http://example.org/?q=fred"));
}
