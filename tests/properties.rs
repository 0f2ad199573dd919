use proptest::prelude::*;
use std::collections::BTreeMap;
use uri_pattern::{Parameters, UriPattern, decode, encode, minimal_encode};

const TEMPLATES: &[&str] = &[
    "http://example.org/{a}/{b}",
    "http://example.org/{a}{b}",
    "/{a,b}/x",
    "/x/{+a}/{b}",
    "/files{/a}{;b,c}",
    "/p{;a,b,c}/q{?d,e}",
    "/{a}/*",
    "{+a}{?b,c}",
    "/{@a}/{%b}{?@c}",
];

fn value() -> impl Strategy<Value = String> {
    "[ -~\u{00E0}-\u{00FF}\u{3042}]{0,12}"
}

fn bindings_for(pattern: &UriPattern, values: &[String]) -> Parameters {
    let mut params = Parameters::new();
    for (name, value) in pattern.var_names().zip(values.iter().cycle()) {
        params.set(name, value.as_str());
    }
    params
}

proptest! {
    /// Every expansion is accepted by the pattern it came from.
    #[test]
    fn expansion_matches_itself(
        index in 0..TEMPLATES.len(),
        values in prop::collection::vec(value(), 1..6),
    ) {
        let pattern = UriPattern::new(TEMPLATES[index]).unwrap();
        let params = bindings_for(&pattern, &values);
        let uri = pattern.expand(&params);
        prop_assert!(pattern.matches(&uri), "`{}` does not match `{}`", pattern, uri);
    }

    /// Resolving an expansion recovers the values of a resolvable pattern.
    #[test]
    fn resolve_round_trip(
        a in "[ -~]{0,12}",
        b in "[ -~]{1,12}",
        c in "[ -~]{0,12}",
    ) {
        let pattern = UriPattern::new("/r/{a}{/b}{?c}").unwrap();
        prop_assert!(pattern.is_resolvable());
        let vars = BTreeMap::from([("a", a.as_str()), ("b", b.as_str()), ("c", c.as_str())]);
        let uri = pattern.expand(&vars);
        let result = pattern.resolve(&uri);
        prop_assert!(result.is_resolved());
        prop_assert_eq!(result.get("a"), Some(a.as_str()));
        prop_assert_eq!(result.get("b"), Some(b.as_str()));
        prop_assert_eq!(result.get("c"), Some(c.as_str()));
    }

    #[test]
    fn encode_is_idempotent(s in "[ -~]*") {
        let encoded = encode(&s);
        prop_assert_eq!(encode(&decode(&encoded).unwrap()), encoded);
    }

    #[test]
    fn encode_is_unreserved(s in "\\PC*") {
        let encoded = encode(&s);
        prop_assert!(encoded.chars().all(|c| c.is_ascii_alphanumeric() || "-._~%".contains(c)));
        let minimal = minimal_encode(&s);
        prop_assert!(!minimal.contains(['?', '#', ' ']));
    }
}
