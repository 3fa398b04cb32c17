use meld_facts::digest::database_digest_v1;
use meld_facts::{parse_fact, parse_text, Fact, NameFilter, Scalar, Value};
use proptest::prelude::*;

fn predicate_name() -> impl Strategy<Value = String> {
    // A small pool so filters and repeated names actually overlap.
    prop_oneof![
        Just("edge".to_string()),
        Just("!edge".to_string()),
        Just("color".to_string()),
        Just("list-fact".to_string()),
        Just("+derived".to_string()),
        proptest::string::string_regex("[a-z][a-z0-9_-]{0,8}").unwrap(),
    ]
}

fn finite_float() -> impl Strategy<Value = f64> {
    prop_oneof![
        proptest::num::f64::NORMAL | proptest::num::f64::ZERO,
        (-1_000_000i64..1_000_000).prop_map(|v| v as f64 / 8.0),
    ]
}

fn scalar() -> impl Strategy<Value = Scalar> {
    prop_oneof![
        any::<i64>().prop_map(Scalar::NodeRef),
        any::<i64>().prop_map(Scalar::Int),
        finite_float().prop_map(Scalar::Float),
    ]
}

fn value() -> impl Strategy<Value = Value> {
    prop_oneof![
        scalar().prop_map(Value::from),
        proptest::collection::vec(scalar(), 0..5).prop_map(Value::List),
        // Starts with a letter so it never reads as a number.
        proptest::string::string_regex("[a-zA-Z][a-zA-Z0-9_-]{0,10}")
            .unwrap()
            .prop_map(Value::Text),
    ]
}

fn fact() -> impl Strategy<Value = Fact> {
    (predicate_name(), proptest::collection::vec(value(), 0..5))
        .prop_map(|(name, args)| Fact::new(name, args))
}

/// Dump text for a set of distinct nodes.
fn dump() -> impl Strategy<Value = String> {
    proptest::collection::btree_map(0i64..10_000, proptest::collection::vec(fact(), 0..5), 0..8)
        .prop_map(|nodes| {
            let mut text = String::new();
            for (node, facts) in nodes {
                text.push_str(&format!("{node}\n"));
                for fact in facts {
                    text.push_str(&fact.to_line());
                    text.push('\n');
                }
            }
            text
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn facts_roundtrip_format_and_parse(f in fact()) {
        let parsed = parse_fact(&f.to_line()).expect("parse");
        prop_assert_eq!(&parsed, &f);
        let parsed = parse_fact(&f.to_string()).expect("parse");
        prop_assert_eq!(parsed, f);
    }

    #[test]
    fn databases_roundtrip_through_dump_text(text in dump()) {
        let db = parse_text(&text, None).expect("parse");
        let again = parse_text(&db.to_string(), None).expect("reparse");
        prop_assert_eq!(again, db);
    }

    #[test]
    fn parsing_is_deterministic(text in dump()) {
        let a = parse_text(&text, None).expect("parse");
        let b = parse_text(&text, None).expect("parse");
        prop_assert_eq!(database_digest_v1(&a), database_digest_v1(&b));
        prop_assert_eq!(a, b);
    }

    #[test]
    fn filtering_keeps_exactly_the_named_subset(
        text in dump(),
        keep in proptest::collection::btree_set(predicate_name(), 0..4),
    ) {
        let filter: NameFilter = keep;
        let full = parse_text(&text, None).expect("parse");
        let filtered = parse_text(&text, Some(&filter)).expect("parse filtered");

        prop_assert_eq!(
            filtered.node_ids().collect::<Vec<_>>(),
            full.node_ids().collect::<Vec<_>>()
        );
        for (node, facts) in &full {
            let expected: Vec<Fact> = facts
                .iter()
                .filter(|f| filter.contains(&f.name))
                .cloned()
                .collect();
            prop_assert_eq!(filtered.get(node).expect("node kept"), expected.as_slice());
        }
    }
}
