use json_model::{Model, OpenEnum, OpenUnion};
use proptest::prelude::*;
use serde_json::{Map, Value};

json_model::wire_enum! {
    pub enum Kind {
        Alpha = "alpha",
        Beta = "beta",
    }
}

json_model::record! {
    pub struct Item {
        required id, set_id: String = "id";
        optional kind, set_kind: OpenEnum<Kind> = "kind";
    }
}

json_model::union_variants! {
    pub enum ItemOrText {
        Item(Item),
        Text(String),
    }
}

fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| serde_json::json!(n)),
        "[a-zA-Z0-9_ ]{0,20}".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::vec(("[a-z]{1,8}", inner), 0..6)
                .prop_map(|pairs| Value::Object(pairs.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

/// An object with `id` inserted at an arbitrary position among extra keys.
fn item_document() -> impl Strategy<Value = Value> {
    (
        prop::collection::vec(("x_[a-z]{1,8}", json_value()), 0..8),
        "[a-z0-9]{1,12}",
        any::<prop::sample::Index>(),
    )
        .prop_map(|(extra, id, at)| {
            let mut pairs: Vec<(String, Value)> = extra;
            let pos = at.index(pairs.len() + 1);
            pairs.insert(pos, ("id".to_string(), Value::String(id)));
            Value::Object(pairs.into_iter().collect())
        })
}

proptest! {
    /// Decode then encode reproduces the document, key order included.
    #[test]
    fn record_round_trip_preserves_text(doc in item_document()) {
        let item = Item::from_raw_unchecked(doc.clone()).unwrap();
        prop_assert_eq!(item.to_raw().to_string(), doc.to_string());
        prop_assert!(item.validate().is_ok());
        let again = Item::from_raw_unchecked(item.to_raw()).unwrap();
        prop_assert_eq!(again, item);
    }

    /// Any string survives an open enum, known or not.
    #[test]
    fn open_enum_reemits_any_string(s in "[a-zA-Z_]{0,16}") {
        let e: OpenEnum<Kind> = OpenEnum::from_raw(Value::String(s.clone()));
        prop_assert_eq!(e.to_raw(), Value::String(s.clone()));
        prop_assert_eq!(e.is_known(), s == "alpha" || s == "beta");
        prop_assert_eq!(e.validate().is_ok(), e.is_known());
    }

    /// Unions never fail to decode and always re-emit their input.
    #[test]
    fn open_union_reemits_any_value(v in json_value()) {
        let u: OpenUnion<ItemOrText> = OpenUnion::from_raw(v.clone());
        prop_assert_eq!(u.to_raw(), v);
        prop_assert_eq!(u.validate().is_ok(), u.is_matched());
    }
}
