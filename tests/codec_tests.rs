use rfc7951_data::{array, object, Tree, Value};
use yare::parameterized;

fn interfaces_tree() -> Tree {
    Tree::from_object(object! {
        "m:interfaces" => object! {
            "interface" => array![
                object! { "name" => "eth0", "ip" => "192.0.2.1" },
                object! { "name" => "eth1", "ip" => "192.0.2.2" },
            ],
        },
    })
}

#[parameterized(
    single_quotes = { "/m:interfaces/interface[name='eth0']/ip" },
    double_quotes_and_prefix = { "/m:interfaces/m:interface[name = \"eth0\"]/ip" },
    padded_predicate = { "/m:interfaces/interface[  name = 'eth0'  ]/ip" },
)]
fn quoting_variants_resolve_the_same_node(path: &str) {
    let tree = interfaces_tree();
    let id: rfc7951_data::InstanceId = path.parse().unwrap();
    assert_eq!(id.to_string(), "/m:interfaces/interface[name='eth0']/ip");
    assert_eq!(tree.at(path).unwrap(), Value::from("192.0.2.1"));
}

#[test]
fn tree_round_trips_through_the_codec() {
    let tree = Tree::from_object(object! {
        "module-v1:leaf" => "foo",
        "module-v1:leaf-list" => array![1, 2, 3, 4, 5, 6, 7],
        "module-v1:list" => array![
            object! { "key" => "foo", "objleaf" => "bar" },
            object! { "key" => "bar", "objleaf" => "baz" },
        ],
        "module-v1:container" => object! {
            "containerleaf" => "foo",
            "other-mod:imported" => 1,
        },
        "module-v1:empty" => Value::Empty,
        "module-v1:big" => 5_000_000_000u64,
        "module-v1:negative" => -12,
        "module-v1:ratio" => 0.5,
    });
    let bytes = tree.marshal().unwrap();
    let decoded = Tree::unmarshal(&bytes).unwrap();
    assert_eq!(decoded, tree, "diff: {}", tree.diff(&decoded));
}

#[test]
fn display_round_trips() {
    let tree = interfaces_tree();
    let text = tree.to_string();
    let decoded = Tree::unmarshal(text.as_bytes()).unwrap();
    assert_eq!(decoded, tree);
}

#[test]
fn empty_and_null_array_converge_after_decoding() {
    let a = Tree::from_object(object! { "m:leaf" => Value::Empty });
    let b = Tree::from_object(object! { "m:leaf" => array![Value::Null] });
    // In memory the two are distinct.
    assert_ne!(a, b);
    // Both marshal to the [null] literal, which decodes as the empty leaf.
    let a2 = Tree::unmarshal(&a.marshal().unwrap()).unwrap();
    let b2 = Tree::unmarshal(&b.marshal().unwrap()).unwrap();
    assert_eq!(a2, b2);
    assert_eq!(a2.at("/m:leaf").unwrap(), Value::Empty);
}

#[test]
fn module_prefixes_are_minimal_on_output() {
    let tree = Tree::from_object(object! {
        "module-v1:container" => object! {
            "leaf" => 1,
            "other:leaf" => 2,
            "nested" => object! { "deep" => 3 },
        },
    });
    let text = String::from_utf8(tree.marshal().unwrap()).unwrap();
    assert!(text.contains(r#""module-v1:container""#));
    assert!(text.contains(r#""leaf":1"#));
    assert!(text.contains(r#""other:leaf":2"#));
    assert!(text.contains(r#""nested""#));
    assert!(text.contains(r#""deep":3"#));
    assert!(!text.contains("module-v1:leaf"));
    assert!(!text.contains("module-v1:nested"));
}

#[test]
fn unmarshal_accepts_either_key_form() {
    let compact = Tree::unmarshal(br#"{"m:a":{"b":1}}"#).unwrap();
    let qualified = Tree::unmarshal(br#"{"m:a":{"m:b":1}}"#).unwrap();
    assert_eq!(compact, qualified);
    assert_eq!(compact.at("/m:a/b").unwrap(), Value::from(1));
    assert_eq!(compact.at("/m:a/m:b").unwrap(), Value::from(1));
}

#[test]
fn instance_id_values_marshal_as_strings() {
    let id: rfc7951_data::InstanceId = "/m:interfaces/interface[name='eth0']".parse().unwrap();
    let tree = Tree::new().assoc("/m:ref", Value::from(id)).unwrap();
    let text = String::from_utf8(tree.marshal().unwrap()).unwrap();
    assert!(text.contains(r#""m:ref":"/m:interfaces/interface[name='eth0']""#));
}

#[test]
fn sixty_four_bit_values_survive_the_round_trip() {
    let tree = Tree::from_object(object! {
        "m:u64" => u64::MAX,
        "m:i64" => i64::MIN,
        "m:f" => 2.25,
    });
    let decoded = Tree::unmarshal(&tree.marshal().unwrap()).unwrap();
    assert_eq!(decoded.at("/m:u64").unwrap(), Value::U64(u64::MAX));
    assert_eq!(decoded.at("/m:i64").unwrap(), Value::I64(i64::MIN));
    assert_eq!(decoded.at("/m:f").unwrap(), Value::F64(2.25));
}
