use rfc7951_data::{array, object, InstanceId, Value};
use yare::parameterized;

#[parameterized(
    plain = { "/ietf-interfaces:interfaces/interface[name='eth0']/ietf-ip:ipv4/ip" },
    repeated_prefix = { "/ietf-interfaces:interfaces/ietf-interfaces:interface[name='eth0']/ietf-ip:ipv4/ip" },
    tab_before_key = { "/ietf-interfaces:interfaces/interface[\tname='eth0']/ietf-ip:ipv4/ip" },
    tab_after_value = { "/ietf-interfaces:interfaces/interface[name='eth0'\t]/ietf-ip:ipv4/ip" },
    spaces_both_sides = { "/ietf-interfaces:interfaces/interface[  name='eth0'\t  ]/ietf-ip:ipv4/ip" },
    space_before_eq = { "/ietf-interfaces:interfaces/ietf-interfaces:interface[name ='eth0']/ietf-ip:ipv4/ip" },
    space_around_eq = { "/ietf-interfaces:interfaces/ietf-interfaces:interface[name = 'eth0']/ietf-ip:ipv4/ip" },
    tab_around_eq = { "/ietf-interfaces:interfaces/ietf-interfaces:interface[name\t= \t'eth0']/ietf-ip:ipv4/ip" },
    double_quotes = { "/ietf-interfaces:interfaces/interface[name=\"eth0\"]/ietf-ip:ipv4/ip" },
)]
fn quoting_and_whitespace_normalize(input: &str) {
    let id: InstanceId = input.parse().expect("should parse");
    assert_eq!(
        id.to_string(),
        "/ietf-interfaces:interfaces/interface[name='eth0']/ietf-ip:ipv4/ip"
    );
}

#[parameterized(
    double_quoted_value = { "/m:foo[id=\"bar\"]", "/m:foo[id='bar']" },
    multiple_predicates = { "/m:foo/bar[id=\"baz\"][id2=\"quux\"]", "/m:foo/bar[id='baz'][id2='quux']" },
    positional = { "/m:foo[0]", "/m:foo[0]" },
    dot_expression = { "/m:foo[.='123']", "/m:foo[.='123']" },
    slash_inside_value = { "/m:foo[id='a/b']/bar", "/m:foo[id='a/b']/bar" },
)]
fn canonical_form(input: &str, expected: &str) {
    let id: InstanceId = input.parse().expect("should parse");
    assert_eq!(id.to_string(), expected);
}

#[parameterized(
    no_prefix = { "/foo", "unable to determine prefix" },
    empty = { "", "must specify at least one node-identifier" },
    no_leading_slash = { "foo", "must start with a \"/\"" },
    bare_slash = { "/", "must specify at least one node-identifier" },
    unterminated_quote = { "/foo[id='foo]", "unterminated quote" },
    xml_prefix = { "/xml2:m", "invalid identifier, not allowed to start with xml: xml2" },
    bad_prefix_char = { "/foo?:m", "invalid node-identifier foo?:m" },
    bad_leading_char = { "/?foo:m", "invalid node-identifier ?foo:m" },
    nested_predicate = { "/m:foo[b[a='b']='c']", "nested predicates are not allowed" },
    unterminated_predicate = { "/m:foo[b='c'", "unterminated predicate" },
    missing_equals = { "/m:foo[b]", "invalid predicate expression b" },
    unquoted_value = { "/m:foo[b=c]", "invalid predicate, expected ''' or '\"'" },
)]
fn parse_failures(input: &str, reason: &str) {
    let err = input.parse::<InstanceId>().expect_err("should not parse");
    assert_eq!(err.to_string(), format!("invalid instance identifier: {reason}"));
}

#[parameterized(
    canonical = { "/ietf-interfaces:interfaces/interface[name='eth0']/ietf-ip:ipv4/ip" },
    predicates = { "/m:foo/bar[id='baz'][id2='quux']" },
    positional = { "/m:foo[0]" },
    dot = { "/m:foo[.='123']" },
)]
fn string_round_trip(input: &str) {
    let canonical = input.parse::<InstanceId>().unwrap().to_string();
    let reparsed = canonical.parse::<InstanceId>().unwrap().to_string();
    assert_eq!(canonical, reparsed);
}

fn fixture() -> Value {
    Value::Object(object! {
        "module-v1:foo" => object! {
            "bar" => object! {
                "baz" => array!["quux", "foo"],
                "quux" => "quuz",
            },
            "baz" => "quux",
            "v2:zzz" => "abc",
        },
        "module-v1:bar" => "baz",
        "module-v2:baz" => array![
            object! { "quux" => "foo", "baz" => "bar" },
            object! { "quux" => "bar", "baz" => "foo" },
            object! { "quux" => "bar", "baz" => "baz" },
        ],
    })
}

#[parameterized(
    leaf = { "/module-v1:foo/baz", Some("quux") },
    positional_leaf_list = { "/module-v1:foo/bar/baz[0]", Some("quux") },
    dot_expression = { "/module-v1:foo/bar/baz[.='foo']", Some("foo") },
    list_by_key = { "/module-v2:baz[quux='foo']/baz", Some("bar") },
    list_two_keys = { "/module-v2:baz[quux='foo'][baz='bar']/baz", Some("bar") },
    list_two_keys_other = { "/module-v2:baz[quux='bar'][baz='baz']/baz", Some("baz") },
    no_entry_matches_both = { "/module-v2:baz[quux='foo'][baz='foo']", None },
    unknown_key = { "/module-v2:baz[zuux='foo'][baz='foo']", None },
    unknown_key_descend = { "/module-v2:baz[zuux='foo'][baz='foo']/bar", None },
    missing_interior = { "/module-v1:foo/nope/stillno", None },
    position_then_member = { "/module-v2:baz[1]/quux", Some("bar") },
    explicit_other_module = { "/module-v1:foo/v2:zzz", Some("abc") },
    wrong_module = { "/module-v1:foo/v3:zzz", None },
)]
fn find_resolves(path: &str, expected: Option<&str>) {
    let root = fixture();
    let id: InstanceId = path.parse().expect("should parse");
    let got = id.find(&root);
    match expected {
        None => assert!(got.is_none(), "expected no match, got {got:?}"),
        Some(want) => {
            let got = got.expect("expected a match");
            assert_eq!(got.rfc7951_string(), want);
        }
    }
}

#[test]
fn match_against_absorbs_misses() {
    let root = fixture();
    let id: InstanceId = "/module-v1:foo/nope".parse().unwrap();
    assert_eq!(id.match_against(&root), Value::Null);
}

#[test]
fn ambiguous_selection_is_not_found() {
    // Two entries share quux='bar'; the selection is not unique.
    let root = fixture();
    let id: InstanceId = "/module-v2:baz[quux='bar']".parse().unwrap();
    assert!(id.find(&root).is_none());
    // Narrowing with a second predicate makes it unique again.
    let id: InstanceId = "/module-v2:baz[quux='bar'][baz='foo']".parse().unwrap();
    assert!(id.find(&root).is_some());
}

#[test]
fn equality_follows_canonical_form() {
    let a: InstanceId = "/m:foo/m:bar[k=\"v\"]".parse().unwrap();
    let b: InstanceId = "/m:foo/bar[k='v']".parse().unwrap();
    assert_eq!(a, b);
    let c: InstanceId = "/m:foo/other:bar[k='v']".parse().unwrap();
    assert_ne!(a, c);
}
