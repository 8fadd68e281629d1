use rfc7951_data::{array, object, EditAction, EditEntry, EditOperation, Tree, Value};

#[test]
fn marshal_wire_form() {
    let op = EditOperation::new(vec![EditEntry {
        action: EditAction::Assoc,
        path: "/module-v1:foo/bar".parse().unwrap(),
        value: Some(Value::Object(object! { "bar" => "quuz" })),
    }]);
    let bytes = op.marshal().unwrap();
    assert_eq!(
        String::from_utf8(bytes).unwrap(),
        r#"{"actions":[{"action":"assoc","path":"/module-v1:foo/bar","value":{"bar":"quuz"}}]}"#
    );
}

#[test]
fn delete_omits_the_value() {
    let op = EditOperation::new(vec![EditEntry::delete("/module-v1:foo/bar").unwrap()]);
    let bytes = op.marshal().unwrap();
    assert_eq!(
        String::from_utf8(bytes).unwrap(),
        r#"{"actions":[{"action":"delete","path":"/module-v1:foo/bar"}]}"#
    );
}

#[test]
fn unmarshal_wire_form() {
    let doc = br#"{
        "actions":[
            {
                "action":"assoc",
                "path":"/module-v1:foo/bar",
                "value":{"bar":"quuz"}
            },
            {
                "action":"delete",
                "path":"/module-v1:foo/bar"
            },
            {
                "action":"merge",
                "path":"/module-v1:foo/bar",
                "value":{"bar":"quux"}
            }
        ]
    }"#;
    let op = EditOperation::unmarshal(doc).unwrap();
    assert_eq!(op.actions.len(), 3);
    assert_eq!(op.actions[0].action, EditAction::Assoc);
    assert_eq!(op.actions[1].action, EditAction::Delete);
    assert_eq!(op.actions[1].value, None);
    assert_eq!(op.actions[2].action, EditAction::Merge);
    assert_eq!(op.actions[0].path.to_string(), "/module-v1:foo/bar");
    // Round-trips through the codec unchanged.
    assert_eq!(EditOperation::unmarshal(&op.marshal().unwrap()).unwrap(), op);
}

#[test]
fn unknown_action_fails_decode() {
    let doc = br#"{"actions":[{"action":"bogus!","path":"/module-v1:foo","value":1}]}"#;
    assert!(EditOperation::unmarshal(doc).is_err());
    let doc = br#"{"actions":[{"action":10,"path":"/module-v1:foo","value":1}]}"#;
    assert!(EditOperation::unmarshal(doc).is_err());
}

#[test]
fn malformed_path_fails_decode() {
    let doc = br#"{"actions":[{"action":"delete","path":"no-slash"}]}"#;
    assert!(EditOperation::unmarshal(doc).is_err());
}

#[test]
fn display_matches_the_wire_form() {
    let op = EditOperation::new(vec![EditEntry::assoc("/m:leaf", 1).unwrap()]);
    assert_eq!(
        op.to_string(),
        r#"{"actions":[{"action":"assoc","path":"/m:leaf","value":1}]}"#
    );
    assert_eq!(EditOperation::default().to_string(), "{}");
}

#[test]
fn edit_scripts_apply_identically_after_a_round_trip() {
    let tree = Tree::from_object(object! {
        "m:leaf" => "foo",
        "m:leaf-list" => array![1, 2, 3],
        "m:container" => object! { "a" => 1 },
    });
    let op = EditOperation::new(vec![
        EditEntry::assoc("/m:leaf", "bar").unwrap(),
        EditEntry::delete("/m:leaf-list[0]").unwrap(),
        EditEntry::merge("/m:container", object! { "b" => 2 }).unwrap(),
        EditEntry::assoc("/m:list[key='new']/leaf", Value::Empty).unwrap(),
    ]);
    let direct = tree.edit(&op).unwrap();
    let decoded = EditOperation::unmarshal(&op.marshal().unwrap()).unwrap();
    assert_eq!(decoded, op);
    assert_eq!(tree.edit(&decoded).unwrap(), direct);
    assert_eq!(direct.at("/m:leaf").unwrap(), Value::from("bar"));
    assert_eq!(direct.at("/m:leaf-list[0]").unwrap(), Value::from(2));
    assert_eq!(direct.at("/m:container/b").unwrap(), Value::from(2));
    assert_eq!(direct.at("/m:container/a").unwrap(), Value::from(1));
    assert_eq!(direct.at("/m:list[key='new']/leaf").unwrap(), Value::Empty);
}

#[test]
fn merge_entry_on_a_missing_path_inserts() {
    let tree = Tree::new();
    let op = EditOperation::new(vec![
        EditEntry::merge("/m:container", object! { "a" => 1 }).unwrap()
    ]);
    let new = tree.edit(&op).unwrap();
    assert_eq!(new.at("/m:container/a").unwrap(), Value::from(1));
}
