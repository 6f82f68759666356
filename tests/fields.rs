use error_loom::{fields, json, FieldMap, Value, MISSING_VALUE};

fn assert_entries(map: &FieldMap, expected: &[(&str, Value)]) {
    let entries: Vec<(&str, &Value)> = map.iter().map(|f| (f.key.as_str(), &f.value)).collect();
    let expected: Vec<(&str, &Value)> = expected.iter().map(|(k, v)| (*k, v)).collect();
    assert_eq!(entries, expected);
}

#[test]
fn append_set_delete_get() {
    let mut map = FieldMap::new();
    assert!(map.is_empty());

    map.append(fields!["key1", 1, "key2", "2", "key3", "EOF"]);
    assert_entries(
        &map,
        &[("key1", json!(1)), ("key2", json!("2")), ("key3", json!("EOF"))],
    );

    map.append(fields!["key4", 4]);
    assert_eq!(map.len(), 4);

    map.delete("key2");
    map.delete("key4");
    assert_entries(&map, &[("key1", json!(1)), ("key3", json!("EOF"))]);

    map.set("key3", json!(3));
    assert_entries(&map, &[("key1", json!(1)), ("key3", json!(3))]);

    map.set("key4", json!(4));
    assert_entries(
        &map,
        &[("key1", json!(1)), ("key3", json!(3)), ("key4", json!(4))],
    );

    assert_eq!(map.get("key1"), Some(&json!(1)));
    assert_eq!(map.get("nope"), None);
}

#[test]
fn append_odd_arity_stores_missing_sentinel() {
    let mut map = FieldMap::new();

    map.append(fields!["a single value"]);
    assert_entries(&map, &[("a single value", json!(MISSING_VALUE))]);

    map.clear();
    map.append(fields!["k1", "v1", "k2", "v2", "k3", "v3", "k4", "v4", "k5"]);
    assert_eq!(map.len(), 5);
    assert_eq!(map.get("k5"), Some(&json!(MISSING_VALUE)));
}

#[test]
fn append_never_dedups_but_set_upserts_in_place() {
    let mut map = FieldMap::new();
    map.append(fields!["k1", "a", "k2", "b", "k1", "c"]);
    assert_eq!(map.len(), 3);
    // get returns the first match
    assert_eq!(map.get("k1"), Some(&json!("a")));

    // set replaces the value at the first matching position
    map.set("k1", json!("z"));
    assert_entries(
        &map,
        &[("k1", json!("z")), ("k2", json!("b")), ("k1", json!("c"))],
    );

    // delete removes all matches
    map.delete("k1");
    assert_entries(&map, &[("k2", json!("b"))]);
}

#[test]
fn non_string_keys_are_stringified() {
    let mut map = FieldMap::new();
    map.append(fields!["k1", "v1", "k2", "v2"]);
    assert_eq!(map.to_string(), "{k1:v1, k2:v2}");

    map.append(fields![3, "v3"]);
    assert_eq!(map.to_string(), "{k1:v1, k2:v2, 3:v3}");

    map.append(vec![Value::Null, json!("v4")]);
    assert_eq!(map.to_string(), "{k1:v1, k2:v2, 3:v3, :v4}");
}

#[test]
fn display_renders_values_in_bare_form() {
    let mut map = FieldMap::new();
    map.append(fields!["s", "text", "n", 42, "b", true, "arr", [1, 2]]);
    assert_eq!(map.to_string(), "{s:text, n:42, b:true, arr:[1,2]}");
}
