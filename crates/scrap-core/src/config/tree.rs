//! Rendering flat colon-delimited keys as a nested JSON tree

use super::source::KEY_SEPARATOR;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Intermediate node while un-flattening.
enum Node {
    Leaf(String),
    Branch(BTreeMap<String, Node>),
}

/// Un-flatten merged key/value pairs into a nested JSON object tree.
///
/// Sibling keys that are all unsigned integers reconstruct a JSON array
/// ordered numerically; any other sibling set becomes an object with keys
/// in sorted order. A key that names both a scalar and a section resolves
/// to the section.
pub fn to_tree<'a>(flat: impl IntoIterator<Item = (&'a str, &'a str)>) -> Value {
    let mut root = BTreeMap::new();
    for (key, value) in flat {
        insert(&mut root, key, value);
    }
    branch_to_value(&root)
}

fn insert(branch: &mut BTreeMap<String, Node>, key: &str, value: &str) {
    match key.split_once(KEY_SEPARATOR) {
        None => {
            // Section wins over scalar for the same name.
            if !matches!(branch.get(key), Some(Node::Branch(_))) {
                branch.insert(key.to_string(), Node::Leaf(value.to_string()));
            }
        }
        Some((head, rest)) => {
            let child = branch
                .entry(head.to_string())
                .and_modify(|node| {
                    if matches!(node, Node::Leaf(_)) {
                        *node = Node::Branch(BTreeMap::new());
                    }
                })
                .or_insert_with(|| Node::Branch(BTreeMap::new()));
            if let Node::Branch(children) = child {
                insert(children, rest, value);
            }
        }
    }
}

fn node_to_value(node: &Node) -> Value {
    match node {
        Node::Leaf(value) => Value::String(value.clone()),
        Node::Branch(children) => branch_to_value(children),
    }
}

fn branch_to_value(branch: &BTreeMap<String, Node>) -> Value {
    if let Some(array) = as_array(branch) {
        return array;
    }

    let mut map = Map::new();
    for (key, node) in branch {
        map.insert(key.clone(), node_to_value(node));
    }
    Value::Object(map)
}

/// A non-empty branch whose keys are all unsigned integers renders as an
/// array ordered by index value (so `10` sorts after `2`).
fn as_array(branch: &BTreeMap<String, Node>) -> Option<Value> {
    if branch.is_empty() {
        return None;
    }

    let mut indexed = Vec::with_capacity(branch.len());
    for (key, node) in branch {
        indexed.push((key.parse::<usize>().ok()?, node));
    }
    indexed.sort_by_key(|(index, _)| *index);

    Some(Value::Array(
        indexed
            .into_iter()
            .map(|(_, node)| node_to_value(node))
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unflatten_nested_keys() {
        let tree = to_tree([
            ("spring:cloud:config:uri", "http://cfg:8888"),
            ("spring:application:name", "orders"),
            ("logging:level", "info"),
        ]);

        assert_eq!(
            tree,
            json!({
                "logging": { "level": "info" },
                "spring": {
                    "application": { "name": "orders" },
                    "cloud": { "config": { "uri": "http://cfg:8888" } }
                }
            })
        );
    }

    #[test]
    fn test_numeric_siblings_become_array() {
        let tree = to_tree([
            ("servers:0", "alpha"),
            ("servers:1", "beta"),
        ]);

        assert_eq!(tree, json!({ "servers": ["alpha", "beta"] }));
    }

    #[test]
    fn test_array_indexes_order_numerically() {
        let tree = to_tree([
            ("servers:10", "last"),
            ("servers:2", "first"),
        ]);

        assert_eq!(tree, json!({ "servers": ["first", "last"] }));
    }

    #[test]
    fn test_mixed_siblings_stay_an_object() {
        let tree = to_tree([
            ("servers:0", "alpha"),
            ("servers:primary", "beta"),
        ]);

        assert_eq!(
            tree,
            json!({ "servers": { "0": "alpha", "primary": "beta" } })
        );
    }

    #[test]
    fn test_section_wins_over_scalar() {
        // Both insertion orders resolve the conflict the same way.
        let tree = to_tree([("a", "scalar"), ("a:b", "nested")]);
        assert_eq!(tree, json!({ "a": { "b": "nested" } }));

        let tree = to_tree([("a:b", "nested"), ("a", "scalar")]);
        assert_eq!(tree, json!({ "a": { "b": "nested" } }));
    }

    #[test]
    fn test_empty_input_is_empty_object() {
        assert_eq!(to_tree(std::iter::empty::<(&str, &str)>()), json!({}));
    }
}
