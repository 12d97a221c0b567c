use crate::tree::Tree;

/// Serialize a tree to a pretty-printed JSON string.
pub fn to_pretty_json(tree: &Tree) -> String {
    serde_json::to_string_pretty(tree).expect("Tree serialization cannot fail")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Options, argstree};

    #[test]
    fn pretty_json_nests_children() {
        let tree = argstree(["--foo", "bar"], Options::new().arg("--foo", Options::new())).unwrap();
        let json = to_pretty_json(&tree);
        assert!(json.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["id"], serde_json::Value::Null);
        assert_eq!(value["children"][0]["id"], "--foo");
        assert_eq!(value["children"][0]["args"], serde_json::json!(["bar"]));
    }
}
