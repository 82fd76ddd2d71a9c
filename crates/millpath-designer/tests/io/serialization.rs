use millpath_core::Error;
use millpath_designer::{NodeKind, ShapeDocument, ShapeNode};
use tempfile::TempDir;

const DOCUMENT: &str = r#"{
    "nodes": [
        {
            "kind": "translate",
            "children": [ { "name": "offset", "value": "5,5" } ],
            "nodes": [
                {
                    "kind": "circle",
                    "name": "hub",
                    "children": [
                        { "name": "center", "value": "0,0" },
                        { "name": "radius", "value": "12" },
                        { "name": "depth", "value": "0,-2,0.5" }
                    ],
                    "attributes": { "tool": "flat-3", "pocket": "true" }
                }
            ]
        }
    ]
}"#;

#[test]
fn test_parse_nested_document() {
    let document = ShapeDocument::from_json(DOCUMENT).unwrap();

    assert_eq!(document.nodes.len(), 1);
    let scope = &document.nodes[0];
    assert_eq!(scope.kind, NodeKind::Translate);
    assert_eq!(scope.nodes.len(), 1);

    let hub = &scope.nodes[0];
    assert_eq!(hub.kind, NodeKind::Circle);
    assert_eq!(hub.name.as_deref(), Some("hub"));
    assert_eq!(hub.children[1].value, "12");
    assert_eq!(hub.attributes.get("pocket").map(String::as_str), Some("true"));
}

#[test]
fn test_builder_matches_parsed_form() {
    let built = ShapeDocument::new(vec![ShapeNode::new(NodeKind::Translate)
        .child("offset", "5,5")
        .node(
            ShapeNode::new(NodeKind::Circle)
                .named("hub")
                .child("center", "0,0")
                .child("radius", "12")
                .child("depth", "0,-2,0.5")
                .attribute("tool", "flat-3")
                .attribute("pocket", "true"),
        )]);
    assert_eq!(built, ShapeDocument::from_json(DOCUMENT).unwrap());

    let json = built.to_json().unwrap();
    assert!(!json.contains("\"attributes\": {}"));
}

#[test]
fn test_load_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("shapes.json");
    std::fs::write(&path, DOCUMENT).unwrap();

    let document = ShapeDocument::load(&path).unwrap();
    assert_eq!(document.nodes[0].nodes[0].name.as_deref(), Some("hub"));
}

#[test]
fn test_load_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = ShapeDocument::load(&dir.path().join("none.json")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_malformed_document() {
    let err = ShapeDocument::from_json("{ \"nodes\": [ { \"name\": \"x\" } ] }").unwrap_err();
    assert!(err.to_string().contains("Invalid shape document"));
}
