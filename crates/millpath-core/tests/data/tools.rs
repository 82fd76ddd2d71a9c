use millpath_core::{Tool, ToolRegistry};

#[test]
fn test_registry_insert_replaces() {
    let mut registry = ToolRegistry::new();
    assert!(registry.is_empty());

    registry.insert("endmill", Tool::new(6.0).unwrap());
    registry.insert("endmill", Tool::new(3.0).unwrap());

    assert_eq!(registry.len(), 1);
    assert_eq!(registry.get("endmill").map(Tool::radius), Some(1.5));
}

#[test]
fn test_unknown_tool_message_names_tool() {
    let registry = ToolRegistry::new();
    let err = registry.resolve("rectangle", "ghost").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid argument 'tool' on rectangle: unknown tool 'ghost'"
    );
}
