//! JSON:API request documents for page writes.

use serde_json::{json, Map, Value};

/// Document for `POST /pages`.
pub fn create_page(title: &str, project_id: u64, body: &str, parent_page_id: Option<u64>) -> Value {
    let mut relationships = Map::new();
    relationships.insert(
        "project".into(),
        json!({"data": {"type": "projects", "id": project_id.to_string()}}),
    );
    if let Some(parent) = parent_page_id {
        relationships.insert(
            "parent_page".into(),
            json!({"data": {"type": "pages", "id": parent.to_string()}}),
        );
    }

    json!({
        "data": {
            "type": "pages",
            "attributes": {
                "title": title,
                "body": body,
            },
            "relationships": relationships,
        }
    })
}

/// Document for `PATCH /pages/{id}`, or `None` when there is nothing to change.
pub fn update_page(page_id: u64, title: Option<&str>, body: Option<&str>) -> Option<Value> {
    let mut attributes = Map::new();
    if let Some(title) = title {
        attributes.insert("title".into(), Value::from(title));
    }
    if let Some(body) = body {
        attributes.insert("body".into(), Value::from(body));
    }
    if attributes.is_empty() {
        return None;
    }

    Some(json!({
        "data": {
            "type": "pages",
            "id": page_id.to_string(),
            "attributes": attributes,
        }
    }))
}
