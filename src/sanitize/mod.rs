//! JSON:API response reduction for LLM consumption.
//!
//! Every view starts from (or ends with) [`prune`], the generic deep clean:
//! pagination links and `relationships.organization` are dropped, empty
//! values are removed transitively, `attributes` maps get their per-type
//! rules, and `meta` loses its noise keys. The [`Sanitizer`] layers
//! view-specific shaping and `webapp_url` / `workflow_status_name`
//! enrichment on top.
//!
//! Nothing here fails: input that does not have the expected shape is
//! passed through (pruned where possible) rather than rejected.

pub mod rules;

use serde_json::{Map, Value};

/// Root of the Productive web application.
pub const WEBAPP_ROOT: &str = "https://app.productive.io";

/// Attributes retained in task list views.
pub const TASK_LIST_FIELDS: &[&str] = &[
    "title",
    "task_number",
    "closed",
    "created_at",
    "updated_at",
    "initial_estimate",
    "remaining_time",
    "worked_time",
    "billable_time",
    "closed_at",
    "type_id",
    "private",
    "workflow_status_name",
];

/// Time tracking attributes guaranteed on a single task fetch.
pub const TIME_TRACKING_FIELDS: &[&str] = &[
    "initial_estimate",
    "worked_time",
    "billable_time",
    "remaining_time",
];

/// Which reduction profile to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Default,
    TaskList,
    PageList,
}

/// Applies pruning and enrichment for one organization.
#[derive(Debug, Clone)]
pub struct Sanitizer {
    organization: String,
}

impl Sanitizer {
    pub fn new(organization: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
        }
    }

    pub fn organization(&self) -> &str {
        &self.organization
    }

    /// Web app link for a resource.
    pub fn webapp_url(&self, resource_type: &str, id: &str) -> String {
        format!("{}/{}/{}/{}", WEBAPP_ROOT, self.organization, resource_type, id)
    }

    pub fn filter(&self, document: &Value, view: View) -> Value {
        match view {
            View::Default => self.filter_response(document),
            View::TaskList => self.filter_task_list(document),
            View::PageList => self.filter_page_list(document),
        }
    }

    /// Default view: deep prune, then enrich every primary resource.
    pub fn filter_response(&self, document: &Value) -> Value {
        let mut filtered = prune(document);
        let included = included_of(document);

        match filtered.get_mut("data") {
            Some(Value::Array(items)) => {
                for item in items {
                    self.enrich(item, included);
                }
            }
            Some(item) => self.enrich(item, included),
            None => {}
        }

        filtered
    }

    /// Task list view: only browsing fields survive.
    pub fn filter_task_list(&self, document: &Value) -> Value {
        self.filter_list(document, |item| {
            if type_of(item) != Some("tasks") {
                return None;
            }
            let included = included_of(document);
            let mut reduced = identity_of(item);

            if let Some(Value::Object(attributes)) = item.get("attributes") {
                let mut kept: Map<String, Value> = attributes
                    .iter()
                    .filter(|(key, _)| TASK_LIST_FIELDS.contains(&key.as_str()))
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect();
                if let Some(name) = workflow_status_name(item, included) {
                    kept.insert("workflow_status_name".into(), Value::String(name));
                }
                reduced.insert("attributes".into(), Value::Object(kept));
            }

            self.attach_webapp_url(&mut reduced);
            Some(reduced)
        })
    }

    /// Page list view: everything but the page body.
    pub fn filter_page_list(&self, document: &Value) -> Value {
        self.filter_list(document, |item| {
            if type_of(item) != Some("pages") {
                return None;
            }
            let mut reduced = identity_of(item);

            if let Some(Value::Object(attributes)) = item.get("attributes") {
                let mut kept = attributes.clone();
                kept.remove("body");
                reduced.insert("attributes".into(), Value::Object(kept));
            }

            self.attach_webapp_url(&mut reduced);
            Some(reduced)
        })
    }

    /// Shared list pipeline. `reduce` returns `None` for items that pass through.
    fn filter_list<F>(&self, document: &Value, reduce: F) -> Value
    where
        F: Fn(&Map<String, Value>) -> Option<Map<String, Value>>,
    {
        let Value::Object(map) = document else {
            return document.clone();
        };

        let mut filtered = Map::new();

        if let Some(data) = map.get("data") {
            let data = match data {
                Value::Array(items) => Value::Array(
                    items
                        .iter()
                        .map(|item| match item {
                            Value::Object(obj) => reduce(obj)
                                .map(Value::Object)
                                .unwrap_or_else(|| item.clone()),
                            other => other.clone(),
                        })
                        .collect(),
                ),
                other => other.clone(),
            };
            filtered.insert("data".into(), data);
        }

        if let Some(meta) = map.get("meta") {
            let meta = match meta {
                Value::Object(meta) => Value::Object(clean_meta(meta.clone())),
                other => other.clone(),
            };
            filtered.insert("meta".into(), meta);
        }

        prune(&Value::Object(filtered))
    }

    fn enrich(&self, item: &mut Value, included: &[Value]) {
        let Value::Object(obj) = item else {
            return;
        };

        self.attach_webapp_url(obj);

        if type_of(obj) == Some("tasks") {
            if let Some(name) = workflow_status_name(obj, included) {
                if let Some(Value::Object(attributes)) = obj.get_mut("attributes") {
                    attributes.insert("workflow_status_name".into(), Value::String(name));
                }
            }
        }
    }

    fn attach_webapp_url(&self, obj: &mut Map<String, Value>) {
        let url = match (type_of(obj), obj.get("id").and_then(id_text)) {
            (Some(resource_type), Some(id)) => self.webapp_url(resource_type, &id),
            _ => return,
        };
        obj.insert("webapp_url".into(), Value::String(url));
    }
}

/// Default any missing or null time tracking attribute of a single task to 0.
pub fn fill_task_time_tracking(document: &mut Value) {
    let Some(Value::Object(data)) = document.get_mut("data") else {
        return;
    };
    let attributes = data
        .entry("attributes")
        .or_insert_with(|| Value::Object(Map::new()));
    let Value::Object(attributes) = attributes else {
        return;
    };
    for field in TIME_TRACKING_FIELDS {
        if attributes.get(*field).map_or(true, Value::is_null) {
            attributes.insert(field.to_string(), Value::from(0));
        }
    }
}

/// Generic deep prune. Scalars pass through unchanged.
pub fn prune(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(prune_object(map, &[])),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(prune)
                .filter(|item| !is_empty(item))
                .collect(),
        ),
        other => other.clone(),
    }
}

fn prune_object(map: &Map<String, Value>, skip: &[&str]) -> Map<String, Value> {
    let resource_type = type_of(map);
    let mut out = Map::new();

    for (key, value) in map {
        if key == "links" || skip.contains(&key.as_str()) {
            continue;
        }

        let cleaned = match (key.as_str(), value) {
            ("relationships", Value::Object(relationships)) => {
                Value::Object(prune_object(relationships, &["organization"]))
            }
            _ => prune(value),
        };
        if is_empty(&cleaned) {
            continue;
        }

        let cleaned = match (key.as_str(), cleaned) {
            ("attributes", Value::Object(attributes)) => {
                let attributes = rules::filter_attributes(resource_type, attributes);
                if attributes.is_empty() {
                    continue;
                }
                Value::Object(attributes)
            }
            ("meta", Value::Object(meta)) => {
                let meta = clean_meta(meta);
                if meta.is_empty() {
                    continue;
                }
                Value::Object(meta)
            }
            (_, other) => other,
        };

        out.insert(key.clone(), cleaned);
    }

    out
}

/// Drop `included: false` and `settings` from a meta object.
fn clean_meta(mut meta: Map<String, Value>) -> Map<String, Value> {
    if meta.get("included") == Some(&Value::Bool(false)) {
        meta.remove("included");
    }
    meta.remove("settings");
    meta
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

fn included_of(document: &Value) -> &[Value] {
    document
        .get("included")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn type_of(obj: &Map<String, Value>) -> Option<&str> {
    obj.get("type")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
}

/// Resource ids are strings in JSON:API; numeric ids are tolerated.
fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Copy `id` and `type` into a fresh resource object.
fn identity_of(item: &Map<String, Value>) -> Map<String, Value> {
    let mut out = Map::new();
    for key in ["id", "type"] {
        if let Some(value) = item.get(key) {
            out.insert(key.into(), value.clone());
        }
    }
    out
}

/// Resolve a task's workflow status name from side-loaded resources.
fn workflow_status_name(task: &Map<String, Value>, included: &[Value]) -> Option<String> {
    let status_id = task
        .get("relationships")?
        .get("workflow_status")?
        .get("data")?
        .as_object()?
        .get("id")
        .filter(|id| !is_empty(id))?;

    included
        .iter()
        .filter_map(Value::as_object)
        .find(|resource| {
            resource.get("type").and_then(Value::as_str) == Some("workflow_statuses")
                && resource.get("id") == Some(status_id)
        })
        .and_then(|status| status.get("attributes")?.get("name")?.as_str())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}
