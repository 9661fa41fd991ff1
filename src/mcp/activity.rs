//! Activity feed summaries and task history reconstruction.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::client::QueryParams;

/// Upper bound on activities fetched for a task history.
pub const HISTORY_ACTIVITY_LIMIT: u32 = 200;

#[derive(Debug, Default, PartialEq, Serialize)]
pub struct ActivitySummary {
    pub by_type: BTreeMap<String, u64>,
    pub by_event: BTreeMap<String, u64>,
    pub by_item_type: BTreeMap<String, u64>,
    pub total: usize,
}

/// Count activities by `type`, `event` and `item_type`.
pub fn summarize(activities: &[Value]) -> ActivitySummary {
    let mut summary = ActivitySummary {
        total: activities.len(),
        ..Default::default()
    };

    for activity in activities.iter().filter(|a| a.is_object()) {
        let attributes = activity.get("attributes");
        let field = |name: &str| attributes.and_then(|a| a.get(name)).and_then(key_text);

        if let Some(key) = field("type") {
            *summary.by_type.entry(key).or_default() += 1;
        }
        if let Some(key) = field("event") {
            *summary.by_event.entry(key).or_default() += 1;
        }
        if let Some(key) = field("item_type") {
            *summary.by_item_type.entry(key).or_default() += 1;
        }
    }

    summary
}

fn key_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

/// The `filter[...]` parameters of a query, keyed by bare filter name.
pub fn applied_filters(params: &QueryParams) -> Map<String, Value> {
    params
        .iter()
        .filter(|(key, _)| key.starts_with("filter["))
        .map(|(key, value)| {
            let name = key.replace("filter[", "").replace(']', "");
            (name, Value::String(value.to_string()))
        })
        .collect()
}

/// ISO-8601 UTC timestamp `hours` before `now`.
pub fn cutoff(now: DateTime<Utc>, hours: u32) -> String {
    let then = now - TimeDelta::hours(i64::from(hours));
    then.to_rfc3339_opts(SecondsFormat::Micros, true)
}

// ============================================================
// Task history
// ============================================================

#[derive(Debug, PartialEq, Serialize)]
pub struct StatusChange {
    pub from: Option<Value>,
    pub to: Option<Value>,
    pub changed_at: Option<Value>,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct AssignmentChange {
    pub assigned_to: Option<Value>,
    pub changed_at: Option<Value>,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct Milestone {
    pub milestone: Value,
    pub completed_at: Option<Value>,
    pub completed_by: Value,
}

#[derive(Debug, Default, PartialEq, Serialize)]
pub struct HistorySummary {
    pub total_activities: usize,
    pub total_comments: usize,
    pub total_changes: usize,
    pub total_status_changes: usize,
    pub total_assignments: usize,
    pub total_milestones: usize,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct TaskHistory {
    pub task_id: u64,
    pub status_history: Vec<StatusChange>,
    pub assignment_history: Vec<AssignmentChange>,
    pub milestones: Vec<Milestone>,
    pub activity_summary: HistorySummary,
}

/// Rebuild status, assignment and milestone timelines from a task's activities.
pub fn build_task_history(task_id: u64, activities: &[Value]) -> TaskHistory {
    let mut status_history = Vec::new();
    let mut assignment_history = Vec::new();
    let mut milestones = Vec::new();

    for attributes in activities.iter().filter_map(|a| a.get("attributes")) {
        let item_type = attributes
            .get("item_type")
            .and_then(Value::as_str)
            .map(str::to_lowercase);
        let event = attributes.get("event").and_then(Value::as_str);
        let created_at = attributes.get("created_at").cloned();

        let is_task_edit =
            item_type.as_deref() == Some("task") && matches!(event, Some("update" | "edit"));

        if is_task_edit {
            let changes = attributes
                .get("changeset")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or_default();

            for change in changes {
                if let Some(entries) = change.get("workflow_status_id") {
                    status_history.push(StatusChange {
                        from: change_value(entries, 0),
                        to: change_value(entries, 1),
                        changed_at: created_at.clone(),
                    });
                }
                if let Some(entries) = change.get("assignee") {
                    assignment_history.push(AssignmentChange {
                        assigned_to: change_value(entries, 0),
                        changed_at: created_at.clone(),
                    });
                }
            }
        }

        if item_type.as_deref() == Some("comment") {
            let item_name = attributes.get("item_name").and_then(Value::as_str);
            if item_name.is_some_and(|name| name.to_lowercase().contains("milestone")) {
                milestones.push(Milestone {
                    milestone: Value::from(item_name.unwrap_or("Milestone")),
                    completed_at: created_at.clone(),
                    completed_by: attributes
                        .get("person_name")
                        .cloned()
                        .unwrap_or_else(|| Value::from("Unknown")),
                });
            }
        }
    }

    let count_item_type = |wanted: &str| {
        activities
            .iter()
            .filter(|a| {
                a.get("attributes")
                    .and_then(|attrs| attrs.get("item_type"))
                    .and_then(Value::as_str)
                    == Some(wanted)
            })
            .count()
    };

    let activity_summary = HistorySummary {
        total_activities: activities.len(),
        total_comments: count_item_type("Comment"),
        total_changes: count_item_type("Task"),
        total_status_changes: status_history.len(),
        total_assignments: assignment_history.len(),
        total_milestones: milestones.len(),
    };

    TaskHistory {
        task_id,
        status_history,
        assignment_history,
        milestones,
        activity_summary,
    }
}

/// `value` of the `index`th entry in a changeset field.
fn change_value(entries: &Value, index: usize) -> Option<Value> {
    entries
        .as_array()
        .and_then(|list| list.get(index))
        .and_then(|entry| entry.get("value"))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn cutoff_is_utc_with_z_suffix() {
        let now = Utc.with_ymd_and_hms(2024, 3, 2, 12, 0, 0).unwrap();
        assert_eq!(cutoff(now, 24), "2024-03-01T12:00:00.000000Z");
    }

    #[test]
    fn applied_filters_strip_brackets() {
        let params = QueryParams::new()
            .with("filter[after]", "2024-01-01T00:00:00Z")
            .with("page[size]", 50)
            .with("filter[task_id]", 7);
        let filters = applied_filters(&params);
        assert_eq!(
            Value::Object(filters),
            json!({"after": "2024-01-01T00:00:00Z", "task_id": "7"})
        );
    }

    #[test]
    fn summary_counts_each_dimension() {
        let activities = vec![
            json!({"attributes": {"type": 1, "event": "create", "item_type": "Comment"}}),
            json!({"attributes": {"type": 2, "event": "update", "item_type": "Task"}}),
            json!({"attributes": {"type": 2, "event": "update"}}),
            json!("not an activity"),
        ];
        let summary = summarize(&activities);

        assert_eq!(summary.total, 4);
        assert_eq!(summary.by_type.get("2"), Some(&2));
        assert_eq!(summary.by_event.get("update"), Some(&2));
        assert_eq!(summary.by_item_type.get("Comment"), Some(&1));
        assert_eq!(summary.by_item_type.len(), 2);
    }

    #[test]
    fn history_reads_status_and_assignee_changes() {
        let activities = vec![json!({
            "attributes": {
                "item_type": "Task",
                "event": "update",
                "created_at": "2024-01-02T10:00:00Z",
                "changeset": [
                    {"workflow_status_id": [{"value": "Open"}, {"value": "In review"}]},
                    {"assignee": [{"value": "Ana"}]}
                ]
            }
        })];
        let history = build_task_history(9, &activities);

        assert_eq!(
            history.status_history,
            vec![StatusChange {
                from: Some(json!("Open")),
                to: Some(json!("In review")),
                changed_at: Some(json!("2024-01-02T10:00:00Z")),
            }]
        );
        assert_eq!(history.assignment_history[0].assigned_to, Some(json!("Ana")));
        assert_eq!(history.activity_summary.total_changes, 1);
        assert_eq!(history.activity_summary.total_status_changes, 1);
    }

    #[test]
    fn create_events_are_not_history() {
        let activities = vec![json!({
            "attributes": {
                "item_type": "task",
                "event": "create",
                "changeset": [{"workflow_status_id": [{"value": 1}, {"value": 2}]}]
            }
        })];
        assert!(build_task_history(1, &activities).status_history.is_empty());
    }

    #[test]
    fn milestone_comments_are_collected() {
        let activities = vec![
            json!({"attributes": {"item_type": "Comment", "item_name": "Beta MILESTONE reached"}}),
            json!({"attributes": {"item_type": "Comment", "item_name": "just a note"}}),
        ];
        let history = build_task_history(1, &activities);

        assert_eq!(history.milestones.len(), 1);
        assert_eq!(history.milestones[0].completed_by, json!("Unknown"));
        assert_eq!(history.activity_summary.total_comments, 2);
    }
}
