//! MCP server integration tests.
//!
//! Each tool's fetch method is exercised against a mocked Productive API.

use std::time::Duration;

use httpmock::prelude::*;
use rmcp::model::ErrorCode;
use serde_json::{json, Value};

use productive_mcp::client::{ProductiveClient, RetryPolicy};
use productive_mcp::config::Config;
use productive_mcp::mcp::*;
use productive_mcp::sanitize::Sanitizer;

/// Helper to create a server talking to the mock API.
fn setup(server: &MockServer) -> McpServer {
    let config = Config {
        api_key: "secret-token".to_string(),
        organization: "42-acme".to_string(),
        base_url: server.base_url(),
        timeout: Duration::from_secs(5),
        items_per_page: 50,
    };
    let client = ProductiveClient::new(&config)
        .expect("Failed to build client")
        .with_retry_policy(RetryPolicy {
            max_retries: 1,
            base_delay: Duration::from_millis(5),
        });
    McpServer::new(client, Sanitizer::new("42-acme"), config.items_per_page)
}

fn task_json(id: &str) -> Value {
    json!({
        "id": id,
        "type": "tasks",
        "attributes": {
            "title": "Fix login",
            "description": "<p>Broken</p>",
            "email_key": "k",
            "worked_time": 15
        },
        "relationships": {
            "workflow_status": {"data": {"type": "workflow_statuses", "id": "9"}}
        }
    })
}

fn workflow_status() -> Value {
    json!({"id": "9", "type": "workflow_statuses", "attributes": {"name": "In review"}})
}

// ============================================================
// Projects and tasks
// ============================================================

mod tasks {
    use super::*;

    #[tokio::test]
    async fn projects_are_sorted_by_activity() {
        let api = MockServer::start();
        let mock = api.mock(|when, then| {
            when.method(GET)
                .path("/projects")
                .query_param("sort", "-last_activity_at");
            then.status(200).json_body(json!({
                "data": [{"id": "5", "type": "projects", "attributes": {"name": "Site", "template": false}}]
            }));
        });

        let result = setup(&api).fetch_projects().await.unwrap();

        mock.assert();
        assert_eq!(result["data"][0]["attributes"], json!({"name": "Site"}));
        assert_eq!(
            result["data"][0]["webapp_url"],
            "https://app.productive.io/42-acme/projects/5"
        );
    }

    #[tokio::test]
    async fn task_list_applies_defaults_and_filters() {
        let api = MockServer::start();
        let mock = api.mock(|when, then| {
            when.method(GET)
                .path("/tasks")
                .query_param("page[size]", "50")
                .query_param("sort", "-last_activity_at")
                .query_param("include", "workflow_status")
                .query_param("filter[project_id][eq]", "5")
                .query_param("filter[assignee_id][eq]", "2")
                .query_param("filter[status][eq]", "1");
            then.status(200).json_body(json!({
                "data": [task_json("101")],
                "included": [workflow_status()]
            }));
        });

        let req: GetTasksRequest = serde_json::from_value(json!({
            "project_id": 5,
            "user_id": 2,
            "extra_filters": {"filter[status][eq]": 1}
        }))
        .unwrap();
        let result = setup(&api).fetch_tasks(req).await.unwrap();

        mock.assert();
        assert_eq!(
            result["data"][0]["attributes"],
            json!({"title": "Fix login", "worked_time": 15, "workflow_status_name": "In review"})
        );
    }

    #[tokio::test]
    async fn page_size_is_clamped() {
        let api = MockServer::start();
        let high = api.mock(|when, then| {
            when.method(GET).path("/tasks").query_param("page[size]", "200");
            then.status(200).json_body(json!({"data": []}));
        });
        let low = api.mock(|when, then| {
            when.method(GET).path("/tasks").query_param("page[size]", "1");
            then.status(200).json_body(json!({"data": []}));
        });

        let server = setup(&api);
        server
            .fetch_tasks(GetTasksRequest {
                page_size: Some(500),
                ..Default::default()
            })
            .await
            .unwrap();
        server
            .fetch_tasks(GetTasksRequest {
                page_size: Some(0),
                ..Default::default()
            })
            .await
            .unwrap();

        high.assert();
        low.assert();
    }

    #[tokio::test]
    async fn single_task_is_filled_in() {
        let api = MockServer::start();
        api.mock(|when, then| {
            when.method(GET).path("/tasks/101");
            then.status(200).json_body(json!({
                "data": task_json("101"),
                "included": [workflow_status()]
            }));
        });

        let result = setup(&api).fetch_task(101).await.unwrap();
        let attributes = &result["data"]["attributes"];

        assert_eq!(attributes["description"], "Broken");
        assert_eq!(attributes["worked_time"], 15);
        assert_eq!(attributes["initial_estimate"], 0);
        assert_eq!(attributes["billable_time"], 0);
        assert_eq!(attributes["remaining_time"], 0);
        assert_eq!(attributes["workflow_status_name"], "In review");
        assert!(attributes.get("email_key").is_none());
    }

    #[tokio::test]
    async fn missing_task_is_invalid_params() {
        let api = MockServer::start();
        api.mock(|when, then| {
            when.method(GET).path("/tasks/404");
            then.status(404);
        });

        let err = setup(&api).fetch_task(404).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
        assert_eq!(err.data, Some(json!({"status_code": 404, "error_code": "NOT_FOUND"})));
    }

    #[tokio::test]
    async fn upstream_failure_is_internal_error() {
        let api = MockServer::start();
        let mock = api.mock(|when, then| {
            when.method(GET).path("/tasks/1");
            then.status(502).json_body(json!({"message": "upstream down", "errorCode": "BAD_GATEWAY"}));
        });

        let err = setup(&api).fetch_task(1).await.unwrap_err();

        assert_eq!(mock.calls(), 2);
        assert_eq!(err.code, ErrorCode::INTERNAL_ERROR);
        assert!(err.message.contains("upstream down"));
        assert_eq!(err.data, Some(json!({"status_code": 502, "error_code": "BAD_GATEWAY"})));
    }

    #[tokio::test]
    async fn unauthorized_is_internal_error() {
        let api = MockServer::start();
        api.mock(|when, then| {
            when.method(GET).path("/projects");
            then.status(401);
        });

        let err = setup(&api).fetch_projects().await.unwrap_err();

        assert_eq!(err.code, ErrorCode::INTERNAL_ERROR);
        assert!(err.message.starts_with("Unauthorized: Invalid API token"));
    }
}

// ============================================================
// Activity and history
// ============================================================

mod activity {
    use super::*;

    #[tokio::test]
    async fn empty_window_reports_filters() {
        let api = MockServer::start();
        let mock = api.mock(|when, then| {
            when.method(GET)
                .path("/activities")
                .query_param_exists("filter[after]")
                .query_param("filter[person_id]", "3")
                .query_param("page[size]", "50");
            then.status(200).json_body(json!({"data": []}));
        });

        let result = setup(&api)
            .fetch_recent_activity(GetRecentActivityRequest {
                hours: 48,
                user_id: Some(3),
                ..Default::default()
            })
            .await
            .unwrap();

        mock.assert();
        assert_eq!(result["data"], json!([]));
        assert_eq!(result["meta"]["message"], "No activities found in the last 48 hours");
        assert_eq!(result["meta"]["hours"], 48);
        assert_eq!(result["meta"]["filters_applied"]["person_id"], "3");
        let cutoff = result["meta"]["cutoff_time"].as_str().unwrap();
        assert!(cutoff.ends_with('Z'));
        assert_eq!(result["meta"]["filters_applied"]["after"], cutoff);
    }

    #[tokio::test]
    async fn activities_are_summarized() {
        let api = MockServer::start();
        let mock = api.mock(|when, then| {
            when.method(GET)
                .path("/activities")
                .query_param("page[size]", "200")
                .query_param("filter[event]", "create");
            then.status(200).json_body(json!({
                "data": [
                    {"id": "1", "type": "activities", "attributes": {"type": 1, "event": "create", "item_type": "Comment"}},
                    {"id": "2", "type": "activities", "attributes": {"type": 2, "event": "create", "item_type": "Task"}}
                ],
                "meta": {"total_count": 2}
            }));
        });

        let result = setup(&api)
            .fetch_recent_activity(GetRecentActivityRequest {
                event_type: Some("create".into()),
                max_results: Some(500),
                ..Default::default()
            })
            .await
            .unwrap();

        mock.assert();
        let meta = &result["meta"];
        assert_eq!(meta["total_count"], 2);
        assert_eq!(meta["total_activities"], 2);
        assert_eq!(
            meta["activity_summary"],
            json!({
                "by_type": {"1": 1, "2": 1},
                "by_event": {"create": 2},
                "by_item_type": {"Comment": 1, "Task": 1},
                "total": 2
            })
        );
        assert_eq!(meta["filters_applied"]["event"], "create");
    }

    #[tokio::test]
    async fn task_history_is_reconstructed() {
        let api = MockServer::start();
        api.mock(|when, then| {
            when.method(GET).path("/tasks/9");
            then.status(200).json_body(json!({"data": task_json("9")}));
        });
        let activities = api.mock(|when, then| {
            when.method(GET)
                .path("/activities")
                .query_param("filter[task_id]", "9")
                .query_param("page[size]", "200");
            then.status(200).json_body(json!({
                "data": [
                    {
                        "id": "1",
                        "type": "activities",
                        "attributes": {
                            "item_type": "Task",
                            "event": "update",
                            "created_at": "2024-05-01T09:00:00Z",
                            "changeset": [
                                {"workflow_status_id": [{"value": "To do"}, {"value": "Done"}]},
                                {"assignee": [{"value": "Ana"}]}
                            ]
                        }
                    },
                    {
                        "id": "2",
                        "type": "activities",
                        "attributes": {
                            "item_type": "Comment",
                            "item_name": "Milestone: beta shipped",
                            "person_name": "Ana",
                            "created_at": "2024-05-02T09:00:00Z"
                        }
                    }
                ]
            }));
        });

        let req: GetTaskHistoryRequest = serde_json::from_value(json!({"task_id": 9})).unwrap();
        let result = setup(&api).fetch_task_history(req).await.unwrap();

        activities.assert();
        assert_eq!(result["task_id"], 9);
        assert_eq!(
            result["status_history"],
            json!([{"from": "To do", "to": "Done", "changed_at": "2024-05-01T09:00:00Z"}])
        );
        assert_eq!(
            result["assignment_history"],
            json!([{"assigned_to": "Ana", "changed_at": "2024-05-01T09:00:00Z"}])
        );
        assert_eq!(result["milestones"][0]["completed_by"], "Ana");
        assert_eq!(
            result["activity_summary"],
            json!({
                "total_activities": 2,
                "total_comments": 1,
                "total_changes": 1,
                "total_status_changes": 1,
                "total_assignments": 1,
                "total_milestones": 1
            })
        );
    }

    #[tokio::test]
    async fn task_history_rejects_out_of_range_hours() {
        let api = MockServer::start();
        let server = setup(&api);

        for hours in [0, 8761] {
            let err = server
                .fetch_task_history(GetTaskHistoryRequest { task_id: 1, hours })
                .await
                .unwrap_err();
            assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
        }
    }
}

// ============================================================
// Comments, todos, attachments and people
// ============================================================

mod resources {
    use super::*;

    #[tokio::test]
    async fn comments_are_filtered_and_newest_first() {
        let api = MockServer::start();
        let mock = api.mock(|when, then| {
            when.method(GET)
                .path("/comments")
                .query_param("sort", "-created_at")
                .query_param("filter[task_id][eq]", "101")
                .query_param("page[number]", "2");
            then.status(200).json_body(json!({
                "data": [{"id": "4", "type": "comments", "attributes": {"body": "<p>Ship <b>it</b></p>"}}]
            }));
        });

        let result = setup(&api)
            .fetch_comments(GetCommentsRequest {
                task_id: Some(101),
                page_number: Some(2),
                ..Default::default()
            })
            .await
            .unwrap();

        mock.assert();
        assert_eq!(result["data"][0]["attributes"]["body"], "Ship it");
    }

    #[tokio::test]
    async fn todos_filter_by_task() {
        let api = MockServer::start();
        let mock = api.mock(|when, then| {
            when.method(GET)
                .path("/todos")
                .query_param("filter[task_id]", "101")
                .query_param("page[size]", "25");
            then.status(200).json_body(json!({"data": []}));
        });

        setup(&api)
            .fetch_todos(GetTodosRequest {
                task_id: Some(101),
                page_size: Some(25),
                ..Default::default()
            })
            .await
            .unwrap();

        mock.assert();
    }

    #[tokio::test]
    async fn attachments_merge_extra_filters() {
        let api = MockServer::start();
        let mock = api.mock(|when, then| {
            when.method(GET)
                .path("/attachments")
                .query_param("filter[task_id]", "101");
            then.status(200).json_body(json!({
                "data": [{
                    "id": "8",
                    "type": "attachments",
                    "attributes": {"name": "invoice.pdf", "attachable_type": "Task"}
                }]
            }));
        });

        let req: GetAttachmentsRequest = serde_json::from_value(json!({
            "extra_filters": {"filter[task_id]": "101"}
        }))
        .unwrap();
        let result = setup(&api).fetch_attachments(req).await.unwrap();

        mock.assert();
        assert_eq!(result["data"][0]["attributes"], json!({"name": "invoice.pdf"}));
        assert_eq!(
            result["data"][0]["webapp_url"],
            "https://app.productive.io/42-acme/attachments/8"
        );
    }

    #[tokio::test]
    async fn people_are_sorted_by_last_seen() {
        let api = MockServer::start();
        let mock = api.mock(|when, then| {
            when.method(GET)
                .path("/people")
                .query_param("sort", "-last_seen_at");
            then.status(200).json_body(json!({"data": []}));
        });

        setup(&api)
            .fetch_people(GetPeopleRequest::default())
            .await
            .unwrap();

        mock.assert();
    }

    #[tokio::test]
    async fn single_resources_are_fetched_by_id() {
        let api = MockServer::start();
        let mocks = [
            ("/comments/1", "comments"),
            ("/todos/2", "todos"),
            ("/attachments/3", "attachments"),
            ("/people/4", "people"),
        ]
        .map(|(path, resource_type)| {
            api.mock(|when, then| {
                when.method(GET).path(path);
                then.status(200)
                    .json_body(json!({"data": {"id": "1", "type": resource_type}}));
            })
        });

        let server = setup(&api);
        server.fetch_comment(1).await.unwrap();
        server.fetch_todo(2).await.unwrap();
        server.fetch_attachment(3).await.unwrap();
        let person = server.fetch_person(4).await.unwrap();

        for mock in &mocks {
            mock.assert();
        }
        assert_eq!(
            person["data"]["webapp_url"],
            "https://app.productive.io/42-acme/people/1"
        );
    }
}

// ============================================================
// Pages
// ============================================================

mod pages {
    use super::*;

    #[tokio::test]
    async fn page_list_omits_bodies() {
        let api = MockServer::start();
        let mock = api.mock(|when, then| {
            when.method(GET)
                .path("/pages")
                .query_param("sort", "-updated_at")
                .query_param("filter[project_id][eq]", "5");
            then.status(200).json_body(json!({
                "data": [{"id": "3", "type": "pages", "attributes": {"title": "Runbook", "body": "long"}}]
            }));
        });

        let result = setup(&api)
            .fetch_pages(GetPagesRequest {
                project_id: Some(5),
                ..Default::default()
            })
            .await
            .unwrap();

        mock.assert();
        assert_eq!(result["data"][0]["attributes"], json!({"title": "Runbook"}));
    }

    #[tokio::test]
    async fn create_page_posts_document() {
        let api = MockServer::start();
        let mock = api.mock(|when, then| {
            when.method(POST).path("/pages").json_body(json!({
                "data": {
                    "type": "pages",
                    "attributes": {"title": "Runbook", "body": "steps"},
                    "relationships": {
                        "project": {"data": {"type": "projects", "id": "5"}}
                    }
                }
            }));
            then.status(201).json_body(json!({"data": {"id": "12", "type": "pages"}}));
        });

        let result = setup(&api)
            .submit_new_page(CreatePageRequest {
                title: "Runbook".into(),
                project_id: 5,
                body: "steps".into(),
                parent_page_id: None,
            })
            .await
            .unwrap();

        mock.assert();
        assert_eq!(result["data"]["id"], "12");
    }

    #[tokio::test]
    async fn update_without_fields_makes_no_call() {
        let api = MockServer::start();
        let mock = api.mock(|when, then| {
            when.method(PATCH).path("/pages/3");
            then.status(200).json_body(json!({}));
        });

        let result = setup(&api)
            .submit_page_update(UpdatePageRequest {
                page_id: 3,
                title: None,
                body: None,
            })
            .await
            .unwrap();

        assert_eq!(result, json!({"message": "No changes made - no fields provided"}));
        assert_eq!(mock.calls(), 0);
    }
}

// ============================================================
// Search
// ============================================================

mod search {
    use super::*;

    #[tokio::test]
    async fn task_hits_are_hydrated() {
        let api = MockServer::start();
        api.mock(|when, then| {
            when.method(GET)
                .path("/search/quick")
                .query_param("filter[query]", "login")
                .query_param("filter[type]", "action,project,task,page");
            then.status(200).json_body(json!({
                "data": [
                    {"attributes": {"record_type": "task", "record_id": "101", "title": "Fix login", "meta": {"project_name": "Site"}}},
                    {"attributes": {"record_type": "page", "record_id": 3, "title": "Login docs"}}
                ]
            }));
        });
        let hydrate = api.mock(|when, then| {
            when.method(GET).path("/tasks/101");
            then.status(200).json_body(json!({
                "data": task_json("101"),
                "included": [workflow_status()]
            }));
        });

        let result = setup(&api).search(QuickSearchRequest::new("login")).await;

        hydrate.assert();
        let task = &result["data"][0];
        assert_eq!(task["workflow_status_name"], "In review");
        assert_eq!(task["project_name"], "Site");
        assert_eq!(task["webapp_url"], "https://app.productive.io/42-acme/tasks/101");
        assert_eq!(task["subtitle"], "");

        let page = &result["data"][1];
        assert_eq!(page["webapp_url"], "https://app.productive.io/42-acme/pages/3");
        assert!(page.get("workflow_status_name").is_none());

        assert_eq!(result["meta"]["total_results"], 2);
        assert_eq!(result["meta"]["deep_search"], true);
    }

    #[tokio::test]
    async fn failed_hydration_keeps_hit() {
        let api = MockServer::start();
        api.mock(|when, then| {
            when.method(GET).path("/search/quick");
            then.status(200).json_body(json!({
                "data": [{"attributes": {"record_type": "task", "record_id": "7", "title": "Gone"}}]
            }));
        });
        api.mock(|when, then| {
            when.method(GET).path("/tasks/7");
            then.status(404);
        });

        let result = setup(&api).search(QuickSearchRequest::new("gone")).await;

        assert_eq!(result["data"][0]["title"], "Gone");
        assert!(result["data"][0].get("workflow_status_name").is_none());
    }

    #[tokio::test]
    async fn search_failure_is_reported_in_meta() {
        let api = MockServer::start();
        api.mock(|when, then| {
            when.method(GET).path("/search/quick");
            then.status(403).json_body(json!({"message": "Forbidden"}));
        });

        let result = setup(&api).search(QuickSearchRequest::new("secret")).await;

        assert_eq!(
            result,
            json!({
                "data": [],
                "meta": {"error": "Forbidden", "status_code": 403, "query": "secret"}
            })
        );
    }
}
