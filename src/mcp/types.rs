//! Request types for MCP tools.

use std::collections::HashMap;

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

// ============================================================
// Tasks
// ============================================================

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct GetTasksRequest {
    #[schemars(description = "Filter tasks by project ID")]
    #[serde(default)]
    pub project_id: Option<u64>,
    #[schemars(description = "Filter tasks by assignee/user ID")]
    #[serde(default)]
    pub user_id: Option<u64>,
    #[schemars(description = "Page number for pagination")]
    #[serde(default)]
    pub page_number: Option<u32>,
    #[schemars(description = "Optional number of tasks per page (max 200)")]
    #[serde(default)]
    pub page_size: Option<u32>,
    #[schemars(
        description = "Sort parameter (e.g., 'last_activity_at', '-last_activity_at', 'created_at', 'due_date'). Use '-' prefix for descending order. Defaults to '-last_activity_at' (most recent first)."
    )]
    #[serde(default)]
    pub sort: Option<String>,
    #[schemars(
        description = "Additional Productive query filters using API syntax. Common filters: filter[status][eq] (1: open, 2: closed), filter[due_date][gte] (date), filter[workflow_status_category_id][eq] (1: not started, 2: started, 3: closed)."
    )]
    #[serde(default)]
    pub extra_filters: Option<HashMap<String, Value>>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetTaskRequest {
    #[schemars(description = "The unique Productive task identifier (internal ID)")]
    pub task_id: u64,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetTaskHistoryRequest {
    #[schemars(description = "The unique Productive task identifier (internal ID)")]
    pub task_id: u64,
    #[schemars(
        description = "Number of hours to look back for activity history (default: 720 = 30 days, max: 8760)"
    )]
    #[serde(default = "default_history_hours")]
    pub hours: u32,
}

fn default_history_hours() -> u32 {
    720
}

// ============================================================
// Comments and todos
// ============================================================

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct GetCommentsRequest {
    #[schemars(description = "Productive project ID to filter comments by")]
    #[serde(default)]
    pub project_id: Option<u64>,
    #[schemars(description = "Productive task ID to filter comments by")]
    #[serde(default)]
    pub task_id: Option<u64>,
    #[schemars(description = "Page number for pagination")]
    #[serde(default)]
    pub page_number: Option<u32>,
    #[schemars(description = "Optional number of comments per page (max 200)")]
    #[serde(default)]
    pub page_size: Option<u32>,
    #[schemars(
        description = "Additional Productive query filters using API syntax. Common filters: filter[project_id][eq] (ID), filter[task_id][eq] (ID), filter[discussion_id][eq] (ID)."
    )]
    #[serde(default)]
    pub extra_filters: Option<HashMap<String, Value>>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetCommentRequest {
    #[schemars(description = "Productive comment ID")]
    pub comment_id: u64,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct GetTodosRequest {
    #[schemars(description = "Productive task ID to filter todos by")]
    #[serde(default)]
    pub task_id: Option<u64>,
    #[schemars(description = "Page number for pagination")]
    #[serde(default)]
    pub page_number: Option<u32>,
    #[schemars(description = "Optional number of todos per page (max 200)")]
    #[serde(default)]
    pub page_size: Option<u32>,
    #[schemars(
        description = "Additional Productive query filters using API syntax. Common filters: filter[task_id][eq] (ID), filter[status][eq] (1: open, 2: closed), filter[assignee_id][eq] (ID)."
    )]
    #[serde(default)]
    pub extra_filters: Option<HashMap<String, Value>>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetTodoRequest {
    #[schemars(description = "Productive todo ID")]
    pub todo_id: u64,
}

// ============================================================
// Activity
// ============================================================

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetRecentActivityRequest {
    #[schemars(description = "Number of hours to look back (default: 24, use 168 for a week)")]
    #[serde(default = "default_activity_hours")]
    pub hours: u32,
    #[schemars(description = "Optional: Filter by specific user/person ID")]
    #[serde(default)]
    pub user_id: Option<u64>,
    #[schemars(description = "Optional: Filter by specific project ID")]
    #[serde(default)]
    pub project_id: Option<u64>,
    #[schemars(
        description = "Optional: Filter by activity type (1: Comment, 2: Changeset, 3: Email)"
    )]
    #[serde(default)]
    pub activity_type: Option<u32>,
    #[schemars(
        description = "Optional: Filter by item type. Accepted values include: Task, Page, Project, Person, Discussion, TimeEntry, Section, TaskList, Dashboard, Team. Note: This list is not exhaustive."
    )]
    #[serde(default)]
    pub item_type: Option<String>,
    #[schemars(
        description = "Optional: Filter by event type. Common values include: create, copy, edit, delete. Note: Use get_tasks with filter[status][eq]=2 to find closed tasks."
    )]
    #[serde(default)]
    pub event_type: Option<String>,
    #[schemars(description = "Optional: Filter by specific task ID")]
    #[serde(default)]
    pub task_id: Option<u64>,
    #[schemars(description = "Optional maximum number of activities to return (max: 200)")]
    #[serde(default)]
    pub max_results: Option<u32>,
}

impl Default for GetRecentActivityRequest {
    fn default() -> Self {
        Self {
            hours: default_activity_hours(),
            user_id: None,
            project_id: None,
            activity_type: None,
            item_type: None,
            event_type: None,
            task_id: None,
            max_results: None,
        }
    }
}

fn default_activity_hours() -> u32 {
    24
}

// ============================================================
// Pages
// ============================================================

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct GetPagesRequest {
    #[schemars(description = "Optional project ID to filter pages by")]
    #[serde(default)]
    pub project_id: Option<u64>,
    #[schemars(description = "Optional creator ID to filter pages by")]
    #[serde(default)]
    pub creator_id: Option<u64>,
    #[schemars(description = "Page number for pagination")]
    #[serde(default)]
    pub page_number: Option<u32>,
    #[schemars(description = "Optional number of pages per page (max 200)")]
    #[serde(default)]
    pub page_size: Option<u32>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetPageRequest {
    #[schemars(description = "The unique Productive page identifier")]
    pub page_id: u64,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreatePageRequest {
    #[schemars(description = "Page title")]
    pub title: String,
    #[schemars(description = "Project ID where the page will be created")]
    pub project_id: u64,
    #[schemars(description = "Page content/body (supports HTML/markdown)")]
    #[serde(default)]
    pub body: String,
    #[schemars(description = "Optional parent page ID for nested pages")]
    #[serde(default)]
    pub parent_page_id: Option<u64>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdatePageRequest {
    #[schemars(description = "The unique Productive page identifier")]
    pub page_id: u64,
    #[schemars(description = "Optional new page title")]
    #[serde(default)]
    pub title: Option<String>,
    #[schemars(description = "Optional new page content/body")]
    #[serde(default)]
    pub body: Option<String>,
}

// ============================================================
// Attachments and people
// ============================================================

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct GetAttachmentsRequest {
    #[schemars(description = "Page number for pagination")]
    #[serde(default)]
    pub page_number: Option<u32>,
    #[schemars(description = "Optional number of attachments per page (max 200)")]
    #[serde(default)]
    pub page_size: Option<u32>,
    #[schemars(description = "Additional Productive query filters using API syntax")]
    #[serde(default)]
    pub extra_filters: Option<HashMap<String, Value>>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetAttachmentRequest {
    #[schemars(description = "Productive attachment ID")]
    pub attachment_id: u64,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct GetPeopleRequest {
    #[schemars(description = "Page number for pagination")]
    #[serde(default)]
    pub page_number: Option<u32>,
    #[schemars(description = "Optional number of people per page (max 200)")]
    #[serde(default)]
    pub page_size: Option<u32>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetPersonRequest {
    #[schemars(description = "The unique Productive person identifier")]
    pub person_id: u64,
}

// ============================================================
// Search
// ============================================================

#[derive(Debug, Deserialize, JsonSchema)]
pub struct QuickSearchRequest {
    #[schemars(description = "Search query string")]
    pub query: String,
    #[schemars(
        description = "List of types to search (action, project, task, page). Defaults to all."
    )]
    #[serde(default)]
    pub search_types: Option<Vec<String>>,
    #[schemars(description = "Whether to perform deep search (default: true)")]
    #[serde(default = "default_true")]
    pub deep_search: bool,
    #[schemars(description = "Page number for pagination (default: 1)")]
    #[serde(default = "default_search_page")]
    pub page: u32,
    #[schemars(description = "Results per page (default: 50)")]
    #[serde(default = "default_search_per_page")]
    pub per_page: u32,
}

impl QuickSearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            search_types: None,
            deep_search: true,
            page: default_search_page(),
            per_page: default_search_per_page(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_search_page() -> u32 {
    1
}

fn default_search_per_page() -> u32 {
    50
}
