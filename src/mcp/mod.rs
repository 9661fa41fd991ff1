//! MCP server exposing Productive.io data to AI assistants.
//!
//! Each tool fetches from the Productive API through the shared
//! [`ProductiveClient`], reduces the JSON:API document with the
//! [`Sanitizer`], and returns it as pretty-printed JSON text.

pub mod activity;
pub mod payloads;
mod types;

pub use types::*;

use chrono::Utc;
use rmcp::{
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerInfo},
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler, ServiceExt,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::client::{ApiError, ProductiveClient, QueryParams};
use crate::config::{clamp_page_size, Config, MAX_PAGE_SIZE};
use crate::sanitize::{fill_task_time_tracking, Sanitizer};

const DEFAULT_SEARCH_TYPES: &[&str] = &["action", "project", "task", "page"];
const MAX_HISTORY_HOURS: u32 = 8760;

#[derive(Clone)]
pub struct McpServer {
    client: ProductiveClient,
    sanitizer: Sanitizer,
    items_per_page: u32,
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    pub fn new(client: ProductiveClient, sanitizer: Sanitizer, items_per_page: u32) -> Self {
        Self {
            client,
            sanitizer,
            items_per_page: clamp_page_size(items_per_page),
            tool_router: Self::tool_router(),
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = ProductiveClient::new(config)?;
        Ok(Self::new(
            client,
            Sanitizer::new(&config.organization),
            config.items_per_page,
        ))
    }

    pub fn client(&self) -> &ProductiveClient {
        &self.client
    }

    fn api_err(e: ApiError, resource: &str) -> McpError {
        tracing::error!("Productive API error for {}: {}", resource, e);

        let data = Some(json!({
            "status_code": e.status_code(),
            "error_code": e.error_code(),
        }));
        let message = format!("{} ({})", e, resource);

        match e {
            ApiError::NotFound | ApiError::Client { .. } => McpError::invalid_params(message, data),
            _ => McpError::internal_error(message, data),
        }
    }

    fn page_size(&self, requested: Option<u32>) -> u32 {
        clamp_page_size(requested.unwrap_or(self.items_per_page))
    }

    fn paging(&self, page_number: Option<u32>, page_size: Option<u32>) -> QueryParams {
        let mut params = QueryParams::new();
        params.set_opt("page[number]", page_number);
        params.set("page[size]", self.page_size(page_size));
        params
    }

    fn to_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
        let json = serde_json::to_string_pretty(value)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    // ============================================================
    // Projects and tasks
    // ============================================================

    pub async fn fetch_projects(&self) -> Result<Value, McpError> {
        tracing::info!("Fetching all projects");
        let params = QueryParams::new().with("sort", "-last_activity_at");
        let result = self
            .client
            .get_projects(&params)
            .await
            .map_err(|e| Self::api_err(e, "projects"))?;
        Ok(self.sanitizer.filter_response(&result))
    }

    pub async fn fetch_tasks(&self, req: GetTasksRequest) -> Result<Value, McpError> {
        let mut params = self.paging(req.page_number, req.page_size);
        let sort = req.sort.unwrap_or_else(|| "-last_activity_at".into());
        if !sort.is_empty() {
            params.set("sort", sort);
        }
        params.set_opt("filter[project_id][eq]", req.project_id);
        params.set_opt("filter[assignee_id][eq]", req.user_id);
        if let Some(filters) = &req.extra_filters {
            params.merge_filters(filters);
        }

        tracing::info!("Fetching tasks");
        let result = self
            .client
            .get_tasks(&params)
            .await
            .map_err(|e| Self::api_err(e, "tasks"))?;
        Ok(self.sanitizer.filter_task_list(&result))
    }

    pub async fn fetch_task(&self, task_id: u64) -> Result<Value, McpError> {
        tracing::info!("Fetching task {}", task_id);
        let result = self
            .client
            .get_task(task_id)
            .await
            .map_err(|e| Self::api_err(e, &format!("task {}", task_id)))?;

        let mut filtered = self.sanitizer.filter_response(&result);
        fill_task_time_tracking(&mut filtered);
        Ok(filtered)
    }

    pub async fn fetch_task_history(&self, req: GetTaskHistoryRequest) -> Result<Value, McpError> {
        if req.hours == 0 || req.hours > MAX_HISTORY_HOURS {
            return Err(McpError::invalid_params(
                format!("hours must be between 1 and {}", MAX_HISTORY_HOURS),
                None,
            ));
        }

        tracing::info!("Fetching history for task {}", req.task_id);
        let task = self.fetch_task(req.task_id).await?;
        if task.get("data").map_or(true, Value::is_null) {
            tracing::error!("Task {} not found", req.task_id);
            return Ok(json!({
                "task_id": req.task_id,
                "error": "Task not found",
                "status_history": [],
                "assignment_history": [],
                "milestones": [],
                "activity_summary": {},
            }));
        }

        let activities = self
            .fetch_recent_activity(GetRecentActivityRequest {
                hours: req.hours,
                task_id: Some(req.task_id),
                max_results: Some(activity::HISTORY_ACTIVITY_LIMIT),
                ..Default::default()
            })
            .await?;
        let items = activities
            .get("data")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let history = activity::build_task_history(req.task_id, items);
        serde_json::to_value(history).map_err(|e| McpError::internal_error(e.to_string(), None))
    }

    // ============================================================
    // Comments and todos
    // ============================================================

    pub async fn fetch_comments(&self, req: GetCommentsRequest) -> Result<Value, McpError> {
        let mut params = self.paging(req.page_number, req.page_size);
        params.set_opt("filter[project_id][eq]", req.project_id);
        params.set_opt("filter[task_id][eq]", req.task_id);
        if let Some(filters) = &req.extra_filters {
            params.merge_filters(filters);
        }
        params.set("sort", "-created_at");

        tracing::info!("Fetching comments");
        let result = self
            .client
            .get_comments(&params)
            .await
            .map_err(|e| Self::api_err(e, "comments"))?;
        Ok(self.sanitizer.filter_response(&result))
    }

    pub async fn fetch_comment(&self, comment_id: u64) -> Result<Value, McpError> {
        tracing::info!("Fetching comment {}", comment_id);
        let result = self
            .client
            .get_comment(comment_id)
            .await
            .map_err(|e| Self::api_err(e, &format!("comment {}", comment_id)))?;
        Ok(self.sanitizer.filter_response(&result))
    }

    pub async fn fetch_todos(&self, req: GetTodosRequest) -> Result<Value, McpError> {
        let mut params = self.paging(req.page_number, req.page_size);
        params.set_opt("filter[task_id]", req.task_id);
        if let Some(filters) = &req.extra_filters {
            params.merge_filters(filters);
        }

        tracing::info!("Fetching todos");
        let result = self
            .client
            .get_todos(&params)
            .await
            .map_err(|e| Self::api_err(e, "todos"))?;
        Ok(self.sanitizer.filter_response(&result))
    }

    pub async fn fetch_todo(&self, todo_id: u64) -> Result<Value, McpError> {
        tracing::info!("Fetching todo {}", todo_id);
        let result = self
            .client
            .get_todo(todo_id)
            .await
            .map_err(|e| Self::api_err(e, &format!("todo {}", todo_id)))?;
        Ok(self.sanitizer.filter_response(&result))
    }

    // ============================================================
    // Activity
    // ============================================================

    pub async fn fetch_recent_activity(
        &self,
        req: GetRecentActivityRequest,
    ) -> Result<Value, McpError> {
        let mut max_results = req.max_results.unwrap_or(self.items_per_page);
        if max_results > MAX_PAGE_SIZE {
            tracing::warn!("max_results exceeds API limit of {0}, using {0}", MAX_PAGE_SIZE);
            max_results = MAX_PAGE_SIZE;
        }
        let cutoff_time = activity::cutoff(Utc::now(), req.hours);

        let mut params = QueryParams::new()
            .with("filter[after]", &cutoff_time)
            .with("page[size]", max_results.max(1));
        params.set_opt("filter[person_id]", req.user_id);
        params.set_opt("filter[project_id]", req.project_id);
        params.set_opt("filter[type]", req.activity_type);
        params.set_opt("filter[item_type]", req.item_type.filter(|s| !s.is_empty()));
        params.set_opt("filter[event]", req.event_type.filter(|s| !s.is_empty()));
        params.set_opt("filter[task_id]", req.task_id);

        tracing::info!("Fetching activities from the last {} hours", req.hours);
        let result = self
            .client
            .get_activities(&params)
            .await
            .map_err(|e| Self::api_err(e, "activities"))?;

        let filters_applied = activity::applied_filters(&params);
        let has_data = result
            .get("data")
            .and_then(Value::as_array)
            .is_some_and(|items| !items.is_empty());
        if !has_data {
            tracing::info!("No recent activities found");
            return Ok(json!({
                "data": [],
                "meta": {
                    "message": format!("No activities found in the last {} hours", req.hours),
                    "hours": req.hours,
                    "filters_applied": filters_applied,
                    "cutoff_time": cutoff_time,
                }
            }));
        }

        let mut filtered = self.sanitizer.filter_response(&result);
        let items = filtered
            .get("data")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let summary = activity::summarize(items);
        let total = items.len();

        if let Value::Object(document) = &mut filtered {
            let meta = document.entry("meta").or_insert_with(|| json!({}));
            if let Value::Object(meta) = meta {
                meta.insert("activity_summary".into(), json!(summary));
                meta.insert("total_activities".into(), json!(total));
                meta.insert("filters_applied".into(), Value::Object(filters_applied));
                meta.insert("cutoff_time".into(), Value::String(cutoff_time));
            }
        }

        tracing::info!("Retrieved {} recent activities", total);
        Ok(filtered)
    }

    // ============================================================
    // Pages
    // ============================================================

    pub async fn fetch_pages(&self, req: GetPagesRequest) -> Result<Value, McpError> {
        let mut params = self.paging(req.page_number, req.page_size);
        params.set_opt("filter[project_id][eq]", req.project_id);
        params.set_opt("filter[creator_id][eq]", req.creator_id);
        params.set("sort", "-updated_at");

        tracing::info!("Fetching pages");
        let result = self
            .client
            .get_pages(&params)
            .await
            .map_err(|e| Self::api_err(e, "pages"))?;
        Ok(self.sanitizer.filter_page_list(&result))
    }

    pub async fn fetch_page(&self, page_id: u64) -> Result<Value, McpError> {
        tracing::info!("Fetching page {}", page_id);
        let result = self
            .client
            .get_page(page_id)
            .await
            .map_err(|e| Self::api_err(e, &format!("page {}", page_id)))?;
        Ok(self.sanitizer.filter_response(&result))
    }

    pub async fn submit_new_page(&self, req: CreatePageRequest) -> Result<Value, McpError> {
        tracing::info!("Creating page '{}' in project {}", req.title, req.project_id);
        let payload =
            payloads::create_page(&req.title, req.project_id, &req.body, req.parent_page_id);
        self.client
            .create_page(&payload)
            .await
            .map_err(|e| Self::api_err(e, "page"))
    }

    pub async fn submit_page_update(&self, req: UpdatePageRequest) -> Result<Value, McpError> {
        let Some(payload) =
            payloads::update_page(req.page_id, req.title.as_deref(), req.body.as_deref())
        else {
            tracing::warn!("No fields provided for update of page {}", req.page_id);
            return Ok(json!({"message": "No changes made - no fields provided"}));
        };

        tracing::info!("Updating page {}", req.page_id);
        self.client
            .update_page(req.page_id, &payload)
            .await
            .map_err(|e| Self::api_err(e, &format!("page {}", req.page_id)))
    }

    // ============================================================
    // Attachments and people
    // ============================================================

    pub async fn fetch_attachments(&self, req: GetAttachmentsRequest) -> Result<Value, McpError> {
        let mut params = self.paging(req.page_number, req.page_size);
        if let Some(filters) = &req.extra_filters {
            params.merge_filters(filters);
        }

        tracing::info!("Fetching attachments");
        let result = self
            .client
            .get_attachments(&params)
            .await
            .map_err(|e| Self::api_err(e, "attachments"))?;
        Ok(self.sanitizer.filter_response(&result))
    }

    pub async fn fetch_attachment(&self, attachment_id: u64) -> Result<Value, McpError> {
        tracing::info!("Fetching attachment {}", attachment_id);
        let result = self
            .client
            .get_attachment(attachment_id)
            .await
            .map_err(|e| Self::api_err(e, &format!("attachment {}", attachment_id)))?;
        Ok(self.sanitizer.filter_response(&result))
    }

    pub async fn fetch_people(&self, req: GetPeopleRequest) -> Result<Value, McpError> {
        let mut params = self.paging(req.page_number, req.page_size);
        params.set("sort", "-last_seen_at");

        tracing::info!("Fetching people");
        let result = self
            .client
            .get_people(&params)
            .await
            .map_err(|e| Self::api_err(e, "people"))?;
        Ok(self.sanitizer.filter_response(&result))
    }

    pub async fn fetch_person(&self, person_id: u64) -> Result<Value, McpError> {
        tracing::info!("Fetching person {}", person_id);
        let result = self
            .client
            .get_person(person_id)
            .await
            .map_err(|e| Self::api_err(e, &format!("person {}", person_id)))?;
        Ok(self.sanitizer.filter_response(&result))
    }

    // ============================================================
    // Search
    // ============================================================

    /// Search failures are reported in `meta.error` rather than as MCP errors.
    pub async fn search(&self, req: QuickSearchRequest) -> Value {
        let search_types = req
            .search_types
            .unwrap_or_else(|| DEFAULT_SEARCH_TYPES.iter().map(|t| t.to_string()).collect());

        tracing::info!("Quick search with query: '{}'", req.query);
        let result = match self
            .client
            .quick_search(
                &req.query,
                &search_types,
                req.deep_search,
                req.page,
                req.per_page,
            )
            .await
        {
            Ok(result) => result,
            Err(e) => {
                tracing::error!("Quick search failed: {}", e.message());
                return json!({
                    "data": [],
                    "meta": {
                        "error": e.to_string(),
                        "status_code": e.status_code(),
                        "query": req.query,
                    }
                });
            }
        };

        let hits = result
            .get("data")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let mut data = Vec::with_capacity(hits.len());
        for hit in hits {
            data.push(self.search_hit(hit).await);
        }

        json!({
            "data": data,
            "meta": {
                "query": req.query,
                "search_types": search_types,
                "deep_search": req.deep_search,
                "page": req.page,
                "per_page": req.per_page,
                "total_results": data.len(),
            }
        })
    }

    /// Flatten one search hit; task hits are hydrated with their workflow status.
    async fn search_hit(&self, hit: &Value) -> Value {
        let empty = Value::Object(Default::default());
        let attributes = hit.get("attributes").unwrap_or(&empty);
        let text = |key: &str| attributes.get(key).cloned().unwrap_or_else(|| json!(""));

        let record_type = attributes
            .get("record_type")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let record_id = match attributes.get("record_id") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };

        let mut item = json!({
            "record_id": text("record_id"),
            "record_type": text("record_type"),
            "title": text("title"),
            "subtitle": text("subtitle"),
            "icon_url": attributes.get("icon_url").cloned().unwrap_or(Value::Null),
            "status": text("status"),
            "project_name": attributes
                .get("meta")
                .and_then(|meta| meta.get("project_name"))
                .cloned()
                .unwrap_or_else(|| json!("")),
            "updated_at": text("updated_at"),
            "webapp_url": self
                .sanitizer
                .webapp_url(&format!("{}s", record_type), &record_id),
        });

        if record_type != "task" || record_id.is_empty() {
            return item;
        }

        let task_id = match record_id.parse::<u64>() {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!("Could not fetch workflow status for task {}: {}", record_id, e);
                return item;
            }
        };

        match self.client.get_task(task_id).await {
            Ok(task) => {
                let filtered = self.sanitizer.filter_response(&task);
                let data = filtered.get("data");
                if let Some(name) = data
                    .and_then(|d| d.get("attributes"))
                    .and_then(|a| a.get("workflow_status_name"))
                    .filter(|name| !name.is_null())
                {
                    item["workflow_status_name"] = name.clone();
                }
                if let Some(url) = data.and_then(|d| d.get("webapp_url")) {
                    item["webapp_url"] = url.clone();
                }
            }
            Err(e) => {
                tracing::warn!("Could not fetch workflow status for task {}: {}", record_id, e);
            }
        }

        item
    }
}

#[tool_router]
impl McpServer {
    // ============================================================
    // Projects and tasks
    // ============================================================

    #[tool(
        description = "Get all active projects with budgets, deadlines, and team assignments. Results are sorted by most recent activity."
    )]
    async fn get_projects(&self) -> Result<CallToolResult, McpError> {
        let result = self.fetch_projects().await?;
        Self::to_result(&result)
    }

    #[tool(
        description = "Get tasks with optional filtering and pagination. Returns a lightweight list (title, task number, status, time tracking, workflow status name and webapp_url). Use get_task for full details."
    )]
    async fn get_tasks(
        &self,
        params: Parameters<GetTasksRequest>,
    ) -> Result<CallToolResult, McpError> {
        let result = self.fetch_tasks(params.0).await?;
        Self::to_result(&result)
    }

    #[tool(
        description = "Get detailed task information by its internal ID, including description, assignee, time tracking (estimates, worked, billable and remaining time) and workflow status."
    )]
    async fn get_task(
        &self,
        params: Parameters<GetTaskRequest>,
    ) -> Result<CallToolResult, McpError> {
        let result = self.fetch_task(params.0.task_id).await?;
        Self::to_result(&result)
    }

    #[tool(
        description = "Get comprehensive history for a task: status changes, assignment changes, milestones, and an activity summary. Looks back 720 hours (30 days) by default."
    )]
    async fn get_task_history(
        &self,
        params: Parameters<GetTaskHistoryRequest>,
    ) -> Result<CallToolResult, McpError> {
        let result = self.fetch_task_history(params.0).await?;
        Self::to_result(&result)
    }

    // ============================================================
    // Comments and todos
    // ============================================================

    #[tool(
        description = "Get comments with optional filtering by project or task. Newest comments first. Comment bodies are returned as plain text."
    )]
    async fn get_comments(
        &self,
        params: Parameters<GetCommentsRequest>,
    ) -> Result<CallToolResult, McpError> {
        let result = self.fetch_comments(params.0).await?;
        Self::to_result(&result)
    }

    #[tool(description = "Get a single comment by ID, including its body and author.")]
    async fn get_comment(
        &self,
        params: Parameters<GetCommentRequest>,
    ) -> Result<CallToolResult, McpError> {
        let result = self.fetch_comment(params.0.comment_id).await?;
        Self::to_result(&result)
    }

    #[tool(description = "Get todo checklist items, optionally filtered by task.")]
    async fn get_todos(
        &self,
        params: Parameters<GetTodosRequest>,
    ) -> Result<CallToolResult, McpError> {
        let result = self.fetch_todos(params.0).await?;
        Self::to_result(&result)
    }

    #[tool(description = "Get a single todo checklist item by ID.")]
    async fn get_todo(
        &self,
        params: Parameters<GetTodoRequest>,
    ) -> Result<CallToolResult, McpError> {
        let result = self.fetch_todo(params.0.todo_id).await?;
        Self::to_result(&result)
    }

    // ============================================================
    // Activity
    // ============================================================

    #[tool(
        description = "Summarize recent activity (comments, changesets, emails) within a time window. Supports filtering by person, project, activity type, item type, event and task. The response meta includes counts by type, event and item type."
    )]
    async fn get_recent_activity(
        &self,
        params: Parameters<GetRecentActivityRequest>,
    ) -> Result<CallToolResult, McpError> {
        let result = self.fetch_recent_activity(params.0).await?;
        Self::to_result(&result)
    }

    // ============================================================
    // Pages
    // ============================================================

    #[tool(
        description = "List documentation pages, optionally filtered by project or creator. Page bodies are omitted; use get_page for full content."
    )]
    async fn get_pages(
        &self,
        params: Parameters<GetPagesRequest>,
    ) -> Result<CallToolResult, McpError> {
        let result = self.fetch_pages(params.0).await?;
        Self::to_result(&result)
    }

    #[tool(description = "Get a single documentation page by ID, including its full body.")]
    async fn get_page(
        &self,
        params: Parameters<GetPageRequest>,
    ) -> Result<CallToolResult, McpError> {
        let result = self.fetch_page(params.0.page_id).await?;
        Self::to_result(&result)
    }

    #[tool(
        description = "Create a new documentation page in a project, optionally nested under a parent page."
    )]
    async fn create_page(
        &self,
        params: Parameters<CreatePageRequest>,
    ) -> Result<CallToolResult, McpError> {
        let result = self.submit_new_page(params.0).await?;
        Self::to_result(&result)
    }

    #[tool(
        description = "Update an existing page. Only the provided fields (title, body) are changed."
    )]
    async fn update_page(
        &self,
        params: Parameters<UpdatePageRequest>,
    ) -> Result<CallToolResult, McpError> {
        let result = self.submit_page_update(params.0).await?;
        Self::to_result(&result)
    }

    // ============================================================
    // Attachments and people
    // ============================================================

    #[tool(description = "List file attachments with optional filters.")]
    async fn get_attachments(
        &self,
        params: Parameters<GetAttachmentsRequest>,
    ) -> Result<CallToolResult, McpError> {
        let result = self.fetch_attachments(params.0).await?;
        Self::to_result(&result)
    }

    #[tool(description = "Get a single attachment's metadata by ID.")]
    async fn get_attachment(
        &self,
        params: Parameters<GetAttachmentRequest>,
    ) -> Result<CallToolResult, McpError> {
        let result = self.fetch_attachment(params.0.attachment_id).await?;
        Self::to_result(&result)
    }

    #[tool(description = "List people in the organization, most recently seen first.")]
    async fn get_people(
        &self,
        params: Parameters<GetPeopleRequest>,
    ) -> Result<CallToolResult, McpError> {
        let result = self.fetch_people(params.0).await?;
        Self::to_result(&result)
    }

    #[tool(description = "Get a single person by ID.")]
    async fn get_person(
        &self,
        params: Parameters<GetPersonRequest>,
    ) -> Result<CallToolResult, McpError> {
        let result = self.fetch_person(params.0.person_id).await?;
        Self::to_result(&result)
    }

    // ============================================================
    // Search
    // ============================================================

    #[tool(
        description = "Quick search across projects, tasks, pages and actions. Returns flattened hits with a webapp_url; task hits include their workflow status name."
    )]
    async fn quick_search(
        &self,
        params: Parameters<QuickSearchRequest>,
    ) -> Result<CallToolResult, McpError> {
        let result = self.search(params.0).await;
        Self::to_result(&result)
    }
}

#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: rmcp::model::Implementation {
                name: "productive-mcp".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                title: None,
                icons: None,
                website_url: None,
            },
            capabilities: rmcp::model::ServerCapabilities::builder()
                .enable_tools()
                .build(),
            instructions: Some(
                r#"Access Productive.io data: projects, tasks, pages, comments, todos, people and recent activity.

Responses are reduced for readability: pagination links, empty values and noisy
fields are removed, HTML is stripped from descriptions and comment bodies, and
each resource carries a webapp_url linking to the Productive web app.

Use get_tasks for lightweight task lists and get_task for full details.
Use get_task_history for a task's status changes, assignments and milestones.
Use get_recent_activity to see what changed in a time window.
Use quick_search when you only know a name or keyword."#
                    .into(),
            ),
            ..Default::default()
        }
    }
}

/// Run the MCP server over stdio until the client disconnects.
pub async fn run_stdio_server(config: &Config) -> anyhow::Result<()> {
    use tokio::io::{stdin, stdout};

    tracing::info!("Starting MCP server via stdio");

    let service = McpServer::from_config(config)?;
    let client = service.client().clone();
    let server = service.serve((stdin(), stdout())).await?;

    let quit_reason = server.waiting().await?;
    tracing::info!("MCP server stopped: {:?}", quit_reason);

    client.close();
    Ok(())
}
