//! Local category list, edit mode and the mutations that go through the API.
//!
//! The list is a copy of server state. Adds and renames re-fetch it whole;
//! deletes patch it in place. Every mutation leaves a [`Notice`] behind for
//! the caller to show.
//!
//! Each operation is a [`Job`] that talks to the server and an
//! [`CategoryListEditor::apply`] step that folds the [`Outcome`] back in. The
//! async methods do both in one go; the TUI runs jobs on their own tasks.

use std::sync::Arc;

use crate::api::{ApiError, Category, CategoryApi, CategoryId, RecordFlag};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Outcome of the last user action, shown as a transient toast
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}

/// The one category being renamed, with its unsaved name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditState {
    pub id: CategoryId,
    pub draft: String,
}

pub struct CategoryListEditor {
    api: Arc<dyn CategoryApi>,
    categories: Vec<Category>,
    /// Input buffer for the next category to add
    pub new_name: String,
    edit: Option<EditState>,
    notice: Option<Notice>,
}

impl CategoryListEditor {
    pub fn new(api: Arc<dyn CategoryApi>) -> Self {
        Self {
            api,
            categories: Vec::new(),
            new_name: String::new(),
            edit: None,
            notice: None,
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn editing(&self) -> Option<&EditState> {
        self.edit.as_ref()
    }

    /// The buffer the input line is bound to: the draft while editing,
    /// otherwise the new-name buffer.
    pub fn input(&self) -> &str {
        match &self.edit {
            Some(edit) => &edit.draft,
            None => &self.new_name,
        }
    }

    pub fn input_mut(&mut self) -> &mut String {
        match &mut self.edit {
            Some(edit) => &mut edit.draft,
            None => &mut self.new_name,
        }
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    pub fn api(&self) -> Arc<dyn CategoryApi> {
        self.api.clone()
    }

    /// Replace the local list with the server's. Failures are logged only.
    pub async fn list(&mut self) {
        self.run(Job::Refresh).await;
    }

    pub async fn add(&mut self, name: &str) {
        if let Some(job) = self.prepare_add(name) {
            self.run(job).await;
        }
    }

    /// Start renaming `category`. Any other unsaved draft is dropped.
    pub fn begin_edit(&mut self, category: &Category) {
        if let Some(previous) = &self.edit {
            if previous.id != category.id {
                tracing::debug!(id = %previous.id, "abandoning unsaved edit");
            }
        }
        self.edit = Some(EditState {
            id: category.id.clone(),
            draft: category.name.clone(),
        });
    }

    pub fn cancel_edit(&mut self) {
        self.edit = None;
    }

    pub async fn save_edit(&mut self) {
        if let Some(job) = self.prepare_save() {
            self.run(job).await;
        }
    }

    /// Soft-delete on the server, then drop the row locally without re-fetching.
    pub async fn delete(&mut self, id: &CategoryId, name: &str) {
        self.run(Job::delete(id, name)).await;
    }

    /// Validate an add. Blank names leave an error notice and no job.
    pub fn prepare_add(&mut self, name: &str) -> Option<Job> {
        let name = name.trim();
        if name.is_empty() {
            self.notice = Some(Notice::error("Category name cannot be empty"));
            return None;
        }
        Some(Job::Add { name: name.to_string() })
    }

    /// Validate the current edit. `None` when not editing or the draft is blank.
    pub fn prepare_save(&mut self) -> Option<Job> {
        let edit = self.edit.as_ref()?;
        let name = edit.draft.trim().to_string();
        if name.is_empty() {
            self.notice = Some(Notice::error("Category name cannot be empty"));
            return None;
        }
        Some(Job::Rename {
            id: edit.id.clone(),
            name,
        })
    }

    async fn run(&mut self, job: Job) {
        let outcome = job.run(self.api.as_ref()).await;
        self.apply(outcome);
    }

    /// Fold a finished job back into the local state
    pub fn apply(&mut self, outcome: Outcome) {
        match outcome.refreshed {
            Some(Ok(categories)) => {
                tracing::debug!("fetched {} categories", categories.len());
                self.categories = categories;
            }
            Some(Err(e)) => tracing::warn!("Failed to fetch categories: {}", e),
            None => {}
        }

        match (outcome.job, outcome.result) {
            (Job::Refresh, _) => {}

            (Job::Add { name }, Ok(())) => {
                tracing::info!(category = %name, "category added");
                // Keep anything typed while the request was in flight
                if self.new_name.trim() == name {
                    self.new_name.clear();
                }
                self.notice = Some(Notice::success(format!("Added \"{}\"", name)));
            }
            (Job::Add { name }, Err(e)) => {
                tracing::error!(category = %name, "Failed to add category: {}", e);
                self.notice = Some(Notice::error(format!("Could not add \"{}\": {}", name, e)));
            }

            (Job::Rename { id, name }, Ok(())) => {
                tracing::info!(id = %id, category = %name, "category renamed");
                self.end_edit_of(&id);
                self.notice = Some(Notice::success(format!("Renamed to \"{}\"", name)));
            }
            (Job::Rename { id, .. }, Err(e)) => {
                tracing::error!(id = %id, "Failed to rename category: {}", e);
                self.notice = Some(Notice::error(format!("Could not rename: {}", e)));
            }

            (Job::Delete { id, name }, Ok(())) => {
                tracing::info!(id = %id, flag = RecordFlag::Delete.as_str(), "category deleted");
                self.categories.retain(|c| c.id != id);
                self.end_edit_of(&id);
                self.notice = Some(Notice::success(format!("Deleted \"{}\"", name)));
            }
            (Job::Delete { id, name }, Err(e)) => {
                tracing::error!(id = %id, "Failed to delete category: {}", e);
                self.notice = Some(Notice::error(format!("Could not delete \"{}\": {}", name, e)));
            }
        }
    }

    fn end_edit_of(&mut self, id: &CategoryId) {
        if self.edit.as_ref().is_some_and(|edit| &edit.id == id) {
            self.edit = None;
        }
    }
}

/// A validated request, detached from the editor so it can run on its own task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Job {
    Refresh,
    Add { name: String },
    Rename { id: CategoryId, name: String },
    Delete { id: CategoryId, name: String },
}

impl Job {
    pub fn delete(id: &CategoryId, name: &str) -> Self {
        Job::Delete {
            id: id.clone(),
            name: name.to_string(),
        }
    }

    /// Talk to the server. Successful adds and renames re-fetch the list.
    pub async fn run(self, api: &dyn CategoryApi) -> Outcome {
        let result = match &self {
            Job::Refresh => Ok(()),
            Job::Add { name } => api.insert(name).await,
            Job::Rename { id, name } => api.update(id, name, RecordFlag::Update).await,
            Job::Delete { id, name } => api.update(id, name, RecordFlag::Delete).await,
        };

        let refetch = match &self {
            Job::Refresh => true,
            Job::Add { .. } | Job::Rename { .. } => result.is_ok(),
            Job::Delete { .. } => false,
        };
        let refreshed = if refetch { Some(api.get_all().await) } else { None };

        Outcome {
            job: self,
            result,
            refreshed,
        }
    }
}

/// What the server said about a [`Job`]
#[derive(Debug)]
pub struct Outcome {
    job: Job,
    result: Result<(), ApiError>,
    refreshed: Option<Result<Vec<Category>, ApiError>>,
}
