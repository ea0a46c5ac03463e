//! One-shot commands: run a single operation, hand back what to print, exit.

use anyhow::{Context, Result};

use crate::api::{Category, CategoryApi, CategoryId};
use crate::editor::CategoryListEditor;

/// All categories as pretty JSON
pub async fn list(api: &dyn CategoryApi) -> Result<String> {
    let categories = api.get_all().await.context("Failed to fetch categories")?;
    Ok(serde_json::to_string_pretty(&categories)?)
}

pub async fn add(editor: &mut CategoryListEditor, name: &str) -> Result<String> {
    editor.add(name).await;
    report(editor)
}

pub async fn rename(editor: &mut CategoryListEditor, id: &str, name: &str) -> Result<String> {
    // The old name is not needed to rename, only the id
    editor.begin_edit(&Category::new(id, ""));
    editor.input_mut().push_str(name);
    editor.save_edit().await;
    report(editor)
}

pub async fn delete(editor: &mut CategoryListEditor, id: &str) -> Result<String> {
    // The endpoint wants the name alongside the id
    let categories = editor
        .api()
        .get_all()
        .await
        .context("Failed to fetch categories")?;

    let id = CategoryId::new(id);
    let name = categories
        .into_iter()
        .find(|c| c.id == id)
        .map(|c| c.name)
        .ok_or_else(|| anyhow::anyhow!("No category with id {}", id))?;

    editor.delete(&id, &name).await;
    report(editor)
}

/// The editor's notice as a message; an error notice becomes the exit status
fn report(editor: &mut CategoryListEditor) -> Result<String> {
    match editor.take_notice() {
        Some(notice) if notice.is_error() => anyhow::bail!(notice.message),
        Some(notice) => Ok(notice.message),
        None => Ok(String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{Call, FakeApi, Op};
    use crate::api::RecordFlag;
    use std::sync::Arc;

    fn editor_with(categories: Vec<Category>) -> (Arc<FakeApi>, CategoryListEditor) {
        let api = Arc::new(FakeApi::with_categories(categories));
        let editor = CategoryListEditor::new(api.clone());
        (api, editor)
    }

    #[tokio::test]
    async fn test_list_prints_json() {
        let (api, _) = editor_with(vec![Category::new("1", "Food")]);

        let out = list(api.as_ref()).await.unwrap();

        assert!(out.contains("\"MAIN_CAT_ID\": \"1\""));
        assert!(out.contains("\"MAIN_CAT_NAME\": \"Food\""));
    }

    #[tokio::test]
    async fn test_add_reports_success() {
        let (api, mut editor) = editor_with(vec![]);

        let out = add(&mut editor, "Toys").await.unwrap();

        assert_eq!(out, "Added \"Toys\"");
        assert_eq!(api.stored(), vec![Category::new("1", "Toys")]);
    }

    #[tokio::test]
    async fn test_rename_sends_new_name() {
        let (api, mut editor) = editor_with(vec![Category::new("1", "Food")]);

        let out = rename(&mut editor, "1", "Groceries").await.unwrap();

        assert_eq!(out, "Renamed to \"Groceries\"");
        assert_eq!(
            api.calls()[0],
            Call::Update(CategoryId::new("1"), "Groceries".to_string(), RecordFlag::Update)
        );
    }

    #[tokio::test]
    async fn test_rename_blank_name_fails_without_call() {
        let (api, mut editor) = editor_with(vec![Category::new("1", "Food")]);

        let err = rename(&mut editor, "1", "   ").await.unwrap_err();

        assert_eq!(err.to_string(), "Category name cannot be empty");
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_rename_rejected_by_server_fails() {
        let (api, mut editor) = editor_with(vec![Category::new("1", "Food")]);
        api.fail(Op::Update);

        let err = rename(&mut editor, "1", "Groceries").await.unwrap_err();

        assert!(err.to_string().starts_with("Could not rename"));
        assert_eq!(api.stored(), vec![Category::new("1", "Food")]);
    }

    #[tokio::test]
    async fn test_delete_looks_up_name() {
        let (api, mut editor) = editor_with(vec![
            Category::new("1", "Food"),
            Category::new("2", "Toys"),
        ]);

        let out = delete(&mut editor, "2").await.unwrap();

        assert_eq!(out, "Deleted \"Toys\"");
        assert_eq!(
            api.calls(),
            vec![
                Call::GetAll,
                Call::Update(CategoryId::new("2"), "Toys".to_string(), RecordFlag::Delete),
            ]
        );
    }

    #[tokio::test]
    async fn test_delete_unknown_id_fails() {
        let (api, mut editor) = editor_with(vec![Category::new("1", "Food")]);

        let err = delete(&mut editor, "9").await.unwrap_err();

        assert_eq!(err.to_string(), "No category with id 9");
        assert_eq!(api.calls(), vec![Call::GetAll]);
    }

    #[tokio::test]
    async fn test_delete_reports_fetch_failure() {
        let (api, mut editor) = editor_with(vec![Category::new("1", "Food")]);
        api.fail(Op::GetAll);

        let err = delete(&mut editor, "1").await.unwrap_err();

        assert_eq!(err.to_string(), "Failed to fetch categories");
        assert!(format!("{:#}", err).contains("503"));
        assert_eq!(api.stored().len(), 1);
    }
}
