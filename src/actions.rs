// Action handlers: each is one atomic mutate-then-save unit over a Store

use crate::store::Store;
use crate::task::{Category, EditRequest, Priority, Task};
use chrono::NaiveDate;
use eyre::{Context, Result, eyre};
use tracing::debug;

/// Raw field values collected by the UI surface for a new task.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub text: String,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub due: Option<String>,
}

/// Add a task built from raw input. Whitespace-only text is silently
/// ignored (`Ok(None)`, list unchanged); invalid category/priority values
/// fall back to their defaults and an unparsable due date is dropped.
/// Returns the new task's id.
pub fn add(store: &mut Store, input: NewTask) -> Result<Option<String>> {
    let text = input.text.trim();
    if text.is_empty() {
        debug!("Ignoring add with empty text");
        return Ok(None);
    }

    let category = input.category.as_deref().and_then(Category::parse).unwrap_or_default();
    let priority = input.priority.as_deref().and_then(Priority::parse).unwrap_or_default();
    let due = input
        .due
        .as_deref()
        .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok());

    let task = Task::new(text, category, priority, due);
    let id = task.id.clone();
    store.add(task);
    store.save()?;
    Ok(Some(id))
}

/// Flip a task's completion state. Missing id is a no-op; returns whether
/// anything changed.
pub fn toggle(store: &mut Store, id: &str) -> Result<bool> {
    if !store.update(id, |t| t.completed = !t.completed) {
        debug!(id, "Toggle on unknown id, no-op");
        return Ok(false);
    }
    store.save()?;
    Ok(true)
}

/// Apply an edit request to a task, field by field; each field keeps its
/// previous value when the new one is empty or invalid. Missing id is a
/// no-op; returns whether the task was found.
pub fn edit(store: &mut Store, id: &str, request: &EditRequest) -> Result<bool> {
    if !store.update(id, |t| request.apply_to(t)) {
        debug!(id, "Edit on unknown id, no-op");
        return Ok(false);
    }
    store.save()?;
    Ok(true)
}

/// Remove a task. Missing id is a no-op; returns whether anything was
/// removed. Confirmation is the caller's concern.
pub fn delete(store: &mut Store, id: &str) -> Result<bool> {
    if !store.remove(id) {
        debug!(id, "Delete on unknown id, no-op");
        return Ok(false);
    }
    store.save()?;
    Ok(true)
}

/// Empty the whole list. Confirmation is the caller's concern.
pub fn clear_all(store: &mut Store) -> Result<()> {
    store.clear();
    store.save()?;
    Ok(())
}

/// The current list as a pretty-printed JSON array, the same shape as the
/// persisted file.
pub fn export(store: &Store) -> Result<String> {
    serde_json::to_string_pretty(store.tasks()).context("Failed to serialize task list")
}

/// Replace the list with the contents of an uploaded document. The payload
/// must be a JSON array of task-shaped records; anything else is rejected
/// with the prior list left untouched. Returns the number of imported
/// tasks.
pub fn import(store: &mut Store, payload: &str) -> Result<usize> {
    let value: serde_json::Value =
        serde_json::from_str(payload).context("Import payload is not valid JSON")?;

    let Some(items) = value.as_array() else {
        return Err(eyre!("Import payload is not a JSON array"));
    };

    let mut tasks = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let task: Task = serde_json::from_value(item.clone())
            .with_context(|| format!("Import record {i} is not task-shaped"))?;
        tasks.push(task);
    }

    let count = tasks.len();
    store.replace(tasks);
    store.save()?;
    debug!(count, "Imported task list");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::stats;
    use tempfile::TempDir;

    fn open(temp: &TempDir) -> Store {
        Store::open(temp.path().join("tasks.json")).unwrap()
    }

    fn new_task(text: &str) -> NewTask {
        NewTask {
            text: text.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_add_then_toggle_scenario() {
        let temp = TempDir::new().unwrap();
        let mut store = open(&temp);

        let id = add(
            &mut store,
            NewTask {
                text: "Buy milk".to_string(),
                category: Some("personal".to_string()),
                priority: Some("low".to_string()),
                due: None,
            },
        )
        .unwrap()
        .expect("task should be created");

        assert_eq!(store.len(), 1);
        let task = store.get(&id).unwrap();
        assert!(!task.completed);
        assert_eq!(task.category, Category::Personal);
        assert_eq!(task.priority, Priority::Low);

        assert!(toggle(&mut store, &id).unwrap());
        assert!(store.get(&id).unwrap().completed);
        assert_eq!(stats(store.tasks()).percent, 100);
    }

    #[test]
    fn test_add_empty_text_is_ignored() {
        let temp = TempDir::new().unwrap();
        let mut store = open(&temp);

        assert_eq!(add(&mut store, new_task("")).unwrap(), None);
        assert_eq!(add(&mut store, new_task("   \t ")).unwrap(), None);
        assert!(store.is_empty());
        // Nothing was persisted either
        assert!(!temp.path().join("tasks.json").exists());
    }

    #[test]
    fn test_add_defaults_invalid_fields() {
        let temp = TempDir::new().unwrap();
        let mut store = open(&temp);

        let id = add(
            &mut store,
            NewTask {
                text: "  trimmed  ".to_string(),
                category: Some("chores".to_string()),
                priority: Some("urgent".to_string()),
                due: Some("soon".to_string()),
            },
        )
        .unwrap()
        .unwrap();

        let task = store.get(&id).unwrap();
        assert_eq!(task.text, "trimmed");
        assert_eq!(task.category, Category::Personal);
        assert_eq!(task.priority, Priority::Low);
        assert!(task.due.is_none());
    }

    #[test]
    fn test_mutations_persist() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tasks.json");

        let mut store = Store::open(&path).unwrap();
        let id = add(&mut store, new_task("persisted")).unwrap().unwrap();
        toggle(&mut store, &id).unwrap();

        let reloaded = Store::open(&path).unwrap();
        assert_eq!(reloaded.tasks(), store.tasks());
        assert!(reloaded.get(&id).unwrap().completed);
    }

    #[test]
    fn test_missing_id_is_noop() {
        let temp = TempDir::new().unwrap();
        let mut store = open(&temp);
        add(&mut store, new_task("only")).unwrap();

        assert!(!toggle(&mut store, "missing").unwrap());
        assert!(!delete(&mut store, "missing").unwrap());
        assert!(!edit(&mut store, "missing", &EditRequest::default()).unwrap());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_edit_applies_fields() {
        let temp = TempDir::new().unwrap();
        let mut store = open(&temp);
        let id = add(&mut store, new_task("before")).unwrap().unwrap();

        let request = EditRequest {
            text: Some("after".to_string()),
            category: Some("work".to_string()),
            priority: Some("high".to_string()),
            due: Some("2024-06-01".to_string()),
        };
        assert!(edit(&mut store, &id, &request).unwrap());

        let task = store.get(&id).unwrap();
        assert_eq!(task.text, "after");
        assert_eq!(task.category, Category::Work);
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.due.unwrap().to_string(), "2024-06-01");
    }

    #[test]
    fn test_delete_and_clear() {
        let temp = TempDir::new().unwrap();
        let mut store = open(&temp);
        let id = add(&mut store, new_task("a")).unwrap().unwrap();
        add(&mut store, new_task("b")).unwrap();

        assert!(delete(&mut store, &id).unwrap());
        assert_eq!(store.len(), 1);

        clear_all(&mut store).unwrap();
        assert!(store.is_empty());
        assert_eq!(Store::open(store.path()).unwrap().len(), 0);
    }

    #[test]
    fn test_export_import_round_trip() {
        let temp = TempDir::new().unwrap();
        let mut store = open(&temp);
        add(&mut store, new_task("one")).unwrap();
        add(&mut store, new_task("two")).unwrap();
        let original = store.tasks().to_vec();

        let document = export(&store).unwrap();

        let temp2 = TempDir::new().unwrap();
        let mut other = Store::open(temp2.path().join("tasks.json")).unwrap();
        assert_eq!(import(&mut other, &document).unwrap(), 2);
        assert_eq!(other.tasks(), original.as_slice());
    }

    #[test]
    fn test_import_replaces_existing_list() {
        let temp = TempDir::new().unwrap();
        let mut store = open(&temp);
        add(&mut store, new_task("old")).unwrap();

        let payload = r#"[{"id":"n1","text":"new","created":5}]"#;
        assert_eq!(import(&mut store, payload).unwrap(), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.tasks()[0].text, "new");
    }

    #[test]
    fn test_import_rejects_malformed_payloads() {
        let temp = TempDir::new().unwrap();
        let mut store = open(&temp);
        add(&mut store, new_task("keep")).unwrap();

        // Not JSON at all
        assert!(import(&mut store, "{not json").is_err());
        // JSON but not an array
        assert!(import(&mut store, r#"{"id":"x"}"#).is_err());
        // Array with a record that is not task-shaped
        assert!(import(&mut store, r#"[{"id":"x","text":"ok"}, 42]"#).is_err());

        // Prior list unchanged throughout
        assert_eq!(store.len(), 1);
        assert_eq!(store.tasks()[0].text, "keep");
    }
}
