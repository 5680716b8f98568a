// Data model for Taskpad

use chrono::NaiveDate;
use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single to-do record
///
/// The wire format is deliberately lenient: an absent or unknown `category`
/// or `priority` falls back to its default, and an absent or unparsable
/// `due` becomes `None`. One sloppy record in a persisted array never
/// poisons the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, deserialize_with = "lenient_date")]
    pub due: Option<NaiveDate>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub created: i64,
}

impl Task {
    /// Build a fresh task with a generated id and creation timestamp.
    ///
    /// The caller is responsible for trimming and rejecting empty text.
    pub fn new(text: impl Into<String>, category: Category, priority: Priority, due: Option<NaiveDate>) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            text: text.into(),
            category,
            priority,
            due,
            completed: false,
            created: now_ms(),
        }
    }

    /// Whether this task's deadline has passed as of `today`.
    ///
    /// Strictly earlier than the current calendar day; completed tasks are
    /// never overdue. Derived for display, never persisted.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.due.is_some_and(|d| d < today)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Work,
    Study,
    #[default]
    Personal,
}

impl Category {
    /// Parse a user-supplied value, case-insensitively. Unknown ⇒ None.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "work" => Some(Self::Work),
            "study" => Some(Self::Study),
            "personal" => Some(Self::Personal),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Study => "study",
            Self::Personal => "personal",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(value.as_str().and_then(Self::parse).unwrap_or_default())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl Priority {
    /// Parse a user-supplied value, case-insensitively. Unknown ⇒ None.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(value.as_str().and_then(Self::parse).unwrap_or_default())
    }
}

/// Requested field changes for an existing task, as raw strings from the
/// UI surface. Each field falls back to the task's previous value when the
/// new one is empty or fails validation; an empty `due` clears the deadline.
#[derive(Debug, Clone, Default)]
pub struct EditRequest {
    pub text: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub due: Option<String>,
}

impl EditRequest {
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.category.is_none() && self.priority.is_none() && self.due.is_none()
    }

    /// Apply the validated changes to `task`, keeping previous values for
    /// anything empty or invalid.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(text) = &self.text {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                task.text = trimmed.to_string();
            }
        }
        if let Some(category) = self.category.as_deref().and_then(Category::parse) {
            task.category = category;
        }
        if let Some(priority) = self.priority.as_deref().and_then(Priority::parse) {
            task.priority = priority;
        }
        if let Some(due) = &self.due {
            let trimmed = due.trim();
            if trimmed.is_empty() {
                task.due = None;
            } else if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
                task.due = Some(date);
            }
            // Unparsable dates keep the previous deadline
        }
    }
}

fn lenient_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value
        .as_str()
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()))
}

/// Helper function to get current timestamp in milliseconds
pub fn now_ms() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("System time before Unix epoch")
        .as_millis() as i64
}
