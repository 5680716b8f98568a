// Taskpad - a flat task list persisted as a single JSON file

pub mod actions;
pub mod projection;
pub mod store;
pub mod task;

// Re-export main types for convenience
pub use projection::{SortMode, Stats, project, stats};
pub use store::Store;
pub use task::{Category, EditRequest, Priority, Task, now_ms};
