use chrono::Local;
use clap::{Parser, Subcommand};
use colored::Colorize;
use eyre::{Context, Result, eyre};
use std::io::Write;
use std::path::PathBuf;
use taskpad::actions::{self, NewTask};
use taskpad::{Category, EditRequest, Priority, SortMode, Store, Task, project, stats};

#[derive(Parser)]
#[command(name = "taskpad")]
#[command(about = "Taskpad - a small task list with a single JSON file as its source of truth")]
#[command(version)]
struct Cli {
    /// Path to the task file (default: $TASKPAD_FILE, else the user data dir)
    #[arg(short, long)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new task
    Add {
        /// Task text
        text: String,
        /// work, study or personal (default: personal)
        #[arg(short, long)]
        category: Option<String>,
        /// low, medium or high (default: low)
        #[arg(short, long)]
        priority: Option<String>,
        /// Due date as YYYY-MM-DD
        #[arg(short, long)]
        due: Option<String>,
    },

    /// List tasks, filtered and sorted
    List {
        /// Case-insensitive text/category/priority filter
        #[arg(short, long, default_value = "")]
        search: String,
        /// Display order
        #[arg(long, value_enum, default_value = "insertion")]
        sort: SortMode,
    },

    /// Flip a task's completion state
    Toggle {
        /// Task id (a unique prefix is enough)
        id: String,
    },

    /// Edit a task's fields; anything left out keeps its current value
    Edit {
        /// Task id (a unique prefix is enough)
        id: String,
        #[arg(long)]
        text: Option<String>,
        /// work, study or personal
        #[arg(long)]
        category: Option<String>,
        /// low, medium or high
        #[arg(long)]
        priority: Option<String>,
        /// Due date as YYYY-MM-DD; pass an empty string to clear it
        #[arg(long)]
        due: Option<String>,
    },

    /// Delete a task
    Rm {
        /// Task id (a unique prefix is enough)
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Delete every task
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Write the task list as pretty-printed JSON to a file or stdout
    Export {
        /// Destination file (default: stdout)
        file: Option<PathBuf>,
    },

    /// Replace the task list with a JSON array read from a file
    Import {
        /// Source file
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    // Setup tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let path = match cli.file {
        Some(path) => path,
        None => default_store_path(),
    };
    let mut store = Store::open(&path)?;

    match cli.command {
        Commands::Add {
            text,
            category,
            priority,
            due,
        } => {
            let input = NewTask {
                text,
                category,
                priority,
                due,
            };
            match actions::add(&mut store, input)? {
                Some(id) => println!("Added task {}", short_id(&id)),
                None => println!("Nothing to add: task text is empty"),
            }
        }

        Commands::List { search, sort } => {
            render_list(&store, &search, sort);
        }

        Commands::Toggle { id } => {
            let id = resolve_id(&store, &id)?;
            if actions::toggle(&mut store, &id)? {
                let state = if store.get(&id).is_some_and(|t| t.completed) {
                    "completed"
                } else {
                    "pending"
                };
                println!("Task {} is now {state}", short_id(&id));
            } else {
                println!("No task matching '{id}'");
            }
        }

        Commands::Edit {
            id,
            text,
            category,
            priority,
            due,
        } => {
            let request = EditRequest {
                text,
                category,
                priority,
                due,
            };
            if request.is_empty() {
                println!("Nothing to edit: pass at least one of --text/--category/--priority/--due");
            } else {
                let id = resolve_id(&store, &id)?;
                if actions::edit(&mut store, &id, &request)? {
                    println!("Updated task {}", short_id(&id));
                } else {
                    println!("No task matching '{id}'");
                }
            }
        }

        Commands::Rm { id, yes } => {
            let id = resolve_id(&store, &id)?;
            if !yes && !confirm("Delete this task?")? {
                println!("Kept task {}", short_id(&id));
            } else if actions::delete(&mut store, &id)? {
                println!("Deleted task {}", short_id(&id));
            } else {
                println!("No task matching '{id}'");
            }
        }

        Commands::Clear { yes } => {
            if !yes && !confirm("Clear all tasks? This cannot be undone.")? {
                println!("Kept {} task(s)", store.len());
            } else {
                actions::clear_all(&mut store)?;
                println!("Cleared all tasks");
            }
        }

        Commands::Export { file } => {
            let document = actions::export(&store)?;
            match file {
                Some(file) => {
                    std::fs::write(&file, document)
                        .with_context(|| format!("Failed to write export to {}", file.display()))?;
                    println!("Exported {} task(s) to {}", store.len(), file.display());
                }
                None => println!("{document}"),
            }
        }

        Commands::Import { file } => {
            let payload = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let count = actions::import(&mut store, &payload)?;
            println!("Imported {count} task(s)");
        }
    }

    Ok(())
}

fn default_store_path() -> PathBuf {
    if let Ok(file) = std::env::var("TASKPAD_FILE") {
        return PathBuf::from(file);
    }
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("taskpad")
        .join("tasks.json")
}

/// Expand a possibly-shortened id to a full task id. Exact matches win;
/// otherwise a prefix has to be unambiguous.
fn resolve_id(store: &Store, given: &str) -> Result<String> {
    if store.get(given).is_some() {
        return Ok(given.to_string());
    }

    let matches: Vec<&Task> = store.tasks().iter().filter(|t| t.id.starts_with(given)).collect();
    match matches.as_slice() {
        [task] => Ok(task.id.clone()),
        [] => Ok(given.to_string()), // Downstream treats unknown ids as a no-op
        _ => Err(eyre!("Id prefix '{given}' is ambiguous ({} matches)", matches.len())),
    }
}

fn short_id(id: &str) -> &str {
    &id[..id.len().min(8)]
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N]: ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(matches!(line.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn render_list(store: &Store, search: &str, sort: SortMode) {
    let today = Local::now().date_naive();
    let list = project(store.tasks(), search, sort);

    if list.is_empty() {
        if store.is_empty() {
            println!("No tasks yet");
        } else {
            println!("No tasks match '{}'", search.trim());
        }
    }

    for task in &list {
        let checkbox = if task.completed { "[x]" } else { "[ ]" };
        let text = if task.completed {
            task.text.strikethrough().dimmed()
        } else {
            task.text.normal()
        };

        let mut line = format!("{checkbox} {} {text}", short_id(&task.id).dimmed());

        if let Some(due) = task.due {
            let due = format!("due {due}");
            let due = if task.is_overdue(today) {
                format!("{} {}", due.red().bold(), "overdue".red().bold())
            } else {
                due.normal().to_string()
            };
            line.push_str(&format!("  {due}"));
        }

        let category = match task.category {
            Category::Work => task.category.name().blue(),
            Category::Study => task.category.name().magenta(),
            Category::Personal => task.category.name().cyan(),
        };
        let priority = match task.priority {
            Priority::High => task.priority.name().red(),
            Priority::Medium => task.priority.name().yellow(),
            Priority::Low => task.priority.name().green(),
        };
        println!("{line}  [{category}] {priority}");
    }

    let s = stats(store.tasks());
    println!(
        "\nTotal: {} | Completed: {} | Pending: {}",
        s.total, s.completed, s.pending
    );
    println!("{}% completed - {}", s.percent, s.message());
}
