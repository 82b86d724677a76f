//! taskstreak - a to-do list with categories, due dates and a
//! consecutive-day completion streak.

pub mod chart;
pub mod cli;
pub mod clock;
pub mod config;
pub mod export;
pub mod schedule;
pub mod store;
pub mod streak;
pub mod suggestions;
pub mod task;
pub mod todo_list;
pub mod ui;

pub use clock::{Clock, ManualClock, SystemClock};
pub use store::{FileStore, MemoryStore, Store, StoreError};
pub use streak::Streak;
pub use task::{Category, DueStatus, Filter, Task};
pub use todo_list::TodoList;
