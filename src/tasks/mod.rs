//! Task model and lifecycle store.

pub mod model;
pub mod store;

pub use model::{NewTask, Task, TaskStatus, TaskType};
pub use store::TaskStore;
