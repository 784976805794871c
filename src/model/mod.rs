pub mod snapshot;
pub mod task;

pub use snapshot::{build_snapshot, RawTask};
pub use task::{GroupBy, Task, TaskPriority, TaskStatus};
