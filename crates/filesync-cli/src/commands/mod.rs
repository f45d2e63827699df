//! Command implementations for filesync-cli

pub mod add;
pub mod delete;
pub mod list;
pub mod sync;

pub use add::run_add;
pub use delete::run_delete;
pub use list::run_list;
pub use sync::{run_sync, run_update};
