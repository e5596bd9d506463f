//! # taskdeck
//!
//! REST service for a single ordered task list.
//!
//! Tasks carry a unique name, a cost, a due date, and an integer display
//! rank. The service exposes CRUD plus two reorder operations that exchange
//! a task's rank with its nearest neighbor.
//!
//! ## Request Flow
//! 1. axum handler decodes the JSON body (dates arrive as `dd/mm/yyyy` text)
//! 2. `TaskService` runs the validation and ordering rules
//! 3. A `TaskStore` backend (memory or sqlite) persists the record
//! 4. The handler renders the task back to the wire envelope
//!
//! ## Modules
//! - `api`: axum router, handlers, and wire types
//! - `service`: validation rules and display-order maintenance
//! - `store`: pluggable storage backends
//! - `task`: the task entity and the textual date contract

pub mod api;
pub mod config;
pub mod error;
pub mod service;
pub mod store;
pub mod task;

pub use config::Config;
pub use error::TaskError;
pub use service::TaskService;
pub use store::{TaskStore, TaskStoreType};
pub use task::Task;
