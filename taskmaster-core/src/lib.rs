//! Core library for TaskMaster Pro.
//!
//! This crate provides the domain models, the aggregation/filtering
//! engine, and the data backends for TaskMaster Pro, independent of any
//! transport layer (HTTP, CLI, etc.).
//!
//! # Usage
//!
//! ```no_run
//! use taskmaster_core::engine;
//! use taskmaster_core::store::Backend;
//!
//! # async fn demo() -> taskmaster_core::Result<()> {
//! let backend = Backend::in_memory();
//! let tasks = backend.list_tasks().await?;
//! let rate = engine::completion_rate(&tasks);
//! # let _ = rate;
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod error;
pub mod models;
pub mod remote;
pub mod store;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use store::Backend;
