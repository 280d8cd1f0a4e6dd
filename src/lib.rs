pub mod adapters;
pub mod api;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use adapters::{LocalStorage, MemoryStorage};
pub use api::{ApiResponse, GradeService, Method, Route};
pub use crate::core::store::{GradeReport, GradeStore, LoadOutcome};
pub use domain::model::{EntryType, Grade, GradeEntry, Semester};
pub use utils::error::{GradeError, Result};
