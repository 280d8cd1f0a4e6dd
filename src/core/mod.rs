pub mod averages;
pub mod store;

pub use crate::domain::model::{EntryType, Grade, GradeEntry, Semester};
pub use crate::domain::ports::{ConfigProvider, Storage};
pub use crate::utils::error::Result;
pub use averages::{average_all, average_by_semester, round2, SemesterAverages};
pub use store::{GradeReport, GradeStore, LoadOutcome};
