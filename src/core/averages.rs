//! Grade aggregation.
//!
//! The overall average counts every entry regardless of type, while a semester
//! average only counts `semester`-typed entries. Entries without a grade are
//! skipped. All values are unrounded;
//! [`round2`] is applied when building responses.

use crate::domain::model::{GradeEntry, Semester};
use serde::Serialize;

/// Mean grade over every entry. `None` when there are no entries.
pub fn average_all(entries: &[GradeEntry]) -> Option<f64> {
    mean(entries.iter().filter_map(|e| e.grade))
}

/// Mean grade over `semester`-typed entries of one semester.
pub fn average_by_semester(entries: &[GradeEntry], semester: Semester) -> Option<f64> {
    mean(
        entries
            .iter()
            .filter(|e| e.is_semester() && e.in_semester(semester))
            .filter_map(|e| e.grade),
    )
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SemesterAverages {
    #[serde(rename = "1")]
    pub first: Option<f64>,
    #[serde(rename = "2")]
    pub second: Option<f64>,
}

impl SemesterAverages {
    pub fn compute(entries: &[GradeEntry]) -> Self {
        Self {
            first: average_by_semester(entries, Semester::First),
            second: average_by_semester(entries, Semester::Second),
        }
    }

    pub fn rounded(self) -> Self {
        Self {
            first: self.first.map(round2),
            second: self.second.map(round2),
        }
    }
}
