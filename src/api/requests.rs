//! Translation of JSON payloads into validated store arguments.
//!
//! Numbers are coerced loosely: numeric strings are accepted for every
//! numeric field, and integer fields truncate floats toward zero. A `null`
//! field counts as missing.

use crate::domain::model::{Grade, Semester};
use crate::utils::error::{GradeError, Result};
use serde_json::Value;

fn field<'a>(payload: &'a Value, name: &str) -> Option<&'a Value> {
    payload.get(name).filter(|v| !v.is_null())
}

pub fn coerce_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

pub fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn subject(payload: &Value) -> Option<&str> {
    field(payload, "subject").and_then(Value::as_str)
}

/// Semester that must be present and be 1 or 2.
fn required_semester(payload: &Value, unparsable: &str, out_of_range: &str) -> Result<Semester> {
    let number = field(payload, "semester")
        .and_then(coerce_int)
        .ok_or_else(|| GradeError::invalid_payload(unparsable))?;
    Semester::try_from(number).map_err(|_| GradeError::invalid_payload(out_of_range))
}

/// Semester that is dropped rather than rejected when invalid.
fn optional_semester(payload: &Value) -> Option<Semester> {
    field(payload, "semester")
        .and_then(coerce_int)
        .and_then(|n| Semester::try_from(n).ok())
}

fn grade(payload: &Value, unparsable: &str, out_of_range: &str) -> Result<Grade> {
    let value = field(payload, "grade")
        .and_then(coerce_float)
        .filter(|v| v.is_finite())
        .ok_or_else(|| GradeError::invalid_payload(unparsable))?;
    Grade::new(value).map_err(|_| GradeError::invalid_payload(out_of_range))
}

#[derive(Debug, Clone, PartialEq)]
pub struct SaveGradeRequest {
    pub subject: String,
    pub grade: Grade,
    pub semester: Option<Semester>,
}

impl SaveGradeRequest {
    pub fn from_payload(payload: &Value) -> Result<Self> {
        let grade = grade(payload, "invalid grade", "invalid payload")?;
        let subject = subject(payload).ok_or_else(|| GradeError::invalid_payload("invalid payload"))?;

        Ok(Self {
            subject: subject.to_string(),
            grade,
            semester: optional_semester(payload),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SaveSemesterGradeRequest {
    pub subject: String,
    pub semester: Semester,
    pub grade: Grade,
}

impl SaveSemesterGradeRequest {
    pub fn from_payload(payload: &Value) -> Result<Self> {
        let grade = grade(payload, "invalid payload", "invalid payload")?;
        let semester = required_semester(payload, "invalid payload", "invalid payload")?;
        let subject = subject(payload).ok_or_else(|| GradeError::invalid_payload("invalid payload"))?;

        Ok(Self {
            subject: subject.to_string(),
            semester,
            grade,
        })
    }
}

/// Shared by the two semester-wide deletions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SemesterRequest {
    pub semester: Semester,
}

impl SemesterRequest {
    pub fn from_payload(payload: &Value) -> Result<Self> {
        Ok(Self {
            semester: required_semester(payload, "invalid semester", "invalid semester")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteSubjectRequest {
    pub subject: String,
    pub semester: Option<Semester>,
}

impl DeleteSubjectRequest {
    pub fn from_payload(payload: &Value) -> Result<Self> {
        let subject = subject(payload)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| GradeError::invalid_payload("subject required"))?;

        Ok(Self {
            subject: subject.to_string(),
            semester: optional_semester(payload),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditRegularGradeRequest {
    pub subject: String,
    pub semester: Semester,
    pub grade: Grade,
    pub index: Option<usize>,
}

impl EditRegularGradeRequest {
    pub fn from_payload(payload: &Value) -> Result<Self> {
        let subject = subject(payload).ok_or_else(|| GradeError::invalid_payload("subject required"))?;
        let semester = required_semester(payload, "invalid payload", "invalid semester")?;
        let grade = grade(payload, "invalid payload", "invalid grade")?;

        let index = match field(payload, "grade_index") {
            None => None,
            Some(raw) => {
                let index =
                    coerce_int(raw).ok_or_else(|| GradeError::invalid_payload("invalid payload"))?;
                let index = usize::try_from(index)
                    .map_err(|_| GradeError::invalid_payload("invalid grade index"))?;
                Some(index)
            }
        };

        Ok(Self {
            subject: subject.to_string(),
            semester,
            grade,
            index,
        })
    }
}
