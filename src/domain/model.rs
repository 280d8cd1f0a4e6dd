use crate::utils::error::{GradeError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const MIN_GRADE: f64 = 2.0;
pub const MAX_GRADE: f64 = 6.0;

/// 比較時「沒有學期」的哨兵值
pub const NO_SEMESTER: i64 = -1;

/// Entry tag. Tags this service does not write are kept verbatim so a
/// rewrite of the document does not lose them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntryType {
    Regular,
    Semester,
    Other(String),
    #[default]
    Unset,
}

impl EntryType {
    pub fn is_unset(&self) -> bool {
        *self == EntryType::Unset
    }
}

impl From<String> for EntryType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "regular" => EntryType::Regular,
            "semester" => EntryType::Semester,
            _ => EntryType::Other(tag),
        }
    }
}

impl From<EntryType> for String {
    fn from(entry_type: EntryType) -> Self {
        match entry_type {
            EntryType::Regular => "regular".to_string(),
            EntryType::Semester => "semester".to_string(),
            EntryType::Other(tag) => tag,
            EntryType::Unset => String::new(),
        }
    }
}

/// One recorded grade, exactly as persisted.
///
/// Stored documents are not re-validated on read: `grade` and `semester`
/// are read leniently and may be absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeEntry {
    #[serde(default)]
    pub subject: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_grade"
    )]
    pub grade: Option<f64>,
    #[serde(rename = "type", default, skip_serializing_if = "EntryType::is_unset")]
    pub entry_type: EntryType,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_semester"
    )]
    pub semester: Option<i64>,
}

impl GradeEntry {
    pub fn regular(subject: impl Into<String>, grade: Grade, semester: Option<Semester>) -> Self {
        Self {
            subject: subject.into(),
            grade: Some(grade.value()),
            entry_type: EntryType::Regular,
            semester: semester.map(Semester::number),
        }
    }

    pub fn semester_final(subject: impl Into<String>, grade: Grade, semester: Semester) -> Self {
        Self {
            subject: subject.into(),
            grade: Some(grade.value()),
            entry_type: EntryType::Semester,
            semester: Some(semester.number()),
        }
    }

    pub fn is_regular(&self) -> bool {
        self.entry_type == EntryType::Regular
    }

    pub fn is_semester(&self) -> bool {
        self.entry_type == EntryType::Semester
    }

    pub fn semester_or_sentinel(&self) -> i64 {
        self.semester.unwrap_or(NO_SEMESTER)
    }

    pub fn in_semester(&self, semester: Semester) -> bool {
        self.semester_or_sentinel() == semester.number()
    }
}

/// A grade that has passed the [2, 6] range check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grade(f64);

impl Grade {
    pub fn new(value: f64) -> Result<Self> {
        if !value.is_finite() || !(MIN_GRADE..=MAX_GRADE).contains(&value) {
            return Err(GradeError::invalid_payload("invalid grade"));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Semester {
    First,
    Second,
}

impl Semester {
    pub fn number(self) -> i64 {
        match self {
            Semester::First => 1,
            Semester::Second => 2,
        }
    }
}

impl TryFrom<i64> for Semester {
    type Error = GradeError;

    fn try_from(value: i64) -> Result<Self> {
        match value {
            1 => Ok(Semester::First),
            2 => Ok(Semester::Second),
            _ => Err(GradeError::invalid_payload("invalid semester")),
        }
    }
}

impl std::fmt::Display for Semester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number())
    }
}

// 數字或數字字串；其他值視為缺少
fn lenient_grade<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    })
}

// 整數、浮點數 (取整) 或整數字串；其他值視為缺少
fn lenient_semester<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::Number(n)) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_grade_bounds() {
        assert!(Grade::new(2.0).is_ok());
        assert!(Grade::new(6.0).is_ok());
        assert!(Grade::new(4.5).is_ok());
        assert!(Grade::new(1.5).is_err());
        assert!(Grade::new(6.01).is_err());
        assert!(Grade::new(f64::NAN).is_err());
    }

    #[test]
    fn test_out_of_range_grade_is_a_payload_error() {
        let err = Grade::new(7.0).unwrap_err();

        assert!(matches!(err, GradeError::InvalidPayload { .. }));
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.to_string(), "invalid grade");
    }

    #[test]
    fn test_semester_try_from() {
        assert_eq!(Semester::try_from(1).unwrap(), Semester::First);
        assert_eq!(Semester::try_from(2).unwrap(), Semester::Second);
        assert!(Semester::try_from(0).is_err());
        assert!(Semester::try_from(3).is_err());
    }

    #[test]
    fn test_entry_serialization_shape() {
        let entry = GradeEntry::regular("Math", Grade::new(5.0).unwrap(), None);
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value, json!({"subject": "Math", "grade": 5.0, "type": "regular"}));

        let final_grade =
            GradeEntry::semester_final("Math", Grade::new(4.0).unwrap(), Semester::Second);
        let value = serde_json::to_value(&final_grade).unwrap();
        assert_eq!(
            value,
            json!({"subject": "Math", "grade": 4.0, "type": "semester", "semester": 2})
        );
    }

    #[test]
    fn test_lenient_semester_on_read() {
        let entries: Vec<GradeEntry> = serde_json::from_value(json!([
            {"subject": "A", "grade": 3, "type": "regular", "semester": "2"},
            {"subject": "B", "grade": 4.5, "type": "semester", "semester": 1.0},
            {"subject": "C", "grade": 5, "type": "regular", "semester": null},
            {"subject": "D", "grade": 6, "type": "regular"},
            {"subject": "E", "grade": 6, "type": "regular", "semester": "first"}
        ]))
        .unwrap();

        assert_eq!(entries[0].semester, Some(2));
        assert_eq!(entries[1].semester, Some(1));
        assert_eq!(entries[2].semester, None);
        assert_eq!(entries[3].semester_or_sentinel(), NO_SEMESTER);
        assert!(entries[0].in_semester(Semester::Second));
        assert_eq!(entries[4].semester, None);
    }

    #[test]
    fn test_unknown_type_is_kept_verbatim() {
        let raw = json!({"subject": "A", "grade": 3.0, "type": "final"});
        let entry: GradeEntry = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(entry.entry_type, EntryType::Other("final".to_string()));
        assert!(!entry.is_regular() && !entry.is_semester());
        assert_eq!(serde_json::to_value(&entry).unwrap(), raw);
    }

    #[test]
    fn test_incomplete_record_round_trips() {
        let raw = json!({"subject": "Note"});
        let entry: GradeEntry = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(entry.grade, None);
        assert!(entry.entry_type.is_unset());
        assert_eq!(serde_json::to_value(&entry).unwrap(), raw);
    }

    #[test]
    fn test_lenient_grade_on_read() {
        let entries: Vec<GradeEntry> = serde_json::from_value(json!([
            {"subject": "A", "grade": "5", "type": "regular"},
            {"subject": "B", "grade": " 4.5 ", "type": "regular"},
            {"subject": "C", "type": "regular"},
            {"subject": "D", "grade": "abc", "type": "regular"}
        ]))
        .unwrap();

        assert_eq!(entries[0].grade, Some(5.0));
        assert_eq!(entries[1].grade, Some(4.5));
        assert_eq!(entries[2].grade, None);
        assert_eq!(entries[3].grade, None);
    }
}
