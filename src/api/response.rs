use crate::api::routes::ResponseShape;
use crate::core::averages::{round2, SemesterAverages};
use crate::core::store::GradeReport;
use crate::domain::model::GradeEntry;
use crate::utils::error::{GradeError, Result};
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResponseBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    success: Option<bool>,
    entries: &'a [GradeEntry],
    #[serde(skip_serializing_if = "Option::is_none")]
    average: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    semester_averages: Option<SemesterAverages>,
}

impl ApiResponse {
    /// Averages are rounded to 2 decimals here and nowhere else.
    pub fn from_report(shape: ResponseShape, report: &GradeReport) -> Result<Self> {
        let average = report.average.map(round2);
        let semester_averages = report.semester_averages.rounded();

        let (success, average, semester_averages) = match shape {
            ResponseShape::Listing => (None, Some(average), Some(semester_averages)),
            ResponseShape::SemesterListing => (None, None, Some(semester_averages)),
            ResponseShape::WithAverage => (Some(true), Some(average), None),
            ResponseShape::WithSemesterAverages => (Some(true), None, Some(semester_averages)),
            ResponseShape::WithAllAverages => {
                (Some(true), Some(average), Some(semester_averages))
            }
        };

        let body = serde_json::to_value(ResponseBody {
            success,
            entries: &report.entries,
            average,
            semester_averages,
        })?;

        Ok(Self { status: 200, body })
    }

    pub fn error(err: &GradeError) -> Self {
        Self::with_error(err.status_code(), err.user_friendly_message())
    }

    pub fn with_error(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "error": message.into() }),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
