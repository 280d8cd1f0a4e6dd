use crate::api::requests::{
    DeleteSubjectRequest, EditRegularGradeRequest, SaveGradeRequest, SaveSemesterGradeRequest,
    SemesterRequest,
};
use crate::api::response::ApiResponse;
use crate::api::routes::{Method, Route};
use crate::core::store::{GradeReport, GradeStore};
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use serde_json::Value;

/// Request boundary: turns a route plus JSON payload into a store call and
/// the store's result into a JSON response. Errors never escape `handle`.
pub struct GradeService<S: Storage> {
    store: GradeStore<S>,
}

impl<S: Storage> GradeService<S> {
    pub fn new(store: GradeStore<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &GradeStore<S> {
        &self.store
    }

    /// Resolves the route first: unknown paths get 404, known paths with the
    /// wrong method 405.
    pub async fn handle_request(&self, method: Method, path: &str, payload: &Value) -> ApiResponse {
        let Some(route) = Route::from_path(path) else {
            tracing::warn!("No route for {} {}", method, path);
            return ApiResponse::with_error(404, "not found");
        };

        if route.method() != method {
            tracing::warn!("{} not allowed on {}", method, route.path());
            return ApiResponse::with_error(405, "method not allowed");
        }

        self.handle(route, payload).await
    }

    pub async fn handle(&self, route: Route, payload: &Value) -> ApiResponse {
        tracing::debug!("Handling {}", route);

        let outcome = self
            .dispatch(route, payload)
            .await
            .and_then(|report| ApiResponse::from_report(route.response_shape(), &report));

        match outcome {
            Ok(response) => response,
            Err(e) if e.is_client_error() => {
                tracing::warn!("❌ {} rejected: {}", route, e);
                ApiResponse::error(&e)
            }
            Err(e) => {
                tracing::error!("❌ {} failed: {}", route, e);
                ApiResponse::error(&e)
            }
        }
    }

    async fn dispatch(&self, route: Route, payload: &Value) -> Result<GradeReport> {
        match route {
            Route::ListGrades => Ok(self.store.list_all().await),
            Route::SemesterGrades => Ok(self.store.list_semester_entries().await),
            Route::SaveGrade => {
                let request = SaveGradeRequest::from_payload(payload)?;
                self.store
                    .append_regular(&request.subject, request.grade, request.semester)
                    .await
            }
            Route::SaveSemesterGrade => {
                let request = SaveSemesterGradeRequest::from_payload(payload)?;
                self.store
                    .append_semester_grade(&request.subject, request.semester, request.grade)
                    .await
            }
            Route::DeleteSemesterGrades => {
                let request = SemesterRequest::from_payload(payload)?;
                self.store.delete_semester_grades(request.semester).await
            }
            Route::DeleteSubjectGrades => {
                let request = DeleteSubjectRequest::from_payload(payload)?;
                self.store
                    .delete_subject_grades(&request.subject, request.semester)
                    .await
            }
            Route::DeleteSemesterAllGrades => {
                let request = SemesterRequest::from_payload(payload)?;
                self.store.delete_semester_all_grades(request.semester).await
            }
            Route::EditRegularGrade => {
                let request = EditRegularGradeRequest::from_payload(payload)?;
                self.store
                    .edit_regular_grade(
                        &request.subject,
                        request.semester,
                        request.grade,
                        request.index,
                    )
                    .await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::MemoryStorage;
    use crate::core::store::DEFAULT_STORE_FILE;
    use serde_json::json;

    fn service() -> GradeService<MemoryStorage> {
        GradeService::new(GradeStore::new(MemoryStorage::new(), DEFAULT_STORE_FILE))
    }

    #[tokio::test]
    async fn test_unknown_path_is_404() {
        let response = service()
            .handle_request(Method::Get, "/nope", &Value::Null)
            .await;
        assert_eq!(response.status, 404);
    }

    #[tokio::test]
    async fn test_wrong_method_is_405() {
        let response = service()
            .handle_request(Method::Get, "/save-grade", &json!({"subject": "Math", "grade": 4}))
            .await;
        assert_eq!(response.status, 405);
    }

    #[tokio::test]
    async fn test_save_grade_response() {
        let service = service();
        let response = service
            .handle_request(
                Method::Post,
                "/save-grade",
                &json!({"subject": "Math", "grade": "4", "semester": 1}),
            )
            .await;

        assert_eq!(response.status, 200);
        assert_eq!(
            response.body,
            json!({
                "success": true,
                "average": 4.0,
                "entries": [{"subject": "Math", "grade": 4.0, "type": "regular", "semester": 1}]
            })
        );
    }

    #[tokio::test]
    async fn test_insufficient_data_is_400() {
        let response = service()
            .handle(
                Route::SaveSemesterGrade,
                &json!({"subject": "Math", "grade": 4, "semester": 1}),
            )
            .await;

        assert_eq!(response.status, 400);
        assert_eq!(
            response.body["error"],
            "need at least 2 regular grades for this subject and semester"
        );
    }
}
