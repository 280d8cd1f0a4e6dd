use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            other => Err(format!("unsupported method: {}", other)),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    ListGrades,
    SaveGrade,
    SaveSemesterGrade,
    SemesterGrades,
    DeleteSemesterGrades,
    DeleteSubjectGrades,
    DeleteSemesterAllGrades,
    EditRegularGrade,
}

/// Which optional keys a successful response carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// `{entries, average, semesterAverages}`
    Listing,
    /// `{entries, semesterAverages}`
    SemesterListing,
    /// `{success, entries, average}`
    WithAverage,
    /// `{success, entries, semesterAverages}`
    WithSemesterAverages,
    /// `{success, entries, average, semesterAverages}`
    WithAllAverages,
}

impl Route {
    pub const ALL: [Route; 8] = [
        Route::ListGrades,
        Route::SaveGrade,
        Route::SaveSemesterGrade,
        Route::SemesterGrades,
        Route::DeleteSemesterGrades,
        Route::DeleteSubjectGrades,
        Route::DeleteSemesterAllGrades,
        Route::EditRegularGrade,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Route::ListGrades => "/grades",
            Route::SaveGrade => "/save-grade",
            Route::SaveSemesterGrade => "/save-semester-grade",
            Route::SemesterGrades => "/semester-grades",
            Route::DeleteSemesterGrades => "/delete-semester-grades",
            Route::DeleteSubjectGrades => "/delete-subject-grades",
            Route::DeleteSemesterAllGrades => "/delete-semester-all-grades",
            Route::EditRegularGrade => "/edit-regular-grade",
        }
    }

    pub fn method(self) -> Method {
        match self {
            Route::ListGrades | Route::SemesterGrades => Method::Get,
            _ => Method::Post,
        }
    }

    pub fn response_shape(self) -> ResponseShape {
        match self {
            Route::ListGrades => ResponseShape::Listing,
            Route::SemesterGrades => ResponseShape::SemesterListing,
            Route::SaveGrade => ResponseShape::WithAverage,
            Route::SaveSemesterGrade
            | Route::DeleteSemesterGrades
            | Route::DeleteSubjectGrades
            | Route::DeleteSemesterAllGrades => ResponseShape::WithSemesterAverages,
            Route::EditRegularGrade => ResponseShape::WithAllAverages,
        }
    }

    /// Trailing slashes are ignored.
    pub fn from_path(path: &str) -> Option<Route> {
        let trimmed = path.trim_end_matches('/');
        Route::ALL.into_iter().find(|route| route.path() == trimmed)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method(), self.path())
    }
}
