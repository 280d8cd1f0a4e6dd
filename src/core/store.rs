use crate::core::averages::{average_all, SemesterAverages};
use crate::domain::model::{Grade, GradeEntry, Semester};
use crate::domain::ports::{ConfigProvider, Storage};
use crate::utils::error::{GradeError, Result};

pub const DEFAULT_STORE_FILE: &str = "grades_store.json";

pub const MIN_REGULAR_FOR_SEMESTER: usize = 2;

/// What a read of the backing document produced.
///
/// Callers of [`GradeStore::load`] only ever see the entries; the other
/// variants exist so the reason for an empty store stays observable.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Populated(Vec<GradeEntry>),
    Absent,
    Unreadable(String),
    Corrupt(String),
}

impl LoadOutcome {
    pub fn into_entries(self) -> Vec<GradeEntry> {
        match self {
            LoadOutcome::Populated(entries) => entries,
            LoadOutcome::Absent | LoadOutcome::Unreadable(_) | LoadOutcome::Corrupt(_) => {
                Vec::new()
            }
        }
    }
}

/// Entries after an operation, with unrounded averages over the whole store.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeReport {
    pub entries: Vec<GradeEntry>,
    pub average: Option<f64>,
    pub semester_averages: SemesterAverages,
}

impl GradeReport {
    pub fn from_entries(entries: Vec<GradeEntry>) -> Self {
        let average = average_all(&entries);
        let semester_averages = SemesterAverages::compute(&entries);
        Self {
            entries,
            average,
            semester_averages,
        }
    }
}

pub struct GradeStore<S: Storage> {
    storage: S,
    path: String,
}

impl<S: Storage> GradeStore<S> {
    pub fn new(storage: S, path: impl Into<String>) -> Self {
        Self {
            storage,
            path: path.into(),
        }
    }

    pub fn from_config<C: ConfigProvider>(storage: S, config: &C) -> Self {
        Self::new(storage, config.store_path())
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub async fn load_outcome(&self) -> LoadOutcome {
        let data = match self.storage.read_file(&self.path).await {
            Ok(data) => data,
            Err(GradeError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("Grade store {} does not exist yet", self.path);
                return LoadOutcome::Absent;
            }
            Err(e) => {
                tracing::warn!("⚠️ Grade store {} is unreadable: {}", self.path, e);
                return LoadOutcome::Unreadable(e.to_string());
            }
        };

        match serde_json::from_slice::<Vec<GradeEntry>>(&data) {
            Ok(entries) => {
                tracing::debug!("Loaded {} entries from {}", entries.len(), self.path);
                LoadOutcome::Populated(entries)
            }
            Err(e) => {
                tracing::warn!("⚠️ Grade store {} is malformed, treating as empty: {}", self.path, e);
                LoadOutcome::Corrupt(e.to_string())
            }
        }
    }

    pub async fn load(&self) -> Vec<GradeEntry> {
        self.load_outcome().await.into_entries()
    }

    pub async fn save(&self, entries: &[GradeEntry]) -> Result<()> {
        let mut data = serde_json::to_vec_pretty(entries)?;
        data.push(b'\n');
        self.storage.write_file(&self.path, &data).await?;
        tracing::debug!("Saved {} entries to {}", entries.len(), self.path);
        Ok(())
    }

    pub async fn list_all(&self) -> GradeReport {
        GradeReport::from_entries(self.load().await)
    }

    /// Only `semester`-typed entries; averages are over the whole store.
    pub async fn list_semester_entries(&self) -> GradeReport {
        let mut report = GradeReport::from_entries(self.load().await);
        report.entries.retain(GradeEntry::is_semester);
        report
    }

    pub async fn append_regular(
        &self,
        subject: &str,
        grade: Grade,
        semester: Option<Semester>,
    ) -> Result<GradeReport> {
        let mut entries = self.load().await;
        entries.push(GradeEntry::regular(subject, grade, semester));
        self.save(&entries).await?;

        tracing::info!(
            "📝 Recorded {} for {} (semester: {:?})",
            grade.value(),
            subject,
            semester.map(Semester::number)
        );
        Ok(GradeReport::from_entries(entries))
    }

    pub async fn append_semester_grade(
        &self,
        subject: &str,
        semester: Semester,
        grade: Grade,
    ) -> Result<GradeReport> {
        let mut entries = self.load().await;

        let backing = entries
            .iter()
            .filter(|e| e.is_regular() && e.subject == subject && e.in_semester(semester))
            .count();
        if backing < MIN_REGULAR_FOR_SEMESTER {
            tracing::debug!(
                "Refusing semester grade for {} in semester {}: {} regular grades",
                subject,
                semester,
                backing
            );
            return Err(GradeError::InsufficientData {
                subject: subject.to_string(),
                semester: semester.number() as u8,
            });
        }

        entries.push(GradeEntry::semester_final(subject, grade, semester));
        self.save(&entries).await?;

        tracing::info!(
            "🎓 Recorded semester {} grade {} for {}",
            semester,
            grade.value(),
            subject
        );
        Ok(GradeReport::from_entries(entries))
    }

    pub async fn delete_semester_grades(&self, semester: Semester) -> Result<GradeReport> {
        self.delete_where(|e| e.is_semester() && e.in_semester(semester)).await
    }

    /// Without a semester every entry of the subject goes, whatever its type.
    pub async fn delete_subject_grades(
        &self,
        subject: &str,
        semester: Option<Semester>,
    ) -> Result<GradeReport> {
        if subject.is_empty() {
            return Err(GradeError::invalid_payload("subject required"));
        }

        self.delete_where(|e| {
            e.subject == subject && semester.map_or(true, |s| e.in_semester(s))
        })
        .await
    }

    pub async fn delete_semester_all_grades(&self, semester: Semester) -> Result<GradeReport> {
        self.delete_where(|e| e.in_semester(semester)).await
    }

    /// `index` selects among the matching regular entries, not the whole store.
    /// Without it the last match is edited.
    pub async fn edit_regular_grade(
        &self,
        subject: &str,
        semester: Semester,
        grade: Grade,
        index: Option<usize>,
    ) -> Result<GradeReport> {
        let mut entries = self.load().await;

        let matching: Vec<usize> = entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_regular() && e.subject == subject && e.in_semester(semester))
            .map(|(position, _)| position)
            .collect();

        let target = match (index, matching.last()) {
            (_, None) => return Err(GradeError::not_found("no matching regular grades found")),
            (None, Some(&last)) => last,
            (Some(i), Some(_)) => *matching
                .get(i)
                .ok_or_else(|| GradeError::invalid_payload("grade index out of range"))?,
        };

        let previous = entries[target].grade;
        entries[target].grade = Some(grade.value());
        self.save(&entries).await?;

        tracing::info!(
            "✏️ Edited {} semester {} grade at position {}: {:?} -> {}",
            subject,
            semester,
            target,
            previous,
            grade.value()
        );
        Ok(GradeReport::from_entries(entries))
    }

    async fn delete_where<F>(&self, should_delete: F) -> Result<GradeReport>
    where
        F: Fn(&GradeEntry) -> bool,
    {
        let mut entries = self.load().await;
        let before = entries.len();
        entries.retain(|e| !should_delete(e));
        self.save(&entries).await?;

        tracing::info!("🗑️ Deleted {} entries from {}", before - entries.len(), self.path);
        Ok(GradeReport::from_entries(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::MemoryStorage;
    use crate::domain::model::EntryType;

    fn grade(value: f64) -> Grade {
        Grade::new(value).unwrap()
    }

    fn memory_store() -> (GradeStore<MemoryStorage>, MemoryStorage) {
        let storage = MemoryStorage::new();
        (GradeStore::new(storage.clone(), DEFAULT_STORE_FILE), storage)
    }

    #[tokio::test]
    async fn test_load_outcome_absent() {
        let (store, _) = memory_store();
        assert_eq!(store.load_outcome().await, LoadOutcome::Absent);
        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_load_outcome_corrupt() {
        let storage = MemoryStorage::with_file(DEFAULT_STORE_FILE, "{not json");
        let store = GradeStore::new(storage, DEFAULT_STORE_FILE);

        assert!(matches!(store.load_outcome().await, LoadOutcome::Corrupt(_)));
        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_load_outcome_wrong_shape_is_corrupt() {
        let storage = MemoryStorage::with_file(DEFAULT_STORE_FILE, r#"{"subject": "Math"}"#);
        let store = GradeStore::new(storage, DEFAULT_STORE_FILE);

        assert!(matches!(store.load_outcome().await, LoadOutcome::Corrupt(_)));
    }

    #[tokio::test]
    async fn test_empty_array_is_populated() {
        let storage = MemoryStorage::with_file(DEFAULT_STORE_FILE, "[]");
        let store = GradeStore::new(storage, DEFAULT_STORE_FILE);

        assert_eq!(store.load_outcome().await, LoadOutcome::Populated(vec![]));
    }

    #[tokio::test]
    async fn test_append_regular_persists_pretty_json() {
        let (store, storage) = memory_store();

        let report = store
            .append_regular("Math", grade(5.0), Some(Semester::First))
            .await
            .unwrap();

        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].entry_type, EntryType::Regular);
        assert_eq!(report.entries[0].semester, Some(1));
        assert_eq!(report.average, Some(5.0));

        let saved = String::from_utf8(storage.get_file(DEFAULT_STORE_FILE).unwrap()).unwrap();
        assert!(saved.contains("\n  {\n    \"subject\": \"Math\""));
    }

    #[tokio::test]
    async fn test_semester_grade_requires_two_regular_grades() {
        let (store, _) = memory_store();
        store
            .append_regular("Math", grade(4.0), Some(Semester::First))
            .await
            .unwrap();
        // 另一學期或另一科目的成績不算
        store
            .append_regular("Math", grade(4.0), Some(Semester::Second))
            .await
            .unwrap();
        store
            .append_regular("Physics", grade(4.0), Some(Semester::First))
            .await
            .unwrap();

        let result = store
            .append_semester_grade("Math", Semester::First, grade(5.0))
            .await;
        assert!(matches!(result, Err(GradeError::InsufficientData { semester: 1, .. })));
        assert_eq!(store.load().await.len(), 3);

        store
            .append_regular("Math", grade(6.0), Some(Semester::First))
            .await
            .unwrap();
        let report = store
            .append_semester_grade("Math", Semester::First, grade(5.0))
            .await
            .unwrap();
        assert_eq!(report.entries.len(), 5);
        assert_eq!(report.semester_averages.first, Some(5.0));
        assert_eq!(report.semester_averages.second, None);
    }

    #[tokio::test]
    async fn test_list_semester_entries_filters_type_only() {
        let (store, _) = memory_store();
        for value in [3.0, 5.0] {
            store
                .append_regular("Math", grade(value), Some(Semester::Second))
                .await
                .unwrap();
        }
        store
            .append_semester_grade("Math", Semester::Second, grade(4.0))
            .await
            .unwrap();

        let report = store.list_semester_entries().await;
        assert_eq!(report.entries.len(), 1);
        assert!(report.entries[0].is_semester());
        assert_eq!(report.semester_averages.second, Some(4.0));
    }

    #[tokio::test]
    async fn test_delete_semester_all_grades_keeps_other_semester() {
        let entries = vec![
            GradeEntry::regular("Math", grade(3.0), Some(Semester::First)),
            GradeEntry::regular("Math", grade(4.0), None),
            GradeEntry::semester_final("Math", grade(4.0), Semester::First),
            GradeEntry::semester_final("Art", grade(6.0), Semester::Second),
        ];
        let (store, _) = memory_store();
        store.save(&entries).await.unwrap();

        let report = store.delete_semester_all_grades(Semester::First).await.unwrap();

        assert_eq!(report.entries, vec![entries[1].clone(), entries[3].clone()]);
    }

    #[tokio::test]
    async fn test_edit_without_matches_is_not_found() {
        let (store, _) = memory_store();
        store
            .append_regular("Math", grade(3.0), None)
            .await
            .unwrap();

        let result = store
            .edit_regular_grade("Math", Semester::First, grade(5.0), None)
            .await;
        assert!(matches!(result, Err(GradeError::NotFound { .. })));
    }
}
