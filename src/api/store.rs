use log::info;

use super::{
    err::CustomError,
    student::{sample_students, Major, Status, Student, StudentDraft},
};

/// The in-memory student list; newest records first.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    students: Vec<Student>,
    /// bumped on every mutation
    revision: u64,
}

fn mint_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

impl RecordStore {
    pub fn new(students: Vec<Student>) -> Self {
        Self {
            students,
            revision: 0,
        }
    }

    pub fn with_samples() -> Self {
        Self::new(sample_students())
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn get(&self, id: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    /// `(major, status)` of every record, the input of the AI summary.
    pub fn composition(&self) -> Vec<(Major, Status)> {
        self.students.iter().map(|s| (s.major, s.status)).collect()
    }

    pub fn create(&mut self, draft: StudentDraft) -> Result<&Student, CustomError> {
        draft.validate()?;
        let mut id = mint_id();
        while self.get(&id).is_some() {
            id = mint_id();
        }
        info!("adding student {} ({})", draft.name, draft.nim);
        self.students.insert(0, Student::from_draft(id, draft));
        self.revision += 1;
        Ok(&self.students[0])
    }

    /// Full-field replacement; id and documents stay.
    pub fn update(&mut self, id: &str, draft: StudentDraft) -> Result<&Student, CustomError> {
        draft.validate()?;
        let index = self
            .students
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| CustomError::StudentNotFound(id.to_string()))?;
        info!("updating student {id}");
        self.students[index].apply(draft);
        self.revision += 1;
        Ok(&self.students[index])
    }

    pub fn delete(&mut self, id: &str) -> Result<Student, CustomError> {
        let index = self
            .students
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| CustomError::StudentNotFound(id.to_string()))?;
        info!("deleting student {id}");
        self.revision += 1;
        Ok(self.students.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn draft(nim: &str, name: &str) -> StudentDraft {
        StudentDraft {
            nim: nim.to_string(),
            name: name.to_string(),
            major: Major::Akuntansi,
            entry_year: 2024,
            email: String::new(),
            phone: "0812000000".to_string(),
            address: "Jl. Pemuda 7, Medan".to_string(),
            status: Status::Active,
        }
    }

    #[test]
    fn test_create_prepends_with_fresh_id() {
        let mut store = RecordStore::with_samples();
        let created = store.create(draft("2024001", "Fajar Nugroho")).unwrap().clone();

        assert!(created.documents.is_empty());
        assert_eq!(store.students()[0], created);
        assert_eq!(store.students().len(), 6);
        assert_eq!(store.revision(), 1);

        let ids: HashSet<&str> = store.students().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids.len(), 6);
    }

    #[test]
    fn test_create_rejects_invalid_draft() {
        let mut store = RecordStore::default();
        let err = store.create(draft("", "Tanpa NIM")).unwrap_err();
        assert!(matches!(err, CustomError::InvalidStudent(_)));
        assert!(store.students().is_empty());
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_update_replaces_fields_in_place() {
        let mut store = RecordStore::with_samples();
        let updated = store.update("1", draft("2023001", "Budi S.")).unwrap();
        assert_eq!(updated.major, Major::Akuntansi);
        assert_eq!(updated.email, "");
        assert_eq!(updated.documents.len(), 2);
        assert_eq!(store.students()[0].id, "1");
    }

    #[test]
    fn test_update_unknown_id() {
        let mut store = RecordStore::with_samples();
        let err = store.update("missing", draft("1", "x")).unwrap_err();
        assert!(matches!(err, CustomError::StudentNotFound(id) if id == "missing"));
    }

    #[test]
    fn test_delete_by_id() {
        let mut store = RecordStore::with_samples();
        let removed = store.delete("3").unwrap();
        assert_eq!(removed.name, "Rizky Pratama");
        assert!(store.get("3").is_none());
        assert!(store.delete("3").is_err());

        let order: Vec<&str> = store.students().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(order, vec!["1", "2", "4", "5"]);
    }

    #[test]
    fn test_composition() {
        let store = RecordStore::with_samples();
        let composition = store.composition();
        assert_eq!(composition.len(), 5);
        assert_eq!(composition[2], (Major::DesainKomunikasiVisual, Status::Leave));
    }
}
