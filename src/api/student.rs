use std::{fmt, str::FromStr, sync::OnceLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::err::CustomError;

/// Study programs offered by the faculty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Major {
    #[serde(rename = "Teknik Informatika")]
    TeknikInformatika,
    #[serde(rename = "Sistem Informasi")]
    SistemInformasi,
    #[serde(rename = "Desain Komunikasi Visual")]
    DesainKomunikasiVisual,
    #[serde(rename = "Manajemen")]
    Manajemen,
    #[serde(rename = "Akuntansi")]
    Akuntansi,
}

impl Major {
    pub const ALL: [Major; 5] = [
        Major::TeknikInformatika,
        Major::SistemInformasi,
        Major::DesainKomunikasiVisual,
        Major::Manajemen,
        Major::Akuntansi,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Major::TeknikInformatika => "Teknik Informatika",
            Major::SistemInformasi => "Sistem Informasi",
            Major::DesainKomunikasiVisual => "Desain Komunikasi Visual",
            Major::Manajemen => "Manajemen",
            Major::Akuntansi => "Akuntansi",
        }
    }

    /// verbatim lookup, no case folding
    pub fn from_label(label: &str) -> Option<Major> {
        Major::ALL.into_iter().find(|major| major.label() == label)
    }
}

impl fmt::Display for Major {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Major {
    type Err = CustomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Major::from_label(s).ok_or_else(|| CustomError::UnknownEnumValue {
            field: "jurusan",
            value: s.to_string(),
        })
    }
}

/// Enrollment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "Aktif")]
    Active,
    #[serde(rename = "Lulus")]
    Graduated,
    #[serde(rename = "Cuti")]
    Leave,
    #[serde(rename = "Drop Out")]
    Dropout,
}

impl Status {
    pub const ALL: [Status; 4] = [
        Status::Active,
        Status::Graduated,
        Status::Leave,
        Status::Dropout,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Status::Active => "Aktif",
            Status::Graduated => "Lulus",
            Status::Leave => "Cuti",
            Status::Dropout => "Drop Out",
        }
    }

    pub fn from_label(label: &str) -> Option<Status> {
        Status::ALL.into_iter().find(|status| status.label() == label)
    }

    pub fn from_label_ignore_case(label: &str) -> Option<Status> {
        let wanted = label.to_lowercase();
        Status::ALL
            .into_iter()
            .find(|status| status.label().to_lowercase() == wanted)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Status {
    type Err = CustomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::from_label(s).ok_or_else(|| CustomError::UnknownEnumValue {
            field: "status",
            value: s.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub name: String,
    /// mime type
    #[serde(rename = "type")]
    pub mime_type: String,
    pub upload_date: String,
    pub url: String,
}

impl Document {
    pub fn new(id: &str, name: &str, mime_type: &str, upload_date: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            mime_type: mime_type.to_string(),
            upload_date: upload_date.to_string(),
            url: "#".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    /// student number, opaque
    pub nim: String,
    pub name: String,
    pub major: Major,
    pub entry_year: i32,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub status: Status,
    /// display order is insertion order
    pub documents: Vec<Document>,
}

impl Student {
    pub fn from_draft(id: String, draft: StudentDraft) -> Self {
        let StudentDraft {
            nim,
            name,
            major,
            entry_year,
            email,
            phone,
            address,
            status,
        } = draft;
        Self {
            id,
            nim,
            name,
            major,
            entry_year,
            email,
            phone,
            address,
            status,
            documents: Vec::new(),
        }
    }

    /// Replaces every editable field, keeping id and documents.
    pub fn apply(&mut self, draft: StudentDraft) {
        self.nim = draft.nim;
        self.name = draft.name;
        self.major = draft.major;
        self.entry_year = draft.entry_year;
        self.email = draft.email;
        self.phone = draft.phone;
        self.address = draft.address;
        self.status = draft.status;
    }
}

/// Payload of the add/edit student form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDraft {
    pub nim: String,
    pub name: String,
    pub major: Major,
    pub entry_year: i32,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    pub status: Status,
}

fn email_regex() -> Result<&'static Regex, CustomError> {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    if let Some(re) = EMAIL.get() {
        return Ok(re);
    }
    let re = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")?;
    Ok(EMAIL.get_or_init(|| re))
}

impl StudentDraft {
    /// An empty form: Teknik Informatika, Aktif, entering this year.
    pub fn blank() -> Self {
        Self {
            nim: String::new(),
            name: String::new(),
            major: Major::TeknikInformatika,
            entry_year: time::OffsetDateTime::now_utc().year(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            status: Status::Active,
        }
    }

    pub fn validate(&self) -> Result<(), CustomError> {
        if self.nim.trim().is_empty() {
            return Err(CustomError::InvalidStudent("NIM wajib diisi".to_string()));
        }
        if self.name.trim().is_empty() {
            return Err(CustomError::InvalidStudent(
                "nama lengkap wajib diisi".to_string(),
            ));
        }
        if self.entry_year <= 0 {
            return Err(CustomError::InvalidStudent(format!(
                "tahun masuk {} tidak valid",
                self.entry_year
            )));
        }
        if !self.email.is_empty() && !email_regex()?.is_match(&self.email) {
            return Err(CustomError::InvalidStudent(format!(
                "email {} tidak valid",
                self.email
            )));
        }
        Ok(())
    }
}

/// The records the dashboard starts with.
pub fn sample_students() -> Vec<Student> {
    let sample = |id: &str,
                  nim: &str,
                  name: &str,
                  major: Major,
                  entry_year: i32,
                  email: &str,
                  phone: &str,
                  address: &str,
                  status: Status| Student {
        id: id.to_string(),
        nim: nim.to_string(),
        name: name.to_string(),
        major,
        entry_year,
        email: email.to_string(),
        phone: phone.to_string(),
        address: address.to_string(),
        status,
        documents: Vec::new(),
    };

    let mut budi = sample(
        "1",
        "2023001",
        "Budi Santoso",
        Major::TeknikInformatika,
        2023,
        "budi.s@univ.ac.id",
        "081234567890",
        "Jl. Merdeka No. 10, Jakarta",
        Status::Active,
    );
    budi.documents = vec![
        Document::new("d1", "KTP_Scan.jpg", "image/jpeg", "2023-08-01"),
        Document::new("d2", "Ijazah_SMA.pdf", "application/pdf", "2023-08-01"),
    ];

    vec![
        budi,
        sample(
            "2",
            "2022045",
            "Siti Aminah",
            Major::SistemInformasi,
            2022,
            "siti.a@univ.ac.id",
            "081987654321",
            "Jl. Kebon Jeruk No. 5, Bandung",
            Status::Active,
        ),
        sample(
            "3",
            "2021088",
            "Rizky Pratama",
            Major::DesainKomunikasiVisual,
            2021,
            "rizky.p@univ.ac.id",
            "085678912345",
            "Jl. Diponegoro No. 12, Surabaya",
            Status::Leave,
        ),
        sample(
            "4",
            "2020012",
            "Dewi Lestari",
            Major::Manajemen,
            2020,
            "dewi.l@univ.ac.id",
            "081345678912",
            "Jl. Sudirman No. 88, Yogyakarta",
            Status::Graduated,
        ),
        sample(
            "5",
            "2023055",
            "Andi Wijaya",
            Major::TeknikInformatika,
            2023,
            "andi.w@univ.ac.id",
            "081298765432",
            "Jl. Ahmad Yani No. 3, Semarang",
            Status::Active,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> StudentDraft {
        StudentDraft {
            nim: "2024010".to_string(),
            name: "Rina Kartika".to_string(),
            email: "rina.k@univ.ac.id".to_string(),
            ..StudentDraft::blank()
        }
    }

    #[test]
    fn test_major_label_lookup_is_verbatim() {
        assert_eq!(
            Major::from_label("Teknik Informatika"),
            Some(Major::TeknikInformatika)
        );
        assert_eq!(Major::from_label("teknik informatika"), None);
        assert_eq!(Major::from_label("Teknik"), None);
    }

    #[test]
    fn test_status_lookup_ignore_case() {
        assert_eq!(Status::from_label_ignore_case("aktif"), Some(Status::Active));
        assert_eq!(
            Status::from_label_ignore_case("DROP OUT"),
            Some(Status::Dropout)
        );
        assert_eq!(Status::from_label_ignore_case("active"), None);
    }

    #[test]
    fn test_unknown_major_is_integrity_error() {
        let err = "Kedokteran".parse::<Major>().unwrap_err();
        assert!(matches!(err, CustomError::UnknownEnumValue { field: "jurusan", .. }));
    }

    #[test]
    fn test_student_serializes_with_labels() {
        let student = &sample_students()[0];
        let json = serde_json::to_value(student).unwrap();
        assert_eq!(json["major"], "Teknik Informatika");
        assert_eq!(json["status"], "Aktif");
        assert_eq!(json["entryYear"], 2023);
        assert_eq!(json["documents"][0]["type"], "image/jpeg");
        assert_eq!(json["documents"][1]["uploadDate"], "2023-08-01");
    }

    #[test]
    fn test_deserialize_rejects_unknown_status() {
        let mut json = serde_json::to_value(&sample_students()[1]).unwrap();
        json["status"] = serde_json::json!("Pindah");
        assert!(serde_json::from_value::<Student>(json).is_err());
    }

    #[test]
    fn test_apply_keeps_id_and_documents() {
        let mut student = sample_students().remove(0);
        student.apply(draft());
        assert_eq!(student.id, "1");
        assert_eq!(student.name, "Rina Kartika");
        assert_eq!(student.documents.len(), 2);
    }

    #[test]
    fn test_validate() {
        assert!(draft().validate().is_ok());

        let no_nim = StudentDraft {
            nim: "  ".to_string(),
            ..draft()
        };
        assert!(matches!(no_nim.validate(), Err(CustomError::InvalidStudent(_))));

        let bad_email = StudentDraft {
            email: "rina.k@".to_string(),
            ..draft()
        };
        assert!(bad_email.validate().is_err());

        let no_email = StudentDraft {
            email: String::new(),
            ..draft()
        };
        assert!(no_email.validate().is_ok());
    }

    #[test]
    fn test_blank_draft_defaults() {
        let blank = StudentDraft::blank();
        assert_eq!(blank.major, Major::TeknikInformatika);
        assert_eq!(blank.status, Status::Active);
        assert!(blank.entry_year >= 2024);
    }
}
