use std::{io, path::Path};

use log::info;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{
    err::CustomError,
    student::{Major, Status, Student, StudentDraft},
};

/// One csv row of the roster
#[derive(Debug, Serialize, Deserialize)]
struct RosterRow {
    nim: String,
    name: String,
    major: String,
    entry_year: i32,
    #[serde(default)]
    email: String,
    #[serde(default)]
    phone: String,
    #[serde(default)]
    address: String,
    status: String,
}

impl From<&Student> for RosterRow {
    fn from(student: &Student) -> Self {
        Self {
            nim: student.nim.clone(),
            name: student.name.clone(),
            major: student.major.label().to_string(),
            entry_year: student.entry_year,
            email: student.email.clone(),
            phone: student.phone.clone(),
            address: student.address.clone(),
            status: student.status.label().to_string(),
        }
    }
}

impl RosterRow {
    fn into_draft(self) -> Result<StudentDraft, CustomError> {
        let draft = StudentDraft {
            major: self.major.parse::<Major>()?,
            status: self.status.parse::<Status>()?,
            nim: self.nim,
            name: self.name,
            entry_year: self.entry_year,
            email: self.email,
            phone: self.phone,
            address: self.address,
        };
        draft.validate()?;
        Ok(draft)
    }
}

/// Writes the students as csv, header included.
pub fn export_csv<W: io::Write>(students: &[Student], writer: W) -> Result<(), CustomError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for student in students {
        wtr.serialize(RosterRow::from(student))?;
    }
    if students.is_empty() {
        wtr.write_record([
            "nim",
            "name",
            "major",
            "entry_year",
            "email",
            "phone",
            "address",
            "status",
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Reads drafts from csv; the first bad row aborts the import.
pub fn read_csv<R: io::Read>(reader: R) -> Result<Vec<StudentDraft>, CustomError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut drafts = Vec::new();
    for (index, row) in rdr.deserialize::<RosterRow>().enumerate() {
        // header is line 1
        let line = index + 2;
        let draft = row?
            .into_draft()
            .map_err(|err| CustomError::CsvDataError(format!("baris {line}: {err}")))?;
        drafts.push(draft);
    }
    Ok(drafts)
}

/// Opens a roster file; only `.csv` files are accepted.
pub fn import_file(path: &Path) -> Result<Vec<StudentDraft>, CustomError> {
    let re = Regex::new(r"(?i)\.csv$")?;
    let file_name = path.to_string_lossy();
    if !re.is_match(&file_name) {
        return Err(CustomError::CsvDataError(format!(
            "{file_name} bukan file csv"
        )));
    }
    let file = std::fs::File::open(path)?;
    let drafts = read_csv(file)?;
    info!("read {} students from {}", drafts.len(), file_name);
    Ok(drafts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::student::sample_students;
    use std::{fs::File, io::Write};
    use tempfile::tempdir;

    const HEADER: &str = "nim,name,major,entry_year,email,phone,address,status";

    #[test]
    fn test_export_writes_labels() {
        let mut buf = Vec::new();
        export_csv(&sample_students()[2..3], &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some(HEADER));
        assert_eq!(
            lines.next(),
            Some("2021088,Rizky Pratama,Desain Komunikasi Visual,2021,rizky.p@univ.ac.id,085678912345,\"Jl. Diponegoro No. 12, Surabaya\",Cuti")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_export_empty_list_keeps_header() {
        let mut buf = Vec::new();
        export_csv(&[], &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap().trim_end(), HEADER);
    }

    #[test]
    fn test_exported_roster_reads_back() {
        let students = sample_students();
        let mut buf = Vec::new();
        export_csv(&students, &mut buf).unwrap();

        let drafts = read_csv(buf.as_slice()).unwrap();
        assert_eq!(drafts.len(), students.len());
        assert_eq!(drafts[3].name, "Dewi Lestari");
        assert_eq!(drafts[3].status, Status::Graduated);
    }

    #[test]
    fn test_unknown_major_is_rejected_with_line() {
        let data = format!("{HEADER}\n2024001,Ani,Kedokteran,2024,,,,Aktif\n");
        let err = read_csv(data.as_bytes()).unwrap_err();
        match err {
            CustomError::CsvDataError(msg) => {
                assert!(msg.starts_with("baris 2:"), "{msg}");
                assert!(msg.contains("Kedokteran"), "{msg}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_import_file() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("angkatan2024.CSV");
        let mut file = File::create(&file_path).unwrap();
        writeln!(file, "{HEADER}").unwrap();
        writeln!(file, "2024002,Bayu Saputra,Akuntansi,2024,bayu@univ.ac.id,,,Aktif").unwrap();
        drop(file);

        let drafts = import_file(&file_path).unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].major, Major::Akuntansi);
        assert_eq!(drafts[0].address, "");
    }

    #[test]
    fn test_import_rejects_other_files() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("roster.xlsx");
        File::create(&file_path).unwrap();
        assert!(matches!(
            import_file(&file_path),
            Err(CustomError::CsvDataError(_))
        ));
    }
}
