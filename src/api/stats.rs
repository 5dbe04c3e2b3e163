use serde::Serialize;

use super::student::{Major, Status, Student};

/// One bar of the per-major chart
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MajorCount {
    pub name: String,
    pub full_name: &'static str,
    pub count: usize,
}

/// One slice of the status pie
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct StatusSlice {
    pub name: &'static str,
    pub value: usize,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total: usize,
    pub active: usize,
    pub graduated: usize,
    /// leave + dropout
    pub inactive: usize,
    pub by_major: Vec<MajorCount>,
    pub by_status: Vec<StatusSlice>,
}

/// "Teknik Informatika" -> "Teknik...", "Manajemen" -> "Manajemen"
fn short_label(label: &str) -> String {
    let mut words = label.split(' ');
    let first = words.next().unwrap_or_default();
    match words.next() {
        Some(_) => format!("{first}..."),
        None => first.to_string(),
    }
}

impl DashboardStats {
    pub fn compute(students: &[Student]) -> Self {
        let count_status = |status: Status| students.iter().filter(|s| s.status == status).count();

        let total = students.len();
        let active = count_status(Status::Active);
        let graduated = count_status(Status::Graduated);
        let inactive = total - active - graduated;

        let by_major = Major::ALL
            .into_iter()
            .map(|major| MajorCount {
                name: short_label(major.label()),
                full_name: major.label(),
                count: students.iter().filter(|s| s.major == major).count(),
            })
            .collect();

        let by_status = vec![
            StatusSlice {
                name: Status::Active.label(),
                value: active,
            },
            StatusSlice {
                name: Status::Graduated.label(),
                value: graduated,
            },
            StatusSlice {
                name: "Lainnya",
                value: inactive,
            },
        ];

        Self {
            total,
            active,
            graduated,
            inactive,
            by_major,
            by_status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::student::sample_students;

    #[test]
    fn test_sample_kpis() {
        let stats = DashboardStats::compute(&sample_students());
        assert_eq!(stats.total, 5);
        assert_eq!(stats.active, 3);
        assert_eq!(stats.graduated, 1);
        assert_eq!(stats.inactive, 1);
    }

    #[test]
    fn test_major_series_in_enum_order() {
        let stats = DashboardStats::compute(&sample_students());
        let series: Vec<(&str, &str, usize)> = stats
            .by_major
            .iter()
            .map(|m| (m.name.as_str(), m.full_name, m.count))
            .collect();
        assert_eq!(
            series,
            vec![
                ("Teknik...", "Teknik Informatika", 2),
                ("Sistem...", "Sistem Informasi", 1),
                ("Desain...", "Desain Komunikasi Visual", 1),
                ("Manajemen", "Manajemen", 1),
                ("Akuntansi", "Akuntansi", 0),
            ]
        );
    }

    #[test]
    fn test_status_slices() {
        let mut students = sample_students();
        students[1].status = Status::Dropout;
        let stats = DashboardStats::compute(&students);
        let slices: Vec<(&str, usize)> = stats.by_status.iter().map(|s| (s.name, s.value)).collect();
        assert_eq!(slices, vec![("Aktif", 2), ("Lulus", 1), ("Lainnya", 2)]);
    }

    #[test]
    fn test_empty_store() {
        let stats = DashboardStats::compute(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.inactive, 0);
        assert!(stats.by_major.iter().all(|m| m.count == 0));
    }
}
