//! Filtering of the student table.
//!
//! Two modes exist: the free-text box filter and the structured filter
//! produced by the AI translator. Both are pure and keep the input order.

use serde::{Deserialize, Serialize};

use super::student::{Major, Status, Student};

/// A field constraint whose value may fall outside the closed set.
///
/// An `Unknown` constraint never matches any record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Constraint<T> {
    Exactly(T),
    Unknown(String),
}

impl<T: PartialEq> Constraint<T> {
    fn admits(&self, value: &T) -> bool {
        match self {
            Constraint::Exactly(wanted) => wanted == value,
            Constraint::Unknown(_) => false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StructuredFilter {
    /// case-insensitive substring of the name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Constraint<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub major: Option<Constraint<Major>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<Constraint<i32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Constraint<Status>>,
}

impl StructuredFilter {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.major.is_none() && self.year.is_none() && self.status.is_none()
    }

    pub fn matches(&self, student: &Student) -> bool {
        match &self.name {
            Some(Constraint::Exactly(name)) => {
                if !student.name.to_lowercase().contains(&name.to_lowercase()) {
                    return false;
                }
            }
            Some(Constraint::Unknown(_)) => return false,
            None => {}
        }
        if let Some(major) = &self.major {
            if !major.admits(&student.major) {
                return false;
            }
        }
        if let Some(year) = &self.year {
            if !year.admits(&student.entry_year) {
                return false;
            }
        }
        if let Some(status) = &self.status {
            if !status.admits(&student.status) {
                return false;
            }
        }
        true
    }

    /// `key: value` pairs shown in the "Filter Aktif" badge.
    pub fn badges(&self) -> Vec<(&'static str, String)> {
        fn show<T: ToString>(constraint: &Constraint<T>) -> String {
            match constraint {
                Constraint::Exactly(value) => value.to_string(),
                Constraint::Unknown(raw) => raw.clone(),
            }
        }

        let mut badges = Vec::new();
        if let Some(name) = &self.name {
            badges.push(("name", show(name)));
        }
        if let Some(major) = &self.major {
            badges.push(("major", show(major)));
        }
        if let Some(year) = &self.year {
            badges.push(("year", show(year)));
        }
        if let Some(status) = &self.status {
            badges.push(("status", show(status)));
        }
        badges
    }
}

/// The untyped object the translator answers with.
///
/// Every key is optional and may carry any JSON value; see
/// [`RawFilter::into_filter`] for how values are checked.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFilter {
    #[serde(default)]
    pub name: Option<serde_json::Value>,
    #[serde(default)]
    pub major: Option<serde_json::Value>,
    #[serde(default)]
    pub year: Option<serde_json::Value>,
    #[serde(default)]
    pub status: Option<serde_json::Value>,
}

/// null, false, "" and 0 leave a field unconstrained
fn is_blank(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => true,
        serde_json::Value::Bool(b) => !b,
        serde_json::Value::String(s) => s.is_empty(),
        serde_json::Value::Number(n) => n.as_f64() == Some(0.0),
        _ => false,
    }
}

fn raw_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl RawFilter {
    /// Validates the translator output against the closed enums.
    ///
    /// Values outside their domain are kept as [`Constraint::Unknown`]
    /// instead of being coerced to the nearest label.
    pub fn into_filter(self) -> StructuredFilter {
        let present = |v: Option<serde_json::Value>| v.filter(|v| !is_blank(v));

        let name = present(self.name).map(|v| match v {
            serde_json::Value::String(s) => Constraint::Exactly(s),
            other => Constraint::Unknown(other.to_string()),
        });

        let major = present(self.major).map(|v| match &v {
            serde_json::Value::String(s) => match Major::from_label(s) {
                Some(major) => Constraint::Exactly(major),
                None => Constraint::Unknown(s.clone()),
            },
            other => Constraint::Unknown(other.to_string()),
        });

        let year = present(self.year).map(|v| {
            let exact = v
                .as_i64()
                .or_else(|| v.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
                .and_then(|y| i32::try_from(y).ok());
            match exact {
                Some(year) if v.is_number() => Constraint::Exactly(year),
                _ => Constraint::Unknown(raw_text(&v)),
            }
        });

        let status = present(self.status).map(|v| match &v {
            serde_json::Value::String(s) => match Status::from_label_ignore_case(s) {
                Some(status) => Constraint::Exactly(status),
                None => Constraint::Unknown(s.clone()),
            },
            other => Constraint::Unknown(other.to_string()),
        });

        StructuredFilter {
            name,
            major,
            year,
            status,
        }
    }
}

/// Table search box filter.
///
/// The query is lower-cased and looked up in the lower-cased name, the raw
/// NIM and the lower-cased major label.
pub fn filter_free_text<'a>(records: &'a [Student], query: &str) -> Vec<&'a Student> {
    let term = query.to_lowercase();
    records
        .iter()
        .filter(|student| {
            student.name.to_lowercase().contains(&term)
                || student.nim.contains(&term)
                || student.major.label().to_lowercase().contains(&term)
        })
        .collect()
}

/// Conjunctive structured filter; an empty filter passes everything.
pub fn filter_structured<'a>(records: &'a [Student], filter: &StructuredFilter) -> Vec<&'a Student> {
    records.iter().filter(|student| filter.matches(student)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::student::sample_students;
    use serde_json::json;

    fn ids(records: &[&Student]) -> Vec<String> {
        records.iter().map(|s| s.id.clone()).collect()
    }

    fn raw(value: serde_json::Value) -> StructuredFilter {
        serde_json::from_value::<RawFilter>(value).unwrap().into_filter()
    }

    #[test]
    fn test_empty_query_returns_everything_in_order() {
        let records = sample_students();
        let result = filter_free_text(&records, "");
        assert_eq!(ids(&result), vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn test_free_text_by_name() {
        let records = sample_students();
        let result = filter_free_text(&records, "budi");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Budi Santoso");
    }

    #[test]
    fn test_free_text_is_case_insensitive() {
        let records = sample_students();
        for query in ["budi", "informa", "an", "2023", "sistem"] {
            assert_eq!(
                ids(&filter_free_text(&records, query)),
                ids(&filter_free_text(&records, &query.to_uppercase())),
                "query {query}"
            );
        }
    }

    #[test]
    fn test_free_text_by_nim_and_major() {
        let records = sample_students();
        assert_eq!(ids(&filter_free_text(&records, "2022045")), vec!["2"]);
        assert_eq!(ids(&filter_free_text(&records, "teknik")), vec!["1", "5"]);
        assert_eq!(ids(&filter_free_text(&records, "Visual")), vec!["3"]);
        assert!(filter_free_text(&records, "kedokteran").is_empty());
    }

    #[test]
    fn test_nim_is_not_case_folded() {
        let mut records = sample_students();
        records[0].nim = "TI-2023001".to_string();
        records[0].name = "Budi".to_string();
        // the query is folded, the nim is not
        assert!(filter_free_text(&records, "TI-2023").is_empty());
        assert_eq!(ids(&filter_free_text(&records, "-2023001")), vec!["1"]);
    }

    #[test]
    fn test_empty_structured_filter_passes_through() {
        let records = sample_students();
        let result = filter_structured(&records, &StructuredFilter::default());
        assert_eq!(ids(&result), vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn test_structured_major_and_year() {
        let records = sample_students();
        let filter = StructuredFilter {
            major: Some(Constraint::Exactly(Major::TeknikInformatika)),
            year: Some(Constraint::Exactly(2023)),
            ..Default::default()
        };
        assert_eq!(ids(&filter_structured(&records, &filter)), vec!["1", "5"]);
    }

    #[test]
    fn test_structured_is_monotone_under_field_addition() {
        let records = sample_students();
        let steps = [
            StructuredFilter::default(),
            StructuredFilter {
                status: Some(Constraint::Exactly(Status::Active)),
                ..Default::default()
            },
            StructuredFilter {
                status: Some(Constraint::Exactly(Status::Active)),
                year: Some(Constraint::Exactly(2023)),
                ..Default::default()
            },
            StructuredFilter {
                status: Some(Constraint::Exactly(Status::Active)),
                year: Some(Constraint::Exactly(2023)),
                name: Some(Constraint::Exactly("andi".to_string())),
                ..Default::default()
            },
        ];
        let sizes: Vec<usize> = steps
            .iter()
            .map(|f| filter_structured(&records, f).len())
            .collect();
        assert_eq!(sizes, vec![5, 3, 2, 1]);
    }

    #[test]
    fn test_unknown_major_matches_nothing() {
        let records = sample_students();
        let filter = raw(json!({ "major": "Informatika" }));
        assert_eq!(
            filter.major,
            Some(Constraint::Unknown("Informatika".to_string()))
        );
        assert!(filter_structured(&records, &filter).is_empty());
        assert!(filter_structured(&[], &filter).is_empty());
    }

    #[test]
    fn test_raw_status_is_case_insensitive() {
        let records = sample_students();
        let filter = raw(json!({ "status": "CUTI" }));
        assert_eq!(ids(&filter_structured(&records, &filter)), vec!["3"]);

        let unknown = raw(json!({ "status": "inactive" }));
        assert!(filter_structured(&records, &unknown).is_empty());
    }

    #[test]
    fn test_raw_blank_values_are_unconstrained() {
        let filter = raw(json!({ "name": "", "major": null, "year": 0, "status": "" }));
        assert!(filter.is_empty());
    }

    #[test]
    fn test_raw_year_must_be_an_integral_number() {
        assert_eq!(raw(json!({ "year": 2021 })).year, Some(Constraint::Exactly(2021)));
        assert_eq!(raw(json!({ "year": 2021.0 })).year, Some(Constraint::Exactly(2021)));
        assert_eq!(
            raw(json!({ "year": "2021" })).year,
            Some(Constraint::Unknown("2021".to_string()))
        );
        assert_eq!(
            raw(json!({ "year": 2021.5 })).year,
            Some(Constraint::Unknown("2021.5".to_string()))
        );
    }

    #[test]
    fn test_raw_name_must_be_a_string() {
        let mut records = sample_students();
        records[0].name = "Budi 2023".to_string();
        records[1].name = "true love".to_string();

        let number = raw(json!({ "name": 2023 }));
        assert_eq!(number.name, Some(Constraint::Unknown("2023".to_string())));
        assert!(filter_structured(&records, &number).is_empty());

        let flag = raw(json!({ "name": true }));
        assert_eq!(flag.name, Some(Constraint::Unknown("true".to_string())));
        assert!(filter_structured(&records, &flag).is_empty());

        let object = raw(json!({ "name": { "first": "Budi" } }));
        assert!(matches!(object.name, Some(Constraint::Unknown(_))));
        assert!(filter_structured(&records, &object).is_empty());
    }

    #[test]
    fn test_raw_name_substring() {
        let records = sample_students();
        let filter = raw(json!({ "name": "PRATAMA", "extra": true }));
        assert_eq!(ids(&filter_structured(&records, &filter)), vec!["3"]);
    }

    #[test]
    fn test_badges() {
        let filter = raw(json!({ "major": "Manajemen", "year": 2020 }));
        assert_eq!(
            filter.badges(),
            vec![("major", "Manajemen".to_string()), ("year", "2020".to_string())]
        );
    }
}
