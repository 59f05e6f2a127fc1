use crate::error::ImportError;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::{fs::File, io::Read, path::Path};

/// One row of the units file
///
/// Requisite columns hold `;`-separated unit codes.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct UnitRecord {
    pub code: String,
    pub name: String,
    pub credit_points: i32,
    pub department: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub prerequisites: String,
    #[serde(default)]
    pub anti_requisites: String,
}

impl UnitRecord {
    pub fn prerequisite_codes(&self) -> Vec<String> {
        parse_code_list(&self.prerequisites)
    }

    pub fn anti_requisite_codes(&self) -> Vec<String> {
        parse_code_list(&self.anti_requisites)
    }
}

/// One row of the offerings file
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OfferingRecord {
    pub unit_code: String,
    pub year: i32,
    /// `S1`, `S2`, `S3`, `SS` or `WS`
    pub semester: String,
    /// RFC 3339
    pub enrollment_start: DateTime<Utc>,
    pub enrollment_end: DateTime<Utc>,
    /// 0 means unlimited
    #[serde(default)]
    pub capacity: i32,
    pub notes: Option<String>,
}

/// Splits a `;`-separated list of unit codes, normalising each code
///
/// # Arguments
/// * `value` - Raw column text such as `"cos10001; COS10009"`
///
/// # Returns
/// Upper-cased codes with blanks dropped
pub fn parse_code_list(value: &str) -> Vec<String> {
    value
        .split(';')
        .map(|code| code.trim().to_uppercase())
        .filter(|code| !code.is_empty())
        .collect()
}

fn read_records<T, R>(reader: R) -> Result<Vec<T>, ImportError>
where
    T: for<'de> Deserialize<'de>,
    R: Read,
{
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    reader
        .deserialize()
        .collect::<Result<Vec<T>, csv::Error>>()
        .map_err(ImportError::from)
}

fn open(path: &Path) -> Result<File, ImportError> {
    File::open(path).map_err(|source| ImportError::Io {
        path: path.display().to_string(),
        source,
    })
}

pub fn read_units<R: Read>(reader: R) -> Result<Vec<UnitRecord>, ImportError> {
    read_records(reader)
}

pub fn read_offerings<R: Read>(reader: R) -> Result<Vec<OfferingRecord>, ImportError> {
    read_records(reader)
}

pub fn read_units_file(path: &Path) -> Result<Vec<UnitRecord>, ImportError> {
    read_units(open(path)?)
}

pub fn read_offerings_file(path: &Path) -> Result<Vec<OfferingRecord>, ImportError> {
    read_offerings(open(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_code_list() {
        assert_eq!(
            parse_code_list(" cos10001 ;COS10009;; "),
            vec!["COS10001".to_string(), "COS10009".to_string()]
        );
        assert!(parse_code_list("").is_empty());
    }

    #[test]
    fn test_read_units() {
        let data = "\
code,name,credit_points,department,description,prerequisites,anti_requisites
COS10001,Introduction to Programming,12,Computing,,,
COS20007,Object Oriented Programming,12,Computing,Classes and objects,COS10001,COS20020
";
        let units = read_units(data.as_bytes()).unwrap();

        assert_eq!(units.len(), 2);
        assert_eq!(units[0].department.as_deref(), Some("Computing"));
        assert_eq!(units[0].description, None);
        assert!(units[0].prerequisite_codes().is_empty());
        assert_eq!(units[1].prerequisite_codes(), vec!["COS10001"]);
        assert_eq!(units[1].anti_requisite_codes(), vec!["COS20020"]);
    }

    #[test]
    fn test_read_offerings() {
        let data = "\
unit_code,year,semester,enrollment_start,enrollment_end,capacity,notes
COS20007,2026,S2,2026-06-01T00:00:00Z,2026-07-15T00:00:00Z,120,
";
        let offerings = read_offerings(data.as_bytes()).unwrap();

        assert_eq!(offerings.len(), 1);
        assert_eq!(offerings[0].semester, "S2");
        assert_eq!(offerings[0].capacity, 120);
        assert_eq!(
            offerings[0].enrollment_start,
            Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_read_units_rejects_bad_rows() {
        let data = "\
code,name,credit_points,department,description,prerequisites,anti_requisites
COS10001,Introduction to Programming,twelve,,,,
";
        assert!(matches!(read_units(data.as_bytes()), Err(ImportError::Csv(_))));
    }
}
