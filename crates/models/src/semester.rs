use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumProperty, EnumString};

#[cfg(feature = "database")]
use sea_orm::entity::prelude::*;

/// Teaching period an offering runs in
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumProperty,
)]
#[cfg_attr(feature = "database", derive(EnumIter, DeriveActiveEnum))]
#[cfg_attr(
    feature = "database",
    sea_orm(rs_type = "String", db_type = "String(StringLen::N(2))")
)]
pub enum Semester {
    #[cfg_attr(feature = "database", sea_orm(string_value = "S1"))]
    #[strum(serialize = "S1", props(full = "Semester 1"))]
    #[serde(rename = "S1")]
    Semester1,
    #[cfg_attr(feature = "database", sea_orm(string_value = "S2"))]
    #[strum(serialize = "S2", props(full = "Semester 2"))]
    #[serde(rename = "S2")]
    Semester2,
    #[cfg_attr(feature = "database", sea_orm(string_value = "S3"))]
    #[strum(serialize = "S3", props(full = "Semester 3"))]
    #[serde(rename = "S3")]
    Semester3,
    #[cfg_attr(feature = "database", sea_orm(string_value = "SS"))]
    #[strum(serialize = "SS", props(full = "Summer Session"))]
    #[serde(rename = "SS")]
    Summer,
    #[cfg_attr(feature = "database", sea_orm(string_value = "WS"))]
    #[strum(serialize = "WS", props(full = "Winter Session"))]
    #[serde(rename = "WS")]
    Winter,
}

impl Semester {
    pub fn as_str(&self) -> &str {
        self.as_ref()
    }

    pub fn as_full_str(&self) -> &'static str {
        self.get_str("full").unwrap_or_default()
    }

    pub fn all() -> Vec<Semester> {
        vec![
            Self::Semester1,
            Self::Semester2,
            Self::Semester3,
            Self::Summer,
            Self::Winter,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_codes() {
        assert_eq!("SS".parse::<Semester>(), Ok(Semester::Summer));
        assert_eq!(Semester::Semester2.as_str(), "S2");
        assert_eq!(Semester::Winter.to_string(), "WS");
        assert!("Q1".parse::<Semester>().is_err());
    }

    #[test]
    fn test_full_names() {
        let names: Vec<_> = Semester::all().iter().map(|s| s.as_full_str()).collect();
        assert_eq!(
            names,
            [
                "Semester 1",
                "Semester 2",
                "Semester 3",
                "Summer Session",
                "Winter Session"
            ]
        );
    }
}
