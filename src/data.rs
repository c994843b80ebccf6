use crate::error::{InvalidFormFieldSnafu, KampusResult};
use jiff::civil::Date;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use snafu::OptionExt;

pub mod faculty;
pub mod lenient;
pub mod lookup;
pub mod photo;
pub mod student;

pub type RecordId = i64;

/// Anything the academic API serves as a collection under its own path.
pub trait DataType: DeserializeOwned + Send + 'static {
    ///relative to the API root, eg. `mahasiswa`
    const PATH: &'static str;
}

pub trait EditableDataType: DataType {
    type FormForAdding: Serialize + Send + Sync;
}

/// A closed set of string values the API accepts for a field.
pub trait Choice: Copy + PartialEq + 'static {
    const ALL: &'static [Self];

    fn as_str(self) -> &'static str;

    fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|choice| choice.as_str().eq_ignore_ascii_case(raw))
    }

    fn options() -> Vec<(String, String)> {
        Self::ALL
            .iter()
            .map(|choice| (choice.as_str().to_string(), choice.as_str().to_uppercase()))
            .collect()
    }
}

/// A record without the flag reads the same as `null` or `0`; blank forms
/// still start on `Male`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Sex {
    Male,
    #[default]
    Female,
}

impl Sex {
    pub const fn form_value(self) -> &'static str {
        match self {
            Self::Male => "1",
            Self::Female => "0",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Male => "Laki-laki",
            Self::Female => "Perempuan",
        }
    }

    pub fn options() -> Vec<(String, String)> {
        [Self::Male, Self::Female]
            .into_iter()
            .map(|sex| (sex.form_value().to_string(), sex.label().to_string()))
            .collect()
    }

    fn from_form_value(raw: &str) -> Option<Self> {
        match raw.trim() {
            "1" => Some(Self::Male),
            "0" => Some(Self::Female),
            _ => None,
        }
    }
}

impl Serialize for Sex {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(matches!(self, Self::Male))
    }
}

impl<'de> Deserialize<'de> for Sex {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(if lenient::flag(deserializer)? {
            Self::Male
        } else {
            Self::Female
        })
    }
}

/// Empty or whitespace-only inputs are absent rather than `""`.
pub fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub fn parse_optional_id(raw: &str, field: &'static str) -> KampusResult<Option<RecordId>> {
    non_empty(raw)
        .map(|raw| raw.parse().ok().context(InvalidFormFieldSnafu { field }))
        .transpose()
}

pub fn parse_optional_date(raw: &str, field: &'static str) -> KampusResult<Option<Date>> {
    non_empty(raw)
        .map(|raw| raw.parse().ok().context(InvalidFormFieldSnafu { field }))
        .transpose()
}

pub fn parse_sex(raw: &str) -> KampusResult<Sex> {
    Sex::from_form_value(raw).context(InvalidFormFieldSnafu {
        field: "jenis_kelamin",
    })
}

pub fn parse_choice<T: Choice>(raw: &str, field: &'static str) -> KampusResult<T> {
    T::parse(raw).context(InvalidFormFieldSnafu { field })
}

pub fn date_form_value(date: Option<Date>) -> String {
    date.map(|date| date.to_string()).unwrap_or_default()
}
