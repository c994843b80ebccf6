use crate::data::{DataType, RecordId, lenient};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ProgramStudy {
    #[serde(deserialize_with = "lenient::id")]
    pub id: RecordId,
    #[serde(alias = "nama", alias = "name", deserialize_with = "lenient::string")]
    pub program_studi: String,
}

impl DataType for ProgramStudy {
    const PATH: &'static str = "program-studis";
}

#[derive(Debug, Clone, Deserialize)]
pub struct DepartmentGroup {
    #[serde(deserialize_with = "lenient::id")]
    pub id: RecordId,
    #[serde(
        alias = "nama_kelompok",
        alias = "name",
        deserialize_with = "lenient::string"
    )]
    pub nama: String,
}

impl DataType for DepartmentGroup {
    const PATH: &'static str = "kelompok-keahlians";
}

pub trait Lookup {
    fn id(&self) -> RecordId;
    fn label(&self) -> &str;

    fn options(items: &[Self]) -> Vec<(String, String)>
    where
        Self: Sized,
    {
        items
            .iter()
            .map(|item| (item.id().to_string(), item.label().to_string()))
            .collect()
    }

    fn label_for(items: &[Self], id: Option<RecordId>) -> Option<&str>
    where
        Self: Sized,
    {
        let id = id?;
        items.iter().find(|item| item.id() == id).map(Self::label)
    }
}

impl Lookup for ProgramStudy {
    fn id(&self) -> RecordId {
        self.id
    }

    fn label(&self) -> &str {
        &self.program_studi
    }
}

impl Lookup for DepartmentGroup {
    fn id(&self) -> RecordId {
        self.id
    }

    fn label(&self) -> &str {
        &self.nama
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_aliases_are_accepted() {
        let programs: Vec<ProgramStudy> = serde_json::from_str(
            r#"[{"id": 1, "program_studi": "Informatika"}, {"id": "2", "nama": "Sistem Informasi"}]"#,
        )
        .unwrap();

        assert_eq!(ProgramStudy::label_for(&programs, Some(2)), Some("Sistem Informasi"));
        assert_eq!(ProgramStudy::label_for(&programs, Some(3)), None);
        assert_eq!(ProgramStudy::label_for(&programs, None), None);
    }
}
