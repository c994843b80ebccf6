use crate::{
    data::{
        Choice, DataType, EditableDataType, RecordId, Sex, date_form_value, lenient, non_empty,
        parse_choice, parse_optional_date, parse_optional_id, parse_sex,
    },
    error::KampusResult,
};
use jiff::civil::Date;
use serde::{Deserialize, Serialize, de::IgnoredAny};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum BloodType {
    A,
    B,
    AB,
    O,
}

impl Choice for BloodType {
    const ALL: &'static [Self] = &[Self::A, Self::B, Self::AB, Self::O];

    fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::AB => "AB",
            Self::O => "O",
        }
    }
}

/// The API sends the program either embedded or as a plain label.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ProgramLabel {
    Embedded {
        #[serde(alias = "nama")]
        program_studi: String,
    },
    Plain(String),
    Unrecognised(IgnoredAny),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Student {
    #[serde(deserialize_with = "lenient::id")]
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient::string")]
    pub nim: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub nama: String,
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub program_studi_id: Option<RecordId>,
    #[serde(default)]
    pub program_studi: Option<ProgramLabel>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub nomor_hp: String,
    #[serde(default)]
    pub jenis_kelamin: Sex,
    #[serde(default, deserialize_with = "lenient::string")]
    pub tempat_lahir: String,
    #[serde(default, deserialize_with = "lenient::opt_date")]
    pub tanggal_lahir: Option<Date>,
    #[serde(default, deserialize_with = "lenient::opt_choice")]
    pub golongan_darah: Option<BloodType>,
}

impl Student {
    pub fn program_label(&self) -> &str {
        match &self.program_studi {
            Some(ProgramLabel::Embedded { program_studi } | ProgramLabel::Plain(program_studi))
                if !program_studi.trim().is_empty() =>
            {
                program_studi
            }
            _ => "-",
        }
    }
}

impl DataType for Student {
    const PATH: &'static str = "mahasiswa";
}

impl EditableDataType for Student {
    type FormForAdding = StudentPayload;
}

/// What gets sent on create/update.
#[derive(Debug, Serialize)]
pub struct StudentPayload {
    pub nim: String,
    pub nama: String,
    pub program_studi_id: Option<RecordId>,
    pub email: String,
    pub nomor_hp: String,
    pub jenis_kelamin: Sex,
    pub tempat_lahir: String,
    pub tanggal_lahir: Option<Date>,
    pub golongan_darah: Option<BloodType>,
}

/// Field values exactly as the browser submitted them.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StudentForm {
    pub nim: String,
    pub nama: String,
    pub program_studi_id: String,
    pub email: String,
    pub nomor_hp: String,
    pub jenis_kelamin: String,
    pub tempat_lahir: String,
    pub tanggal_lahir: String,
    pub golongan_darah: String,
}

impl Default for StudentForm {
    fn default() -> Self {
        Self {
            nim: String::new(),
            nama: String::new(),
            program_studi_id: String::new(),
            email: String::new(),
            nomor_hp: String::new(),
            jenis_kelamin: Sex::Male.form_value().to_string(),
            tempat_lahir: String::new(),
            tanggal_lahir: String::new(),
            golongan_darah: String::new(),
        }
    }
}

impl From<&Student> for StudentForm {
    fn from(student: &Student) -> Self {
        Self {
            nim: student.nim.clone(),
            nama: student.nama.clone(),
            program_studi_id: student
                .program_studi_id
                .map(|id| id.to_string())
                .unwrap_or_default(),
            email: student.email.clone(),
            nomor_hp: student.nomor_hp.clone(),
            jenis_kelamin: student.jenis_kelamin.form_value().to_string(),
            tempat_lahir: student.tempat_lahir.clone(),
            tanggal_lahir: date_form_value(student.tanggal_lahir),
            golongan_darah: student
                .golongan_darah
                .map(|blood| blood.as_str().to_string())
                .unwrap_or_default(),
        }
    }
}

impl StudentForm {
    pub fn to_payload(&self) -> KampusResult<StudentPayload> {
        Ok(StudentPayload {
            nim: self.nim.trim().to_string(),
            nama: self.nama.trim().to_string(),
            program_studi_id: parse_optional_id(&self.program_studi_id, "program_studi_id")?,
            email: self.email.trim().to_string(),
            nomor_hp: self.nomor_hp.trim().to_string(),
            jenis_kelamin: parse_sex(&self.jenis_kelamin)?,
            tempat_lahir: self.tempat_lahir.trim().to_string(),
            tanggal_lahir: parse_optional_date(&self.tanggal_lahir, "tanggal_lahir")?,
            golongan_darah: non_empty(&self.golongan_darah)
                .map(|raw| parse_choice(&raw, "golongan_darah"))
                .transpose()?,
        })
    }
}
