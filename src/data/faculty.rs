use crate::{
    data::{
        Choice, DataType, EditableDataType, RecordId, Sex, date_form_value, lenient, non_empty,
        parse_choice, parse_optional_date, parse_optional_id, parse_sex,
    },
    error::KampusResult,
};
use jiff::civil::Date;
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize)]
pub enum FunctionalRank {
    #[default]
    #[serde(rename = "tenaga pengajar")]
    TenagaPengajar,
    #[serde(rename = "asisten ahli")]
    AsistenAhli,
    #[serde(rename = "lektor")]
    Lektor,
    #[serde(rename = "lektor kepala")]
    LektorKepala,
    #[serde(rename = "guru besar")]
    GuruBesar,
}

impl Choice for FunctionalRank {
    const ALL: &'static [Self] = &[
        Self::TenagaPengajar,
        Self::AsistenAhli,
        Self::Lektor,
        Self::LektorKepala,
        Self::GuruBesar,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::TenagaPengajar => "tenaga pengajar",
            Self::AsistenAhli => "asisten ahli",
            Self::Lektor => "lektor",
            Self::LektorKepala => "lektor kepala",
            Self::GuruBesar => "guru besar",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize)]
pub enum EmploymentStatus {
    #[default]
    #[serde(rename = "aktif")]
    Aktif,
    #[serde(rename = "cuti")]
    Cuti,
    #[serde(rename = "ijin belajar")]
    IjinBelajar,
    #[serde(rename = "tugas di instansi lain")]
    TugasDiInstansiLain,
    #[serde(rename = "tugas belajar")]
    TugasBelajar,
}

impl Choice for EmploymentStatus {
    const ALL: &'static [Self] = &[
        Self::Aktif,
        Self::Cuti,
        Self::IjinBelajar,
        Self::TugasDiInstansiLain,
        Self::TugasBelajar,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::Aktif => "aktif",
            Self::Cuti => "cuti",
            Self::IjinBelajar => "ijin belajar",
            Self::TugasDiInstansiLain => "tugas di instansi lain",
            Self::TugasBelajar => "tugas belajar",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Faculty {
    #[serde(deserialize_with = "lenient::id")]
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient::string")]
    pub nama_lengkap: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub nidn: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub nip: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_date")]
    pub tmt: Option<Date>,
    #[serde(default)]
    pub jenis_kelamin: Sex,
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub program_studi_id: Option<RecordId>,
    #[serde(default, deserialize_with = "lenient::choice_or_default")]
    pub jabatan_fungsional: FunctionalRank,
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub kelompok_keahlian_id: Option<RecordId>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub bidang_keilmuan: Option<String>,
    #[serde(default, deserialize_with = "lenient::choice_or_default")]
    pub status: EmploymentStatus,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub foto: Option<String>,
}

impl Faculty {
    ///NIDN if there is one, otherwise NIP
    pub fn personnel_number(&self) -> &str {
        self.nidn
            .as_deref()
            .or(self.nip.as_deref())
            .unwrap_or("-")
    }
}

impl DataType for Faculty {
    const PATH: &'static str = "dosens";
}

impl EditableDataType for Faculty {
    type FormForAdding = FacultyPayload;
}

#[derive(Debug, Serialize)]
pub struct FacultyPayload {
    pub nama_lengkap: String,
    pub nidn: Option<String>,
    pub nip: Option<String>,
    pub tmt: Option<Date>,
    pub jenis_kelamin: Sex,
    pub program_studi_id: Option<RecordId>,
    pub jabatan_fungsional: FunctionalRank,
    pub kelompok_keahlian_id: Option<RecordId>,
    pub bidang_keilmuan: Option<String>,
    pub status: EmploymentStatus,
}

#[derive(Debug, Clone)]
pub struct FacultyForm {
    pub nama_lengkap: String,
    pub nidn: String,
    pub nip: String,
    pub tmt: String,
    pub jenis_kelamin: String,
    pub program_studi_id: String,
    pub jabatan_fungsional: String,
    pub kelompok_keahlian_id: String,
    pub bidang_keilmuan: String,
    pub status: String,
}

impl Default for FacultyForm {
    fn default() -> Self {
        Self {
            nama_lengkap: String::new(),
            nidn: String::new(),
            nip: String::new(),
            tmt: String::new(),
            jenis_kelamin: Sex::Male.form_value().to_string(),
            program_studi_id: String::new(),
            jabatan_fungsional: FunctionalRank::default().as_str().to_string(),
            kelompok_keahlian_id: String::new(),
            bidang_keilmuan: String::new(),
            status: EmploymentStatus::default().as_str().to_string(),
        }
    }
}

impl From<&Faculty> for FacultyForm {
    fn from(faculty: &Faculty) -> Self {
        let id_value = |id: Option<RecordId>| id.map(|id| id.to_string()).unwrap_or_default();

        Self {
            nama_lengkap: faculty.nama_lengkap.clone(),
            nidn: faculty.nidn.clone().unwrap_or_default(),
            nip: faculty.nip.clone().unwrap_or_default(),
            tmt: date_form_value(faculty.tmt),
            jenis_kelamin: faculty.jenis_kelamin.form_value().to_string(),
            program_studi_id: id_value(faculty.program_studi_id),
            jabatan_fungsional: faculty.jabatan_fungsional.as_str().to_string(),
            kelompok_keahlian_id: id_value(faculty.kelompok_keahlian_id),
            bidang_keilmuan: faculty.bidang_keilmuan.clone().unwrap_or_default(),
            status: faculty.status.as_str().to_string(),
        }
    }
}

impl FacultyForm {
    /// Applies one submitted field; unknown names are ignored.
    pub fn set(&mut self, name: &str, value: String) {
        let slot = match name {
            "nama_lengkap" => &mut self.nama_lengkap,
            "nidn" => &mut self.nidn,
            "nip" => &mut self.nip,
            "tmt" => &mut self.tmt,
            "jenis_kelamin" => &mut self.jenis_kelamin,
            "program_studi_id" => &mut self.program_studi_id,
            "jabatan_fungsional" => &mut self.jabatan_fungsional,
            "kelompok_keahlian_id" => &mut self.kelompok_keahlian_id,
            "bidang_keilmuan" => &mut self.bidang_keilmuan,
            "status" => &mut self.status,
            _ => {
                debug!(?name, "ignoring unknown faculty form field");
                return;
            }
        };
        *slot = value;
    }

    pub fn to_payload(&self) -> KampusResult<FacultyPayload> {
        Ok(FacultyPayload {
            nama_lengkap: self.nama_lengkap.trim().to_string(),
            nidn: non_empty(&self.nidn),
            nip: non_empty(&self.nip),
            tmt: parse_optional_date(&self.tmt, "tmt")?,
            jenis_kelamin: parse_sex(&self.jenis_kelamin)?,
            program_studi_id: parse_optional_id(&self.program_studi_id, "program_studi_id")?,
            jabatan_fungsional: parse_choice(&self.jabatan_fungsional, "jabatan_fungsional")?,
            kelompok_keahlian_id: parse_optional_id(
                &self.kelompok_keahlian_id,
                "kelompok_keahlian_id",
            )?,
            bidang_keilmuan: non_empty(&self.bidang_keilmuan),
            status: parse_choice(&self.status, "status")?,
        })
    }
}
