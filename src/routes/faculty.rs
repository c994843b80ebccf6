use crate::{
    auth::guard::ActiveSession,
    data::{
        Choice, RecordId, Sex,
        faculty::{EmploymentStatus, Faculty, FacultyForm, FunctionalRank},
        lookup::{DepartmentGroup, Lookup, ProgramStudy},
        photo::Attachment,
    },
    error::{KampusError, KampusResult, MultipartSnafu},
    maud_conveniences::{
        TableRow, alert, avatar, form_element, form_submit_button, limited_form_element, notice,
        render_table, select_element, simple_form_element, subtitle, title, total_card,
    },
    routes::{
        DeleteOptions, LOAD_FAILED, Tab, delete_failed, editor_page, failure_status,
        load_failed_page, row_deleted, tabs, within_view, worth_refetching,
    },
    state::KampusState,
};
use axum::{
    extract::{Multipart, Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use futures::future::{join, try_join, try_join3};
use maud::{Markup, html};
use secrecy::SecretString;
use snafu::ResultExt;

const CREATED: &str = "✨ Berhasil menambah dosen baru!";
const UPDATED: &str = "✅ Data Dosen berhasil diperbarui!";
const TOTAL_CARD: &str = "faculty-total";
const TOTAL_LABEL: &str = "Total Dosen";

#[derive(Default)]
struct Lookups {
    programs: Vec<ProgramStudy>,
    groups: Vec<DepartmentGroup>,
}

impl Lookups {
    async fn fetch(state: &KampusState, token: &SecretString) -> KampusResult<Self> {
        let (programs, groups) = try_join(
            state.list::<ProgramStudy>(token),
            state.list::<DepartmentGroup>(token),
        )
        .await?;
        Ok(Self { programs, groups })
    }

    /// For redrawing a rejected form; a failure here only empties the selects.
    async fn for_redraw(state: &KampusState, token: &SecretString, e: &KampusError) -> Self {
        if worth_refetching(e) {
            Self::fetch(state, token).await.unwrap_or_default()
        } else {
            Self::default()
        }
    }
}

pub async fn get_faculty(
    State(state): State<KampusState>,
    session: ActiveSession,
) -> KampusResult<Markup> {
    let flash = session.take_flash().await?;

    Ok(state.render(Some(&session), html! {
        div class="w-full flex flex-col space-y-4" {
            div class="flex flex-row items-center justify-between" {
                div {
                    (title("Data Dosen"))
                    (subtitle("Kelola data dosen pengajar dan kepegawaian."))
                }
                a href="/dashboard/dosen/create" class="bg-blue-600 hover:bg-blue-800 font-bold py-2 px-4 rounded" {
                    "+ Tambah Dosen"
                }
            }
            div id="flash" {
                @if let Some(flash) = flash {
                    (notice(flash))
                }
            }
            (tabs(Tab::Faculty))
            div id="all_faculty" hx-get="/internal/faculty" hx-trigger="load" {
                p class="text-gray-400" {"Memuat data..."}
            }
        }
    }))
}

fn status_badge(status: EmploymentStatus) -> Markup {
    let class = if status == EmploymentStatus::Aktif {
        "bg-green-700 text-green-100"
    } else {
        "bg-yellow-700 text-yellow-100"
    };

    html! {
        span class={"text-xs font-bold py-1 px-2 rounded " (class)} {(status.as_str().to_uppercase())}
    }
}

fn portrait(faculty: &Faculty) -> Markup {
    html! {
        @if let Some(foto) = &faculty.foto {
            img src=(foto) alt=(faculty.nama_lengkap) class="w-8 h-8 rounded-full object-cover" {}
        } @else {
            (avatar(&faculty.nama_lengkap))
        }
    }
}

pub async fn internal_get_faculty(
    State(state): State<KampusState>,
    session: ActiveSession,
) -> KampusResult<Markup> {
    let loaded = try_join(
        state.list::<Faculty>(session.token()),
        state.list::<ProgramStudy>(session.token()),
    )
    .await;

    let (faculty, programs) = match within_view(loaded)? {
        Ok(loaded) => loaded,
        Err(e) => {
            warn!(?e, "unable to list faculty");
            return Ok(alert(LOAD_FAILED));
        }
    };

    let count = faculty.len();
    let rows = faculty
        .iter()
        .map(|lecturer| TableRow {
            id: format!("faculty-{}", lecturer.id),
            cells: [
                html! {
                    div class="flex flex-row items-center space-x-2" {
                        (portrait(lecturer))
                        div {
                            p class="font-semibold" {(lecturer.nama_lengkap)}
                            p class="text-xs text-gray-400" {
                                (ProgramStudy::label_for(&programs, lecturer.program_studi_id).unwrap_or("-"))
                            }
                        }
                    }
                },
                html! { span class="font-mono" {(lecturer.personnel_number())} },
                html! { (lecturer.jabatan_fungsional.as_str().to_uppercase()) },
                status_badge(lecturer.status),
                html! {
                    div class="flex flex-row space-x-2" {
                        a href=(format!("/dashboard/dosen/edit/{}", lecturer.id)) class="bg-yellow-600 hover:bg-yellow-800 font-bold py-1 px-3 rounded" {"Edit"}
                        button class="bg-red-600 hover:bg-red-800 font-bold py-1 px-3 rounded" hx-delete=(format!("/dashboard/dosen/delete/{}", lecturer.id)) hx-confirm="Hapus data dosen ini secara permanen?" hx-target="closest tr" hx-swap="outerHTML" hx-include={"#" (TOTAL_CARD)} {"Hapus"}
                    }
                },
            ],
        })
        .collect();

    Ok(html! {
        (total_card(TOTAL_CARD, TOTAL_LABEL, count, false))
        @if count == 0 {
            div class="bg-gray-800 p-8 rounded text-center text-gray-400" {
                p class="text-4xl" {"📂"}
                p {"Belum ada data"}
            }
        } @else {
            (render_table(["Dosen", "NIDN/NIP", "Jabatan", "Status", "Aksi"], rows))
        }
    })
}

fn faculty_form(
    action: &str,
    form: &FacultyForm,
    lookups: &Lookups,
    current_photo: Option<&str>,
) -> Markup {
    html! {
        form method="post" action=(action) enctype="multipart/form-data" class="p-4 bg-gray-800 rounded shadow-md w-full" {
            div class="grid grid-cols-1 md:grid-cols-2 gap-x-6" {
                div {
                    (simple_form_element("nama_lengkap", "Nama Lengkap (dengan gelar)", true, None, Some(&form.nama_lengkap)))
                    (limited_form_element("nidn", "NIDN", false, 10, &form.nidn))
                    (limited_form_element("nip", "NIP", false, 18, &form.nip))
                    (simple_form_element("tmt", "TMT", false, Some("date"), Some(&form.tmt)))
                    (select_element("jenis_kelamin", "Jenis Kelamin", Sex::options(), &form.jenis_kelamin, None))
                }
                div {
                    (select_element("program_studi_id", "Program Studi", ProgramStudy::options(&lookups.programs), &form.program_studi_id, Some("- Pilih Prodi (Opsional) -")))
                    (select_element("kelompok_keahlian_id", "Kelompok Keahlian", DepartmentGroup::options(&lookups.groups), &form.kelompok_keahlian_id, Some("- Pilih Kelompok Keahlian (Opsional) -")))
                    (simple_form_element("bidang_keilmuan", "Bidang Keilmuan", false, None, Some(&form.bidang_keilmuan)))
                    (select_element("jabatan_fungsional", "Jabatan Fungsional", FunctionalRank::options(), &form.jabatan_fungsional, None))
                    (select_element("status", "Status Kepegawaian", EmploymentStatus::options(), &form.status, None))
                }
            }
            (form_element(Attachment::FIELD, "Foto Profil", html! {
                div class="flex flex-row items-center space-x-4" {
                    @if let Some(current_photo) = current_photo {
                        img src=(current_photo) alt="Foto saat ini" class="w-16 h-16 rounded-full object-cover" {}
                    }
                    input type="file" id=(Attachment::FIELD) name=(Attachment::FIELD) accept="image/*" class="text-sm text-gray-300" {}
                }
            }))
            (form_submit_button(Some("💾 Simpan Data Dosen")))
        }
    }
}

/// Reads the text fields into a form and the optional photo; a bad photo is
/// kept as an error so the rest of the form can still be redrawn.
async fn read_submission(
    mut multipart: Multipart,
) -> KampusResult<(FacultyForm, KampusResult<Option<Attachment>>)> {
    let mut form = FacultyForm::default();
    let mut attachment = Ok(None);

    while let Some(field) = multipart.next_field().await.context(MultipartSnafu)? {
        let name = field.name().unwrap_or_default().to_string();

        if name == Attachment::FIELD {
            let file_name = field.file_name().map(ToString::to_string);
            let bytes = field.bytes().await.context(MultipartSnafu)?;
            attachment = Attachment::from_upload(file_name.as_deref(), bytes.to_vec());
        } else {
            let value = field.text().await.context(MultipartSnafu)?;
            form.set(&name, value);
        }
    }

    Ok((form, attachment))
}

async fn submit(
    state: &KampusState,
    token: &SecretString,
    id: Option<RecordId>,
    form: &FacultyForm,
    attachment: KampusResult<Option<Attachment>>,
) -> KampusResult<()> {
    let attachment = attachment?;
    let payload = form.to_payload()?;

    match id {
        None => state.create::<Faculty>(token, &payload, attachment).await,
        Some(id) => state.update::<Faculty>(token, id, &payload, attachment).await,
    }
}

pub async fn get_create_faculty(
    State(state): State<KampusState>,
    session: ActiveSession,
) -> KampusResult<Response> {
    let lookups = match within_view(Lookups::fetch(&state, session.token()).await)? {
        Ok(lookups) => lookups,
        Err(e) => {
            return Ok(load_failed_page(&state, &session, "/dashboard/dosen", "Tambah Dosen", &e));
        }
    };

    let body = faculty_form("/dashboard/dosen/create", &FacultyForm::default(), &lookups, None);
    Ok(editor_page(&state, &session, "/dashboard/dosen", "Tambah Dosen", None, body).into_response())
}

pub async fn post_create_faculty(
    State(state): State<KampusState>,
    session: ActiveSession,
    multipart: Multipart,
) -> KampusResult<Response> {
    let (form, attachment) = read_submission(multipart).await?;

    match within_view(submit(&state, session.token(), None, &form, attachment).await)? {
        Ok(()) => {
            info!(nama = %form.nama_lengkap, "created faculty member");
            session.flash(CREATED).await?;
            Ok(Redirect::to("/dashboard/dosen").into_response())
        }
        Err(e) => {
            warn!(?e, "unable to create faculty member");
            let lookups = Lookups::for_redraw(&state, session.token(), &e).await;
            let body = faculty_form("/dashboard/dosen/create", &form, &lookups, None);
            let message = e.user_message();
            Ok((
                failure_status(&e),
                editor_page(&state, &session, "/dashboard/dosen", "Tambah Dosen", Some(&message), body),
            )
                .into_response())
        }
    }
}

pub async fn get_edit_faculty(
    State(state): State<KampusState>,
    session: ActiveSession,
    Path(id): Path<RecordId>,
) -> KampusResult<Response> {
    let token = session.token();
    let loaded = try_join3(
        state.list::<ProgramStudy>(token),
        state.list::<DepartmentGroup>(token),
        state.fetch::<Faculty>(token, id),
    )
    .await;

    let (programs, groups, lecturer) = match within_view(loaded)? {
        Ok(loaded) => loaded,
        Err(e) => {
            return Ok(load_failed_page(&state, &session, "/dashboard/dosen", "Edit Dosen", &e));
        }
    };

    let body = faculty_form(
        &format!("/dashboard/dosen/edit/{id}"),
        &FacultyForm::from(&lecturer),
        &Lookups { programs, groups },
        lecturer.foto.as_deref(),
    );
    Ok(editor_page(&state, &session, "/dashboard/dosen", "Edit Dosen", None, body).into_response())
}

pub async fn post_edit_faculty(
    State(state): State<KampusState>,
    session: ActiveSession,
    Path(id): Path<RecordId>,
    multipart: Multipart,
) -> KampusResult<Response> {
    let (form, attachment) = read_submission(multipart).await?;

    match within_view(submit(&state, session.token(), Some(id), &form, attachment).await)? {
        Ok(()) => {
            info!(id, "updated faculty member");
            session.flash(UPDATED).await?;
            Ok(Redirect::to("/dashboard/dosen").into_response())
        }
        Err(e) => {
            warn!(?e, id, "unable to update faculty member");
            let token = session.token();
            let (lookups, lecturer) = join(
                Lookups::for_redraw(&state, token, &e),
                async {
                    if worth_refetching(&e) {
                        state.fetch::<Faculty>(token, id).await.ok()
                    } else {
                        None
                    }
                },
            )
            .await;
            let current_photo = lecturer.and_then(|lecturer| lecturer.foto);
            let body = faculty_form(
                &format!("/dashboard/dosen/edit/{id}"),
                &form,
                &lookups,
                current_photo.as_deref(),
            );
            let message = e.user_message();
            Ok((
                failure_status(&e),
                editor_page(&state, &session, "/dashboard/dosen", "Edit Dosen", Some(&message), body),
            )
                .into_response())
        }
    }
}

/// The reply has nothing for the row itself, which htmx swaps away.
pub async fn delete_faculty(
    State(state): State<KampusState>,
    session: ActiveSession,
    Path(id): Path<RecordId>,
    Query(DeleteOptions { total }): Query<DeleteOptions>,
) -> KampusResult<Response> {
    match within_view(state.delete::<Faculty>(session.token(), id).await)? {
        Ok(()) => {
            info!(id, "deleted faculty member");
            Ok(row_deleted(TOTAL_CARD, TOTAL_LABEL, total).into_response())
        }
        Err(e) => {
            warn!(?e, id, "unable to delete faculty member");
            Ok(delete_failed(&e))
        }
    }
}
