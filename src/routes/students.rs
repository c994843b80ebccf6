use crate::{
    auth::guard::ActiveSession,
    data::{
        Choice, RecordId, Sex,
        lookup::{Lookup, ProgramStudy},
        student::{BloodType, Student, StudentForm},
    },
    error::{KampusError, KampusResult},
    maud_conveniences::{
        Email, TableRow, alert, avatar, form_submit_button, limited_form_element, notice, render_table,
        select_element, simple_form_element, subtitle, title, total_card,
    },
    routes::{
        DeleteOptions, LOAD_FAILED, Tab, delete_failed, editor_page, failure_status,
        load_failed_page, row_deleted, tabs, within_view, worth_refetching,
    },
    state::KampusState,
};
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use futures::future::try_join;
use maud::{Markup, html};
use secrecy::SecretString;

const CREATED: &str = "✨ Berhasil menambah mahasiswa!";
const UPDATED: &str = "✅ Data berhasil diperbarui!";
const TOTAL_CARD: &str = "student-total";
const TOTAL_LABEL: &str = "Total Mahasiswa";

pub async fn get_students(
    State(state): State<KampusState>,
    session: ActiveSession,
) -> KampusResult<Markup> {
    let flash = session.take_flash().await?;

    Ok(state.render(Some(&session), html! {
        div class="w-full flex flex-col space-y-4" {
            div class="flex flex-row items-center justify-between" {
                div {
                    (title("Data Mahasiswa"))
                    (subtitle("Kelola data akademik mahasiswa aktif."))
                }
                a href="/dashboard/create" class="bg-blue-600 hover:bg-blue-800 font-bold py-2 px-4 rounded" {
                    "+ Tambah Mahasiswa"
                }
            }
            div id="flash" {
                @if let Some(flash) = flash {
                    (notice(flash))
                }
            }
            (tabs(Tab::Students))
            div id="all_students" hx-get="/internal/students" hx-trigger="load" {
                p class="text-gray-400" {"Memuat data..."}
            }
        }
    }))
}

pub async fn internal_get_students(
    State(state): State<KampusState>,
    session: ActiveSession,
) -> KampusResult<Markup> {
    let students = match within_view(state.list::<Student>(session.token()).await)? {
        Ok(students) => students,
        Err(e) => {
            warn!(?e, "unable to list students");
            return Ok(alert(LOAD_FAILED));
        }
    };

    let count = students.len();
    let rows = students
        .iter()
        .map(|student| TableRow {
            id: format!("student-{}", student.id),
            cells: [
                html! {
                    div class="flex flex-row items-center space-x-2" {
                        (avatar(&student.nama))
                        div {
                            p class="font-semibold" {(student.nama)}
                            p class="text-xs text-gray-400" {(student.jenis_kelamin.label())}
                        }
                    }
                },
                html! { span class="font-mono" {(student.nim)} },
                html! { (student.program_label()) },
                html! {
                    div class="flex flex-col" {
                        (Email(&student.email))
                        span class="text-xs text-gray-400" {(student.nomor_hp)}
                    }
                },
                html! {
                    div class="flex flex-row space-x-2" {
                        a href=(format!("/dashboard/edit/{}", student.id)) class="bg-yellow-600 hover:bg-yellow-800 font-bold py-1 px-3 rounded" {"Edit"}
                        button class="bg-red-600 hover:bg-red-800 font-bold py-1 px-3 rounded" hx-delete=(format!("/dashboard/delete/{}", student.id)) hx-confirm="Hapus data mahasiswa ini secara permanen?" hx-target="closest tr" hx-swap="outerHTML" hx-include={"#" (TOTAL_CARD)} {"Hapus"}
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
            (render_table(["Mahasiswa", "NIM", "Program Studi", "Kontak", "Aksi"], rows))
        }
    })
}

async fn redraw_programs(
    state: &KampusState,
    token: &SecretString,
    e: &KampusError,
) -> Vec<ProgramStudy> {
    if worth_refetching(e) {
        state.list::<ProgramStudy>(token).await.unwrap_or_default()
    } else {
        Vec::new()
    }
}

fn student_form(action: &str, form: &StudentForm, programs: &[ProgramStudy]) -> Markup {
    html! {
        form method="post" action=(action) class="p-4 bg-gray-800 rounded shadow-md w-full" {
            div class="grid grid-cols-1 md:grid-cols-2 gap-x-6" {
                div {
                    (limited_form_element("nim", "NIM", true, 13, &form.nim))
                    (simple_form_element("nama", "Nama Lengkap", true, None, Some(&form.nama)))
                    (select_element("program_studi_id", "Program Studi", ProgramStudy::options(programs), &form.program_studi_id, Some("- Pilih Program Studi -")))
                    (select_element("jenis_kelamin", "Jenis Kelamin", Sex::options(), &form.jenis_kelamin, None))
                    (select_element("golongan_darah", "Golongan Darah", BloodType::options(), &form.golongan_darah, Some("- Pilih -")))
                }
                div {
                    (simple_form_element("email", "Email", true, Some("email"), Some(&form.email)))
                    (simple_form_element("nomor_hp", "Nomor HP", false, Some("tel"), Some(&form.nomor_hp)))
                    (simple_form_element("tempat_lahir", "Tempat Lahir", false, None, Some(&form.tempat_lahir)))
                    (simple_form_element("tanggal_lahir", "Tanggal Lahir", false, Some("date"), Some(&form.tanggal_lahir)))
                }
            }
            (form_submit_button(Some("💾 Simpan Data")))
        }
    }
}

pub async fn get_create_student(
    State(state): State<KampusState>,
    session: ActiveSession,
) -> KampusResult<Response> {
    let programs = match within_view(state.list::<ProgramStudy>(session.token()).await)? {
        Ok(programs) => programs,
        Err(e) => {
            return Ok(load_failed_page(&state, &session, "/dashboard", "Tambah Mahasiswa", &e));
        }
    };

    let body = student_form("/dashboard/create", &StudentForm::default(), &programs);
    Ok(editor_page(&state, &session, "/dashboard", "Tambah Mahasiswa", None, body).into_response())
}

pub async fn post_create_student(
    State(state): State<KampusState>,
    session: ActiveSession,
    Form(form): Form<StudentForm>,
) -> KampusResult<Response> {
    let result = match form.to_payload() {
        Ok(payload) => {
            state
                .create::<Student>(session.token(), &payload, None)
                .await
        }
        Err(e) => Err(e),
    };

    match within_view(result)? {
        Ok(()) => {
            info!(nim = %form.nim, "created student");
            session.flash(CREATED).await?;
            Ok(Redirect::to("/dashboard").into_response())
        }
        Err(e) => {
            warn!(?e, "unable to create student");
            let programs = redraw_programs(&state, session.token(), &e).await;
            let body = student_form("/dashboard/create", &form, &programs);
            let message = e.user_message();
            Ok((
                failure_status(&e),
                editor_page(&state, &session, "/dashboard", "Tambah Mahasiswa", Some(&message), body),
            )
                .into_response())
        }
    }
}

pub async fn get_edit_student(
    State(state): State<KampusState>,
    session: ActiveSession,
    Path(id): Path<RecordId>,
) -> KampusResult<Response> {
    let loaded = try_join(
        state.list::<ProgramStudy>(session.token()),
        state.fetch::<Student>(session.token(), id),
    )
    .await;

    let (programs, student) = match within_view(loaded)? {
        Ok(loaded) => loaded,
        Err(e) => {
            return Ok(load_failed_page(&state, &session, "/dashboard", "Edit Mahasiswa", &e));
        }
    };

    let body = student_form(
        &format!("/dashboard/edit/{id}"),
        &StudentForm::from(&student),
        &programs,
    );
    Ok(editor_page(&state, &session, "/dashboard", "Edit Mahasiswa", None, body).into_response())
}

pub async fn post_edit_student(
    State(state): State<KampusState>,
    session: ActiveSession,
    Path(id): Path<RecordId>,
    Form(form): Form<StudentForm>,
) -> KampusResult<Response> {
    let result = match form.to_payload() {
        Ok(payload) => {
            state
                .update::<Student>(session.token(), id, &payload, None)
                .await
        }
        Err(e) => Err(e),
    };

    match within_view(result)? {
        Ok(()) => {
            info!(id, "updated student");
            session.flash(UPDATED).await?;
            Ok(Redirect::to("/dashboard").into_response())
        }
        Err(e) => {
            warn!(?e, id, "unable to update student");
            let programs = redraw_programs(&state, session.token(), &e).await;
            let body = student_form(&format!("/dashboard/edit/{id}"), &form, &programs);
            let message = e.user_message();
            Ok((
                failure_status(&e),
                editor_page(&state, &session, "/dashboard", "Edit Mahasiswa", Some(&message), body),
            )
                .into_response())
        }
    }
}

/// The reply has nothing for the row itself, which htmx swaps away.
pub async fn delete_student(
    State(state): State<KampusState>,
    session: ActiveSession,
    Path(id): Path<RecordId>,
    Query(DeleteOptions { total }): Query<DeleteOptions>,
) -> KampusResult<Response> {
    match within_view(state.delete::<Student>(session.token(), id).await)? {
        Ok(()) => {
            info!(id, "deleted student");
            Ok(row_deleted(TOTAL_CARD, TOTAL_LABEL, total).into_response())
        }
        Err(e) => {
            warn!(?e, id, "unable to delete student");
            Ok(delete_failed(&e))
        }
    }
}
