use crate::{error::KampusResult, state::KampusState};
use axum::{extract::State, response::IntoResponse};
use maud::html;

pub async fn get_index_route(State(state): State<KampusState>) -> KampusResult<impl IntoResponse> {
    Ok(state.render(None, html! {
        div class="bg-gray-800 p-8 rounded shadow-md max-w-md w-full" {
            h1 class="text-3xl font-semibold mb-2 text-center" {
                "🎓 Kampus App"
            }
            p class="text-gray-400 mb-6 text-center" {
                "Sistem Informasi Akademik Terpadu"
            }

            div class="flex flex-row justify-center" {
                a href="/login" class="bg-blue-600 hover:bg-blue-800 font-bold py-2 px-4 rounded" {
                    "Masuk ke Dashboard"
                }
            }
        }
    }))
}
