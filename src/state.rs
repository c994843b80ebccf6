use crate::{
    api::ApiClient,
    auth::guard::ActiveSession,
    config::RuntimeConfiguration,
    error::KampusResult,
    maud_conveniences::avatar,
};
use maud::{DOCTYPE, Markup, html};
use std::ops::Deref;

#[derive(Clone, Debug)]
pub struct KampusState {
    api: ApiClient,
    config: RuntimeConfiguration,
}

impl KampusState {
    pub fn new(config: RuntimeConfiguration) -> KampusResult<Self> {
        let api = ApiClient::new(config.api_config())?;
        Ok(Self { api, config })
    }

    pub const fn config(&self) -> &RuntimeConfiguration {
        &self.config
    }

    #[allow(clippy::unused_self)] //in case self is ever needed :)
    pub fn render(&self, session: Option<&ActiveSession>, markup: Markup) -> Markup {
        html! {
            (DOCTYPE)
            html lang="id" {
                head {
                    meta charset="UTF-8" {}
                    meta name="viewport" content="width=device-width, initial-scale=1.0" {}
                    script src="https://unpkg.com/htmx.org@2.0.4" integrity="sha384-HGfztofotfshcF7+8n44JQL2oJmowVChPTg48S+jvZoztPfvwD79OC/LTtG6dMp+" crossorigin="anonymous" {}
                    script src="https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4" {}
                    title { "Kampus App" }
                }
                body class="bg-gray-900 min-h-screen flex flex-col items-center text-white" {
                    @if let Some(session) = session {
                        (render_nav(session))
                    }
                    main class="w-full max-w-5xl flex flex-col items-center justify-center p-4 grow" {
                        (markup)
                    }
                }
            }
        }
    }
}

fn render_nav(session: &ActiveSession) -> Markup {
    let name = session.display_name();

    html! {
        nav class="w-full bg-gray-800 shadow-md mb-6" {
            div class="max-w-5xl mx-auto flex flex-row items-center justify-between p-4" {
                a href="/dashboard" class="font-bold text-lg" {"🎓 Kampus App"}
                div class="flex flex-row items-center space-x-4" {
                    (avatar(name))
                    span class="text-gray-300" {(name)}
                    button class="bg-gray-700 hover:bg-gray-600 font-bold py-2 px-4 rounded" hx-post="/logout" hx-confirm="Yakin ingin keluar dari sistem?" {
                        "Keluar"
                    }
                }
            }
        }
    }
}

impl Deref for KampusState {
    type Target = ApiClient;

    fn deref(&self) -> &Self::Target {
        &self.api
    }
}
