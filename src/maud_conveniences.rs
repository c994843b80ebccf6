use email_address::EmailAddress;
use maud::{Markup, Render, html};

const INPUT_CLASS: &str = "shadow appearance-none border rounded w-full py-2 px-3 leading-tight focus:outline-none focus:shadow-outline bg-gray-700 border-gray-600";

/// One table row; `id` becomes the `<tr>` id so a row can be swapped out alone.
pub struct TableRow<const N: usize> {
    pub id: String,
    pub cells: [Markup; N],
}

pub fn render_table<const N: usize>(titles: [&'static str; N], rows: Vec<TableRow<N>>) -> Markup {
    html! {
        div class="overflow-x-auto" {
            table class="min-w-full bg-gray-800 rounded shadow-md" {
                thead class="bg-gray-700" {
                    tr {
                        @for title in titles {
                            th class="py-2 px-4 text-left font-semibold text-gray-300" {(title)}
                        }
                    }
                }
                tbody {
                    @for row in rows {
                        tr id=(row.id) {
                            @for col in row.cells {
                                td class="py-2 px-4 border-b border-gray-600 text-gray-200" {(col)}
                            }
                        }
                    }
                }
            }
        }
    }
}

pub fn title(s: impl Render) -> Markup {
    html! {
        h1 class="text-2xl font-semibold mb-4" {(s)}
    }
}

pub fn subtitle(s: impl Render) -> Markup {
    html! {
        p class="text-sm text-gray-400 mb-4" {(s)}
    }
}

pub fn alert(desc: impl Render) -> Markup {
    html! {
        div class="bg-red-100 border border-red-400 text-red-700 px-4 py-3 rounded relative mb-4" role="alert" {
            strong class="font-bold" {"Gagal: "}
            span {(desc)}
        }
    }
}

pub fn notice(desc: impl Render) -> Markup {
    html! {
        div class="bg-green-100 border border-green-400 text-green-800 px-4 py-3 rounded relative mb-4" role="status" {
            span {(desc)}
        }
    }
}

pub fn form_element(id: &str, label: &str, element: Markup) -> Markup {
    html! {
        div class="mb-4" {
            label for=(id) class="block text-sm font-bold mb-2 text-gray-300" {(label)}
            (element)
        }
    }
}

pub fn simple_form_element(
    id: &str,
    label: &str,
    required: bool,
    ty: Option<&str>,
    value: Option<&str>,
) -> Markup {
    form_element(
        id,
        label,
        html! {
            input required[required] type=(ty.unwrap_or("text")) id=(id) name=(id) value=[value] class=(INPUT_CLASS) {}
        },
    )
}

pub fn limited_form_element(
    id: &str,
    label: &str,
    required: bool,
    max_length: usize,
    value: &str,
) -> Markup {
    form_element(
        id,
        label,
        html! {
            input required[required] type="text" id=(id) name=(id) maxlength=(max_length) value=(value) class=(INPUT_CLASS) {}
        },
    )
}

/// `placeholder` adds an empty first option, for optional references.
pub fn select_element(
    id: &str,
    label: &str,
    options: Vec<(String, String)>,
    selected: &str,
    placeholder: Option<&str>,
) -> Markup {
    form_element(
        id,
        label,
        html! {
            select id=(id) name=(id) class=(INPUT_CLASS) {
                @if let Some(placeholder) = placeholder {
                    option value="" {(placeholder)}
                }
                @for (value, text) in options {
                    option value=(value) selected[value == selected] {(text)}
                }
            }
        },
    )
}

pub fn form_submit_button(text: Option<&str>) -> Markup {
    html! {
        div class="flex items-center justify-between" {
            button type="submit" class="bg-blue-500 hover:bg-blue-700 font-bold py-2 px-4 rounded focus:outline-none focus:shadow-outline" {
                (text.unwrap_or("Simpan Data"))
            }
        }
    }
}

/// The hidden `total` rides along with row deletes so the reply can lower it.
pub fn total_card(id: &str, label: &str, count: usize, out_of_band: bool) -> Markup {
    html! {
        div id=(id) hx-swap-oob=[out_of_band.then_some("true")] class="bg-gray-800 p-4 rounded shadow-md mb-4 w-64" {
            p class="text-sm text-gray-400" {(label)}
            p class="text-3xl font-bold" {(count)}
            input type="hidden" name="total" value=(count) {}
        }
    }
}

pub fn avatar(name: &str) -> Markup {
    let initial = name
        .chars()
        .next()
        .map_or_else(|| "U".to_string(), |c| c.to_uppercase().to_string());

    html! {
        div class="w-8 h-8 rounded-full bg-blue-600 flex items-center justify-center font-bold" {(initial)}
    }
}

pub struct Email<'a>(pub &'a str);

impl Render for Email<'_> {
    fn render(&self) -> Markup {
        html! {
            @if EmailAddress::is_valid(self.0) {
                a href={"mailto:" (self.0)} class="text-blue-400" {(self.0)}
            } @else {
                span class="text-gray-400" {(self.0)}
            }
        }
    }
}
