use dioxus::prelude::*;

use omni_core::model::CatalogEntry;

/// Catalog screen: pick the question set to study.
#[component]
pub fn SelectionView(
    entries: Vec<CatalogEntry>,
    loading: bool,
    on_select: EventHandler<CatalogEntry>,
) -> Element {
    rsx! {
        div { class: "card",
            h1 { "Choose a question set" }
            p { class: "text-muted", "Pick the set you want to study." }

            if loading {
                p { class: "text-muted", "Loading..." }
            } else if entries.is_empty() {
                p { class: "text-muted", "No question sets found." }
            } else {
                div { class: "category-grid",
                    for entry in entries {
                        SetCard { entry: entry.clone(), on_select }
                    }
                }
            }
        }
    }
}

#[component]
fn SetCard(entry: CatalogEntry, on_select: EventHandler<CatalogEntry>) -> Element {
    let summary = format!(
        "{} questions · {} min · pass {}%",
        entry.total_questions, entry.time_limit, entry.pass_line
    );
    let entry_for_click = entry.clone();
    rsx! {
        div {
            class: "category-card",
            onclick: move |_| on_select.call(entry_for_click.clone()),
            h3 { "{entry.title}" }
            p { class: "set-card-description", "{entry.description}" }
            span { class: "set-card-stats", "{summary}" }
        }
    }
}
