use std::sync::Arc;

use dioxus::prelude::*;

use omni_core::model::{CatalogEntry, QuestionSet, SessionMode};

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{AttemptVm, map_attempts, map_categories};

/// Pre-quiz screen for one set: exam parameters, category practice grid,
/// and the recent attempt history.
#[component]
pub fn HomeView(
    entry: CatalogEntry,
    set: Arc<QuestionSet>,
    on_start: EventHandler<SessionMode>,
    on_back: EventHandler<()>,
) -> Element {
    let ctx = use_context::<AppContext>();
    let workflow = ctx.session_workflow();

    let entry_for_resource = entry.clone();
    let resource = use_resource(move || {
        let workflow = workflow.clone();
        let entry = entry_for_resource.clone();
        async move {
            let attempts = workflow
                .attempts_for(&entry)
                .await
                .map_err(|_| ViewError::Unknown)?;
            Ok(map_attempts(&attempts))
        }
    });
    let history_state = view_state_from_resource(resource);

    let categories = map_categories(&set);
    let category_cards = categories.into_iter().map(|category| {
        let name = category.name.clone();
        rsx! {
            div {
                class: "category-card",
                onclick: move |_| on_start.call(SessionMode::Category(name.clone())),
                h3 { "{category.name}" }
                span { class: "category-count", "{category.count} questions" }
            }
        }
    });
    let exam_hint = format!("{} questions in exam format.", entry.total_questions);
    let time_badge = format!("Time: {} min", entry.time_limit);
    let pass_badge = format!("Pass: {}%", entry.pass_line);

    rsx! {
        div { class: "card",
            div { class: "home-back",
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    onclick: move |_| on_back.call(()),
                    "< Back"
                }
            }

            h1 { "{entry.title}" }
            p { class: "text-muted home-description", "{entry.description}" }

            div { class: "home-grid",
                div {
                    div { class: "mode-section",
                        h2 { "Mock exam" }
                        p { class: "text-muted", "{exam_hint}" }
                        div { class: "stat-badges",
                            div { class: "stat-badge", "{time_badge}" }
                            div { class: "stat-badge", "{pass_badge}" }
                        }
                        button {
                            class: "btn",
                            r#type: "button",
                            onclick: move |_| on_start.call(SessionMode::Full),
                            "Start exam"
                        }
                    }

                    div { class: "mode-section",
                        h2 { "Practice by category" }
                        div { class: "category-grid",
                            {category_cards}
                        }
                    }
                }

                div { class: "history-section",
                    h2 { "Recent attempts" }
                    match history_state {
                        ViewState::Idle | ViewState::Loading => rsx! {
                            p { class: "text-muted", "Loading..." }
                        },
                        ViewState::Error(err) => rsx! {
                            p { class: "text-muted", "{err.message()}" }
                        },
                        ViewState::Ready(attempts) => rsx! {
                            if attempts.is_empty() {
                                p { class: "text-muted", "No attempts yet." }
                            } else {
                                for attempt in attempts {
                                    AttemptRow { attempt }
                                }
                            }
                        },
                    }
                }
            }
        }
    }
}

#[component]
fn AttemptRow(attempt: AttemptVm) -> Element {
    let badge_class = if attempt.is_passed {
        "history-badge pass-badge"
    } else {
        "history-badge fail-badge"
    };
    let verdict = if attempt.is_passed { "PASS" } else { "FAIL" };
    rsx! {
        div { class: "history-item",
            div {
                div { class: "history-score", "{attempt.score_label}" }
                div { class: "history-date text-muted", "{attempt.date_label}" }
            }
            span { class: badge_class, "{verdict}" }
        }
    }
}
