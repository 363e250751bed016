use dioxus::prelude::*;

use omni_core::model::CatalogEntry;

use crate::vm::{CategoryStat, QuizResult, category_breakdown};

/// Result screen: verdict, score, and per-category accuracy.
#[component]
pub fn ResultView(
    entry: CatalogEntry,
    outcome: QuizResult,
    on_retry: EventHandler<()>,
    on_exit: EventHandler<()>,
) -> Element {
    let percentage = outcome.percentage();
    let is_passed = outcome.is_passed(entry.pass_line);
    let score_class = if is_passed {
        "result-score text-correct"
    } else {
        "result-score text-wrong"
    };
    let verdict = if is_passed { "Passed!" } else { "Try again!" };
    let summary = format!("Accuracy: {percentage}% (pass line: {}%)", entry.pass_line);
    let stats = category_breakdown(&outcome.records);

    rsx! {
        div { class: "card",
            h2 { "Results" }

            div { class: score_class, "{outcome.score} / {outcome.total}" }
            p { class: "result-summary",
                "{summary}"
                span { class: "result-verdict", "{verdict}" }
            }

            div { class: "category-breakdown",
                h3 { class: "text-muted", "Accuracy by category" }
                for stat in stats {
                    CategoryBar { stat, pass_line: entry.pass_line }
                }
            }

            div { class: "result-actions",
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    onclick: move |_| on_retry.call(()),
                    "Once more"
                }
                button {
                    class: "btn",
                    r#type: "button",
                    onclick: move |_| on_exit.call(()),
                    "Back to set selection"
                }
            }
        }
    }
}

#[component]
fn CategoryBar(stat: CategoryStat, pass_line: u32) -> Element {
    let fill_class = if stat.percentage >= pass_line {
        "category-bar-fill pass"
    } else {
        "category-bar-fill fail"
    };
    let label = format!("{}% ({}/{})", stat.percentage, stat.correct, stat.answered);
    rsx! {
        div { class: "category-row",
            div { class: "category-row-labels",
                span { "{stat.name}" }
                span { "{label}" }
            }
            div { class: "category-bar",
                div { class: fill_class, style: "width: {stat.percentage}%" }
            }
        }
    }
}
