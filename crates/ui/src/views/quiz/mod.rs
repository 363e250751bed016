use std::sync::Arc;

use dioxus::prelude::*;

use omni_core::model::{CatalogEntry, QuestionSet, SessionMode, SessionQuestion};
use services::{QuestionPhase, QuizSession, SessionError};

use crate::context::AppContext;
use crate::views::ViewError;
use crate::vm::{QuizIntent, QuizOutcome, QuizResult, QuizVm, format_clock};

mod keyboard;

/// Active quiz screen: question, options, countdown, abort prompt.
///
/// All interaction funnels through one dispatch callback so pointer and
/// keyboard input share the same action set.
#[component]
pub fn QuizView(
    entry: CatalogEntry,
    set: Arc<QuestionSet>,
    mode: SessionMode,
    on_finished: EventHandler<QuizResult>,
    on_aborted: EventHandler<()>,
) -> Element {
    let ctx = use_context::<AppContext>();
    let workflow = ctx.session_workflow();

    let vm = use_signal(|| None::<QuizVm>);
    let error = use_signal(|| None::<ViewError>);
    let mut timer_started = use_signal(|| false);

    // Restore a matching persisted session or build a fresh one.
    let workflow_for_init = workflow.clone();
    let entry_for_init = entry.clone();
    let set_for_init = set.clone();
    let mode_for_init = mode.clone();
    let _init = use_resource(move || {
        let workflow = workflow_for_init.clone();
        let entry = entry_for_init.clone();
        let set = set_for_init.clone();
        let mode = mode_for_init.clone();
        let mut vm = vm;
        let mut error = error;
        async move {
            match workflow.start_or_resume(&entry, &set, mode).await {
                Ok(session) => vm.set(Some(QuizVm::new(session))),
                Err(SessionError::Empty) => error.set(Some(ViewError::EmptySession)),
                Err(_) => error.set(Some(ViewError::Unknown)),
            }
        }
    });

    let workflow_for_dispatch = workflow.clone();
    let entry_for_dispatch = entry.clone();
    let dispatch = use_callback(move |intent: QuizIntent| {
        let workflow = workflow_for_dispatch.clone();
        let entry = entry_for_dispatch.clone();
        let mut vm = vm;
        let mut error = error;
        spawn(async move {
            let Some(mut current) = vm() else {
                return;
            };
            match current.apply(&workflow, &entry, intent).await {
                Ok(QuizOutcome::Continue) => vm.set(Some(current)),
                Ok(QuizOutcome::Finished(result)) => {
                    vm.set(Some(current));
                    on_finished.call(result);
                }
                Ok(QuizOutcome::Aborted) => {
                    vm.set(Some(current));
                    on_aborted.call(());
                }
                Err(err) => error.set(Some(err)),
            }
        });
    });

    // One-second countdown, owned by this view: it starts only once the
    // session is initialized, stops as soon as the session is finished or
    // aborted, and dies with the view on unmount.
    use_effect(move || {
        if vm.read().is_some() && !timer_started() {
            timer_started.set(true);
            spawn(async move {
                loop {
                    tokio::time::sleep(std::time::Duration::from_secs(1)).await;
                    let active = vm
                        .peek()
                        .as_ref()
                        .is_some_and(|v| !v.session().is_finished());
                    if !active {
                        break;
                    }
                    dispatch.call(QuizIntent::Tick);
                }
            });
        }
    });

    let on_key = move |evt: KeyboardEvent| {
        let Some(current) = vm() else {
            return;
        };
        let session = current.session();
        let Some(question) = session.current_question() else {
            return;
        };
        let intent = keyboard::intent_for_key(
            &evt.data.key(),
            session.phase(),
            question.answer.is_multiple(),
            question.options.len(),
            current.abort_prompt_open(),
        );
        if let Some(intent) = intent {
            evt.prevent_default();
            dispatch.call(intent);
        }
    };

    if let Some(err) = error() {
        return rsx! {
            div { class: "card",
                p { "{err.message()}" }
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    onclick: move |_| on_aborted.call(()),
                    "Back"
                }
            }
        };
    }
    let Some(current) = vm() else {
        return rsx! {
            div { class: "card", p { class: "text-muted", "Loading..." } }
        };
    };

    let session = current.session();
    let Some(question) = session.current_question().cloned() else {
        return rsx! {
            div { class: "card", p { class: "text-muted", "Loading..." } }
        };
    };

    let revealed = session.phase() == QuestionPhase::Revealed;
    let index = session.current_index();
    let total = session.total();
    let seconds = session.seconds_remaining();
    let counter = format!("Q {} / {}", index + 1, total);
    let clock = format_clock(seconds);
    let timer_class = if seconds < 60 {
        "quiz-timer text-wrong"
    } else {
        "quiz-timer text-muted"
    };
    let progress_percent = (index * 100) / total.max(1);
    let is_multi = question.answer.is_multiple();
    let category_label = match &question.sub_category {
        Some(sub) => format!("{} > {}", question.major_category, sub),
        None => question.major_category.clone(),
    };
    let next_label = if index + 1 == total {
        "See results"
    } else {
        "Next question (Enter)"
    };

    rsx! {
        div {
            class: "card quiz-card",
            tabindex: "0",
            autofocus: true,
            onkeydown: on_key,

            div { class: "quiz-header",
                span { class: "text-muted", "{counter}" }
                div { class: "quiz-header-right",
                    span { class: timer_class, "{clock}" }
                    button {
                        class: "btn outline quiz-abort",
                        r#type: "button",
                        onclick: move |_| dispatch.call(QuizIntent::RequestAbort),
                        "Abort"
                    }
                }
            }

            div { class: "progress-bar",
                div { class: "progress-fill", style: "width: {progress_percent}%" }
            }

            div { class: "quiz-question",
                span { class: "quiz-category", "{category_label}" }
                h2 { "{question.question}" }
            }

            if let Some(table) = question.table.clone() {
                QuestionTable { table }
            }

            OptionList {
                question: question.clone(),
                session: session.clone(),
                revealed,
                dispatch,
            }

            if is_multi && !revealed {
                div { class: "confirm-row",
                    button {
                        class: "btn",
                        r#type: "button",
                        disabled: !session.can_confirm(),
                        onclick: move |_| dispatch.call(QuizIntent::ConfirmSelection),
                        "Confirm selection (Space)"
                    }
                }
            }

            if revealed {
                div { class: "explanation-box",
                    strong { "Explanation: " }
                    span { "{question.explanation}" }
                    div { class: "explanation-actions",
                        button {
                            class: "btn",
                            r#type: "button",
                            onclick: move |_| dispatch.call(QuizIntent::Advance),
                            "{next_label}"
                        }
                    }
                }
            }

            if current.abort_prompt_open() {
                div { class: "modal-overlay",
                    div { class: "modal",
                        p { class: "modal-title",
                            "Abort this attempt and return to the menu?"
                        }
                        p { class: "text-muted", "Progress will not be saved." }
                        div { class: "modal-actions",
                            button {
                                class: "modal-btn secondary",
                                r#type: "button",
                                onclick: move |_| dispatch.call(QuizIntent::DismissAbort),
                                "Cancel"
                            }
                            button {
                                class: "modal-btn primary",
                                r#type: "button",
                                onclick: move |_| dispatch.call(QuizIntent::ConfirmAbort),
                                "OK"
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn QuestionTable(table: Vec<Vec<String>>) -> Element {
    let header = table.first().cloned().unwrap_or_default();
    let rows: Vec<Vec<String>> = table.into_iter().skip(1).collect();
    rsx! {
        div { class: "quiz-table-container",
            table { class: "quiz-table",
                thead {
                    tr {
                        for cell in header {
                            th { "{cell}" }
                        }
                    }
                }
                tbody {
                    for row in rows {
                        tr {
                            for cell in row {
                                td { "{cell}" }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn OptionList(
    question: SessionQuestion,
    session: QuizSession,
    revealed: bool,
    dispatch: Callback<QuizIntent>,
) -> Element {
    let grid_class = if question.options.len() > 3 {
        "options-grid"
    } else {
        "options-list-vertical"
    };
    let is_multi = question.answer.is_multiple();

    let rows = question.options.iter().enumerate().map(|(idx, option)| {
        let is_selected = session.is_option_selected(idx);
        let is_answer = question.answer.contains(idx);
        let mut class = String::from("option-btn");
        if is_selected {
            class.push_str(" selected");
        }
        if revealed {
            if is_answer {
                class.push_str(" correct");
            } else if is_selected {
                class.push_str(" wrong");
            }
        }
        let show_check = is_selected || (revealed && is_answer);
        let checkbox_class = if show_check {
            "custom-checkbox checked"
        } else {
            "custom-checkbox"
        };
        let shortcut = idx + 1;
        let option = option.clone();
        rsx! {
            div { class: "option-wrapper",
                span { class: "shortcut-hint", "{shortcut}" }
                button {
                    class: "{class}",
                    r#type: "button",
                    disabled: revealed,
                    onclick: move |_| dispatch.call(QuizIntent::SelectOption(idx)),
                    if is_multi {
                        span { class: "{checkbox_class}",
                            if show_check {
                                span { class: "check-mark", "✓" }
                            }
                        }
                    }
                    span { class: "option-text", "{option}" }
                }
            }
        }
    });

    rsx! {
        div { class: grid_class,
            {rows}
        }
    }
}
