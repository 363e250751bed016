use std::sync::Arc;

use dioxus::prelude::*;

use omni_core::model::{CatalogEntry, SessionMode};

use crate::context::AppContext;
use crate::views::{
    HomeView, QuizView, ResultView, SelectionView, ViewError, ViewStage, ViewState,
    view_state_from_resource,
};
use crate::vm::QuizResult;

/// App shell: owns the view stage machine and the blocking notice.
///
/// On startup it loads the catalog index and, when a persisted session
/// points at a set that still exists, jumps straight into the quiz to
/// resume it.
#[component]
pub fn App() -> Element {
    let ctx = use_context::<AppContext>();
    let mut stage = use_signal(|| ViewStage::Selection);
    let mut notice = use_signal(|| None::<&'static str>);
    let entries = use_signal(Vec::<CatalogEntry>::new);

    let catalog_for_startup = ctx.catalog();
    let workflow_for_startup = ctx.session_workflow();
    let startup = use_resource(move || {
        let catalog = catalog_for_startup.clone();
        let workflow = workflow_for_startup.clone();
        let mut stage = stage;
        let mut entries = entries;
        async move {
            let index = catalog.load_index().await.map_err(|_| ViewError::Unknown)?;
            entries.set(index.clone());

            // Resume a persisted session if its catalog entry still exists;
            // a snapshot for a vanished set is skipped silently.
            if let Ok(Some((entry, mode))) = workflow.pending_resume(&index).await {
                if let Ok(set) = catalog.load_set(&entry).await {
                    stage.set(ViewStage::quiz(entry, Arc::new(set), mode));
                }
            }
            Ok::<_, ViewError>(())
        }
    });
    let startup_state = view_state_from_resource(startup);
    let loading = matches!(startup_state, ViewState::Loading);
    let startup_failed = matches!(startup_state, ViewState::Error(_));
    let startup_error = ViewError::Unknown.message();

    rsx! {
        document::Stylesheet { href: asset!("/assets/style.css") }
        document::Title { "OmniMock" }

        div { class: "app-root",
            match stage() {
                ViewStage::Selection => {
                    let catalog = ctx.catalog();
                    rsx! {
                        if startup_failed {
                            div { class: "card",
                                p { "{startup_error}" }
                            }
                        } else {
                            SelectionView {
                                entries: entries(),
                                loading,
                                on_select: move |entry: CatalogEntry| {
                                    let catalog = catalog.clone();
                                    let mut stage = stage;
                                    let mut notice = notice;
                                    spawn(async move {
                                        match catalog.load_set(&entry).await {
                                            Ok(set) => {
                                                stage.set(ViewStage::home(entry, Arc::new(set)));
                                            }
                                            Err(_) => {
                                                notice.set(Some(
                                                    "Failed to load the question data.",
                                                ));
                                            }
                                        }
                                    });
                                },
                            }
                        }
                    }
                }
                ViewStage::Home { entry, set } => {
                    let workflow_for_start = ctx.session_workflow();
                    let workflow_for_back = ctx.session_workflow();
                    let entry_for_start = entry.clone();
                    let set_for_start = set.clone();
                    rsx! {
                        HomeView {
                            entry,
                            set,
                            on_start: move |mode: SessionMode| {
                                let workflow = workflow_for_start.clone();
                                let entry = entry_for_start.clone();
                                let set = set_for_start.clone();
                                let mut stage = stage;
                                spawn(async move {
                                    // A deliberate fresh start: drop any lingering
                                    // snapshot so the quiz builds a new session.
                                    let _ = workflow.discard_pending().await;
                                    stage.set(ViewStage::quiz(entry, set, mode));
                                });
                            },
                            on_back: move |()| {
                                let workflow = workflow_for_back.clone();
                                let mut stage = stage;
                                spawn(async move {
                                    let _ = workflow.discard_pending().await;
                                    stage.set(ViewStage::Selection);
                                });
                            },
                        }
                    }
                }
                ViewStage::Quiz { entry, set, mode } => {
                    let entry_for_finish = entry.clone();
                    let set_for_finish = set.clone();
                    let entry_for_abort = entry.clone();
                    let set_for_abort = set.clone();
                    rsx! {
                        QuizView {
                            entry,
                            set,
                            mode,
                            on_finished: move |outcome: QuizResult| {
                                stage.set(ViewStage::result(
                                    entry_for_finish.clone(),
                                    set_for_finish.clone(),
                                    outcome,
                                ));
                            },
                            on_aborted: move |()| {
                                stage.set(ViewStage::home(
                                    entry_for_abort.clone(),
                                    set_for_abort.clone(),
                                ));
                            },
                        }
                    }
                }
                ViewStage::Result { entry, set, outcome } => {
                    let workflow_for_exit = ctx.session_workflow();
                    let entry_for_retry = entry.clone();
                    let set_for_retry = set.clone();
                    rsx! {
                        ResultView {
                            entry,
                            outcome,
                            on_retry: move |()| {
                                stage.set(ViewStage::home(
                                    entry_for_retry.clone(),
                                    set_for_retry.clone(),
                                ));
                            },
                            on_exit: move |()| {
                                let workflow = workflow_for_exit.clone();
                                let mut stage = stage;
                                spawn(async move {
                                    let _ = workflow.discard_pending().await;
                                    stage.set(ViewStage::Selection);
                                });
                            },
                        }
                    }
                }
            }

            if let Some(message) = notice() {
                div { class: "modal-overlay",
                    div { class: "modal",
                        p { class: "modal-title", "{message}" }
                        div { class: "modal-actions",
                            button {
                                class: "modal-btn primary",
                                r#type: "button",
                                onclick: move |_| notice.set(None),
                                "OK"
                            }
                        }
                    }
                }
            }
        }
    }
}
