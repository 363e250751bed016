use std::sync::Arc;

use omni_core::model::{CatalogEntry, QuestionSet, SessionMode};

use crate::vm::QuizResult;

/// The application's view state machine.
///
/// Exactly one stage is active at a time and each variant carries only the
/// data its view needs. Transitions happen in the app shell:
/// Selection → Home (set loaded) → Quiz (mode chosen) → Result (finished),
/// with Quiz falling back to Home on abort and everything able to return to
/// Selection. Startup may enter Quiz directly when a persisted session is
/// resumable.
#[derive(Clone, Debug, PartialEq)]
pub enum ViewStage {
    Selection,
    Home {
        entry: CatalogEntry,
        set: Arc<QuestionSet>,
    },
    Quiz {
        entry: CatalogEntry,
        set: Arc<QuestionSet>,
        mode: SessionMode,
    },
    Result {
        entry: CatalogEntry,
        set: Arc<QuestionSet>,
        outcome: QuizResult,
    },
}

impl ViewStage {
    #[must_use]
    pub fn home(entry: CatalogEntry, set: Arc<QuestionSet>) -> Self {
        ViewStage::Home { entry, set }
    }

    #[must_use]
    pub fn quiz(entry: CatalogEntry, set: Arc<QuestionSet>, mode: SessionMode) -> Self {
        ViewStage::Quiz { entry, set, mode }
    }

    #[must_use]
    pub fn result(entry: CatalogEntry, set: Arc<QuestionSet>, outcome: QuizResult) -> Self {
        ViewStage::Result { entry, set, outcome }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use omni_core::model::{SetId, SetMetadata};

    fn fixture() -> (CatalogEntry, Arc<QuestionSet>) {
        let metadata = SetMetadata {
            title: "Mock".to_owned(),
            description: String::new(),
            total_questions: 1,
            time_limit: 1,
            pass_line: 50,
        };
        let entry = CatalogEntry::from_metadata(SetId::new("mock"), "mock.json", &metadata);
        let set = Arc::new(QuestionSet {
            metadata,
            questions: Vec::new(),
        });
        (entry, set)
    }

    #[test]
    fn quiz_stage_carries_its_mode() {
        let (entry, set) = fixture();
        let stage = ViewStage::quiz(entry, set, SessionMode::Category("Security".to_owned()));
        let ViewStage::Quiz { mode, .. } = stage else {
            panic!("expected quiz stage");
        };
        assert_eq!(mode, SessionMode::Category("Security".to_owned()));
    }
}
