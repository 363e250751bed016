mod home;
mod quiz;
mod result;
mod selection;
mod stage;
mod state;

pub use home::HomeView;
pub use quiz::QuizView;
pub use result::ResultView;
pub use selection::SelectionView;
pub use stage::ViewStage;
pub use state::{ViewError, ViewState, view_state_from_resource};
