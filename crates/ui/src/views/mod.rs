mod components;
mod dashboard;
mod exam;
mod grammar_vocab;
mod progress;
mod reading_writing;
mod report;
mod state;
mod tutor;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use dashboard::DashboardView;
pub use exam::ExamView;
pub use grammar_vocab::GrammarVocabView;
pub use progress::ProgressView;
pub use reading_writing::ReadingWritingView;
pub use state::{ViewError, ViewState, view_state_from_resource};
pub use tutor::TutorView;
