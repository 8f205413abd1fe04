mod chat_vm;
mod exam_vm;
mod markdown_vm;
mod practice_vm;
mod time_fmt;

pub use chat_vm::{ChatMessageVm, map_chat_log, map_chat_message};
pub use exam_vm::{
    ExamQuestionVm, ExamResultVm, NavCellVm, map_exam_question, map_exam_result, map_navigator,
};
pub use markdown_vm::{markdown_to_html, plain_text_to_html, sanitize_html};
pub use practice_vm::{
    FeedbackVm, OptionState, OptionVm, QuestionVm, SummaryVm, WritingPromptVm, map_feedback,
    map_options, map_question, map_reading_feedback, map_reading_question, map_summary,
    map_writing_prompt,
};
pub use time_fmt::{format_clock_time, format_datetime};
