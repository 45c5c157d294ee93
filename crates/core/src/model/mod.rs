mod answers;
mod ids;
mod question;
mod result;
mod step;

pub use ids::{QuestionRef, StepId};

pub use answers::AnswerRecord;
pub use question::{Question, QuestionKind};
pub use result::{QuizResult, QuizResultError, score_answers};
pub use step::Step;
