pub mod session;
pub mod submission;

pub use session::{Answers, DateStep, Session, Step};
pub use submission::Submission;
