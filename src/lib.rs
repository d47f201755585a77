// Client-side core of the VMP training platform: module sequencing, quiz
// grading, credential vigency and the API client that talks to the backend.

pub mod client;
pub mod credential;
pub mod evaluator;
pub mod models;
pub mod sequencer;
pub mod session;

pub use client::{ApiClient, ApiError};
pub use credential::{status, summarize, CredentialStatus, CredentialSummary};
pub use evaluator::{evaluate, EvalError, QuizResult, PASS_THRESHOLD};
pub use sequencer::{complete_module, Outcome, Progression, SequenceError};
pub use session::{CourseSession, Role, SessionContext, SessionError};
