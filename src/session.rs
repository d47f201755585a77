// Learner-session orchestration: explicit sign-in context, the single
// in-flight guard for completion requests, and the evaluate-then-sequence
// flow for one completion event.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

use crate::client::{ApiClient, ApiError};
use crate::evaluator::EvalError;
use crate::models::{
    CompleteModuleRequest, CourseDetail, Enrollment, Module, ModuleKind, QuizFeedback,
};
use crate::sequencer::{self, Outcome, Progression, SequenceError};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Alumno,
    Instructor,
    SuperAdmin,
}

/// Signed-in learner context. Built once at sign-in, read-only for the life of
/// the session, dropped at sign-out. Passed explicitly to whatever needs it.
#[derive(Debug, Clone)]
pub struct SessionContext {
    student_id: Uuid,
    display_name: String,
    role: Role,
    token: String,
}

impl SessionContext {
    pub fn sign_in(
        student_id: Uuid,
        display_name: impl Into<String>,
        role: Role,
        token: impl Into<String>,
    ) -> Self {
        let ctx = SessionContext {
            student_id,
            display_name: display_name.into(),
            role,
            token: token.into(),
        };
        tracing::info!(student_id = %ctx.student_id, role = ?ctx.role, "session started");
        ctx
    }

    pub fn student_id(&self) -> Uuid {
        self.student_id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn api_client(&self, base_url: impl Into<String>) -> ApiClient {
        ApiClient::new(base_url).with_token(self.token.clone())
    }

    pub fn sign_out(self) {
        tracing::info!(student_id = %self.student_id, "session ended");
    }
}

/// One outstanding completion request at a time. `settle` answers whether the
/// arriving response is still the one we are waiting for; stale responses
/// (after `cancel`, or for another module) must be discarded without touching
/// state.
#[derive(Debug, Default)]
pub struct CompletionGuard {
    in_flight: Option<Uuid>,
}

impl CompletionGuard {
    pub fn begin(&mut self, module_id: Uuid) -> bool {
        if self.in_flight.is_some() {
            return false;
        }
        self.in_flight = Some(module_id);
        true
    }

    pub fn settle(&mut self, module_id: Uuid) -> bool {
        if self.in_flight == Some(module_id) {
            self.in_flight = None;
            true
        } else {
            false
        }
    }

    pub fn cancel(&mut self) {
        self.in_flight = None;
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }
}

#[derive(Error, Debug)]
pub enum SessionError {
    /// A completion request for this course is still outstanding.
    #[error("a completion request is already in flight")]
    Busy,
    /// The response arrived after the learner navigated away; it was ignored.
    #[error("completion response was stale and has been discarded")]
    Stale,
    #[error("module is not a quiz")]
    NotAQuiz,
    #[error(transparent)]
    Eval(#[from] EvalError),
    #[error(transparent)]
    Sequence(#[from] SequenceError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// One learner working through one course. Local state only advances once the
/// backend acknowledges a completion.
#[derive(Debug)]
pub struct CourseSession {
    pub course: CourseDetail,
    pub enrollment: Enrollment,
    guard: CompletionGuard,
}

impl CourseSession {
    pub fn new(course: CourseDetail, enrollment: Enrollment) -> Self {
        CourseSession {
            course,
            enrollment,
            guard: CompletionGuard::default(),
        }
    }

    /// Learner navigated away: whatever completion response is still pending
    /// must be dropped on arrival.
    pub fn cancel_pending(&mut self) {
        self.guard.cancel();
    }

    /// Runs one completion event: sequencing decision, then exactly one
    /// persistence call for a successful outcome. A failed quiz never leaves
    /// this function — the learner stays on the module and nothing is sent.
    pub async fn complete_module(
        &mut self,
        client: &ApiClient,
        module_id: Uuid,
        outcome: Outcome,
    ) -> Result<Progression, SessionError> {
        let progression = sequencer::complete_module(&self.course, module_id, &outcome)?;
        if progression == Progression::Stay {
            tracing::debug!(%module_id, "quiz failed, re-presenting module");
            return Ok(Progression::Stay);
        }

        if !self.guard.begin(module_id) {
            return Err(SessionError::Busy);
        }

        let body = match outcome {
            Outcome::Quiz { score, passed } => CompleteModuleRequest {
                score: Some(score),
                passed: Some(passed),
            },
            Outcome::Completed => CompleteModuleRequest::default(),
        };

        let ack = match client.complete_module(self.course.course.id, module_id, &body).await {
            Ok(ack) => ack,
            Err(e) => {
                // leave state untouched so the learner can retry
                self.guard.cancel();
                return Err(e.into());
            }
        };

        if !self.guard.settle(module_id) {
            tracing::warn!(%module_id, "discarding stale completion response");
            return Err(SessionError::Stale);
        }

        sequencer::record_completion(&mut self.enrollment, &self.course, module_id, &progression);
        self.enrollment.progress = self.enrollment.progress.max(ack.new_progress);
        if ack.credential_generated {
            tracing::info!(
                number = ack.credential_number.as_deref().unwrap_or("?"),
                "credential issued"
            );
        }
        Ok(progression)
    }

    /// Quiz flow: gate incomplete submissions, grade on the server, then run
    /// the completion event with the graded outcome. Grading always finishes
    /// before sequencing starts.
    pub async fn complete_quiz(
        &mut self,
        client: &ApiClient,
        module: &Module,
        selections: &HashMap<Uuid, usize>,
    ) -> Result<(QuizFeedback, Progression), SessionError> {
        let questions = match &module.kind {
            ModuleKind::Quiz { questions } => questions,
            _ => return Err(SessionError::NotAQuiz),
        };
        crate::evaluator::check_complete(questions, selections)?;

        let feedback = client
            .submit_quiz(self.course.course.id, module.id, selections)
            .await?;
        let outcome = Outcome::Quiz {
            score: feedback.score,
            passed: feedback.passed,
        };
        let progression = self.complete_module(client, module.id, outcome).await?;
        Ok((feedback, progression))
    }
}
