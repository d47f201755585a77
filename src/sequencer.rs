// Module sequencing: after a completion event, decide what the learner sees
// next. Pure decisions only; persisting progress belongs to the API client.

use thiserror::Error;
use uuid::Uuid;

use crate::models::{CourseDetail, Enrollment, EnrollmentStatus, ModuleSummary};

/// Outcome of the module the learner just finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Theory read or practical checklist submitted. Always counts as success.
    Completed,
    /// Graded quiz attempt.
    Quiz { score: u8, passed: bool },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        match self {
            Outcome::Completed => true,
            Outcome::Quiz { passed, .. } => *passed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progression {
    /// Re-present the current module (failed quiz never advances).
    Stay,
    AdvanceTo(Uuid),
    CourseComplete,
}

#[derive(Error, Debug)]
pub enum SequenceError {
    #[error("module {0} is not part of the course")]
    ModuleNotFound(Uuid),
}

/// Decides the next step after completing `current_module_id` with `outcome`.
///
/// An empty course completes immediately; course authoring should prevent
/// that, this keeps the player from wedging if it happens anyway.
pub fn complete_module(
    course: &CourseDetail,
    current_module_id: Uuid,
    outcome: &Outcome,
) -> Result<Progression, SequenceError> {
    if course.modules.is_empty() {
        return Ok(Progression::CourseComplete);
    }

    let current = course
        .modules
        .iter()
        .find(|m| m.id == current_module_id)
        .ok_or(SequenceError::ModuleNotFound(current_module_id))?;

    if !outcome.is_success() {
        return Ok(Progression::Stay);
    }

    // next module = smallest order strictly above the current one
    let next = course
        .modules
        .iter()
        .filter(|m| m.order > current.order)
        .min_by_key(|m| m.order);

    Ok(match next {
        Some(m) => Progression::AdvanceTo(m.id),
        None => Progression::CourseComplete,
    })
}

/// Progress percentage from completed/total module counts. Truncates like the
/// backend's calculator; an empty course reports 0.
pub fn progress_pct(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    (100 * completed.min(total) / total) as u8
}

/// First module, by order, the learner has not completed yet. Drives the
/// "próxima actividad" hint on the dashboard.
pub fn next_activity<'a>(
    course: &'a CourseDetail,
    enrollment: &Enrollment,
) -> Option<&'a ModuleSummary> {
    course
        .modules
        .iter()
        .filter(|m| !enrollment.is_completed(m.id))
        .min_by_key(|m| m.order)
}

/// Folds an acknowledged completion into the enrollment. Progress only moves
/// forward: a re-taken module can never lower it.
pub fn record_completion(
    enrollment: &mut Enrollment,
    course: &CourseDetail,
    module_id: Uuid,
    progression: &Progression,
) {
    if matches!(progression, Progression::Stay) {
        return;
    }

    enrollment.completed_modules.insert(module_id);
    let pct = progress_pct(enrollment.completed_modules.len(), course.modules.len());
    enrollment.progress = enrollment.progress.max(pct);

    enrollment.status = match (enrollment.status, progression) {
        (EnrollmentStatus::NoIniciado, Progression::AdvanceTo(_)) => EnrollmentStatus::EnProgreso,
        (_, Progression::CourseComplete) => EnrollmentStatus::Completado,
        (status, _) => status,
    };
}
