use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

// The backend API speaks Spanish camelCase; field renames pin the wire contract.

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Course {
    pub id: Uuid,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion", default)]
    pub description: String,
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(rename = "duracionHoras")]
    pub duration_hours: u32,
    /// Validity window of the credential issued on completion, in months.
    /// `None` means the backend falls back to its default window.
    #[serde(rename = "vigenciaMeses", skip_serializing_if = "Option::is_none")]
    pub validity_months: Option<u32>,
    #[serde(rename = "activo", default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CourseDetail {
    #[serde(flatten)]
    pub course: Course,
    #[serde(rename = "modulos", default)]
    pub modules: Vec<ModuleSummary>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleType {
    #[serde(rename = "TEORIA")]
    Theory,
    #[serde(rename = "QUIZ")]
    Quiz,
    #[serde(rename = "PRACTICA")]
    Practical,
}

/// Ordering entry as returned inside a course detail; `order` is unique and
/// contiguous within a course and defines the sequencing.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ModuleSummary {
    pub id: Uuid,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "orden")]
    pub order: u32,
    #[serde(rename = "tipo")]
    pub module_type: ModuleType,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Module {
    pub id: Uuid,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "orden")]
    pub order: u32,
    #[serde(flatten)]
    pub kind: ModuleKind,
}

/// Kind-specific payload, tagged by `tipo` on the wire.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "tipo")]
pub enum ModuleKind {
    #[serde(rename = "TEORIA")]
    Theory {
        #[serde(rename = "contenidoHtml", skip_serializing_if = "Option::is_none")]
        content_html: Option<String>,
        #[serde(rename = "videoUrl", skip_serializing_if = "Option::is_none")]
        video_url: Option<String>,
    },
    #[serde(rename = "QUIZ")]
    Quiz {
        #[serde(rename = "preguntas", default)]
        questions: Vec<Question>,
    },
    #[serde(rename = "PRACTICA")]
    Practical {
        #[serde(rename = "tareasPracticas", default)]
        tasks: Vec<PracticalTask>,
    },
}

impl ModuleKind {
    pub fn module_type(&self) -> ModuleType {
        match self {
            ModuleKind::Theory { .. } => ModuleType::Theory,
            ModuleKind::Quiz { .. } => ModuleType::Quiz,
            ModuleKind::Practical { .. } => ModuleType::Practical,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Question {
    pub id: Uuid,
    #[serde(rename = "pregunta")]
    pub prompt: String,
    #[serde(rename = "opciones")]
    pub options: Vec<String>,
    /// 0-based index of the correct option. Never sent to learners; present in
    /// the authoring surface and used by the local scoring fallback.
    #[serde(
        rename = "respuestaCorrecta",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub correct_option: Option<usize>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PracticalTask {
    pub id: Uuid,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "requiereFoto")]
    pub requires_photo: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnrollmentStatus {
    NoIniciado,
    EnProgreso,
    Completado,
    Aprobado,
    Reprobado,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Enrollment {
    pub id: Uuid,
    #[serde(rename = "cursoId")]
    pub course_id: Uuid,
    #[serde(rename = "alumnoId")]
    pub student_id: Uuid,
    #[serde(rename = "progreso")]
    pub progress: u8,
    #[serde(rename = "estado")]
    pub status: EnrollmentStatus,
    #[serde(rename = "modulosCompletados", default)]
    pub completed_modules: HashSet<Uuid>,
}

impl Enrollment {
    pub fn new(course_id: Uuid, student_id: Uuid) -> Self {
        Enrollment {
            id: Uuid::new_v4(),
            course_id,
            student_id,
            progress: 0,
            status: EnrollmentStatus::NoIniciado,
            completed_modules: HashSet::new(),
        }
    }

    pub fn is_completed(&self, module_id: Uuid) -> bool {
        self.completed_modules.contains(&module_id)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Credential {
    pub id: Uuid,
    #[serde(rename = "numero")]
    pub number: String,
    #[serde(rename = "pdfUrl")]
    pub pdf_url: String,
    #[serde(rename = "qrCodeUrl")]
    pub qr_code_url: String,
    #[serde(rename = "fechaEmision")]
    pub issued_at: DateTime<Utc>,
    #[serde(rename = "fechaVencimiento", skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(rename = "curso")]
    pub course: Course,
}

// --- request/response bodies ---

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct CompleteModuleRequest {
    #[serde(rename = "calificacion", skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
    #[serde(rename = "aprobado", skip_serializing_if = "Option::is_none")]
    pub passed: Option<bool>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CompleteModuleResponse {
    pub success: bool,
    #[serde(rename = "nuevoProgreso")]
    pub new_progress: u8,
    #[serde(rename = "cursoCompletado")]
    pub course_completed: bool,
    #[serde(rename = "credencialGenerada")]
    pub credential_generated: bool,
    #[serde(rename = "credencialNumero", default)]
    pub credential_number: Option<String>,
    #[serde(default)]
    pub message: String,
}

/// Server-side grading result for a quiz submission. Shape matches what the
/// local evaluator produces, the backend stays authoritative.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct QuizFeedback {
    #[serde(rename = "calificacion")]
    pub score: u8,
    #[serde(rename = "aprobado")]
    pub passed: bool,
    #[serde(rename = "respuestasCorrectas")]
    pub correct_count: usize,
    #[serde(rename = "totalPreguntas")]
    pub total_questions: usize,
    #[serde(default)]
    pub feedback: Vec<QuestionFeedback>,
    #[serde(default)]
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct QuestionFeedback {
    #[serde(rename = "preguntaId")]
    pub question_id: Uuid,
    #[serde(rename = "correcta")]
    pub correct: bool,
    #[serde(rename = "respuestaElegida")]
    pub chosen_option: usize,
    #[serde(rename = "respuestaCorrecta")]
    pub correct_option: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    Valid,
    Expired,
    NotFound,
}

/// Public validator answer for a credential code. Learner-safe fields only.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ValidationResponse {
    pub valid: bool,
    pub status: ValidationStatus,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub credential: Option<ValidatedCredential>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ValidatedCredential {
    #[serde(rename = "numero")]
    pub number: String,
    #[serde(rename = "fechaEmision")]
    pub issued_at: DateTime<Utc>,
    #[serde(rename = "fechaVencimiento", default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(rename = "alumnoNombre", default)]
    pub student_name: Option<String>,
    #[serde(rename = "cursoNombre")]
    pub course_name: String,
    #[serde(rename = "cursoCodigo")]
    pub course_code: String,
}
