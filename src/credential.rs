// Credential vigency and code-format helpers.

use chrono::{DateTime, Months, Utc};

use crate::models::Credential;

/// Validity window applied when a course carries no `vigenciaMeses`.
pub const DEFAULT_VALIDITY_MONTHS: u32 = 24;

/// Vigente / vencida. Function of wall-clock time, so callers recompute per
/// query instead of caching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialStatus {
    Valid,
    Expired,
}

/// Classifies a credential at `now`. No expiry date means it never expires;
/// the expiry instant itself still counts as valid.
pub fn status(credential: &Credential, now: DateTime<Utc>) -> CredentialStatus {
    match credential.expires_at {
        None => CredentialStatus::Valid,
        Some(expires_at) if now <= expires_at => CredentialStatus::Valid,
        Some(_) => CredentialStatus::Expired,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CredentialSummary {
    pub vigentes: usize,
    pub vencidas: usize,
    pub total: usize,
}

/// Dashboard counts. `vigentes + vencidas == total` by construction.
pub fn summarize<'a, I>(credentials: I, now: DateTime<Utc>) -> CredentialSummary
where
    I: IntoIterator<Item = &'a Credential>,
{
    let mut summary = CredentialSummary::default();
    for c in credentials {
        summary.total += 1;
        match status(c, now) {
            CredentialStatus::Valid => summary.vigentes += 1,
            CredentialStatus::Expired => summary.vencidas += 1,
        }
    }
    summary
}

/// Expiry for a credential issued at `issued_at` for a course with the given
/// validity window. `None` only on calendar overflow.
pub fn expiry_from_validity(
    issued_at: DateTime<Utc>,
    validity_months: Option<u32>,
) -> Option<DateTime<Utc>> {
    let months = validity_months.unwrap_or(DEFAULT_VALIDITY_MONTHS);
    issued_at.checked_add_months(Months::new(months))
}

// --- VMP-YYYY-NNNNN code format ---

pub fn format_number(year: i32, sequence: u32) -> String {
    format!("VMP-{:04}-{:05}", year, sequence)
}

/// Parses a credential code into (year, sequence). Strict about the shape:
/// exactly 4 year digits and 5 sequence digits.
pub fn parse_number(code: &str) -> Option<(i32, u32)> {
    let rest = code.strip_prefix("VMP-")?;
    let (year, seq) = rest.split_once('-')?;
    if year.len() != 4 || seq.len() != 5 {
        return None;
    }
    if !year.bytes().all(|b| b.is_ascii_digit()) || !seq.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((year.parse().ok()?, seq.parse().ok()?))
}

pub fn is_valid_number(code: &str) -> bool {
    parse_number(code).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Course;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn credential(expires_at: Option<DateTime<Utc>>) -> Credential {
        Credential {
            id: Uuid::new_v4(),
            number: "VMP-2026-00123".into(),
            pdf_url: "/uploads/credenciales/VMP-2026-00123.pdf".into(),
            qr_code_url: "https://example.com/validar/VMP-2026-00123".into(),
            issued_at: Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap(),
            expires_at,
            course: Course {
                id: Uuid::new_v4(),
                name: "Trabajo en altura".into(),
                description: String::new(),
                code: "TA-02".into(),
                duration_hours: 16,
                validity_months: None,
                active: true,
            },
        }
    }

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn no_expiry_is_always_valid() {
        let c = credential(None);
        assert_eq!(status(&c, at(2026, 6, 1)), CredentialStatus::Valid);
        assert_eq!(status(&c, at(2099, 1, 1)), CredentialStatus::Valid);
    }

    #[test]
    fn expiry_window_is_inclusive() {
        let expiry = at(2028, 1, 15);
        let c = credential(Some(expiry));
        assert_eq!(status(&c, at(2027, 1, 15)), CredentialStatus::Valid);
        assert_eq!(status(&c, expiry), CredentialStatus::Valid);
        assert_eq!(status(&c, at(2029, 1, 15)), CredentialStatus::Expired);
    }

    #[test]
    fn summary_counts_always_add_up() {
        let now = at(2027, 6, 1);
        let creds = vec![
            credential(None),
            credential(Some(at(2026, 1, 1))),
            credential(Some(at(2030, 1, 1))),
            credential(Some(at(2027, 5, 31))),
        ];
        let s = summarize(&creds, now);
        assert_eq!(s.total, 4);
        assert_eq!(s.vigentes, 2);
        assert_eq!(s.vencidas, 2);
        assert_eq!(s.vigentes + s.vencidas, s.total);
    }

    #[test]
    fn summary_of_empty_set() {
        let s = summarize(&[], at(2026, 1, 1));
        assert_eq!(s, CredentialSummary::default());
    }

    #[test]
    fn expiry_uses_course_window_or_default() {
        let issued = at(2026, 1, 15);
        assert_eq!(
            expiry_from_validity(issued, Some(12)),
            Some(at(2027, 1, 15))
        );
        // default window is 24 months
        assert_eq!(expiry_from_validity(issued, None), Some(at(2028, 1, 15)));
    }

    #[test]
    fn code_round_trip() {
        let code = format_number(2026, 123);
        assert_eq!(code, "VMP-2026-00123");
        assert_eq!(parse_number(&code), Some((2026, 123)));
    }

    #[test]
    fn malformed_codes_are_rejected() {
        for code in [
            "VMP-2026-123",
            "VMP-26-00123",
            "XYZ-2026-00123",
            "VMP-2026-0012a",
            "VMP-2026",
            "",
            "VMP--00123",
        ] {
            assert!(!is_valid_number(code), "accepted {:?}", code);
        }
    }
}
