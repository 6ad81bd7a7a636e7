//! Field validation helpers shared by the enrollment-style resources
//! (clubs, sport activities, event registrations).

use crate::utils::AppError;

/// Beneficiary kind: a staff member's child. Age is mandatory.
pub const BENEFICIAIRE_ENFANT: &str = "enfant";

/// Beneficiary kind: the staff member themselves. Age is never stored.
pub const BENEFICIAIRE_AGENT: &str = "Agent TT";

/// Require a non-empty string field, returning its trimmed value.
pub fn require_field(value: &str, field: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!(
            "Le champ '{}' est obligatoire",
            field
        )));
    }
    Ok(trimmed.to_string())
}

/// Apply the conditional age rule for a beneficiary kind.
///
/// - `"enfant"`: age is required.
/// - `"Agent TT"`: age is forced to `None` regardless of input.
/// - anything else: age is passed through unchanged.
pub fn resolve_age(beneficiaire: &str, age: Option<i64>) -> Result<Option<i64>, AppError> {
    match beneficiaire {
        BENEFICIAIRE_ENFANT => {
            if age.is_none() {
                return Err(AppError::validation(
                    "L'âge est requis pour un bénéficiaire 'enfant'",
                ));
            }
            Ok(age)
        }
        BENEFICIAIRE_AGENT => Ok(None),
        _ => Ok(age),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_field_trims_and_rejects_empty() {
        assert_eq!(require_field("  Football ", "nom").unwrap(), "Football");
        assert!(require_field("   ", "nom").is_err());
        assert!(require_field("", "nom").is_err());
    }

    #[test]
    fn enfant_requires_age() {
        assert!(resolve_age(BENEFICIAIRE_ENFANT, None).is_err());
        assert_eq!(resolve_age(BENEFICIAIRE_ENFANT, Some(9)).unwrap(), Some(9));
    }

    #[test]
    fn agent_age_is_forced_null() {
        assert_eq!(resolve_age(BENEFICIAIRE_AGENT, Some(42)).unwrap(), None);
        assert_eq!(resolve_age(BENEFICIAIRE_AGENT, None).unwrap(), None);
    }
}
