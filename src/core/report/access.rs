//! Teacher check against the login store

use super::queries;
use crate::adapters::source::RecordSource;
use crate::domain::{ClassrollError, Result, TeacherId};

/// Confirm `teacher_id` names an account with the `teacher` role
///
/// # Errors
///
/// `Forbidden` when the account is missing, has another role or is not
/// active; `SourceUnavailable` when the login store cannot be reached.
pub async fn verify_teacher(source: &dyn RecordSource, teacher_id: &TeacherId) -> Result<()> {
    let rows = source.fetch(&queries::teacher_account(teacher_id)).await?;

    let Some(account) = rows.first() else {
        tracing::warn!(teacher_id = %teacher_id, "No login account for teacher id");
        return Err(ClassrollError::Forbidden(format!(
            "no account for '{teacher_id}'"
        )));
    };

    let role = account.get_str("role").unwrap_or_default();
    if !role.trim().eq_ignore_ascii_case("teacher") {
        tracing::warn!(teacher_id = %teacher_id, role = %role, "Account is not a teacher");
        return Err(ClassrollError::Forbidden(format!(
            "account '{teacher_id}' has role '{role}'"
        )));
    }

    let active = account
        .get_str("status")
        .map_or(true, |s| s.trim().eq_ignore_ascii_case("active"));
    if !active {
        return Err(ClassrollError::Forbidden(format!(
            "account '{teacher_id}' is not active"
        )));
    }

    tracing::debug!(teacher_id = %teacher_id, "Teacher verified");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::source::{MemorySource, Row};
    use crate::domain::Store;

    fn teacher() -> TeacherId {
        TeacherId::new("T1").unwrap()
    }

    #[tokio::test]
    async fn test_teacher_role_passes() {
        let source = MemorySource::new().respond(
            Store::Login,
            queries::TEACHER_ACCOUNT,
            vec![Row::new().with("role", "Teacher").with("status", "active")],
        );
        assert!(verify_teacher(&source, &teacher()).await.is_ok());
    }

    #[tokio::test]
    async fn test_other_roles_are_forbidden() {
        let source = MemorySource::new().respond(
            Store::Login,
            queries::TEACHER_ACCOUNT,
            vec![Row::new().with("role", "registrar")],
        );
        let err = verify_teacher(&source, &teacher()).await.unwrap_err();
        assert!(matches!(err, ClassrollError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_missing_account_is_forbidden() {
        let err = verify_teacher(&MemorySource::new(), &teacher())
            .await
            .unwrap_err();
        assert!(matches!(err, ClassrollError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_login_store_outage_is_not_forbidden() {
        let source = MemorySource::new().fail_store(Store::Login);
        let err = verify_teacher(&source, &teacher()).await.unwrap_err();
        assert!(matches!(err, ClassrollError::SourceUnavailable { .. }));
    }
}
