use monynha_core::error::CoreError;
use monynha_core::types::DbId;

/// Who is using the client. Authentication itself happens elsewhere.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Session {
    user_id: Option<DbId>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(user_id: DbId) -> Self {
        Self {
            user_id: Some(user_id),
        }
    }

    pub fn user_id(&self) -> Option<DbId> {
        self.user_id
    }

    /// The signed-in user, or `CoreError::Unauthenticated` naming `action`.
    pub fn require_user(&self, action: &str) -> Result<DbId, CoreError> {
        self.user_id
            .ok_or_else(|| CoreError::Unauthenticated(format!("Sign in to {action}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use uuid::Uuid;

    #[test]
    fn anonymous_session_requires_sign_in() {
        assert_matches!(
            Session::anonymous().require_user("vote"),
            Err(CoreError::Unauthenticated(msg)) if msg == "Sign in to vote"
        );
    }

    #[test]
    fn signed_in_session_yields_user() {
        let id = Uuid::from_u128(4);
        assert_eq!(Session::signed_in(id).require_user("vote").unwrap(), id);
    }
}
