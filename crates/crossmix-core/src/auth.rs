//! Who is using the player
//!
//! Identity only gates saving; playing and mixing work signed out.

/// A signed-in user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub id: u64,
    pub username: String,
}

/// Source of the current user
pub trait IdentityProvider {
    /// The signed-in user, or `None` when signed out
    fn current_user(&self) -> Option<UserIdentity>;
}

/// Fixed identity, for the headless player and tests
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    user: Option<UserIdentity>,
}

impl StaticIdentity {
    pub fn signed_in(id: u64, username: impl Into<String>) -> Self {
        Self {
            user: Some(UserIdentity {
                id,
                username: username.into(),
            }),
        }
    }

    pub fn signed_out() -> Self {
        Self::default()
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user(&self) -> Option<UserIdentity> {
        self.user.clone()
    }
}
