use async_trait::async_trait;

use crate::core::error::Error;

#[derive(Clone, Debug)]
pub(crate) struct StoredUser {
    pub(crate) id: i32,
    pub(crate) subject: String,
    pub(crate) password_digest: String,
}

/// Boundary to the user store. The store guarantees at most one user per
/// subject; session resolution relies on that.
#[async_trait]
pub(crate) trait UserStore: Send + Sync {
    async fn find_by_subject(&self, subject: &str) -> Result<Option<StoredUser>, Error>;

    async fn save(&self, subject: &str, password_digest: &str) -> Result<i32, Error>;
}
