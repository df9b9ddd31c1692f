use serde::Serialize;

/// Issued to the client on login and renewal. The refresh token is
/// deliberately absent; it travels in an HTTP-only cookie instead.
#[derive(Debug, Serialize)]
pub(crate) struct TokenPair {
    pub(crate) access_token: String,
    pub(crate) token_type: String,
    pub(crate) sub: String,
}

impl TokenPair {
    pub(crate) fn new(access_token: String, sub: &str) -> Self {
        Self {
            access_token,
            token_type: "Bearer".to_string(),
            sub: sub.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct User {
    pub(crate) id: i32,
    pub(crate) email: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct UserList {
    pub(crate) items: Vec<User>,
    pub(crate) total_count: i64,
}
