use crate::core::error::Error;

// bcrypt only reads the first 72 bytes of its input; anything longer is
// rejected outright rather than silently truncated
pub(crate) const BCRYPT_INPUT_CEILING: usize = 72;

pub(crate) fn hash(plaintext: &str, cost: u32) -> Result<String, Error> {
    if plaintext.len() > BCRYPT_INPUT_CEILING {
        return Err(Error::PasswordTooLong);
    }

    bcrypt::hash(plaintext, cost).map_err(Error::Bcrypt)
}

/// A malformed digest is treated as a failed match, never an error.
pub(crate) fn verify(plaintext: &str, digest: &str) -> bool {
    bcrypt::verify(plaintext, digest).unwrap_or(false)
}
