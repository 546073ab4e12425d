/// Opaque token generation
///
/// Session tokens and note share tokens are both random UUID v4 values
/// rendered as 32 lowercase hex characters. They carry no structure and
/// no expiry; the database UNIQUE constraint on the token columns is the
/// uniqueness arbiter. Collisions are not expected in practice (122 bits
/// of randomness), so generation does not retry.

use uuid::Uuid;

/// Generates a fresh opaque token
///
/// # Example
///
/// ```
/// use notehub_shared::auth::token::generate_token;
///
/// let token = generate_token();
/// assert_eq!(token.len(), 32);
/// ```
pub fn generate_token() -> String {
    Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_shape() {
        let token = generate_token();
        assert_eq!(token.len(), 32);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_tokens_are_unique() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
    }
}
