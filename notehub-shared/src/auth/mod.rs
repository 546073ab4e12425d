/// Authentication primitives for NoteHub
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`token`]: Opaque bearer/share token generation
///
/// Sessions are a flat lookup: a login stores a fresh random token on the
/// user row and every authenticated request resolves that token back to
/// its user. There is no expiry and no signing; uniqueness is enforced by
/// the database. This is a minimum-viable session mechanism, kept
/// deliberately simple.
pub mod password;
pub mod token;
