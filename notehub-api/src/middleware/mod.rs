/// Request middleware
///
/// - `auth`: Bearer-token authentication (`require_auth`) and the admin
///   role gate (`require_admin`)

pub mod auth;
