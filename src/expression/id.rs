use uuid::Uuid;

/// Generates a fresh identifier for an expression, condition or group.
///
/// Hosts use these ids as list keys, so two calls never return the same value.
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}
