use uuid::Uuid;

/// Path prefix shared by every landing page slug.
pub const LANDING_PREFIX: &str = "/game/";

/// Generate a fresh landing page slug of the form `/game/<uuid>`.
#[must_use]
pub fn generate_landing_slug() -> String {
    format!("{LANDING_PREFIX}{}", Uuid::new_v4())
}

/// Normalize a lookup key into the stored slug form.
///
/// Accepts either the full `/game/<token>` slug or the bare token, so that clients can
/// put the token in a single path segment. Returns `None` for keys that can never match.
#[must_use]
pub fn normalize_landing_slug(key: &str) -> Option<String> {
    let key = key.trim();
    let token = key
        .strip_prefix(LANDING_PREFIX)
        .or_else(|| key.strip_prefix("game/"))
        .unwrap_or(key);

    if token.is_empty() || token.contains('/') {
        return None;
    }

    Some(format!("{LANDING_PREFIX}{token}"))
}

/// Extract the bare token from a slug (or return the input if it is already bare).
#[must_use]
pub fn landing_token(slug: &str) -> &str {
    let slug = slug.trim();
    slug.strip_prefix(LANDING_PREFIX).unwrap_or(slug)
}
