/*
 * Responsibility
 * - The credential handlers receive after the API key middleware ran
 *
 * Notes
 * - Parsing lives in services::auth::api_key, insertion in middleware::auth::api_key
 * - The key is not known to be valid, only well-formed (and possibly empty)
 */

/// API key taken from `Authorization: ApiKey <key>`.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Keys must not end up in logs through `{:?}`.
impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ApiKey").field(&"<redacted>").finish()
    }
}
