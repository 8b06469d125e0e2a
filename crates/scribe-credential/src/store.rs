use std::time::Duration;

use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use scribe_config::{CredentialConfig, Environment};
use secrecy::SecretString;

use crate::error::{CredentialError, Result};

/// Single-slot store for the provider API key, carried in an HTTP cookie
///
/// The cookie is `HttpOnly`, `SameSite=Strict`, and `Secure` in production.
/// The value itself is stored as-is; confidentiality rests on those
/// attributes alone.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    cookie_name: String,
    max_age: Duration,
    secure: bool,
}

impl CredentialStore {
    pub fn new(config: &CredentialConfig, environment: Environment) -> Self {
        Self {
            cookie_name: config.cookie_name.clone(),
            max_age: config.max_age,
            secure: environment.is_production(),
        }
    }

    /// Name of the cookie holding the credential
    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Overwrite the stored credential
    ///
    /// An empty key clears the credential.
    pub fn save(&self, jar: CookieJar, key: &str) -> Result<CookieJar> {
        if key.is_empty() {
            return Ok(self.clear(jar));
        }

        if !key.bytes().all(is_cookie_octet) {
            return Err(CredentialError::UnstorableKey);
        }

        Ok(jar.add(self.cookie(key.to_owned(), self.max_age)))
    }

    /// Expire the stored credential
    pub fn clear(&self, jar: CookieJar) -> CookieJar {
        jar.add(self.cookie(String::new(), Duration::ZERO))
    }

    /// Whether a non-empty credential is present
    pub fn exists(&self, jar: &CookieJar) -> bool {
        self.value(jar).is_some()
    }

    /// Read the stored credential
    pub fn read(&self, jar: &CookieJar) -> Option<SecretString> {
        self.value(jar).map(|v| SecretString::from(v.to_owned()))
    }

    fn value<'a>(&self, jar: &'a CookieJar) -> Option<&'a str> {
        jar.get(&self.cookie_name).map(Cookie::value).filter(|v| !v.is_empty())
    }

    fn cookie(&self, value: String, max_age: Duration) -> Cookie<'static> {
        let max_age = time::Duration::seconds(i64::try_from(max_age.as_secs()).unwrap_or(i64::MAX));

        Cookie::build((self.cookie_name.clone(), value))
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Strict)
            .path("/")
            .max_age(max_age)
            .build()
    }
}

/// RFC 6265 `cookie-octet`
const fn is_cookie_octet(b: u8) -> bool {
    matches!(b, 0x21 | 0x23..=0x2B | 0x2D..=0x3A | 0x3C..=0x5B | 0x5D..=0x7E)
}
