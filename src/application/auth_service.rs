use std::sync::Arc;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::domain::ports::AdminRepository;

pub const SESSION_COOKIE: &str = "store_admin_session";
pub const SESSION_TTL_DAYS: i64 = 7;
pub const ADMIN_USERNAME: &str = "admin";
pub const MIN_PASSWORD_LEN: usize = 6;

/// Claims carried by the admin session cookie.
///
/// Sessions are stateless: a token stays valid until `exp` even after logout,
/// which only clears the cookie. Rotating `SESSION_SECRET` revokes all of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// HMAC key used to sign and check session tokens.
#[derive(Clone)]
pub struct SessionKeys {
    secret: Arc<Vec<u8>>,
}

impl SessionKeys {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            secret: Arc::new(secret.to_vec()),
        }
    }

    /// Per-process key; sessions stop validating after a restart.
    pub fn random() -> Self {
        let mut secret = vec![0u8; 32];
        rand::thread_rng().fill_bytes(&mut secret);
        Self {
            secret: Arc::new(secret),
        }
    }

    pub fn issue(&self, username: &str) -> Result<String, DomainError> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: username.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::days(SESSION_TTL_DAYS)).timestamp(),
        };
        self.sign(&claims)
    }

    fn sign(&self, claims: &SessionClaims) -> Result<String, DomainError> {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(&self.secret),
        )
        .map_err(|e| DomainError::Internal(format!("token creation failed: {}", e)))
    }

    pub fn validate(&self, token: &str) -> Result<SessionClaims, DomainError> {
        decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(&self.secret),
            &Validation::new(Algorithm::HS256),
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => DomainError::Unauthorized("Session expired".to_string()),
            _ => DomainError::Unauthorized("Unauthorized".to_string()),
        })
    }
}

pub fn hash_password(password: &str) -> Result<String, DomainError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| DomainError::Internal(format!("password hashing failed: {}", e)))
}

pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            log::error!("Stored admin password hash is unreadable: {}", e);
            false
        }
    }
}

#[derive(Clone)]
pub struct AuthService {
    admins: Arc<dyn AdminRepository>,
    keys: SessionKeys,
}

impl AuthService {
    pub fn new(admins: Arc<dyn AdminRepository>, keys: SessionKeys) -> Self {
        Self { admins, keys }
    }

    pub fn keys(&self) -> &SessionKeys {
        &self.keys
    }

    /// Check credentials and return a signed session token.
    pub fn login(&self, username: &str, password: &str) -> Result<String, DomainError> {
        let invalid = || DomainError::Unauthorized("Invalid username or password".to_string());
        let admin = self.admins.find_by_username(username)?.ok_or_else(invalid)?;
        if !verify_password(password, &admin.password_hash) {
            log::warn!("Failed admin login for '{}'", username);
            return Err(invalid());
        }
        log::info!("Admin '{}' logged in", admin.username);
        self.keys.issue(&admin.username)
    }

    pub fn change_password(
        &self,
        username: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), DomainError> {
        if new_password.chars().count() < MIN_PASSWORD_LEN {
            return Err(DomainError::Validation(format!(
                "New password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        let admin = self
            .admins
            .find_by_username(username)?
            .filter(|a| verify_password(current_password, &a.password_hash))
            .ok_or_else(|| {
                DomainError::Unauthorized("Current password is incorrect".to_string())
            })?;
        self.admins
            .upsert_password(&admin.username, &hash_password(new_password)?)?;
        log::info!("Admin '{}' changed password", admin.username);
        Ok(())
    }

    /// Create the admin account, or reset its password, from a bootstrap secret.
    pub fn ensure_admin(&self, initial_password: Option<&str>) -> Result<(), DomainError> {
        let existing = self.admins.count()?;
        match initial_password {
            Some(password) => {
                self.admins
                    .upsert_password(ADMIN_USERNAME, &hash_password(password)?)?;
                if existing == 0 {
                    log::info!("Admin user created. Remove ADMIN_INITIAL_PASSWORD from env after logging in.");
                } else {
                    log::info!("Admin password reset from ADMIN_INITIAL_PASSWORD. Remove it from env after logging in.");
                }
            }
            None if existing == 0 => {
                log::warn!("No admin user and ADMIN_INITIAL_PASSWORD not set; the admin console is unusable.");
            }
            None => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory::InMemoryAdmins;

    fn service() -> AuthService {
        let admins = Arc::new(InMemoryAdmins::default());
        let svc = AuthService::new(admins, SessionKeys::from_secret(b"test-secret"));
        svc.ensure_admin(Some("hunter22")).unwrap();
        svc
    }

    #[test]
    fn issued_token_validates() {
        let keys = SessionKeys::from_secret(b"k1");
        let token = keys.issue("admin").unwrap();
        let claims = keys.validate(&token).unwrap();
        assert_eq!(claims.sub, "admin");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn token_from_another_key_is_rejected() {
        let token = SessionKeys::from_secret(b"k1").issue("admin").unwrap();
        let err = SessionKeys::from_secret(b"k2").validate(&token).unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = SessionKeys::from_secret(b"k1");
        let past = Utc::now() - Duration::days(1);
        let token = keys
            .sign(&SessionClaims {
                sub: "admin".to_string(),
                iat: past.timestamp(),
                exp: (past + Duration::minutes(5)).timestamp(),
            })
            .unwrap();
        assert_eq!(
            keys.validate(&token).unwrap_err().to_string(),
            "Session expired"
        );
    }

    #[test]
    fn token_carries_only_subject_and_lifetime() {
        let keys = SessionKeys::from_secret(b"k1");
        let token = keys.issue("admin").unwrap();
        let raw = decode::<serde_json::Value>(
            &token,
            &DecodingKey::from_secret(b"k1"),
            &Validation::new(Algorithm::HS256),
        )
        .unwrap()
        .claims;

        let mut names: Vec<&str> = raw
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        assert_eq!(names, vec!["exp", "iat", "sub"]);
        assert_eq!(
            raw["exp"].as_i64().unwrap() - raw["iat"].as_i64().unwrap(),
            SESSION_TTL_DAYS * 86_400
        );
    }

    #[test]
    fn random_keys_differ() {
        let token = SessionKeys::random().issue("admin").unwrap();
        assert!(SessionKeys::random().validate(&token).is_err());
    }

    #[test]
    fn login_checks_password() {
        let svc = service();
        let token = svc.login("admin", "hunter22").unwrap();
        assert_eq!(svc.keys().validate(&token).unwrap().sub, "admin");

        assert!(matches!(
            svc.login("admin", "wrong"),
            Err(DomainError::Unauthorized(_))
        ));
        assert!(matches!(
            svc.login("nobody", "hunter22"),
            Err(DomainError::Unauthorized(_))
        ));
    }

    #[test]
    fn change_password_requires_current_and_length() {
        let svc = service();
        assert!(matches!(
            svc.change_password("admin", "hunter22", "short"),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            svc.change_password("admin", "nope", "longenough"),
            Err(DomainError::Unauthorized(_))
        ));

        svc.change_password("admin", "hunter22", "longenough").unwrap();
        assert!(svc.login("admin", "longenough").is_ok());
        assert!(svc.login("admin", "hunter22").is_err());
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("same").unwrap();
        let b = hash_password("same").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("same", &a));
        assert!(!verify_password("same", "not-a-phc-string"));
    }
}
