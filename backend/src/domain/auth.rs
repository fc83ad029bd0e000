//! Authentication primitives: login credentials, password policy and API
//! tokens.
//!
//! Tokens are random 40-character hex keys handed to the client once. Only a
//! SHA-256 digest of the key is persisted, so a leaked table does not expose
//! usable credentials.

use std::fmt;

use rand::RngCore;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::domain::{Email, Username};

/// Minimum accepted password length.
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// Number of random bytes in an API token key.
const TOKEN_BYTES: usize = 20;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by the token service.
///
/// ## Invariants
/// - `email` is trimmed and must not be empty after trimming.
/// - `password` must be non-empty but keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use foodgram::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("cook@example.com", "pa55word").unwrap();
/// assert_eq!(creds.email(), "cook@example.com");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = email.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            email: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email string used for the account lookup.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"..")
            .finish()
    }
}

/// Reasons a new password is refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordPolicyError {
    #[error("password must contain at least {min} characters")]
    TooShort { min: usize },
    #[error("password must not be entirely numeric")]
    EntirelyNumeric,
    #[error("password is too similar to the {attribute}")]
    TooSimilar { attribute: &'static str },
}

/// Plain-text password that passed the policy checks. Wiped on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct NewPassword(Zeroizing<String>);

impl NewPassword {
    /// Apply the password policy against the account it will protect.
    pub fn new(raw: &str, username: &Username, email: &Email) -> Result<Self, PasswordPolicyError> {
        if raw.chars().count() < PASSWORD_MIN_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: PASSWORD_MIN_LENGTH,
            });
        }
        if raw.chars().all(|c| c.is_ascii_digit()) {
            return Err(PasswordPolicyError::EntirelyNumeric);
        }
        let lowered = raw.to_lowercase();
        if lowered == username.as_ref().to_lowercase() {
            return Err(PasswordPolicyError::TooSimilar {
                attribute: "username",
            });
        }
        let email = email.as_ref().to_lowercase();
        let local_part = email.split('@').next().unwrap_or_default();
        if lowered == email || lowered == local_part {
            return Err(PasswordPolicyError::TooSimilar { attribute: "email" });
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    /// Expose the password for hashing.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for NewPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NewPassword(..)")
    }
}

/// Encoded password hash in PHC string format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash read from storage or produced by a hasher.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Freshly issued API token key, returned to the client exactly once.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(Zeroizing<String>);

impl AuthToken {
    /// Generate a new random key.
    pub fn generate() -> Self {
        let mut bytes = Zeroizing::new([0_u8; TOKEN_BYTES]);
        rand::thread_rng().fill_bytes(&mut bytes[..]);
        Self(Zeroizing::new(hex::encode(&bytes[..])))
    }

    /// Key presented by the client in the `Authorization` header.
    pub fn key(&self) -> &str {
        self.0.as_str()
    }

    /// Digest stored in place of the key.
    pub fn digest(&self) -> TokenDigest {
        TokenDigest::of(self.key())
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(..)")
    }
}

/// Hex-encoded SHA-256 digest of a token key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenDigest(String);

impl TokenDigest {
    /// Digest a presented key.
    pub fn of(key: &str) -> Self {
        Self(hex::encode(Sha256::digest(key.as_bytes())))
    }

    /// Wrap a digest read from storage.
    pub fn from_stored(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }
}

impl AsRef<str> for TokenDigest {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}
