//! Password hashing.

use booksblog_core::exception::Error;

/// Hashes and verifies passwords as PHC strings.
pub trait PasswordHasher: Send + Sync {
	fn hash(&self, password: &str) -> Result<String, Error>;

	/// `Ok(false)` for a wrong password, `Err` only for an unreadable hash.
	fn verify(&self, password: &str, hash: &str) -> Result<bool, Error>;
}

/// Argon2id with the crate's default parameters.
///
/// ```
/// use booksblog_auth::{Argon2Hasher, PasswordHasher};
///
/// let hasher = Argon2Hasher::new();
/// let hash = hasher.hash("correct horse").unwrap();
///
/// assert!(hash.starts_with("$argon2id$"));
/// assert!(hasher.verify("correct horse", &hash).unwrap());
/// assert!(!hasher.verify("battery staple", &hash).unwrap());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Hasher;

impl Argon2Hasher {
	pub fn new() -> Self {
		Self
	}
}

impl PasswordHasher for Argon2Hasher {
	fn hash(&self, password: &str) -> Result<String, Error> {
		use argon2::{
			Argon2,
			password_hash::{PasswordHasher as _, SaltString},
		};
		use rand::RngCore;

		let mut salt_bytes = [0u8; 16];
		rand::thread_rng().fill_bytes(&mut salt_bytes);

		let salt = SaltString::encode_b64(&salt_bytes)
			.map_err(|e| Error::Authentication(e.to_string()))?;

		Argon2::default()
			.hash_password(password.as_bytes(), &salt)
			.map(|hash| hash.to_string())
			.map_err(|e| Error::Authentication(e.to_string()))
	}

	fn verify(&self, password: &str, hash: &str) -> Result<bool, Error> {
		use argon2::{
			Argon2,
			password_hash::{PasswordHash, PasswordVerifier},
		};

		let parsed_hash =
			PasswordHash::new(hash).map_err(|e| Error::Authentication(e.to_string()))?;

		Ok(Argon2::default()
			.verify_password(password.as_bytes(), &parsed_hash)
			.is_ok())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_salts_differ() {
		let hasher = Argon2Hasher::new();
		let first = hasher.hash("same password").unwrap();
		let second = hasher.hash("same password").unwrap();

		assert_ne!(first, second);
		assert!(hasher.verify("same password", &first).unwrap());
		assert!(hasher.verify("same password", &second).unwrap());
	}

	#[rstest]
	fn test_malformed_hash_is_an_error() {
		let result = Argon2Hasher::new().verify("x", "not-a-phc-string");
		assert!(matches!(result, Err(Error::Authentication(_))));
	}
}
