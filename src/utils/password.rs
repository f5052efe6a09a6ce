use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};

#[derive(Debug)]
pub enum Error {
    HashingFailed,
    InvalidHash,
    ThreadPool,
}

fn hash_blocking(password: &str) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| {
            tracing::error!("Failed to compute password hash: {}", err);
            Error::HashingFailed
        })
}

fn verify_blocking(password: &str, password_hash: &str) -> Result<bool, Error> {
    let parsed = PasswordHash::new(password_hash).map_err(|err| {
        tracing::error!("Failed to parse stored password hash: {}", err);
        Error::InvalidHash
    })?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

pub async fn hash(password: String) -> Result<String, Error> {
    tokio::task::spawn_blocking(move || hash_blocking(&password))
        .await
        .map_err(|err| {
            tracing::error!("Password hashing task failed: {}", err);
            Error::ThreadPool
        })?
}

pub async fn verify(password: String, password_hash: String) -> Result<bool, Error> {
    tokio::task::spawn_blocking(move || verify_blocking(&password, &password_hash))
        .await
        .map_err(|err| {
            tracing::error!("Password verification task failed: {}", err);
            Error::ThreadPool
        })?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hashed_password_verifies_only_against_the_original() {
        let hash = hash("correct horse battery".to_string()).await.unwrap();

        assert_ne!(hash, "correct horse battery");
        assert!(verify("correct horse battery".to_string(), hash.clone())
            .await
            .unwrap());
        assert!(!verify("wrong horse battery".to_string(), hash).await.unwrap());
    }

    #[tokio::test]
    async fn garbage_hash_is_an_error() {
        assert!(matches!(
            verify("whatever".to_string(), "not-a-phc-string".to_string()).await,
            Err(Error::InvalidHash)
        ));
    }
}
