//! Password hashing
//!
//! bcrypt is CPU-bound, so both calls run on the blocking pool.

use crate::backend::error::BackendError;

pub async fn hash_password(password: String, cost: u32) -> Result<String, BackendError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await?
        .map_err(|e| BackendError::internal(format!("password hashing failed: {}", e)))
}

pub async fn verify_password(password: String, hash: String) -> Result<bool, BackendError> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await?
        .map_err(|e| BackendError::internal(format!("password verification failed: {}", e)))
}
