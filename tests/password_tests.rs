//! 密码哈希与密码策略测试

use campus_admin::{auth::PasswordHasher, error::AppError};

mod common;
use common::create_test_config;

fn cheap_hasher() -> PasswordHasher {
    PasswordHasher::with_params(1024, 1, 1).expect("valid params")
}

#[test]
fn test_hash_is_salted() {
    let hasher = cheap_hasher();

    let first = hasher.hash("p@ss1234").unwrap();
    let second = hasher.hash("p@ss1234").unwrap();

    assert_ne!(first, second);
    hasher.verify("p@ss1234", &first).unwrap();
    hasher.verify("p@ss1234", &second).unwrap();
}

#[test]
fn test_wrong_password_is_invalid_credential() {
    let hasher = cheap_hasher();
    let hash = hasher.hash("p@ss1234").unwrap();

    assert!(matches!(
        hasher.verify("p@ss12345", &hash),
        Err(AppError::InvalidCredential)
    ));
}

#[test]
fn test_hash_from_other_params_still_verifies() {
    // 参数记录在哈希串中，调整开销不影响已有哈希
    let old = PasswordHasher::with_params(2048, 2, 1).unwrap();
    let hash = old.hash("p@ss1234").unwrap();

    cheap_hasher().verify("p@ss1234", &hash).unwrap();
}

#[test]
fn test_corrupt_hash_is_internal_error() {
    let result = cheap_hasher().verify("p@ss1234", "$2b$10$legacybcrypthash");
    assert!(matches!(result, Err(AppError::Internal(_))));
}

#[test]
fn test_from_config() {
    let config = create_test_config();
    let hasher = PasswordHasher::from_config(&config).unwrap();

    let hash = hasher.hash("p@ss1234").unwrap();
    assert!(hash.starts_with("$argon2id$"));
    assert!(hash.contains("m=1024,t=1,p=1"));
}

#[test]
fn test_password_policy() {
    let mut config = create_test_config();
    config.security.password_min_length = 8;
    config.security.password_require_uppercase = true;
    config.security.password_require_digit = true;
    config.security.password_require_special = true;

    let check = |pw: &str| PasswordHasher::validate_password_policy(pw, &config);

    assert!(matches!(check("Ab1!"), Err(AppError::Validation(_))));
    assert!(matches!(check("abcdefg1!"), Err(AppError::Validation(_))));
    assert!(matches!(check("Abcdefgh!"), Err(AppError::Validation(_))));
    assert!(matches!(check("Abcdefgh1"), Err(AppError::Validation(_))));
    assert!(check("Abcdefg1!").is_ok());
}

#[tokio::test]
async fn test_async_hash_and_verify() {
    let hasher = cheap_hasher();

    let hash = hasher.hash_async("p@ss1234".to_string()).await.unwrap();
    hasher
        .verify_async("p@ss1234".to_string(), hash.clone())
        .await
        .unwrap();

    assert!(matches!(
        hasher.verify_async("nope".to_string(), hash).await,
        Err(AppError::InvalidCredential)
    ));
}
