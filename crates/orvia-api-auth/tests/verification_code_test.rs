//! Integration tests for verification codes, two-factor login, and password
//! reset.
//!
//! Run with: `cargo test -p orvia-api-auth --features integration`

mod common;

#[cfg(feature = "integration")]
mod verification_codes {
    use super::common::*;
    use std::collections::HashMap;

    use chrono::{Duration, Utc};
    use orvia_api_auth::error::ApiAuthError;
    use orvia_api_auth::services::{CreateAccountInput, LoginOutcome};
    use orvia_db::models::{
        AccountEvent, AccountStatus, AccountType, TwoFactorLogin, VerificationCodeType,
    };

    async fn signup(services: &TestServices, email: &str) -> uuid::Uuid {
        let (_, account) = services
            .session
            .create_account(CreateAccountInput {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                email: email.to_string(),
                phone_number: "555-123-4567".to_string(),
                password: test_password().to_string(),
                account_type: AccountType::Patient,
                token_attributes: HashMap::new(),
            })
            .await
            .expect("signup should succeed");
        account.id
    }

    #[tokio::test]
    async fn issue_and_redeem_round_trip() {
        let services = test_services(false).await;
        let issued = services
            .verification
            .issue("ada@example.com", VerificationCodeType::Email)
            .await
            .expect("issue should succeed");
        assert_eq!(issued.code.len(), 6);

        let redeemed = services
            .verification
            .redeem(&issued.token, &issued.code, None)
            .await
            .expect("redeem should succeed");
        assert_eq!(redeemed.verified_value, "ada@example.com");
    }

    #[tokio::test]
    async fn second_redemption_fails() {
        let services = test_services(false).await;
        let issued = services
            .verification
            .issue("ada@example.com", VerificationCodeType::Email)
            .await
            .expect("issue should succeed");

        services
            .verification
            .redeem(&issued.token, &issued.code, None)
            .await
            .expect("first redemption should succeed");
        let err = services
            .verification
            .redeem(&issued.token, &issued.code, None)
            .await
            .expect_err("second redemption should fail");
        assert!(matches!(err, ApiAuthError::CodeAlreadyConsumed));
    }

    #[tokio::test]
    async fn wrong_code_is_rejected_without_consuming() {
        let services = test_services(false).await;
        let issued = services
            .verification
            .issue("+15551234567", VerificationCodeType::Phone)
            .await
            .expect("issue should succeed");

        let wrong = if issued.code == "000000" { "000001" } else { "000000" };
        let err = services
            .verification
            .redeem(&issued.token, wrong, None)
            .await
            .expect_err("wrong code should fail");
        assert!(matches!(err, ApiAuthError::BadVerificationCode));

        // The failed attempt did not burn the code.
        services
            .verification
            .redeem(&issued.token, &issued.code, None)
            .await
            .expect("correct code should still redeem");
    }

    #[tokio::test]
    async fn expired_code_is_gone() {
        let services = test_services(false).await;
        let issued = services
            .verification
            .issue("ada@example.com", VerificationCodeType::Email)
            .await
            .expect("issue should succeed");
        expire_code(&services.pool, &issued.token).await;

        let err = services
            .verification
            .redeem(&issued.token, &issued.code, None)
            .await
            .expect_err("expired code should fail");
        assert!(matches!(err, ApiAuthError::VerificationCodeExpired));
    }

    #[tokio::test]
    async fn verified_value_requires_consumption() {
        let services = test_services(false).await;
        let issued = services
            .verification
            .issue("ada@example.com", VerificationCodeType::Email)
            .await
            .expect("issue should succeed");

        let err = services
            .verification
            .verified_value(&issued.token)
            .await
            .expect_err("unconsumed code should not reveal its value");
        assert!(matches!(err, ApiAuthError::NotYetVerified));

        services
            .verification
            .redeem(&issued.token, &issued.code, None)
            .await
            .expect("redeem should succeed");
        let value = services
            .verification
            .verified_value(&issued.token)
            .await
            .expect("consumed code should reveal its value");
        assert_eq!(value, "ada@example.com");
    }

    #[tokio::test]
    async fn two_factor_login_round_trip() {
        let services = test_services(true).await;
        let email = unique_email();
        let account_id = signup(&services, &email).await;

        let outcome = services
            .session
            .authenticate_login(&email, test_password(), "device-1", HashMap::new())
            .await
            .expect("login should succeed");
        let LoginOutcome::TwoFactorRequired {
            phone_number,
            verification_token,
            ..
        } = outcome
        else {
            panic!("expected a two-factor challenge");
        };
        assert_eq!(phone_number, "+15551234567");

        let code: (String,) =
            sqlx::query_as("SELECT code FROM verification_codes WHERE token = $1")
                .bind(&verification_token)
                .fetch_one(&services.pool)
                .await
                .expect("challenge code should exist");

        let (token, account) = services
            .session
            .login_with_code(&verification_token, &code.0, "device-1", HashMap::new())
            .await
            .expect("code login should succeed");
        assert_eq!(account.id, account_id);
        assert!(services
            .session
            .check_authentication(&token.value, HashMap::new())
            .await
            .expect("check should succeed")
            .is_some());

        // The device is now trusted, so the next login skips the challenge.
        let outcome = services
            .session
            .authenticate_login(&email, test_password(), "device-1", HashMap::new())
            .await
            .expect("login should succeed");
        assert!(matches!(outcome, LoginOutcome::Success { .. }));
    }

    #[tokio::test]
    async fn suspension_between_challenge_and_code_login_blocks_issuance() {
        let services = test_services(true).await;
        let email = unique_email();
        let account_id = signup(&services, &email).await;

        let outcome = services
            .session
            .authenticate_login(&email, test_password(), "device-1", HashMap::new())
            .await
            .expect("login should succeed");
        let LoginOutcome::TwoFactorRequired {
            verification_token, ..
        } = outcome
        else {
            panic!("expected a two-factor challenge");
        };

        sqlx::query("UPDATE accounts SET status = $2 WHERE id = $1")
            .bind(account_id)
            .bind(AccountStatus::Suspended.as_str())
            .execute(&services.pool)
            .await
            .expect("suspend should succeed");

        let code: (String,) =
            sqlx::query_as("SELECT code FROM verification_codes WHERE token = $1")
                .bind(&verification_token)
                .fetch_one(&services.pool)
                .await
                .expect("challenge code should exist");

        let err = services
            .session
            .login_with_code(&verification_token, &code.0, "device-1", HashMap::new())
            .await
            .expect_err("code login should fail for a suspended account");
        assert!(matches!(err, ApiAuthError::AccountInactive));

        // The rejected login committed nothing.
        let sessions: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM auth_tokens WHERE account_id = $1")
                .bind(account_id)
                .fetch_one(&services.pool)
                .await
                .expect("count should succeed");
        assert_eq!(sessions.0, 0);
    }

    #[tokio::test]
    async fn stale_device_trust_forces_new_challenge() {
        let services = test_services(true).await;
        let email = unique_email();
        let account_id = signup(&services, &email).await;

        TwoFactorLogin::upsert(
            &services.pool,
            account_id,
            "device-old",
            Utc::now() - Duration::days(31),
        )
        .await
        .expect("upsert should succeed");

        let outcome = services
            .session
            .authenticate_login(&email, test_password(), "device-old", HashMap::new())
            .await
            .expect("login should succeed");
        assert!(matches!(outcome, LoginOutcome::TwoFactorRequired { .. }));
    }

    #[tokio::test]
    async fn password_reset_revokes_all_sessions() {
        let services = test_services(false).await;
        let email = unique_email();
        let account_id = signup(&services, &email).await;

        // Two live sessions.
        let mut tokens = Vec::new();
        for _ in 0..2 {
            let outcome = services
                .session
                .authenticate_login(&email, test_password(), "device-1", HashMap::new())
                .await
                .expect("login should succeed");
            let LoginOutcome::Success { token, .. } = outcome else {
                panic!("2FA disabled in this fixture");
            };
            tokens.push(token);
        }

        let account = services
            .session
            .account_for_email(&email)
            .await
            .expect("account should exist");
        let issued = services
            .verification
            .issue(&account.id.to_string(), VerificationCodeType::PasswordReset)
            .await
            .expect("issue should succeed");

        let context = services
            .verification
            .check_password_reset(&issued.token)
            .await
            .expect("check should succeed");
        assert_eq!(context.account_id, account_id);
        assert_eq!(context.account_email, email);
        assert_eq!(context.account_phone_number, "+15551234567");

        services
            .session
            .update_password(&issued.token, &issued.code, "a brand new password")
            .await
            .expect("password update should succeed");

        // Every prior session is gone.
        for token in tokens {
            assert!(services
                .session
                .check_authentication(&token.value, HashMap::new())
                .await
                .expect("check should succeed")
                .is_none());
        }

        // The reset left an audit trail alongside the signup event.
        let events = AccountEvent::find_by_account(&services.pool, account_id)
            .await
            .expect("event lookup should succeed");
        assert!(events.iter().any(|e| e.event == "password_reset"));
        assert!(events.iter().any(|e| e.event == "account_created"));

        // Old password out, new password in.
        assert!(matches!(
            services
                .session
                .authenticate_login(&email, test_password(), "device-1", HashMap::new())
                .await,
            Err(ApiAuthError::BadPassword)
        ));
        assert!(services
            .session
            .authenticate_login(&email, "a brand new password", "device-1", HashMap::new())
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn password_reset_with_wrong_code_changes_nothing() {
        let services = test_services(false).await;
        let email = unique_email();
        signup(&services, &email).await;

        let account = services
            .session
            .account_for_email(&email)
            .await
            .expect("account should exist");
        let issued = services
            .verification
            .issue(&account.id.to_string(), VerificationCodeType::PasswordReset)
            .await
            .expect("issue should succeed");

        let wrong = if issued.code == "000000" { "000001" } else { "000000" };
        let err = services
            .session
            .update_password(&issued.token, wrong, "new password")
            .await
            .expect_err("wrong code should fail");
        assert!(matches!(err, ApiAuthError::BadVerificationCode));

        assert!(services
            .session
            .authenticate_login(&email, test_password(), "device-1", HashMap::new())
            .await
            .is_ok());
    }
}
