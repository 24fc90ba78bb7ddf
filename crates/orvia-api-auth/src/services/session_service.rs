//! Session token lifecycle.
//!
//! Issues opaque bearer tokens, validates them with in-window rotation, and
//! handles login (including the two-factor path), account creation, logout,
//! and forced logout on password reset.

use std::collections::HashMap;
use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Duration, Utc};
use futures::FutureExt;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use orvia_auth::{append_attributes, codes_match, generate_token, ClientKeySigner, PasswordHasher};
use orvia_db::models::{
    Account, AccountEmail, AccountEvent, AccountPhone, AccountStatus, AccountType, AuthToken,
    ContactStatus, NewAccount, NewAccountEmail, NewAccountPhone, NewAuthToken, TwoFactorLogin,
    VerificationCode, VerificationCodeType,
};
use orvia_db::transact;

use crate::error::ApiAuthError;
use crate::services::session_state::{
    session_state, should_rotate, two_factor_window_elapsed, SESSION_TTL_DAYS, SHADOW_TTL_SECS,
};
use crate::services::settings::SettingsClient;
use crate::services::validation::{normalize_email, normalize_phone};
use crate::services::verification_service::{
    parse_account_value, redeem_code, VerificationService,
};

/// A token as handed to the client: plain value, expiry, and the base64
/// client encryption key.
#[derive(Debug, Clone)]
pub struct AuthTokenDetails {
    pub value: String,
    pub expiration_epoch: i64,
    pub client_encryption_key: String,
}

/// Outcome of a password login.
#[derive(Debug)]
pub enum LoginOutcome {
    /// Credentials accepted, session issued.
    Success {
        token: AuthTokenDetails,
        account: Account,
    },
    /// Credentials accepted but the device must complete a code challenge.
    TwoFactorRequired {
        phone_number: String,
        verification_token: String,
        expiration_epoch: i64,
    },
}

/// Fields for account creation, already shaped by request validation.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
    pub account_type: AccountType,
    pub token_attributes: HashMap<String, String>,
}

pub struct SessionService {
    pool: PgPool,
    hasher: PasswordHasher,
    signer: ClientKeySigner,
    settings: Arc<dyn SettingsClient>,
    verification: Arc<VerificationService>,
}

impl SessionService {
    #[must_use]
    pub fn new(
        pool: PgPool,
        hasher: PasswordHasher,
        signer: ClientKeySigner,
        settings: Arc<dyn SettingsClient>,
        verification: Arc<VerificationService>,
    ) -> Self {
        Self {
            pool,
            hasher,
            signer,
            settings,
            verification,
        }
    }

    /// Password login. Issues a session directly, or a two-factor challenge
    /// when the account has 2FA enabled and the device is not trusted.
    pub async fn authenticate_login(
        &self,
        email: &str,
        password: &str,
        device_id: &str,
        token_attributes: HashMap<String, String>,
    ) -> Result<LoginOutcome, ApiAuthError> {
        let email = normalize_email(email)?;
        let account = Account::find_by_email(&self.pool, &email)
            .await?
            .ok_or_else(|| ApiAuthError::EmailNotFound(email.clone()))?;
        if !self.hasher.verify(password, &account.password)? {
            return Err(ApiAuthError::BadPassword);
        }
        if !account.is_active() {
            return Err(ApiAuthError::AccountInactive);
        }

        let requires_two_factor = self.settings.two_factor_enabled(account.id).await?
            && self.device_needs_two_factor(account.id, device_id).await;

        if requires_two_factor {
            let phone_id = account.primary_phone_id.ok_or_else(|| {
                ApiAuthError::Internal(format!("account {} has no primary phone", account.id))
            })?;
            let phone = AccountPhone::find_by_id(&self.pool, phone_id)
                .await?
                .ok_or_else(|| {
                    ApiAuthError::Internal(format!("primary phone row {phone_id} is missing"))
                })?;
            let challenge = self
                .verification
                .issue(&account.id.to_string(), VerificationCodeType::Account2fa)
                .await?;
            return Ok(LoginOutcome::TwoFactorRequired {
                phone_number: phone.phone_number,
                verification_token: challenge.token,
                expiration_epoch: challenge.expiration_epoch,
            });
        }

        let signer = self.signer.clone();
        let account_id = account.id;
        let token = transact(&self.pool, move |conn| {
            async move { insert_token(conn, &signer, account_id, &token_attributes).await }.boxed()
        })
        .await?;
        Ok(LoginOutcome::Success { token, account })
    }

    /// Redeem a two-factor challenge and issue the session in the same
    /// transaction.
    pub async fn login_with_code(
        &self,
        verification_token: &str,
        code: &str,
        device_id: &str,
        token_attributes: HashMap<String, String>,
    ) -> Result<(AuthTokenDetails, Account), ApiAuthError> {
        let signer = self.signer.clone();
        let verification_token = verification_token.to_string();
        let code = code.to_string();
        let (token, account) = transact(&self.pool, move |conn| {
            async move {
                let verification = redeem_code(
                    &mut *conn,
                    &verification_token,
                    &code,
                    Some(VerificationCodeType::Account2fa),
                    Utc::now(),
                )
                .await?;
                let account_id = parse_account_value(&verification.verified_value)?;
                // The account may have been suspended between the challenge
                // and the redemption; re-check before issuing anything.
                let account = Account::find_by_id(&mut *conn, account_id)
                    .await?
                    .ok_or(ApiAuthError::AccountNotFound)?;
                if !account.is_active() {
                    return Err(ApiAuthError::AccountInactive);
                }
                let token = insert_token(&mut *conn, &signer, account_id, &token_attributes).await?;
                Ok::<_, ApiAuthError>((token, account))
            }
            .boxed()
        })
        .await?;

        // Trust the device for the next window. Failure here must not undo a
        // successful login.
        if let Err(err) =
            TwoFactorLogin::upsert(&self.pool, account.id, device_id, Utc::now()).await
        {
            tracing::error!(
                account_id = %account.id,
                device_id = %device_id,
                error = %err,
                "failed to record two factor login"
            );
        }

        Ok((token, account))
    }

    /// Validate a bearer token, rotating it when it is inside the refresh
    /// window. Returns `None` for unknown, expired, or inactive-account
    /// tokens.
    pub async fn check_authentication(
        &self,
        token: &str,
        token_attributes: HashMap<String, String>,
    ) -> Result<Option<(AuthTokenDetails, Account)>, ApiAuthError> {
        let attributed = append_attributes(token, &token_attributes)?;
        let plain = token.to_string();

        transact(&self.pool, move |conn| {
            async move {
                let now = Utc::now();
                // Locked so concurrent checks cannot both rotate the row.
                let Some(row) = AuthToken::find_valid_for_update(&mut *conn, &attributed, now).await?
                else {
                    return Ok(None);
                };

                let mut details = AuthTokenDetails {
                    value: plain,
                    expiration_epoch: row.expires_at.timestamp(),
                    client_encryption_key: STANDARD.encode(&row.client_encryption_key),
                };

                let state = session_state(row.created_at, row.expires_at, now);
                if should_rotate(row.shadow, state) {
                    details = rotate_token(&mut *conn, &row, &token_attributes, now).await?;
                }

                let account = Account::find_by_id(&mut *conn, row.account_id)
                    .await?
                    .ok_or(ApiAuthError::AccountNotFound)?;
                if !account.is_active() {
                    return Ok(None);
                }
                Ok(Some((details, account)))
            }
            .boxed()
        })
        .await
    }

    /// Create an account with its primary contact rows and first session,
    /// all in one transaction.
    pub async fn create_account(
        &self,
        input: CreateAccountInput,
    ) -> Result<(AuthTokenDetails, Account), ApiAuthError> {
        let email = normalize_email(&input.email)?;
        let phone_number = normalize_phone(&input.phone_number)?;

        // Detects the duplicate up front; the unique index still backstops a
        // race between two concurrent signups.
        if AccountEmail::exists_active(&self.pool, &email).await? {
            return Err(ApiAuthError::DuplicateEmail(email));
        }

        let password_hash = self.hasher.hash(&input.password)?;
        let signer = self.signer.clone();
        transact(&self.pool, move |conn| {
            async move {
                let account = Account::create(
                    &mut *conn,
                    NewAccount {
                        id: None,
                        first_name: input.first_name,
                        last_name: input.last_name,
                        password: password_hash,
                        status: AccountStatus::Active,
                        account_type: input.account_type,
                    },
                )
                .await?;

                let email_row = AccountEmail::create(
                    &mut *conn,
                    NewAccountEmail {
                        account_id: account.id,
                        email,
                        status: ContactStatus::Active,
                        verified: false,
                    },
                )
                .await?;
                let phone_row = AccountPhone::create(
                    &mut *conn,
                    NewAccountPhone {
                        account_id: account.id,
                        phone_number,
                        status: ContactStatus::Active,
                        verified: false,
                    },
                )
                .await?;

                let affected = Account::update_primary_contacts(
                    &mut *conn,
                    account.id,
                    email_row.id,
                    phone_row.id,
                )
                .await?;
                if affected != 1 {
                    return Err(ApiAuthError::Internal(format!(
                        "expected 1 row to be affected but got {affected}"
                    )));
                }
                AccountEvent::create(&mut *conn, account.id, "account_created").await?;

                let token =
                    insert_token(&mut *conn, &signer, account.id, &input.token_attributes).await?;
                let account = Account::find_by_id(&mut *conn, account.id)
                    .await?
                    .ok_or(ApiAuthError::AccountNotFound)?;
                Ok((token, account))
            }
            .boxed()
        })
        .await
    }

    /// Complete a password reset: re-validate the code, replace the hash,
    /// and revoke every session. One transaction; a failure anywhere leaves
    /// the old password and sessions intact.
    pub async fn update_password(
        &self,
        verification_token: &str,
        code: &str,
        new_password: &str,
    ) -> Result<(), ApiAuthError> {
        let password_hash = self.hasher.hash(new_password)?;
        let verification_token = verification_token.to_string();
        let code = code.to_string();
        transact(&self.pool, move |conn| {
            async move {
                // The reset token was typically consumed by the check step
                // already, so only the code, type, and expiry gate here.
                let verification = VerificationCode::find_by_token(&mut *conn, &verification_token)
                    .await?
                    .ok_or(ApiAuthError::CodeNotFound)?;
                if verification.verification_type != VerificationCodeType::PasswordReset {
                    return Err(ApiAuthError::CodeNotFound);
                }
                if !codes_match(&code, &verification.code) {
                    return Err(ApiAuthError::BadVerificationCode);
                }
                if verification.is_expired(Utc::now()) {
                    return Err(ApiAuthError::VerificationCodeExpired);
                }
                VerificationCode::consume(&mut *conn, &verification_token).await?;
                let account_id = parse_account_value(&verification.verified_value)?;

                let affected =
                    Account::update_password(&mut *conn, account_id, &password_hash).await?;
                if affected != 1 {
                    return Err(ApiAuthError::Internal(format!(
                        "expected 1 row to be affected but got {affected}"
                    )));
                }

                let revoked = AuthToken::delete_all_for_account(&mut *conn, account_id).await?;
                tracing::info!(
                    account_id = %account_id,
                    revoked_sessions = revoked,
                    "password reset completed"
                );
                AccountEvent::create(&mut *conn, account_id, "password_reset").await?;
                Ok::<_, ApiAuthError>(())
            }
            .boxed()
        })
        .await
    }

    /// Delete the session for a bearer token.
    pub async fn unauthenticate(
        &self,
        token: &str,
        token_attributes: HashMap<String, String>,
    ) -> Result<(), ApiAuthError> {
        let attributed = append_attributes(token, &token_attributes)?;
        let affected = AuthToken::delete(&self.pool, &attributed).await?;
        if affected != 1 {
            return Err(ApiAuthError::Internal(format!(
                "expected 1 row to be affected but got {affected}"
            )));
        }
        Ok(())
    }

    pub async fn get_account(&self, id: Uuid) -> Result<Account, ApiAuthError> {
        Account::find_by_id(&self.pool, id)
            .await?
            .ok_or(ApiAuthError::AccountNotFound)
    }

    pub async fn account_for_email(&self, email: &str) -> Result<Account, ApiAuthError> {
        let email = normalize_email(email)?;
        Account::find_by_email(&self.pool, &email)
            .await?
            .ok_or(ApiAuthError::EmailNotFound(email))
    }

    /// Whether this device must complete a two-factor challenge. Unexpected
    /// lookup failures fail closed.
    async fn device_needs_two_factor(&self, account_id: Uuid, device_id: &str) -> bool {
        match TwoFactorLogin::find(&self.pool, account_id, device_id).await {
            Ok(Some(login)) => two_factor_window_elapsed(login.last_login, Utc::now()),
            Ok(None) => true,
            Err(err) => {
                tracing::error!(
                    account_id = %account_id,
                    device_id = %device_id,
                    error = %err,
                    "two factor login lookup failed, requiring challenge"
                );
                true
            }
        }
    }
}

/// Mint a token, derive its client key, and insert the non-shadow row.
async fn insert_token(
    conn: &mut PgConnection,
    signer: &ClientKeySigner,
    account_id: Uuid,
    token_attributes: &HashMap<String, String>,
) -> Result<AuthTokenDetails, ApiAuthError> {
    let token = generate_token();
    let attributed = append_attributes(&token, token_attributes)?;
    // The key is derived from the bare token and stays with the session for
    // its whole life, rotations included.
    let key = signer.derive_key(&token)?;
    let now = Utc::now();
    let expires_at = now + Duration::days(SESSION_TTL_DAYS);

    AuthToken::create(
        conn,
        NewAuthToken {
            token: attributed,
            client_encryption_key: key.clone(),
            account_id,
            created_at: now,
            expires_at,
            shadow: false,
        },
    )
    .await?;

    Ok(AuthTokenDetails {
        value: token,
        expiration_epoch: expires_at.timestamp(),
        client_encryption_key: STANDARD.encode(key),
    })
}

/// Rotate a locked row in place and leave a shadow copy of the old value so
/// requests already carrying it keep working briefly.
async fn rotate_token(
    conn: &mut PgConnection,
    row: &AuthToken,
    token_attributes: &HashMap<String, String>,
    now: DateTime<Utc>,
) -> Result<AuthTokenDetails, ApiAuthError> {
    let new_token = generate_token();
    let new_attributed = append_attributes(&new_token, token_attributes)?;
    let new_expires_at = now + Duration::days(SESSION_TTL_DAYS);

    // Update in place so created_at keeps anchoring the lifecycle ceiling.
    // The row is locked, so anything but one affected row is an invariant
    // violation.
    let affected =
        AuthToken::rotate_in_place(&mut *conn, &row.token, &new_attributed, new_expires_at).await?;
    if affected != 1 {
        return Err(ApiAuthError::Internal(format!(
            "expected 1 row to be affected but got {affected}"
        )));
    }
    AuthToken::create(
        &mut *conn,
        NewAuthToken {
            token: row.token.clone(),
            client_encryption_key: row.client_encryption_key.clone(),
            account_id: row.account_id,
            created_at: now,
            expires_at: now + Duration::seconds(SHADOW_TTL_SECS),
            shadow: true,
        },
    )
    .await?;

    Ok(AuthTokenDetails {
        value: new_token,
        expiration_epoch: new_expires_at.timestamp(),
        client_encryption_key: STANDARD.encode(&row.client_encryption_key),
    })
}
