//! Pure session lifecycle logic.
//!
//! All timing decisions live here as functions of an explicit `now`, so the
//! boundary semantics are pinned by unit tests without a database.

use chrono::{DateTime, Duration, Utc};

/// How long a freshly issued or rotated token lives.
pub const SESSION_TTL_DAYS: i64 = 4;

/// Window before expiry in which a check rotates the token.
pub const REFRESH_WINDOW_SECS: i64 = 3600;

/// Hard ceiling on a session's life, measured from first issuance.
pub const MAX_LIFECYCLE_DAYS: i64 = 30;

/// Grace period for the old token value after rotation.
pub const SHADOW_TTL_SECS: i64 = 300;

/// Window during which a device that completed a two-factor challenge may
/// skip the next one.
pub const TWO_FACTOR_TRUST_DAYS: i64 = 30;

/// Lifecycle state of a non-shadow session row at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Usable, outside the refresh window.
    Fresh,
    /// Usable and due for rotation on the next check.
    RefreshEligible,
    /// Usable but past the lifecycle ceiling; never rotated again.
    LifecycleExpired,
    /// No longer usable.
    Expired,
}

/// Classify a session row at `now`.
#[must_use]
pub fn session_state(
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> SessionState {
    if now >= expires_at {
        return SessionState::Expired;
    }
    if now - created_at >= Duration::days(MAX_LIFECYCLE_DAYS) {
        return SessionState::LifecycleExpired;
    }
    if now >= expires_at - Duration::seconds(REFRESH_WINDOW_SECS) {
        return SessionState::RefreshEligible;
    }
    SessionState::Fresh
}

/// Whether a check should rotate the token. Shadow rows never rotate.
#[must_use]
pub fn should_rotate(shadow: bool, state: SessionState) -> bool {
    !shadow && state == SessionState::RefreshEligible
}

/// Whether a device's last two-factor login has aged out of the trust
/// window, forcing a new challenge.
#[must_use]
pub fn two_factor_window_elapsed(last_login: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    last_login + Duration::days(TWO_FACTOR_TRUST_DAYS) < now
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(created_offset: Duration, expires_offset: Duration) -> SessionState {
        let now = Utc::now();
        session_state(now - created_offset, now + expires_offset, now)
    }

    #[test]
    fn fresh_outside_refresh_window() {
        assert_eq!(
            at(Duration::hours(1), Duration::days(4)),
            SessionState::Fresh
        );
    }

    #[test]
    fn refresh_eligible_inside_window() {
        assert_eq!(
            at(Duration::days(3), Duration::minutes(30)),
            SessionState::RefreshEligible
        );
    }

    #[test]
    fn window_entry_boundary_is_eligible() {
        let now = Utc::now();
        let expires = now + Duration::seconds(REFRESH_WINDOW_SECS);
        assert_eq!(
            session_state(now - Duration::days(1), expires, now),
            SessionState::RefreshEligible
        );
        assert_eq!(
            session_state(now - Duration::days(1), expires + Duration::seconds(1), now),
            SessionState::Fresh
        );
    }

    #[test]
    fn expired_at_expiry_instant() {
        let now = Utc::now();
        assert_eq!(
            session_state(now - Duration::days(1), now, now),
            SessionState::Expired
        );
    }

    #[test]
    fn lifecycle_ceiling_blocks_rotation() {
        assert_eq!(
            at(Duration::days(31), Duration::minutes(30)),
            SessionState::LifecycleExpired
        );
    }

    #[test]
    fn lifecycle_boundary_instant_already_blocks() {
        let now = Utc::now();
        let created = now - Duration::days(MAX_LIFECYCLE_DAYS);
        assert_eq!(
            session_state(created, now + Duration::minutes(30), now),
            SessionState::LifecycleExpired
        );
        assert_eq!(
            session_state(
                created + Duration::seconds(1),
                now + Duration::minutes(30),
                now
            ),
            SessionState::RefreshEligible
        );
    }

    #[test]
    fn expiry_wins_over_lifecycle() {
        let now = Utc::now();
        assert_eq!(
            session_state(now - Duration::days(40), now - Duration::hours(1), now),
            SessionState::Expired
        );
    }

    #[test]
    fn shadow_rows_never_rotate() {
        assert!(should_rotate(false, SessionState::RefreshEligible));
        assert!(!should_rotate(true, SessionState::RefreshEligible));
        assert!(!should_rotate(false, SessionState::Fresh));
        assert!(!should_rotate(false, SessionState::LifecycleExpired));
        assert!(!should_rotate(false, SessionState::Expired));
    }

    #[test]
    fn two_factor_trust_window() {
        let now = Utc::now();
        assert!(!two_factor_window_elapsed(now, now));
        assert!(!two_factor_window_elapsed(now - Duration::days(29), now));
        assert!(two_factor_window_elapsed(now - Duration::days(31), now));
    }
}
