//! Security-relevant events, logged with a stable `event` field.

use tracing::warn;

use crate::logging::pii::Redacted;

pub fn login_failed(reason: &str, email: Option<&str>) {
    warn!(
        event = "SECURITY_LOGIN_FAILED",
        email = %Redacted(email.unwrap_or_default()),
        reason,
        "Authentication failure"
    );
}

pub fn token_rejected(reason: &str) {
    warn!(event = "SECURITY_TOKEN_REJECTED", reason, "Bearer token rejected");
}

pub fn oauth_state_rejected(state: &str) {
    warn!(
        event = "SECURITY_OAUTH_STATE_REJECTED",
        state = %Redacted(state),
        "OAuth state unknown, expired or already used"
    );
}
