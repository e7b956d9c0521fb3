use rand::Rng;
use time::OffsetDateTime;

use super::jwt::TokenService;

/// One-time numeric code and the instant it lapses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Otp {
    pub code: String,
    pub expires_at: OffsetDateTime,
}

impl TokenService {
    /// Digits-only code of `length` characters (leading zeros kept), valid for
    /// the configured OTP TTL. Attempt throttling is the caller's job.
    pub fn generate_otp(&self, length: usize) -> Otp {
        let mut rng = rand::rng();
        let code: String = (0..length)
            .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
            .collect();

        Otp {
            code,
            expires_at: self.now() + self.security().otp_ttl,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use time::macros::datetime;
    use time::Duration;

    use crate::clock::ManualClock;
    use crate::state::security_config::SecurityConfig;

    use super::*;

    #[test]
    fn otp_is_digits_with_configured_expiry() {
        let clock = ManualClock::new(datetime!(2025-05-05 08:00 UTC));
        let svc = TokenService::with_clock(SecurityConfig::new(b"k".to_vec()), Arc::new(clock));

        for length in [1, 6, 12] {
            let otp = svc.generate_otp(length);
            assert_eq!(otp.code.len(), length);
            assert!(otp.code.chars().all(|c| c.is_ascii_digit()));
            assert_eq!(otp.expires_at, datetime!(2025-05-05 08:00 UTC) + Duration::minutes(10));
        }
    }
}
