use baixas_core::{AppError, AppResult};

/// Retention applied when a company never configured one.
const DEFAULT_RETENTION_DAYS: u32 = 30;

/// Upper bound for configurable retention (ten years).
const MAX_RETENTION_DAYS: u32 = 3650;

/// Seconds in one retention day.
const SECONDS_PER_DAY: u64 = 86_400;

/// Per-company number of days a write-off record is kept before expiring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    ttl_days: u32,
}

impl RetentionPolicy {
    /// Creates a validated retention policy.
    pub fn new(ttl_days: i64) -> AppResult<Self> {
        let ttl_days = u32::try_from(ttl_days)
            .ok()
            .filter(|days| (1..=MAX_RETENTION_DAYS).contains(days))
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "field 'dias_expiracao' must be between 1 and {MAX_RETENTION_DAYS}, got {ttl_days}"
                ))
            })?;

        Ok(Self { ttl_days })
    }

    /// Returns the configured number of days.
    #[must_use]
    pub fn ttl_days(&self) -> u32 {
        self.ttl_days
    }

    /// Returns the expiry, in seconds, applied to records written under this policy.
    #[must_use]
    pub fn ttl_seconds(&self) -> u64 {
        u64::from(self.ttl_days) * SECONDS_PER_DAY
    }
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            ttl_days: DEFAULT_RETENTION_DAYS,
        }
    }
}
