use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Source of the current time for token expiry and ID token checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> SystemTime;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> SystemTime {
        (**self).now()
    }
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// A clock frozen at one instant. Useful for deterministic tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub SystemTime);

impl FixedClock {
    /// # Panics
    ///
    /// Panics if `secs` is past the latest time the platform can represent.
    /// Use [`FixedClock::checked_from_unix_secs`] for untrusted input.
    pub fn from_unix_secs(secs: u64) -> Self {
        Self(UNIX_EPOCH + Duration::from_secs(secs))
    }

    pub fn checked_from_unix_secs(secs: u64) -> Option<Self> {
        UNIX_EPOCH.checked_add(Duration::from_secs(secs)).map(Self)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> SystemTime {
        self.0
    }
}

/// Seconds since the Unix epoch, clamped to zero for pre-epoch times.
pub(crate) fn unix_secs(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
