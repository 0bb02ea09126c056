use std::time::{Duration, Instant};

/// Weather is refreshed at most every 15 minutes to go easy on wttr.in.
pub const WEATHER_TTL: Duration = Duration::from_secs(15 * 60);
pub const LOCATION_TTL: Duration = Duration::from_secs(60 * 60);

/// A single value that expires `ttl` after it was stored.
#[derive(Debug, Clone)]
pub struct TtlCache<T> {
    ttl: Duration,
    entry: Option<(Instant, T)>,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entry: None }
    }

    /// The cached value, if it was stored less than `ttl` before `now`.
    pub fn get(&self, now: Instant) -> Option<T> {
        let (stored, value) = self.entry.as_ref()?;
        (now.saturating_duration_since(*stored) < self.ttl).then(|| value.clone())
    }

    pub fn insert(&mut self, value: T, now: Instant) {
        self.entry = Some((now, value));
    }
}
