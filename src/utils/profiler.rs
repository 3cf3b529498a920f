use std::time::Instant;

/// Drop guard that reports how long a scope took at `trace` level.
pub struct ScopeTimer {
    name: &'static str,
    start: Instant,
}

impl ScopeTimer {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            start: Instant::now(),
        }
    }
}

impl Drop for ScopeTimer {
    fn drop(&mut self) {
        log::trace!("[TIMER] {} took {:?}", self.name, self.start.elapsed());
    }
}
