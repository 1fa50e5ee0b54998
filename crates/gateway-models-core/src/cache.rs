use std::time::{Duration, Instant};

use crate::model::ModelDescriptor;

/// Last successful initial load, reusable while younger than `ttl`.
#[derive(Debug)]
pub struct Revalidating {
    ttl: Duration,
    entry: Option<(Instant, Vec<ModelDescriptor>)>,
}

impl Revalidating {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entry: None }
    }

    pub fn fresh(&self, now: Instant) -> Option<&[ModelDescriptor]> {
        let (at, models) = self.entry.as_ref()?;
        (now.saturating_duration_since(*at) < self.ttl).then_some(models.as_slice())
    }

    pub fn store(&mut self, now: Instant, models: Vec<ModelDescriptor>) {
        self.entry = Some((now, models));
    }
}
