//! Collaborators injected into each instance.

use super::log::Logger;
use super::random::{RandomSource, ThreadRandom};
use std::fmt;

/// Logging and randomness used by an [`Instance`](super::Instance).
///
/// Passing these explicitly keeps instances independent of each other:
/// tests can swap in a deterministic random source without touching
/// global state.
pub struct Environment {
    pub logger: Logger,
    pub random: Box<dyn RandomSource>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_random<R>(mut self, random: R) -> Self
    where
        R: RandomSource + 'static,
    {
        self.random = Box::new(random);
        self
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            logger: Logger::new(),
            random: Box::new(ThreadRandom),
        }
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("logger", &self.logger)
            .finish_non_exhaustive()
    }
}
