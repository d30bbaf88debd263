//! Random sources used to break ties between choice transitions.

use rand::Rng;

/// Picks an index in `[0, ceiling)`.
///
/// Only consulted when more than one outgoing transition of a choice
/// pseudo-state matches, so `ceiling` is always at least 2.
pub trait RandomSource: Send {
    fn next(&mut self, ceiling: usize) -> usize;
}

/// Uniform selection backed by the thread-local generator of `rand`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next(&mut self, ceiling: usize) -> usize {
        rand::thread_rng().gen_range(0..ceiling)
    }
}

/// Deterministic source cycling through `0, 1, 2, ...` modulo the ceiling.
#[derive(Clone, Copy, Debug, Default)]
pub struct RoundRobin {
    counter: usize,
}

impl RoundRobin {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RandomSource for RoundRobin {
    fn next(&mut self, ceiling: usize) -> usize {
        let value = self.counter % ceiling;
        self.counter = self.counter.wrapping_add(1);
        value
    }
}

impl<F> RandomSource for F
where
    F: FnMut(usize) -> usize + Send,
{
    fn next(&mut self, ceiling: usize) -> usize {
        self(ceiling)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thread_random_stays_in_range() {
        let mut random = ThreadRandom;
        for _ in 0..200 {
            assert!(random.next(3) < 3);
        }
    }

    #[test]
    fn round_robin_cycles() {
        let mut random = RoundRobin::new();
        let picks: Vec<usize> = (0..6).map(|_| random.next(3)).collect();
        assert_eq!(picks, vec![0, 1, 2, 0, 1, 2]);
    }

    #[test]
    fn closures_are_random_sources() {
        let mut always_last = |ceiling: usize| ceiling - 1;
        assert_eq!(RandomSource::next(&mut always_last, 4), 3);
    }
}
