//! Categorized log sink.
//!
//! The engine reports what it does through a [`Logger`] owned by each
//! instance. Messages are produced lazily: the closure passed to
//! [`Logger::write`] only runs if a registered callback accepts the category
//! or `tracing` has a subscriber listening at `TRACE` level.

use std::fmt;
use std::ops::BitOr;
use std::sync::Arc;

/// Bit set of log categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Categories(u8);

impl Categories {
    pub const NONE: Self = Self(0);
    /// Model and instance construction.
    pub const CREATE: Self = Self(1);
    /// State and region entry and exit.
    pub const ENTRY_EXIT: Self = Self(1 << 1);
    /// Trigger evaluation, delegation and deferral.
    pub const EVALUATE: Self = Self(1 << 2);
    /// Transition traversal.
    pub const TRANSITION: Self = Self(1 << 3);
    pub const ALL: Self = Self(0b1111);

    /// True when every category in `other` is also in `self`.
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// True when `self` and `other` share at least one category.
    pub fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for Categories {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Display for Categories {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (Self::CREATE, "Create"),
            (Self::ENTRY_EXIT, "EntryExit"),
            (Self::EVALUATE, "Evaluate"),
            (Self::TRANSITION, "Transition"),
        ];
        let mut first = true;
        for (category, name) in names {
            if self.contains(category) {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        if first {
            f.write_str("None")?;
        }
        Ok(())
    }
}

/// Handle returned by [`Logger::add`], used to unregister the callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LogId(u64);

/// Callback receiving the category and the formatted message.
pub type LogCallback = Arc<dyn Fn(Categories, &str) + Send + Sync>;

/// Registry of log callbacks filtered by category.
#[derive(Clone, Default)]
pub struct Logger {
    next_id: u64,
    sinks: Vec<(LogId, Categories, LogCallback)>,
}

impl Logger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for the given categories.
    pub fn add<F>(&mut self, callback: F, categories: Categories) -> LogId
    where
        F: Fn(Categories, &str) + Send + Sync + 'static,
    {
        let id = LogId(self.next_id);
        self.next_id += 1;
        self.sinks.push((id, categories, Arc::new(callback)));
        id
    }

    /// Unregister a callback. Returns false if the id was unknown.
    pub fn remove(&mut self, id: LogId) -> bool {
        let before = self.sinks.len();
        self.sinks.retain(|(sink, _, _)| *sink != id);
        self.sinks.len() != before
    }

    /// Whether any registered callback listens to `category`.
    pub fn is_enabled(&self, category: Categories) -> bool {
        self.sinks
            .iter()
            .any(|(_, categories, _)| categories.intersects(category))
    }

    /// Write a message, building it only if someone will read it.
    pub fn write<F>(&self, category: Categories, message: F)
    where
        F: FnOnce() -> String,
    {
        let traced = tracing::enabled!(tracing::Level::TRACE);
        if !traced && !self.is_enabled(category) {
            return;
        }

        let message = message();
        tracing::trace!(category = %category, "{}", message);

        for (_, categories, callback) in &self.sinks {
            if categories.intersects(category) {
                callback(category, &message);
            }
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[test]
    fn categories_combine_and_contain() {
        let mask = Categories::CREATE | Categories::TRANSITION;
        assert!(mask.contains(Categories::CREATE));
        assert!(mask.contains(Categories::TRANSITION));
        assert!(!mask.contains(Categories::EVALUATE));
        assert!(Categories::ALL.contains(mask));
        assert!(!Categories::NONE.intersects(Categories::ALL));
    }

    #[test]
    fn categories_display_names() {
        assert_eq!(Categories::ENTRY_EXIT.to_string(), "EntryExit");
        assert_eq!(
            (Categories::CREATE | Categories::EVALUATE).to_string(),
            "Create|Evaluate"
        );
        assert_eq!(Categories::NONE.to_string(), "None");
    }

    #[test]
    fn write_reaches_matching_callbacks_only() {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let mut logger = Logger::new();

        let sink = Arc::clone(&lines);
        logger.add(
            move |category, message| sink.lock().unwrap().push(format!("{category}: {message}")),
            Categories::TRANSITION,
        );

        logger.write(Categories::TRANSITION, || "a -> b".to_string());
        logger.write(Categories::EVALUATE, || "ignored".to_string());

        let lines = lines.lock().unwrap();
        assert_eq!(lines.as_slice(), ["Transition: a -> b"]);
    }

    #[test]
    fn message_is_not_built_without_listener() {
        let built = AtomicUsize::new(0);
        let mut logger = Logger::new();
        logger.add(|_, _| {}, Categories::CREATE);

        logger.write(Categories::EVALUATE, || {
            built.fetch_add(1, Ordering::SeqCst);
            String::new()
        });

        assert_eq!(built.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn remove_unregisters_callback() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut logger = Logger::new();

        let counter = Arc::clone(&count);
        let id = logger.add(
            move |_, _| {
                counter.fetch_add(1, Ordering::SeqCst);
            },
            Categories::ALL,
        );

        logger.write(Categories::CREATE, || "one".to_string());
        assert!(logger.remove(id));
        assert!(!logger.remove(id));
        logger.write(Categories::CREATE, || "two".to_string());

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!logger.is_enabled(Categories::CREATE));
    }
}
