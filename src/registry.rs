use std::collections::HashSet;

use parking_lot::RwLock;

use crate::domain::PhoneNumber;

/// Process-lifetime denylist of reported scam numbers.
///
/// Every lookup and insert takes the lock, so a concurrent `report` and
/// `is_known_scam` on the same number are linearizable. Contents are lost on
/// restart.
#[derive(Debug)]
pub struct NumberRegistry {
    prefix: String,
    numbers: RwLock<HashSet<PhoneNumber>>,
}

impl NumberRegistry {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            numbers: RwLock::new(HashSet::new()),
        }
    }

    /// Creates a registry preloaded with already-normalized numbers.
    pub fn with_seed<I, S>(prefix: impl Into<String>, seed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let registry = Self::new(prefix);
        registry
            .numbers
            .write()
            .extend(seed.into_iter().map(|raw| PhoneNumber::from_normalized(raw.as_ref())));
        registry
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn normalize(&self, digits: &str) -> PhoneNumber {
        PhoneNumber::normalize(&self.prefix, digits)
    }

    pub fn is_known_scam(&self, digits: &str) -> bool {
        let number = self.normalize(digits);
        self.numbers.read().contains(&number)
    }

    /// Records `digits` as a scam number. Returns `false` when it was already known.
    pub fn report(&self, digits: &str) -> bool {
        let number = self.normalize(digits);
        let inserted = self.numbers.write().insert(number.clone());
        tracing::info!(
            target: "registry",
            number = %number,
            inserted,
            "scam number reported"
        );
        inserted
    }

    pub fn len(&self) -> usize {
        self.numbers.read().len()
    }
}
