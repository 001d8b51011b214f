use std::fmt;

/// A phone number keyed as `<dialing prefix><digits>`.
///
/// The digits are taken verbatim: no trimming, length or checksum checks. A
/// caller entering the wrong digits simply produces a key that matches
/// nothing stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn normalize(prefix: &str, digits: &str) -> Self {
        Self(format!("{prefix}{digits}"))
    }

    /// Wraps an already-normalized key, e.g. a configured seed entry.
    pub fn from_normalized(value: &str) -> Self {
        Self(value.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
