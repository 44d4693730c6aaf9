use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Number of leading characters left visible when a masked value is printed.
const VISIBLE_PREFIX: usize = 3;

/// Wraps a client identity signal (address, fingerprint) so that `Debug` and
/// `Display` only ever show a short prefix. Serialization still emits the real
/// value; the wrapper exists to keep raw identities out of `tracing` output.
#[derive(Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct Masked<T>(pub T);

impl<T: AsRef<str>> Masked<T> {
    fn redacted(&self) -> String {
        let visible: String = self.0.as_ref().chars().take(VISIBLE_PREFIX).collect();
        format!("{}****", visible)
    }
}

impl<T: AsRef<str>> fmt::Debug for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Masked({})", self.redacted())
    }
}

impl<T: AsRef<str>> fmt::Display for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}

impl<T: Serialize> Serialize for Masked<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<T> Masked<T> {
    pub fn reveal(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl From<&str> for Masked<String> {
    fn from(value: &str) -> Self {
        Masked(value.to_string())
    }
}
