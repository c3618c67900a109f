use std::fmt;

/// A resource group identifier. Whether it exists is only known after the
/// engine has asked the provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScanTarget(String);

impl ScanTarget {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScanTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ScanTarget {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ScanTarget {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ScanTarget {
    fn from(name: String) -> Self {
        Self(name)
    }
}
