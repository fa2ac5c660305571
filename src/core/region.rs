use crate::domain::ports::RegionClassifier;
use regex::Regex;

/// Recognizes NUTS codes by shape: a two letter country prefix followed by up to three
/// alphanumeric level characters (`AT`, `AT1`, `AT13`, `AT130`). Anything else is assumed
/// to be a LAU code.
#[derive(Debug, Clone)]
pub struct NutsFormatClassifier {
    pattern: Regex,
}

impl NutsFormatClassifier {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r"^[A-Z]{2}[A-Z0-9]{0,3}$").expect("NUTS pattern is valid"),
        }
    }
}

impl Default for NutsFormatClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl RegionClassifier for NutsFormatClassifier {
    fn is_nuts_code(&self, code: &str) -> bool {
        self.pattern.is_match(code.trim())
    }
}
