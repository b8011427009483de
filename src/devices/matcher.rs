//! Approximate device name matching
//!
//! Spoken device names arrive through speech-to-text, so exact comparison is
//! too strict. Names are normalized (case, surrounding and repeated
//! whitespace) and scored with Jaro-Winkler similarity, which favors shared
//! prefixes: "kitchen" still lands on "Kitchen Echo".

use super::Device;

/// Default minimum similarity for a name to count as a match
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.8;

/// Scores device names against a spoken query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NameMatcher {
    threshold: f64,
}

impl Default for NameMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_MATCH_THRESHOLD)
    }
}

impl NameMatcher {
    /// Create a matcher accepting scores at or above `threshold`
    ///
    /// The threshold is clamped to `[0, 1]`; NaN falls back to the default.
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        let threshold = if threshold.is_nan() {
            DEFAULT_MATCH_THRESHOLD
        } else {
            threshold.clamp(0.0, 1.0)
        };
        Self { threshold }
    }

    #[must_use]
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Similarity between a query and a device name, in `[0, 1]`
    #[must_use]
    pub fn score(&self, query: &str, name: &str) -> f64 {
        let query = normalize(query);
        let name = normalize(name);

        if query.is_empty() || name.is_empty() {
            return 0.0;
        }

        strsim::jaro_winkler(&query, &name)
    }

    /// Pick the best-scoring device at or above the threshold
    ///
    /// On equal scores the device listed first wins.
    pub fn best_match<'a, I>(&self, query: &str, devices: I) -> Option<&'a Device>
    where
        I: IntoIterator<Item = &'a Device>,
    {
        let mut best: Option<(&Device, f64)> = None;

        for device in devices {
            let score = self.score(query, &device.name);
            if score < self.threshold {
                continue;
            }
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((device, score));
            }
        }

        if let Some((device, score)) = best {
            tracing::debug!(query, device = %device.name, score, "matched device by name");
        }

        best.map(|(device, _)| device)
    }
}

fn normalize(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}
