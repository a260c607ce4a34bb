//! Engineered text features
//!
//! Two scalar signals appended after the lexical block.

/// Substring marking a link in the raw text (case-sensitive)
pub const URL_MARKER: &str = "http";

/// Words counted in the lowercased text (non-overlapping substring matches)
pub const URGENCY_TERMS: &[&str] = &["urgent", "now"];

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EngineeredFeatures {
    pub has_url: f32,
    pub urgency_words: f32,
}

impl EngineeredFeatures {
    pub fn extract(text: &str) -> Self {
        let lowered = text.to_lowercase();
        let urgency: usize = URGENCY_TERMS
            .iter()
            .map(|term| lowered.matches(term).count())
            .sum();

        Self {
            has_url: if text.contains(URL_MARKER) { 1.0 } else { 0.0 },
            urgency_words: urgency as f32,
        }
    }

    pub fn as_array(&self) -> [f32; 2] {
        [self.has_url, self.urgency_words]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_detection_is_case_sensitive() {
        assert_eq!(EngineeredFeatures::extract("visit http://x.io").has_url, 1.0);
        assert_eq!(EngineeredFeatures::extract("visit HTTP://x.io").has_url, 0.0);
        assert_eq!(EngineeredFeatures::extract("no link here").has_url, 0.0);
    }

    #[test]
    fn test_urgency_counts_substrings() {
        let f = EngineeredFeatures::extract("URGENT: act now! Urgent action. I know.");
        // urgent x2, now x2 ("now" + "know")
        assert_eq!(f.urgency_words, 4.0);
    }

    #[test]
    fn test_plain_text_has_no_signals() {
        assert_eq!(
            EngineeredFeatures::extract("Quarterly planning notes"),
            EngineeredFeatures::default()
        );
    }
}
