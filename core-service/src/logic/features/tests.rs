//! Integration Tests for Feature Extraction Modules
//!
//! Builder, vector and preview working together.

#[cfg(test)]
mod integration_tests {
    use crate::error::GrcError;
    use crate::logic::features::{
        preview::{PREVIEW_MAX_TERMS, PREVIEW_SUFFIX},
        preview_text, EngineeredFeatures, FeatureBuilder, FeatureVector, TermLookup, Vocabulary,
        PREVIEW_PLACEHOLDER,
    };

    fn vocab() -> Vocabulary {
        let terms: Vec<String> = ["account", "action", "alert", "bank", "click", "password", "urgent", "verify"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let idf = vec![1.0; terms.len()];
        Vocabulary::new(terms, idf).unwrap()
    }

    #[test]
    fn test_builder_width_is_vocabulary_plus_two() {
        let v = vocab();
        let builder = FeatureBuilder::new(&v);
        let vector = builder.build("Urgent: click http://x.io to verify your account now");

        assert_eq!(vector.len(), v.len() + 2);
        assert_eq!(builder.width(), vector.len());
        assert_eq!(vector.engineered().has_url, 1.0);
        assert_eq!(vector.engineered().urgency_words, 2.0);
    }

    #[test]
    fn test_engineered_block_survives_empty_lexical_block() {
        let extracted = EngineeredFeatures { has_url: 1.0, urgency_words: 3.0 };
        let vector = FeatureVector::new(Vec::new(), extracted);

        assert_eq!(vector.lexical_width(), 0);
        assert!(vector.lexical().is_empty());
        assert_eq!(vector.engineered(), extracted);
        assert_eq!(vector.as_slice(), &[1.0, 3.0]);
    }

    #[test]
    fn test_preview_lists_terms_in_column_order() {
        let v = vocab();
        let vector = FeatureBuilder::new(&v).build("verify your bank account");

        assert_eq!(preview_text(&v, &vector).unwrap(), "account bank verify...");
    }

    #[test]
    fn test_preview_truncates_to_five_terms() {
        let v = vocab();
        let vector = FeatureBuilder::new(&v)
            .build("urgent alert: verify password, click the bank account action");

        let preview = preview_text(&v, &vector).unwrap();
        assert_eq!(preview, "account action alert bank click...");

        let terms = preview.trim_end_matches(PREVIEW_SUFFIX).split(' ').count();
        assert!(terms <= PREVIEW_MAX_TERMS);
        assert!(preview.ends_with(PREVIEW_SUFFIX));
    }

    #[test]
    fn test_preview_placeholder_ignores_engineered_features() {
        let v = vocab();
        // No vocabulary term, but both engineered features are non-zero
        let vector = FeatureVector::new(
            vec![0.0; v.len()],
            EngineeredFeatures {
                has_url: 1.0,
                urgency_words: 3.0,
            },
        );

        assert_eq!(preview_text(&v, &vector).unwrap(), PREVIEW_PLACEHOLDER);
    }

    #[test]
    fn test_full_vector_is_rejected_by_term_lookup() {
        let v = vocab();
        let vector = FeatureBuilder::new(&v).build("verify http://x.io");

        let err = v.ranked_terms(vector.as_slice()).unwrap_err();
        assert!(matches!(err, GrcError::VocabularyMismatch { expected: 8, found: 10 }));

        assert_eq!(v.ranked_terms(vector.lexical()).unwrap(), vec!["verify"]);
    }
}
