//! Which variant to ask for, and with what sampling.

use crate::groq::SamplingParams;
use crate::models::{DisplayPreferences, Variant};

/// Output cap for every completion request.
pub const MAX_OUTPUT_TOKENS: u32 = 1024;

/// Maps the display toggles to a prompt variant.
///
/// Asking for sources always uses the sources variant, whose reply also
/// carries a confidence level.
pub fn select_variant(preferences: DisplayPreferences) -> Variant {
    match (preferences.show_confidence, preferences.show_sources) {
        (_, true) => Variant::Sources,
        (true, false) => Variant::Confidence,
        (false, false) => Variant::Plain,
    }
}

/// Sampling used for `variant`: deterministic for tagged replies.
pub fn sampling_for(variant: Variant) -> SamplingParams {
    let temperature = match variant {
        Variant::Plain => 0.1,
        Variant::Confidence | Variant::Sources => 0.0,
    };

    SamplingParams {
        temperature,
        max_tokens: MAX_OUTPUT_TOKENS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_toggle_combinations_select_a_variant() {
        let cases = [
            ((true, true), Variant::Sources),
            ((true, false), Variant::Confidence),
            ((false, true), Variant::Sources),
            ((false, false), Variant::Plain),
        ];

        for ((confidence, sources), expected) in cases {
            let prefs = DisplayPreferences::new(confidence, sources);
            assert_eq!(
                select_variant(prefs),
                expected,
                "confidence={confidence} sources={sources}"
            );
        }
    }

    #[test]
    fn tagged_variants_sample_deterministically() {
        assert_eq!(sampling_for(Variant::Confidence).temperature, 0.0);
        assert_eq!(sampling_for(Variant::Sources).temperature, 0.0);
        assert_eq!(sampling_for(Variant::Plain).temperature, 0.1);
    }

    #[test]
    fn output_is_capped_for_every_variant() {
        for variant in [Variant::Plain, Variant::Confidence, Variant::Sources] {
            assert_eq!(sampling_for(variant).max_tokens, 1024);
        }
    }
}
