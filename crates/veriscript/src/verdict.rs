use core::fmt;

use rand::{Rng, SeedableRng, rngs::StdRng, rngs::ThreadRng};
use serde::Serialize;

use crate::model::Label;

/// Texts shorter than this (trimmed, in characters) are not analyzed.
pub const MIN_ANALYSIS_CHARS: usize = 40;
/// Mixed verdicts carry an AI likelihood only from this length on.
pub const MIN_SCORE_CHARS: usize = 80;
/// Texts longer than this are rejected before tokenization.
pub const MAX_INPUT_CHARS: usize = 100_000;

/// Bounds of the AI likelihood shown for mixed text, in percent.
pub const AI_LIKELIHOOD_RANGE: (f64, f64) = (50.0, 75.0);

/// Length gates of the verdict state machine, in characters of trimmed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub min_analysis_chars: usize,
    pub min_score_chars: usize,
    pub max_input_chars: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_analysis_chars: MIN_ANALYSIS_CHARS,
            min_score_chars: MIN_SCORE_CHARS,
            max_input_chars: MAX_INPUT_CHARS,
        }
    }
}

/// Length the gates are measured on: characters after trimming.
#[must_use]
pub fn trimmed_len(text: &str) -> usize {
    text.trim().chars().count()
}

/// Source of the mixed-text AI likelihood.
pub trait LikelihoodSampler {
    /// A value in `[low, high]`.
    fn sample(&mut self, low: f64, high: f64) -> f64;
}

impl<S: LikelihoodSampler + ?Sized> LikelihoodSampler for &mut S {
    fn sample(&mut self, low: f64, high: f64) -> f64 {
        (**self).sample(low, high)
    }
}

/// Uniform draws from a `rand` generator.
#[derive(Debug, Clone)]
pub struct UniformSampler<R = ThreadRng>(R);

impl UniformSampler<ThreadRng> {
    #[must_use]
    pub fn new() -> Self {
        Self(rand::rng())
    }
}

impl Default for UniformSampler<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl UniformSampler<StdRng> {
    /// Reproducible draws.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> UniformSampler<R> {
    pub fn from_rng(rng: R) -> Self {
        Self(rng)
    }
}

impl<R: Rng> LikelihoodSampler for UniformSampler<R> {
    fn sample(&mut self, low: f64, high: f64) -> f64 {
        self.0.random_range(low..=high)
    }
}

/// What the pipeline concluded about a text before it is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assessment {
    TooShort,
    TooLong,
    NoMeaningfulText,
    Classified(Label),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    NeedsMoreText,
    InputTooLong,
    NeedsMeaningfulText,
    LikelyHuman,
    LikelyAi,
    LikelyMixed,
}

impl Category {
    /// The classifier label behind this category, if any.
    #[must_use]
    pub fn label(&self) -> Option<Label> {
        match self {
            Self::LikelyHuman => Some(Label::Human),
            Self::LikelyAi => Some(Label::AI),
            Self::LikelyMixed => Some(Label::Mixed),
            Self::NeedsMoreText | Self::InputTooLong | Self::NeedsMeaningfulText => None,
        }
    }
}

/// How the shell should style a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Success,
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    category: Category,
    tone: Tone,
    message: String,
    /// AI likelihood in percent, one decimal.
    #[serde(skip_serializing_if = "Option::is_none")]
    ai_likelihood: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<String>,
}

impl Verdict {
    fn warning(category: Category, message: String) -> Self {
        Self {
            category,
            tone: Tone::Warning,
            message,
            ai_likelihood: None,
            note: None,
        }
    }

    fn classified(category: Category, tone: Tone, message: &str) -> Self {
        Self {
            category,
            tone,
            message: message.to_string(),
            ai_likelihood: None,
            note: None,
        }
    }

    #[must_use]
    pub fn category(&self) -> Category {
        self.category
    }

    #[must_use]
    pub fn tone(&self) -> Tone {
        self.tone
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn ai_likelihood(&self) -> Option<f64> {
        self.ai_likelihood
    }

    #[must_use]
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    #[must_use]
    pub fn is_warning(&self) -> bool {
        self.tone == Tone::Warning
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(likelihood) = self.ai_likelihood {
            write!(f, " (AI likelihood {likelihood:.1} %)")?;
        }
        Ok(())
    }
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Turn an assessment into the verdict shown to the user.
///
/// Only the mixed branch draws from `sampler`, and only when the trimmed
/// text reaches `thresholds.min_score_chars`.
pub fn compose<S: LikelihoodSampler + ?Sized>(
    raw_text: &str,
    assessment: Assessment,
    thresholds: &Thresholds,
    sampler: &mut S,
) -> Verdict {
    match assessment {
        Assessment::TooShort => Verdict::warning(
            Category::NeedsMoreText,
            format!(
                "Please enter at least {} characters for analysis.",
                thresholds.min_analysis_chars
            ),
        ),
        Assessment::TooLong => Verdict::warning(
            Category::InputTooLong,
            format!(
                "Please shorten the text to at most {} characters.",
                thresholds.max_input_chars
            ),
        ),
        Assessment::NoMeaningfulText => Verdict::warning(
            Category::NeedsMeaningfulText,
            "Please enter enough meaningful text to analyze.".to_string(),
        ),
        Assessment::Classified(Label::Human) => {
            Verdict::classified(Category::LikelyHuman, Tone::Success, "Likely human-written")
        }
        Assessment::Classified(Label::AI) => {
            Verdict::classified(Category::LikelyAi, Tone::Error, "Likely AI-generated")
        }
        Assessment::Classified(Label::Mixed) => {
            let mut verdict =
                Verdict::classified(Category::LikelyMixed, Tone::Error, "Likely Mixed-Text");
            if trimmed_len(raw_text) >= thresholds.min_score_chars {
                let (low, high) = AI_LIKELIHOOD_RANGE;
                let drawn = round_to_tenth(sampler.sample(low, high)).clamp(low, high);
                verdict.ai_likelihood = Some(drawn);
            } else {
                verdict.note = Some(format!(
                    "AI likelihood shown for texts over {} characters.",
                    thresholds.min_score_chars
                ));
            }
            verdict
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Always returns the same value and counts how often it was asked.
    struct FixedSampler {
        value: f64,
        draws: usize,
    }

    impl FixedSampler {
        fn new(value: f64) -> Self {
            Self { value, draws: 0 }
        }
    }

    impl LikelihoodSampler for FixedSampler {
        fn sample(&mut self, _low: f64, _high: f64) -> f64 {
            self.draws += 1;
            self.value
        }
    }

    fn text_of_len(len: usize) -> String {
        "x".repeat(len)
    }

    fn is_one_decimal(value: f64) -> bool {
        ((value * 10.0).round() - value * 10.0).abs() < 1e-9
    }

    #[test]
    fn test_too_short_warning() {
        let mut sampler = FixedSampler::new(60.0);
        let verdict = compose("short", Assessment::TooShort, &Thresholds::default(), &mut sampler);

        assert_eq!(verdict.category(), Category::NeedsMoreText);
        assert_eq!(verdict.tone(), Tone::Warning);
        assert_eq!(verdict.message(), "Please enter at least 40 characters for analysis.");
        assert!(verdict.ai_likelihood().is_none());
        assert_eq!(sampler.draws, 0);
    }

    #[test]
    fn test_no_meaningful_text_warning() {
        let mut sampler = FixedSampler::new(60.0);
        let verdict = compose(
            &text_of_len(120),
            Assessment::NoMeaningfulText,
            &Thresholds::default(),
            &mut sampler,
        );
        assert_eq!(verdict.category(), Category::NeedsMeaningfulText);
        assert_eq!(verdict.message(), "Please enter enough meaningful text to analyze.");
        assert!(verdict.is_warning());
        assert_eq!(sampler.draws, 0);
    }

    #[test]
    fn test_too_long_warning_mentions_limit() {
        let thresholds = Thresholds {
            max_input_chars: 500,
            ..Thresholds::default()
        };
        let verdict = compose("", Assessment::TooLong, &thresholds, &mut FixedSampler::new(60.0));
        assert_eq!(verdict.category(), Category::InputTooLong);
        assert!(verdict.message().contains("500"));
    }

    #[test]
    fn test_human_has_no_score() {
        let mut sampler = FixedSampler::new(60.0);
        let verdict = compose(
            &text_of_len(200),
            Assessment::Classified(Label::Human),
            &Thresholds::default(),
            &mut sampler,
        );
        assert_eq!(verdict.category(), Category::LikelyHuman);
        assert_eq!(verdict.tone(), Tone::Success);
        assert_eq!(verdict.message(), "Likely human-written");
        assert!(verdict.ai_likelihood().is_none());
        assert!(verdict.note().is_none());
        assert_eq!(sampler.draws, 0);
    }

    #[test]
    fn test_ai_has_no_score() {
        let mut sampler = FixedSampler::new(60.0);
        let verdict = compose(
            &text_of_len(200),
            Assessment::Classified(Label::AI),
            &Thresholds::default(),
            &mut sampler,
        );
        assert_eq!(verdict.category(), Category::LikelyAi);
        assert_eq!(verdict.tone(), Tone::Error);
        assert_eq!(verdict.message(), "Likely AI-generated");
        assert!(verdict.ai_likelihood().is_none());
        assert_eq!(sampler.draws, 0);
    }

    #[test]
    fn test_mixed_long_text_gets_rounded_score() {
        let mut sampler = FixedSampler::new(63.456);
        let verdict = compose(
            &text_of_len(80),
            Assessment::Classified(Label::Mixed),
            &Thresholds::default(),
            &mut sampler,
        );
        assert_eq!(verdict.category(), Category::LikelyMixed);
        assert_eq!(verdict.tone(), Tone::Error);
        assert_eq!(verdict.message(), "Likely Mixed-Text");
        assert_eq!(verdict.ai_likelihood(), Some(63.5));
        assert!(verdict.note().is_none());
        assert_eq!(sampler.draws, 1);
    }

    #[test]
    fn test_mixed_short_text_gets_note() {
        let mut sampler = FixedSampler::new(63.4);
        let verdict = compose(
            &text_of_len(79),
            Assessment::Classified(Label::Mixed),
            &Thresholds::default(),
            &mut sampler,
        );
        assert_eq!(verdict.category(), Category::LikelyMixed);
        assert!(verdict.ai_likelihood().is_none());
        assert_eq!(
            verdict.note(),
            Some("AI likelihood shown for texts over 80 characters.")
        );
        assert_eq!(sampler.draws, 0);
    }

    #[test]
    fn test_score_gate_uses_trimmed_length() {
        let padded = format!("   {}   \n", text_of_len(78));
        let verdict = compose(
            &padded,
            Assessment::Classified(Label::Mixed),
            &Thresholds::default(),
            &mut FixedSampler::new(70.0),
        );
        assert!(verdict.ai_likelihood().is_none());
    }

    #[test]
    fn test_score_clamped_to_range() {
        let verdict = compose(
            &text_of_len(100),
            Assessment::Classified(Label::Mixed),
            &Thresholds::default(),
            &mut FixedSampler::new(75.04),
        );
        assert_eq!(verdict.ai_likelihood(), Some(75.0));
    }

    #[test]
    fn test_uniform_sampler_range_and_precision() {
        let mut sampler = UniformSampler::seeded(7);
        let text = text_of_len(90);
        for _ in 0..500 {
            let verdict = compose(
                &text,
                Assessment::Classified(Label::Mixed),
                &Thresholds::default(),
                &mut sampler,
            );
            let score = verdict.ai_likelihood().expect("mixed verdict should carry a score");
            assert!((50.0..=75.0).contains(&score), "{score} out of range");
            assert!(is_one_decimal(score), "{score} not rounded");
        }
    }

    #[test]
    fn test_seeded_sampler_is_reproducible() {
        let mut first = UniformSampler::seeded(42);
        let mut second = UniformSampler::seeded(42);
        for _ in 0..10 {
            assert_eq!(first.sample(50.0, 75.0), second.sample(50.0, 75.0));
        }
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(Category::LikelyMixed.label(), Some(Label::Mixed));
        assert_eq!(Category::NeedsMoreText.label(), None);
    }

    #[test]
    fn test_json_shape() {
        let verdict = compose(
            &text_of_len(100),
            Assessment::Classified(Label::Mixed),
            &Thresholds::default(),
            &mut FixedSampler::new(61.2),
        );
        let json = serde_json::to_value(&verdict).unwrap();
        assert_eq!(json["category"], "likely_mixed");
        assert_eq!(json["tone"], "error");
        assert_eq!(json["ai_likelihood"], 61.2);
        assert!(json.get("note").is_none());
    }

    #[test]
    fn test_display() {
        let verdict = compose(
            &text_of_len(100),
            Assessment::Classified(Label::Mixed),
            &Thresholds::default(),
            &mut FixedSampler::new(61.2),
        );
        assert_eq!(verdict.to_string(), "Likely Mixed-Text (AI likelihood 61.2 %)");
    }
}
