/// Default classification threshold between 0.0 and 1.0.
///
/// If P(spam) >= threshold, the text is classified as spam.
/// Lower thresholds are more sensitive (classify more as spam), higher thresholds are more
/// conservative (classify more as ham). Values outside [0.0, 1.0] are accepted: anything above
/// 1.0 never flags spam, anything at or below 0.0 always does.
pub const DEFAULT_THRESHOLD: f64 = 0.5;
