//! Visualization intent detection.

/// Trigger words that mark an utterance as visualization-seeking.
const TRIGGERS: &[&str] = &[
    "graph",
    "plot",
    "chart",
    "visualize",
    "diagram",
    "scatter",
    "line",
    "bar",
    "pie",
];

/// Keyword heuristic, not NLP: lower-case the input and look for any
/// trigger word as a substring. False positives and negatives are
/// accepted in exchange for a pure, total function.
pub fn wants_visualization(text: &str) -> bool {
    let lowered = text.to_lowercase();
    TRIGGERS.iter().any(|k| lowered.contains(k))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_any_trigger_case_insensitive() {
        assert!(wants_visualization("Plot a line graph of y=x"));
        assert!(wants_visualization("show me a PIE breakdown"));
        assert!(wants_visualization("Can you VISUALIZE sales by month?"));
        assert!(wants_visualization("draw a scatter of age vs income"));
    }

    #[test]
    fn matches_trigger_inside_larger_word() {
        // Substring semantics are intentional: "barchart" still triggers.
        assert!(wants_visualization("make a barchart"));
    }

    #[test]
    fn ignores_text_without_triggers() {
        assert!(!wants_visualization("what's the capital of France"));
        assert!(!wants_visualization(""));
        assert!(!wants_visualization("summarize the uploaded document"));
    }
}
