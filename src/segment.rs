//! Splitting of inline emphasis markers into styled text runs.
//!
//! Free-text fields may mark emphasis with a paired `**...**` delimiter.  The
//! segmenter turns such a string into an ordered list of runs that concatenate
//! back to the original text with the delimiters stripped.  Both the badge and
//! paragraph renderers consume this representation.

const MARKER: &str = "**";

/// A contiguous slice of text with a single emphasis state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    pub emphasized: bool,
}

impl Run {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            emphasized: false,
        }
    }

    fn emphasized(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            emphasized: true,
        }
    }
}

/// Splits `input` on balanced `**...**` pairs into plain and emphasized runs.
///
/// Each opening delimiter is matched non-greedily against the nearest closing
/// pair; emphasis does not nest.  A delimiter without a partner is literal
/// text, so malformed input never fails, it just keeps its asterisks.  Empty
/// runs are dropped, which also swallows degenerate `****` pairs.
pub fn segment(input: &str) -> Vec<Run> {
    let mut runs = Vec::new();
    let mut rest = input;

    while let Some(open) = rest.find(MARKER) {
        let after_open = &rest[open + MARKER.len()..];
        match after_open.find(MARKER) {
            Some(close) => {
                push_run(&mut runs, Run::plain(&rest[..open]));
                push_run(&mut runs, Run::emphasized(&after_open[..close]));
                rest = &after_open[close + MARKER.len()..];
            }
            None => break,
        }
    }

    push_run(&mut runs, Run::plain(rest));
    runs
}

/// Strips emphasis delimiters and reports whether any emphasized span was
/// present.  Badge labels use this: one marker pair bolds the whole badge.
pub fn visible_text(input: &str) -> (String, bool) {
    let runs = segment(input);
    let emphasized = runs.iter().any(|run| run.emphasized);
    let mut text = String::with_capacity(input.len());
    for run in &runs {
        text.push_str(&run.text);
    }
    (text, emphasized)
}

fn push_run(runs: &mut Vec<Run>, run: Run) {
    if !run.text.is_empty() {
        runs.push(run);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reassemble(runs: &[Run]) -> String {
        runs.iter().map(|run| run.text.as_str()).collect()
    }

    #[test]
    fn plain_text_is_one_run() {
        let runs = segment("Hello world");
        assert_eq!(runs, vec![Run::plain("Hello world")]);
    }

    #[test]
    fn single_pair_splits_into_three_runs() {
        let runs = segment("uses **React** daily");
        assert_eq!(
            runs,
            vec![
                Run::plain("uses "),
                Run::emphasized("React"),
                Run::plain(" daily"),
            ]
        );
    }

    #[test]
    fn multiple_pairs_alternate() {
        let runs = segment("**a** and **b**");
        assert_eq!(
            runs,
            vec![
                Run::emphasized("a"),
                Run::plain(" and "),
                Run::emphasized("b"),
            ]
        );
    }

    #[test]
    fn unterminated_marker_stays_literal() {
        let runs = segment("broken **bold");
        assert_eq!(runs, vec![Run::plain("broken **bold")]);
    }

    #[test]
    fn lone_marker_stays_literal() {
        let runs = segment("2 ** 8");
        assert_eq!(runs, vec![Run::plain("2 ** 8")]);
    }

    #[test]
    fn matching_is_non_greedy() {
        let runs = segment("**a**b**c**");
        assert_eq!(
            runs,
            vec![
                Run::emphasized("a"),
                Run::plain("b"),
                Run::emphasized("c"),
            ]
        );
    }

    #[test]
    fn empty_runs_are_dropped() {
        assert!(segment("").is_empty());
        assert_eq!(segment("****"), Vec::<Run>::new());
        assert_eq!(segment("**x**"), vec![Run::emphasized("x")]);
    }

    #[test]
    fn balanced_runs_reassemble_to_input_without_delimiters() {
        let samples = [
            "plain",
            "**React**",
            "mix of **bold** and plain **ends bold**",
            "**a**b**c**",
        ];
        for sample in samples {
            let runs = segment(sample);
            assert_eq!(reassemble(&runs), sample.replace("**", ""), "for {sample:?}");
        }
    }

    #[test]
    fn unbalanced_input_reassembles_verbatim() {
        let runs = segment("stray ** marker");
        assert_eq!(reassemble(&runs), "stray ** marker");
    }

    #[test]
    fn visible_text_reports_badge_emphasis() {
        assert_eq!(visible_text("**React**"), ("React".to_string(), true));
        assert_eq!(visible_text("Node.js"), ("Node.js".to_string(), false));
    }
}
