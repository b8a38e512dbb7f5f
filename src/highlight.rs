/// Classification of a single reference character against the typed input.
#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
    Pending,
}

/// What the renderer needs for one reference character.
#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub struct Highlight {
    pub char: char,
    pub outcome: Outcome,
    /// Set on the caret position, i.e. the next character to be typed.
    pub current: bool,
}

/// Character equality under the active case policy.
pub fn chars_match(expected: char, typed: char, ignore_case: bool) -> bool {
    if ignore_case {
        expected.to_lowercase().eq(typed.to_lowercase())
    } else {
        expected == typed
    }
}

/// Compares `typed` against `reference` position by position. The result has
/// exactly one entry per reference character; typed input beyond the end of
/// the reference is ignored.
pub fn classify(reference: &str, typed: &str, ignore_case: bool) -> Vec<Highlight> {
    let caret = typed.chars().count();
    let mut typed_chars = typed.chars();

    reference
        .chars()
        .enumerate()
        .map(|(idx, expected)| {
            let outcome = match typed_chars.next() {
                Some(c) if chars_match(expected, c, ignore_case) => Outcome::Correct,
                Some(_) => Outcome::Incorrect,
                None => Outcome::Pending,
            };

            Highlight {
                char: expected,
                outcome,
                current: idx == caret,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcomes(hl: &[Highlight]) -> Vec<Outcome> {
        hl.iter().map(|h| h.outcome).collect()
    }

    #[test]
    fn test_nothing_typed_is_all_pending() {
        let hl = classify("abc", "", false);

        assert_eq!(
            outcomes(&hl),
            vec![Outcome::Pending, Outcome::Pending, Outcome::Pending]
        );
        assert!(hl[0].current);
        assert!(!hl[1].current && !hl[2].current);
    }

    #[test]
    fn test_mixed_progress() {
        let hl = classify("hello", "hx", false);

        assert_eq!(
            outcomes(&hl),
            vec![
                Outcome::Correct,
                Outcome::Incorrect,
                Outcome::Pending,
                Outcome::Pending,
                Outcome::Pending
            ]
        );
        assert_eq!(hl.iter().position(|h| h.current), Some(2));
        assert_eq!(hl[1].char, 'e');
    }

    #[test]
    fn test_complete_input_has_no_caret() {
        let hl = classify("hi", "hi", false);

        assert_eq!(outcomes(&hl), vec![Outcome::Correct, Outcome::Correct]);
        assert!(hl.iter().all(|h| !h.current));
    }

    #[test]
    fn test_excess_input_is_ignored() {
        let hl = classify("ab", "abzzz", false);

        assert_eq!(hl.len(), 2);
        assert_eq!(outcomes(&hl), vec![Outcome::Correct, Outcome::Correct]);
    }

    #[test]
    fn test_case_policy() {
        assert_eq!(
            outcomes(&classify("Hello", "hELLO", false)),
            vec![
                Outcome::Incorrect,
                Outcome::Incorrect,
                Outcome::Incorrect,
                Outcome::Incorrect,
                Outcome::Incorrect
            ]
        );
        assert!(classify("Hello", "hELLO", true)
            .iter()
            .all(|h| h.outcome == Outcome::Correct));
    }

    #[test]
    fn test_non_ascii_positions() {
        let hl = classify("Åsa", "åsa", true);
        assert!(hl.iter().all(|h| h.outcome == Outcome::Correct));

        let hl = classify("Åsa", "Ås", false);
        assert_eq!(hl[2].outcome, Outcome::Pending);
        assert!(hl[2].current);
    }

    #[test]
    fn test_empty_reference() {
        assert!(classify("", "anything", false).is_empty());
    }

    #[test]
    fn test_chars_match() {
        assert!(chars_match('a', 'a', false));
        assert!(!chars_match('a', 'A', false));
        assert!(chars_match('a', 'A', true));
        assert!(chars_match('Ö', 'ö', true));
        assert!(!chars_match('a', 'b', true));
    }
}
