use itertools::Itertools;

/// Per-keystroke judgement of the typed input against the target text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// No actionable mismatch; keep typing.
    Continue,
    /// The most recently typed character is wrong.
    ErrorAtLastChar,
    /// The whole target has been reproduced (plus the trailing terminator).
    Complete,
}

// Glyphs treated as interchangeable: typographic variants that differ by
// input method or font and would otherwise be untypeable on some layouts.
const DASHES: &[char] = &['-', '–', '—'];
const QUOTES: &[char] = &['"', '«', '»', '„', '“'];
const YO: &[char] = &['е', 'ё'];

fn in_same_class(a: char, b: char, class: &[char]) -> bool {
    class.contains(&a) && class.contains(&b)
}

/// Whether two code points count as the same keystroke.
pub fn equivalent(a: char, b: char) -> bool {
    a == b
        || in_same_class(a, b, DASHES)
        || in_same_class(a, b, QUOTES)
        || in_same_class(a, b, YO)
}

/// The code point the input surface appends when the user terminates the line.
pub const TERMINATOR: char = '\n';

/// Judge `typed` against `target`, code point by code point over the shared
/// prefix. Only the first mismatch matters: if it sits under the cursor (the
/// last typed character) it is flagged, otherwise the user has already moved
/// past it and is left alone. Completion requires the full target followed by
/// exactly one terminator; any other character one past the end is a plain
/// mistype at the cursor.
pub fn compare(target: &str, typed: &str) -> Verdict {
    let target: Vec<char> = target.chars().collect();
    let typed: Vec<char> = typed.chars().collect();

    if let Some((idx, _)) = target
        .iter()
        .zip(&typed)
        .find_position(|(want, got)| !equivalent(**want, **got))
    {
        if idx + 1 == typed.len() {
            Verdict::ErrorAtLastChar
        } else {
            Verdict::Continue
        }
    } else {
        match typed.len().checked_sub(target.len()) {
            Some(1) if typed.last() == Some(&TERMINATOR) => Verdict::Complete,
            Some(1) => Verdict::ErrorAtLastChar,
            _ => Verdict::Continue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn exact_prefix_keeps_going() {
        assert_matches!(compare("hello", "hel"), Verdict::Continue);
        assert_matches!(compare("hello", ""), Verdict::Continue);
    }

    #[test]
    fn full_text_with_terminator_completes() {
        let target = "Печатай точно, не спеша.";
        let typed = format!("{target}\n");
        assert_matches!(compare(target, &typed), Verdict::Complete);
    }

    #[test]
    fn full_text_without_terminator_is_not_complete() {
        let target = "Печатай точно, не спеша.";
        assert_matches!(compare(target, target), Verdict::Continue);
    }

    #[test]
    fn plain_hyphen_matches_em_dash() {
        let target = "Скорость — ключ к успеху!";
        let typed = "Скорость -";
        assert_matches!(compare(target, typed), Verdict::Continue);
    }

    #[test]
    fn wrong_last_char_is_flagged() {
        // target[3] differs from the last typed character
        let target = "Печатай";
        let typed = "Печк";
        assert_matches!(compare(target, typed), Verdict::ErrorAtLastChar);
    }

    #[test]
    fn stale_error_behind_cursor_is_not_reflagged() {
        // Same mismatch at index 3, but two more characters typed past it.
        let target = "Печатай";
        let typed = "Печкта";
        assert_matches!(compare(target, typed), Verdict::Continue);
    }

    #[test]
    fn dash_class_is_symmetric() {
        for &a in DASHES {
            for &b in DASHES {
                assert!(equivalent(a, b), "{a} vs {b}");
                assert!(equivalent(b, a), "{b} vs {a}");
            }
        }
    }

    #[test]
    fn quote_class_is_symmetric() {
        for &a in QUOTES {
            for &b in QUOTES {
                assert!(equivalent(a, b), "{a} vs {b}");
            }
        }
    }

    #[test]
    fn yo_class_covers_both_orders() {
        assert!(equivalent('е', 'ё'));
        assert!(equivalent('ё', 'е'));
        // Uppercase Е/Ё is not part of the class
        assert!(!equivalent('Е', 'Ё'));
    }

    #[test]
    fn classes_do_not_cross() {
        assert!(!equivalent('-', '"'));
        assert!(!equivalent('«', '—'));
        assert!(!equivalent('е', '-'));
    }

    #[test]
    fn quote_variants_accepted_mid_text() {
        let target = "Он сказал «привет» тихо.";
        let typed = "Он сказал \"привет\"";
        assert_matches!(compare(target, typed), Verdict::Continue);
    }

    #[test]
    fn compare_is_idempotent() {
        let target = "Скорость — ключ к успеху!";
        let typed = "Скорость -";
        let first = compare(target, typed);
        let second = compare(target, typed);
        assert_eq!(first, second);
    }

    #[test]
    fn overlong_input_without_mismatch_keeps_going() {
        // Two characters past the target with an equivalent prefix is not
        // completion; the terminator must land exactly one past the end.
        assert_matches!(compare("ab", "ab\n\n"), Verdict::Continue);
    }

    #[test]
    fn terminator_against_shorter_target_is_error() {
        // Enter pressed too early: the newline mismatches under the cursor.
        assert_matches!(compare("hello", "hel\n"), Verdict::ErrorAtLastChar);
    }

    #[test]
    fn stray_char_past_the_end_is_an_error_not_completion() {
        // Only the terminator may occupy the position one past the target.
        assert_matches!(compare("ab", "abx"), Verdict::ErrorAtLastChar);
        assert_matches!(compare("ab", "ab "), Verdict::ErrorAtLastChar);
        assert_matches!(compare("ab", "ab\n"), Verdict::Complete);
    }

    #[test]
    fn empty_target_completes_on_lone_terminator() {
        assert_matches!(compare("", "\n"), Verdict::Complete);
        assert_matches!(compare("", ""), Verdict::Continue);
    }
}
