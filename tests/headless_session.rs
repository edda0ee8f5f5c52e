use std::time::Duration;

use assert_matches::assert_matches;

use klava::corpus::Corpus;
use klava::session::{Feedback, Phase, Report, Session};
use klava::surface::RecordingObserver;
use klava::timer::ManualClock;

// Headless integration: drive a full session through the public operations
// with a manual clock, no terminal involved.

#[test]
fn full_session_with_pauses_reports_active_time_only() {
    let (observer, log) = RecordingObserver::new();
    let clock = ManualClock::new();
    let mut session = Session::with_clock(clock.clone());
    session.set_observer(Box::new(observer));

    let corpus = Corpus::from_text("Печатай точно, не спеша.".to_string());
    session.start(&corpus).unwrap();

    // Type half of it, pause for coffee, come back, pause again.
    clock.advance(Duration::from_secs(3));
    assert_matches!(session.submit("Печатай"), Ok(Feedback::KeepTyping));

    session.pause().unwrap();
    clock.advance(Duration::from_secs(60));
    session.resume().unwrap();

    clock.advance(Duration::from_secs(2));
    session.pause().unwrap();
    clock.advance(Duration::from_secs(30));
    session.resume().unwrap();

    clock.advance(Duration::from_secs(1));
    let feedback = session.submit("Печатай точно, не спеша.\n").unwrap();

    // Total wall time 96s, paused 90s, active 6s.
    let report = match feedback {
        Feedback::Finished(report) => report,
        other => panic!("expected Finished, got {other:?}"),
    };
    assert!((report.elapsed_secs - 6.0).abs() < 1e-9);
    let chars = "Печатай точно, не спеша.".chars().count() as f64;
    assert!((report.chars_per_sec - chars / 6.0).abs() < 1e-9);

    assert_eq!(session.phase(), Phase::Finished);
    let phases: Vec<Phase> = log.borrow().iter().map(|(p, _)| *p).collect();
    assert_eq!(
        phases,
        vec![
            Phase::Typing,
            Phase::Paused,
            Phase::Typing,
            Phase::Paused,
            Phase::Typing,
            Phase::Finished,
        ]
    );
}

#[test]
fn back_to_back_sessions_do_not_leak_timing() {
    let clock = ManualClock::new();
    let mut session = Session::with_clock(clock.clone());
    let corpus = Corpus::from_text("ab".to_string());

    session.start(&corpus).unwrap();
    clock.advance(Duration::from_secs(5));
    assert_matches!(
        session.submit("ab\n"),
        Ok(Feedback::Finished(Report { elapsed_secs, .. })) if (elapsed_secs - 5.0).abs() < 1e-9
    );

    // Second run straight from Finished; earlier elapsed time must not bleed in.
    session.start(&corpus).unwrap();
    clock.advance(Duration::from_secs(1));
    assert_matches!(
        session.submit("ab\n"),
        Ok(Feedback::Finished(Report { elapsed_secs, .. })) if (elapsed_secs - 1.0).abs() < 1e-9
    );
}

#[test]
fn lenient_glyphs_flow_through_a_whole_session() {
    let clock = ManualClock::new();
    let mut session = Session::with_clock(clock.clone());
    let corpus = Corpus::from_text("Скорость — ключ к успеху!".to_string());

    session.start(&corpus).unwrap();
    clock.advance(Duration::from_secs(4));

    // Plain hyphen instead of the em dash, typed all the way through.
    assert_matches!(session.submit("Скорость -"), Ok(Feedback::KeepTyping));
    assert_matches!(
        session.submit("Скорость - ключ к успеху!\n"),
        Ok(Feedback::Finished(_))
    );
}

#[test]
fn stray_keystroke_past_the_end_does_not_finish_the_session() {
    let clock = ManualClock::new();
    let mut session = Session::with_clock(clock.clone());
    let corpus = Corpus::from_text("ab".to_string());

    session.start(&corpus).unwrap();
    clock.advance(Duration::from_secs(1));

    // A wrong character where the terminator belongs is flagged, not treated
    // as completion; the session stays live.
    assert_matches!(session.submit("ab"), Ok(Feedback::KeepTyping));
    assert_matches!(session.submit("abx"), Ok(Feedback::FixError));
    assert_eq!(session.phase(), Phase::Typing);

    // Backspacing the stray character and terminating properly still finishes.
    assert_matches!(session.submit("ab\n"), Ok(Feedback::Finished(_)));
    assert_eq!(session.phase(), Phase::Finished);
}

#[test]
fn uncorrected_error_still_allows_typing_but_never_completes() {
    let clock = ManualClock::new();
    let mut session = Session::with_clock(clock.clone());
    let corpus = Corpus::from_text("точно".to_string());

    session.start(&corpus).unwrap();

    // Wrong third letter, flagged while it sits under the cursor...
    assert_matches!(session.submit("тоí"), Ok(Feedback::FixError));
    // ...then the user types past it: stale error, advisory goes quiet.
    assert_matches!(session.submit("тоíно"), Ok(Feedback::KeepTyping));
    // Even with the terminator the earlier mismatch blocks completion.
    assert_matches!(session.submit("тоíно\n"), Ok(Feedback::KeepTyping));
    assert_eq!(session.phase(), Phase::Typing);
}
