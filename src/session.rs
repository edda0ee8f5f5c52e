use thiserror::Error;

use crate::compare::{self, Verdict};
use crate::corpus::Corpus;
use crate::surface::SessionObserver;
use crate::timer::{ActiveTimer, Clock, MonotonicClock};

/// Lifecycle phase of a typing session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    Idle,
    Typing,
    Paused,
    Finished,
}

/// Final speed report for a completed session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Report {
    pub elapsed_secs: f64,
    pub chars_per_sec: f64,
}

/// Advisory returned for every keystroke. Never an error: a mistyped
/// character keeps the session live and the user self-corrects.
#[derive(Clone, Debug, PartialEq)]
pub enum Feedback {
    KeepTyping,
    FixError,
    Finished(Report),
}

/// A lifecycle operation was invoked in a phase that forbids it. This is a
/// caller bug: the display surface is expected to only expose valid actions.
#[derive(Debug, Error)]
#[error("`{action}` is not valid while the session is {phase}")]
pub struct InvalidTransition {
    pub action: &'static str,
    pub phase: Phase,
}

/// One typing session: target text, phase, and pause-aware timing. All
/// mutation goes through the transition operations below; each successful
/// transition notifies the attached observer.
pub struct Session<C: Clock = MonotonicClock> {
    phase: Phase,
    target: Option<String>,
    timer: ActiveTimer<C>,
    final_elapsed_secs: Option<f64>,
    observer: Option<Box<dyn SessionObserver>>,
}

impl Session<MonotonicClock> {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self::with_clock(MonotonicClock)
    }
}

impl<C: Clock> Session<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            phase: Phase::Idle,
            target: None,
            timer: ActiveTimer::with_clock(clock),
            final_elapsed_secs: None,
            observer: None,
        }
    }

    pub fn set_observer(&mut self, observer: Box<dyn SessionObserver>) {
        self.observer = Some(observer);
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Active typing time so far, for live display. Frozen while paused.
    pub fn elapsed_active_secs(&self) -> f64 {
        self.timer.elapsed_active().as_secs_f64()
    }

    /// Final report, defined only once the session is finished.
    pub fn report(&self) -> Option<Report> {
        let elapsed_secs = self.final_elapsed_secs?;
        let chars = self.target.as_deref().unwrap_or_default().chars().count();
        let chars_per_sec = if elapsed_secs > 0.0 {
            chars as f64 / elapsed_secs
        } else {
            0.0
        };
        Some(Report {
            elapsed_secs,
            chars_per_sec,
        })
    }

    /// Begin a new session: pick a random target and start the timer.
    pub fn start(&mut self, corpus: &Corpus) -> Result<(), InvalidTransition> {
        match self.phase {
            Phase::Idle | Phase::Finished => {}
            phase => return Err(InvalidTransition { action: "start", phase }),
        }
        self.target = Some(corpus.pick(&mut rand::thread_rng()).to_string());
        self.final_elapsed_secs = None;
        self.timer.start();
        self.set_phase(Phase::Typing);
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), InvalidTransition> {
        if self.phase != Phase::Typing {
            return Err(InvalidTransition {
                action: "pause",
                phase: self.phase,
            });
        }
        self.timer.mark_pause();
        self.set_phase(Phase::Paused);
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), InvalidTransition> {
        if self.phase != Phase::Paused {
            return Err(InvalidTransition {
                action: "resume",
                phase: self.phase,
            });
        }
        self.timer.mark_resume();
        self.set_phase(Phase::Typing);
        Ok(())
    }

    /// Judge the current input prefix. On completion the timer stops, the
    /// final report is recorded, and the session moves to Finished.
    pub fn submit(&mut self, typed: &str) -> Result<Feedback, InvalidTransition> {
        if self.phase != Phase::Typing {
            return Err(InvalidTransition {
                action: "submit",
                phase: self.phase,
            });
        }
        let target = self.target.as_deref().unwrap_or_default();
        match compare::compare(target, typed) {
            Verdict::Continue => Ok(Feedback::KeepTyping),
            Verdict::ErrorAtLastChar => Ok(Feedback::FixError),
            Verdict::Complete => {
                let elapsed_secs = self.timer.stop().as_secs_f64();
                self.final_elapsed_secs = Some(elapsed_secs);
                self.set_phase(Phase::Finished);
                let report = self.report().unwrap_or(Report {
                    elapsed_secs,
                    chars_per_sec: 0.0,
                });
                Ok(Feedback::Finished(report))
            }
        }
    }

    /// Unconditional return to Idle, valid from every phase but Idle itself.
    pub fn reset(&mut self) -> Result<(), InvalidTransition> {
        if self.phase == Phase::Idle {
            return Err(InvalidTransition {
                action: "reset",
                phase: self.phase,
            });
        }
        self.target = None;
        self.final_elapsed_secs = None;
        self.timer.clear();
        self.set_phase(Phase::Idle);
        Ok(())
    }

    fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
        if let Some(observer) = self.observer.as_mut() {
            observer.state_changed(phase, self.target.as_deref());
        }
    }
}
