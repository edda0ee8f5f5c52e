use std::cell::RefCell;
use std::rc::Rc;

use crate::session::Phase;

/// Contract the session exposes to a display surface. Invoked after every
/// successful transition with the new phase and the current target text, so
/// the surface can render the prompt and toggle control availability.
pub trait SessionObserver {
    fn state_changed(&mut self, phase: Phase, target: Option<&str>);
}

/// Shared transition log filled in by a [`RecordingObserver`].
pub type TransitionLog = Rc<RefCell<Vec<(Phase, Option<String>)>>>;

/// Observer that records every transition; used by headless tests.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    log: TransitionLog,
}

impl RecordingObserver {
    /// Build an observer together with a handle onto its log.
    pub fn new() -> (Self, TransitionLog) {
        let log: TransitionLog = Rc::default();
        (Self { log: Rc::clone(&log) }, log)
    }
}

impl SessionObserver for RecordingObserver {
    fn state_changed(&mut self, phase: Phase, target: Option<&str>) {
        self.log
            .borrow_mut()
            .push((phase, target.map(str::to_string)));
    }
}
