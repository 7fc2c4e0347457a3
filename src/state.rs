use std::cell::Cell;
use std::rc::Rc;
use std::sync::mpsc::Receiver;

use log::{debug, warn};
use rand::Rng;

use crate::animator::{FrameRequest, SpinAnimator, SpinPhysics};
use crate::error::{Result, SpinRejection, WheelError};
use crate::layout::{Participant, ParticipantId, WheelLayout};
use crate::session::SelectionSession;

/// Command enum for driving a running wheel from another thread
#[derive(Debug, Clone)]
pub enum WheelCommand {
    SpinRandom,
    SpinTo(ParticipantId),
    SetParticipants(Vec<Participant>),
    ResetHistory,
}

/// Per-window state: the meeting, the wheel currently shown, and the spin.
pub struct AppState {
    session: SelectionSession,
    layout: WheelLayout,
    animator: SpinAnimator,
    finished: Rc<Cell<bool>>,
    caption: Option<String>,
    layout_stale: bool,
}

impl AppState {
    pub fn new(session: SelectionSession, physics: SpinPhysics) -> Self {
        let finished = Rc::new(Cell::new(false));
        let mut animator = SpinAnimator::new(physics);
        let flag = Rc::clone(&finished);
        animator.set_on_spin_complete(move || flag.set(true));

        let layout = WheelLayout::new(&session.remaining());
        let caption = empty_caption(&session);
        Self {
            session,
            layout,
            animator,
            finished,
            caption,
            layout_stale: false,
        }
    }

    pub fn session(&self) -> &SelectionSession {
        &self.session
    }

    pub fn animator(&self) -> &SpinAnimator {
        &self.animator
    }

    /// The layout to paint: the frozen snapshot while spinning.
    pub fn visible_layout(&self) -> &WheelLayout {
        self.animator.snapshot().unwrap_or(&self.layout)
    }

    pub fn angle(&self) -> f64 {
        self.animator.current_angle()
    }

    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    pub fn is_spinning(&self) -> bool {
        self.animator.is_spinning()
    }

    pub fn spin_random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        if self.is_spinning() {
            return Err(WheelError::InvalidSpinRequest(SpinRejection::AlreadySpinning));
        }
        let chosen = self.session.choose_random(rng)?;
        self.start_spin(chosen)
    }

    pub fn spin_to(&mut self, id: ParticipantId) -> Result<()> {
        if self.is_spinning() {
            return Err(WheelError::InvalidSpinRequest(SpinRejection::AlreadySpinning));
        }
        let chosen = self.session.choose(id)?;
        self.start_spin(chosen)
    }

    fn start_spin(&mut self, chosen: Participant) -> Result<()> {
        if let Err(err) = self.animator.begin(&chosen, &self.layout) {
            self.session.abandon();
            return Err(err);
        }
        self.caption = None;
        Ok(())
    }

    pub fn set_participants(&mut self, participants: Vec<Participant>) {
        self.session.set_participants(participants);
        self.refresh_layout();
    }

    pub fn reset_history(&mut self) {
        self.session.reset();
        self.refresh_layout();
    }

    fn refresh_layout(&mut self) {
        if self.is_spinning() {
            self.layout_stale = true;
            return;
        }
        self.layout_stale = false;
        self.layout = WheelLayout::new(&self.session.remaining());
        self.caption = empty_caption(&self.session);
    }

    /// Runs one tick of the spin and applies the result if it settled.
    pub fn update(&mut self) -> FrameRequest {
        let request = self.animator.advance_frame();
        if self.finished.replace(false) {
            self.on_spin_complete();
        }
        request
    }

    pub fn update_with_commands<R: Rng + ?Sized>(
        &mut self,
        receiver: &Receiver<WheelCommand>,
        rng: &mut R,
    ) -> FrameRequest {
        while let Ok(command) = receiver.try_recv() {
            self.apply(command, rng);
        }
        self.update()
    }

    pub fn apply<R: Rng + ?Sized>(&mut self, command: WheelCommand, rng: &mut R) {
        debug!("command: {command:?}");
        let outcome = match command {
            WheelCommand::SpinRandom => self.spin_random(rng),
            WheelCommand::SpinTo(id) => self.spin_to(id),
            WheelCommand::SetParticipants(participants) => {
                self.set_participants(participants);
                Ok(())
            }
            WheelCommand::ResetHistory => {
                self.reset_history();
                Ok(())
            }
        };
        if let Err(err) = outcome {
            warn!("ignoring request: {err}");
        }
    }

    /// Host teardown: drop the running spin and its unrevealed choice.
    pub fn shutdown(&mut self) {
        if self.is_spinning() {
            self.animator.cancel();
            self.session.abandon();
        }
    }

    fn on_spin_complete(&mut self) {
        let Some(chosen) = self.session.confirm() else {
            // the roster changed under the spin and dropped the choice
            self.refresh_layout();
            return;
        };
        self.layout_stale = false;
        self.layout = WheelLayout::new(&self.session.remaining());
        self.caption = Some(format!("Selected: {}", chosen.name));
    }

    pub fn needs_layout_refresh(&self) -> bool {
        self.layout_stale
    }
}

fn empty_caption(session: &SelectionSession) -> Option<String> {
    session
        .is_exhausted()
        .then(|| "No remaining participants".to_string())
}
