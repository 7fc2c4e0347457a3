//! Caller-side bookkeeping for a meeting: who is still in the pool, who has
//! already been picked, and the choice currently being revealed.

use log::{debug, info};
use rand::Rng;

use crate::error::{Result, WheelError};
use crate::layout::{Participant, ParticipantId};

#[derive(Debug, Clone, Default)]
pub struct SelectionSession {
    participants: Vec<Participant>,
    selected: Vec<Participant>,
    pending: Option<Participant>,
}

impl SelectionSession {
    pub fn new(participants: Vec<Participant>) -> Self {
        Self {
            participants,
            selected: Vec::new(),
            pending: None,
        }
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Participants not yet selected, in roster order.
    pub fn remaining(&self) -> Vec<Participant> {
        self.participants
            .iter()
            .filter(|p| !self.is_selected(p.id))
            .cloned()
            .collect()
    }

    pub fn selected(&self) -> &[Participant] {
        &self.selected
    }

    pub fn pending(&self) -> Option<&Participant> {
        self.pending.as_ref()
    }

    pub fn is_exhausted(&self) -> bool {
        self.participants.iter().all(|p| self.is_selected(p.id))
    }

    fn is_selected(&self, id: ParticipantId) -> bool {
        self.selected.iter().any(|s| s.id == id)
    }

    /// Picks uniformly among the remaining participants.
    pub fn choose_random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Participant> {
        if self.pending.is_some() {
            return Err(WheelError::SelectionPending);
        }
        let remaining = self.remaining();
        if remaining.is_empty() {
            return Err(WheelError::NoParticipantsRemaining);
        }
        let chosen = remaining[rng.random_range(0..remaining.len())].clone();
        debug!("randomly chose {} out of {}", chosen.name, remaining.len());
        self.pending = Some(chosen.clone());
        Ok(chosen)
    }

    /// Marks an externally decided participant as the pending choice.
    pub fn choose(&mut self, id: ParticipantId) -> Result<Participant> {
        if self.pending.is_some() {
            return Err(WheelError::SelectionPending);
        }
        if self.is_exhausted() {
            return Err(WheelError::NoParticipantsRemaining);
        }
        let chosen = self
            .participants
            .iter()
            .find(|p| p.id == id && !self.is_selected(id))
            .cloned()
            .ok_or(WheelError::UnknownParticipant(id))?;
        self.pending = Some(chosen.clone());
        Ok(chosen)
    }

    /// Records the pending choice; it will not appear on later wheels.
    pub fn confirm(&mut self) -> Option<Participant> {
        let chosen = self.pending.take()?;
        info!(
            "selected {} ({} of {})",
            chosen.name,
            self.selected.len() + 1,
            self.participants.len()
        );
        self.selected.push(chosen.clone());
        Some(chosen)
    }

    pub fn abandon(&mut self) -> Option<Participant> {
        self.pending.take()
    }

    /// Replaces the roster, keeping history only for people still on it.
    pub fn set_participants(&mut self, participants: Vec<Participant>) {
        let on_roster = |id: ParticipantId| participants.iter().any(|p| p.id == id);
        self.selected.retain(|s| on_roster(s.id));
        if self.pending.as_ref().is_some_and(|p| !on_roster(p.id)) {
            self.pending = None;
        }
        self.participants = participants;
    }

    pub fn reset(&mut self) {
        self.selected.clear();
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn session() -> SelectionSession {
        SelectionSession::new(Participant::roster(["Ada", "Brian", "Cleo", "Dev"]))
    }

    #[test]
    fn test_confirm_removes_from_pool() {
        let mut session = session();
        let chosen = session.choose(ParticipantId(2)).unwrap();
        assert_eq!(chosen.name, "Brian");
        // still on the wheel until the spin completes
        assert_eq!(session.remaining().len(), 4);

        assert_eq!(session.confirm(), Some(chosen));
        let names: Vec<_> = session.remaining().into_iter().map(|p| p.name).collect();
        assert_eq!(names, ["Ada", "Cleo", "Dev"]);
        assert_eq!(session.selected().len(), 1);
        assert_eq!(session.confirm(), None);
    }

    #[test]
    fn test_pending_blocks_second_choice() {
        let mut session = session();
        session.choose(ParticipantId(1)).unwrap();
        assert!(matches!(
            session.choose(ParticipantId(3)),
            Err(WheelError::SelectionPending)
        ));
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            session.choose_random(&mut rng),
            Err(WheelError::SelectionPending)
        ));
        session.abandon();
        assert!(session.choose(ParticipantId(3)).is_ok());
    }

    #[test]
    fn test_cannot_choose_someone_already_selected() {
        let mut session = session();
        session.choose(ParticipantId(4)).unwrap();
        session.confirm();
        assert!(matches!(
            session.choose(ParticipantId(4)),
            Err(WheelError::UnknownParticipant(ParticipantId(4)))
        ));
        assert!(matches!(
            session.choose(ParticipantId(40)),
            Err(WheelError::UnknownParticipant(_))
        ));
    }

    #[test]
    fn test_random_choices_exhaust_the_pool() {
        let mut session = session();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..4 {
            session.choose_random(&mut rng).unwrap();
            session.confirm().unwrap();
        }
        assert!(session.is_exhausted());
        let mut ids: Vec<_> = session.selected().iter().map(|p| p.id.0).collect();
        ids.sort_unstable();
        assert_eq!(ids, [1, 2, 3, 4]);
        assert!(matches!(
            session.choose_random(&mut rng),
            Err(WheelError::NoParticipantsRemaining)
        ));
    }

    #[test]
    fn test_set_participants_prunes_history_and_pending() {
        let mut session = session();
        session.choose(ParticipantId(1)).unwrap();
        session.confirm();
        session.choose(ParticipantId(2)).unwrap();

        session.set_participants(vec![
            Participant::new(2, "Brian"),
            Participant::new(5, "Eve"),
        ]);
        assert!(session.selected().is_empty());
        assert_eq!(session.pending().map(|p| p.id), Some(ParticipantId(2)));

        session.set_participants(vec![Participant::new(5, "Eve")]);
        assert!(session.pending().is_none());
    }

    #[test]
    fn test_reset_restores_full_pool() {
        let mut session = session();
        session.choose(ParticipantId(3)).unwrap();
        session.confirm();
        session.reset();
        assert_eq!(session.remaining().len(), 4);
        assert!(session.selected().is_empty());
    }

    #[test]
    fn test_empty_roster_is_exhausted() {
        let mut session = SelectionSession::default();
        assert!(session.is_exhausted());
        assert!(matches!(
            session.choose(ParticipantId(1)),
            Err(WheelError::NoParticipantsRemaining)
        ));
    }
}
