// ============================================================================
// PARTICIPANTS & SECTOR GEOMETRY
// ============================================================================

use std::f64::consts::TAU;

use crate::config::PALETTE;

/// Opaque participant identity. Names are for display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticipantId(pub u64);

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
}

impl Participant {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id: ParticipantId(id),
            name: name.into(),
        }
    }

    /// Numbers the names in order, starting at 1.
    pub fn roster<I, S>(names: I) -> Vec<Participant>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names
            .into_iter()
            .enumerate()
            .map(|(i, name)| Participant::new(i as u64 + 1, name))
            .collect()
    }
}

/// One angular slice of the wheel, in wheel-local radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sector {
    pub index: usize,
    pub start_angle: f64,
    pub end_angle: f64,
    pub color_index: usize,
}

impl Sector {
    pub fn arc(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    pub fn center_angle(&self) -> f64 {
        (self.start_angle + self.end_angle) / 2.0
    }
}

/// Equal sectors partitioning the full circle, sector `i` for participant `i`.
pub fn layout(participants: &[Participant]) -> Vec<Sector> {
    let n = participants.len();
    if n == 0 {
        return Vec::new();
    }
    let arc = TAU / n as f64;
    (0..n)
        .map(|i| Sector {
            index: i,
            start_angle: i as f64 * arc,
            // the last boundary is pinned so the partition closes exactly
            end_angle: if i + 1 == n { TAU } else { (i + 1) as f64 * arc },
            color_index: i % PALETTE.len(),
        })
        .collect()
}

/// The participant sequence together with the sectors derived from it.
///
/// Built fresh whenever the sequence changes; the animator clones one at the
/// start of a spin and targets that copy until the spin settles.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WheelLayout {
    participants: Vec<Participant>,
    sectors: Vec<Sector>,
}

impl WheelLayout {
    pub fn new(participants: &[Participant]) -> Self {
        Self {
            participants: participants.to_vec(),
            sectors: layout(participants),
        }
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn sectors(&self) -> &[Sector] {
        &self.sectors
    }

    pub fn sector_count(&self) -> usize {
        self.sectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }

    pub fn sector_arc(&self) -> f64 {
        if self.sectors.is_empty() {
            0.0
        } else {
            TAU / self.sectors.len() as f64
        }
    }

    pub fn index_of(&self, id: ParticipantId) -> Option<usize> {
        self.participants.iter().position(|p| p.id == id)
    }

    /// Sector and participant pairs in wheel order.
    pub fn iter(&self) -> impl Iterator<Item = (&Sector, &Participant)> {
        self.sectors.iter().zip(self.participants.iter())
    }
}
