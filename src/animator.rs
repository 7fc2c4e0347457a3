//! Spin animator: drives the wheel from rest to a pre-determined sector.
//!
//! The animator owns `{angle, velocity, phase}` exclusively. A host calls
//! [`SpinAnimator::advance_frame`] once per tick and keeps scheduling ticks
//! for as long as it answers [`FrameRequest::NextFrame`].
//!
//! Each frame the velocity is proportional to the distance left:
//!
//! ```text
//! velocity = friction * (target - angle) * gain
//! angle   += velocity
//! ```
//!
//! so the wheel approaches the target exponentially and never overshoots.
//! Once the velocity falls below `stop_epsilon` (or the target is reached)
//! the angle is snapped onto the target and the completion callback fires.

use std::f64::consts::TAU;

use log::{debug, info};

use crate::error::{Result, SpinRejection, WheelError};
use crate::layout::{Participant, WheelLayout};

/// Tuning constants for the deceleration model. Angles are radians,
/// velocities radians per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinPhysics {
    pub initial_velocity: f64,
    pub friction: f64,
    pub gain: f64,
    pub stop_epsilon: f64,
    pub extra_rotations: u32,
}

impl Default for SpinPhysics {
    fn default() -> Self {
        Self {
            initial_velocity: 0.35,
            friction: 0.991,
            gain: 0.05,
            stop_epsilon: 0.002,
            extra_rotations: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinPhase {
    Idle,
    Spinning,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationState {
    pub angle: f64,
    pub velocity: f64,
    pub phase: SpinPhase,
}

impl Default for AnimationState {
    fn default() -> Self {
        Self {
            angle: 0.0,
            velocity: 0.0,
            phase: SpinPhase::Idle,
        }
    }
}

/// What the host should do with its per-frame callback after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum FrameRequest {
    NextFrame,
    Release,
}

/// Absolute rotation that centres sector `index` of `sector_count` under the
/// pointer after `extra_rotations` full turns.
pub fn target_angle(index: usize, sector_count: usize, extra_rotations: u32) -> f64 {
    let arc = TAU / sector_count as f64;
    extra_rotations as f64 * TAU + (sector_count as f64 - index as f64 - 0.5) * arc
}

pub struct SpinAnimator {
    physics: SpinPhysics,
    state: AnimationState,
    target: f64,
    snapshot: Option<WheelLayout>,
    on_spin_complete: Option<Box<dyn FnMut()>>,
}

impl std::fmt::Debug for SpinAnimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpinAnimator")
            .field("physics", &self.physics)
            .field("state", &self.state)
            .field("target", &self.target)
            .field("snapshot", &self.snapshot.as_ref().map(WheelLayout::sector_count))
            .field("on_spin_complete", &self.on_spin_complete.is_some())
            .finish()
    }
}

impl Default for SpinAnimator {
    fn default() -> Self {
        Self::new(SpinPhysics::default())
    }
}

impl SpinAnimator {
    pub fn new(physics: SpinPhysics) -> Self {
        Self {
            physics,
            state: AnimationState::default(),
            target: 0.0,
            snapshot: None,
            on_spin_complete: None,
        }
    }

    /// Registers the callback fired once at the end of every spin.
    pub fn set_on_spin_complete(&mut self, callback: impl FnMut() + 'static) {
        self.on_spin_complete = Some(Box::new(callback));
    }

    pub fn current_angle(&self) -> f64 {
        self.state.angle
    }

    pub fn phase(&self) -> SpinPhase {
        self.state.phase
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn is_spinning(&self) -> bool {
        self.state.phase == SpinPhase::Spinning
    }

    /// Target of the current (or last) spin.
    pub fn target(&self) -> f64 {
        self.target
    }

    /// The layout being targeted, only while spinning.
    pub fn snapshot(&self) -> Option<&WheelLayout> {
        self.snapshot.as_ref()
    }

    pub fn physics(&self) -> &SpinPhysics {
        &self.physics
    }

    /// Starts a spin that will come to rest with `chosen` under the pointer.
    ///
    /// Rejections leave angle, velocity and phase untouched.
    pub fn begin(&mut self, chosen: &Participant, layout: &WheelLayout) -> Result<()> {
        if self.is_spinning() {
            return Err(WheelError::InvalidSpinRequest(SpinRejection::AlreadySpinning));
        }
        if layout.is_empty() {
            return Err(WheelError::InvalidSpinRequest(SpinRejection::EmptyLayout));
        }
        let index = layout
            .index_of(chosen.id)
            .ok_or(WheelError::InvalidSpinRequest(SpinRejection::NotInLayout(
                chosen.id,
            )))?;

        self.target = target_angle(index, layout.sector_count(), self.physics.extra_rotations);
        self.snapshot = Some(layout.clone());
        self.state = AnimationState {
            angle: 0.0,
            velocity: self.physics.initial_velocity,
            phase: SpinPhase::Spinning,
        };
        debug!(
            "spin started for {} ({}) at sector {index}/{}, target {:.4} rad",
            chosen.name,
            chosen.id,
            layout.sector_count(),
            self.target
        );
        Ok(())
    }

    /// Advances the spin by one frame.
    pub fn advance_frame(&mut self) -> FrameRequest {
        if self.state.phase != SpinPhase::Spinning {
            return FrameRequest::Release;
        }

        let remaining = self.target - self.state.angle;
        let velocity = self.physics.friction * remaining * self.physics.gain;
        if velocity < self.physics.stop_epsilon {
            self.settle();
            return FrameRequest::Release;
        }

        self.state.velocity = velocity;
        self.state.angle += velocity;
        if self.state.angle >= self.target {
            self.settle();
            return FrameRequest::Release;
        }
        FrameRequest::NextFrame
    }

    /// Abandons an in-flight spin without reporting completion.
    pub fn cancel(&mut self) {
        if self.is_spinning() {
            debug!("spin cancelled at {:.4} rad", self.state.angle);
        }
        self.state.velocity = 0.0;
        self.state.phase = SpinPhase::Idle;
        self.snapshot = None;
    }

    fn settle(&mut self) {
        self.state = AnimationState {
            angle: self.target,
            velocity: 0.0,
            phase: SpinPhase::Idle,
        };
        self.snapshot = None;
        info!("spin settled at {:.4} rad", self.target);
        if let Some(callback) = self.on_spin_complete.as_mut() {
            callback();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::cell::Cell;
    use std::f64::consts::PI;
    use std::rc::Rc;

    use crate::layout::ParticipantId;

    fn wheel(n: usize) -> WheelLayout {
        WheelLayout::new(&Participant::roster((0..n).map(|i| format!("P{i}"))))
    }

    fn counting(animator: &mut SpinAnimator) -> Rc<Cell<usize>> {
        let count = Rc::new(Cell::new(0));
        let seen = Rc::clone(&count);
        animator.set_on_spin_complete(move || seen.set(seen.get() + 1));
        count
    }

    fn run_to_rest(animator: &mut SpinAnimator) -> usize {
        let mut frames = 0;
        while animator.advance_frame() == FrameRequest::NextFrame {
            frames += 1;
            assert!(frames < 100_000, "spin never settled");
        }
        frames
    }

    #[test]
    fn test_angle_is_zero_before_first_spin() {
        let animator = SpinAnimator::default();
        assert_eq!(animator.current_angle(), 0.0);
        assert_eq!(animator.phase(), SpinPhase::Idle);
        assert!(animator.snapshot().is_none());
    }

    #[test]
    fn test_four_participants_land_on_third() {
        let layout = wheel(4);
        let chosen = layout.participants()[2].clone();
        let mut animator = SpinAnimator::default();
        let completions = counting(&mut animator);

        animator.begin(&chosen, &layout).unwrap();
        assert_eq!(animator.phase(), SpinPhase::Spinning);
        assert_eq!(animator.current_angle(), 0.0);
        assert_eq!(animator.state().velocity, SpinPhysics::default().initial_velocity);

        run_to_rest(&mut animator);
        assert_eq!(animator.phase(), SpinPhase::Idle);
        assert!((animator.current_angle() - 10.75 * PI).abs() < 1e-12);
        assert_eq!(animator.current_angle(), target_angle(2, 4, 5));
        assert_eq!(completions.get(), 1);
    }

    #[test]
    fn test_idle_ticks_do_not_refire_completion() {
        let layout = wheel(3);
        let mut animator = SpinAnimator::default();
        let completions = counting(&mut animator);
        animator.begin(&layout.participants()[0], &layout).unwrap();
        run_to_rest(&mut animator);

        for _ in 0..50 {
            assert_eq!(animator.advance_frame(), FrameRequest::Release);
        }
        assert_eq!(completions.get(), 1);
        assert_eq!(animator.state().velocity, 0.0);
    }

    #[test]
    fn test_rejects_unknown_participant() {
        let layout = wheel(3);
        let mut animator = SpinAnimator::default();
        let before = animator.state();
        let stranger = Participant::new(99, "Stranger");

        let err = animator.begin(&stranger, &layout).unwrap_err();
        assert!(matches!(
            err,
            WheelError::InvalidSpinRequest(SpinRejection::NotInLayout(ParticipantId(99)))
        ));
        assert_eq!(animator.state(), before);
        assert!(animator.snapshot().is_none());
    }

    #[test]
    fn test_rejects_empty_layout() {
        let mut animator = SpinAnimator::default();
        let err = animator
            .begin(&Participant::new(1, "Solo"), &WheelLayout::default())
            .unwrap_err();
        assert!(matches!(
            err,
            WheelError::InvalidSpinRequest(SpinRejection::EmptyLayout)
        ));
    }

    #[test]
    fn test_rejects_begin_while_spinning() {
        let layout = wheel(5);
        let mut animator = SpinAnimator::default();
        animator.begin(&layout.participants()[1], &layout).unwrap();
        for _ in 0..10 {
            let _ = animator.advance_frame();
        }
        let mid_spin = animator.state();
        let target = animator.target();

        let err = animator.begin(&layout.participants()[3], &layout).unwrap_err();
        assert!(matches!(
            err,
            WheelError::InvalidSpinRequest(SpinRejection::AlreadySpinning)
        ));
        assert_eq!(animator.state(), mid_spin);
        assert_eq!(animator.target(), target);
    }

    #[test]
    fn test_snapshot_is_frozen_for_the_spin() {
        let mut people = Participant::roster(["A", "B", "C", "D"]);
        let layout = WheelLayout::new(&people);
        let chosen = people[3].clone();
        let mut animator = SpinAnimator::default();
        animator.begin(&chosen, &layout).unwrap();

        // the caller's roster shrinks mid-spin; the target must not move
        people.remove(0);
        let _ = WheelLayout::new(&people);
        run_to_rest(&mut animator);
        assert_eq!(animator.current_angle(), target_angle(3, 4, 5));
    }

    #[test]
    fn test_cancel_skips_completion() {
        let layout = wheel(4);
        let mut animator = SpinAnimator::default();
        let completions = counting(&mut animator);
        animator.begin(&layout.participants()[0], &layout).unwrap();
        let _ = animator.advance_frame();
        animator.cancel();

        assert_eq!(animator.phase(), SpinPhase::Idle);
        assert_eq!(animator.state().velocity, 0.0);
        assert_eq!(animator.advance_frame(), FrameRequest::Release);
        assert_eq!(completions.get(), 0);

        // a fresh spin is accepted afterwards
        animator.begin(&layout.participants()[1], &layout).unwrap();
        run_to_rest(&mut animator);
        assert_eq!(completions.get(), 1);
    }

    #[test]
    fn test_second_spin_restarts_from_zero() {
        let layout = wheel(6);
        let mut animator = SpinAnimator::default();
        let completions = counting(&mut animator);
        animator.begin(&layout.participants()[5], &layout).unwrap();
        run_to_rest(&mut animator);
        animator.begin(&layout.participants()[0], &layout).unwrap();
        assert_eq!(animator.current_angle(), 0.0);
        run_to_rest(&mut animator);
        assert_eq!(animator.current_angle(), target_angle(0, 6, 5));
        assert_eq!(completions.get(), 2);
    }

    #[test]
    fn test_single_sector_target() {
        // one participant: half a sector past five turns
        assert!((target_angle(0, 1, 5) - 11.0 * PI).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn spin_lands_exactly_on_target(n in 1usize..64, pick in any::<prop::sample::Index>()) {
            let layout = wheel(n);
            let k = pick.index(n);
            let mut animator = SpinAnimator::default();
            let completions = counting(&mut animator);
            animator.begin(&layout.participants()[k], &layout).unwrap();
            run_to_rest(&mut animator);
            prop_assert_eq!(animator.current_angle(), target_angle(k, n, 5));
            prop_assert_eq!(completions.get(), 1);
        }

        #[test]
        fn approach_is_monotonic(n in 1usize..32, pick in any::<prop::sample::Index>()) {
            let layout = wheel(n);
            let k = pick.index(n);
            let mut animator = SpinAnimator::default();
            animator.begin(&layout.participants()[k], &layout).unwrap();
            let target = animator.target();

            let mut previous = animator.state();
            let mut frames = 0usize;
            loop {
                let request = animator.advance_frame();
                let current = animator.state();
                prop_assert!(current.angle >= previous.angle);
                prop_assert!(current.velocity >= 0.0);
                if current.phase == SpinPhase::Idle {
                    prop_assert_eq!(current.velocity, 0.0);
                    prop_assert_eq!(request, FrameRequest::Release);
                    break;
                }
                prop_assert_eq!(request, FrameRequest::NextFrame);
                if frames > 0 && previous.angle >= target / 2.0 {
                    prop_assert!(current.velocity < previous.velocity);
                }
                previous = current;
                frames += 1;
            }
        }
    }
}
