//! Spin controller - randomized rotation with analytic winner resolution
//!
//! One controller owns one `SpinState` at a time. A spin request draws the
//! winning segment up front, then solves for a target rotation that parks
//! that segment under the pointer; the animation is a pure function of
//! elapsed time sampled on each tick, so settlement is deterministic and the
//! predetermined winner and the geometrically resolved one cannot diverge.

use rand::prelude::*;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::choices::Choice;
use crate::wheel::segments::{WheelLayout, FULL_TURN, POINTER_ANGLE};

/// Animation tuning, overridable from the config file
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinTuning {
    /// Total animation duration in milliseconds
    pub duration_ms: u64,
    /// Whole revolutions every spin makes at minimum
    pub min_turns: f64,
    /// Additional revolutions drawn uniformly on top of `min_turns`
    pub extra_turns: f64,
}

impl Default for SpinTuning {
    fn default() -> Self {
        Self {
            duration_ms: 5_000,
            min_turns: 5.0,
            extra_turns: 5.0,
        }
    }
}

impl SpinTuning {
    /// Floor out-of-range values so a hand-edited config cannot stall or
    /// panic the controller
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let mut tuning = self;

        if tuning.duration_ms == 0 {
            tracing::warn!("duration_ms must be positive, using default");
            tuning.duration_ms = defaults.duration_ms;
        }
        if !tuning.min_turns.is_finite() || tuning.min_turns < 1.0 {
            tracing::warn!(min_turns = tuning.min_turns, "min_turns floored to 1");
            tuning.min_turns = 1.0;
        }
        if !tuning.extra_turns.is_finite() || tuning.extra_turns <= 0.0 {
            tracing::warn!(extra_turns = tuning.extra_turns, "extra_turns floored to 0.5");
            tuning.extra_turns = 0.5;
        }

        tuning
    }
}

/// Lifecycle phase of the current spin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Spinning,
    Settled,
}

/// Snapshot of one spin's progress.
///
/// Replaced wholesale on every accepted spin request, never patched. The
/// layout captured at spin time is the read-only choice snapshot the spin
/// resolves against, even if the live list changes mid-flight.
#[derive(Debug, Clone)]
pub struct SpinState {
    pub phase: Phase,
    /// Current rotation in degrees, unbounded and non-decreasing while spinning
    pub rotation: f64,
    pub target_rotation: f64,
    pub started_at_ms: u64,
    /// Set exactly once, at settlement
    pub winner: Option<Choice>,
    start_rotation: f64,
    drawn_index: usize,
    layout: WheelLayout,
}

impl SpinState {
    fn resting(rotation: f64) -> Self {
        Self {
            phase: Phase::Idle,
            rotation,
            target_rotation: rotation,
            started_at_ms: 0,
            winner: None,
            start_rotation: rotation,
            drawn_index: 0,
            layout: WheelLayout::default(),
        }
    }
}

/// Quartic ease-out: fast start, decelerating finish
fn ease_out_quart(x: f64) -> f64 {
    1.0 - (1.0 - x).powi(4)
}

/// Owns the spin lifecycle for one wheel instance.
///
/// Single-threaded by design: the caller drives `tick` from its own timer or
/// frame loop and the controller owns no callbacks of its own, so dropping it
/// mid-spin abandons the spin without publishing a winner.
pub struct SpinController {
    layout: WheelLayout,
    tuning: SpinTuning,
    state: SpinState,
    rng: StdRng,
}

impl SpinController {
    pub fn new(tuning: SpinTuning) -> Self {
        Self::with_rng(tuning, StdRng::from_entropy())
    }

    /// Deterministic controller for tests and reproducible simulations
    pub fn with_seed(tuning: SpinTuning, seed: u64) -> Self {
        Self::with_rng(tuning, StdRng::seed_from_u64(seed))
    }

    fn with_rng(tuning: SpinTuning, rng: StdRng) -> Self {
        Self {
            layout: WheelLayout::default(),
            tuning: tuning.sanitized(),
            state: SpinState::resting(0.0),
            rng,
        }
    }

    /// Replace the choice list. The live layout is recomputed immediately;
    /// a spin already in flight keeps resolving against its own snapshot.
    pub fn set_choices(&mut self, choices: &[Choice]) {
        self.layout = WheelLayout::new(choices);
        tracing::debug!(segments = self.layout.len(), "wheel layout recomputed");
    }

    pub fn layout(&self) -> &WheelLayout {
        &self.layout
    }

    pub fn state(&self) -> &SpinState {
        &self.state
    }

    pub fn is_spinning(&self) -> bool {
        self.state.phase == Phase::Spinning
    }

    /// True when a spin request would currently be accepted
    pub fn can_spin(&self) -> bool {
        self.layout.len() >= 2 && self.state.phase != Phase::Spinning
    }

    /// Request a spin. Returns `false` (leaving all state untouched) when the
    /// wheel has fewer than two segments or a spin is already running.
    pub fn spin(&mut self, now_ms: u64) -> bool {
        if !self.can_spin() {
            tracing::debug!(
                segments = self.layout.len(),
                phase = ?self.state.phase,
                "spin request ignored"
            );
            return false;
        }

        let n = self.layout.len();
        let width = self.layout.segment_width();

        // The fairness-bearing draw: every index equally likely
        let drawn = self.rng.gen_range(0..n);

        // Rest somewhere in the middle 80% of the drawn segment, clear of the
        // boundaries where floating-point rounding could flip the index
        let rest_angle = drawn as f64 * width + width * self.rng.gen_range(0.1..0.9);

        let current = self.state.rotation;
        let throw =
            FULL_TURN * (self.tuning.min_turns + self.rng.gen_range(0.0..self.tuning.extra_turns));

        // Extend the raw throw by the unique offset in [0, 360) that parks
        // `rest_angle` under the pointer: afterwards
        // (POINTER_ANGLE - target) mod 360 == rest_angle.
        let alignment = (POINTER_ANGLE - rest_angle - current - throw).rem_euclid(FULL_TURN);
        let target = current + throw + alignment;

        if !target.is_finite() {
            tracing::error!(target_rotation = target, "spin setup produced a non-finite target, staying put");
            return false;
        }

        self.state = SpinState {
            phase: Phase::Spinning,
            rotation: current,
            target_rotation: target,
            started_at_ms: now_ms,
            winner: None,
            start_rotation: current,
            drawn_index: drawn,
            layout: self.layout.clone(),
        };

        tracing::info!(
            segments = n,
            drawn,
            target_rotation = target,
            travel = target - current,
            "spin started"
        );
        true
    }

    /// Advance the animation to `now_ms`.
    ///
    /// Returns the winner exactly once, on the tick that settles the spin;
    /// every other call, including late ticks delivered after settlement,
    /// returns `None` and changes nothing.
    pub fn tick(&mut self, now_ms: u64) -> Option<Choice> {
        if self.state.phase != Phase::Spinning {
            return None;
        }

        let elapsed = now_ms.saturating_sub(self.state.started_at_ms);
        let duration = self.tuning.duration_ms;

        if elapsed < duration {
            let progress = elapsed as f64 / duration as f64;
            let travel = self.state.target_rotation - self.state.start_rotation;
            self.state.rotation = self.state.start_rotation + travel * ease_out_quart(progress);
            return None;
        }

        // Settle on the exact target; no residual easing drift can leak into
        // the winner lookup
        self.state.rotation = self.state.target_rotation;
        let resolved = self
            .state
            .layout
            .angle_to_index(POINTER_ANGLE - self.state.rotation)
            .unwrap_or(self.state.drawn_index);
        debug_assert_eq!(resolved, self.state.drawn_index);

        let winner = self.state.layout.segments()[resolved].choice.clone();
        self.state.phase = Phase::Settled;
        self.state.winner = Some(winner.clone());

        tracing::info!(
            winner = %winner.name,
            rotation = self.state.rotation,
            "wheel settled"
        );
        Some(winner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::choices::ChoiceList;
    use std::collections::HashMap;

    // Default animation duration, matching SpinTuning::default()
    const D: u64 = 5_000;

    fn controller_with(names: &[&str], seed: u64) -> SpinController {
        let list = ChoiceList::from_names(names.iter().copied());
        let mut controller = SpinController::with_seed(SpinTuning::default(), seed);
        controller.set_choices(list.entries());
        controller
    }

    fn settle(controller: &mut SpinController, start_ms: u64) -> Choice {
        let winner = controller.tick(start_ms + D);
        winner.expect("spin should settle at t >= duration")
    }

    #[test]
    fn test_ease_out_quart_shape() {
        assert_eq!(ease_out_quart(0.0), 0.0);
        assert_eq!(ease_out_quart(1.0), 1.0);

        // Monotonic, and decelerating toward the end
        let mut last = 0.0;
        for i in 1..=100 {
            let v = ease_out_quart(i as f64 / 100.0);
            assert!(v >= last);
            last = v;
        }
        let early = ease_out_quart(0.1) - ease_out_quart(0.0);
        let late = ease_out_quart(1.0) - ease_out_quart(0.9);
        assert!(early > late);
    }

    #[test]
    fn test_spin_rejected_below_two_choices() {
        for names in [&[][..], &["only"][..]] {
            let mut controller = controller_with(names, 1);
            assert!(!controller.can_spin());
            assert!(!controller.spin(0));
            assert_eq!(controller.state().phase, Phase::Idle);
            assert_eq!(controller.state().rotation, 0.0);
            assert!(controller.tick(10_000).is_none());
            assert_eq!(controller.state().phase, Phase::Idle);
        }
    }

    #[test]
    fn test_spin_rejected_while_spinning() {
        let mut controller = controller_with(&["A", "B", "C"], 2);
        assert!(controller.spin(0));

        let state_before = controller.state().clone();
        assert!(!controller.spin(100));
        assert_eq!(controller.state().target_rotation, state_before.target_rotation);
        assert_eq!(controller.state().started_at_ms, state_before.started_at_ms);
    }

    #[test]
    fn test_no_premature_settlement() {
        let mut controller = controller_with(&["A", "B", "C", "D"], 3);
        assert!(controller.spin(1_000));

        for t in [1_000, 1_001, 2_500, 4_000, 1_000 + D - 1] {
            assert!(controller.tick(t).is_none());
            assert_eq!(controller.state().phase, Phase::Spinning);
            assert!(controller.state().winner.is_none());
        }
    }

    #[test]
    fn test_rotation_is_monotonic_while_spinning() {
        let mut controller = controller_with(&["A", "B", "C", "D", "E"], 4);
        assert!(controller.spin(0));

        let mut last = controller.state().rotation;
        let mut t = 0;
        while t <= D {
            controller.tick(t);
            let rotation = controller.state().rotation;
            assert!(rotation >= last);
            last = rotation;
            t += 50;
        }
    }

    #[test]
    fn test_settles_exactly_on_target() {
        let mut controller = controller_with(&["A", "B", "C"], 5);
        assert!(controller.spin(500));

        let target = controller.state().target_rotation;
        let winner = settle(&mut controller, 500);

        assert_eq!(controller.state().phase, Phase::Settled);
        assert_eq!(controller.state().rotation, target);
        assert_eq!(controller.state().winner.as_ref(), Some(&winner));
    }

    #[test]
    fn test_extra_ticks_after_settlement_change_nothing() {
        let mut controller = controller_with(&["A", "B", "C"], 6);
        assert!(controller.spin(0));
        let winner = settle(&mut controller, 0);

        for t in [D, D + 1, D + 500, D * 10] {
            assert!(controller.tick(t).is_none());
            assert_eq!(controller.state().phase, Phase::Settled);
            assert_eq!(controller.state().winner.as_ref(), Some(&winner));
        }
    }

    #[test]
    fn test_winner_matches_pointer_segment() {
        let mut controller = controller_with(&["A", "B", "C", "D", "E", "F"], 7);
        assert!(controller.spin(0));
        let winner = settle(&mut controller, 0);

        let resolved = controller
            .state()
            .layout
            .choice_at(POINTER_ANGLE - controller.state().rotation)
            .cloned();
        assert_eq!(resolved, Some(winner));
    }

    #[test]
    fn test_drawn_and_resolved_winner_agree_for_all_sizes() {
        for n in 2..=20 {
            let names: Vec<String> = (0..n).map(|i| format!("choice-{}", i)).collect();
            let list = ChoiceList::from_names(names);
            let mut controller = SpinController::with_seed(SpinTuning::default(), n as u64);
            controller.set_choices(list.entries());

            let mut now = 0;
            for _ in 0..50 {
                assert!(controller.spin(now));
                let drawn = controller.state().drawn_index;
                let winner = settle(&mut controller, now);
                assert_eq!(winner, controller.state().layout.segments()[drawn].choice);
                now += D + 1;
            }
        }
    }

    #[test]
    fn test_four_choice_scenario_resolves_to_c() {
        // 1800 + 45 degrees from rest: the pointer reads 270 - 1845 = 225
        // (mod 360), inside C's [180, 270) arc
        let list = ChoiceList::from_names(["A", "B", "C", "D"]);
        let layout = WheelLayout::new(list.entries());

        let final_rotation = 1_800.0 + 45.0;
        let index = layout.angle_to_index(POINTER_ANGLE - final_rotation);
        assert_eq!(index, Some(2));
        assert_eq!(layout.segments()[2].choice.name, "C");
    }

    #[test]
    fn test_travel_stays_within_configured_turns() {
        let mut controller = controller_with(&["A", "B", "C", "D"], 8);
        let mut now = 0;
        for _ in 0..200 {
            assert!(controller.spin(now));
            let travel = controller.state().target_rotation - controller.state().rotation;
            // min_turns revolutions up to extra_turns more, plus < 1 turn of alignment
            assert!(travel >= 5.0 * 360.0);
            assert!(travel < (5.0 + 5.0 + 1.0) * 360.0);
            settle(&mut controller, now);
            now += D + 1;
        }
    }

    #[test]
    fn test_rotation_carries_across_spins() {
        let mut controller = controller_with(&["A", "B"], 9);
        assert!(controller.spin(0));
        settle(&mut controller, 0);
        let after_first = controller.state().rotation;
        assert!(after_first > 0.0);

        assert!(controller.spin(D + 1));
        assert_eq!(controller.state().rotation, after_first);
        assert!(controller.state().target_rotation > after_first);
    }

    #[test]
    fn test_seeded_controllers_are_deterministic() {
        let run = || {
            let mut controller = controller_with(&["A", "B", "C", "D", "E"], 1234);
            let mut winners = Vec::new();
            let mut now = 0;
            for _ in 0..20 {
                assert!(controller.spin(now));
                winners.push(settle(&mut controller, now).name);
                now += D + 1;
            }
            winners
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_mid_spin_choice_replacement_keeps_snapshot() {
        let mut controller = controller_with(&["A", "B", "C", "D"], 10);
        assert!(controller.spin(0));
        let drawn = controller.state().drawn_index;

        // Shrink the live list mid-flight; the spin resolves against the
        // four-segment snapshot it captured
        let two = ChoiceList::from_names(["X", "Y"]);
        controller.set_choices(two.entries());
        assert_eq!(controller.layout().len(), 2);

        let winner = settle(&mut controller, 0);
        let expected = ["A", "B", "C", "D"][drawn];
        assert_eq!(winner.name, expected);
    }

    #[test]
    fn test_fairness_over_many_spins() {
        let names = ["A", "B", "C", "D", "E"];
        let mut controller = controller_with(&names, 42);

        let spins = 100_000;
        let mut counts: HashMap<String, u32> = HashMap::new();
        let mut now = 0;
        for _ in 0..spins {
            assert!(controller.spin(now));
            let winner = settle(&mut controller, now);
            *counts.entry(winner.name).or_insert(0) += 1;
            now += D + 1;
        }

        // Expected 20_000 each; allow 3% absolute drift, far beyond the
        // ~0.13% standard deviation of a fair wheel at this sample size
        let expected = spins / names.len() as u32;
        let tolerance = spins * 3 / 100;
        for name in names {
            let count = counts.get(name).copied().unwrap_or(0);
            assert!(
                count.abs_diff(expected) < tolerance,
                "{} won {} of {} spins",
                name,
                count,
                spins
            );
        }
    }

    #[test]
    fn test_tuning_sanitization() {
        let bad = SpinTuning {
            duration_ms: 0,
            min_turns: f64::NAN,
            extra_turns: -3.0,
        }
        .sanitized();

        assert_eq!(bad.duration_ms, 5_000);
        assert_eq!(bad.min_turns, 1.0);
        assert_eq!(bad.extra_turns, 0.5);

        let good = SpinTuning::default().sanitized();
        assert_eq!(good.duration_ms, 5_000);
        assert_eq!(good.min_turns, 5.0);
        assert_eq!(good.extra_turns, 5.0);
    }
}
