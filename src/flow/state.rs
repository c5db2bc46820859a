//! Onboarding step state machine — tracks which funnel step the user is on.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::model::{Results, UserData, UserField};

/// Step count used until a variant assigns its own.
pub const DEFAULT_TOTAL_STEPS: u32 = 37;

/// Which way the last navigation moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Forward => "forward",
            Self::Backward => "backward",
        };
        write!(f, "{s}")
    }
}

/// Transient mini-game state shown inside the funnel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub scan_game_completed: bool,
    pub spin_attempts: u32,
    /// Discount percentage from the most recent spin.
    pub discount_won: Option<u32>,
}

/// The onboarding store: current step, collected answers, results and game state.
///
/// Navigation keeps `1 <= current_step <= total_steps`. The one exception is
/// [`FlowStore::complete_payment`], which advances without clamping.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowStore {
    current_step: u32,
    total_steps: u32,
    user_data: UserData,
    results: Option<Results>,
    is_manual_navigation: bool,
    direction: Direction,
    game: GameState,
}

impl Default for FlowStore {
    fn default() -> Self {
        Self {
            current_step: 1,
            total_steps: DEFAULT_TOTAL_STEPS,
            user_data: UserData::default(),
            results: None,
            is_manual_navigation: false,
            direction: Direction::Forward,
            game: GameState::default(),
        }
    }
}

impl FlowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store sized for a variant with `total_steps` pages.
    pub fn with_total_steps(total_steps: u32) -> Self {
        let mut store = Self::default();
        store.set_total_steps(total_steps);
        store
    }

    pub fn current_step(&self) -> u32 {
        self.current_step
    }

    pub fn total_steps(&self) -> u32 {
        self.total_steps
    }

    pub fn user_data(&self) -> &UserData {
        &self.user_data
    }

    pub fn results(&self) -> Option<&Results> {
        self.results.as_ref()
    }

    pub fn is_manual_navigation(&self) -> bool {
        self.is_manual_navigation
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    /// Whether the user has reached (or passed) the last step.
    pub fn is_last_step(&self) -> bool {
        self.current_step >= self.total_steps
    }

    // ── Navigation ──────────────────────────────────────────────────

    /// Advance one step, stopping at the last one.
    pub fn next_step(&mut self) {
        self.current_step = self.current_step.saturating_add(1).min(self.total_steps);
        self.is_manual_navigation = false;
        self.direction = Direction::Forward;
        debug!(step = self.current_step, total = self.total_steps, "Next step");
    }

    /// Go back one step, stopping at step 1.
    pub fn prev_step(&mut self) {
        self.current_step = self.current_step.saturating_sub(1).max(1);
        self.is_manual_navigation = false;
        self.direction = Direction::Backward;
        debug!(step = self.current_step, total = self.total_steps, "Previous step");
    }

    /// Jump straight to `step`, clamped into `[1, total_steps]`.
    ///
    /// Direction compares the requested step (not the clamped one) with the
    /// step before the jump; an equal target counts as backward.
    pub fn go_to_step(&mut self, step: i64) {
        let previous = i64::from(self.current_step);
        let clamped = step.clamp(1, i64::from(self.total_steps));
        self.current_step = u32::try_from(clamped).unwrap_or(self.total_steps);
        self.is_manual_navigation = true;
        self.direction = if step > previous {
            Direction::Forward
        } else {
            Direction::Backward
        };
        debug!(
            requested = step,
            step = self.current_step,
            direction = %self.direction,
            "Jumped to step"
        );
    }

    /// Acknowledge a manual jump without moving.
    pub fn clear_manual_navigation(&mut self) {
        self.is_manual_navigation = false;
    }

    /// Assign the step count. The current step is not re-clamped.
    pub fn set_total_steps(&mut self, total: u32) {
        self.total_steps = total.max(1);
    }

    // ── Data ────────────────────────────────────────────────────────

    pub fn update_user_data(&mut self, partial: UserData) {
        self.user_data.merge(partial);
    }

    pub fn set_user_data(&mut self, field: UserField) {
        debug!(key = field.key(), "User data field set");
        self.user_data.set(field);
    }

    pub fn set_results(&mut self, results: Results) {
        self.results = Some(results);
    }

    // ── Games ───────────────────────────────────────────────────────

    pub fn complete_scan_game(&mut self) {
        self.game.scan_game_completed = true;
    }

    /// Record a spin. The latest discount always replaces the previous one,
    /// even when it is lower.
    pub fn spin_wheel(&mut self, discount: u32) {
        self.game.spin_attempts += 1;
        self.game.discount_won = Some(discount);
        debug!(attempts = self.game.spin_attempts, discount, "Wheel spun");
    }

    /// Move past the paywall step. Not clamped to `total_steps`.
    pub fn complete_payment(&mut self) {
        self.current_step = self.current_step.saturating_add(1);
        debug!(step = self.current_step, total = self.total_steps, "Payment completed");
    }

    /// Restore the initial funnel state, keeping `total_steps`.
    pub fn reset_demo(&mut self) {
        *self = Self {
            total_steps: self.total_steps,
            ..Self::default()
        };
        info!(total = self.total_steps, "Onboarding flow reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_at(step: i64) -> FlowStore {
        let mut store = FlowStore::new();
        store.go_to_step(step);
        store.clear_manual_navigation();
        store
    }

    #[test]
    fn default_state() {
        let store = FlowStore::default();
        assert_eq!(store.current_step(), 1);
        assert_eq!(store.total_steps(), DEFAULT_TOTAL_STEPS);
        assert!(store.user_data().is_empty());
        assert!(store.results().is_none());
        assert!(!store.is_manual_navigation());
        assert_eq!(store.direction(), Direction::Forward);
        assert_eq!(store.game(), &GameState::default());
    }

    #[test]
    fn go_to_step_clamps_every_target() {
        for n in [i64::MIN, -100, -1, 0, 1, 2, 18, 36, 37, 38, 1000, i64::MAX] {
            let mut store = FlowStore::new();
            store.go_to_step(n);
            let expected = n.clamp(1, 37) as u32;
            assert_eq!(store.current_step(), expected, "go_to_step({n})");
            assert!(store.is_manual_navigation());
        }
    }

    #[test]
    fn go_to_step_direction() {
        let mut store = store_at(10);
        store.go_to_step(12);
        assert_eq!(store.direction(), Direction::Forward);

        store.go_to_step(5);
        assert_eq!(store.direction(), Direction::Backward);

        // Equal target counts as backward.
        store.go_to_step(5);
        assert_eq!(store.direction(), Direction::Backward);

        // Direction uses the requested step, not the clamped one.
        let mut store = store_at(37);
        store.go_to_step(99);
        assert_eq!(store.current_step(), 37);
        assert_eq!(store.direction(), Direction::Forward);
    }

    #[test]
    fn next_then_prev_restores_step_inside_range() {
        for start in 2..37 {
            let mut store = store_at(start);
            store.next_step();
            store.prev_step();
            assert_eq!(i64::from(store.current_step()), start);
        }
    }

    #[test]
    fn next_and_prev_clamp_at_edges() {
        let mut store = store_at(37);
        store.next_step();
        assert_eq!(store.current_step(), 37);
        assert_eq!(store.direction(), Direction::Forward);
        // Pair is not invertible at the upper edge.
        store.prev_step();
        assert_eq!(store.current_step(), 36);

        let mut store = FlowStore::new();
        store.prev_step();
        assert_eq!(store.current_step(), 1);
        assert_eq!(store.direction(), Direction::Backward);
        store.next_step();
        assert_eq!(store.current_step(), 2);
    }

    #[test]
    fn sequential_navigation_clears_manual_flag() {
        let mut store = FlowStore::new();
        store.go_to_step(10);
        assert!(store.is_manual_navigation());
        store.next_step();
        assert!(!store.is_manual_navigation());

        store.go_to_step(3);
        store.prev_step();
        assert!(!store.is_manual_navigation());
    }

    #[test]
    fn clear_manual_navigation_keeps_step() {
        let mut store = FlowStore::new();
        store.go_to_step(20);
        store.clear_manual_navigation();
        assert!(!store.is_manual_navigation());
        assert_eq!(store.current_step(), 20);
    }

    #[test]
    fn set_total_steps_does_not_clamp_current() {
        let mut store = store_at(30);
        store.set_total_steps(10);
        assert_eq!(store.total_steps(), 10);
        assert_eq!(store.current_step(), 30);

        // The next sequential move brings it back into range.
        store.next_step();
        assert_eq!(store.current_step(), 10);
    }

    #[test]
    fn set_total_steps_never_zero() {
        let mut store = FlowStore::new();
        store.set_total_steps(0);
        assert_eq!(store.total_steps(), 1);
        store.go_to_step(5);
        assert_eq!(store.current_step(), 1);
    }

    #[test]
    fn complete_scan_game_is_idempotent() {
        let mut store = FlowStore::new();
        store.complete_scan_game();
        store.complete_scan_game();
        assert!(store.game().scan_game_completed);
    }

    #[test]
    fn spin_wheel_counts_every_call() {
        let mut store = FlowStore::new();
        for (i, discount) in [0, 50, 0, 10].into_iter().enumerate() {
            store.spin_wheel(discount);
            assert_eq!(store.game().spin_attempts, i as u32 + 1);
        }
    }

    #[test]
    fn spin_wheel_worse_discount_overwrites_better() {
        // Reproduced product behavior: the last spin wins.
        let mut store = FlowStore::new();
        store.spin_wheel(50);
        store.spin_wheel(10);
        assert_eq!(store.game().discount_won, Some(10));
    }

    #[test]
    fn complete_payment_moves_past_total_steps() {
        // Reproduced product behavior: payment is not clamped.
        let mut store = store_at(37);
        store.complete_payment();
        assert_eq!(store.current_step(), 38);
        assert!(store.is_last_step());
    }

    #[test]
    fn reset_demo_restores_everything_but_total_steps() {
        let mut store = FlowStore::with_total_steps(40);
        store.go_to_step(25);
        store.update_user_data(UserData {
            name: Some("Sam".to_string()),
            ..Default::default()
        });
        store.set_results(Results {
            daily_calories: 1800,
            bmi: 22.0,
            estimated_time: "8-12 weeks".to_string(),
            weight_to_lose: 0.0,
            target_date: String::new(),
            tdee: 0,
            weekly_loss: 0.5,
        });
        store.complete_scan_game();
        store.spin_wheel(30);

        store.reset_demo();
        let once = store.clone();
        store.reset_demo();

        assert_eq!(store, once, "reset_demo should be idempotent");
        assert_eq!(store.current_step(), 1);
        assert_eq!(store.total_steps(), 40);
        assert!(store.user_data().is_empty());
        assert!(store.results().is_none());
        assert!(!store.is_manual_navigation());
        assert_eq!(store.direction(), Direction::Forward);
        assert_eq!(store.game(), &GameState::default());
    }

    #[test]
    fn set_user_data_and_update_user_data() {
        let mut store = FlowStore::new();
        store.set_user_data(UserField::Height(170.0));
        store.update_user_data(UserData {
            current_weight: Some(80.0),
            ..Default::default()
        });
        assert_eq!(store.user_data().height, Some(170.0));
        assert_eq!(store.user_data().current_weight, Some(80.0));
    }

    #[test]
    fn direction_display_matches_serde() {
        for direction in [Direction::Forward, Direction::Backward] {
            let json = serde_json::to_string(&direction).unwrap();
            assert_eq!(format!("\"{direction}\""), json);
        }
    }
}
