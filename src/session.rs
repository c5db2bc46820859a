//! FlowSession — coordinates the flow store, the A/B store and the clock.
//!
//! Input adapters go through the session for anything that touches more than
//! one store: variant switches (reset + new step count) and result
//! computation (read answers, write results).

use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::flow::{Direction, FlowStore, GameState, Results, UserData};
use crate::metrics::{self, Clock, SystemClock};
use crate::personalize::personalize_text;
use crate::variant::{AbTestStore, FlowVariant, VariantInfo};

/// Read model for rendering adapters.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowSnapshot {
    pub current_step: u32,
    pub total_steps: u32,
    pub direction: Direction,
    pub is_manual_navigation: bool,
    pub user_data: UserData,
    pub results: Option<Results>,
    pub scan_game_completed: bool,
    pub spin_attempts: u32,
    pub discount_won: Option<u32>,
    pub current_version: FlowVariant,
    pub variant: &'static VariantInfo,
}

/// One user's pass through the funnel.
pub struct FlowSession {
    flow: FlowStore,
    ab_test: AbTestStore,
    clock: Box<dyn Clock>,
}

impl FlowSession {
    /// Start a session sized for the persisted variant, using the system clock.
    pub fn new(ab_test: AbTestStore) -> Self {
        Self::with_clock(ab_test, Box::new(SystemClock))
    }

    pub fn with_clock(ab_test: AbTestStore, clock: Box<dyn Clock>) -> Self {
        let flow = FlowStore::with_total_steps(ab_test.current_version().pages());
        Self {
            flow,
            ab_test,
            clock,
        }
    }

    pub fn flow(&self) -> &FlowStore {
        &self.flow
    }

    pub fn flow_mut(&mut self) -> &mut FlowStore {
        &mut self.flow
    }

    pub fn ab_test(&self) -> &AbTestStore {
        &self.ab_test
    }

    pub fn current_version(&self) -> FlowVariant {
        self.ab_test.current_version()
    }

    /// Switch to `version`, resetting the flow to its first step.
    ///
    /// Returns `false` (and changes nothing) if `version` is already active.
    pub fn switch_version(&mut self, version: FlowVariant) -> bool {
        let previous = self.ab_test.current_version();
        if version == previous {
            return false;
        }
        self.ab_test.set_version(version);
        self.flow.set_total_steps(version.pages());
        self.flow.reset_demo();
        info!(from = %previous, to = %version, total = version.pages(), "Switched flow variant");
        true
    }

    /// Parse a variant id and switch to it. Unknown ids are rejected.
    pub fn switch_version_str(&mut self, id: &str) -> Result<bool> {
        let version = id.parse()?;
        Ok(self.switch_version(version))
    }

    /// Compute results from the current answers and store them.
    pub fn compute_results(&mut self) -> Results {
        let results = metrics::compute_results(self.flow.user_data(), self.clock.as_ref());
        self.flow.set_results(results.clone());
        results
    }

    /// Personalize copy with this session's answers and results.
    pub fn personalize(&self, text: &str) -> String {
        personalize_text(text, Some(self.flow.user_data()), self.flow.results())
    }

    pub fn snapshot(&self) -> FlowSnapshot {
        let flow = &self.flow;
        let GameState {
            scan_game_completed,
            spin_attempts,
            discount_won,
        } = flow.game().clone();
        let current_version = self.ab_test.current_version();
        FlowSnapshot {
            current_step: flow.current_step(),
            total_steps: flow.total_steps(),
            direction: flow.direction(),
            is_manual_navigation: flow.is_manual_navigation(),
            user_data: flow.user_data().clone(),
            results: flow.results().cloned(),
            scan_game_completed,
            spin_attempts,
            discount_won,
            current_version,
            variant: current_version.info(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::flow::UserField;
    use crate::metrics::FixedClock;
    use crate::variant::{MemoryStorage, STORAGE_KEY};

    fn session() -> FlowSession {
        let clock = FixedClock(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        FlowSession::with_clock(
            AbTestStore::open(Box::new(MemoryStorage::new())),
            Box::new(clock),
        )
    }

    #[test]
    fn starts_sized_for_persisted_variant() {
        let storage = MemoryStorage::new()
            .with_record(STORAGE_KEY, r#"{"state":{"currentVersion":"v2"},"version":0}"#);
        let session = FlowSession::new(AbTestStore::open(Box::new(storage)));
        assert_eq!(session.flow().total_steps(), 40);
        assert_eq!(session.current_version(), FlowVariant::V2);

        assert_eq!(self::session().flow().total_steps(), 37);
    }

    #[test]
    fn switch_v1_to_v2_resets_to_step_one_of_forty() {
        let mut session = session();
        session.flow_mut().go_to_step(20);
        session.flow_mut().set_user_data(UserField::Name("Sam".to_string()));

        assert!(session.switch_version(FlowVariant::V2));

        assert_eq!(session.current_version(), FlowVariant::V2);
        assert_eq!(session.flow().total_steps(), 40);
        assert_eq!(session.flow().current_step(), 1);
        assert!(session.flow().user_data().is_empty());
    }

    #[test]
    fn switching_to_active_variant_is_noop() {
        let mut session = session();
        session.flow_mut().go_to_step(12);

        assert!(!session.switch_version(FlowVariant::V1));
        assert_eq!(session.flow().current_step(), 12);
        assert!(session.ab_test().storage().load(STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn reset_keeps_variant_and_total_steps() {
        let mut session = session();
        session.switch_version(FlowVariant::V2);
        session.flow_mut().go_to_step(33);

        session.flow_mut().reset_demo();
        session.flow_mut().reset_demo();

        assert_eq!(session.flow().current_step(), 1);
        assert_eq!(session.flow().total_steps(), 40);
        assert_eq!(session.current_version(), FlowVariant::V2);
    }

    #[test]
    fn switch_version_str_guards_unknown_ids() {
        let mut session = session();
        assert!(session.switch_version_str("beta").is_err());
        assert_eq!(session.current_version(), FlowVariant::V1);
        assert!(session.switch_version_str("v2").unwrap());
    }

    #[test]
    fn compute_results_stores_snapshot() {
        let mut session = session();
        session.flow_mut().update_user_data(UserData {
            current_weight: Some(80.0),
            target_weight: Some(70.0),
            height: Some(170.0),
            ..Default::default()
        });

        let results = session.compute_results();

        assert_eq!(results.bmi, 27.7);
        assert_eq!(results.estimated_time, "5 months");
        assert_eq!(results.target_date, "Jul 19, 2026");
        assert_eq!(session.flow().results(), Some(&results));
    }

    #[test]
    fn personalize_uses_session_state() {
        let mut session = session();
        session.flow_mut().update_user_data(UserData {
            name: Some("Sam".to_string()),
            current_weight: Some(90.0),
            target_weight: Some(75.0),
            ..Default::default()
        });
        assert_eq!(
            session.personalize("{name}, {weightToLose} kg to go"),
            "Sam, 15 kg to go"
        );
    }

    #[test]
    fn snapshot_serializes_for_renderers() {
        let mut session = session();
        session.flow_mut().spin_wheel(25);
        let json = serde_json::to_value(session.snapshot()).unwrap();

        assert_eq!(json["currentStep"], 1);
        assert_eq!(json["totalSteps"], 37);
        assert_eq!(json["direction"], "forward");
        assert_eq!(json["isManualNavigation"], false);
        assert_eq!(json["spinAttempts"], 1);
        assert_eq!(json["discountWon"], 25);
        assert_eq!(json["currentVersion"], "v1");
        assert_eq!(json["variant"]["pages"], 37);
        assert!(json["results"].is_null());
    }
}
