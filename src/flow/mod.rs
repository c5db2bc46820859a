//! Onboarding flow: step navigation and answer accumulation.
//!
//! The flow is an ordered sequence of funnel steps. Input adapters move
//! through it with sequential (`next`/`prev`) or manual (jump) navigation
//! while answers accumulate into `UserData`. Computed `Results` are stored
//! alongside and cleared with everything else on reset.

pub mod model;
pub mod state;

pub use model::{Results, UserData, UserField};
pub use state::{DEFAULT_TOTAL_STEPS, Direction, FlowStore, GameState};
