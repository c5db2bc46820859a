//! Onboarding Flow: step navigation, answer accumulation, health metrics
//! and A/B variant selection for a multi-step fitness onboarding funnel.

pub mod cli;
pub mod config;
pub mod error;
pub mod flow;
pub mod metrics;
pub mod personalize;
pub mod routes;
pub mod session;
pub mod variant;
