//! Plan-generation pipeline for SmartFit.
//!
//! Onboarding collects a [`smartfit_store::models::UserData`]; the plan
//! client turns it into a weekly [`smartfit_store::models::WorkoutPlan`]
//! through a [`generator::TextGenerator`]; [`session::Session`] ties the
//! flow to persistence.

pub mod export;
pub mod generator;
pub mod onboarding;
pub mod plan;
pub mod retry;
pub mod session;

use generator::DEFAULT_MODEL;
use retry::RetryPolicy;

/// Model choice and retry budgets for AI calls.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub model: String,
    pub plan_policy: RetryPolicy,
    pub alternatives_policy: RetryPolicy,
}

impl GenerationSettings {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_owned(),
            plan_policy: RetryPolicy::PLAN,
            alternatives_policy: RetryPolicy::ALTERNATIVES,
        }
    }
}
