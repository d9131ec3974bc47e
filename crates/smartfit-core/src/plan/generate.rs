//! Weekly plan generation.
//!
//! One schema-constrained request per attempt under the plan
//! [`crate::retry::RetryPolicy`]. The answer is parsed once retries have
//! produced a response; its content is not validated beyond the schema.

use thiserror::Error;
use tracing::{info, instrument, warn};

use smartfit_store::models::{UserData, WorkoutPlan};

use crate::GenerationSettings;
use crate::generator::{GenerationError, GenerationRequest, TextGenerator};
use crate::plan::prompt::build_plan_prompt;
use crate::plan::schema::workout_plan_schema;

/// Why a plan could not be produced.
#[derive(Debug, Error)]
pub enum PlanError {
    /// The service call failed on every attempt; carries the last error.
    #[error("failed to generate workout plan: {0}")]
    Generation(#[from] GenerationError),

    #[error("failed to generate workout plan: the AI service returned no content")]
    EmptyResponse,

    #[error("failed to generate workout plan: response is not a valid plan: {0}")]
    Parse(#[source] serde_json::Error),

    /// The task running the request stopped without reporting back.
    #[error("failed to generate workout plan: the request was interrupted")]
    Interrupted,
}

/// Generate a weekly plan for `user`.
#[instrument(skip_all, fields(generator = generator.name(), days = user.days.len()))]
pub async fn generate_workout_plan(
    generator: &dyn TextGenerator,
    user: &UserData,
    settings: &GenerationSettings,
) -> Result<WorkoutPlan, PlanError> {
    let request = GenerationRequest::new(
        settings.model.clone(),
        build_plan_prompt(user),
        workout_plan_schema(),
    );

    let text = settings
        .plan_policy
        .run("workout plan", || generator.generate(&request))
        .await?;

    if text.trim().is_empty() {
        return Err(PlanError::EmptyResponse);
    }

    let plan: WorkoutPlan = serde_json::from_str(&text).map_err(PlanError::Parse)?;

    if plan.len() != user.days.len() {
        warn!(
            requested = user.days.len(),
            received = plan.len(),
            "plan day count differs from selected days"
        );
    }
    info!(
        days = plan.len(),
        exercises = plan.exercise_count(),
        "workout plan generated"
    );
    Ok(plan)
}
