//! Alternative-exercise lookups. Best effort: failures yield an empty list.

use tracing::{debug, error, instrument};

use smartfit_store::models::{Exercise, Location};

use crate::GenerationSettings;
use crate::generator::{GenerationError, GenerationRequest, TextGenerator};
use crate::plan::prompt::build_alternatives_prompt;
use crate::plan::schema::alternatives_schema;

/// Most substitutes offered for one exercise.
pub const MAX_ALTERNATIVES: usize = 3;

/// Ask the service for up to [`MAX_ALTERNATIVES`] substitutes for
/// `exercise_name`. Never fails; any error is logged and an empty list
/// returned.
#[instrument(skip(generator, settings), fields(generator = generator.name()))]
pub async fn alternative_exercises(
    generator: &dyn TextGenerator,
    exercise_name: &str,
    muscle: &str,
    location: Location,
    settings: &GenerationSettings,
) -> Vec<Exercise> {
    match fetch(generator, exercise_name, muscle, location, settings).await {
        Ok(mut found) => {
            found.truncate(MAX_ALTERNATIVES);
            debug!(count = found.len(), "alternatives received");
            found
        }
        Err(e) => {
            error!(error = %e, "failed to fetch alternative exercises");
            Vec::new()
        }
    }
}

async fn fetch(
    generator: &dyn TextGenerator,
    exercise_name: &str,
    muscle: &str,
    location: Location,
    settings: &GenerationSettings,
) -> Result<Vec<Exercise>, GenerationError> {
    let request = GenerationRequest::new(
        settings.model.clone(),
        build_alternatives_prompt(exercise_name, muscle, location),
        alternatives_schema(),
    );

    let text = settings
        .alternatives_policy
        .run("alternative exercises", || generator.generate(&request))
        .await?;

    if text.trim().is_empty() {
        return Err(GenerationError::EmptyResponse);
    }
    Ok(serde_json::from_str(&text)?)
}
