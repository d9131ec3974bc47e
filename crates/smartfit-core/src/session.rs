//! Application flow: onboarding, generation, dashboard, error.
//!
//! ```text
//!               restore (saved state)
//!   Onboarding ----------------------------> Dashboard
//!       | submit                                ^  | reset
//!       v                                       |  v
//!   Generating --ok----------------------------+  Onboarding
//!       |
//!       +--err--> Failed --dismiss_error--> Onboarding
//! ```
//!
//! Every transition that changes the plan or the preferences is written
//! through to the [`KeyValueStore`] before it returns.

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info};

use smartfit_store::models::{Exercise, UserData, WorkoutPlan};
use smartfit_store::{KeyValueStore, StoreError, persist};

use crate::GenerationSettings;
use crate::generator::TextGenerator;
use crate::plan::substitute::Substitute;
use crate::plan::{PlanError, SubstituteError, alternative_exercises, generate_workout_plan};

/// Message shown when plan generation fails.
pub const GENERATION_FAILED_MESSAGE: &str =
    "Falha ao gerar o plano de treino. Verifique sua conexão ou tente dados mais simples.";

/// What the user is looking at.
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Onboarding,
    Generating { user: UserData },
    Dashboard { plan: WorkoutPlan, user: UserData },
    Failed { message: String, detail: String },
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Onboarding => "onboarding",
            Self::Generating { .. } => "generating",
            Self::Dashboard { .. } => "dashboard",
            Self::Failed { .. } => "failed",
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Substitute(#[from] SubstituteError),

    #[error("no plan yet; complete onboarding first")]
    NoPlan,

    #[error("cannot {action} while on the {screen} screen")]
    WrongScreen {
        action: &'static str,
        screen: &'static str,
    },
}

/// A plan request detached from the session, so it can run on another
/// task while the caller keeps drawing.
#[derive(Clone)]
pub struct PendingPlan {
    generator: Arc<dyn TextGenerator>,
    settings: GenerationSettings,
    user: UserData,
}

impl PendingPlan {
    pub fn user(&self) -> &UserData {
        &self.user
    }

    pub async fn run(self) -> Result<WorkoutPlan, PlanError> {
        generate_workout_plan(self.generator.as_ref(), &self.user, &self.settings).await
    }
}

/// Owns the current [`Screen`] and the services behind it.
pub struct Session {
    generator: Arc<dyn TextGenerator>,
    store: Arc<dyn KeyValueStore>,
    settings: GenerationSettings,
    screen: Screen,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("generator", &self.generator.name())
            .field("settings", &self.settings)
            .field("screen", &self.screen.name())
            .finish()
    }
}

impl Session {
    /// Start a session from whatever is saved.
    ///
    /// A complete saved plan opens the dashboard; anything else (nothing
    /// saved, half saved, corrupt) starts onboarding.
    pub fn restore(
        generator: Arc<dyn TextGenerator>,
        store: Arc<dyn KeyValueStore>,
        settings: GenerationSettings,
    ) -> Result<Self, StoreError> {
        let screen = match persist::load_saved_state(store.as_ref())? {
            Some(saved) => Screen::Dashboard {
                plan: saved.plan,
                user: saved.user,
            },
            None => Screen::Onboarding,
        };
        info!(screen = screen.name(), "session restored");
        Ok(Self {
            generator,
            store,
            settings,
            screen,
        })
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    pub fn generator(&self) -> Arc<dyn TextGenerator> {
        Arc::clone(&self.generator)
    }

    pub fn plan(&self) -> Option<&WorkoutPlan> {
        match &self.screen {
            Screen::Dashboard { plan, .. } => Some(plan),
            _ => None,
        }
    }

    pub fn user(&self) -> Option<&UserData> {
        match &self.screen {
            Screen::Dashboard { user, .. } | Screen::Generating { user } => Some(user),
            _ => None,
        }
    }

    /// Persist `user` and enter the loading screen.
    ///
    /// The returned request must be run and its result handed to
    /// [`Self::finish_submit`].
    pub fn begin_submit(&mut self, user: UserData) -> Result<PendingPlan, SessionError> {
        if !matches!(self.screen, Screen::Onboarding) {
            return Err(self.wrong_screen("submit"));
        }
        persist::save_user(self.store.as_ref(), &user)?;
        self.screen = Screen::Generating { user: user.clone() };
        Ok(PendingPlan {
            generator: Arc::clone(&self.generator),
            settings: self.settings.clone(),
            user,
        })
    }

    /// Apply the outcome of a [`PendingPlan`].
    ///
    /// Success saves the plan and opens the dashboard. Failure discards the
    /// saved preferences and shows the error screen.
    ///
    /// The screen moves on even when the store write fails; the write error
    /// is returned afterwards so the plan stays usable for this run.
    pub fn finish_submit(
        &mut self,
        result: Result<WorkoutPlan, PlanError>,
    ) -> Result<(), SessionError> {
        let Screen::Generating { user } = &self.screen else {
            return Err(self.wrong_screen("finish generation"));
        };
        let user = user.clone();

        let written = match result {
            Ok(plan) => {
                info!(days = plan.len(), "plan ready");
                let written = persist::save_plan(self.store.as_ref(), &plan);
                self.screen = Screen::Dashboard { plan, user };
                written
            }
            Err(e) => {
                error!(error = %e, "plan generation failed");
                self.screen = Screen::Failed {
                    message: GENERATION_FAILED_MESSAGE.to_owned(),
                    detail: e.to_string(),
                };
                persist::clear_user(self.store.as_ref())
            }
        };
        if let Err(e) = &written {
            error!(error = %e, "failed to update saved state");
        }
        written.map_err(SessionError::from)
    }

    /// Submit `user` and wait for the plan.
    pub async fn submit(&mut self, user: UserData) -> Result<(), SessionError> {
        let pending = self.begin_submit(user)?;
        let result = pending.run().await;
        self.finish_submit(result)
    }

    /// Leave the error screen and start onboarding again.
    pub fn dismiss_error(&mut self) {
        if matches!(self.screen, Screen::Failed { .. }) {
            self.screen = Screen::Onboarding;
        }
    }

    /// Look up the exercise `exercise_id` on day `day_index`.
    pub fn exercise(&self, day_index: usize, exercise_id: &str) -> Result<&Exercise, SessionError> {
        let plan = self.plan().ok_or(SessionError::NoPlan)?;
        let day = plan
            .days()
            .get(day_index)
            .ok_or(SubstituteError::DayOutOfRange {
                index: day_index,
                len: plan.len(),
            })?;
        day.exercises
            .iter()
            .find(|e| e.id == exercise_id)
            .ok_or_else(|| {
                SubstituteError::ExerciseNotFound {
                    day: day.day.clone(),
                    id: exercise_id.to_owned(),
                }
                .into()
            })
    }

    /// Fetch substitutes for one exercise of the current plan.
    ///
    /// An empty list means the service had nothing usable.
    pub async fn alternatives(
        &self,
        day_index: usize,
        exercise_id: &str,
    ) -> Result<Vec<Exercise>, SessionError> {
        let exercise = self.exercise(day_index, exercise_id)?;
        let location = self.user().ok_or(SessionError::NoPlan)?.location;
        Ok(alternative_exercises(
            self.generator.as_ref(),
            &exercise.name,
            &exercise.muscle,
            location,
            &self.settings,
        )
        .await)
    }

    /// Replace one exercise and save the updated plan.
    pub fn substitute(
        &mut self,
        day_index: usize,
        exercise_id: &str,
        replacement: Exercise,
    ) -> Result<Exercise, SessionError> {
        let Screen::Dashboard { plan, .. } = &mut self.screen else {
            return Err(SessionError::NoPlan);
        };
        let replaced = plan.substitute(day_index, exercise_id, replacement)?;
        persist::save_plan(self.store.as_ref(), plan)?;
        Ok(replaced)
    }

    /// Forget the plan and preferences and start over.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        persist::clear(self.store.as_ref())?;
        self.screen = Screen::Onboarding;
        Ok(())
    }

    fn wrong_screen(&self, action: &'static str) -> SessionError {
        SessionError::WrongScreen {
            action,
            screen: self.screen.name(),
        }
    }
}
