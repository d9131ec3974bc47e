//! Onboarding wizard: a four-step linear form that produces [`UserData`].
//!
//! ```text
//! Basics -> Experience -> Logistics -> Preferences -> submit
//! ```
//!
//! Forward movement (and the final submit) is gated on the current step's
//! required fields. Going back is always allowed from any step after the
//! first.

use std::fmt;

use thiserror::Error;

use smartfit_store::models::{ExperienceLevel, Gender, Goal, Location, UserData};

/// Default body weight in kilograms.
pub const DEFAULT_WEIGHT: u32 = 70;
/// Default height in centimetres.
pub const DEFAULT_HEIGHT: u32 = 175;
/// Default session length in minutes.
pub const DEFAULT_DURATION: u32 = 60;
/// Shortest selectable session, in minutes.
pub const MIN_DURATION: u32 = 15;
/// Longest selectable session, in minutes.
pub const MAX_DURATION: u32 = 120;
/// Duration slider increment, in minutes.
pub const DURATION_STEP: u32 = 15;

/// One page of the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Step {
    Basics = 1,
    Experience = 2,
    Logistics = 3,
    Preferences = 4,
}

impl Step {
    pub const COUNT: u8 = 4;

    /// 1-based position of this step.
    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn next(self) -> Option<Self> {
        match self {
            Self::Basics => Some(Self::Experience),
            Self::Experience => Some(Self::Logistics),
            Self::Logistics => Some(Self::Preferences),
            Self::Preferences => None,
        }
    }

    pub fn previous(self) -> Option<Self> {
        match self {
            Self::Basics => None,
            Self::Experience => Some(Self::Basics),
            Self::Logistics => Some(Self::Experience),
            Self::Preferences => Some(Self::Logistics),
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Basics => "Vamos conhecer você",
            Self::Experience => "Nível de Experiência",
            Self::Logistics => "Logística",
            Self::Preferences => "Objetivo Específico",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Basics => "basics",
            Self::Experience => "experience",
            Self::Logistics => "logistics",
            Self::Preferences => "preferences",
        };
        f.write_str(s)
    }
}

/// Errors from moving through or submitting the wizard.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("step {step} is incomplete: missing {}", .missing.join(", "))]
    Incomplete {
        step: Step,
        missing: Vec<&'static str>,
    },

    #[error("submit is only available on the last step (currently on {0})")]
    NotOnLastStep(Step),

    #[error("already on the first step")]
    AtFirstStep,

    #[error("unknown {kind}: {value:?}")]
    UnknownOption { kind: &'static str, value: String },
}

/// Partially filled preferences.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    pub gender: Option<Gender>,
    pub weight: u32,
    pub height: u32,
    pub goal: Option<Goal>,
    pub experience: Option<ExperienceLevel>,
    pub duration: u32,
    pub days: Vec<String>,
    pub location: Option<Location>,
    pub target_muscles: Vec<String>,
    pub focus_muscle: Option<String>,
}

impl Default for Draft {
    fn default() -> Self {
        Self {
            gender: None,
            weight: DEFAULT_WEIGHT,
            height: DEFAULT_HEIGHT,
            goal: None,
            experience: None,
            duration: DEFAULT_DURATION,
            days: Vec::new(),
            location: None,
            target_muscles: Vec::new(),
            focus_muscle: None,
        }
    }
}

impl Draft {
    /// Required fields of `step` that are still unset.
    pub fn missing_for(&self, step: Step) -> Vec<&'static str> {
        let mut missing = Vec::new();
        match step {
            Step::Basics => {
                if self.gender.is_none() {
                    missing.push("gender");
                }
                if self.goal.is_none() {
                    missing.push("goal");
                }
                if self.weight == 0 {
                    missing.push("weight");
                }
                if self.height == 0 {
                    missing.push("height");
                }
            }
            Step::Experience => {
                if self.experience.is_none() {
                    missing.push("experience");
                }
            }
            Step::Logistics => {
                if self.days.is_empty() {
                    missing.push("days");
                }
                if self.location.is_none() {
                    missing.push("location");
                }
            }
            Step::Preferences => {
                if self.target_muscles.is_empty() {
                    missing.push("target muscles");
                }
                let focus_ok = self
                    .focus_muscle
                    .as_ref()
                    .is_some_and(|f| self.target_muscles.contains(f));
                if !focus_ok {
                    missing.push("focus muscle");
                }
            }
        }
        missing
    }
}

/// The onboarding state machine.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Wizard {
    step: StepCursor,
    draft: Draft,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct StepCursor(Step);

impl Default for StepCursor {
    fn default() -> Self {
        Self(Step::Basics)
    }
}

impl Wizard {
    /// A fresh wizard on the first step with default metrics.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> Step {
        self.step.0
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    /// Completion percentage shown in the progress bar.
    pub fn progress(&self) -> u16 {
        u16::from(self.step().number()) * 100 / u16::from(Step::COUNT)
    }

    pub fn is_last_step(&self) -> bool {
        self.step() == Step::Preferences
    }

    /// Whether the current step's required fields are all set.
    pub fn can_proceed(&self) -> bool {
        self.draft.missing_for(self.step()).is_empty()
    }

    pub fn can_go_back(&self) -> bool {
        self.step().previous().is_some()
    }

    fn check_current(&self) -> Result<(), WizardError> {
        let missing = self.draft.missing_for(self.step());
        if missing.is_empty() {
            Ok(())
        } else {
            Err(WizardError::Incomplete {
                step: self.step(),
                missing,
            })
        }
    }

    /// Advance to the next step.
    ///
    /// On the last step this is refused; use [`Self::submit`].
    pub fn next(&mut self) -> Result<Step, WizardError> {
        self.check_current()?;
        let next = self
            .step()
            .next()
            .ok_or(WizardError::NotOnLastStep(self.step()))?;
        self.step = StepCursor(next);
        tracing::debug!(step = %next, "wizard advanced");
        Ok(next)
    }

    /// Return to the previous step. Entered values are kept.
    pub fn back(&mut self) -> Result<Step, WizardError> {
        let prev = self.step().previous().ok_or(WizardError::AtFirstStep)?;
        self.step = StepCursor(prev);
        Ok(prev)
    }

    /// Finish the wizard and produce the completed preferences.
    pub fn submit(&self) -> Result<UserData, WizardError> {
        if !self.is_last_step() {
            return Err(WizardError::NotOnLastStep(self.step()));
        }
        // Every step is re-checked: fields can only be cleared by edits made
        // after passing a step, but the result must still be complete.
        for step in [
            Step::Basics,
            Step::Experience,
            Step::Logistics,
            Step::Preferences,
        ] {
            let missing = self.draft.missing_for(step);
            if !missing.is_empty() {
                return Err(WizardError::Incomplete { step, missing });
            }
        }

        let d = &self.draft;
        match (d.gender, d.goal, d.experience, d.location, &d.focus_muscle) {
            (Some(gender), Some(goal), Some(experience), Some(location), Some(focus)) => {
                Ok(UserData {
                    gender,
                    weight: d.weight,
                    height: d.height,
                    goal,
                    experience,
                    duration: d.duration,
                    days: d.days.clone(),
                    location,
                    target_muscles: d.target_muscles.clone(),
                    focus_muscle: focus.clone(),
                })
            }
            _ => Err(WizardError::Incomplete {
                step: Step::Preferences,
                missing: vec!["focus muscle"],
            }),
        }
    }

    // -- Field editing --

    pub fn set_gender(&mut self, gender: Gender) {
        self.draft.gender = Some(gender);
    }

    pub fn set_weight(&mut self, kg: u32) {
        self.draft.weight = kg;
    }

    pub fn set_height(&mut self, cm: u32) {
        self.draft.height = cm;
    }

    pub fn set_goal(&mut self, goal: Goal) {
        self.draft.goal = Some(goal);
    }

    pub fn set_experience(&mut self, level: ExperienceLevel) {
        self.draft.experience = Some(level);
    }

    pub fn set_location(&mut self, location: Location) {
        self.draft.location = Some(location);
    }

    /// Set the session length, clamped to the slider range and snapped to
    /// the nearest lower step.
    pub fn set_duration(&mut self, minutes: u32) {
        let clamped = minutes.clamp(MIN_DURATION, MAX_DURATION);
        self.draft.duration = clamped - (clamped % DURATION_STEP);
    }

    /// Move the duration slider by `steps` increments (negative = shorter).
    pub fn nudge_duration(&mut self, steps: i32) {
        let delta = steps.saturating_mul(DURATION_STEP as i32);
        let target = (self.draft.duration as i32).saturating_add(delta).max(0) as u32;
        self.set_duration(target);
    }

    /// Select or deselect a training day. Selected days keep pick order.
    pub fn toggle_day(&mut self, day: &str) -> Result<(), WizardError> {
        if !smartfit_store::models::DAYS_OF_WEEK.contains(&day) {
            return Err(WizardError::UnknownOption {
                kind: "day",
                value: day.to_owned(),
            });
        }
        toggle(&mut self.draft.days, day);
        Ok(())
    }

    /// Select or deselect a target muscle.
    ///
    /// Deselecting the current focus muscle clears the focus.
    pub fn toggle_muscle(&mut self, muscle: &str) -> Result<(), WizardError> {
        if !smartfit_store::models::MUSCLE_GROUPS.contains(&muscle) {
            return Err(WizardError::UnknownOption {
                kind: "muscle",
                value: muscle.to_owned(),
            });
        }
        let now_selected = toggle(&mut self.draft.target_muscles, muscle);
        if !now_selected && self.draft.focus_muscle.as_deref() == Some(muscle) {
            self.draft.focus_muscle = None;
        }
        Ok(())
    }

    /// Pick the priority muscle. It must already be a target muscle.
    pub fn set_focus_muscle(&mut self, muscle: &str) -> Result<(), WizardError> {
        if !self.draft.target_muscles.iter().any(|m| m == muscle) {
            return Err(WizardError::UnknownOption {
                kind: "focus muscle",
                value: muscle.to_owned(),
            });
        }
        self.draft.focus_muscle = Some(muscle.to_owned());
        Ok(())
    }
}

/// Toggle membership of `value`; returns whether it is now present.
fn toggle(list: &mut Vec<String>, value: &str) -> bool {
    if let Some(pos) = list.iter().position(|v| v == value) {
        list.remove(pos);
        false
    } else {
        list.push(value.to_owned());
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
