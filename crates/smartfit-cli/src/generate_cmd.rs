//! `smartfit generate`: onboarding from a profile file instead of the wizard.

use std::path::Path;

use anyhow::{Context, bail};
use serde::Deserialize;

use smartfit_core::onboarding::Wizard;
use smartfit_core::session::{Screen, Session};
use smartfit_store::models::{ExperienceLevel, Gender, Goal, Location, UserData};

use crate::AppContext;
use crate::plan_cmds::print_plan;

/// Profile as written by the user. Field names match the saved preferences.
#[derive(Debug, Deserialize)]
pub struct ProfileFile {
    pub gender: Gender,
    #[serde(default)]
    pub weight: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    pub goal: Goal,
    pub experience: ExperienceLevel,
    #[serde(default)]
    pub duration: Option<u32>,
    pub days: Vec<String>,
    pub location: Location,
    pub target_muscles: Vec<String>,
    pub focus_muscle: String,
}

/// Read a profile from `path`; `.json` files are JSON, anything else TOML.
pub fn load_profile(path: &Path) -> anyhow::Result<ProfileFile> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read profile {}", path.display()))?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        serde_json::from_str(&contents)
            .with_context(|| format!("invalid JSON profile {}", path.display()))
    } else {
        toml::from_str(&contents)
            .with_context(|| format!("invalid TOML profile {}", path.display()))
    }
}

/// Walk the wizard with the profile's answers so the same rules apply as
/// in the interactive flow.
pub fn profile_to_user(profile: &ProfileFile) -> anyhow::Result<UserData> {
    let mut wizard = Wizard::new();

    wizard.set_gender(profile.gender);
    wizard.set_goal(profile.goal);
    if let Some(weight) = profile.weight {
        wizard.set_weight(weight);
    }
    if let Some(height) = profile.height {
        wizard.set_height(height);
    }
    wizard.next()?;

    wizard.set_experience(profile.experience);
    wizard.next()?;

    if let Some(duration) = profile.duration {
        wizard.set_duration(duration);
    }
    for day in &profile.days {
        if wizard.draft().days.contains(day) {
            continue;
        }
        wizard.toggle_day(day)?;
    }
    wizard.set_location(profile.location);
    wizard.next()?;

    for muscle in &profile.target_muscles {
        if wizard.draft().target_muscles.contains(muscle) {
            continue;
        }
        wizard.toggle_muscle(muscle)?;
    }
    wizard.set_focus_muscle(&profile.focus_muscle)?;

    Ok(wizard.submit()?)
}

pub async fn run_generate(ctx: &AppContext, profile_path: &Path, replace: bool) -> anyhow::Result<()> {
    let profile = load_profile(profile_path)?;
    let user = profile_to_user(&profile)?;

    let mut session = Session::restore(ctx.generator()?, ctx.store.clone(), ctx.settings())?;
    if session.plan().is_some() {
        if !replace {
            bail!("a plan is already saved; pass --replace or run `smartfit reset` first");
        }
        session.reset()?;
    }

    println!(
        "Gerando plano para {} dia(s) com {}...",
        user.days.len(),
        ctx.config.model
    );
    session.submit(user).await?;

    match session.screen() {
        Screen::Dashboard { plan, user } => {
            print_plan(plan, user, None);
            println!(
                "\n{} dia(s), {} exercício(s). Plano salvo.",
                plan.len(),
                plan.exercise_count()
            );
            Ok(())
        }
        Screen::Failed { message, detail } => bail!("{message}\n  {detail}"),
        other => bail!("unexpected state after generation: {}", other.name()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOML_PROFILE: &str = r#"
gender = "male"
goal = "hypertrophy"
experience = "beginner"
days = ["Segunda", "Quarta", "Sexta"]
location = "gym"
target_muscles = ["Peito", "Costas"]
focus_muscle = "Peito"
"#;

    #[test]
    fn toml_profile_uses_wizard_defaults() {
        let profile: ProfileFile = toml::from_str(TOML_PROFILE).unwrap();
        let user = profile_to_user(&profile).unwrap();

        assert_eq!(user, smartfit_test_utils::sample_user());
    }

    #[test]
    fn json_profile_is_detected_by_extension() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("me.json");
        std::fs::write(
            &path,
            r#"{"gender":"female","weight":58,"height":162,"goal":"weight_loss",
               "experience":"advanced","duration":45,"days":["Sábado"],
               "location":"outdoor","target_muscles":["Pernas"],"focus_muscle":"Pernas"}"#,
        )
        .unwrap();

        let user = profile_to_user(&load_profile(&path).unwrap()).unwrap();
        assert_eq!(user.gender, Gender::Female);
        assert_eq!(user.weight, 58);
        assert_eq!(user.duration, 45);
        assert_eq!(user.location, Location::Outdoor);
    }

    #[test]
    fn focus_outside_targets_is_rejected() {
        let mut profile: ProfileFile = toml::from_str(TOML_PROFILE).unwrap();
        profile.focus_muscle = "Ombros".into();
        let err = profile_to_user(&profile).unwrap_err().to_string();
        assert!(err.contains("focus muscle"), "unexpected error: {err}");
    }

    #[test]
    fn empty_days_fail_on_logistics() {
        let mut profile: ProfileFile = toml::from_str(TOML_PROFILE).unwrap();
        profile.days.clear();
        let err = profile_to_user(&profile).unwrap_err().to_string();
        assert!(err.contains("days"), "unexpected error: {err}");
    }
}
