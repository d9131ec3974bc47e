use anyhow::{Context, bail};

use smartfit_core::export::tutorial_url;
use smartfit_core::session::Session;
use smartfit_store::models::{UserData, WorkoutPlan};
use smartfit_store::persist::{self, SavedState};

use crate::AppContext;

/// Load the saved plan or explain how to create one.
fn load_saved(ctx: &AppContext) -> anyhow::Result<SavedState> {
    persist::load_saved_state(ctx.store.as_ref())
        .context("failed to read saved plan")?
        .context("no saved plan; run `smartfit` or `smartfit generate` first")
}

/// Convert a 1-based day number into an index into `plan`.
fn day_index(plan: &WorkoutPlan, day: usize) -> anyhow::Result<usize> {
    if day == 0 || day > plan.len() {
        bail!("day {day} does not exist (plan has {} days)", plan.len());
    }
    Ok(day - 1)
}

/// Print the plan, or only day `only_day` (1-based).
pub fn print_plan(plan: &WorkoutPlan, user: &UserData, only_day: Option<usize>) {
    println!("Seu Plano Smart  (Foco: {})", user.focus_muscle);
    println!(
        "Objetivo: {}  |  Freq: {} Dias/Sem  |  Duração: {} min",
        user.goal.short_label(),
        user.days.len(),
        user.duration
    );

    for (i, day) in plan.days().iter().enumerate() {
        if only_day.is_some_and(|d| d != i + 1) {
            continue;
        }
        println!();
        println!("[{}] {} - {}", i + 1, day.day, day.focus);
        for ex in &day.exercises {
            println!(
                "    {:<8} {} ({})  {} x {}",
                ex.id, ex.name, ex.muscle, ex.sets, ex.reps
            );
            if !ex.notes.trim().is_empty() {
                println!("             Dica: {}", ex.notes.trim());
            }
            if only_day.is_some() {
                println!("             Tutorial: {}", tutorial_url(&ex.name));
            }
        }
    }
}

pub fn run_show(ctx: &AppContext, day: Option<usize>) -> anyhow::Result<()> {
    let saved = load_saved(ctx)?;
    if let Some(day) = day {
        day_index(&saved.plan, day)?;
    }
    print_plan(&saved.plan, &saved.user, day);
    Ok(())
}

pub async fn run_alternatives(ctx: &AppContext, day: usize, exercise_id: &str) -> anyhow::Result<()> {
    let session = Session::restore(ctx.generator()?, ctx.store.clone(), ctx.settings())?;
    let plan = session
        .plan()
        .context("no saved plan; run `smartfit` or `smartfit generate` first")?;
    let index = day_index(plan, day)?;
    let current = session.exercise(index, exercise_id)?.name.clone();

    let found = session.alternatives(index, exercise_id).await?;
    if found.is_empty() {
        println!("Falha ao buscar alternativas para {current}. Tente novamente.");
        return Ok(());
    }

    println!("Alternativas para {current}:");
    for (n, alt) in found.iter().enumerate() {
        println!("  {}. {} ({})  {} x {}", n + 1, alt.name, alt.muscle, alt.sets, alt.reps);
    }
    println!("\nUse `smartfit swap {day} {exercise_id} --pick N` to apply one.");
    Ok(())
}

pub async fn run_swap(
    ctx: &AppContext,
    day: usize,
    exercise_id: &str,
    pick: usize,
) -> anyhow::Result<()> {
    let mut session = Session::restore(ctx.generator()?, ctx.store.clone(), ctx.settings())?;
    let plan = session
        .plan()
        .context("no saved plan; run `smartfit` or `smartfit generate` first")?;
    let index = day_index(plan, day)?;

    let mut found = session.alternatives(index, exercise_id).await?;
    if found.is_empty() {
        bail!("no alternatives available right now; try again");
    }
    if pick == 0 || pick > found.len() {
        bail!("--pick must be between 1 and {}", found.len());
    }

    let replacement = found.swap_remove(pick - 1);
    let new_name = replacement.name.clone();
    let old = session.substitute(index, exercise_id, replacement)?;
    println!("{} -> {new_name} ({exercise_id})", old.name);
    Ok(())
}

pub fn run_reset(ctx: &AppContext) -> anyhow::Result<()> {
    persist::clear(ctx.store.as_ref())?;
    println!("Saved plan and preferences removed.");
    Ok(())
}
