//! Local, id-preserving exercise substitution.

use thiserror::Error;

use smartfit_store::models::{Exercise, WorkoutPlan};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubstituteError {
    #[error("day {index} does not exist (plan has {len} days)")]
    DayOutOfRange { index: usize, len: usize },

    #[error("exercise {id:?} not found on {day}")]
    ExerciseNotFound { day: String, id: String },
}

/// Swap one exercise in place.
pub trait Substitute {
    /// Replace the exercise `exercise_id` on day `day_index` with
    /// `replacement`, which takes over the old id and list position.
    /// Returns the exercise that was replaced.
    fn substitute(
        &mut self,
        day_index: usize,
        exercise_id: &str,
        replacement: Exercise,
    ) -> Result<Exercise, SubstituteError>;
}

impl Substitute for WorkoutPlan {
    fn substitute(
        &mut self,
        day_index: usize,
        exercise_id: &str,
        mut replacement: Exercise,
    ) -> Result<Exercise, SubstituteError> {
        let len = self.len();
        let day = self
            .days_mut()
            .get_mut(day_index)
            .ok_or(SubstituteError::DayOutOfRange {
                index: day_index,
                len,
            })?;

        let slot = day
            .exercises
            .iter_mut()
            .find(|e| e.id == exercise_id)
            .ok_or_else(|| SubstituteError::ExerciseNotFound {
                day: day.day.clone(),
                id: exercise_id.to_owned(),
            })?;

        replacement.id = exercise_id.to_owned();
        tracing::debug!(
            day = %day.day,
            id = exercise_id,
            from = %slot.name,
            to = %replacement.name,
            "exercise substituted"
        );
        Ok(std::mem::replace(slot, replacement))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartfit_store::models::DayPlan;

    fn ex(id: &str, name: &str) -> Exercise {
        Exercise {
            id: id.into(),
            name: name.into(),
            muscle: "Peito".into(),
            sets: 4,
            reps: "8-12".into(),
            notes: String::new(),
        }
    }

    fn plan() -> WorkoutPlan {
        WorkoutPlan(vec![DayPlan {
            day: "Segunda".into(),
            focus: "Peito".into(),
            exercises: vec![
                ex("ex_1", "Supino Reto"),
                ex("ex_2", "Crucifixo"),
                ex("ex_3", "Supino Inclinado"),
                ex("ex_4", "Flexão"),
            ],
        }])
    }

    #[test]
    fn replacement_takes_over_id_and_position() {
        let mut plan = plan();
        let old = plan
            .substitute(0, "ex_3", ex("alt_9", "Supino com Halteres"))
            .unwrap();

        assert_eq!(old.name, "Supino Inclinado");
        let exercises = &plan.days()[0].exercises;
        assert_eq!(exercises.len(), 4);
        assert_eq!(exercises[2].id, "ex_3");
        assert_eq!(exercises[2].name, "Supino com Halteres");
        assert_eq!(exercises[1].name, "Crucifixo");
        assert_eq!(exercises[3].name, "Flexão");
    }

    #[test]
    fn unknown_day_is_rejected() {
        let mut plan = plan();
        assert_eq!(
            plan.substitute(3, "ex_1", ex("x", "X")),
            Err(SubstituteError::DayOutOfRange { index: 3, len: 1 })
        );
    }

    #[test]
    fn unknown_exercise_leaves_plan_untouched() {
        let mut plan = plan();
        let before = plan.clone();
        let err = plan.substitute(0, "ex_99", ex("x", "X")).unwrap_err();
        assert!(matches!(err, SubstituteError::ExerciseNotFound { .. }));
        assert_eq!(plan, before);
    }
}
