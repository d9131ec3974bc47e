//! Workout plans: prompt construction, output schemas, the two AI clients,
//! and local edits to a generated plan.

pub mod alternatives;
pub mod dashboard;
pub mod generate;
pub mod prompt;
pub mod schema;
pub mod substitute;

pub use alternatives::{MAX_ALTERNATIVES, alternative_exercises};
pub use dashboard::DashboardView;
pub use generate::{PlanError, generate_workout_plan};
pub use prompt::{build_alternatives_prompt, build_plan_prompt};
pub use substitute::SubstituteError;
