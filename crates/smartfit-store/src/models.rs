use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Catalogues
// ---------------------------------------------------------------------------

/// Muscle groups offered by the onboarding wizard, in display order.
pub const MUSCLE_GROUPS: &[&str] = &[
    "Peito", "Costas", "Pernas", "Ombros", "Bíceps", "Tríceps", "Abdômen", "Glúteos",
];

/// Weekday names offered by the onboarding wizard, Monday first.
pub const DAYS_OF_WEEK: &[&str] = &[
    "Segunda", "Terça", "Quarta", "Quinta", "Sexta", "Sábado", "Domingo",
];

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Error returned when parsing an unknown enum key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumParseError {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for EnumParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: {:?}", self.kind, self.value)
    }
}

impl std::error::Error for EnumParseError {}

/// Declares a closed enum with a stable snake_case key (used by serde,
/// `Display` and `FromStr`) and a Portuguese label shown to the user and
/// embedded in prompts.
macro_rules! labeled_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => ($key:literal, $label:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every variant, in presentation order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Stable machine key.
            pub fn key(self) -> &'static str {
                match self {
                    $(Self::$variant => $key),+
                }
            }

            /// Human-readable Portuguese label.
            pub fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.key())
            }
        }

        impl FromStr for $name {
            type Err = EnumParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($key => Ok(Self::$variant),)+
                    other => Err(EnumParseError {
                        kind: $kind,
                        value: other.to_owned(),
                    }),
                }
            }
        }
    };
}

labeled_enum! {
    /// Self-reported gender.
    Gender, "gender" {
        Male => ("male", "Masculino"),
        Female => ("female", "Feminino"),
    }
}

labeled_enum! {
    /// Training goal.
    Goal, "goal" {
        Definition => ("definition", "Definição Muscular"),
        Hypertrophy => ("hypertrophy", "Hipertrofia (Ganho de Massa)"),
        WeightLoss => ("weight_loss", "Perda de Peso"),
        Strength => ("strength", "Treino de Força"),
    }
}

labeled_enum! {
    /// Training experience.
    ExperienceLevel, "experience level" {
        Beginner => ("beginner", "Iniciante"),
        Intermediate => ("intermediate", "Intermediário"),
        Advanced => ("advanced", "Avançado"),
    }
}

labeled_enum! {
    /// Where the user trains, which bounds the available equipment.
    Location, "location" {
        Gym => ("gym", "Academia"),
        Home => ("home", "Em Casa (Peso do corpo/Leve)"),
        Outdoor => ("outdoor", "Ao Ar Livre/Parque"),
    }
}

impl Goal {
    /// First word of the label, used where space is tight.
    pub fn short_label(self) -> &'static str {
        self.label().split(' ').next().unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Value types
// ---------------------------------------------------------------------------

/// Preferences collected by the onboarding wizard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserData {
    pub gender: Gender,
    /// Body weight in kilograms.
    pub weight: u32,
    /// Height in centimetres.
    pub height: u32,
    pub goal: Goal,
    pub experience: ExperienceLevel,
    /// Session length in minutes.
    pub duration: u32,
    /// Training days, in the order the user picked them.
    pub days: Vec<String>,
    pub location: Location,
    pub target_muscles: Vec<String>,
    /// Priority muscle; always one of `target_muscles`.
    pub focus_muscle: String,
}

/// One movement in a day's session.
///
/// `id` is stable across substitutions so the exercise keeps its position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub muscle: String,
    pub sets: u32,
    /// Free-form rep range, e.g. `"8-12"`.
    pub reps: String,
    /// Short form cue or tip.
    pub notes: String,
}

/// A single scheduled training day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPlan {
    pub day: String,
    pub focus: String,
    pub exercises: Vec<Exercise>,
}

/// The full weekly plan. Serialized as a bare JSON array of days.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkoutPlan(pub Vec<DayPlan>);

impl WorkoutPlan {
    pub fn days(&self) -> &[DayPlan] {
        &self.0
    }

    pub fn days_mut(&mut self) -> &mut [DayPlan] {
        &mut self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Total number of exercises across all days.
    pub fn exercise_count(&self) -> usize {
        self.0.iter().map(|d| d.exercises.len()).sum()
    }
}

impl From<Vec<DayPlan>> for WorkoutPlan {
    fn from(days: Vec<DayPlan>) -> Self {
        Self(days)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
