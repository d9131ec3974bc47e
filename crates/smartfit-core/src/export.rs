//! Plain-text renderings of a plan for saving or sharing.

use std::fmt::{self, Write as _};

use chrono::{Local, NaiveDate};

use smartfit_store::models::{UserData, WorkoutPlan};

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Markdown,
    Csv,
}

impl ExportFormat {
    /// Conventional file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Csv => "csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Markdown => f.write_str("markdown"),
            Self::Csv => f.write_str("csv"),
        }
    }
}

/// File name for an export written on `date`, e.g. `smartfit-plan-20250309.md`.
pub fn file_name(format: ExportFormat, date: NaiveDate) -> String {
    format!("smartfit-plan-{}.{}", date.format("%Y%m%d"), format.extension())
}

/// Render in the chosen format, dated today.
pub fn render(format: ExportFormat, plan: &WorkoutPlan, user: &UserData) -> String {
    match format {
        ExportFormat::Markdown => render_markdown(plan, user),
        ExportFormat::Csv => render_csv(plan),
    }
}

/// Markdown document with a summary header and one section per day.
pub fn render_markdown(plan: &WorkoutPlan, user: &UserData) -> String {
    render_markdown_on(plan, user, Local::now().date_naive())
}

/// [`render_markdown`] with an explicit generation date.
pub fn render_markdown_on(plan: &WorkoutPlan, user: &UserData, date: NaiveDate) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# Seu Plano Smart\n");
    let _ = writeln!(out, "- **Foco:** {}", user.focus_muscle);
    let _ = writeln!(out, "- **Objetivo:** {}", user.goal.label());
    let _ = writeln!(out, "- **Frequência:** {} dias/semana", user.days.len());
    let _ = writeln!(out, "- **Duração:** {} min", user.duration);
    let _ = writeln!(out, "- **Local:** {}", user.location.label());

    for day in plan.days() {
        let _ = writeln!(out, "\n## {} ({})\n", day.day, day.focus);
        for (n, ex) in day.exercises.iter().enumerate() {
            let _ = writeln!(
                out,
                "{}. **{}** ({}): {} x {}",
                n + 1,
                ex.name,
                ex.muscle,
                ex.sets,
                ex.reps
            );
            if !ex.notes.trim().is_empty() {
                let _ = writeln!(out, "   - {}", ex.notes.trim());
            }
        }
    }

    let _ = writeln!(out, "\n---\nGerado por SmartFit em {}", date.format("%d/%m/%Y"));
    out
}

/// One row per exercise.
pub fn render_csv(plan: &WorkoutPlan) -> String {
    let mut out = String::from("day,focus,exercise_id,name,muscle,sets,reps,notes\n");
    for day in plan.days() {
        for ex in &day.exercises {
            let fields = [
                csv_field(&day.day),
                csv_field(&day.focus),
                csv_field(&ex.id),
                csv_field(&ex.name),
                csv_field(&ex.muscle),
                ex.sets.to_string(),
                csv_field(&ex.reps),
                csv_field(&ex.notes),
            ];
            out.push_str(&fields.join(","));
            out.push('\n');
        }
    }
    out
}

/// Video search link for learning `exercise_name`.
pub fn tutorial_url(exercise_name: &str) -> String {
    let query = format!("{exercise_name} exercise tutorial");
    reqwest::Url::parse_with_params(TUTORIAL_SEARCH_URL, &[("search_query", query)])
        .map(String::from)
        .unwrap_or_else(|_| TUTORIAL_SEARCH_URL.to_owned())
}

const TUTORIAL_SEARCH_URL: &str = "https://www.youtube.com/results";

/// Quote a field when it contains a delimiter, quote or line break.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartfit_store::models::{
        DayPlan, Exercise, ExperienceLevel, Gender, Goal, Location,
    };

    fn user() -> UserData {
        UserData {
            gender: Gender::Male,
            weight: 70,
            height: 175,
            goal: Goal::Hypertrophy,
            experience: ExperienceLevel::Beginner,
            duration: 60,
            days: vec!["Segunda".into(), "Quarta".into()],
            location: Location::Gym,
            target_muscles: vec!["Peito".into()],
            focus_muscle: "Peito".into(),
        }
    }

    fn plan() -> WorkoutPlan {
        WorkoutPlan(vec![DayPlan {
            day: "Segunda".into(),
            focus: "Peito e Tríceps".into(),
            exercises: vec![Exercise {
                id: "ex_1".into(),
                name: "Supino Reto".into(),
                muscle: "Peito".into(),
                sets: 4,
                reps: "8-12".into(),
                notes: "Desça a barra até o peito, sem \"quicar\", controlando".into(),
            }],
        }])
    }

    #[test]
    fn markdown_has_summary_and_days() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        let md = render_markdown_on(&plan(), &user(), date);

        assert!(md.starts_with("# Seu Plano Smart\n"));
        assert!(md.contains("- **Foco:** Peito\n"));
        assert!(md.contains("- **Frequência:** 2 dias/semana"));
        assert!(md.contains("## Segunda (Peito e Tríceps)"));
        assert!(md.contains("1. **Supino Reto** (Peito): 4 x 8-12"));
        assert!(md.contains("Gerado por SmartFit em 09/03/2025"));
    }

    #[test]
    fn csv_quotes_fields_with_commas_and_quotes() {
        let csv = render_csv(&plan());
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("day,focus,exercise_id,name,muscle,sets,reps,notes")
        );
        assert_eq!(
            lines.next(),
            Some(
                "Segunda,Peito e Tríceps,ex_1,Supino Reto,Peito,4,8-12,\
                 \"Desça a barra até o peito, sem \"\"quicar\"\", controlando\""
            )
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn tutorial_url_encodes_query() {
        assert_eq!(
            tutorial_url("Supino Reto"),
            "https://www.youtube.com/results?search_query=Supino+Reto+exercise+tutorial"
        );
    }

    #[test]
    fn file_name_is_dated_with_format_extension() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        assert_eq!(
            file_name(ExportFormat::Markdown, date),
            "smartfit-plan-20250309.md"
        );
        assert_eq!(file_name(ExportFormat::Csv, date), "smartfit-plan-20250309.csv");
    }
}
