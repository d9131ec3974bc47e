//! Prompt construction. Pure string assembly, no I/O.
//!
//! Prompts are written in Brazilian Portuguese so the model answers in the
//! same language as the UI.

use std::fmt::Write as _;

use smartfit_store::models::{Location, UserData};

/// Build the weekly-plan prompt.
///
/// Every preference appears exactly once; the rules section refers back to
/// them without repeating values.
pub fn build_plan_prompt(user: &UserData) -> String {
    let mut prompt = String::with_capacity(1024);

    prompt.push_str(
        "Atue como um personal trainer de elite. Crie um plano de treino semanal \
         personalizado para o seguinte perfil:\n\n",
    );

    let _ = writeln!(prompt, "- Gênero: {}", user.gender.label());
    let _ = writeln!(prompt, "- Peso: {}kg", user.weight);
    let _ = writeln!(prompt, "- Altura: {}cm", user.height);
    let _ = writeln!(prompt, "- Objetivo: {}", user.goal.label());
    let _ = writeln!(prompt, "- Nível de Experiência: {}", user.experience.label());
    let _ = writeln!(prompt, "- Duração por treino: {} minutos", user.duration);
    let _ = writeln!(prompt, "- Dias disponíveis: {}", user.days.join(", "));
    let _ = writeln!(prompt, "- Local: {}", user.location.label());
    let _ = writeln!(prompt, "- Músculos alvo: {}", user.target_muscles.join(", "));
    let _ = writeln!(prompt, "- Foco prioritário: {}", user.focus_muscle);

    prompt.push_str(
        "\nRegras:\n\
         1. Escolha uma divisão de treino adequada ao nível de experiência.\n\
         2. Use apenas exercícios compatíveis com o local e equipamentos disponíveis.\n\
         3. Ajuste séries e repetições de acordo com o objetivo.\n\
         4. Cada sessão deve caber na duração por treino informada.\n\
         5. Crie exatamente um dia de treino para cada dia disponível, na mesma ordem.\n\
         6. Dê ênfase extra ao foco prioritário.\n\
         7. Responda todo o texto em português do Brasil.\n",
    );

    prompt
}

/// Build the prompt asking for three substitutes for one exercise.
pub fn build_alternatives_prompt(exercise_name: &str, muscle: &str, location: Location) -> String {
    format!(
        "Sugira exatamente 3 exercícios alternativos e distintos para substituir \
         \"{exercise_name}\", trabalhando o músculo {muscle}, que possam ser feitos em: {}. \
         Responda apenas em português do Brasil.",
        location.label()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartfit_store::models::{ExperienceLevel, Gender, Goal};

    fn user() -> UserData {
        UserData {
            gender: Gender::Female,
            weight: 63,
            height: 168,
            goal: Goal::WeightLoss,
            experience: ExperienceLevel::Intermediate,
            duration: 45,
            days: vec!["Terça".into(), "Quinta".into()],
            location: Location::Home,
            target_muscles: vec!["Pernas".into(), "Glúteos".into()],
            focus_muscle: "Glúteos".into(),
        }
    }

    #[test]
    fn plan_prompt_embeds_each_field_once() {
        let prompt = build_plan_prompt(&user());

        for needle in [
            "Feminino",
            "63kg",
            "168cm",
            "Perda de Peso",
            "Intermediário",
            "45 minutos",
            "Terça, Quinta",
            "Em Casa (Peso do corpo/Leve)",
            "Pernas, Glúteos",
            "Foco prioritário: Glúteos",
        ] {
            assert_eq!(prompt.matches(needle).count(), 1, "{needle:?} in:\n{prompt}");
        }
    }

    #[test]
    fn plan_prompt_is_portuguese_and_orders_days() {
        let prompt = build_plan_prompt(&user());
        assert!(prompt.contains("português do Brasil"));
        assert!(prompt.contains("um dia de treino para cada dia disponível, na mesma ordem"));
    }

    #[test]
    fn alternatives_prompt_names_exercise_muscle_and_location() {
        let prompt = build_alternatives_prompt("Supino Reto", "Peito", Location::Gym);
        assert!(prompt.contains("\"Supino Reto\""));
        assert!(prompt.contains("músculo Peito"));
        assert!(prompt.contains("Academia"));
        assert!(prompt.contains("exatamente 3"));
    }
}
