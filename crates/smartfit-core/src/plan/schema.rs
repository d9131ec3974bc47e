//! Response schemas in the Gemini OpenAPI subset (uppercase type names).

use serde_json::{Value, json};

/// Schema of one [`smartfit_store::models::Exercise`].
pub fn exercise_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "id": { "type": "STRING" },
            "name": { "type": "STRING" },
            "muscle": { "type": "STRING" },
            "sets": { "type": "INTEGER" },
            "reps": { "type": "STRING" },
            "notes": { "type": "STRING" }
        },
        "required": ["id", "name", "muscle", "sets", "reps", "notes"]
    })
}

/// Schema of one [`smartfit_store::models::DayPlan`].
pub fn day_plan_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "day": { "type": "STRING" },
            "focus": { "type": "STRING" },
            "exercises": { "type": "ARRAY", "items": exercise_schema() }
        },
        "required": ["day", "focus", "exercises"]
    })
}

/// The full plan: an array of days.
pub fn workout_plan_schema() -> Value {
    json!({ "type": "ARRAY", "items": day_plan_schema() })
}

/// A list of alternative exercises.
pub fn alternatives_schema() -> Value {
    json!({ "type": "ARRAY", "items": exercise_schema() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_schema_requires_every_field() {
        let schema = workout_plan_schema();
        assert_eq!(schema["type"], "ARRAY");
        assert_eq!(
            schema["items"]["required"],
            json!(["day", "focus", "exercises"])
        );
        let exercise = &schema["items"]["properties"]["exercises"]["items"];
        assert_eq!(exercise["properties"]["sets"]["type"], "INTEGER");
        assert_eq!(exercise["required"].as_array().map(Vec::len), Some(6));
    }
}
