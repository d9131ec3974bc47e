//! Typed persistence of the plan and the user's preferences.
//!
//! Two keys are used, mirroring the original local-storage layout:
//! [`PLAN_KEY`] holds the serialized [`WorkoutPlan`] and [`USER_KEY`] the
//! serialized [`UserData`]. State is read once at startup, written on every
//! change and cleared on reset.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::error::StoreError;
use crate::kv::KeyValueStore;
use crate::models::{UserData, WorkoutPlan};

/// Key holding the serialized plan.
pub const PLAN_KEY: &str = "smartfit_plan";

/// Key holding the serialized user preferences.
pub const USER_KEY: &str = "smartfit_user";

/// Everything restored from storage at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedState {
    pub plan: WorkoutPlan,
    pub user: UserData,
}

/// Load the saved plan and preferences.
///
/// Returns `Ok(None)` when nothing usable is stored: either key is absent,
/// or a value fails to parse. Corrupt keys are removed so the next startup
/// begins clean. Only I/O failures are reported as errors.
pub fn load_saved_state(store: &dyn KeyValueStore) -> Result<Option<SavedState>, StoreError> {
    let plan = read_json::<WorkoutPlan>(store, PLAN_KEY);
    let user = read_json::<UserData>(store, USER_KEY);

    match (plan, user) {
        (Ok(Some(plan)), Ok(Some(user))) => {
            info!(days = plan.len(), "restored saved plan");
            Ok(Some(SavedState { plan, user }))
        }
        (Ok(_), Ok(_)) => Ok(None),
        (plan, user) => {
            let mut corrupt = false;
            for (key, result) in [(PLAN_KEY, plan.map(|_| ())), (USER_KEY, user.map(|_| ()))] {
                match result {
                    Err(StoreError::Corrupt { source, .. }) => {
                        warn!(key, error = %source, "discarding corrupt saved state");
                        store.remove(key)?;
                        corrupt = true;
                    }
                    Err(other) => return Err(other),
                    Ok(()) => {}
                }
            }
            if corrupt {
                // A half-restored session is not useful; start over.
                store.remove(PLAN_KEY)?;
                store.remove(USER_KEY)?;
            }
            Ok(None)
        }
    }
}

/// Persist the plan under [`PLAN_KEY`].
pub fn save_plan(store: &dyn KeyValueStore, plan: &WorkoutPlan) -> Result<(), StoreError> {
    write_json(store, PLAN_KEY, plan)
}

/// Persist the preferences under [`USER_KEY`].
pub fn save_user(store: &dyn KeyValueStore, user: &UserData) -> Result<(), StoreError> {
    write_json(store, USER_KEY, user)
}

/// Remove only the user preferences.
pub fn clear_user(store: &dyn KeyValueStore) -> Result<(), StoreError> {
    store.remove(USER_KEY)
}

/// Remove both persisted keys.
pub fn clear(store: &dyn KeyValueStore) -> Result<(), StoreError> {
    store.remove(PLAN_KEY)?;
    store.remove(USER_KEY)?;
    info!("cleared saved state");
    Ok(())
}

fn read_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StoreError::Corrupt {
            key: key.to_owned(),
            source,
        })
}

fn write_json<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(value).map_err(|source| StoreError::Serialize {
        key: key.to_owned(),
        source,
    })?;
    store.set(key, &raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;
    use crate::models::{
        DayPlan, Exercise, ExperienceLevel, Gender, Goal, Location, UserData, WorkoutPlan,
    };

    fn user() -> UserData {
        UserData {
            gender: Gender::Female,
            weight: 62,
            height: 168,
            goal: Goal::Definition,
            experience: ExperienceLevel::Intermediate,
            duration: 45,
            days: vec!["Terça".to_string(), "Quinta".to_string()],
            location: Location::Home,
            target_muscles: vec!["Glúteos".to_string(), "Pernas".to_string()],
            focus_muscle: "Glúteos".to_string(),
        }
    }

    fn plan() -> WorkoutPlan {
        WorkoutPlan(vec![DayPlan {
            day: "Terça".to_string(),
            focus: "Inferiores".to_string(),
            exercises: vec![Exercise {
                id: "ex_1".to_string(),
                name: "Agachamento Búlgaro".to_string(),
                muscle: "Glúteos".to_string(),
                sets: 3,
                reps: "10-12".to_string(),
                notes: "Tronco levemente inclinado".to_string(),
            }],
        }])
    }

    #[test]
    fn empty_store_has_no_saved_state() {
        let store = MemoryStore::new();
        assert_eq!(load_saved_state(&store).unwrap(), None);
    }

    #[test]
    fn saved_state_roundtrips() {
        let store = MemoryStore::new();
        save_plan(&store, &plan()).unwrap();
        save_user(&store, &user()).unwrap();

        let state = load_saved_state(&store).unwrap().expect("state");
        assert_eq!(state.plan, plan());
        assert_eq!(state.user, user());
    }

    #[test]
    fn plan_without_user_is_not_restored() {
        let store = MemoryStore::new();
        save_plan(&store, &plan()).unwrap();
        assert_eq!(load_saved_state(&store).unwrap(), None);
        // Nothing is corrupt, so nothing is removed.
        assert!(store.get(PLAN_KEY).unwrap().is_some());
    }

    #[test]
    fn corrupt_plan_clears_both_keys() {
        let store = MemoryStore::new();
        store.set(PLAN_KEY, "{not json").unwrap();
        save_user(&store, &user()).unwrap();

        assert_eq!(load_saved_state(&store).unwrap(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn corrupt_user_clears_both_keys() {
        let store = MemoryStore::new();
        save_plan(&store, &plan()).unwrap();
        store.set(USER_KEY, "{\"gender\":\"robot\"}").unwrap();

        assert_eq!(load_saved_state(&store).unwrap(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn clear_removes_both_keys() {
        let store = MemoryStore::new();
        save_plan(&store, &plan()).unwrap();
        save_user(&store, &user()).unwrap();

        clear(&store).unwrap();

        assert!(store.get(PLAN_KEY).unwrap().is_none());
        assert!(store.get(USER_KEY).unwrap().is_none());
    }

    #[test]
    fn clear_user_keeps_plan() {
        let store = MemoryStore::new();
        save_plan(&store, &plan()).unwrap();
        save_user(&store, &user()).unwrap();

        clear_user(&store).unwrap();

        assert!(store.get(PLAN_KEY).unwrap().is_some());
        assert!(store.get(USER_KEY).unwrap().is_none());
    }
}
