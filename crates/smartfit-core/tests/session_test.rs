//! Session flow against an in-memory store.

use std::sync::Arc;

use smartfit_core::GenerationSettings;
use smartfit_core::session::{GENERATION_FAILED_MESSAGE, Screen, Session, SessionError};
use smartfit_store::persist::{self, PLAN_KEY, USER_KEY};
use smartfit_store::{KeyValueStore, MemoryStore};
use smartfit_test_utils::{
    FailingStore, Reply, ScriptedGenerator, alternatives_json, exercise, sample_plan, sample_plan_json,
    sample_user, server_error,
};

fn session_with(
    generator: ScriptedGenerator,
) -> (Session, Arc<ScriptedGenerator>, Arc<MemoryStore>) {
    let generator = Arc::new(generator);
    let store = Arc::new(MemoryStore::new());
    let session = Session::restore(
        generator.clone(),
        store.clone(),
        GenerationSettings::default(),
    )
    .unwrap();
    (session, generator, store)
}

#[tokio::test(start_paused = true)]
async fn empty_store_starts_onboarding() {
    let (session, _, _) = session_with(ScriptedGenerator::default());
    assert_eq!(session.screen(), &Screen::Onboarding);
    assert!(session.plan().is_none());
}

#[tokio::test(start_paused = true)]
async fn saved_state_restores_dashboard() {
    let store = Arc::new(MemoryStore::new());
    let plan = sample_plan(&["Segunda"]);
    persist::save_plan(store.as_ref(), &plan).unwrap();
    persist::save_user(store.as_ref(), &sample_user()).unwrap();

    let session = Session::restore(
        Arc::new(ScriptedGenerator::default()),
        store,
        GenerationSettings::default(),
    )
    .unwrap();

    assert_eq!(session.plan(), Some(&plan));
    assert_eq!(session.user(), Some(&sample_user()));
}

#[tokio::test(start_paused = true)]
async fn successful_submit_persists_both_keys() {
    let (mut session, _, store) = session_with(ScriptedGenerator::answering(sample_plan_json()));

    session.submit(sample_user()).await.unwrap();

    assert!(matches!(session.screen(), Screen::Dashboard { .. }));
    assert_eq!(session.plan().map(|p| p.len()), Some(3));
    assert!(store.get(PLAN_KEY).unwrap().is_some());
    assert!(store.get(USER_KEY).unwrap().is_some());
}

#[tokio::test(start_paused = true)]
async fn failed_submit_discards_preferences() {
    let (mut session, generator, store) = session_with(ScriptedGenerator::new([
        Reply::Error(server_error("first attempt")),
        Reply::Error(server_error("second attempt")),
        Reply::Error(server_error("third attempt")),
    ]));

    session.submit(sample_user()).await.unwrap();

    assert_eq!(generator.call_count(), 3);
    match session.screen() {
        Screen::Failed { message, detail } => {
            assert_eq!(message, GENERATION_FAILED_MESSAGE);
            assert!(detail.contains("third attempt"));
        }
        other => panic!("expected Failed, got {other:?}"),
    }
    assert!(store.is_empty());

    session.dismiss_error();
    assert_eq!(session.screen(), &Screen::Onboarding);
}

#[tokio::test(start_paused = true)]
async fn submit_is_two_phase() {
    let (mut session, _, store) = session_with(ScriptedGenerator::answering(sample_plan_json()));

    let pending = session.begin_submit(sample_user()).unwrap();
    assert!(matches!(session.screen(), Screen::Generating { .. }));
    assert!(store.get(USER_KEY).unwrap().is_some());
    assert!(store.get(PLAN_KEY).unwrap().is_none());

    // A second submit while generating is refused.
    assert!(matches!(
        session.begin_submit(sample_user()),
        Err(SessionError::WrongScreen { .. })
    ));

    let result = tokio::spawn(pending.run()).await.unwrap();
    session.finish_submit(result).unwrap();
    assert!(matches!(session.screen(), Screen::Dashboard { .. }));
}

#[tokio::test(start_paused = true)]
async fn substitution_keeps_id_and_is_saved() {
    let (mut session, _, store) = session_with(ScriptedGenerator::answering(sample_plan_json()));
    session.submit(sample_user()).await.unwrap();

    let old = session
        .substitute(0, "ex_3", exercise("alt_1", "Peck Deck", "Peito"))
        .unwrap();
    assert_eq!(old.name, "Crucifixo");

    let saved = persist::load_saved_state(store.as_ref()).unwrap().unwrap();
    let swapped = &saved.plan.days()[0].exercises[2];
    assert_eq!(swapped.id, "ex_3");
    assert_eq!(swapped.name, "Peck Deck");
}

#[tokio::test(start_paused = true)]
async fn alternatives_for_plan_exercise() {
    let (mut session, generator, _) = session_with(ScriptedGenerator::answering(sample_plan_json()));
    session.submit(sample_user()).await.unwrap();
    generator.push(Reply::Text(alternatives_json(3)));

    let found = session.alternatives(1, "ex_4").await.unwrap();
    assert_eq!(found.len(), 3);

    let prompt = &generator.requests()[1].prompt;
    assert!(prompt.contains("Supino Reto"));
    assert!(prompt.contains("Academia"));

    assert!(matches!(
        session.alternatives(1, "ex_1").await,
        Err(SessionError::Substitute(_))
    ));
}

#[tokio::test(start_paused = true)]
async fn reset_clears_everything() {
    let (mut session, _, store) = session_with(ScriptedGenerator::answering(sample_plan_json()));
    session.submit(sample_user()).await.unwrap();

    session.reset().unwrap();

    assert_eq!(session.screen(), &Screen::Onboarding);
    assert!(store.get(PLAN_KEY).unwrap().is_none());
    assert!(store.get(USER_KEY).unwrap().is_none());
}

#[tokio::test(start_paused = true)]
async fn substitute_without_plan_is_refused() {
    let (mut session, _, _) = session_with(ScriptedGenerator::default());
    assert!(matches!(
        session.substitute(0, "ex_1", exercise("x", "X", "Peito")),
        Err(SessionError::NoPlan)
    ));
}

#[tokio::test(start_paused = true)]
async fn plan_write_failure_still_opens_dashboard() {
    let store = Arc::new(FailingStore::rejecting(&[PLAN_KEY]));
    let mut session = Session::restore(
        Arc::new(ScriptedGenerator::answering(sample_plan_json())),
        store.clone(),
        GenerationSettings::default(),
    )
    .unwrap();

    let err = session.submit(sample_user()).await.unwrap_err();

    assert!(matches!(err, SessionError::Store(_)), "got {err:?}");
    assert!(matches!(session.screen(), Screen::Dashboard { .. }));
    assert_eq!(session.plan().unwrap().len(), 3);
    assert!(store.get(USER_KEY).unwrap().is_some());
    assert!(store.get(PLAN_KEY).unwrap().is_none());
}
