//! Given/When/Then tests of the task list reducer
//!
//! Effects are inspected, never run: outcomes are fed in by hand.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;
use std::time::Duration;
use tasklist_client::{
    InProcessTaskApi, Phase, TaskListAction, TaskListEnvironment, TaskListReducer,
    TaskListState, DISMISS_ERROR_EFFECT,
};
use tasklist_core::effect::Effect;
use tasklist_core::environment::Clock;
use tasklist_tasks::{Filter, InMemoryTaskStore, Task, TaskEnvironment, TaskId, TaskService};
use tasklist_testing::{assertions, test_clock, ReducerTest, SequentialIds};

fn env() -> TaskListEnvironment {
    let service = TaskService::new(Arc::new(InMemoryTaskStore::new()), TaskEnvironment::system());
    TaskListEnvironment::new(
        Arc::new(InProcessTaskApi::new(service)),
        Arc::new(test_clock()),
        Arc::new(SequentialIds::new()),
    )
    .with_error_ttl(Duration::from_millis(3000))
}

fn task(id: &str, title: &str, completed: bool) -> Task {
    let mut task = Task::new(TaskId::from(id), title.to_string(), test_clock().now());
    task.completed = completed;
    task
}

fn assert_dismiss_scheduled(effects: &[Effect<TaskListAction>]) {
    let inner = assertions::assert_has_cancellable(effects, DISMISS_ERROR_EFFECT);
    match inner {
        Effect::Delay { duration, action } => {
            assert_eq!(*duration, Duration::from_millis(3000));
            assert!(matches!(**action, TaskListAction::DismissError { .. }));
        },
        other => panic!("expected a delayed dismiss, got {other:?}"),
    }
}

fn first_local_id() -> TaskId {
    TaskId::local(SequentialIds::nth(1))
}

// ============================================================================
// Load
// ============================================================================

#[test]
fn load_enters_loading_and_requests() {
    ReducerTest::new(TaskListReducer::new())
        .with_env(env())
        .given_state(TaskListState::ready(vec![]))
        .when_action(TaskListAction::Load)
        .then_state(|s| assert_eq!(s.phase, Phase::Loading))
        .then_effects(|effects| {
            assertions::assert_effects_count(effects, 1);
            assertions::assert_has_future_effect(effects);
        })
        .run();
}

#[test]
fn loaded_is_ready_without_error() {
    ReducerTest::new(TaskListReducer::new())
        .with_env(env())
        .given_state(TaskListState::default())
        .when_action(TaskListAction::Loaded { tasks: vec![] })
        .then_state(|s| {
            assert_eq!(s.phase, Phase::Ready);
            assert!(s.tasks.is_empty());
            assert_eq!(s.error, None);
        })
        .then_effects(assertions::assert_no_effects)
        .run();
}

#[test]
fn loaded_keeps_placeholders_in_flight() {
    ReducerTest::new(TaskListReducer::new())
        .with_env(env())
        .given_state(TaskListState::default())
        .when_action(TaskListAction::Create { title: "draft".into() })
        .when_action(TaskListAction::Loaded { tasks: vec![task("a", "old", false)] })
        .then_state(|s| {
            let ids: Vec<_> = s.tasks.iter().map(|t| t.id.clone()).collect();
            assert_eq!(ids, vec![first_local_id(), TaskId::from("a")]);
        })
        .run();
}

// ============================================================================
// Create
// ============================================================================

#[test]
fn create_inserts_pending_placeholder_at_front() {
    ReducerTest::new(TaskListReducer::new())
        .with_env(env())
        .given_state(TaskListState::ready(vec![task("a", "older", false)]))
        .when_action(TaskListAction::Create { title: "  Buy milk ".into() })
        .then_state(|s| {
            assert_eq!(s.tasks.len(), 2);
            assert_eq!(s.tasks[0].id, first_local_id());
            assert_eq!(s.tasks[0].title, "Buy milk");
            assert!(!s.tasks[0].completed);
            assert!(s.pending.contains(&first_local_id()));
        })
        .then_effects(assertions::assert_has_future_effect)
        .run();
}

#[test]
fn blank_title_shows_error_without_request() {
    ReducerTest::new(TaskListReducer::new())
        .with_env(env())
        .given_state(TaskListState::ready(vec![]))
        .when_action(TaskListAction::Create { title: " \t ".into() })
        .then_state(|s| {
            assert!(s.tasks.is_empty());
            assert_eq!(s.error.as_deref(), Some("title required"));
        })
        .then_effects(|effects| {
            assertions::assert_effects_count(effects, 1);
            assert_dismiss_scheduled(effects);
        })
        .run();
}

#[test]
fn created_replaces_placeholder_with_server_task() {
    let server = task("srv-1", "Buy milk", false);
    let expected = server.clone();

    ReducerTest::new(TaskListReducer::new())
        .with_env(env())
        .given_state(TaskListState::ready(vec![task("a", "older", false)]))
        .when_action(TaskListAction::Create { title: "Buy milk".into() })
        .when_action(TaskListAction::Created { local_id: first_local_id(), task: server })
        .then_state(move |s| {
            assert_eq!(s.tasks[0], expected);
            assert_eq!(s.tasks.len(), 2);
            assert!(s.pending.is_empty());
        })
        .then_effects(assertions::assert_no_effects)
        .run();
}

#[test]
fn create_failed_drops_placeholder_and_shows_error() {
    ReducerTest::new(TaskListReducer::new())
        .with_env(env())
        .given_state(TaskListState::ready(vec![task("a", "older", false)]))
        .when_action(TaskListAction::Create { title: "Buy milk".into() })
        .when_action(TaskListAction::CreateFailed {
            local_id: first_local_id(),
            error: "Could not add task: network error: down".into(),
        })
        .then_state(|s| {
            assert_eq!(s.tasks, vec![task("a", "older", false)]);
            assert!(s.pending.is_empty());
            assert_eq!(s.error.as_deref(), Some("Could not add task: network error: down"));
        })
        .then_effects(assert_dismiss_scheduled)
        .run();
}

// ============================================================================
// Toggle / remove
// ============================================================================

#[test]
fn toggle_flips_locally_then_rollback_restores() {
    let before = vec![task("a", "one", false), task("b", "two", true)];
    let expected = before.clone();

    ReducerTest::new(TaskListReducer::new())
        .with_env(env())
        .given_state(TaskListState::ready(before))
        .when_action(TaskListAction::Toggle { id: TaskId::from("a") })
        .when_action(TaskListAction::ToggleFailed {
            prior: task("a", "one", false),
            error: "Could not update task: server error (500): boom".into(),
        })
        .then_state(move |s| {
            assert_eq!(s.tasks, expected);
            assert!(s.saving.is_empty());
            assert!(s.error.is_some());
        })
        .then_effects(assert_dismiss_scheduled)
        .run();
}

#[test]
fn toggle_rollback_keeps_tasks_confirmed_meanwhile() {
    let confirmed = task("srv-1", "X", false);
    let expected = vec![confirmed.clone(), task("b", "two", true), task("a", "one", false)];

    ReducerTest::new(TaskListReducer::new())
        .with_env(env())
        .given_state(TaskListState::ready(vec![task("b", "two", false), task("a", "one", false)]))
        .when_action(TaskListAction::Toggle { id: TaskId::from("a") })
        .when_action(TaskListAction::Create { title: "X".into() })
        .when_action(TaskListAction::Created { local_id: first_local_id(), task: confirmed })
        .when_action(TaskListAction::Toggle { id: TaskId::from("b") })
        .when_action(TaskListAction::Toggled { task: task("b", "two", true) })
        .when_action(TaskListAction::ToggleFailed {
            prior: task("a", "one", false),
            error: "Could not update task: network error: down".into(),
        })
        .then_state(move |s| assert_eq!(s.tasks, expected))
        .run();
}

#[test]
fn task_with_toggle_in_flight_is_busy() {
    ReducerTest::new(TaskListReducer::new())
        .with_env(env())
        .given_state(TaskListState::ready(vec![task("a", "one", false)]))
        .when_action(TaskListAction::Toggle { id: TaskId::from("a") })
        .when_action(TaskListAction::Toggle { id: TaskId::from("a") })
        .then_state(|s| {
            assert!(s.tasks[0].completed, "second toggle must not flip back");
            assert!(s.is_saving(&TaskId::from("a")));
        })
        .then_effects(assertions::assert_no_effects)
        .run();
}

#[test]
fn toggle_is_optimistic() {
    ReducerTest::new(TaskListReducer::new())
        .with_env(env())
        .given_state(TaskListState::ready(vec![task("a", "one", false)]))
        .when_action(TaskListAction::Toggle { id: TaskId::from("a") })
        .then_state(|s| assert!(s.tasks[0].completed))
        .then_effects(assertions::assert_has_future_effect)
        .run();
}

#[test]
fn toggled_reconciles_with_server_copy() {
    let server = task("a", "renamed elsewhere", true);
    let expected = server.clone();

    ReducerTest::new(TaskListReducer::new())
        .with_env(env())
        .given_state(TaskListState::ready(vec![task("a", "one", false)]))
        .when_action(TaskListAction::Toggle { id: TaskId::from("a") })
        .when_action(TaskListAction::Toggled { task: server })
        .then_state(move |s| {
            assert_eq!(s.tasks, vec![expected]);
            assert!(!s.is_saving(&TaskId::from("a")));
        })
        .run();
}

#[test]
fn toggle_or_remove_of_unknown_id_is_a_no_op() {
    for action in [
        TaskListAction::Toggle { id: TaskId::from("ghost") },
        TaskListAction::Remove { id: TaskId::from("ghost") },
    ] {
        ReducerTest::new(TaskListReducer::new())
            .with_env(env())
            .given_state(TaskListState::ready(vec![task("a", "one", false)]))
            .when_action(action)
            .then_state(|s| {
                assert_eq!(s.tasks, vec![task("a", "one", false)]);
                assert_eq!(s.error, None);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }
}

#[test]
fn pending_placeholder_cannot_be_toggled() {
    ReducerTest::new(TaskListReducer::new())
        .with_env(env())
        .given_state(TaskListState::ready(vec![]))
        .when_action(TaskListAction::Create { title: "draft".into() })
        .when_action(TaskListAction::Toggle { id: first_local_id() })
        .then_state(|s| assert!(!s.tasks[0].completed))
        .then_effects(assertions::assert_no_effects)
        .run();
}

#[test]
fn remove_then_failure_restores_task() {
    let before = vec![task("a", "one", false), task("b", "two", false)];

    ReducerTest::new(TaskListReducer::new())
        .with_env(env())
        .given_state(TaskListState::ready(before))
        .when_action(TaskListAction::Remove { id: TaskId::from("a") })
        .when_action(TaskListAction::RemoveFailed {
            prior: task("a", "one", false),
            index: 0,
            error: "Could not delete task: network error: down".into(),
        })
        .then_state(|s| {
            assert_eq!(s.tasks.len(), 2);
            assert_eq!(s.tasks[0].id, TaskId::from("a"));
        })
        .then_effects(assert_dismiss_scheduled)
        .run();
}

#[test]
fn remove_rollback_does_not_resurrect_confirmed_removals() {
    ReducerTest::new(TaskListReducer::new())
        .with_env(env())
        .given_state(TaskListState::ready(vec![task("b", "two", false), task("a", "one", false)]))
        .when_action(TaskListAction::Remove { id: TaskId::from("a") })
        .when_action(TaskListAction::Remove { id: TaskId::from("b") })
        .when_action(TaskListAction::Removed { id: TaskId::from("b") })
        .when_action(TaskListAction::RemoveFailed {
            prior: task("a", "one", false),
            index: 1,
            error: "Could not delete task: network error: down".into(),
        })
        .then_state(|s| assert_eq!(s.tasks, vec![task("a", "one", false)]))
        .run();
}

#[test]
fn remove_rollback_skips_task_already_reloaded() {
    ReducerTest::new(TaskListReducer::new())
        .with_env(env())
        .given_state(TaskListState::ready(vec![task("a", "one", false)]))
        .when_action(TaskListAction::Remove { id: TaskId::from("a") })
        .when_action(TaskListAction::Loaded { tasks: vec![task("a", "one", false)] })
        .when_action(TaskListAction::RemoveFailed {
            prior: task("a", "one", false),
            index: 0,
            error: "Could not delete task: network error: down".into(),
        })
        .then_state(|s| assert_eq!(s.tasks, vec![task("a", "one", false)]))
        .run();
}

#[test]
fn remove_is_optimistic() {
    ReducerTest::new(TaskListReducer::new())
        .with_env(env())
        .given_state(TaskListState::ready(vec![task("a", "one", false), task("b", "two", false)]))
        .when_action(TaskListAction::Remove { id: TaskId::from("a") })
        .then_state(|s| {
            assert_eq!(s.tasks.len(), 1);
            assert_eq!(s.tasks[0].id, TaskId::from("b"));
        })
        .then_effects(assertions::assert_has_future_effect)
        .run();
}

// ============================================================================
// Clear completed / filter / dismiss
// ============================================================================

#[test]
fn clear_completed_waits_for_the_server() {
    ReducerTest::new(TaskListReducer::new())
        .with_env(env())
        .given_state(TaskListState::ready(vec![task("a", "one", true), task("b", "two", false)]))
        .when_action(TaskListAction::ClearCompleted)
        .then_state(|s| assert_eq!(s.tasks.len(), 2))
        .then_effects(assertions::assert_has_future_effect)
        .run();
}

#[test]
fn cleared_completed_removes_done_tasks() {
    ReducerTest::new(TaskListReducer::new())
        .with_env(env())
        .given_state(TaskListState::ready(vec![task("a", "one", true), task("b", "two", false)]))
        .when_action(TaskListAction::ClearedCompleted { removed: 1 })
        .then_state(|s| assert_eq!(s.tasks, vec![task("b", "two", false)]))
        .run();
}

#[test]
fn clear_completed_failure_keeps_list() {
    ReducerTest::new(TaskListReducer::new())
        .with_env(env())
        .given_state(TaskListState::ready(vec![task("a", "one", true)]))
        .when_action(TaskListAction::ClearCompletedFailed { error: "nope".into() })
        .then_state(|s| {
            assert_eq!(s.tasks.len(), 1);
            assert_eq!(s.error.as_deref(), Some("nope"));
        })
        .then_effects(assert_dismiss_scheduled)
        .run();
}

#[test]
fn set_filter_is_local() {
    ReducerTest::new(TaskListReducer::new())
        .with_env(env())
        .given_state(TaskListState::ready(vec![task("a", "one", true), task("b", "two", false)]))
        .when_action(TaskListAction::SetFilter { filter: Filter::Completed })
        .then_state(|s| {
            let visible: Vec<_> = s.visible_tasks().iter().map(|t| t.id.clone()).collect();
            assert_eq!(visible, vec![TaskId::from("a")]);
            assert_eq!(s.items_left(), 1);
        })
        .then_effects(assertions::assert_no_effects)
        .run();
}

#[test]
fn dismiss_clears_error() {
    let mut state = TaskListState::ready(vec![]);
    state.error = Some("old".into());
    state.error_seq = 4;

    ReducerTest::new(TaskListReducer::new())
        .with_env(env())
        .given_state(state)
        .when_action(TaskListAction::DismissError { seq: 4 })
        .then_state(|s| assert_eq!(s.error, None))
        .then_effects(assertions::assert_no_effects)
        .run();
}

#[test]
fn dismissal_of_an_older_error_is_ignored() {
    ReducerTest::new(TaskListReducer::new())
        .with_env(env())
        .given_state(TaskListState::ready(vec![]))
        .when_action(TaskListAction::ClearCompletedFailed { error: "first".into() })
        .when_action(TaskListAction::ClearCompletedFailed { error: "second".into() })
        .when_action(TaskListAction::DismissError { seq: 1 })
        .then_state(|s| {
            assert_eq!(s.error_seq, 2);
            assert_eq!(s.error.as_deref(), Some("second"));
        })
        .run();
}

#[test]
fn each_error_schedules_its_own_dismissal() {
    ReducerTest::new(TaskListReducer::new())
        .with_env(env())
        .given_state(TaskListState::ready(vec![]))
        .when_action(TaskListAction::ClearCompletedFailed { error: "first".into() })
        .when_action(TaskListAction::ClearCompletedFailed { error: "second".into() })
        .then_effects(|effects| {
            match assertions::assert_has_cancellable(effects, DISMISS_ERROR_EFFECT) {
                Effect::Delay { action, .. } => {
                    assert_eq!(**action, TaskListAction::DismissError { seq: 2 });
                },
                other => panic!("expected a delayed dismiss, got {other:?}"),
            }
        })
        .run();
}

#[test]
fn actions_are_classified() {
    assert!(TaskListAction::Load.is_intent());
    assert!(TaskListAction::Loaded { tasks: vec![] }.is_outcome());
    assert!(!TaskListAction::DismissError { seq: 0 }.is_intent());
    assert!(!TaskListAction::SetFilter { filter: Filter::All }.is_outcome());
    assert_eq!(TaskListAction::ClearCompleted.name(), "ClearCompleted");
}
