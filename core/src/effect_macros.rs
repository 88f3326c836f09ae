//! Declarative macros for ergonomic effect construction
//!
//! These macros reduce boilerplate when creating `Effect` variants inside
//! reducers, particularly for request effects and timers.

/// Create an `Effect::Future` from an async block
///
/// # Example
///
/// ```rust,ignore
/// use tasklist_core::async_effect;
///
/// async_effect! {
///     match api.toggle(&id).await {
///         Ok(task) => Some(TaskListAction::Toggled { task }),
///         Err(error) => Some(TaskListAction::ToggleFailed { prior, error: error.to_string() }),
///     }
/// }
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}

/// Create an `Effect::Delay` for scheduling delayed actions
///
/// # Example
///
/// ```rust,ignore
/// use tasklist_core::delay;
/// use std::time::Duration;
///
/// delay! {
///     duration: Duration::from_secs(3),
///     action: TaskListAction::DismissError { seq: 1 }
/// }
/// ```
#[macro_export]
macro_rules! delay {
    (
        duration: $duration:expr,
        action: $action:expr
    ) => {
        $crate::effect::Effect::Delay {
            duration: $duration,
            action: ::std::boxed::Box::new($action),
        }
    };
}

/// Create an `Effect::Cancellable` keyed by `id`
///
/// A later effect registered under the same id replaces (aborts) this one.
///
/// # Example
///
/// ```rust,ignore
/// use tasklist_core::{cancellable, delay};
///
/// cancellable! {
///     id: "error-dismiss",
///     effect: delay! { duration: ttl, action: TaskListAction::DismissError { seq } }
/// }
/// ```
#[macro_export]
macro_rules! cancellable {
    (
        id: $id:expr,
        effect: $effect:expr
    ) => {
        $crate::effect::Effect::Cancellable {
            id: $crate::effect::EffectId::new($id),
            effect: ::std::boxed::Box::new($effect),
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::effect::Effect;
    use std::time::Duration;

    #[derive(Clone, Debug)]
    enum TestAction {
        Loaded { count: usize },
        Dismiss,
    }

    #[test]
    fn test_async_effect_macro() {
        let effect = async_effect! {
            Some(TestAction::Loaded { count: 3 })
        };

        assert!(matches!(effect, Effect::Future(_)));
    }

    #[tokio::test]
    async fn test_async_effect_produces_action() {
        let Effect::Future(fut) = async_effect!(Some(TestAction::Loaded { count: 2 })) else {
            unreachable!("async_effect! always builds a Future");
        };

        assert!(matches!(fut.await, Some(TestAction::Loaded { count: 2 })));
    }

    #[test]
    fn test_delay_macro() {
        let effect = delay! {
            duration: Duration::from_secs(3),
            action: TestAction::Dismiss
        };

        assert!(matches!(effect, Effect::Delay { .. }));
    }

    #[test]
    fn test_cancellable_macro() {
        let effect = cancellable! {
            id: "dismiss",
            effect: delay! { duration: Duration::from_secs(3), action: TestAction::Dismiss }
        };

        match effect {
            Effect::Cancellable { id, effect } => {
                assert_eq!(id.as_str(), "dismiss");
                assert!(matches!(*effect, Effect::Delay { .. }));
            },
            other => unreachable!("expected Cancellable, got {other:?}"),
        }
    }
}
