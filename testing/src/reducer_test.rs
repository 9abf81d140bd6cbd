//! Given-When-Then harness for reducers
//!
//! Reducers never touch the network, so a page's whole decision table can be
//! exercised synchronously: seed a state, apply actions, inspect the state and
//! the effect descriptions that came back.

#![allow(clippy::module_name_repetitions)] // ReducerTest is the natural name

use eventbook_core::{effect::Effect, reducer::Reducer};

type StateAssertion<S> = Box<dyn FnOnce(&S)>;
type EffectAssertion<A> = Box<dyn FnOnce(&[Effect<A>])>;

/// Fluent API for testing reducers with Given-When-Then syntax
///
/// Effect assertions see the effects returned by the last action only.
///
/// # Example
///
/// ```ignore
/// ReducerTest::new(EventsReducer::new())
///     .with_env(env)
///     .given_state(EventsState::default())
///     .when_action(EventsAction::StartCreating)
///     .then_state(|state| assert!(state.mode.is_creating()))
///     .then_effects(assertions::assert_no_effects)
///     .run();
/// ```
pub struct ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    reducer: R,
    environment: Option<E>,
    initial_state: Option<S>,
    actions: Vec<A>,
    state_assertions: Vec<StateAssertion<S>>,
    effect_assertions: Vec<EffectAssertion<A>>,
}

impl<R, S, A, E> ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    /// Create a new reducer test with the given reducer
    #[must_use]
    pub const fn new(reducer: R) -> Self {
        Self {
            reducer,
            environment: None,
            initial_state: None,
            actions: Vec::new(),
            state_assertions: Vec::new(),
            effect_assertions: Vec::new(),
        }
    }

    /// Set the environment for the test
    #[must_use]
    pub fn with_env(mut self, env: E) -> Self {
        self.environment = Some(env);
        self
    }

    /// Set the initial state (Given)
    #[must_use]
    pub fn given_state(mut self, state: S) -> Self {
        self.initial_state = Some(state);
        self
    }

    /// Queue an action (When)
    ///
    /// May be called several times; actions are reduced in order.
    #[must_use]
    pub fn when_action(mut self, action: A) -> Self {
        self.actions.push(action);
        self
    }

    /// Add an assertion about the resulting state (Then)
    #[must_use]
    pub fn then_state<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&S) + 'static,
    {
        self.state_assertions.push(Box::new(assertion));
        self
    }

    /// Add an assertion about the effects of the last action (Then)
    #[must_use]
    pub fn then_effects<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&[Effect<A>]) + 'static,
    {
        self.effect_assertions.push(Box::new(assertion));
        self
    }

    /// Run the test and execute all assertions
    ///
    /// # Panics
    ///
    /// Panics if initial state, actions, or environment are not set,
    /// or if any assertion fails.
    #[allow(clippy::panic)] // Test code can panic
    #[allow(clippy::expect_used)] // Test code can use expect
    pub fn run(self) {
        let mut state = self
            .initial_state
            .expect("Initial state must be set with given_state()");
        let env = self
            .environment
            .expect("Environment must be set with with_env()");
        assert!(
            !self.actions.is_empty(),
            "At least one action must be set with when_action()"
        );

        let mut effects = Vec::new();
        for action in self.actions {
            effects = self.reducer.reduce(&mut state, action, &env).into_vec();
        }

        for assertion in self.state_assertions {
            assertion(&state);
        }

        for assertion in self.effect_assertions {
            assertion(&effects);
        }
    }
}

/// Helper assertions for effects
pub mod assertions {
    use eventbook_core::effect::{Effect, EffectId};

    /// Assert that there are no effects
    ///
    /// # Panics
    ///
    /// Panics if any effect other than `Effect::None` is present.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_no_effects<A: std::fmt::Debug>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().all(Effect::is_none),
            "Expected no effects, but found {}: {:?}",
            effects.len(),
            effects
        );
    }

    /// Assert the number of effects
    ///
    /// # Panics
    ///
    /// Panics if the number of effects doesn't match expected.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_effects_count<A>(effects: &[Effect<A>], expected: usize) {
        assert_eq!(
            effects.len(),
            expected,
            "Expected {} effects, but found {}",
            expected,
            effects.len()
        );
    }

    /// Count `Effect::Future` values, looking inside composite effects
    #[must_use]
    pub fn count_futures<A>(effects: &[Effect<A>]) -> usize {
        effects
            .iter()
            .map(|effect| match effect {
                Effect::Future(_) => 1,
                Effect::Parallel(inner) | Effect::Sequential(inner) => count_futures(inner),
                Effect::Cancellable { effect, .. } => count_futures(std::slice::from_ref(&**effect)),
                _ => 0,
            })
            .sum()
    }

    /// Assert that effects contain at least one Future effect
    ///
    /// # Panics
    ///
    /// Panics if no Future effect is found.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_has_future_effect<A>(effects: &[Effect<A>]) {
        assert!(
            count_futures(effects) > 0,
            "Expected at least one Future effect, but none found"
        );
    }

    /// Whether an effect registered under `id` is present
    #[must_use]
    pub fn has_cancellable<A>(effects: &[Effect<A>], id: &EffectId) -> bool {
        effects.iter().any(|effect| match effect {
            Effect::Cancellable { id: found, .. } => found == id,
            Effect::Parallel(inner) | Effect::Sequential(inner) => has_cancellable(inner, id),
            _ => false,
        })
    }

    /// Whether a cancellation of `id` is present
    #[must_use]
    pub fn has_cancel<A>(effects: &[Effect<A>], id: &EffectId) -> bool {
        effects.iter().any(|effect| match effect {
            Effect::Cancel { id: found } => found == id,
            Effect::Parallel(inner) | Effect::Sequential(inner) => has_cancel(inner, id),
            _ => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventbook_core::effect::EffectId;
    use smallvec::{SmallVec, smallvec};

    #[derive(Clone, Debug)]
    struct AlertState {
        alerts: Vec<String>,
    }

    #[derive(Clone, Debug)]
    enum AlertAction {
        Raise(String),
        Watch,
    }

    struct AlertReducer;

    impl Reducer for AlertReducer {
        type State = AlertState;
        type Action = AlertAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                AlertAction::Raise(message) => {
                    state.alerts.push(message);
                    smallvec![Effect::None]
                },
                AlertAction::Watch => smallvec![
                    Effect::Future(Box::pin(async { Some(AlertAction::Raise("x".into())) }))
                        .cancellable(EffectId::new("watch"))
                ],
            }
        }
    }

    #[test]
    fn test_actions_apply_in_order() {
        ReducerTest::new(AlertReducer)
            .with_env(())
            .given_state(AlertState { alerts: vec![] })
            .when_action(AlertAction::Raise("first".into()))
            .when_action(AlertAction::Raise("second".into()))
            .then_state(|state| {
                assert_eq!(state.alerts, vec!["first", "second"]);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_nested_future_is_found() {
        ReducerTest::new(AlertReducer)
            .with_env(())
            .given_state(AlertState { alerts: vec![] })
            .when_action(AlertAction::Watch)
            .then_effects(|effects| {
                assertions::assert_has_future_effect(effects);
                assert!(assertions::has_cancellable(effects, &EffectId::new("watch")));
                assert!(!assertions::has_cancel(effects, &EffectId::new("watch")));
            })
            .run();
    }

    #[test]
    fn test_assertions_effects_count() {
        assertions::assert_effects_count(&[Effect::<AlertAction>::None], 1);
        assertions::assert_effects_count::<AlertAction>(&[], 0);
    }
}
