//! Runtime counterpart of the generated state manager.
//!
//! A non-validating state machine: any state may switch to any other.
//! The owner drives it by calling [`StateManager::tick`] once per scheduler
//! step; entering a state resets the elapsed time and runs its `enter` hook.

use std::time::Duration;

/// A single state driven by a [`StateManager`].
pub trait State<K> {
    /// Called once when the manager switches to this state.
    fn enter(&mut self, ctx: &mut Context<K>);

    /// Called once per tick while this state is active.
    fn update(&mut self, ctx: &mut Context<K>);
}

/// Key poll consumed by [`StateManager::tick`].
pub trait KeyPoll<K> {
    fn key_down(&self, key: &K) -> bool;
}

/// Keys pressed during this tick.
impl<K: PartialEq> KeyPoll<K> for [K] {
    fn key_down(&self, key: &K) -> bool {
        self.contains(key)
    }
}

/// Manager data visible to states.
pub struct Context<K> {
    elapsed: Duration,
    activation_key: K,
    activated: bool,
    pending: Option<Box<dyn State<K>>>,
}

impl<K> Context<K> {
    /// Time since the active state was entered.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn set_elapsed(&mut self, elapsed: Duration) {
        self.elapsed = elapsed;
    }

    pub fn activation_key(&self) -> &K {
        &self.activation_key
    }

    pub fn is_activated(&self) -> bool {
        self.activated
    }

    /// Switch to `state` once the current hook returns.
    ///
    /// A later request in the same hook replaces an earlier one.
    pub fn set_state<S: State<K> + 'static>(&mut self, state: S) {
        self.pending = Some(Box::new(state));
    }

    /// End the effect started by the activation key.
    pub fn end_effect(&mut self) {
        self.activated = false;
    }
}

pub struct StateManager<K> {
    ctx: Context<K>,
    current: Option<Box<dyn State<K>>>,
}

impl<K: 'static> StateManager<K> {
    pub fn new(activation_key: K) -> Self {
        Self {
            ctx: Context {
                elapsed: Duration::ZERO,
                activation_key,
                activated: false,
                pending: None,
            },
            current: None,
        }
    }

    /// Make `state` current, reset elapsed time and run its `enter` hook.
    pub fn set_state<S: State<K> + 'static>(&mut self, state: S) {
        self.enter(Box::new(state));
    }

    /// Advance one scheduler step.
    ///
    /// Adds `delta` to the elapsed time, starts the effect if the activation
    /// key is down and the effect is not already running, then updates the
    /// active state. A switch requested during `update` takes effect before
    /// this call returns.
    pub fn tick<P: KeyPoll<K> + ?Sized>(&mut self, delta: Duration, keys: &P) {
        self.ctx.elapsed += delta;
        if !self.ctx.activated && keys.key_down(&self.ctx.activation_key) {
            self.start_effect();
        }
        if let Some(state) = self.current.as_mut() {
            state.update(&mut self.ctx);
        }
        self.apply_pending();
    }

    pub fn start_effect(&mut self) {
        self.ctx.activated = true;
    }

    pub fn end_effect(&mut self) {
        self.ctx.end_effect();
    }

    pub fn has_state(&self) -> bool {
        self.current.is_some()
    }

    pub fn context(&self) -> &Context<K> {
        &self.ctx
    }

    pub fn elapsed(&self) -> Duration {
        self.ctx.elapsed
    }

    pub fn is_activated(&self) -> bool {
        self.ctx.activated
    }

    fn enter(&mut self, state: Box<dyn State<K>>) {
        self.ctx.pending = None;
        self.ctx.elapsed = Duration::ZERO;
        let state = self.current.insert(state);
        state.enter(&mut self.ctx);
        self.apply_pending();
    }

    fn apply_pending(&mut self) {
        // `enter` may itself request a switch; follow the chain.
        while let Some(next) = self.ctx.pending.take() {
            self.ctx.elapsed = Duration::ZERO;
            let state = self.current.insert(next);
            state.enter(&mut self.ctx);
        }
    }
}
