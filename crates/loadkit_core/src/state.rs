use std::collections::VecDeque;
use std::fmt;

use crate::{list_is_empty, Effect, ListModel, LoadError, LoadingState, ViewLifetime};

/// Monotonically increasing id of a load request.
pub type Generation = u64;

/// Decides whether a successful output is reported as `Empty`.
pub type EmptyCheck<O> = fn(&O) -> bool;

/// How a request that arrives while a load is outstanding is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FlattenStrategy {
    /// The new request supersedes the outstanding one, whose result is
    /// dropped.
    #[default]
    Latest,
    /// Requests queue up and load one after the other, in order.
    Concat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderOptions {
    /// Lifecycle event that issues a refresh with no input. `None` disables
    /// the automatic refresh.
    pub trigger: Option<ViewLifetime>,
    pub strategy: FlattenStrategy,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            trigger: Some(ViewLifetime::WillAppear),
            strategy: FlattenStrategy::Latest,
        }
    }
}

impl LoaderOptions {
    /// Options without an automatic refresh trigger.
    pub fn manual() -> Self {
        Self {
            trigger: None,
            ..Self::default()
        }
    }

    pub fn with_trigger(mut self, trigger: Option<ViewLifetime>) -> Self {
        self.trigger = trigger;
        self
    }

    pub fn with_strategy(mut self, strategy: FlattenStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

fn never_empty<O>(_: &O) -> bool {
    false
}

/// State of one loader, advanced only by [`update`](crate::update).
#[derive(Clone)]
pub struct LoaderState<I, O> {
    options: LoaderOptions,
    empty_check: EmptyCheck<O>,
    state: LoadingState<O>,
    loaded: Option<O>,
    is_loading: bool,
    generation: Generation,
    in_flight: Option<Generation>,
    queued: VecDeque<Option<I>>,
}

impl<I, O> LoaderState<I, O> {
    pub fn new(options: LoaderOptions) -> Self {
        Self {
            options,
            empty_check: never_empty::<O>,
            state: LoadingState::Unloaded,
            loaded: None,
            is_loading: false,
            generation: 0,
            in_flight: None,
            queued: VecDeque::new(),
        }
    }

    pub fn with_empty_check(mut self, empty_check: EmptyCheck<O>) -> Self {
        self.empty_check = empty_check;
        self
    }

    pub fn options(&self) -> LoaderOptions {
        self.options
    }

    pub fn state(&self) -> &LoadingState<O> {
        &self.state
    }

    /// Output of the last successful load, kept across later failures.
    pub fn loaded(&self) -> Option<&O> {
        self.loaded.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Generation of the most recently started load.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn in_flight(&self) -> Option<Generation> {
        self.in_flight
    }

    pub fn queued_len(&self) -> usize {
        self.queued.len()
    }
}

impl<I, O: ListModel> LoaderState<I, O> {
    /// Loader whose output is reported `Empty` when the list has no items.
    pub fn for_list(options: LoaderOptions) -> Self {
        Self::new(options).with_empty_check(list_is_empty::<O>)
    }
}

impl<I: Clone, O: Clone> LoaderState<I, O> {
    pub(crate) fn request(&mut self, input: Option<I>, effects: &mut Vec<Effect<I, O>>) {
        if let Some(outstanding) = self.in_flight {
            match self.options.strategy {
                FlattenStrategy::Latest => {
                    effects.push(Effect::CancelLoad {
                        generation: outstanding,
                    });
                }
                FlattenStrategy::Concat => {
                    self.queued.push_back(input);
                    return;
                }
            }
        }
        self.start(input, effects);
    }

    pub(crate) fn finish(
        &mut self,
        generation: Generation,
        result: Result<O, LoadError>,
        effects: &mut Vec<Effect<I, O>>,
    ) {
        if self.in_flight != Some(generation) {
            effects.push(Effect::Discarded { generation });
            return;
        }
        self.in_flight = None;

        let terminal = match result {
            Ok(output) => {
                self.loaded = Some(output.clone());
                effects.push(Effect::ContentLoaded(output.clone()));
                if (self.empty_check)(&output) {
                    LoadingState::Empty
                } else {
                    LoadingState::Success(output)
                }
            }
            Err(err) => LoadingState::Error(err),
        };
        self.set_state(terminal, effects);

        match self.queued.pop_front() {
            Some(input) => self.start(input, effects),
            None => self.set_loading(false, effects),
        }
    }

    fn start(&mut self, input: Option<I>, effects: &mut Vec<Effect<I, O>>) {
        self.generation += 1;
        let generation = self.generation;
        self.in_flight = Some(generation);
        self.set_loading(true, effects);
        self.set_state(LoadingState::Loading, effects);
        effects.push(Effect::StartLoad {
            generation,
            input,
            loaded: self.loaded.clone(),
        });
    }

    fn set_state(&mut self, state: LoadingState<O>, effects: &mut Vec<Effect<I, O>>) {
        // A superseding request keeps the state at Loading without a repeat.
        if self.state.is_loading() && state.is_loading() {
            return;
        }
        self.state = state.clone();
        effects.push(Effect::StateChanged(state));
    }

    fn set_loading(&mut self, is_loading: bool, effects: &mut Vec<Effect<I, O>>) {
        if self.is_loading != is_loading {
            self.is_loading = is_loading;
            effects.push(Effect::LoadingChanged(is_loading));
        }
    }
}

impl<I: fmt::Debug, O: fmt::Debug> fmt::Debug for LoaderState<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoaderState")
            .field("options", &self.options)
            .field("state", &self.state)
            .field("loaded", &self.loaded)
            .field("is_loading", &self.is_loading)
            .field("generation", &self.generation)
            .field("in_flight", &self.in_flight)
            .field("queued", &self.queued)
            .finish_non_exhaustive()
    }
}
