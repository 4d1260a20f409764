use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use loadkit_core::{
    update, Effect, Generation, ListModel, LoadError, LoaderOptions, LoaderState, LoadingState,
    Msg, ViewLifetime,
};
use loadkit_logging::{loadkit_debug, loadkit_trace, loadkit_warn};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::loader::{LoadRequest, Loader};
use crate::observable::{Observable, Signal, Subscription};
use crate::EngineError;

enum LoaderCommand<I> {
    Refresh(Option<I>),
    Lifetime(ViewLifetime),
}

type Completion<O> = (Generation, Result<O, LoadError>);

/// Cloneable, push-only entry point for refresh requests.
pub struct Requester<I> {
    cmd_tx: mpsc::UnboundedSender<LoaderCommand<I>>,
}

impl<I> Requester<I> {
    pub fn refresh(&self, input: Option<I>) -> Result<(), EngineError> {
        self.send(LoaderCommand::Refresh(input))
    }

    pub fn lifetime(&self, event: ViewLifetime) -> Result<(), EngineError> {
        self.send(LoaderCommand::Lifetime(event))
    }

    fn send(&self, command: LoaderCommand<I>) -> Result<(), EngineError> {
        self.cmd_tx
            .send(command)
            .map_err(|_| EngineError::LoaderClosed)
    }
}

impl<I> Clone for Requester<I> {
    fn clone(&self) -> Self {
        Self {
            cmd_tx: self.cmd_tx.clone(),
        }
    }
}

struct Outputs<O> {
    state: Observable<LoadingState<O>>,
    is_loading: Observable<bool>,
    loaded: Observable<Option<O>>,
    contents: Signal<O>,
    errors: Signal<LoadError>,
}

impl<O: Clone> Clone for Outputs<O> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            is_loading: self.is_loading.clone(),
            loaded: self.loaded.clone(),
            contents: self.contents.clone(),
            errors: self.errors.clone(),
        }
    }
}

/// Turns refresh requests into a stream of [`LoadingState`]s using an
/// injected [`Loader`].
///
/// Requests and loader completions are handled one at a time by a driver
/// task; only the winning request's load changes the state. The driver
/// stops, aborting outstanding loads, when this handle is dropped.
pub struct ContentLoader<I, O> {
    requester: Requester<I>,
    outputs: Outputs<O>,
    shutdown: CancellationToken,
}

impl<I, O> ContentLoader<I, O>
where
    I: Clone + Send + 'static,
    O: Clone + Send + 'static,
{
    /// Spawns the driver on the current Tokio runtime.
    pub fn new<L>(loader: L, options: LoaderOptions) -> Self
    where
        L: Loader<I, O> + 'static,
    {
        Self::spawn(LoaderState::new(options), loader)
    }

    /// Like [`ContentLoader::new`], but an output with no items is reported
    /// as `Empty`.
    pub fn for_list<L>(loader: L, options: LoaderOptions) -> Self
    where
        L: Loader<I, O> + 'static,
        O: ListModel,
    {
        Self::spawn(LoaderState::for_list(options), loader)
    }

    pub fn spawn<L>(machine: LoaderState<I, O>, loader: L) -> Self
    where
        L: Loader<I, O> + 'static,
    {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (done_tx, done_rx) = mpsc::unbounded_channel();
        let outputs = Outputs {
            state: Observable::new(machine.state().clone()),
            is_loading: Observable::new(machine.is_loading()),
            loaded: Observable::new(machine.loaded().cloned()),
            contents: Signal::new(),
            errors: Signal::new(),
        };
        let shutdown = CancellationToken::new();

        let driver = Driver {
            machine,
            loader: Arc::new(loader),
            outputs: outputs.clone(),
            tasks: HashMap::new(),
            done_tx,
        };
        tokio::spawn(driver.run(cmd_rx, done_rx, shutdown.clone()));

        Self {
            requester: Requester { cmd_tx },
            outputs,
            shutdown,
        }
    }
}

impl<I, O: Clone> ContentLoader<I, O> {
    pub fn refresh(&self, input: Option<I>) -> Result<(), EngineError> {
        self.requester.refresh(input)
    }

    pub fn lifetime(&self, event: ViewLifetime) -> Result<(), EngineError> {
        self.requester.lifetime(event)
    }

    /// A handle other producers can issue requests through.
    pub fn requester(&self) -> Requester<I> {
        self.requester.clone()
    }

    /// Forwards lifecycle events from `events` until either side goes away.
    pub fn bind_lifetime(&self, mut events: Subscription<ViewLifetime>) -> JoinHandle<()>
    where
        I: Send + 'static,
    {
        let requester = self.requester.clone();
        let shutdown = self.shutdown.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    event = events.recv() => match event {
                        Some(event) => {
                            if requester.lifetime(event).is_err() {
                                break;
                            }
                        }
                        None => break,
                    },
                }
            }
        })
    }

    pub fn state(&self) -> LoadingState<O> {
        self.outputs.state.get()
    }

    /// State updates, starting with the current state.
    pub fn subscribe(&self) -> Subscription<LoadingState<O>> {
        self.outputs.state.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.outputs.is_loading.get()
    }

    /// Loading flag updates, starting with the current value.
    pub fn subscribe_loading(&self) -> Subscription<bool> {
        self.outputs.is_loading.subscribe()
    }

    /// Output of the last successful load.
    pub fn loaded(&self) -> Option<O> {
        self.outputs.loaded.get()
    }

    /// Every successful output from now on, empty ones included.
    pub fn contents(&self) -> Subscription<O> {
        self.outputs.contents.subscribe()
    }

    /// Every load failure from now on.
    pub fn errors(&self) -> Subscription<LoadError> {
        self.outputs.errors.subscribe()
    }

    /// Stops the driver. Later requests fail with
    /// [`EngineError::LoaderClosed`] once it has exited.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

impl<I, O> Drop for ContentLoader<I, O> {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Log line for a failed load, naming its cause.
fn failure_line(err: &LoadError) -> String {
    format!("load failed: {}", err.cause())
}

struct Driver<I, O> {
    machine: LoaderState<I, O>,
    loader: Arc<dyn Loader<I, O>>,
    outputs: Outputs<O>,
    tasks: HashMap<Generation, JoinHandle<()>>,
    done_tx: mpsc::UnboundedSender<Completion<O>>,
}

impl<I, O> Driver<I, O>
where
    I: Clone + Send + 'static,
    O: Clone + Send + 'static,
{
    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<LoaderCommand<I>>,
        mut completions: mpsc::UnboundedReceiver<Completion<O>>,
        shutdown: CancellationToken,
    ) {
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                command = commands.recv() => match command {
                    Some(LoaderCommand::Refresh(input)) => self.dispatch(Msg::Refresh(input)),
                    Some(LoaderCommand::Lifetime(event)) => self.dispatch(Msg::Lifetime(event)),
                    None => break,
                },
                Some((generation, result)) = completions.recv() => {
                    self.tasks.remove(&generation);
                    self.dispatch(Msg::LoadFinished { generation, result });
                }
            }
        }

        for (_, task) in self.tasks.drain() {
            task.abort();
        }
        loadkit_debug!(
            "content loader stopped after {} request(s)",
            self.machine.generation()
        );
    }

    fn dispatch(&mut self, msg: Msg<I, O>) {
        let placeholder = LoaderState::new(self.machine.options());
        let machine = std::mem::replace(&mut self.machine, placeholder);
        let (machine, effects) = update(machine, msg);
        self.machine = machine;

        for effect in effects {
            self.apply(effect);
        }
    }

    fn apply(&mut self, effect: Effect<I, O>) {
        match effect {
            Effect::StartLoad {
                generation,
                input,
                loaded,
            } => self.start(LoadRequest {
                generation,
                input,
                loaded,
            }),
            Effect::CancelLoad { generation } => {
                if let Some(task) = self.tasks.remove(&generation) {
                    task.abort();
                }
                loadkit_debug!("generation {} superseded", generation);
            }
            Effect::StateChanged(state) => {
                if let LoadingState::Error(err) = &state {
                    loadkit_warn!("{}", failure_line(err));
                    self.outputs.errors.publish(err.clone());
                }
                self.outputs.state.set(state);
            }
            Effect::LoadingChanged(is_loading) => self.outputs.is_loading.set(is_loading),
            Effect::ContentLoaded(output) => {
                self.outputs.loaded.set(Some(output.clone()));
                self.outputs.contents.publish(output);
            }
            Effect::Discarded { generation } => {
                loadkit_trace!("dropping result of stale generation {}", generation);
            }
        }
    }

    fn start(&mut self, request: LoadRequest<I, O>) {
        let generation = request.generation;
        loadkit_debug!("starting load for generation {}", generation);
        let loader = Arc::clone(&self.loader);
        let done_tx = self.done_tx.clone();

        let task = tokio::spawn(async move {
            let result = AssertUnwindSafe(loader.load(request))
                .catch_unwind()
                .await
                .unwrap_or_else(|_| Err(LoadError::msg("loader panicked")));
            let _ = done_tx.send((generation, result));
        });
        self.tasks.insert(generation, task);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_line_names_the_failure_once() {
        let line = failure_line(&LoadError::msg("loader panicked"));
        assert_eq!(line, "load failed: loader panicked");
    }
}
