use loadkit_core::ViewLifetime;

use crate::observable::{Observable, Subscription};

/// Broadcasts the lifecycle of one view to any number of listeners.
///
/// Starts at [`ViewLifetime::Init`]; new listeners receive the latest event
/// first.
#[derive(Debug, Clone)]
pub struct ViewLifecycle {
    current: Observable<ViewLifetime>,
}

impl ViewLifecycle {
    pub fn new() -> Self {
        Self {
            current: Observable::new(ViewLifetime::Init),
        }
    }

    pub fn emit(&self, event: ViewLifetime) {
        self.current.set(event);
    }

    pub fn current(&self) -> ViewLifetime {
        self.current.get()
    }

    pub fn subscribe(&self) -> Subscription<ViewLifetime> {
        self.current.subscribe()
    }

    /// Emits `DidLoad` followed by `WillAppear` and `DidAppear`.
    pub fn appear(&self) {
        for event in [
            ViewLifetime::DidLoad,
            ViewLifetime::WillAppear,
            ViewLifetime::DidAppear,
        ] {
            self.emit(event);
        }
    }

    /// Emits `WillDisappear` followed by `DidDisappear`.
    pub fn disappear(&self) {
        self.emit(ViewLifetime::WillDisappear);
        self.emit(ViewLifetime::DidDisappear);
    }
}

impl Default for ViewLifecycle {
    fn default() -> Self {
        Self::new()
    }
}
