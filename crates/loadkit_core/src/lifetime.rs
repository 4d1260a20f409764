/// View lifecycle events a loader can be triggered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewLifetime {
    /// The view was created.
    #[default]
    Init,
    DidLoad,
    /// The view is about to become visible. Default refresh trigger.
    WillAppear,
    DidAppear,
    WillDisappear,
    DidDisappear,
}

impl ViewLifetime {
    pub const ALL: [ViewLifetime; 6] = [
        ViewLifetime::Init,
        ViewLifetime::DidLoad,
        ViewLifetime::WillAppear,
        ViewLifetime::DidAppear,
        ViewLifetime::WillDisappear,
        ViewLifetime::DidDisappear,
    ];
}
