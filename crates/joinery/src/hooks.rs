use crate::SyncOptions;

use std::sync::Arc;

pub(crate) type SyncHook = Arc<dyn Fn(&SyncOptions) + Send + Sync>;

/// Callbacks registered on a session, run in registration order.
#[derive(Default)]
pub(crate) struct Hooks {
    pub(crate) before_bulk_sync: Vec<SyncHook>,
    pub(crate) after_bulk_sync: Vec<SyncHook>,
}

pub(crate) fn run(hooks: &[SyncHook], options: &SyncOptions) {
    for hook in hooks {
        hook(options);
    }
}
