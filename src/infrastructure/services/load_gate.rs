//! Completion gate for storage loading

use std::sync::Arc;

use tokio::sync::watch;

/// Progress of the storage loading cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    NotLoaded,
    Loading,
    Loaded,
}

#[derive(Debug, Clone, Copy, Default)]
struct Progress {
    active: usize,
    finished_once: bool,
}

impl Progress {
    fn state(&self) -> LoadState {
        match (self.active, self.finished_once) {
            (0, true) => LoadState::Loaded,
            (0, false) => LoadState::NotLoaded,
            _ => LoadState::Loading,
        }
    }
}

/// Shared, cloneable view of the loading state.
///
/// Every load pass holds a [`LoadingGuard`]; the gate reports `Loaded` only
/// once the last outstanding pass has finished.
#[derive(Debug, Clone)]
pub struct LoadGate {
    progress: Arc<watch::Sender<Progress>>,
}

impl Default for LoadGate {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadGate {
    pub fn new() -> Self {
        let (progress, _) = watch::channel(Progress::default());
        Self {
            progress: Arc::new(progress),
        }
    }

    pub fn state(&self) -> LoadState {
        self.progress.borrow().state()
    }

    pub fn is_loaded(&self) -> bool {
        self.state() == LoadState::Loaded
    }

    /// Enter `Loading` until the returned guard (and any other live guard) is dropped
    pub fn begin_loading(&self) -> LoadingGuard {
        self.progress.send_modify(|progress| progress.active += 1);
        LoadingGuard { gate: self.clone() }
    }

    /// Resolve once the state is `Loaded`
    pub async fn wait_loaded(&self) {
        let mut receiver = self.progress.subscribe();
        // The sender lives as long as self, so this cannot fail
        let _ = receiver
            .wait_for(|progress| progress.state() == LoadState::Loaded)
            .await;
    }

    fn finish_one(&self) {
        self.progress.send_modify(|progress| {
            progress.active = progress.active.saturating_sub(1);
            if progress.active == 0 {
                progress.finished_once = true;
            }
        });
    }
}

/// One outstanding load pass; dropping it (also on panic or abort) ends the pass
#[derive(Debug)]
pub struct LoadingGuard {
    gate: LoadGate,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.gate.finish_one();
    }
}
