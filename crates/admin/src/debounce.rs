//! Debounced search input.
//!
//! Keystrokes feed a background task that waits for the input to settle
//! for one full window before handing the latest keyword on. Every new
//! keystroke restarts the window, so a burst of typing produces a single
//! search for the final value.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use carecms_client::MasterGateway;

use crate::controller::PagedListController;

pub struct DebouncedSearch {
    sender: mpsc::UnboundedSender<String>,
    cancel: CancellationToken,
}

impl DebouncedSearch {
    /// Start the debounce task. `on_settle` is spawned with the settled
    /// keyword; the task stops when `parent` or [`Self::cancel`] fires.
    pub fn spawn<F, Fut>(window: Duration, parent: &CancellationToken, on_settle: F) -> Self
    where
        F: Fn(String) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (sender, mut receiver) = mpsc::unbounded_channel::<String>();
        let cancel = parent.child_token();
        let token = cancel.clone();

        tokio::spawn(async move {
            let mut pending: Option<String> = None;
            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        if let Some(keyword) = pending.take() {
                            tracing::debug!(keyword = %keyword, "Dropping unsettled search input");
                        }
                        break;
                    }
                    next = receiver.recv() => match next {
                        Some(keyword) => pending = Some(keyword),
                        None => break,
                    },
                    _ = tokio::time::sleep(window), if pending.is_some() => {
                        if let Some(keyword) = pending.take() {
                            tracing::debug!(keyword = %keyword, "Search input settled");
                            tokio::spawn(on_settle(keyword));
                        }
                    }
                }
            }
        });

        Self { sender, cancel }
    }

    /// Debounce searches for `controller`, stopping when it unmounts.
    pub fn for_controller<G>(controller: &PagedListController<G>, window: Duration) -> Self
    where
        G: MasterGateway + 'static,
    {
        let parent = controller.cancellation();
        let controller = controller.clone();
        Self::spawn(window, &parent, move |keyword| {
            let controller = controller.clone();
            async move {
                // Failures land in the controller's status.
                let _ = controller.search(keyword).await;
            }
        })
    }

    /// Feed the current contents of the search box.
    pub fn input(&self, keyword: impl Into<String>) {
        if self.cancel.is_cancelled() {
            return;
        }
        let _ = self.sender.send(keyword.into());
    }

    /// Stop the task. Input not yet settled is dropped.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for DebouncedSearch {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
