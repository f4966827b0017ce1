//! Paged List Controller.
//!
//! One controller per mounted screen. It owns the screen's page state,
//! turns page, page-size and keyword changes into list queries, and
//! makes sure only the most recently issued query may commit. Handles
//! are cheap to clone and share the same state, so a debounce task and
//! the screen can drive the same controller.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;
use tokio_util::sync::CancellationToken;

use carecms_client::{ClientError, MasterGateway};
use carecms_core::mutation::MutationCommand;
use carecms_core::paging::{row_serial, total_pages, DEFAULT_PAGE_SIZE};
use carecms_core::patch::{append_unique, is_patch_safe, patch_row};
use carecms_core::query::{Pagination, QueryDescriptor};
use carecms_core::types::{flag_value, record_id, Record, RecordId, IS_ACTIVE_FIELD};

use crate::notify::{Notification, NotificationBus};
use crate::screens::{ListMode, ScreenSpec};

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListStatus {
    Idle,
    Loading,
    Loaded,
    /// Last load failed; the screen offers a retry. Holds the text to show.
    Error(String),
}

/// Snapshot of one screen's list state.
#[derive(Debug, Clone, PartialEq)]
pub struct PageState {
    pub status: ListStatus,
    pub current_page: u32,
    pub page_size: u32,
    pub keyword: String,
    pub rows: Vec<Record>,
    /// Total matching rows across all pages, as computed by the server.
    pub total_count: u64,
}

impl PageState {
    fn new(page_size: u32) -> Self {
        Self {
            status: ListStatus::Idle,
            current_page: 1,
            page_size: page_size.max(1),
            keyword: String::new(),
            rows: Vec::new(),
            total_count: 0,
        }
    }

    pub fn total_pages(&self) -> u32 {
        total_pages(self.total_count, self.page_size)
    }

    /// "Sr No." of the row at `index` on the current page.
    pub fn serial(&self, index: usize) -> u64 {
        row_serial(index, self.current_page, self.page_size)
    }

    /// Infinite-scroll screens can fetch another page.
    pub fn has_more(&self) -> bool {
        self.current_page < self.total_pages()
    }
}

/// What happened to a load once its response arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Committed,
    /// A newer load was issued meanwhile; the response was dropped.
    Stale,
    /// The screen was unmounted; nothing was applied.
    Cancelled,
}

/// How the cache was brought up to date after a row mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowUpdate {
    Patched,
    Inserted,
    /// The change could move rows between pages, so the page was reloaded.
    Requeried(LoadOutcome),
    /// A toggle for the same row is still in flight.
    Busy,
    Cancelled,
}

/// How a committed page merges into the cached rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Merge {
    Replace,
    /// Fetch the page after `current_page` and append it.
    Append,
}

struct Shared {
    page: PageState,
    /// Bumped on every load; a response commits only if it still matches.
    generation: u64,
    toggling: HashSet<RecordId>,
    /// A `load_more` is in flight.
    appending: bool,
}

/// Clears `Shared::appending` when the append settles or is dropped.
struct AppendInFlight<'a>(&'a Mutex<Shared>);

impl Drop for AppendInFlight<'_> {
    fn drop(&mut self) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .appending = false;
    }
}

struct Inner<G> {
    gateway: G,
    screen: &'static ScreenSpec,
    filter: Record,
    notifications: Option<NotificationBus>,
    shared: Mutex<Shared>,
    cancel: CancellationToken,
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

pub struct ControllerBuilder<G> {
    gateway: G,
    screen: &'static ScreenSpec,
    page_size: u32,
    filter: Record,
    notifications: Option<NotificationBus>,
}

impl<G: MasterGateway> ControllerBuilder<G> {
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Restrict every query to rows where `field` equals `value`.
    pub fn filter(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter.insert(field.into(), value.into());
        self
    }

    /// Publish toggle results to `bus`.
    pub fn notifications(mut self, bus: NotificationBus) -> Self {
        self.notifications = Some(bus);
        self
    }

    pub fn build(self) -> PagedListController<G> {
        PagedListController {
            inner: Arc::new(Inner {
                gateway: self.gateway,
                screen: self.screen,
                filter: self.filter,
                notifications: self.notifications,
                shared: Mutex::new(Shared {
                    page: PageState::new(self.page_size),
                    generation: 0,
                    toggling: HashSet::new(),
                    appending: false,
                }),
                cancel: CancellationToken::new(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

pub struct PagedListController<G> {
    inner: Arc<Inner<G>>,
}

impl<G> Clone for PagedListController<G> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<G: MasterGateway> PagedListController<G> {
    pub fn builder(gateway: G, screen: &'static ScreenSpec) -> ControllerBuilder<G> {
        ControllerBuilder {
            gateway,
            screen,
            page_size: DEFAULT_PAGE_SIZE,
            filter: Record::new(),
            notifications: None,
        }
    }

    pub fn new(gateway: G, screen: &'static ScreenSpec) -> Self {
        Self::builder(gateway, screen).build()
    }

    pub fn screen(&self) -> &'static ScreenSpec {
        self.inner.screen
    }

    pub fn gateway(&self) -> &G {
        &self.inner.gateway
    }

    pub fn snapshot(&self) -> PageState {
        self.lock().page.clone()
    }

    /// Token cancelled when the screen unmounts.
    pub fn cancellation(&self) -> CancellationToken {
        self.inner.cancel.clone()
    }

    pub fn is_unmounted(&self) -> bool {
        self.inner.cancel.is_cancelled()
    }

    /// Tear the screen down. Pending debounce timers stop, and any load
    /// or mutation still in flight settles without touching state.
    pub fn unmount(&self) {
        tracing::debug!(model_name = self.inner.screen.model_name, "Unmounting list screen");
        self.inner.cancel.cancel();
    }

    /// First load after the screen appears.
    pub async fn mount(&self) -> Result<LoadOutcome, ClientError> {
        tracing::info!(model_name = self.inner.screen.model_name, "Mounting list screen");
        self.load(|_| {}).await
    }

    /// Reload, e.g. from the retry affordance. Infinite-scroll screens
    /// restart from page 1.
    pub async fn refresh(&self) -> Result<LoadOutcome, ClientError> {
        let append = self.inner.screen.mode == ListMode::Append;
        self.load(move |page| {
            if append {
                page.current_page = 1;
            }
        })
        .await
    }

    pub async fn set_page(&self, page: u32) -> Result<LoadOutcome, ClientError> {
        self.load(move |state| state.current_page = page.max(1)).await
    }

    /// Change the page size. Always returns to page 1.
    pub async fn set_page_size(&self, page_size: u32) -> Result<LoadOutcome, ClientError> {
        self.load(move |state| {
            state.page_size = page_size.max(1);
            state.current_page = 1;
        })
        .await
    }

    /// Apply a settled search keyword. Always returns to page 1.
    ///
    /// Keystrokes should go through [`crate::debounce::DebouncedSearch`]
    /// rather than calling this directly.
    pub async fn search(&self, keyword: impl Into<String>) -> Result<LoadOutcome, ClientError> {
        let keyword = keyword.into();
        self.load(move |state| {
            state.keyword = keyword;
            state.current_page = 1;
        })
        .await
    }

    /// Fetch the next page of an infinite-scroll screen and append it.
    ///
    /// `current_page` only advances once the page commits, so a failed or
    /// stale append is fetched again by the next call. Returns `None` when
    /// everything is loaded or another append is still in flight.
    pub async fn load_more(&self) -> Option<Result<LoadOutcome, ClientError>> {
        {
            let mut shared = self.lock();
            if shared.appending || !shared.page.has_more() {
                return None;
            }
            shared.appending = true;
        }
        let _in_flight = AppendInFlight(&self.inner.shared);
        Some(self.fetch(|_| {}, Merge::Append).await)
    }

    /// Flip a row's active flag and reflect the result in the cache.
    pub async fn toggle(&self, id: RecordId, active: bool) -> Result<RowUpdate, ClientError> {
        if self.is_unmounted() {
            return Ok(RowUpdate::Cancelled);
        }
        if !self.lock().toggling.insert(id.clone()) {
            return Ok(RowUpdate::Busy);
        }

        let command = MutationCommand::toggle(self.inner.screen.model_name, id.clone(), active);
        let result = self.inner.gateway.upsert(&command).await;
        self.lock().toggling.remove(&id);

        if self.is_unmounted() {
            return Ok(RowUpdate::Cancelled);
        }
        let saved = match result {
            Ok(saved) => saved,
            Err(e) => {
                tracing::warn!(
                    model_name = self.inner.screen.model_name,
                    id = %id,
                    error = %e,
                    "Toggle failed",
                );
                self.notify(Notification::error(e.user_message()));
                return Err(e);
            }
        };

        let mut fields = Record::new();
        let confirmed = saved
            .get(IS_ACTIVE_FIELD)
            .cloned()
            .unwrap_or_else(|| flag_value(active));
        fields.insert(IS_ACTIVE_FIELD.to_string(), confirmed);

        let update = self.patch_or_requery(&id, &fields, &fields).await?;
        self.notify(Notification::success("Status Updated Successfully"));
        Ok(update)
    }

    /// Bring the cache up to date after a form saved `saved` via `command`.
    ///
    /// New records are appended locally while the page has room and no
    /// search is active; edits are patched in place unless they touch a
    /// searched or filtered field. Anything else reloads the page.
    pub async fn apply_saved(
        &self,
        command: &MutationCommand,
        saved: Record,
    ) -> Result<RowUpdate, ClientError> {
        if self.is_unmounted() {
            return Ok(RowUpdate::Cancelled);
        }

        match &command.id {
            Some(id) => self.patch_or_requery(id, &command.input_data, &saved).await,
            None => {
                {
                    let mut shared = self.lock();
                    let page = &mut shared.page;
                    let room = page.rows.len() < page.page_size as usize;
                    if room && page.keyword.is_empty() && record_id(&saved).is_some() {
                        page.rows.push(saved);
                        page.total_count += 1;
                        return Ok(RowUpdate::Inserted);
                    }
                }
                Ok(RowUpdate::Requeried(self.refresh().await?))
            }
        }
    }

    // ---- private helpers ----

    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.inner
            .shared
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, notification: Notification) {
        if let Some(bus) = &self.inner.notifications {
            bus.publish(notification);
        }
    }

    /// Patch `id` with `fields` when `changed` leaves every searched and
    /// filtered field alone, otherwise reload the page.
    async fn patch_or_requery(
        &self,
        id: &RecordId,
        changed: &Record,
        fields: &Record,
    ) -> Result<RowUpdate, ClientError> {
        let screen = self.inner.screen;
        let safe = is_patch_safe(
            changed,
            screen.search_fields.iter().copied(),
            self.inner.filter.keys().map(String::as_str),
        );
        if safe {
            let mut shared = self.lock();
            shared.page.rows = patch_row(&shared.page.rows, id, fields);
            return Ok(RowUpdate::Patched);
        }
        tracing::debug!(
            model_name = screen.model_name,
            id = %id,
            "Change touches searched or filtered fields, reloading page",
        );
        Ok(RowUpdate::Requeried(self.refresh().await?))
    }

    async fn load(
        &self,
        change: impl FnOnce(&mut PageState),
    ) -> Result<LoadOutcome, ClientError> {
        self.fetch(change, Merge::Replace).await
    }

    /// Apply `change` to the page state, issue the resulting query, and
    /// commit the response if nothing newer has been issued since.
    async fn fetch(
        &self,
        change: impl FnOnce(&mut PageState),
        merge: Merge,
    ) -> Result<LoadOutcome, ClientError> {
        if self.is_unmounted() {
            return Ok(LoadOutcome::Cancelled);
        }

        let (generation, page_number, query) = {
            let mut shared = self.lock();
            change(&mut shared.page);
            shared.generation += 1;
            shared.page.status = ListStatus::Loading;
            let page_number = match merge {
                Merge::Replace => shared.page.current_page,
                Merge::Append => shared.page.current_page + 1,
            };
            let query = self.build_query(&shared.page, page_number);
            (shared.generation, page_number, query)
        };

        tracing::debug!(
            model_name = %query.model_name,
            request_id = generation,
            page = page_number,
            keyword = query.keyword(),
            "Loading list page",
        );

        let result = tokio::select! {
            _ = self.inner.cancel.cancelled() => return Ok(LoadOutcome::Cancelled),
            result = self.inner.gateway.list(&query) => result,
        };

        let mut shared = self.lock();
        if self.is_unmounted() {
            return Ok(LoadOutcome::Cancelled);
        }
        if shared.generation != generation {
            tracing::debug!(
                model_name = %query.model_name,
                request_id = generation,
                current = shared.generation,
                "Discarding stale list response",
            );
            return Ok(LoadOutcome::Stale);
        }

        match result {
            Ok(list) => {
                let page = &mut shared.page;
                page.rows = match merge {
                    Merge::Replace => list.rows,
                    Merge::Append => append_unique(&page.rows, list.rows),
                };
                page.current_page = page_number;
                page.total_count = list.count;
                page.status = ListStatus::Loaded;
                tracing::debug!(
                    model_name = %query.model_name,
                    request_id = generation,
                    rows = page.rows.len(),
                    total = page.total_count,
                    "List page committed",
                );
                Ok(LoadOutcome::Committed)
            }
            Err(e) => {
                tracing::warn!(
                    model_name = %query.model_name,
                    request_id = generation,
                    error = %e,
                    "List query failed",
                );
                shared.page.status = ListStatus::Error(e.user_message().to_string());
                Err(e)
            }
        }
    }

    fn build_query(&self, page: &PageState, page_number: u32) -> QueryDescriptor {
        let pagination = Pagination::clamped(page_number, page.page_size);
        self.inner
            .screen
            .query(pagination, &page.keyword, &self.inner.filter)
    }
}
