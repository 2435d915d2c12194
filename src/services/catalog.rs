//! Catalog controller: pagination and search state over a [`CatalogClient`].
//!
//! Each request gets a monotonically increasing token when it is issued. A
//! response is applied only if its token is newer than the last applied one,
//! so a slow response can never overwrite a newer page. `reset` raises the
//! watermark past every outstanding token, discarding them all.
//!
//! While a search is in flight, browse requests (`load_top`, `next_page`,
//! `previous_page`) are rejected without touching state.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::Stream;
use serde::Serialize;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use crate::clients::{CatalogClient, CatalogError};
use crate::domain::events::{CatalogEvent, RejectReason};
use crate::domain::{AnimeId, BrowseMode};
use crate::models::catalog::{CatalogItem, PageResult, QueryContext, ResultSet};
use crate::services::watch_stream;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Idle,
    LoadingBrowse,
    LoadingSearch,
}

/// Snapshot of the controller's pagination state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControllerState {
    /// Page of the query currently shown (>= 1).
    pub page: u32,
    /// Last page reported by the most recent applied response (>= 1).
    pub last_page: u32,
    /// Active search term; `None` while browsing.
    pub search_term: Option<String>,
    pub search_in_flight: bool,
    pub phase: Phase,
}

/// What happened to a single controller operation.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// The response replaced (or extended) the result set.
    Applied { page: u32 },
    /// Nothing was requested.
    Rejected(RejectReason),
    /// The response arrived after a newer one and was dropped.
    Stale,
    /// The request failed; the previous result set is still shown.
    Failed(CatalogError),
}

impl LoadOutcome {
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

#[derive(Debug, Clone)]
struct Ticket {
    token: u64,
    context: QueryContext,
    page: u32,
}

struct Machine {
    page: u32,
    last_page: u32,
    search_term: Option<String>,
    /// Token of the newest search still awaiting a response.
    search_in_flight: Option<u64>,
    /// Outstanding requests by token.
    pending: BTreeMap<u64, (QueryContext, u32)>,
    last_token: u64,
    /// Responses with a token at or below this are stale.
    watermark: u64,
}

impl Machine {
    const fn new() -> Self {
        Self {
            page: 1,
            last_page: 1,
            search_term: None,
            search_in_flight: None,
            pending: BTreeMap::new(),
            last_token: 0,
            watermark: 0,
        }
    }

    fn context(&self) -> QueryContext {
        self.search_term
            .clone()
            .map_or(QueryContext::Top, QueryContext::Search)
    }

    /// Page the next relative move starts from: the target of the newest
    /// outstanding request for the active query, else the page shown.
    fn cursor(&self) -> u32 {
        let context = self.context();
        self.pending
            .values()
            .next_back()
            .filter(|(pending, _)| *pending == context)
            .map_or(self.page, |(_, page)| *page)
    }

    fn issue(&mut self, context: QueryContext, page: u32) -> Ticket {
        self.last_token += 1;
        let token = self.last_token;
        if context.is_search() {
            self.search_in_flight = Some(token);
        }
        self.pending.insert(token, (context.clone(), page));
        Ticket {
            token,
            context,
            page,
        }
    }

    /// Token of the newest search still awaiting a response, if any.
    fn newest_pending_search(&self) -> Option<u64> {
        self.pending
            .iter()
            .rev()
            .find(|(_, (context, _))| context.is_search())
            .map(|(token, _)| *token)
    }

    fn loading_active_query(&self) -> bool {
        let context = self.context();
        self.pending.values().any(|(pending, _)| *pending == context)
    }

    fn phase(&self) -> Phase {
        if self.search_in_flight.is_some() {
            Phase::LoadingSearch
        } else if self.pending.is_empty() {
            Phase::Idle
        } else {
            Phase::LoadingBrowse
        }
    }

    fn snapshot(&self) -> ControllerState {
        ControllerState {
            page: self.page,
            last_page: self.last_page,
            search_term: self.search_term.clone(),
            search_in_flight: self.search_in_flight.is_some(),
            phase: self.phase(),
        }
    }
}

struct Inner {
    client: Arc<dyn CatalogClient>,
    mode: BrowseMode,
    machine: Mutex<Machine>,
    results: watch::Sender<ResultSet>,
    events: broadcast::Sender<CatalogEvent>,
}

/// Long-lived controller for the catalog screen. Cheap to clone; clones share
/// state, so a UI can spawn operations onto the runtime and keep rendering.
#[derive(Clone)]
pub struct CatalogController {
    inner: Arc<Inner>,
}

impl CatalogController {
    #[must_use]
    pub fn new(client: Arc<dyn CatalogClient>, mode: BrowseMode, event_buffer: usize) -> Self {
        let (results, _) = watch::channel(ResultSet::default());
        let (events, _) = broadcast::channel(event_buffer.max(1));

        Self {
            inner: Arc::new(Inner {
                client,
                mode,
                machine: Mutex::new(Machine::new()),
                results,
                events,
            }),
        }
    }

    fn machine(&self) -> MutexGuard<'_, Machine> {
        self.inner
            .machine
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn state(&self) -> ControllerState {
        self.machine().snapshot()
    }

    /// Latest result set. Each successful load replaces the value.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ResultSet> {
        self.inner.results.subscribe()
    }

    /// [`Self::subscribe`] as a stream: the current set, then every change.
    pub fn results_stream(&self) -> impl Stream<Item = ResultSet> + Send + 'static {
        watch_stream(self.subscribe())
    }

    /// Failures, rejections and discarded stale responses.
    #[must_use]
    pub fn events(&self) -> broadcast::Receiver<CatalogEvent> {
        self.inner.events.subscribe()
    }

    #[must_use]
    pub fn current(&self) -> ResultSet {
        self.inner.results.borrow().clone()
    }

    /// Looks `id` up in the result set currently shown.
    #[must_use]
    pub fn find_item(&self, id: AnimeId) -> Option<CatalogItem> {
        self.inner.results.borrow().find(id).cloned()
    }

    /// Loads `page` of the top-ranked listing.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidArgument`] if `page` is 0. Remote
    /// failures are reported through [`LoadOutcome::Failed`] and the event
    /// channel instead.
    pub async fn load_top(&self, page: u32) -> Result<LoadOutcome, CatalogError> {
        validate_page(page)?;

        let ticket = {
            let mut machine = self.machine();
            if machine.search_in_flight.is_some() {
                None
            } else {
                Some(machine.issue(QueryContext::Top, page))
            }
        };

        match ticket {
            Some(ticket) => Ok(self.execute(ticket).await),
            None => Ok(self.reject(RejectReason::SearchInFlight)),
        }
    }

    /// Searches for `term` and shows `page` of the results.
    ///
    /// Browse requests are rejected until this returns.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidArgument`] if `term` is blank or `page`
    /// is 0.
    pub async fn search(&self, term: &str, page: u32) -> Result<LoadOutcome, CatalogError> {
        let term = term.trim();
        if term.is_empty() {
            return Err(CatalogError::InvalidArgument(
                "search term must not be empty".to_string(),
            ));
        }
        validate_page(page)?;

        let ticket = self
            .machine()
            .issue(QueryContext::Search(term.to_string()), page);
        Ok(self.execute(ticket).await)
    }

    /// Moves one page forward in the active query.
    pub async fn next_page(&self) -> LoadOutcome {
        let ticket = {
            let mut machine = self.machine();
            let cursor = machine.cursor();
            if machine.search_in_flight.is_some() {
                Err(RejectReason::SearchInFlight)
            } else if self.inner.mode.accumulates() && machine.loading_active_query() {
                // Appending pages must arrive in order.
                Err(RejectReason::PageLoading)
            } else if cursor >= machine.last_page {
                Err(RejectReason::AtLastPage)
            } else {
                let context = machine.context();
                Ok(machine.issue(context, cursor + 1))
            }
        };

        match ticket {
            Ok(ticket) => self.execute(ticket).await,
            Err(reason) => self.reject(reason),
        }
    }

    /// Moves one page back in the active query.
    pub async fn previous_page(&self) -> LoadOutcome {
        let ticket = {
            let mut machine = self.machine();
            let cursor = machine.cursor();
            if self.inner.mode.accumulates() {
                Err(RejectReason::NotPaginated)
            } else if machine.search_in_flight.is_some() {
                Err(RejectReason::SearchInFlight)
            } else if cursor <= 1 {
                Err(RejectReason::AtFirstPage)
            } else {
                let context = machine.context();
                Ok(machine.issue(context, cursor - 1))
            }
        };

        match ticket {
            Ok(ticket) => self.execute(ticket).await,
            Err(reason) => self.reject(reason),
        }
    }

    /// Leaves search mode and reloads page 1 of the top listing. Responses to
    /// anything issued before the reset are discarded.
    pub async fn reset(&self) -> LoadOutcome {
        let ticket = {
            let mut machine = self.machine();
            machine.search_term = None;
            machine.search_in_flight = None;
            machine.page = 1;
            machine.watermark = machine.last_token;
            machine.pending.clear();
            machine.issue(QueryContext::Top, 1)
        };

        info!("Catalog reset to top listing");
        self.execute(ticket).await
    }

    async fn execute(&self, ticket: Ticket) -> LoadOutcome {
        debug!(
            "Requesting {} page {} (token {})",
            ticket.context.label(),
            ticket.page,
            ticket.token
        );
        metrics::counter!("animeshelf_catalog_requests_total", "context" => ticket.context.label())
            .increment(1);

        let result = match &ticket.context {
            QueryContext::Top => self.inner.client.fetch_top(ticket.page).await,
            QueryContext::Search(term) => self.inner.client.search(term, ticket.page).await,
        };

        self.complete(&ticket, result)
    }

    fn complete(&self, ticket: &Ticket, result: Result<PageResult, CatalogError>) -> LoadOutcome {
        let mut machine = self.machine();

        machine.pending.remove(&ticket.token);
        machine.search_in_flight = machine.newest_pending_search();

        if ticket.token <= machine.watermark {
            debug!(
                "Discarding stale {} page {} (token {} <= {})",
                ticket.context.label(),
                ticket.page,
                ticket.token,
                machine.watermark
            );
            metrics::counter!("animeshelf_catalog_stale_total").increment(1);
            self.publish(CatalogEvent::StaleDiscarded {
                context: ticket.context.clone(),
                page: ticket.page,
            });
            return LoadOutcome::Stale;
        }

        match result {
            Ok(page) => {
                machine.watermark = ticket.token;
                machine.page = ticket.page;
                machine.last_page = page.last_visible_page.max(1);
                machine.search_term = ticket.context.search_term().map(str::to_string);

                let last_page = machine.last_page;
                let count = page.items.len();
                let mode = self.inner.mode;
                self.inner
                    .results
                    .send_modify(|current| merge(current, page, ticket, last_page, mode));
                drop(machine);

                info!(
                    "Showing {} page {}/{} ({} items)",
                    ticket.context.label(),
                    ticket.page,
                    last_page,
                    count
                );
                self.publish(CatalogEvent::PageLoaded {
                    context: ticket.context.clone(),
                    page: ticket.page,
                    last_page,
                    items: count,
                });
                LoadOutcome::Applied { page: ticket.page }
            }
            Err(e) => {
                drop(machine);
                warn!(
                    "Failed to load {} page {}: {}",
                    ticket.context.label(),
                    ticket.page,
                    e
                );
                metrics::counter!("animeshelf_catalog_failures_total", "kind" => e.kind())
                    .increment(1);
                self.publish(CatalogEvent::LoadFailed {
                    context: ticket.context.clone(),
                    page: ticket.page,
                    message: e.to_string(),
                });
                LoadOutcome::Failed(e)
            }
        }
    }

    fn reject(&self, reason: RejectReason) -> LoadOutcome {
        debug!("Ignoring catalog request: {:?}", reason);
        self.publish(CatalogEvent::Rejected {
            reason: reason.clone(),
        });
        LoadOutcome::Rejected(reason)
    }

    fn publish(&self, event: CatalogEvent) {
        let _ = self.inner.events.send(event);
    }
}

fn validate_page(page: u32) -> Result<(), CatalogError> {
    if page == 0 {
        return Err(CatalogError::InvalidArgument(
            "page numbers start at 1".to_string(),
        ));
    }
    Ok(())
}

/// Replaces `current` with `page`, or appends to it when accumulating forward
/// through the same query.
fn merge(current: &mut ResultSet, page: PageResult, ticket: &Ticket, last_page: u32, mode: BrowseMode) {
    let appending = mode.accumulates()
        && ticket.page > 1
        && current.context == ticket.context
        && ticket.page > current.page;

    if appending {
        let seen: HashSet<AnimeId> = current.items.iter().map(|item| item.id).collect();
        current
            .items
            .extend(page.items.into_iter().filter(|item| !seen.contains(&item.id)));
    } else {
        current.items = page.items;
    }

    current.context = ticket.context.clone();
    current.page = ticket.page;
    current.last_page = last_page;
    current.has_next_page = page.has_next_page;
}
