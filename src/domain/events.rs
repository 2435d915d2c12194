//! Events published by the catalog controller.
//!
//! The result-set channel only ever carries successful loads. Everything a UI
//! might want to report beside the list (failures, rejected presses, dropped
//! stale pages) goes through this side channel instead.

use serde::Serialize;

use crate::models::catalog::QueryContext;

/// Why an operation was ignored without issuing a request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// A search request is still in flight.
    SearchInFlight,
    /// Already on the last page the catalog reported.
    AtLastPage,
    /// Already on page 1.
    AtFirstPage,
    /// Going back is meaningless when pages accumulate.
    NotPaginated,
    /// The previous page of an accumulating list is still loading.
    PageLoading,
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", content = "payload")]
pub enum CatalogEvent {
    PageLoaded {
        context: QueryContext,
        page: u32,
        last_page: u32,
        items: usize,
    },
    LoadFailed {
        context: QueryContext,
        page: u32,
        message: String,
    },
    StaleDiscarded {
        context: QueryContext,
        page: u32,
    },
    Rejected {
        reason: RejectReason,
    },
}
