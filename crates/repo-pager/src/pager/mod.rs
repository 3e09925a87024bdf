use crate::render::{DisplayModel, render};
use crate::types::{Affordances, FetchResult, Intent, PageWindow, QueryVariables};
use log::{debug, warn};
use std::num::NonZeroUsize;
use thiserror::Error;

/// Pagination controller for the viewer's repositories.
///
/// A `Pager` owns the only [`PageWindow`] of a session along with the
/// enabled/disabled state of the "next" and "previous" controls.  Each
/// navigation is split into two halves:
///
/// - [`Pager::begin()`] checks that the requested control is enabled,
///   disables every control, and returns the variables to send
///
/// - [`Pager::settle()`] takes the outcome of that request and either
///   advances the window (on success) or puts the controls back the way they
///   were (on failure)
///
/// While a request is between the two halves, further calls to `begin()`
/// are refused, so at most one request can be updating the window at a
/// time.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Pager {
    page_size: NonZeroUsize,
    window: PageWindow,
    affordances: Affordances,
    in_flight: bool,
}

impl Pager {
    pub(crate) fn new(page_size: NonZeroUsize) -> Pager {
        Pager {
            page_size,
            window: PageWindow::default(),
            affordances: Affordances::default(),
            in_flight: false,
        }
    }

    pub(crate) fn window(&self) -> &PageWindow {
        &self.window
    }

    pub(crate) fn affordances(&self) -> Affordances {
        self.affordances
    }

    /// Returns true if `intent` may be acted on right now
    pub(crate) fn is_enabled(&self, intent: Intent) -> bool {
        !self.in_flight
            && match intent {
                Intent::Initial => true,
                Intent::Next => self.affordances.next,
                Intent::Previous => self.affordances.previous,
            }
    }

    /// Start a request for the page indicated by `intent`
    pub(crate) fn begin(&mut self, intent: Intent) -> Result<PendingRequest, NavigationError> {
        if self.in_flight {
            return Err(NavigationError::InFlight);
        }
        if !self.is_enabled(intent) {
            return Err(NavigationError::Unavailable(intent));
        }
        let variables = build_variables(intent, &self.window, self.page_size);
        debug!("Requesting {intent} page: {variables:?}");
        let restore = std::mem::take(&mut self.affordances);
        self.in_flight = true;
        Ok(PendingRequest {
            intent,
            variables,
            restore,
        })
    }

    /// Record the outcome of the request started by `pending` and return
    /// what should be displayed as a result
    pub(crate) fn settle(&mut self, pending: PendingRequest, result: FetchResult) -> DisplayModel {
        self.window = apply_result(std::mem::take(&mut self.window), &result);
        match result {
            FetchResult::Success(_) => {
                self.affordances = Affordances::from(&self.window);
            }
            FetchResult::Failure(ref failure) => {
                warn!(
                    "Fetching {} page failed with {}: {}",
                    pending.intent, failure.reason, failure.detail
                );
                self.affordances = pending.restore;
            }
        }
        self.in_flight = false;
        render(&result)
    }
}

/// A request that has been begun by [`Pager::begin()`] and must be passed
/// back to [`Pager::settle()`] once it completes
#[derive(Debug, Eq, PartialEq)]
pub(crate) struct PendingRequest {
    pub(crate) intent: Intent,
    pub(crate) variables: QueryVariables,

    /// The state of the controls before the request began
    restore: Affordances,
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub(crate) enum NavigationError {
    #[error("The {0} control is disabled")]
    Unavailable(Intent),
    #[error("A request is already in progress")]
    InFlight,
}

/// Determine the pagination arguments for fetching the page indicated by
/// `intent` relative to `window`.
///
/// `Next` should only be requested when `window.has_next` is true, and
/// `Previous` only when `window.has_previous` is true.
pub(crate) fn build_variables(
    intent: Intent,
    window: &PageWindow,
    page_size: NonZeroUsize,
) -> QueryVariables {
    match intent {
        Intent::Initial => QueryVariables::Forward {
            first: page_size,
            after: None,
        },
        Intent::Next => QueryVariables::Forward {
            first: page_size,
            after: window.forward_cursor.clone(),
        },
        Intent::Previous => QueryVariables::Backward {
            last: page_size,
            before: window.backward_cursor.clone(),
        },
    }
}

/// Compute the window that follows from `result`.  A failed fetch leaves the
/// window exactly as it was.
pub(crate) fn apply_result(window: PageWindow, result: &FetchResult) -> PageWindow {
    match result {
        FetchResult::Success(page) => page.page_info.clone(),
        FetchResult::Failure(_) => window,
    }
}
