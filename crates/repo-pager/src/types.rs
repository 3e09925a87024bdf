use gqlient::{Cursor, Id, JsonMap, Page};
use serde::Deserialize;
use std::fmt;
use std::num::NonZeroUsize;

/// Pagination state for the one connection being browsed
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct PageWindow {
    /// Cursor after which the next page starts (the current page's
    /// `endCursor`)
    pub(crate) forward_cursor: Option<Cursor>,

    /// Cursor before which the previous page ends (the current page's
    /// `startCursor`)
    pub(crate) backward_cursor: Option<Cursor>,

    pub(crate) has_next: bool,
    pub(crate) has_previous: bool,
}

impl<T> From<&Page<T>> for PageWindow {
    fn from(page: &Page<T>) -> PageWindow {
        PageWindow {
            forward_cursor: page.end_cursor.clone(),
            backward_cursor: page.start_cursor.clone(),
            has_next: page.has_next_page,
            has_previous: page.has_previous_page,
        }
    }
}

/// What the user asked to look at
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum Intent {
    Initial,
    Next,
    Previous,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::Initial => write!(f, "initial"),
            Intent::Next => write!(f, "next"),
            Intent::Previous => write!(f, "previous"),
        }
    }
}

/// Pagination arguments for a single request.
///
/// Exactly one direction is ever active.  When serialized, the arguments of
/// the other direction are sent as explicit `null`s.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum QueryVariables {
    Forward {
        first: NonZeroUsize,
        after: Option<Cursor>,
    },
    Backward {
        last: NonZeroUsize,
        before: Option<Cursor>,
    },
}

impl QueryVariables {
    pub(crate) fn first(&self) -> Option<NonZeroUsize> {
        match self {
            QueryVariables::Forward { first, .. } => Some(*first),
            QueryVariables::Backward { .. } => None,
        }
    }

    pub(crate) fn after(&self) -> Option<&Cursor> {
        match self {
            QueryVariables::Forward { after, .. } => after.as_ref(),
            QueryVariables::Backward { .. } => None,
        }
    }

    pub(crate) fn last(&self) -> Option<NonZeroUsize> {
        match self {
            QueryVariables::Forward { .. } => None,
            QueryVariables::Backward { last, .. } => Some(*last),
        }
    }

    pub(crate) fn before(&self) -> Option<&Cursor> {
        match self {
            QueryVariables::Forward { .. } => None,
            QueryVariables::Backward { before, .. } => before.as_ref(),
        }
    }

    pub(crate) fn to_json_map(&self) -> JsonMap {
        let mut vars = JsonMap::new();
        vars.insert("first".into(), self.first().map(NonZeroUsize::get).into());
        vars.insert("after".into(), self.after().cloned().into());
        vars.insert("last".into(), self.last().map(NonZeroUsize::get).into());
        vars.insert("before".into(), self.before().cloned().into());
        vars
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub(crate) struct RepositorySummary {
    pub(crate) id: Id,
    pub(crate) name: String,
    pub(crate) url: String,
    pub(crate) description: Option<String>,
}

/// One successfully fetched page of the viewer's repositories
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct RepositoryPage {
    pub(crate) login: String,
    pub(crate) total_count: u64,
    pub(crate) repositories: Vec<RepositorySummary>,
    pub(crate) page_info: PageWindow,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum FetchResult {
    Success(RepositoryPage),
    Failure(FetchFailure),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct FetchFailure {
    pub(crate) reason: ErrorKind,
    pub(crate) detail: String,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum ErrorKind {
    /// The server could not be reached, or the exchange was cut short
    Network,
    /// The server replied with a non-2xx status
    Http,
    /// The server replied 2xx but reported GraphQL-level errors
    GraphQL,
    /// The server replied 2xx without errors, but not with the expected data
    MalformedResponse,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Network => write!(f, "network error"),
            ErrorKind::Http => write!(f, "HTTP error"),
            ErrorKind::GraphQL => write!(f, "GraphQL error"),
            ErrorKind::MalformedResponse => write!(f, "malformed response"),
        }
    }
}

/// Whether each navigation control may currently be activated
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct Affordances {
    pub(crate) next: bool,
    pub(crate) previous: bool,
}

impl From<&PageWindow> for Affordances {
    fn from(window: &PageWindow) -> Affordances {
        Affordances {
            next: window.has_next,
            previous: window.has_previous,
        }
    }
}
