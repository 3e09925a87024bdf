use crate::queries::GetViewerRepos;
use crate::types::{ErrorKind, FetchFailure, FetchResult, QueryVariables};
use gqlient::{Query, QueryError, Transport};
use log::{debug, error, trace};
use std::error::Error;

/// Fetch one page of the viewer's repositories using the given pagination
/// arguments.
///
/// Every way the request can go wrong is reported as a
/// [`FetchResult::Failure`]; details beyond the failure kind are logged.
pub(crate) fn execute<T: Transport>(transport: &T, variables: QueryVariables) -> FetchResult {
    let query = GetViewerRepos::new(variables);
    match run_query(transport, &query) {
        Ok(page) => {
            debug!(
                "Fetched {} of {} repositories for {}",
                page.repositories.len(),
                page.total_count,
                page.login
            );
            for repo in &page.repositories {
                trace!("Repository {}: {}", repo.id, repo.name);
            }
            FetchResult::Success(page)
        }
        Err(failure) => FetchResult::Failure(failure),
    }
}

fn run_query<T: Transport, Q: Query>(transport: &T, query: &Q) -> Result<Q::Output, FetchFailure> {
    let payload = query.payload();
    debug!(
        "Sending GraphQL request with variables {}",
        serde_json::Value::from(payload.variables.clone())
    );
    let data = transport.query(&payload).map_err(classify)?;
    query.parse_response(data).map_err(|e| {
        error!("GraphQL response did not contain the expected data: {e}");
        FetchFailure {
            reason: ErrorKind::MalformedResponse,
            detail: e.to_string(),
        }
    })
}

fn classify(e: QueryError) -> FetchFailure {
    match e {
        QueryError::Transport(e) => {
            if e.is_timeout() {
                error!("GraphQL request timed out");
            }
            let detail = error_chain(&e);
            error!("{detail}");
            FetchFailure {
                reason: ErrorKind::Network,
                detail,
            }
        }
        QueryError::Status { status, body } => {
            match body {
                Some(body) => error!("GraphQL server returned HTTP {status}: {body}"),
                None => error!("GraphQL server returned HTTP {status} with a non-JSON body"),
            }
            FetchFailure {
                reason: ErrorKind::Http,
                detail: status.to_string(),
            }
        }
        QueryError::Json(e) => {
            error!("Failed to decode GraphQL response: {e}");
            FetchFailure {
                reason: ErrorKind::MalformedResponse,
                detail: e.to_string(),
            }
        }
        QueryError::GraphQL(e) => {
            error!("{e}");
            FetchFailure {
                reason: ErrorKind::GraphQL,
                detail: e.messages().collect::<Vec<_>>().join("; "),
            }
        }
    }
}

fn error_chain(e: &dyn Error) -> String {
    let mut s = e.to_string();
    let mut source = e.source();
    while let Some(src) = source {
        s.push_str(": ");
        s.push_str(&src.to_string());
        source = src.source();
    }
    s
}
