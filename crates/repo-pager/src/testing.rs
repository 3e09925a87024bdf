//! Test doubles standing in for the GitHub GraphQL server
use gqlient::{QueryPayload, RawResponse, Transport, TransportError};
use serde_json::json;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::ops::RangeInclusive;

/// A [`Transport`] that records each payload sent through it and replies
/// with a queue of canned responses
#[derive(Debug, Default)]
pub(crate) struct ScriptedTransport {
    replies: RefCell<VecDeque<Result<RawResponse, TransportError>>>,
    sent: RefCell<Vec<QueryPayload>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> ScriptedTransport {
        ScriptedTransport::default()
    }

    pub(crate) fn respond_json(self, status: u16, body: serde_json::Value) -> ScriptedTransport {
        self.respond_raw(status, &body.to_string())
    }

    pub(crate) fn respond_raw(self, status: u16, body: &str) -> ScriptedTransport {
        self.replies.borrow_mut().push_back(Ok(RawResponse {
            status,
            body: body.as_bytes().to_vec(),
        }));
        self
    }

    pub(crate) fn fail(self, err: TransportError) -> ScriptedTransport {
        self.replies.borrow_mut().push_back(Err(err));
        self
    }

    pub(crate) fn sent(&self) -> Vec<QueryPayload> {
        self.sent.borrow().clone()
    }

    pub(crate) fn sent_variables(&self) -> Vec<serde_json::Value> {
        self.sent
            .borrow()
            .iter()
            .map(|p| serde_json::Value::from(p.variables.clone()))
            .collect()
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, payload: &QueryPayload) -> Result<RawResponse, TransportError> {
        self.sent.borrow_mut().push(payload.clone());
        self.replies
            .borrow_mut()
            .pop_front()
            .expect("request sent with no scripted reply left")
    }
}

pub(crate) fn connection_refused() -> TransportError {
    TransportError::Send(Box::new(ureq::Error::Io(std::io::Error::from(
        std::io::ErrorKind::ConnectionRefused,
    ))))
}

/// A successful response body for the `GetRepositories` query containing
/// repositories numbered `numbers`
pub(crate) fn viewer_response(
    login: &str,
    total_count: u64,
    numbers: RangeInclusive<u32>,
    page_info: serde_json::Value,
) -> serde_json::Value {
    let nodes = numbers
        .map(|i| {
            json!({
                "id": format!("R_{i}"),
                "name": format!("repo-{i}"),
                "url": format!("https://github.com/{login}/repo-{i}"),
                "description": if i % 2 == 0 { serde_json::Value::Null } else { format!("Repository number {i}").into() },
            })
        })
        .collect::<Vec<_>>();
    json!({
        "data": {
            "viewer": {
                "login": login,
                "repositories": {
                    "nodes": nodes,
                    "pageInfo": page_info,
                    "totalCount": total_count,
                }
            }
        }
    })
}
