use crate::types::{ErrorKind, FetchResult, RepositoryPage};
use std::fmt;

/// What the output region should show
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum DisplayModel {
    Repositories(RepositoryList),
    Status(StatusMessage),
}

impl fmt::Display for DisplayModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayModel::Repositories(list) => write!(f, "{list}"),
            DisplayModel::Status(msg) => write!(f, "{msg}"),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct RepositoryList {
    pub(crate) login: String,
    pub(crate) total_count: u64,
    pub(crate) cards: Vec<RepositoryCard>,
}

impl RepositoryList {
    pub(crate) fn summary(&self) -> String {
        format!(
            "Showing {} of {} repositories for {}:",
            self.cards.len(),
            self.total_count,
            self.login
        )
    }
}

impl fmt::Display for RepositoryList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.summary())?;
        for card in &self.cards {
            writeln!(f, "  * {} <{}>", card.name, card.url)?;
            if let Some(ref desc) = card.description {
                writeln!(f, "      {desc}")?;
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct RepositoryCard {
    pub(crate) name: String,
    pub(crate) url: String,
    /// `None` if the repository has no description or an empty one
    pub(crate) description: Option<String>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum StatusMessage {
    Loading,
    NoRepositories,
    /// The server answered, but without the repositories
    IncompleteResponse,
    ConnectionError,
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusMessage::Loading => writeln!(f, "Loading …"),
            StatusMessage::NoRepositories => writeln!(f, "No repositories found."),
            StatusMessage::IncompleteResponse => writeln!(
                f,
                "Could not fetch the repositories, but the connection succeeded."
            ),
            StatusMessage::ConnectionError => writeln!(
                f,
                "Error connecting to the GitHub GraphQL API or fetching repositories."
            ),
        }
    }
}

pub(crate) fn loading() -> DisplayModel {
    DisplayModel::Status(StatusMessage::Loading)
}

pub(crate) fn render(result: &FetchResult) -> DisplayModel {
    match result {
        FetchResult::Success(page) if page.repositories.is_empty() => {
            DisplayModel::Status(StatusMessage::NoRepositories)
        }
        FetchResult::Success(page) => DisplayModel::Repositories(render_page(page)),
        FetchResult::Failure(failure) => DisplayModel::Status(match failure.reason {
            ErrorKind::MalformedResponse => StatusMessage::IncompleteResponse,
            ErrorKind::Network | ErrorKind::Http | ErrorKind::GraphQL => {
                StatusMessage::ConnectionError
            }
        }),
    }
}

fn render_page(page: &RepositoryPage) -> RepositoryList {
    RepositoryList {
        login: page.login.clone(),
        total_count: page.total_count,
        cards: page
            .repositories
            .iter()
            .map(|repo| RepositoryCard {
                name: repo.name.clone(),
                url: repo.url.clone(),
                description: repo.description.clone().filter(|d| !d.is_empty()),
            })
            .collect(),
    }
}
