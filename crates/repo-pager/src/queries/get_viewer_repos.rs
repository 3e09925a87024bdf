use crate::types::{PageWindow, QueryVariables, RepositoryPage, RepositorySummary};
use gqlient::{JsonMap, Page, Query, Singleton};
use indoc::indoc;
use serde::Deserialize;
use std::fmt::{self, Write};

static GET_REPOSITORIES: &str = indoc! {"
    query GetRepositories($first: Int, $after: String, $last: Int, $before: String) {
        viewer {
            login
            repositories(
                first: $first,
                after: $after,
                last: $last,
                before: $before,
                orderBy: {field: UPDATED_AT, direction: DESC},
            ) {
                nodes {
                    id
                    name
                    url
                    description
                }
                pageInfo {
                    endCursor
                    hasNextPage
                    hasPreviousPage
                    startCursor
                }
                totalCount
            }
        }
    }
"};

/// A [`Query`] for retrieving one page of the authenticated user's
/// repositories, most recently updated first
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct GetViewerRepos {
    variables: QueryVariables,
}

impl GetViewerRepos {
    pub(crate) fn new(variables: QueryVariables) -> GetViewerRepos {
        GetViewerRepos { variables }
    }
}

impl Query for GetViewerRepos {
    type Output = RepositoryPage;

    fn write_graphql<W: Write>(&self, mut s: W) -> fmt::Result {
        s.write_str(GET_REPOSITORIES)
    }

    fn variables(&self) -> JsonMap {
        self.variables.to_json_map()
    }

    fn parse_response(&self, data: JsonMap) -> Result<RepositoryPage, serde_json::Error> {
        let Singleton(viewer) = serde_json::from_value::<Singleton<Viewer>>(data.into())?;
        Ok(RepositoryPage {
            login: viewer.login,
            total_count: viewer.repositories.total_count,
            page_info: PageWindow::from(&viewer.repositories),
            repositories: viewer.repositories.items,
        })
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
struct Viewer {
    login: String,
    repositories: Page<RepositorySummary>,
}
