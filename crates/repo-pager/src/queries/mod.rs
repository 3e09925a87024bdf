mod get_viewer_repos;
pub(crate) use self::get_viewer_repos::GetViewerRepos;
