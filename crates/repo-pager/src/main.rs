mod executor;
mod pager;
mod queries;
mod render;
mod session;
#[cfg(test)]
mod testing;
mod types;
use crate::pager::Pager;
use crate::session::Session;
use anyhow::Context;
use clap::{ArgAction, Parser};
use gqlient::{BuildClientError, Client};
use log::{LevelFilter, info, warn};
use std::io;
use std::num::NonZeroUsize;
use std::time::Duration;

/// Page through the authenticated GitHub user's repositories
///
/// The access token is taken from `GH_TOKEN` or `GITHUB_TOKEN` (which may be
/// set in a `.env` file in the current directory) or else from the local `gh`
/// configuration.
#[derive(Clone, Debug, Eq, Parser, PartialEq)]
struct Arguments {
    /// URL of the GraphQL API to query
    #[arg(long, default_value = gqlient::GRAPHQL_API_URL, value_name = "URL")]
    endpoint: String,

    /// Number of repositories to show per page
    #[arg(short = 'P', long, default_value = "10")]
    page_size: NonZeroUsize,

    /// Give up on a request that takes longer than this
    #[arg(long, default_value = "30s", value_parser = humantime::parse_duration)]
    timeout: Duration,

    /// Show more diagnostic output; can be given multiple times
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Arguments::parse();
    match dotenv::dotenv() {
        Ok(_) => (),
        Err(e) if e.not_found() => (),
        Err(e) => return Err(e).context("failed to load .env file"),
    }
    init_logging(args.verbose);
    let client = client_or_anonymous(Client::new_with_local_token(args.timeout), args.timeout)
        .with_endpoint(args.endpoint);
    info!("Querying {}", client.endpoint());
    let session = Session::new(
        Pager::new(args.page_size),
        client,
        io::stdin().lock(),
        io::stdout().lock(),
    );
    session.run().context("failed to interact with terminal")?;
    Ok(())
}

/// Fall back to a client without credentials when no usable token was found,
/// so that the server's rejection is reported like any other HTTP failure
fn client_or_anonymous(built: Result<Client, BuildClientError>, timeout: Duration) -> Client {
    match built {
        Ok(client) => client,
        Err(e) => {
            warn!("{:#}; sending requests without credentials", anyhow::Error::from(e));
            Client::anonymous(timeout)
        }
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    pretty_env_logger::formatted_builder()
        .filter_level(level)
        .parse_default_env()
        .init();
}
