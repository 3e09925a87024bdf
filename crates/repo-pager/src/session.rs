use crate::executor::execute;
use crate::pager::Pager;
use crate::render::loading;
use crate::types::Intent;
use gqlient::Transport;
use log::debug;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

/// An interactive, line-oriented front end to a [`Pager`].
///
/// The session performs the initial load, then reads one command per line
/// from `input` until told to quit or `input` is exhausted, writing each
/// resulting display to `output`.
#[derive(Debug)]
pub(crate) struct Session<T, R, W> {
    pager: Pager,
    transport: T,
    input: R,
    output: W,
}

impl<T: Transport, R: BufRead, W: Write> Session<T, R, W> {
    pub(crate) fn new(pager: Pager, transport: T, input: R, output: W) -> Self {
        Session {
            pager,
            transport,
            input,
            output,
        }
    }

    /// Run the session to completion and return the output handle
    pub(crate) fn run(mut self) -> io::Result<W> {
        self.on_initial_load()?;
        let mut line = String::new();
        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;
            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                break;
            }
            match line.parse::<Command>() {
                Ok(Command::Next) => self.on_next()?,
                Ok(Command::Previous) => self.on_previous()?,
                Ok(Command::Quit) => break,
                Err(()) if line.trim().is_empty() => (),
                Err(()) => writeln!(
                    self.output,
                    "Unrecognized command {:?}; enter n (next), p (previous), or q (quit)",
                    line.trim()
                )?,
            }
        }
        Ok(self.output)
    }

    pub(crate) fn on_initial_load(&mut self) -> io::Result<()> {
        self.navigate(Intent::Initial)
    }

    pub(crate) fn on_next(&mut self) -> io::Result<()> {
        self.navigate(Intent::Next)
    }

    pub(crate) fn on_previous(&mut self) -> io::Result<()> {
        self.navigate(Intent::Previous)
    }

    fn navigate(&mut self, intent: Intent) -> io::Result<()> {
        match self.pager.begin(intent) {
            Ok(pending) => {
                write!(self.output, "{}", loading())?;
                self.output.flush()?;
                let result = execute(&self.transport, pending.variables.clone());
                let display = self.pager.settle(pending, result);
                debug!("Page window is now {:?}", self.pager.window());
                write!(self.output, "{display}")?;
            }
            Err(e) => writeln!(self.output, "{e}")?,
        }
        self.write_controls()
    }

    fn write_controls(&mut self) -> io::Result<()> {
        let controls = self.pager.affordances();
        let state = |enabled| if enabled { "" } else { " (disabled)" };
        writeln!(
            self.output,
            "[n]ext{}  [p]revious{}  [q]uit",
            state(controls.next),
            state(controls.previous),
        )
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Command {
    Next,
    Previous,
    Quit,
}

impl FromStr for Command {
    type Err = ();

    fn from_str(s: &str) -> Result<Command, ()> {
        match s.trim().to_ascii_lowercase().as_str() {
            "n" | "next" => Ok(Command::Next),
            "p" | "prev" | "previous" => Ok(Command::Previous),
            "q" | "quit" | "exit" => Ok(Command::Quit),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedTransport, viewer_response};
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::num::NonZeroUsize;

    fn run_session(transport: &ScriptedTransport, input: &str) -> String {
        let session = Session::new(
            Pager::new(NonZeroUsize::new(2).unwrap()),
            transport,
            input.as_bytes(),
            Vec::new(),
        );
        String::from_utf8(session.run().unwrap()).unwrap()
    }

    fn first_page() -> serde_json::Value {
        viewer_response(
            "alice",
            3,
            1..=2,
            json!({
                "endCursor": "c2",
                "hasNextPage": true,
                "hasPreviousPage": false,
                "startCursor": "c1"
            }),
        )
    }

    fn last_page() -> serde_json::Value {
        viewer_response(
            "alice",
            3,
            3..=3,
            json!({
                "endCursor": "c3",
                "hasNextPage": false,
                "hasPreviousPage": true,
                "startCursor": "c3"
            }),
        )
    }

    #[test]
    fn browse_forward_and_back() {
        let transport = ScriptedTransport::new()
            .respond_json(200, first_page())
            .respond_json(200, last_page())
            .respond_json(200, first_page());
        let output = run_session(&transport, "n\np\nq\n");
        assert_eq!(
            output,
            indoc! {"
                Loading …
                Showing 2 of 3 repositories for alice:
                  * repo-1 <https://github.com/alice/repo-1>
                      Repository number 1
                  * repo-2 <https://github.com/alice/repo-2>
                [n]ext  [p]revious (disabled)  [q]uit
                > Loading …
                Showing 1 of 3 repositories for alice:
                  * repo-3 <https://github.com/alice/repo-3>
                      Repository number 3
                [n]ext (disabled)  [p]revious  [q]uit
                > Loading …
                Showing 2 of 3 repositories for alice:
                  * repo-1 <https://github.com/alice/repo-1>
                      Repository number 1
                  * repo-2 <https://github.com/alice/repo-2>
                [n]ext  [p]revious (disabled)  [q]uit
                > "}
        );
        assert_eq!(
            transport.sent_variables(),
            [
                json!({"first": 2, "after": null, "last": null, "before": null}),
                json!({"first": 2, "after": "c2", "last": null, "before": null}),
                json!({"first": null, "after": null, "last": 2, "before": "c3"}),
            ]
        );
    }

    #[test]
    fn disabled_control_sends_nothing() {
        let transport = ScriptedTransport::new().respond_json(200, first_page());
        let output = run_session(&transport, "previous\n");
        assert!(output.contains("The previous control is disabled\n"));
        assert_eq!(transport.sent().len(), 1);
        assert!(output.ends_with("> \n"));
    }

    #[test]
    fn error_then_retry() {
        let transport = ScriptedTransport::new()
            .respond_json(200, first_page())
            .respond_json(401, json!({"message": "Bad credentials"}))
            .respond_json(200, last_page());
        let output = run_session(&transport, "n\nn\n");
        assert!(output.contains(indoc! {"
            > Loading …
            Error connecting to the GitHub GraphQL API or fetching repositories.
            [n]ext  [p]revious (disabled)  [q]uit
        "}));
        assert!(!output.contains("Bad credentials"));
        assert_eq!(transport.sent_variables()[1], transport.sent_variables()[2]);
        assert!(output.contains("Showing 1 of 3 repositories for alice:\n"));
    }

    #[test]
    fn unknown_and_blank_commands() {
        let transport = ScriptedTransport::new().respond_json(200, first_page());
        let output = run_session(&transport, "\nfoo\nquit\n");
        assert!(output.contains(
            "Unrecognized command \"foo\"; enter n (next), p (previous), or q (quit)\n"
        ));
        assert_eq!(transport.sent().len(), 1);
    }

    #[test]
    fn parse_commands() {
        assert_eq!("n\n".parse::<Command>(), Ok(Command::Next));
        assert_eq!(" Next ".parse::<Command>(), Ok(Command::Next));
        assert_eq!("prev".parse::<Command>(), Ok(Command::Previous));
        assert_eq!("Q".parse::<Command>(), Ok(Command::Quit));
        assert_eq!("nope".parse::<Command>(), Err(()));
    }
}
