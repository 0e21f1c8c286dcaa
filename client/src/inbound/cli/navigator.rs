//! Terminal implementation of the navigation port.
//!
//! A command-line client has no views to switch between, so a redirect is
//! reported as a one-line notice and remembered so the command can stop.

use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use tracing::warn;

use crate::domain::View;
use crate::domain::ports::Navigator;

type Sink = Box<dyn Write + Send>;

/// Navigator that prints redirects to a writer, usually stderr.
pub struct TerminalNavigator {
    sink: Mutex<Sink>,
    last: Mutex<Option<View>>,
}

impl std::fmt::Debug for TerminalNavigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalNavigator")
            .field("last", &self.last_redirect())
            .finish_non_exhaustive()
    }
}

impl TerminalNavigator {
    /// Report redirects on standard error.
    #[must_use]
    pub fn stderr() -> Self {
        Self::with_writer(Box::new(io::stderr()))
    }

    /// Report redirects on `sink`.
    #[must_use]
    pub fn with_writer(sink: Sink) -> Self {
        Self {
            sink: Mutex::new(sink),
            last: Mutex::new(None),
        }
    }

    /// Most recent redirect, if any happened.
    #[must_use]
    pub fn last_redirect(&self) -> Option<View> {
        *self.last.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Navigator for TerminalNavigator {
    fn navigate(&self, view: View) {
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = Some(view);
        let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(error) = writeln!(sink, "{}", notice(view)).and_then(|()| sink.flush()) {
            warn!(%error, %view, "redirect notice could not be written");
        }
    }
}

fn notice(view: View) -> String {
    match view {
        View::Login => format!("-> {view}: please sign in with `amep login`"),
        View::Landing => format!("-> {view}"),
        View::StudentDashboard | View::TeacherDashboard => {
            format!("-> {view}: this command is not available for your role")
        }
    }
}
