use std::io::{self, Write};

use tracing::Level;

/// Which collapsible log group, if any, is currently open in the output.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GroupState {
    #[default]
    None,
    InGroup(String),
}

/// Renders log events as GitHub Actions workflow commands.
///
/// The runner's log viewer interprets `::group::NAME` / `::endgroup::` as a
/// collapsible section and `::debug::` / `::warning::` / `::error::` as
/// leveled lines, so the output must match that syntax byte for byte.
/// See https://docs.github.com/en/actions/reference/workflow-commands-for-github-actions
#[derive(Debug, Default)]
pub struct WorkflowCommandFormatter {
    state: GroupState,
}

impl WorkflowCommandFormatter {
    pub fn new() -> Self {
        Self {
            state: GroupState::None,
        }
    }

    pub fn state(&self) -> &GroupState {
        &self.state
    }

    /// Write one event, emitting group open/close markers as the event's
    /// group differs from the currently open one. A group change closes the
    /// old group before opening the new one; it never opens twice.
    pub fn format_event<W: Write>(
        &mut self,
        out: &mut W,
        level: &Level,
        group: Option<&str>,
        message: &str,
    ) -> io::Result<()> {
        match (&self.state, group) {
            (GroupState::None, None) => {}
            (GroupState::None, Some(next)) => {
                writeln!(out, "::group::{next}")?;
                self.state = GroupState::InGroup(next.to_string());
            }
            (GroupState::InGroup(current), Some(next)) if current == next => {}
            (GroupState::InGroup(_), Some(next)) => {
                writeln!(out, "::endgroup::")?;
                writeln!(out, "::group::{next}")?;
                self.state = GroupState::InGroup(next.to_string());
            }
            (GroupState::InGroup(_), None) => {
                writeln!(out, "::endgroup::")?;
                self.state = GroupState::None;
            }
        }

        writeln!(out, "{}{}", level_prefix(level), message)
    }

    /// Terminate a still-open group. Called on every exit path so the output
    /// never ends with an unterminated `::group::`.
    pub fn close_open_group<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        if matches!(self.state, GroupState::InGroup(_)) {
            writeln!(out, "::endgroup::")?;
            self.state = GroupState::None;
        }
        Ok(())
    }
}

/// Fixed level-to-marker mapping. Error and anything above collapse to
/// `::error::`; info and trace lines carry no marker.
fn level_prefix(level: &Level) -> &'static str {
    match *level {
        Level::DEBUG => "::debug::",
        Level::WARN => "::warning::",
        Level::ERROR => "::error::",
        _ => "",
    }
}
