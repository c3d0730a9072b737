//! Line-driven terminal front end over the memo list model.
//!
//! # Responsibility
//! - Read one user action per line and route it to the model.
//! - Redraw the recycled viewport whenever the model signals a change.
//!
//! # Invariants
//! - Plain lines are memo text; lines starting with `:` are commands.
//! - Delete targets the memo bound to the chosen visible slot.
//! - A failed model action aborts that action only; terminal I/O errors end
//!   the session.

use log::{error, warn};
use memopad_core::{MemoListModel, MemoStore, SubmitOutcome, ViewError, Viewport};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{BufRead, Write};

const HELP_TEXT: &str = "\
Type a memo and press enter to save it.
  :d <slot>   delete the memo shown in <slot>
  :s <pos>    scroll so position <pos> is at the top
  :r          reload from storage
  :h          show this help
  :q          quit
Start a memo with `::` to save text beginning with `:`.";

#[derive(Debug)]
pub enum ShellError {
    View(ViewError),
    Io(std::io::Error),
}

impl Display for ShellError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::View(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "terminal I/O failed: {err}"),
        }
    }
}

impl Error for ShellError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::View(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<ViewError> for ShellError {
    fn from(value: ViewError) -> Self {
        Self::View(value)
    }
}

impl From<std::io::Error> for ShellError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Submit(String),
    Delete(usize),
    Scroll(usize),
    Refresh,
    Help,
    Quit,
    Invalid(String),
}

fn parse_command(line: &str) -> Command {
    if let Some(text) = line.strip_prefix("::") {
        return Command::Submit(format!(":{text}"));
    }
    let Some(command) = line.strip_prefix(':') else {
        return Command::Submit(line.to_string());
    };

    let mut parts = command.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some("d"), Some(slot), None) => match slot.parse::<usize>() {
            Ok(slot) if slot >= 1 => Command::Delete(slot - 1),
            _ => Command::Invalid(format!("not a slot number: `{slot}`")),
        },
        (Some("s"), Some(position), None) => match position.parse::<usize>() {
            Ok(position) if position >= 1 => Command::Scroll(position - 1),
            _ => Command::Invalid(format!("not a position: `{position}`")),
        },
        (Some("r"), None, None) => Command::Refresh,
        (Some("h"), None, None) => Command::Help,
        (Some("q"), None, None) => Command::Quit,
        _ => Command::Invalid(format!("unknown command `:{command}`; try :h")),
    }
}

pub struct Shell<S: MemoStore> {
    model: MemoListModel<S>,
    viewport: Viewport,
}

impl<S: MemoStore> Shell<S> {
    /// Loads the model from `store` and shows `visible_rows` rows at a time.
    pub fn new(store: S, visible_rows: usize) -> Result<Self, ShellError> {
        let mut model = MemoListModel::load(store)?;
        let mut viewport = Viewport::new(visible_rows);
        model.attach_display(viewport.display());
        viewport.redraw(&model);
        Ok(Self { model, viewport })
    }

    /// Runs until `:q` or end of input.
    pub fn run(&mut self, input: impl BufRead, mut out: impl Write) -> Result<(), ShellError> {
        self.render(&mut out)?;
        for line in input.lines() {
            let line = line?;
            match self.handle_line(&line, &mut out) {
                Ok(true) => {}
                Ok(false) => break,
                Err(ShellError::View(err)) => {
                    error!("event=shell_action module=cli status=error error={err}");
                    writeln!(out, "action failed: {err}")?;
                }
                Err(err) => return Err(err),
            }
            if self.viewport.needs_redraw() {
                self.viewport.redraw(&self.model);
                self.render(&mut out)?;
            }
        }
        out.flush()?;
        Ok(())
    }

    /// Returns `false` when the shell should stop.
    fn handle_line(&mut self, line: &str, out: &mut impl Write) -> Result<bool, ShellError> {
        match parse_command(line) {
            Command::Submit(mut draft) => {
                if self.model.submit_from(&mut draft)? == SubmitOutcome::Ignored {
                    writeln!(out, "(empty memo ignored)")?;
                }
            }
            Command::Delete(slot) => match self.viewport.row(slot).cloned() {
                Some(row) if row.is_bound() => {
                    let id = self.model.delete_row(&row)?;
                    writeln!(out, "deleted memo #{id}")?;
                }
                _ => writeln!(out, "slot {} is empty", slot + 1)?,
            },
            Command::Scroll(position) => {
                self.viewport.scroll_to(&self.model, position);
                self.render(out)?;
            }
            Command::Refresh => self.model.refresh()?,
            Command::Help => writeln!(out, "{HELP_TEXT}")?,
            Command::Quit => return Ok(false),
            Command::Invalid(message) => {
                warn!("event=shell_command module=cli status=invalid");
                writeln!(out, "{message}")?;
            }
        }
        Ok(true)
    }

    fn render(&self, out: &mut impl Write) -> Result<(), ShellError> {
        let total = self.model.item_count();
        if total == 0 {
            writeln!(out, "-- no memos --")?;
            return Ok(());
        }

        let first = self.viewport.first_position();
        let shown = self.viewport.rows().iter().filter(|row| row.is_bound()).count();
        writeln!(out, "-- memos {}-{} of {} --", first + 1, first + shown, total)?;
        for (slot, row) in self.viewport.rows().iter().enumerate() {
            if !row.is_bound() {
                continue;
            }
            writeln!(
                out,
                "[{}] #{} {} {}",
                slot + 1,
                row.id_text(),
                row.datetime_text(),
                row.content_text()
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_command, Command, Shell};
    use memopad_core::{Memo, MemoStore, NewMemo, SqliteMemoStore, StoreError, StoreResult};
    use std::cell::Cell;

    /// Serves an empty list and refuses the first `failures` creates.
    struct RefusingStore {
        failures: Cell<usize>,
        created: Cell<usize>,
    }

    impl MemoStore for RefusingStore {
        fn create(&self, _memo: &NewMemo) -> StoreResult<()> {
            if self.failures.get() > 0 {
                self.failures.set(self.failures.get() - 1);
                return Err(StoreError::InvalidData("disk full".to_string()));
            }
            self.created.set(self.created.get() + 1);
            Ok(())
        }

        fn read_all(&self) -> StoreResult<Vec<Memo>> {
            Ok(Vec::new())
        }

        fn update(&self, _memo: &Memo) -> StoreResult<()> {
            Ok(())
        }

        fn delete(&self, _memo: &Memo) -> StoreResult<()> {
            Ok(())
        }

        fn count(&self) -> StoreResult<u64> {
            Ok(self.created.get() as u64)
        }
    }

    fn run_script(store: &SqliteMemoStore, script: &str) -> String {
        let mut shell = Shell::new(store, 2).unwrap();
        let mut out = Vec::new();
        shell.run(script.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn parses_commands_and_text() {
        assert_eq!(parse_command("hello"), Command::Submit("hello".to_string()));
        assert_eq!(parse_command("::d 1"), Command::Submit(":d 1".to_string()));
        assert_eq!(parse_command(":d 2"), Command::Delete(1));
        assert_eq!(parse_command(":s 3"), Command::Scroll(2));
        assert_eq!(parse_command(":q"), Command::Quit);
        assert!(matches!(parse_command(":d 0"), Command::Invalid(_)));
        assert!(matches!(parse_command(":x"), Command::Invalid(_)));
    }

    #[test]
    fn submit_and_delete_through_slots() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteMemoStore::open(dir.path().join("memo.sqlite3")).unwrap();

        let output = run_script(&store, "buy milk\ncall mom\n:d 1\n:q\nignored after quit\n");

        assert!(output.contains("-- no memos --"));
        assert!(output.contains("deleted memo #1"));
        let memos = store.read_all().unwrap();
        assert_eq!(memos.len(), 1);
        assert_eq!(memos[0].content, "call mom");
    }

    #[test]
    fn empty_line_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteMemoStore::open(dir.path().join("memo.sqlite3")).unwrap();

        let output = run_script(&store, "\n");

        assert!(output.contains("(empty memo ignored)"));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn delete_uses_row_shown_after_scroll() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteMemoStore::open(dir.path().join("memo.sqlite3")).unwrap();
        for (index, text) in ["a", "b", "c"].into_iter().enumerate() {
            store.create(&NewMemo::new(text, index as i64)).unwrap();
        }

        let output = run_script(&store, ":s 2\n:d 1\n");

        assert!(output.contains("deleted memo #2"));
        let remaining = store
            .read_all()
            .unwrap()
            .into_iter()
            .map(|memo| memo.content)
            .collect::<Vec<_>>();
        assert_eq!(remaining, vec!["a", "c"]);
    }

    #[test]
    fn empty_slot_reports_instead_of_deleting() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteMemoStore::open(dir.path().join("memo.sqlite3")).unwrap();
        store.create(&NewMemo::new("only", 1)).unwrap();

        let output = run_script(&store, ":d 2\n");

        assert!(output.contains("slot 2 is empty"));
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn failed_store_write_keeps_session_running() {
        let store = RefusingStore {
            failures: Cell::new(1),
            created: Cell::new(0),
        };
        let mut shell = Shell::new(&store, 2).unwrap();
        let mut out = Vec::new();

        shell.run("first\nsecond\n:h\n".as_bytes(), &mut out).unwrap();

        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("action failed: invalid persisted memo data: disk full"));
        assert!(output.contains("Type a memo and press enter"));
        assert_eq!(store.created.get(), 1);
    }
}
