//! Interactive session.
//!
//! Every line is either a question or a `:command`. Each action runs as its
//! own local task, so a slow answer never blocks input, status polls or
//! other actions. Output from finished tasks is printed as it arrives.

use std::{
    io::Write,
    path::{Path, PathBuf},
    rc::Rc,
    time::Duration,
};

use interaction::{CLEAR_PROMPT, Confirmation, InteractionController, Notice, Outcome, View};
use rag_gateway::{IngestFile, RagBackend};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt},
    task::{self, JoinHandle},
    time::{self, Instant, Interval},
};
use tracing::{debug, warn};

use crate::error_handler::AppError;
use crate::terminal_view::TerminalView;

pub type ConsoleController<B, W> = InteractionController<B, TerminalView<W>>;

pub const HELP: &str = "\
Type a question and press Enter to ask it.
  :ingest <path>   upload a file
  :text <text>     ingest pasted text
  :status          check the backend
  :clear           delete all ingested data
  :help            show this help
  :quit            leave";

pub const INGEST_DISABLED: &str = "Ingestion is disabled right now. Check :status.";

pub const ASK_PENDING: &str = "A question is already pending.";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Ask(String),
    Ingest {
        text: Option<String>,
        file: Option<PathBuf>,
    },
    Status,
    Clear,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

pub fn parse_line(line: &str) -> ShellCommand {
    let line = line.trim();
    if line.is_empty() {
        return ShellCommand::Empty;
    }
    let Some(rest) = line.strip_prefix(':') else {
        return ShellCommand::Ask(line.to_string());
    };

    let (cmd, arg) = match rest.split_once(char::is_whitespace) {
        Some((cmd, arg)) => (cmd, arg.trim()),
        None => (rest, ""),
    };
    let arg = (!arg.is_empty()).then(|| arg.to_string());

    match cmd.to_ascii_lowercase().as_str() {
        "ingest" | "file" => ShellCommand::Ingest {
            text: None,
            file: arg.map(PathBuf::from),
        },
        "text" => ShellCommand::Ingest {
            text: arg,
            file: None,
        },
        "status" => ShellCommand::Status,
        "clear" => ShellCommand::Clear,
        "help" | "h" | "?" => ShellCommand::Help,
        "quit" | "q" | "exit" => ShellCommand::Quit,
        _ => ShellCommand::Unknown(line.to_string()),
    }
}

/// `yes` / `y` (any case) grants; anything else, including EOF, declines.
pub fn confirmation_from(answer: Option<&str>) -> Confirmation {
    match answer.map(|a| a.trim().to_ascii_lowercase()).as_deref() {
        Some("yes" | "y") => Confirmation::Granted,
        _ => Confirmation::Declined,
    }
}

/// Reads a file for upload; the file name is the last path component.
pub async fn load_file(path: &Path) -> Result<IngestFile, AppError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| AppError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    debug!(file_name = %file_name, size = bytes.len(), "file loaded");
    Ok(IngestFile::new(file_name, bytes))
}

/// One-shot ingestion: refreshes the status gate and submits only when it
/// allows. A closed gate sends nothing and yields [`Outcome::Suppressed`].
pub async fn ingest_if_enabled<B, W>(
    ctrl: &ConsoleController<B, W>,
    text: Option<String>,
    file: Option<PathBuf>,
) -> Result<Outcome, AppError>
where
    B: RagBackend,
    W: Write,
{
    ctrl.refresh_status().await;
    if !ctrl.with_view(|v| v.ingest_enabled()) {
        debug!("ingest refused by status gate");
        ctrl.with_view(|v| v.line(INGEST_DISABLED));
        return Ok(Outcome::Suppressed);
    }

    let file = match file {
        Some(path) => Some(load_file(&path).await?),
        None => None,
    };
    Ok(ctrl.ingest(text, file).await)
}

/// Runs the session until `:quit` or end of input, then waits for in-flight
/// actions. Must be called inside a [`tokio::task::LocalSet`].
pub async fn run<B, W, R>(
    ctrl: Rc<ConsoleController<B, W>>,
    input: R,
    status_poll: Option<Duration>,
) -> Result<(), AppError>
where
    B: RagBackend + 'static,
    W: Write + 'static,
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut ticker = status_poll.map(|every| time::interval_at(Instant::now() + every, every));
    let mut tasks = vec![spawn_status(&ctrl)];
    ctrl.with_view(|v| v.line(HELP));

    loop {
        tasks.retain(|t| !t.is_finished());

        let line = tokio::select! {
            line = lines.next_line() => line?,
            () = next_tick(&mut ticker) => {
                tasks.push(spawn_status(&ctrl));
                continue;
            }
        };
        let Some(line) = line else {
            debug!("input closed");
            break;
        };

        match parse_line(&line) {
            ShellCommand::Empty => {}
            ShellCommand::Quit => break,
            ShellCommand::Help => ctrl.with_view(|v| v.line(HELP)),
            ShellCommand::Unknown(cmd) => {
                ctrl.with_view(|v| v.line(&format!("Unknown command `{cmd}`. Type :help.")))
            }
            ShellCommand::Status => tasks.push(spawn_status(&ctrl)),
            ShellCommand::Ask(question) => {
                let c = Rc::clone(&ctrl);
                tasks.push(task::spawn_local(async move {
                    if c.ask(&question).await == Outcome::Suppressed {
                        c.with_view(|v| v.line(ASK_PENDING));
                    }
                }));
            }
            ShellCommand::Ingest { text, file } => {
                if !ctrl.with_view(|v| v.ingest_enabled()) {
                    ctrl.with_view(|v| v.line(INGEST_DISABLED));
                    continue;
                }
                let c = Rc::clone(&ctrl);
                tasks.push(task::spawn_local(async move {
                    let file = match file {
                        Some(path) => match load_file(&path).await {
                            Ok(f) => Some(f),
                            Err(e) => {
                                warn!(error = %e, "ingest file unreadable");
                                c.with_view(|v| v.notify(Notice::error(e.to_string())));
                                return;
                            }
                        },
                        None => None,
                    };
                    c.ingest(text, file).await;
                }));
            }
            ShellCommand::Clear => {
                ctrl.with_view(|v| v.line(&format!("{CLEAR_PROMPT} [yes/no]")));
                let confirmation = confirmation_from(lines.next_line().await?.as_deref());
                let c = Rc::clone(&ctrl);
                tasks.push(task::spawn_local(async move {
                    if c.clear(confirmation).await == Outcome::Cancelled {
                        c.with_view(|v| v.line("Clear cancelled."));
                    }
                }));
            }
        }
    }

    for t in tasks {
        if let Err(e) = t.await {
            warn!(error = %e, "shell task aborted");
        }
    }
    Ok(())
}

fn spawn_status<B, W>(ctrl: &Rc<ConsoleController<B, W>>) -> JoinHandle<()>
where
    B: RagBackend + 'static,
    W: Write + 'static,
{
    let c = Rc::clone(ctrl);
    task::spawn_local(async move {
        c.refresh_status().await;
    })
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(t) => {
            t.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use interaction::Settings;
    use rag_gateway::{
        AskResponse, GatewayError, IngestRequest, IngestResponse, Question, ScoredChunk,
        StatusResponse,
    };
    use tokio::task::LocalSet;

    use super::*;
    use crate::terminal_view::OutputMode;

    #[derive(Clone, Default)]
    struct SharedBuf(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn text(&self) -> String {
            String::from_utf8(self.0.borrow().clone()).unwrap()
        }
    }

    #[derive(Default)]
    struct Canned {
        calls: Rc<RefCell<Vec<&'static str>>>,
        ingested: bool,
        ask_delay: Duration,
    }

    impl RagBackend for Canned {
        async fn ask(&self, q: &Question, _top_k: u32) -> Result<AskResponse, GatewayError> {
            self.calls.borrow_mut().push("ask");
            if !self.ask_delay.is_zero() {
                time::sleep(self.ask_delay).await;
            }
            Ok(AskResponse {
                answer: Some(format!("**{}**", q.as_str())),
                results: vec![ScoredChunk::new("Paris is the capital.", 0.5)],
            })
        }

        async fn ingest(&self, r: IngestRequest) -> Result<IngestResponse, GatewayError> {
            self.calls.borrow_mut().push("ingest");
            Ok(IngestResponse {
                chunks_added: r.file().map_or(0, |f| f.bytes.len() as u64),
            })
        }

        async fn status(&self) -> Result<StatusResponse, GatewayError> {
            self.calls.borrow_mut().push("status");
            Ok(StatusResponse {
                ingested: self.ingested,
                chunks: Some(if self.ingested { 9 } else { 0 }),
            })
        }

        async fn clear(&self) -> Result<(), GatewayError> {
            self.calls.borrow_mut().push("clear");
            Ok(())
        }
    }

    #[test]
    fn parses_lines() {
        assert_eq!(parse_line("  "), ShellCommand::Empty);
        assert_eq!(
            parse_line(" what is RAG? "),
            ShellCommand::Ask("what is RAG?".into())
        );
        assert_eq!(
            parse_line(":ingest /tmp/my cv.pdf"),
            ShellCommand::Ingest {
                text: None,
                file: Some(PathBuf::from("/tmp/my cv.pdf")),
            }
        );
        assert_eq!(
            parse_line(":text hello  world"),
            ShellCommand::Ingest {
                text: Some("hello  world".into()),
                file: None,
            }
        );
        assert_eq!(
            parse_line(":ingest"),
            ShellCommand::Ingest {
                text: None,
                file: None,
            }
        );
        assert_eq!(parse_line(":STATUS"), ShellCommand::Status);
        assert_eq!(parse_line(":q"), ShellCommand::Quit);
        assert_eq!(parse_line(":nope"), ShellCommand::Unknown(":nope".into()));
    }

    #[test]
    fn only_yes_confirms() {
        assert_eq!(confirmation_from(Some(" YES ")), Confirmation::Granted);
        assert_eq!(confirmation_from(Some("y")), Confirmation::Granted);
        assert_eq!(confirmation_from(Some("no")), Confirmation::Declined);
        assert_eq!(confirmation_from(Some("")), Confirmation::Declined);
        assert_eq!(confirmation_from(None), Confirmation::Declined);
    }

    #[tokio::test]
    async fn load_file_reads_bytes_and_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"hello").unwrap();

        let file = load_file(&path).await.unwrap();

        assert_eq!(file.file_name, "notes.txt");
        assert_eq!(file.bytes, b"hello");
        assert_eq!(file.content_type.as_deref(), Some("text/plain"));
    }

    #[tokio::test]
    async fn load_file_missing_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_file(&dir.path().join("absent.pdf")).await.unwrap_err();
        assert!(matches!(err, AppError::ReadFile { .. }));
    }

    #[tokio::test]
    async fn session_runs_each_command() {
        let mut upload = tempfile::NamedTempFile::new().unwrap();
        upload.write_all(b"abcd").unwrap();

        let script = format!(
            "capital?\n:ingest {}\n:text\n:clear\nno\n:bogus\n:quit\nnever asked\n",
            upload.path().display()
        );
        let out = SharedBuf::default();
        let calls = Rc::new(RefCell::new(Vec::new()));
        let ctrl = Rc::new(InteractionController::new(
            Canned {
                calls: calls.clone(),
                ..Canned::default()
            },
            TerminalView::new(out.clone(), OutputMode::Text { color: false }),
            Settings::default(),
        ));

        LocalSet::new()
            .run_until(run(ctrl, script.as_bytes(), None))
            .await
            .unwrap();

        let text = out.text();
        assert!(text.contains("AI Response\ncapital?\n"));
        assert!(text.contains("Ingested 4 chunks."));
        assert!(text.contains("Select a file or paste text."));
        assert!(text.contains(CLEAR_PROMPT));
        assert!(text.contains("Clear cancelled."));
        assert!(text.contains("Unknown command `:bogus`"));

        let calls = calls.borrow();
        assert!(calls.contains(&"ask"));
        assert!(calls.contains(&"ingest"));
        assert!(!calls.contains(&"clear"));
        assert_eq!(calls.iter().filter(|c| **c == "ask").count(), 1);
    }

    fn console(backend: Canned) -> (Rc<ConsoleController<Canned, SharedBuf>>, SharedBuf) {
        let out = SharedBuf::default();
        let ctrl = Rc::new(InteractionController::new(
            backend,
            TerminalView::new(out.clone(), OutputMode::Text { color: false }),
            Settings::default(),
        ));
        (ctrl, out)
    }

    #[tokio::test]
    async fn second_question_while_pending_is_reported() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let (ctrl, out) = console(Canned {
            calls: calls.clone(),
            ask_delay: Duration::from_millis(200),
            ..Canned::default()
        });

        LocalSet::new()
            .run_until(run(ctrl, "first?\nsecond?\n".as_bytes(), None))
            .await
            .unwrap();

        assert_eq!(calls.borrow().iter().filter(|c| **c == "ask").count(), 1);
        let text = out.text();
        assert!(text.contains(ASK_PENDING));
        assert!(text.contains("AI Response\nfirst?\n"));
    }

    #[tokio::test]
    async fn one_shot_ingest_checks_status_first() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let (ctrl, out) = console(Canned {
            calls: calls.clone(),
            ingested: true,
            ..Canned::default()
        });

        let outcome = ingest_if_enabled(&ctrl, Some("more notes".into()), None)
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Suppressed);
        assert_eq!(*calls.borrow(), vec!["status"]);
        assert!(out.text().contains(INGEST_DISABLED));
    }

    #[tokio::test]
    async fn one_shot_ingest_submits_when_empty() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let (ctrl, out) = console(Canned {
            calls: calls.clone(),
            ..Canned::default()
        });

        let outcome = ingest_if_enabled(&ctrl, Some("more notes".into()), None)
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Applied);
        assert_eq!(*calls.borrow(), vec!["status", "ingest", "status"]);
        assert!(!out.text().contains(INGEST_DISABLED));
    }
}
