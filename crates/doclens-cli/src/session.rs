//! Interactive session over stdin.
//!
//! One [`AppState`] lives for the whole session. Each command becomes an
//! [`Action`] fed through [`reduce`]; analysis runs in a background task so
//! commands keep being read while a scan is pending.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use doclens_analyze::{
    ANALYSIS_STEPS, AnalysisError, Analyzer, UploadPolicy, analyze_with_timeout, document_preview,
};
use doclens_core::{
    Action, AppState, DoclensConfig, Phase, ResultPayload, Tab, catalog, find_sample, reduce,
};
use doclens_reveal::RevealSchedule;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, info};

use crate::display::{history_lines, print_samples};
use crate::player::{Playback, present};
use crate::theme::Theme;

type PendingScan = JoinHandle<Result<ResultPayload, AnalysisError>>;

/// A parsed session command.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Command {
    Upload(PathBuf),
    Scan,
    Demo { sample: String, animate: bool },
    Samples,
    History,
    Tab(Tab),
    Clear,
    Help,
    Quit,
}

const HELP: &str = "\
commands:
  upload <FILE>              select a contract (pdf, txt, doc, docx)
  scan                       analyze the selected contract
  demo <SAMPLE> [--static]   show a sample by number or name
  samples                    list the samples
  history                    show recent scans
  tab <upload|demo|history>  switch tab
  clear                      clear the shown result
  help                       this text
  quit                       leave the session";

pub(crate) fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    match word.to_ascii_lowercase().as_str() {
        "upload" | "open" if !rest.is_empty() => Ok(Command::Upload(PathBuf::from(rest))),
        "upload" | "open" => Err("usage: upload <FILE>".into()),
        "scan" => Ok(Command::Scan),
        "demo" => {
            let animate = !rest.split_whitespace().any(|w| w == "--static");
            let sample = rest
                .split_whitespace()
                .filter(|w| *w != "--static")
                .collect::<Vec<_>>()
                .join(" ");
            if sample.is_empty() {
                return Err("usage: demo <SAMPLE> [--static]".into());
            }
            Ok(Command::Demo { sample, animate })
        }
        "samples" => Ok(Command::Samples),
        "history" => Ok(Command::History),
        "tab" => Tab::parse(rest)
            .map(Command::Tab)
            .ok_or_else(|| "usage: tab <upload|demo|history>".into()),
        "clear" => Ok(Command::Clear),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        "" => Err(String::new()),
        other => Err(format!("unknown command '{other}'; type `help`")),
    }
}

pub(crate) struct Session {
    state: AppState,
    config: DoclensConfig,
    policy: UploadPolicy,
    analyzer: Arc<dyn Analyzer>,
    pending: Option<PendingScan>,
    /// Render results to stdout. Off in tests.
    render: bool,
    /// `false` shows every result statically, whatever the state asks for.
    animate: bool,
}

impl Session {
    pub(crate) fn new(config: DoclensConfig, analyzer: Arc<dyn Analyzer>) -> Self {
        Self {
            state: AppState::with_history_capacity(config.history.capacity),
            policy: UploadPolicy::from_config(&config.upload),
            config,
            analyzer,
            pending: None,
            render: true,
            animate: true,
        }
    }

    pub(crate) fn set_animate(&mut self, animate: bool) {
        self.animate = animate;
    }

    fn dispatch(&mut self, action: Action) {
        self.state = reduce(std::mem::take(&mut self.state), action);
    }

    fn abort_pending(&mut self) {
        if let Some(task) = self.pending.take() {
            debug!("dropping pending analysis");
            task.abort();
        }
    }

    /// Validate and select a file. A rejected file leaves the state untouched.
    pub(crate) fn upload(&mut self, path: &Path) -> anyhow::Result<()> {
        let file = self.policy.accept_path(path)?;
        self.abort_pending();
        println!(
            "{}",
            Theme::success(&format!("selected {} ({:.2} MiB)", file.name, file.size_mib()))
        );
        println!("{}", Theme::section("Document Preview"));
        println!("  {}", document_preview());
        println!("  {}", Theme::dimmed("Showing first ~300 characters"));
        self.dispatch(Action::SelectTab(Tab::Upload));
        self.dispatch(Action::FileSelected(file));
        Ok(())
    }

    /// Start analyzing the selected file in the background.
    pub(crate) fn start_scan(&mut self) -> bool {
        let Some(file) = self.state.upload.clone() else {
            println!("{}", Theme::warning("no file selected; use `upload <FILE>` first"));
            return false;
        };
        if self.state.is_analyzing() {
            println!("{}", Theme::warning("analysis already running"));
            return false;
        }
        self.dispatch(Action::ScanStarted);
        println!("{}", Theme::info(&format!("analyzing {}...", file.name)));
        println!("{}", Theme::section("AI Analysis in Progress"));
        for step in ANALYSIS_STEPS {
            println!("  • {}", Theme::dimmed(step));
        }

        let analyzer = Arc::clone(&self.analyzer);
        let limit = self.config.analysis.timeout();
        self.pending = Some(tokio::spawn(async move {
            analyze_with_timeout(analyzer.as_ref(), &file, limit).await
        }));
        true
    }

    /// Wait for the running analysis, if any, and apply its outcome. A failed
    /// analysis moves the state to [`Phase::Failed`] and is returned as the error.
    pub(crate) async fn finish_scan(&mut self) -> anyhow::Result<()> {
        let outcome = wait_pending(&mut self.pending).await;
        self.apply_outcome(outcome).await
    }

    async fn apply_outcome(
        &mut self,
        outcome: Result<Result<ResultPayload, AnalysisError>, JoinError>,
    ) -> anyhow::Result<()> {
        self.pending = None;
        match outcome {
            Ok(Ok(payload)) => {
                self.dispatch(Action::ScanSucceeded {
                    payload: Arc::new(payload),
                    at: Utc::now(),
                });
                self.show_current().await?;
            }
            Ok(Err(e)) => {
                self.dispatch(Action::ScanFailed(e.to_string()));
                return Err(e.into());
            }
            Err(e) if e.is_cancelled() => {}
            Err(e) => {
                self.dispatch(Action::ScanFailed(e.to_string()));
                return Err(e).context("analysis task failed");
            }
        }
        Ok(())
    }

    pub(crate) async fn demo(&mut self, query: &str, animate: bool) -> anyhow::Result<()> {
        let sample = find_sample(query)?;
        self.abort_pending();
        self.dispatch(Action::SelectTab(Tab::Demo));
        self.dispatch(Action::SampleSelected {
            payload: Arc::new(sample.result),
            animate,
        });
        self.show_current().await
    }

    /// Present the current result. The previous reveal was dropped when its playback ended.
    async fn show_current(&mut self) -> anyhow::Result<()> {
        let Some(current) = self.state.current.clone() else {
            return Ok(());
        };
        if !self.render {
            return Ok(());
        }
        let schedule = RevealSchedule::build(
            &current.payload,
            current.animate && self.animate,
            &self.config.reveal,
        );
        if present(&current.payload, &schedule, &self.config.thresholds).await?
            == Playback::Interrupted
        {
            info!(document = %current.payload.document_name, "reveal interrupted");
        }
        Ok(())
    }

    fn print_history(&self) {
        for line in history_lines(&self.state.history, Utc::now()) {
            println!("{line}");
        }
    }

    /// Run one command. Returns `false` when the session should end.
    pub(crate) async fn handle(&mut self, command: Command) -> anyhow::Result<bool> {
        match command {
            Command::Upload(path) => self.upload(&path)?,
            Command::Scan => {
                self.start_scan();
            }
            Command::Demo { sample, animate } => self.demo(&sample, animate).await?,
            Command::Samples => print_samples(&catalog(), &self.config.thresholds),
            Command::History => {
                self.dispatch(Action::SelectTab(Tab::History));
                self.print_history();
            }
            Command::Tab(tab) => {
                self.dispatch(Action::SelectTab(tab));
                match tab {
                    Tab::History => self.print_history(),
                    Tab::Demo => print_samples(&catalog(), &self.config.thresholds),
                    Tab::Upload => match &self.state.upload {
                        Some(file) => println!("{}", Theme::info(&format!("selected: {}", file.name))),
                        None => println!("{}", Theme::dimmed("no file selected")),
                    },
                }
            }
            Command::Clear => self.dispatch(Action::ClearResult),
            Command::Help => println!("{HELP}"),
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }

    /// Read commands from stdin until `quit`, end of input or Ctrl-C.
    pub(crate) async fn run(&mut self) -> anyhow::Result<()> {
        println!("{}", Theme::header("doclens session"));
        println!("{}", Theme::dimmed("type `help` for commands"));
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line.context("failed to read stdin")? else {
                        break;
                    };
                    let command = match parse_command(&line) {
                        Ok(command) => command,
                        Err(msg) if msg.is_empty() => continue,
                        Err(msg) => {
                            println!("{}", Theme::warning(&msg));
                            continue;
                        }
                    };
                    match self.handle(command).await {
                        Ok(true) => {}
                        Ok(false) => break,
                        Err(e) => println!("{}", Theme::error(&format!("{e:#}"))),
                    }
                }
                outcome = wait_pending(&mut self.pending) => {
                    if let Err(e) = self.apply_outcome(outcome).await {
                        println!("{}", Theme::error(&format!("{e:#}")));
                    }
                }
                _ = tokio::signal::ctrl_c() => break,
            }
        }

        self.abort_pending();
        if let Phase::Failed(msg) = &self.state.phase {
            debug!(%msg, "session ended after a failed scan");
        }
        Ok(())
    }
}

async fn wait_pending(
    pending: &mut Option<PendingScan>,
) -> Result<Result<ResultPayload, AnalysisError>, JoinError> {
    match pending {
        Some(task) => task.await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doclens_analyze::MockAnalyzer;
    use std::io::Write;
    use std::time::Duration;

    fn session(delay_ms: u64) -> Session {
        let mut s = Session::new(
            DoclensConfig::default(),
            Arc::new(MockAnalyzer::new(Duration::from_millis(delay_ms))),
        );
        s.render = false;
        s
    }

    fn contract(dir: &tempfile::TempDir, name: &str, bytes: usize) -> PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(&vec![b'x'; bytes]).unwrap();
        path
    }

    #[test]
    fn parses_commands() {
        assert_eq!(
            parse_command("upload ./My Lease.pdf"),
            Ok(Command::Upload(PathBuf::from("./My Lease.pdf")))
        );
        assert_eq!(
            parse_command("demo 2 --static"),
            Ok(Command::Demo {
                sample: "2".into(),
                animate: false
            })
        );
        assert_eq!(
            parse_command("  demo Low-Risk Consulting Agreement "),
            Ok(Command::Demo {
                sample: "Low-Risk Consulting Agreement".into(),
                animate: true
            })
        );
        assert_eq!(parse_command("TAB history"), Ok(Command::Tab(Tab::History)));
        assert_eq!(parse_command("quit"), Ok(Command::Quit));
        assert_eq!(parse_command(""), Err(String::new()));
        assert!(parse_command("upload").is_err());
        assert!(parse_command("demo --static").is_err());
        assert!(parse_command("tab settings").is_err());
        assert!(parse_command("frobnicate").is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn scan_records_history_and_presents() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session(3000);
        s.upload(&contract(&dir, "msa.pdf", 100)).unwrap();
        assert!(s.start_scan());
        assert!(s.state.is_analyzing());
        // A second scan while pending is ignored.
        assert!(!s.start_scan());

        s.finish_scan().await.unwrap();
        let state = &s.state;
        assert_eq!(state.phase, Phase::Idle);
        assert_eq!(state.history.len(), 1);
        let current = state.current.as_ref().unwrap();
        assert!(current.animate);
        assert_eq!(current.payload.document_name, "msa.pdf");
    }

    #[tokio::test(start_paused = true)]
    async fn scan_without_file_is_a_no_op() {
        let mut s = session(10);
        assert!(!s.start_scan());
        assert_eq!(s.state.phase, Phase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_upload_leaves_state_alone() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session(10);
        s.upload(&contract(&dir, "ok.txt", 10)).unwrap();
        assert!(s.upload(&contract(&dir, "photo.png", 10)).is_err());
        assert_eq!(s.state.upload.as_ref().unwrap().name, "ok.txt");
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_surfaces_as_failed_phase() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = DoclensConfig::default();
        config.analysis.timeout_ms = 1000;
        let mut s = Session::new(config, Arc::new(MockAnalyzer::new(Duration::from_secs(5))));
        s.render = false;

        s.upload(&contract(&dir, "slow.docx", 10)).unwrap();
        s.start_scan();
        let err = s.finish_scan().await.unwrap_err();
        assert!(err.to_string().contains("timed out"), "{err:#}");
        assert!(matches!(s.state.phase, Phase::Failed(ref m) if m.contains("timed out")));
        assert!(s.state.history.is_empty());
        assert!(s.state.current.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn demo_during_scan_drops_the_analysis() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session(3000);
        s.upload(&contract(&dir, "msa.pdf", 10)).unwrap();
        s.start_scan();
        s.demo("3", false).await.unwrap();

        assert!(s.pending.is_none());
        let state = &s.state;
        assert_eq!(state.tab, Tab::Demo);
        assert!(state.upload.is_none());
        assert_eq!(state.phase, Phase::Idle);
        assert!(state.history.is_empty());
        assert!(!state.current.as_ref().unwrap().animate);
    }

    #[tokio::test(start_paused = true)]
    async fn handle_routes_through_the_reducer() {
        let mut s = session(10);
        assert!(s.handle(Command::Demo { sample: "1".into(), animate: true }).await.unwrap());
        assert!(s.state.current.is_some());
        assert!(s.handle(Command::Clear).await.unwrap());
        assert!(s.state.current.is_none());
        assert!(s.handle(Command::Tab(Tab::History)).await.unwrap());
        assert_eq!(s.state.tab, Tab::History);
        assert!(s.handle(Command::Demo { sample: "nope".into(), animate: true }).await.is_err());
        assert!(!s.handle(Command::Quit).await.unwrap());
    }
}
