//! TUI application main module
//!
//! Owns the terminal, the event loop and the scan session. A scan runs on
//! the session worker while the loop keeps polling input and draining scan
//! events every tick.

use crate::config::Config;
use crate::scan::ScanResult;
use crate::session::{ScanHandle, Session};
use crate::tui::event::{EventPoll, TuiEvent};
use crate::tui::state::{AppState, FormField, FormState, ScanOutcome, Screen, SummaryState};
use crate::tui::ui::render;
use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use ratatui::DefaultTerminal;
use std::path::PathBuf;
use tracing::{info, warn};

/// TUI application
#[derive(Debug)]
pub struct TuiApp {
    /// Terminal
    pub terminal: DefaultTerminal,
    /// Event poller
    pub event_poll: EventPoll,
    /// Application state
    pub state: AppState,
    /// Scan launcher
    session: Session,
    /// Scan in flight
    scan: Option<ScanHandle>,
    /// Log path shown on the summary screen
    log_path: Option<PathBuf>,
    /// Where the last launched form is remembered
    session_file: Option<PathBuf>,
    /// Result of the most recent finished scan
    last_result: Option<ScanResult>,
}

impl TuiApp {
    /// Create new TUI application, prefilled from `session_file` when it exists
    pub fn new(session_file: Option<PathBuf>) -> std::io::Result<Self> {
        let form = session_file
            .as_deref()
            .filter(|path| path.exists())
            .and_then(|path| match Config::load_from_file(path) {
                Ok(config) => Some(FormState::from_config(&config)),
                Err(e) => {
                    warn!(error = %e, "Ignoring unreadable last session");
                    None
                }
            })
            .unwrap_or_default();

        let terminal = ratatui::init();
        crossterm::execute!(std::io::stdout(), EnableBracketedPaste)?;

        Ok(Self {
            terminal,
            event_poll: EventPoll::default(),
            state: AppState::with_form(form),
            session: Session::new(),
            scan: None,
            log_path: None,
            session_file,
            last_result: None,
        })
    }

    /// Set log path
    pub fn set_log_path(&mut self, path: PathBuf) {
        self.log_path = Some(path);
    }

    /// Run application until the user quits
    ///
    /// Returns the result of the last finished scan, if any.
    pub fn run(&mut self) -> std::io::Result<Option<ScanResult>> {
        let outcome = self.event_loop();
        let _ = crossterm::execute!(std::io::stdout(), DisableBracketedPaste);
        ratatui::restore();
        outcome?;
        Ok(self.last_result.take())
    }

    fn event_loop(&mut self) -> std::io::Result<()> {
        while !self.state.should_exit {
            self.pump_scan_events();
            render(&mut self.terminal, &mut self.state)?;

            match self.event_poll.next() {
                TuiEvent::None | TuiEvent::Resize(_, _) => {}
                TuiEvent::CtrlC => {
                    // 扫描进行中不允许退出
                    if self.scan.is_none() {
                        self.state.should_exit = true;
                    }
                }
                event => self.handle_event(event),
            }
        }
        Ok(())
    }

    /// Drain pending scan events into the progress screen
    fn pump_scan_events(&mut self) {
        let Some(handle) = self.scan.as_ref() else {
            return;
        };

        let mut outcome = ScanOutcome::Running;
        while let Some(event) = handle.try_recv() {
            outcome = self.state.progress_state.apply(event);
            if outcome != ScanOutcome::Running {
                break;
            }
        }

        let worker_gone = outcome == ScanOutcome::Running && handle.is_finished();
        if outcome == ScanOutcome::Running && !worker_gone {
            return;
        }

        let Some(handle) = self.scan.take() else {
            return;
        };
        let joined = handle.join();
        let summary = match outcome {
            ScanOutcome::Finished(result) => {
                self.last_result = Some(result.clone());
                SummaryState::finished(result, self.log_path.clone())
            }
            ScanOutcome::Failed(error) => SummaryState::failed(error, self.log_path.clone()),
            // Worker ended without a final event
            ScanOutcome::Running => match joined {
                Ok(result) => {
                    self.last_result = Some(result.clone());
                    SummaryState::finished(result, self.log_path.clone())
                }
                Err(e) => SummaryState::failed(e.to_string(), self.log_path.clone()),
            },
        };

        info!(failed = summary.error.is_some(), "Scan ended");
        self.state.summary_state = summary;
        self.state.current_screen = Screen::Summary;
    }

    /// Handle event
    fn handle_event(&mut self, event: TuiEvent) {
        match self.state.current_screen {
            Screen::Form => self.handle_form(event),
            // 扫描进行中所有按键无效
            Screen::Progress => {}
            Screen::Summary => self.handle_summary(event),
        }
    }

    /// Handle form event
    fn handle_form(&mut self, event: TuiEvent) {
        let form = &mut self.state.form;
        form.error_message = None;

        match event {
            TuiEvent::Escape => self.state.should_exit = true,
            TuiEvent::Tab | TuiEvent::Down => form.focus_next(),
            TuiEvent::BackTab | TuiEvent::Up => form.focus_prev(),
            TuiEvent::Enter => {
                if form.focus == FormField::Start {
                    self.launch_scan();
                } else {
                    form.focus_next();
                }
            }
            TuiEvent::Left => match form.focus {
                FormField::Mode => form.prev_mode(),
                _ => {
                    if let Some(input) = form.focused_input() {
                        input.move_cursor_left();
                    }
                }
            },
            TuiEvent::Right => match form.focus {
                FormField::Mode => form.next_mode(),
                _ => {
                    if let Some(input) = form.focused_input() {
                        input.move_cursor_right();
                    }
                }
            },
            TuiEvent::Char(' ') if form.focus == FormField::Mode => form.next_mode(),
            event => {
                if let Some(input) = form.focused_input() {
                    match event {
                        TuiEvent::Char(c) => input.insert_char(c),
                        TuiEvent::Paste(text) => input.insert_str(&text),
                        TuiEvent::Backspace => input.delete_before_cursor(),
                        TuiEvent::Delete => input.delete_after_cursor(),
                        TuiEvent::Home => input.move_cursor_to_start(),
                        TuiEvent::End => input.move_cursor_to_end(),
                        _ => {}
                    }
                }
            }
        }
    }

    /// Handle summary event
    fn handle_summary(&mut self, event: TuiEvent) {
        match event {
            TuiEvent::Enter | TuiEvent::Escape => self.state.back_to_form(),
            TuiEvent::Char('q') => self.state.should_exit = true,
            _ => {}
        }
    }

    /// Validate the form and hand it to the session
    fn launch_scan(&mut self) {
        if self.scan.is_some() {
            return;
        }

        let config = self.state.form.build_config();
        match self.session.start(&config) {
            Ok(handle) => {
                self.remember(&config);
                self.scan = Some(handle);
                self.state.progress_state = Default::default();
                self.state.current_screen = Screen::Progress;
            }
            Err(e) => {
                warn!(error = %e, "Scan not started");
                self.state.form.error_message = Some(e.to_string());
            }
        }
    }

    /// Save the launched form for the next start
    fn remember(&self, config: &Config) {
        if let Some(ref path) = self.session_file
            && let Err(e) = config.save_to_file(path)
        {
            warn!(error = %e, "Failed to save last session");
        }
    }
}
