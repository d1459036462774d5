//! Media Triage - sort a photo staging folder
//!
//! Runs the interactive terminal UI when started without arguments,
//! otherwise performs a single scan from command-line arguments and/or a
//! configuration file.

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use media_triage::{
    Cli, Config, EVENTS_TARGET, ScanEvent, ScanResult, Session, TuiApp, init_locale,
    should_run_interactive,
};
use std::process::ExitCode;
use std::path::{Path, PathBuf};
use tracing::{Level, error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

// Initialize i18n for this binary
rust_i18n::i18n!("locales", fallback = "en");

/// File remembering the last interactive form, inside `<exe dir>/Config`
const LAST_SESSION_FILE: &str = "last_session.toml";

// CLI Output Module
mod cli_output {
    //! CLI 输出美化模块
    //!
    //! 为命令行输出提供统一的颜色和格式样式。

    use crossterm::{
        ExecutableCommand,
        style::{Color, Print, Stylize, style},
    };
    use std::io::stdout;
    use unicode_width::UnicodeWidthStr;

    /// 输出宽度
    const WIDTH: usize = 60;

    /// CLI 主题颜色
    pub struct CliTheme;

    impl CliTheme {
        /// 成功颜色（绿色）
        pub const SUCCESS: Color = Color::Green;
        /// 警告颜色（黄色）
        pub const WARNING: Color = Color::Yellow;
        /// 错误颜色（红色）
        pub const ERROR: Color = Color::Red;
        /// 提示颜色（暗灰色）
        pub const HINT: Color = Color::DarkGrey;
        /// 强调颜色（青色）
        pub const ACCENT: Color = Color::Cyan;
    }

    /// 打印分隔线
    pub fn print_separator() {
        let _ = stdout().execute(Print(format!("{}\n", "─".repeat(WIDTH))));
    }

    /// 打印居中的标题
    pub fn print_title(title: &str) {
        let padding = WIDTH.saturating_sub(title.width()) / 2;
        let _ = stdout().execute(Print(" ".repeat(padding)));
        let _ = stdout().execute(Print(style(title).bold()));
        let _ = stdout().execute(Print("\n"));
    }

    /// 打印错误消息
    pub fn print_error(msg: &str) {
        let _ = stdout().execute(Print(style("✗ ").with(CliTheme::ERROR).bold()));
        let _ = stdout().execute(Print(format!("{}\n", msg)));
    }

    /// 打印提示消息
    pub fn print_hint(msg: &str) {
        let _ = stdout().execute(Print(style("→ ").with(CliTheme::HINT)));
        let _ = stdout().execute(Print(format!("{}\n", msg)));
    }

    /// 打印统计项
    pub fn print_stat(key: &str, value: &str, color: Color) {
        let key_styled = style(key).with(CliTheme::HINT);
        let value_styled = style(value).with(color).bold();
        let _ = stdout().execute(Print("  "));
        let _ = stdout().execute(Print(key_styled));
        let _ = stdout().execute(Print(": "));
        let _ = stdout().execute(Print(value_styled));
        let _ = stdout().execute(Print("\n"));
    }

    /// 打印扫描消息行，按状态标签着色
    pub fn print_event_line(line: &str) {
        let color = if line.starts_with("[failed]") || line.starts_with("[skipped]") {
            Some(CliTheme::ERROR)
        } else if line.starts_with("[sorted]") {
            Some(CliTheme::SUCCESS)
        } else if line.starts_with("[duplicate]") {
            Some(CliTheme::ACCENT)
        } else if line.starts_with('[') {
            Some(CliTheme::WARNING)
        } else {
            None
        };
        let mut out = stdout();
        let styled = match color {
            Some(color) => style(line).with(color),
            None => style(line),
        };
        let _ = out.execute(Print(styled));
        let _ = out.execute(Print("\n"));
    }

    /// 打印日志文件路径
    pub fn print_log_path(label: &str, path: &str) {
        let _ = stdout().execute(Print("\n"));
        let _ = stdout().execute(Print(style(format!("  {} ", label)).with(CliTheme::HINT)));
        let _ = stdout().execute(Print(style(format!("{}\n", path)).with(CliTheme::ACCENT)));
    }

    /// 打印空行
    pub fn print_blank() {
        let _ = stdout().execute(Print("\n"));
    }
}

/// Convenience macro for translation
macro_rules! t {
    ($key:expr) => {
        rust_i18n::t!($key)
    };
    ($key:expr, $($tt:tt)*) => {
        rust_i18n::t!($key, $($tt)*)
    };
}

fn main() -> Result<ExitCode> {
    // Initialize locale based on system settings
    init_locale();

    // Check if we should run in interactive mode
    if should_run_interactive() {
        run_interactive_mode()?;
        return Ok(ExitCode::SUCCESS);
    }

    // Standard CLI mode
    run_cli_mode()
}

/// Run in interactive mode with Ratatui TUI
fn run_interactive_mode() -> Result<()> {
    let exe_dir = get_executable_dir()?;
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let log_path = exe_dir
        .join("Log")
        .join(format!("Interactive_{}.log", timestamp));

    // Setup file-only logging before TUI starts
    let _guard = setup_file_only_logging(&log_path)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Media Triage starting in interactive mode"
    );

    let session_file = exe_dir.join("Config").join(LAST_SESSION_FILE);
    let mut app = TuiApp::new(Some(session_file))?;
    app.set_log_path(log_path.clone());

    match app.run()? {
        Some(result) => {
            info!(
                moved = result.total_moved(),
                failed = result.failed,
                log_file = %log_path.display(),
                "Interactive session complete"
            );
        }
        None => {
            info!("Interactive session ended without a finished scan");
        }
    }

    Ok(())
}

/// Run in standard CLI mode
///
/// A scan that cannot start or aborts yields exit code 1.
fn run_cli_mode() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Sample config needs no logging or validation
    if let Some(ref path) = cli.init_config {
        write_sample_config(path)?;
        cli_output::print_hint(&t!("sample_config_written", path = path.display()));
        return Ok(ExitCode::SUCCESS);
    }

    let exe_dir = get_executable_dir()?;
    let log_path = get_log_path(&exe_dir, &cli);
    let _guard = setup_logging(&cli, &log_path)?;

    info!(version = env!("CARGO_PKG_VERSION"), "Media Triage starting");

    let config = load_config(&cli, &exe_dir)?;
    if config.verbose {
        info!(?config, "Configuration loaded");
    }
    info!(log_file = %log_path.display(), "Log file location");

    let session = Session::new();
    let handle = match session.start(&config) {
        Ok(handle) => handle,
        Err(e) => {
            error!(error = %e, "Scan not started");
            cli_output::print_error(&e.to_string());
            return Ok(ExitCode::FAILURE);
        }
    };

    // Stream messages while the worker runs
    for event in handle.events() {
        match event {
            ScanEvent::Message(line) => cli_output::print_event_line(&line),
            ScanEvent::Progress(_) | ScanEvent::Finished(_) | ScanEvent::Failed(_) => {}
        }
    }

    match handle.join() {
        Ok(result) => {
            print_summary(&result);

            if let Some(ref report) = cli.report {
                result.save_report(report)?;
                info!(report = %report.display(), "Report written");
                cli_output::print_hint(&t!("report_written", path = report.display()));
            }

            cli_output::print_separator();
            cli_output::print_log_path(&t!("log_saved_to"), &log_path.display().to_string());
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!(error = %e, "Scan failed");
            cli_output::print_error(&e.to_string());
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Print the final tally
fn print_summary(result: &ScanResult) {
    use cli_output::*;
    use media_triage::Category;

    print_blank();
    print_separator();
    print_title(&t!("scan_complete_title"));
    print_separator();

    let rows = [
        (t!("stat_screenshots"), Category::Screenshot, CliTheme::WARNING),
        (t!("stat_compressed"), Category::Compressed, CliTheme::WARNING),
        (t!("stat_other"), Category::Other, CliTheme::HINT),
        (t!("stat_duplicates"), Category::Duplicate, CliTheme::ACCENT),
        (t!("stat_sorted"), Category::Sorted, CliTheme::SUCCESS),
    ];
    for (label, category, color) in rows {
        print_stat(&label, &result.count(category).to_string(), color);
    }
    print_stat(&t!("stat_failed"), &result.failed.to_string(), CliTheme::ERROR);
}

/// Write a commented sample configuration
fn write_sample_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, Config::sample_config())?;
    Ok(())
}

/// Get the directory where the executable is located
fn get_executable_dir() -> Result<PathBuf> {
    let exe_path = std::env::current_exe()?;
    Ok(exe_path
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".")))
}

/// Determine the log file path based on config file or timestamp
fn get_log_path(exe_dir: &Path, cli: &Cli) -> PathBuf {
    let log_dir = exe_dir.join("Log");
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");

    if let Some(config_name) = cli.config_name() {
        let config_log_dir = log_dir.join(&config_name);
        let log_filename = format!("{}_{}.log", config_name, timestamp);
        config_log_dir.join(log_filename)
    } else {
        let log_filename = format!("CLIRun_{}.log", timestamp);
        log_dir.join(log_filename)
    }
}

/// Resolve config path - supports shorthand syntax
fn resolve_config_path(exe_dir: &Path, config_path: &Path) -> PathBuf {
    if config_path.exists() {
        return config_path.to_path_buf();
    }

    let with_extension = if config_path.extension().is_none() {
        config_path.with_extension("toml")
    } else {
        config_path.to_path_buf()
    };

    if with_extension.exists() {
        return with_extension;
    }

    let config_dir = exe_dir.join("Config");
    let filename = config_path.file_name().unwrap_or(config_path.as_os_str());

    let mut in_config_dir = config_dir.join(filename);
    if in_config_dir.extension().is_none() {
        in_config_dir = in_config_dir.with_extension("toml");
    }

    if in_config_dir.exists() {
        return in_config_dir;
    }

    config_path.to_path_buf()
}

/// Load configuration from file or CLI arguments
fn load_config(cli: &Cli, exe_dir: &Path) -> Result<Config> {
    let config = if let Some(ref config_path) = cli.config {
        let resolved_path = resolve_config_path(exe_dir, config_path);
        info!(config_file = %resolved_path.display(), "Loading configuration from file");
        let file_config = Config::load_from_file(&resolved_path)?;
        cli.merge_with_config(file_config)
    } else {
        cli.to_config()
    };

    if config.staging_dir.as_os_str().is_empty() || config.archive_dir.as_os_str().is_empty() {
        anyhow::bail!("{}", t!("cli_missing_dirs_error"));
    }

    Ok(config)
}

/// Setup logging for CLI mode (file + console)
fn setup_logging(cli: &Cli, log_path: &Path) -> Result<WorkerGuard> {
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let (non_blocking, guard) = tracing_appender::non_blocking(open_log_file(log_path)?);

    if cli.json_log {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_ansi(false).with_writer(non_blocking))
            .with(console_layer())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
            .with(console_layer())
            .init();
    }

    Ok(guard)
}

/// Console layer on stderr; scan messages are already printed to stdout
fn console_layer<S>() -> impl tracing_subscriber::Layer<S> + Send + Sync + 'static
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(tracing_subscriber::filter::filter_fn(|metadata| {
            metadata.target() != EVENTS_TARGET
        }))
}

/// Setup logging for interactive mode (file only, no console)
fn setup_file_only_logging(log_path: &Path) -> Result<WorkerGuard> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    let (non_blocking, guard) = tracing_appender::non_blocking(open_log_file(log_path)?);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
        .init();

    Ok(guard)
}

/// Create the log file and its folder
fn open_log_file(log_path: &Path) -> Result<std::fs::File> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    Ok(std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(log_path)?)
}
