use std::path::PathBuf;

use blackbars_core::{Config, WindowResult, config, log};

#[derive(clap::Args, Debug, Default)]
pub struct RunArgs {
    /// Window titles to monitor, replacing the configured ones
    #[arg(long, value_name = "TITLE", num_args = 1..)]
    pub titles: Vec<String>,

    /// Config file to load instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Do not show the notification-area icon
    #[arg(long)]
    pub no_tray: bool,

    /// Log every window event
    #[arg(short, long)]
    pub verbose: bool,
}

/// Runs in the foreground until Ctrl+C or tray Exit.
///
/// Exits with status 1 when the event hooks cannot be installed; the
/// desktop has been restored by then.
pub fn execute(args: &RunArgs) {
    let mut config = config::load(args.config.as_deref()).with_titles(args.titles.clone());
    if args.no_tray {
        config.tray = false;
    }
    if args.verbose {
        config.logging.level = "debug".into();
    }
    log::init(&config.logging, true);

    if let Err(e) = watch(&config) {
        blackbars_core::log_error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(windows)]
fn watch(config: &Config) -> WindowResult<()> {
    blackbars_windows::run(config)
}

#[cfg(not(windows))]
fn watch(_config: &Config) -> WindowResult<()> {
    super::unsupported()
}
