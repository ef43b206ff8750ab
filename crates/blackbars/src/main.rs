mod commands;

use clap::{Parser, Subcommand};

use commands::run::RunArgs;

#[derive(Parser)]
#[command(
    name = "blackbars",
    version,
    about = "Blacks out everything around your game window and hides the taskbar"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Watch for monitored windows and show the backdrop (default)
    Run(RunArgs),
    /// Create the default configuration file
    Init,
    /// List visible windows and whether they are monitored
    List {
        /// Config file to read monitored titles from
        #[arg(long, value_name = "PATH")]
        config: Option<std::path::PathBuf>,
    },
    /// Watch window events in real time
    Events,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        None => commands::run::execute(&RunArgs::default()),
        Some(Commands::Run(args)) => commands::run::execute(&args),
        Some(Commands::Init) => commands::init::execute(),
        Some(Commands::List { config }) => commands::list::execute(config.as_deref()),
        Some(Commands::Events) => commands::events::execute(),
    }
}
