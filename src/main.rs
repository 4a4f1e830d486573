use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use homedash::cli::customize::CustomizeAction;
use homedash::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Fetch every feed once and print the dashboard
    Show,
    /// Keep the dashboard on screen, refreshing on an interval
    Watch,
    /// Inspect or change the widget order and visibility
    Customize {
        #[command(subcommand)]
        action: CustomizeCommands,
    },
}

#[derive(Subcommand)]
enum CustomizeCommands {
    /// Print the resolved widget list
    Show,
    /// Store a new widget order
    Set {
        /// Widget page names, in display order
        #[arg(required = true)]
        widgets: Vec<String>,
    },
    /// Hide a widget
    Hide { widget: String },
    /// Show a previously hidden widget
    Unhide { widget: String },
    /// Forget the stored customization
    Reset,
}

impl From<CustomizeCommands> for CustomizeAction {
    fn from(cmd: CustomizeCommands) -> CustomizeAction {
        match cmd {
            CustomizeCommands::Show => CustomizeAction::Show,
            CustomizeCommands::Set { widgets } => CustomizeAction::Set(widgets),
            CustomizeCommands::Hide { widget } => CustomizeAction::Hide(widget),
            CustomizeCommands::Unhide { widget } => CustomizeAction::Unhide(widget),
            CustomizeCommands::Reset => CustomizeAction::Reset,
        }
    }
}

impl From<Commands> for homedash::AppCommand {
    fn from(cmd: Commands) -> homedash::AppCommand {
        match cmd {
            Commands::Show => homedash::AppCommand::Show,
            Commands::Watch => homedash::AppCommand::Watch,
            Commands::Customize { action } => homedash::AppCommand::Customize(action.into()),
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => homedash::cli::setup::setup(),
        Some(cmd) => homedash::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
