use clap::builder::{styling::AnsiColor, Styles};
use clap::ColorChoice;
use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use commands::{
    backup_installation, inspect_installation, reset_config, set_backup_dir, set_minecraft_path,
    show_config, BackupArgs, InspectArgs,
};
use miette::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod errors;
mod utils;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Print log output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Back up a Minecraft installation
    Backup {
        /// The .minecraft folder to back up
        #[arg(short, long)]
        minecraft: Option<String>,

        /// The folder to write the backup into
        #[arg(short, long)]
        destination: Option<String>,

        /// Zip the backup into a single archive
        #[arg(short = 'z', long)]
        compress: bool,

        /// Include world saves
        #[arg(long)]
        saves: bool,

        /// Include Xaero's minimap and world map data
        #[arg(long)]
        xaero: bool,

        /// Include Distant Horizons LOD data
        #[arg(long)]
        distant_horizons: bool,

        /// Don't open the backup in the file browser when done
        #[arg(long)]
        no_open: bool,

        /// Don't prompt; use flags and configured defaults
        #[arg(short, long)]
        yes: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show what a Minecraft folder contains and which version it runs
    Inspect {
        /// The .minecraft folder to inspect (defaults to the configured one)
        #[arg(short, long)]
        minecraft: Option<String>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// View or change the saved configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the current configuration
    Show,
    /// Remember the .minecraft folder to back up
    SetMinecraftPath { path: String },
    /// Set the folder backups are written into
    SetBackupDir { path: String },
    /// Reset the configuration to defaults
    Reset,
}

fn parse_args() -> Args {
    // Configure colored/styled help output
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default())
        .placeholder(AnsiColor::Blue.on_default());

    let matches = Args::command()
        .styles(styles)
        .color(ColorChoice::Auto)
        .get_matches();

    Args::from_arg_matches(&matches).expect("failed to parse arguments")
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "totem=debug,totem_backup=info"
    } else {
        "warn"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    // Logs go to stderr so stdout stays clean for --json
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .init();
}

fn main() -> Result<()> {
    let args = parse_args();
    init_logging(args.verbose);

    match args.command {
        Commands::Backup {
            minecraft,
            destination,
            compress,
            saves,
            xaero,
            distant_horizons,
            no_open,
            yes,
            json,
        } => backup_installation(BackupArgs {
            minecraft,
            destination,
            compress,
            saves,
            xaero,
            distant_horizons,
            no_open,
            yes,
            json,
        }),
        Commands::Inspect { minecraft, json } => {
            inspect_installation(InspectArgs { minecraft, json })
        }
        Commands::Config { command } => match command {
            ConfigCommands::Show => show_config(),
            ConfigCommands::SetMinecraftPath { path } => set_minecraft_path(path),
            ConfigCommands::SetBackupDir { path } => set_backup_dir(path),
            ConfigCommands::Reset => reset_config(),
        },
    }
}
