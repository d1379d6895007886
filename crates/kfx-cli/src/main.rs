use clap::{Parser, Subcommand};
use kfx::commands::{
    config::{self, ConfigAction},
    export::{self, ExportCommand},
    installs::{self, InstallsAction},
    parse::{self, ParseCommand},
    tokens::{self, TokensCommand},
};
use kfx::{init_tracing, GlobalOpts};
use kfx_logger as logger;

#[derive(Parser)]
#[command(name = "kfx")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Knopflerfish xargs tool",
    long_about = "kfx reads Knopflerfish .xargs launch files, expands their includes and resolves bundle locations."
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse an xargs file and print the resulting configuration
    Parse(ParseCommand),
    /// Print the include-expanded tokens of an xargs file
    Tokens(TokensCommand),
    /// Parse an xargs file and write it back out with resolved locations
    Export(ExportCommand),
    /// Configure kfx
    #[command(subcommand_required = false, arg_required_else_help = false)]
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
    /// Manage known framework installs
    Installs {
        #[command(subcommand)]
        action: InstallsAction,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logger::init_with_verbosity(cli.global.verbosity_level(), cli.global.quiet) {
        eprintln!("Warning: Failed to initialize logger: {}", e);
    }
    init_tracing(cli.global.verbosity_level());

    let result = match cli.command {
        Commands::Parse(cmd) => parse::handle_parse(cmd, cli.global),
        Commands::Tokens(cmd) => tokens::handle_tokens(cmd, cli.global),
        Commands::Export(cmd) => export::handle_export(cmd, cli.global),
        Commands::Config { action } => config::handle_config(action, cli.global),
        Commands::Installs { action } => installs::handle_installs(action, cli.global),
    };

    if let Err(e) = result {
        logger::error(&e.to_string());
        std::process::exit(1);
    }
}
