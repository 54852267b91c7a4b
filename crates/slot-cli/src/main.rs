mod cmd;
mod output;
mod shell;

use clap::{ArgAction, Parser, Subcommand};
use slot_core::paths::STORE_FILE_ENV;

#[derive(Parser)]
#[command(
    name = "slot",
    about = "Save and render named shell command slots",
    long_about = "Save command templates with {{.variable}} placeholders and tags, \
                  then render them with values filled in. Use `slot init` to let \
                  the shell place rendered commands into the prompt.",
    version,
    propagate_version = true
)]
struct Cli {
    /// Store file (default: ~/.config/slot/slots.yaml)
    #[arg(long, global = true, env = STORE_FILE_ENV, value_name = "PATH")]
    file: Option<String>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Save a named command slot
    Save {
        name: String,
        /// Command template; use {{.name}} for placeholders
        command: String,
        /// Tags for the slot (repeatable or comma-separated)
        #[arg(long = "tags", alias = "tag", short = 't', value_delimiter = ',')]
        tags: Vec<String>,
        /// Free-text description
        #[arg(long, short = 'd')]
        description: Option<String>,
        /// Overwrite an existing slot
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// List saved slots
    #[command(visible_alias = "ls")]
    List {
        /// Only show slots carrying this tag (repeatable, all must match)
        #[arg(long = "tag", short = 't', value_delimiter = ',')]
        tags: Vec<String>,
        /// Tab-separated output for scripts and completions
        #[arg(long, conflicts_with = "wide")]
        tsv: bool,
        /// Do not truncate long commands
        #[arg(long, short = 'w')]
        wide: bool,
    },

    /// Show a single slot in full
    Show { name: String },

    /// Delete a slot
    #[command(visible_aliases = ["rm", "delete"])]
    Remove { name: String },

    /// Render a slot, substituting placeholders with key=value bindings
    #[command(visible_alias = "run")]
    Render {
        name: String,
        /// Bindings as key=value
        bindings: Vec<String>,
        /// Additional binding as KEY=VAL (repeatable)
        #[arg(long = "with", value_name = "KEY=VAL")]
        with: Vec<String>,
        /// Arguments after `--`, available as CLI_ARGS and CLI_ARGS_SPLIT
        #[arg(last = true)]
        args: Vec<String>,
    },

    /// Print the store file location
    Path,

    /// Print shell integration for bash or zsh
    Init {
        shell: String,
        /// Also bind a fuzzy-finder (fzf) slot picker
        #[arg(long)]
        fzf: bool,
    },

    /// Print a completion script for bash or zsh
    Completions { shell: String },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let result = dispatch(cli);

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn dispatch(cli: Cli) -> anyhow::Result<()> {
    // Shell assets need no store.
    match &cli.command {
        Commands::Init { shell, fzf } => return cmd::init::integration(shell, *fzf),
        Commands::Completions { shell } => return cmd::init::completions(shell),
        _ => {}
    }

    let store = cmd::open_store(cli.file.as_deref())?;
    let json = cli.json;

    match cli.command {
        Commands::Save {
            name,
            command,
            tags,
            description,
            force,
        } => cmd::save::run(
            &store,
            cmd::save::SaveArgs {
                name,
                command,
                tags,
                description,
                force,
            },
            json,
        ),
        Commands::List { tags, tsv, wide } => cmd::list::run(&store, &tags, tsv, wide, json),
        Commands::Show { name } => cmd::show::run(&store, &name, json),
        Commands::Remove { name } => cmd::remove::run(&store, &name, json),
        Commands::Render {
            name,
            bindings,
            with,
            args,
        } => cmd::render::run(&store, &name, &bindings, &with, &args),
        Commands::Path => cmd::path::run(&store, json),
        Commands::Init { .. } | Commands::Completions { .. } => Ok(()),
    }
}
