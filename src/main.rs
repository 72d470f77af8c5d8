use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use fairshare::cli::{
    handle_balance_command, handle_expense_command, handle_member_command, handle_receipt_command,
    handle_split_command, ExpenseCommands, MemberCommands, ReceiptCommands, SplitArgs,
};
use fairshare::config::{paths::FairsharePaths, settings::Settings};
use fairshare::storage::Storage;

#[derive(Parser)]
#[command(
    name = "fairshare",
    version,
    about = "Split shared expenses and settle receipts item by item",
    long_about = "FairShare splits group expenses equally, by exact amounts, \
                  by percentage or by shares. Receipt lines can be claimed in \
                  whole or in part, and tax and tip are spread over what each \
                  member claimed."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate a split without recording it
    Split(SplitArgs),

    /// Receipt and claim commands
    #[command(subcommand)]
    Receipt(ReceiptCommands),

    /// Group member commands
    #[command(subcommand)]
    Member(MemberCommands),

    /// Expense and settlement commands
    #[command(subcommand)]
    Expense(ExpenseCommands),

    /// Show who owes whom
    Balance {
        /// Color the net column
        #[arg(long)]
        color: bool,
    },

    /// Show recent audit log entries
    Log {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Initialize the data directory
    Init,

    /// Show current configuration and paths
    Config,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("FAIRSHARE_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let paths = FairsharePaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    debug!(base_dir = %paths.base_dir().display(), "resolved paths");

    let mut storage = Storage::new(paths.clone())?;
    if !settings.audit_enabled {
        storage = storage.without_audit();
    }
    storage.load_all()?;

    match cli.command {
        Some(Commands::Split(args)) => handle_split_command(&storage, &settings, args)?,
        Some(Commands::Receipt(cmd)) => handle_receipt_command(&storage, &settings, cmd)?,
        Some(Commands::Member(cmd)) => handle_member_command(&storage, cmd)?,
        Some(Commands::Expense(cmd)) => handle_expense_command(&storage, &settings, cmd)?,
        Some(Commands::Balance { color }) => handle_balance_command(&storage, &settings, color)?,
        Some(Commands::Log { limit }) => match storage.audit() {
            Some(logger) => {
                let entries = logger.read_recent(limit)?;
                if entries.is_empty() {
                    println!("Audit log is empty.");
                }
                for entry in entries {
                    println!("{}", entry.format_human_readable());
                }
            }
            None => println!("Audit logging is disabled."),
        },
        Some(Commands::Init) => {
            println!("Initializing FairShare at: {}", paths.base_dir().display());
            storage.save_all()?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Next: add members with 'fairshare member add <name>'.");
        }
        Some(Commands::Config) => {
            println!("FairShare Configuration");
            println!("=======================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Data directory: {}", paths.data_dir().display());
            println!("Audit log:      {}", paths.audit_log().display());
            println!("Initialized:    {}", paths.is_initialized());
            println!();
            println!("Settings:");
            println!("  Currency symbol:      {}", settings.currency_symbol);
            println!("  Default claim source: {}", settings.default_claim_source);
            println!("  Audit enabled:        {}", settings.audit_enabled);
        }
        None => {
            println!("FairShare - shared expense splitting");
            println!();
            println!("Run 'fairshare --help' for usage information.");
        }
    }

    Ok(())
}
