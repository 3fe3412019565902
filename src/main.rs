use anyhow::Result;
use clap::{Parser, Subcommand};

use expense_grid::cli::{
    handle_advise_command, handle_backup_command, handle_config_command, handle_expense_command,
    handle_export_command, handle_grid_command, handle_history_command, handle_year_command,
    AdviseArgs, BackupCommands, ConfigArgs, ExpenseCommands, ExportCommands, GridArgs,
    YearCommands,
};
use expense_grid::config::{paths::GridPaths, settings::Settings};
use expense_grid::storage::Storage;

#[derive(Parser)]
#[command(
    name = "expgrid",
    version,
    about = "Yearly expense grid with paid-month tracking",
    long_about = "expgrid keeps a grid of recurring and one-off expenses against the \
                  twelve months of a year. Mark months paid, forecast blank months \
                  from what you already paid, and carry the grid into the next year."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory
    Init,

    /// Show or change configuration
    Config(ConfigArgs),

    /// Expense row commands
    #[command(subcommand, alias = "exp")]
    Expense(ExpenseCommands),

    /// Show the year grid
    Grid(GridArgs),

    /// Year selection and bulk year operations
    #[command(subcommand)]
    Year(YearCommands),

    /// Ask the advisor about a year's spending
    Advise(AdviseArgs),

    /// Export data
    #[command(subcommand)]
    Export(ExportCommands),

    /// Backup management
    #[command(subcommand)]
    Backup(BackupCommands),

    /// Show recent changes
    History {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let paths = GridPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Init) => {
            let already = storage.is_initialized();
            settings.save(&paths)?;
            if already {
                println!("Already initialized at: {}", paths.base_dir().display());
            } else {
                println!("Initialized expense-grid at: {}", paths.base_dir().display());
                println!();
                println!("Add your first expense with:");
                println!("  expgrid expense add \"Rent\" 1200 --day 5");
            }
        }
        Some(Commands::Config(args)) => {
            handle_config_command(&storage, &paths, &mut settings, args)?;
        }
        Some(Commands::Expense(cmd)) => {
            handle_expense_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Grid(args)) => {
            handle_grid_command(&storage, &settings, args)?;
        }
        Some(Commands::Year(cmd)) => {
            handle_year_command(&storage, &paths, &mut settings, cmd)?;
        }
        Some(Commands::Advise(args)) => {
            handle_advise_command(&storage, &settings, args)?;
        }
        Some(Commands::Export(cmd)) => {
            handle_export_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Backup(cmd)) => {
            handle_backup_command(&paths, &settings, cmd)?;
        }
        Some(Commands::History { limit }) => {
            handle_history_command(&storage, limit)?;
        }
        None => {
            handle_grid_command(&storage, &settings, GridArgs { year: None, policy: None })?;
        }
    }

    Ok(())
}
