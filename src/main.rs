use clap::Parser;

use smart_ledger::cli::{self, Cli, Commands};
use smart_ledger::logging;

fn main() {
    logging::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { data_dir } => cli::init::run(data_dir),
        Commands::Categories => cli::categories::list(),
        Commands::Capture {
            file,
            set,
            suggest,
            merge,
        } => cli::capture::run(&file, &set, &suggest, merge),
        Commands::Check { file } => cli::check::run(&file),
        Commands::Resume { file, force } => cli::resume::run(&file, force),
        Commands::Status => cli::status::run(),
        Commands::Backup => cli::backup::create(),
        Commands::Backups => cli::backup::list(),
        Commands::Restore { path, apply } => cli::backup::restore(&path, apply),
        Commands::Clear => cli::clear::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
