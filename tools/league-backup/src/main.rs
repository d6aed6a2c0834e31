use std::{
    io::{BufRead, Write},
    path::PathBuf,
    process::ExitCode,
};

use chrono::Local;
use clap::{Parser, Subcommand};
use league_backup::{
    BackupConfig, BackupError, BackupInfo, create_backup, list_backups, restore_backup,
};
use log::LevelFilter;
use log4rs::{
    Config,
    append::console::{ConsoleAppender, Target},
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
};

#[derive(Parser)]
#[command(name = "league-backup")]
#[command(about = "Back up, list and restore the league database")]
struct Cli {
    #[arg(long, env = "LEAGUE_DB_PATH", default_value = "instance/league.db")]
    db_path: PathBuf,

    #[arg(long, env = "LEAGUE_BACKUP_DIR", default_value = "backups")]
    backup_dir: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy the database into the backup directory
    Backup,
    /// List backups, newest first
    List,
    /// Replace the database with a backup
    Restore {
        /// File name inside the backup directory
        file: String,
    },
}

fn init_logger() {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("{l} - {m}\n")))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(LevelFilter::Warn))
        .expect("Invalid logger configuration");
    let _handle = log4rs::init_config(config).expect("Failed to initialize logger");
}

async fn run_backup(config: &BackupConfig) -> Result<(), BackupError> {
    let created = create_backup(config, Local::now()).await?;
    println!("Backup created: {}", created.info.path.display());
    println!("Size: {:.2} MB", created.info.size_mb());
    println!("Date: {}", created.info.modified.format("%d/%m/%Y %H:%M:%S"));
    if let Some(report) = &created.report {
        let counts: Vec<String> = report
            .statistics
            .iter()
            .map(|(table, count)| format!("{}={}", table, count))
            .collect();
        println!("Report written ({})", counts.join(", "));
    }
    if created.removed > 0 {
        println!("{} old backups removed", created.removed);
    }
    Ok(())
}

fn print_backups(backups: &[BackupInfo]) {
    if backups.is_empty() {
        println!("No backups found");
        return;
    }
    println!("{} backup(s) found:", backups.len());
    println!("{}", "=".repeat(60));
    for backup in backups {
        println!("{}", backup.file_name);
        println!("   Size: {:.2} MB", backup.size_mb());
        println!("   Date: {}", backup.modified.format("%d/%m/%Y %H:%M:%S"));
        println!("{}", "-".repeat(40));
    }
}

fn run_list(config: &BackupConfig) -> Result<(), BackupError> {
    print_backups(&list_backups(config)?);
    Ok(())
}

fn run_restore(config: &BackupConfig, file: &str) -> Result<(), BackupError> {
    let restored = restore_backup(config, file, Local::now())?;
    if let Some(safety_copy) = restored.safety_copy {
        println!("Current database saved as {}", safety_copy.display());
    }
    println!("Restored {} -> {}", file, config.db_path.display());
    println!("Restart the server to see the changes");
    Ok(())
}

fn prompt(stdin: &mut impl BufRead, question: &str) -> Option<String> {
    print!("{}", question);
    std::io::stdout().flush().ok()?;
    let mut line = String::new();
    match stdin.read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim().to_string()),
    }
}

async fn interactive(config: &BackupConfig) -> Result<(), BackupError> {
    let mut stdin = std::io::stdin().lock();
    loop {
        println!();
        println!("1. Create a backup");
        println!("2. List backups");
        println!("3. Restore a backup");
        println!("4. Quit");
        let Some(choice) = prompt(&mut stdin, "\nChoice (1-4): ") else {
            return Ok(());
        };
        let result = match choice.as_str() {
            "1" => run_backup(config).await,
            "2" => run_list(config),
            "3" => {
                if let Err(e) = run_list(config) {
                    eprintln!("{}", e);
                }
                match prompt(&mut stdin, "\nFile to restore (or 'q' to cancel): ") {
                    Some(file) if !file.is_empty() && !file.eq_ignore_ascii_case("q") => {
                        run_restore(config, &file)
                    }
                    _ => Ok(()),
                }
            }
            "4" => return Ok(()),
            _ => {
                println!("Invalid choice");
                Ok(())
            }
        };
        if let Err(e) = result {
            eprintln!("{}", e);
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_logger();

    let cli = Cli::parse();
    let config = BackupConfig::new(cli.db_path, cli.backup_dir);

    let result = match cli.command {
        Some(Commands::Backup) => run_backup(&config).await,
        Some(Commands::List) => run_list(&config),
        Some(Commands::Restore { file }) => run_restore(&config, &file),
        None => interactive(&config).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
