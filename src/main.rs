//! Command-line keyring cleaner built on the `keywarden` library.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use keywarden::{
    backup_keyring, scan, AuditCriteria, AuditMode, Auditor, BackupOptions, KeyIdList, Keyring,
    ScanEvent, ScanOptions,
};

#[derive(Parser, Debug)]
#[command(name = "keywarden", version)]
#[command(about = "Clean up and manage your GPG keyring", long_about = None)]
struct Cli {
    /// Remove revoked keys
    #[arg(short, long)]
    revoked: bool,

    /// Remove expired keys
    #[arg(short, long)]
    expired: bool,

    /// Remove keys with validity at or below N
    #[arg(short = 'v', long, value_name = "N", num_args = 0..=1, default_missing_value = "0")]
    not_valid: Option<u8>,

    /// Remove keys with owner trust at or below N
    #[arg(short = 't', long, value_name = "N", num_args = 0..=1, default_missing_value = "0")]
    not_trusted: Option<u8>,

    /// Remove keys listed in FILE (one key ID per line)
    #[arg(short = 'l', long, value_name = "FILE")]
    listed: Option<PathBuf>,

    /// Remove keys NOT listed in FILE (exclusion list)
    #[arg(short = 'x', long, value_name = "FILE")]
    not_listed: Option<PathBuf>,

    /// Remove a key as soon as any single criterion matches
    #[arg(short = 'o', long = "any")]
    any: bool,

    /// Back up the public ring files to DIR first (prompts if DIR omitted)
    #[arg(short, long, value_name = "DIR")]
    backup: Option<Option<PathBuf>>,

    /// Print keyring statistics by validity and owner trust
    #[arg(short, long)]
    stats: bool,

    /// Don't print so much
    #[arg(short, long)]
    quiet: bool,

    /// Answer all questions with yes
    #[arg(short, long)]
    yes: bool,

    /// Don't actually delete anything
    #[arg(short, long)]
    dry_run: bool,

    /// GPG home directory (default: ~/.gnupg)
    #[arg(long, value_name = "DIR")]
    homedir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("keywarden: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> keywarden::Result<ExitCode> {
    let criteria = AuditCriteria {
        mode: if cli.any {
            AuditMode::AnyCriterion
        } else {
            AuditMode::AllCriteria
        },
        revoked: cli.revoked,
        expired: cli.expired,
        max_validity: cli.not_valid,
        max_trust: cli.not_trusted,
        allow_list: match &cli.listed {
            Some(path) => Some(KeyIdList::load(path).await?),
            None => None,
        },
        deny_list: match &cli.not_listed {
            Some(path) => Some(KeyIdList::load(path).await?),
            None => None,
        },
    };

    let keyring = match &cli.homedir {
        Some(dir) => Keyring::with_homedir(dir.clone()),
        None => Keyring::new(),
    };

    if let Some(destination) = &cli.backup {
        let destination = match destination {
            Some(dir) => dir.clone(),
            None => prompt_backup_destination(),
        };
        let options = BackupOptions {
            destination,
            assume_yes: cli.yes,
        };
        let copied = backup_keyring(keyring.homedir(), &options, ask_user).await?;
        println!(
            "Successfully backed up {}",
            copied
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(" and ")
        );
    }

    let stats_only = criteria.is_empty();
    if stats_only && !cli.stats {
        if cli.backup.is_some() {
            // backup-only invocation
            return Ok(ExitCode::SUCCESS);
        }
        eprintln!("keywarden: no deletion criteria given (see --help)");
        return Ok(ExitCode::from(2));
    }

    let auditor = Auditor::new(criteria);

    if !cli.yes && !stats_only && !ask_user(&auditor.confirmation_question()) {
        println!("Bye");
        return Ok(ExitCode::SUCCESS);
    }

    if !cli.quiet {
        println!("{}", keyring.engine_version().await?);
        println!("home={}", keyring.homedir().display());
        println!();
    }

    let options = ScanOptions {
        dry_run: cli.dry_run,
        stats: cli.stats,
    };
    let quiet = cli.quiet;
    let report = scan(&keyring, &auditor, &options, |event| {
        match event {
            ScanEvent::Matched(key) if !quiet => println!("{}", key.summary()),
            ScanEvent::Deleted(_) if !quiet => println!("\t=> deleted key"),
            // always say why a matched key survived, even in quiet mode
            ScanEvent::SecretKeySkipped(_) => println!("\t=> skipping secret key"),
            ScanEvent::DeleteFailed(_) => eprintln!("\t=> unknown error occurred"),
            _ => {}
        }
    })
    .await?;

    if let Some(stats) = &report.stats {
        print!("{stats}");
    }
    if !stats_only && !cli.dry_run {
        println!("Deleted {} key(s).", report.deleted);
    }

    Ok(ExitCode::SUCCESS)
}

/// Asks a yes/no question on the terminal.
fn ask_user(question: &str) -> bool {
    print!("{question} [y/n] ");
    let _ = io::stdout().flush();

    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    answer.trim().eq_ignore_ascii_case("y")
}

fn prompt_backup_destination() -> PathBuf {
    print!("Where should I put the backup? ");
    let _ = io::stdout().flush();

    let mut answer = String::new();
    let _ = io::stdin().lock().read_line(&mut answer);
    let answer = answer.trim();
    if answer.is_empty() {
        PathBuf::from("backup")
    } else {
        PathBuf::from(answer)
    }
}
