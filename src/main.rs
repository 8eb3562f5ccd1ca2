use clap::{Parser, ValueEnum};
use miette::{IntoDiagnostic, Result};
use splitledger::application::groups::GroupService;
use splitledger::application::owings::OwingsService;
use splitledger::application::payments::PaymentService;
use splitledger::domain::balance::Balance;
use splitledger::domain::ids::MemberId;
use splitledger::domain::ports::{DirectoryBox, GroupStoreBox, GroupStoreFactory};
use splitledger::error::LedgerError;
use splitledger::infrastructure::in_memory::{InMemoryDirectory, InMemoryGroupStore};
use splitledger::interfaces::csv::balance_writer::BalanceWriter;
use splitledger::interfaces::json::ledger_reader::{LedgerFile, LedgerReader};
use splitledger::interfaces::response::ErrorResponse;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Ledger JSON file with users, groups and payments
    input: PathBuf,

    /// Name of the group to report owings for
    #[arg(long)]
    group: String,

    /// Member the owings are computed relative to
    #[arg(long)]
    member: u64,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,
}

struct Services {
    groups: GroupService,
    payments: PaymentService,
    owings: OwingsService,
}

impl Services {
    fn new(factory: &GroupStoreFactory, directory: InMemoryDirectory) -> Self {
        let groups_directory: DirectoryBox = Box::new(directory.clone());
        let owings_directory: DirectoryBox = Box::new(directory);
        Self {
            groups: GroupService::new(factory(), groups_directory),
            payments: PaymentService::new(factory()),
            owings: OwingsService::new(factory(), owings_directory),
        }
    }
}

fn in_memory_factory() -> GroupStoreFactory {
    let store = InMemoryGroupStore::new();
    Box::new(move || Box::new(store.clone()) as GroupStoreBox)
}

#[cfg(feature = "storage-rocksdb")]
fn store_factory(db_path: Option<PathBuf>) -> Result<GroupStoreFactory> {
    use splitledger::infrastructure::rocksdb::RocksDBStore;

    match db_path {
        Some(path) => {
            let store = RocksDBStore::open(path).into_diagnostic()?;
            Ok(Box::new(move || Box::new(store.clone()) as GroupStoreBox))
        }
        None => Ok(in_memory_factory()),
    }
}

#[cfg(not(feature = "storage-rocksdb"))]
fn store_factory(db_path: Option<PathBuf>) -> Result<GroupStoreFactory> {
    if let Some(path) = db_path {
        tracing::warn!(
            db_path = %path.display(),
            "storage-rocksdb feature is not enabled, falling back to in-memory storage"
        );
        eprintln!(
            "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
        );
    }
    Ok(in_memory_factory())
}

/// Feeds every group and payment of the ledger through the services.
///
/// Groups that already exist (by name) get their roster refreshed. Rejected
/// entries are reported and skipped.
async fn import_ledger(services: &Services, ledger: &LedgerFile) {
    for entry in &ledger.groups {
        let draft = entry.draft();
        let result = match services.groups.find_group_by_name(&entry.name).await {
            Ok(existing) => services.groups.update_group(existing.id, draft).await,
            Err(LedgerError::NotFound(_)) => services.groups.create_group(draft).await,
            Err(e) => Err(e),
        };

        let group = match result {
            Ok(group) => group,
            Err(e) => {
                eprintln!("Error loading group '{}': {}", entry.name, e);
                continue;
            }
        };

        for payment in &entry.payments {
            if let Err(e) = services
                .payments
                .create_payment(group.id, payment.draft(), payment.creator)
                .await
            {
                eprintln!(
                    "Error loading payment '{}' in group '{}': {}",
                    payment.description, entry.name, e
                );
            }
        }
    }
}

async fn report(services: &Services, group: &str, member: MemberId) -> Result<Vec<Balance>, LedgerError> {
    let group = services.groups.find_group_by_name(group).await?;
    services.owings.member_owings(group.id, member).await
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let file = File::open(&cli.input).into_diagnostic()?;
    let ledger = LedgerReader::new(file).read().into_diagnostic()?;

    let directory = InMemoryDirectory::from_entries(
        ledger
            .users
            .iter()
            .map(|user| (user.id, user.name.clone())),
    );
    let factory = store_factory(cli.db_path)?;
    let services = Services::new(&factory, directory);

    import_ledger(&services, &ledger).await;

    let balances = match report(&services, &cli.group, MemberId(cli.member)).await {
        Ok(balances) => balances,
        Err(e) => {
            let body = serde_json::to_string(&ErrorResponse::from(&e)).into_diagnostic()?;
            eprintln!("{}", body);
            return Err(e).into_diagnostic();
        }
    };

    let stdout = io::stdout();
    match cli.format {
        OutputFormat::Csv => {
            let mut writer = BalanceWriter::new(stdout.lock());
            writer.write_balances(&balances).into_diagnostic()?;
        }
        OutputFormat::Json => {
            let mut out = stdout.lock();
            serde_json::to_writer_pretty(&mut out, &balances).into_diagnostic()?;
            writeln!(out).into_diagnostic()?;
        }
    }

    Ok(())
}
