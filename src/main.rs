use byfort::application::engine::{SendRequest, TopUpRequest, WalletEngine, WithdrawRequest};
use byfort::domain::ports::{
    NotificationSinkBox, NotificationStoreBox, TransactionStoreBox, UserStoreBox,
};
use byfort::error::WalletError;
use byfort::infrastructure::in_memory::{
    InMemoryNotificationStore, InMemoryTransactionStore, InMemoryUserStore,
};
use byfort::interfaces::csv::report_writer::ReportWriter;
use byfort::interfaces::csv::script_reader::{OpKind, ScriptReader, ScriptRow};
use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input operations CSV file
    input: PathBuf,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let engine = build_engine(cli.db_path)?;

    // Replay operations
    let file = File::open(cli.input).into_diagnostic()?;
    let reader = ScriptReader::new(file);
    for row_result in reader.rows() {
        match row_result {
            Ok(row) => {
                if let Err(e) = apply(&engine, row).await {
                    eprintln!("Error applying operation: {}", e);
                }
            }
            Err(e) => {
                eprintln!("Error reading operation: {}", e);
            }
        }
    }

    // Output final balances
    let users = engine.users().await.into_diagnostic()?;
    let stdout = io::stdout();
    let mut writer = ReportWriter::new(stdout.lock());
    writer.write_users(users).into_diagnostic()?;

    Ok(())
}

fn build_engine(db_path: Option<PathBuf>) -> Result<WalletEngine> {
    if let Some(db_path) = db_path {
        // Use persistent storage (RocksDB)
        #[cfg(feature = "storage-rocksdb")]
        {
            let store =
                byfort::infrastructure::rocksdb::RocksDBStore::open(db_path).into_diagnostic()?;

            let users: UserStoreBox = Box::new(store.clone());
            let transactions: TransactionStoreBox = Box::new(store.clone());
            let notifications: NotificationStoreBox = Box::new(store.clone());
            let notifier: NotificationSinkBox = Box::new(store);

            return Ok(WalletEngine::new(users, transactions, notifications, notifier));
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        {
            let _ = db_path;
            eprintln!(
                "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
            );
        }
    }

    // Use in-memory storage
    let inbox = InMemoryNotificationStore::new();
    let users: UserStoreBox = Box::new(InMemoryUserStore::new());
    let transactions: TransactionStoreBox = Box::new(InMemoryTransactionStore::new());
    let notifications: NotificationStoreBox = Box::new(inbox.clone());
    let notifier: NotificationSinkBox = Box::new(inbox);

    Ok(WalletEngine::new(users, transactions, notifications, notifier))
}

async fn apply(engine: &WalletEngine, row: ScriptRow) -> byfort::error::Result<()> {
    match row.op {
        OpKind::Register => {
            let name = required(row.name, "name")?;
            let pin = row.reference.unwrap_or_else(|| "123456".to_string());
            engine.register(&row.phone, &pin, &name).await?;
        }
        OpKind::Topup => {
            let user = engine.user_by_phone(&row.phone).await?;
            engine
                .top_up(TopUpRequest {
                    user_id: user.id,
                    sender_name: row.name.unwrap_or_else(|| user.name.clone()),
                    bank_name: required(row.bank, "bank")?,
                    account_number: required(row.account, "account")?,
                    original_amount: required_amount(row.amount)?,
                    proof_image: required(row.reference, "reference")?,
                })
                .await?;
        }
        OpKind::Withdraw => {
            let user = engine.user_by_phone(&row.phone).await?;
            engine
                .withdraw(WithdrawRequest {
                    user_id: user.id,
                    recipient_name: row.name.unwrap_or_else(|| user.name.clone()),
                    bank_name: required(row.bank, "bank")?,
                    account_number: required(row.account, "account")?,
                    original_amount: required_amount(row.amount)?,
                })
                .await?;
        }
        OpKind::Send => {
            let user = engine.user_by_phone(&row.phone).await?;
            engine
                .send(SendRequest {
                    user_id: user.id,
                    recipient_phone: required(row.to, "to")?,
                    original_amount: required_amount(row.amount)?,
                    notes: row.note,
                })
                .await?;
        }
        OpKind::Approve => {
            let tx_id = oldest_pending(engine, &row.phone).await?;
            engine.approve(tx_id).await?;
        }
        OpKind::Reject => {
            let tx_id = oldest_pending(engine, &row.phone).await?;
            engine.reject(tx_id).await?;
        }
    }
    Ok(())
}

fn required(value: Option<String>, column: &str) -> byfort::error::Result<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| WalletError::Validation(format!("{column} column is required")))
}

fn required_amount(value: Option<i64>) -> byfort::error::Result<i64> {
    value.ok_or_else(|| WalletError::Validation("amount column is required".to_string()))
}

/// Scripts cannot carry generated transaction ids, so admin rows resolve the
/// named user's oldest pending transaction.
async fn oldest_pending(engine: &WalletEngine, phone: &str) -> byfort::error::Result<Uuid> {
    let user = engine.user_by_phone(phone).await?;
    let pending = engine.pending().await?;
    pending
        .iter()
        .rev()
        .find(|tx| tx.user_id == user.id)
        .map(|tx| tx.id)
        .ok_or_else(|| WalletError::NotFound("pending transaction".to_string()))
}
