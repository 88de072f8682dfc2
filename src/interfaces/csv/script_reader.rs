use crate::error::{Result, WalletError};
use serde::Deserialize;
use std::io::Read;

/// One operation in a replay script.
#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum OpKind {
    Register,
    Topup,
    Withdraw,
    Send,
    Approve,
    Reject,
}

/// A parsed script row. Which columns are required depends on the op:
/// `register` needs `name` (and `reference` as the PIN), `topup` needs bank
/// details plus `reference` as the transfer proof, `send` needs `to`, and
/// `approve`/`reject` act on the named user's oldest pending transaction.
#[derive(Debug, Deserialize, Clone)]
pub struct ScriptRow {
    pub op: OpKind,
    pub phone: String,
    pub to: Option<String>,
    pub name: Option<String>,
    pub bank: Option<String>,
    pub account: Option<String>,
    pub amount: Option<i64>,
    pub note: Option<String>,
    pub reference: Option<String>,
}

/// Reads wallet operations from a CSV source.
///
/// This reader wraps `csv::Reader` and provides an iterator over
/// `Result<ScriptRow>`. It handles whitespace trimming and flexible record
/// lengths automatically.
pub struct ScriptReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> ScriptReader<R> {
    /// Creates a new `ScriptReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes rows, so large
    /// scripts stream without loading the whole file.
    pub fn rows(self) -> impl Iterator<Item = Result<ScriptRow>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(WalletError::from))
    }
}
