use thiserror::Error;

/// Why a validator voted no. The `Display` text is the vote's `reason`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("malformed quorum: {0}")]
    MalformedQuorum(&'static str),

    #[error("not a member of this transaction's quorum")]
    NotInQuorum,

    #[error("transaction id mismatch")]
    IdMismatch,

    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error("transaction has no amount")]
    MissingAmount,

    #[error("sender ledger is not an owner ledger")]
    WrongLedgerType,

    #[error("insufficient funds: genesis allowance {allowance}, requested {requested}")]
    GenesisAllowanceExceeded { allowance: u64, requested: u64 },

    #[error("insufficient funds: holdings {holdings}, requested {requested}")]
    InsufficientFunds { holdings: i128, requested: u64 },

    #[error("untrusted genesis entry {id}")]
    UntrustedGenesis { id: String },

    #[error("entry {id} is malformed: {detail}")]
    MalformedEntry { id: String, detail: String },

    #[error("entry {id} not confirmed by {validator}: {detail}")]
    EntryUnconfirmed {
        id: String,
        validator: String,
        detail: String,
    },

    #[error("entry {id} not confirmed: {confirmed} of {required} quorum members vouched for it")]
    EntryUnderConfirmed {
        id: String,
        confirmed: usize,
        required: usize,
    },

    #[error("unknown entry {id}")]
    UnknownEntry { id: String },

    #[error("hash mismatch for entry {id}")]
    EntryHashMismatch { id: String },
}

/// Prefix of `EntryHashMismatch`'s display text.
const HASH_MISMATCH: &str = "hash mismatch for entry";

impl Rejection {
    /// Whether a remote witness's `reason` reports a different hash for the
    /// entry, as opposed to not knowing it.
    pub fn is_hash_mismatch(reason: &str) -> bool {
        reason.starts_with(HASH_MISMATCH)
    }
}
