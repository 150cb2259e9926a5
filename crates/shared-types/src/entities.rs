//! # Core Domain Entities
//!
//! Defines the entities every Quorum-Ledger subsystem agrees on.
//!
//! ## Clusters
//!
//! - **Identity**: `Address`, `Pod`, `PodRole`, `PodStatus`, `NetworkLocation`
//! - **Value Transfer**: `Transaction`, `QuorumMembers`
//! - **Ledgers**: `Ledger`, `LedgerType`
//! - **Voting**: `ValidationResult`

use std::fmt;
use std::net::SocketAddr;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::errors::{AddressError, LedgerEntryError};

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// Length of a hex-encoded uncompressed secp256k1 point (`04 || x || y`).
pub const ADDRESS_HEX_LEN: usize = 130;

/// The well-known sender of every genesis transfer.
///
/// Genesis entries are trusted axiomatically and never carry a quorum.
pub const GENESIS_ADDRESS: &str = "0400000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000";

/// A pod address: the hex encoding of an uncompressed secp256k1 public key.
///
/// Addresses are validated on construction and on deserialization, so any
/// `Address` value in memory is well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Parse and validate a hex address.
    ///
    /// Accepts exactly 130 hex characters starting with `04`.
    pub fn parse(value: &str) -> Result<Self, AddressError> {
        if value.len() != ADDRESS_HEX_LEN {
            return Err(AddressError::InvalidLength {
                expected: ADDRESS_HEX_LEN,
                actual: value.len(),
            });
        }
        if hex::decode(value).is_err() {
            return Err(AddressError::NotHex);
        }
        if !value.starts_with("04") {
            return Err(AddressError::MissingUncompressedPrefix);
        }
        Ok(Self(value.to_ascii_lowercase()))
    }

    /// The address every genesis transfer is sent from.
    pub fn genesis() -> Self {
        Self(GENESIS_ADDRESS.to_string())
    }

    /// Whether this is the genesis sender.
    pub fn is_genesis(&self) -> bool {
        self.0 == GENESIS_ADDRESS
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short prefix for log lines.
    pub fn short(&self) -> &str {
        &self.0[2..12]
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Address::parse(&value)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

/// The part a pod plays in quorum selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PodRole {
    /// Eligible as a witness (`witnessOne` / `witnessTwo`).
    Regular,
    /// Eligible as a partner (`partnerOne` / `partnerTwo`).
    Partner,
    /// Bootstrap registry; never selected.
    Seed,
    /// Placeholder pod used by load tests; never selected.
    Dummy,
}

/// Reachability state of a pod.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PodStatus {
    Online,
    Busy,
    Offline,
}

/// Where a pod can be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkLocation {
    /// Publicly routable IP:port.
    pub public_addr: SocketAddr,
    /// Host-local IP:port, used for same-host transfers.
    pub local_addr: SocketAddr,
}

impl NetworkLocation {
    /// A location whose public and local address coincide.
    pub fn single(addr: SocketAddr) -> Self {
        Self {
            public_addr: addr,
            local_addr: addr,
        }
    }

    /// The address to dial.
    pub fn dial_addr(&self, prefer_local: bool) -> SocketAddr {
        if prefer_local {
            self.local_addr
        } else {
            self.public_addr
        }
    }
}

/// Informational resource descriptors reported by a pod.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodResources {
    pub cpus: Option<u32>,
    pub memory_mb: Option<u64>,
    pub platform: Option<String>,
}

/// A network participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pod {
    /// Public key; the pod's sole identity.
    pub address: Address,
    pub role: PodRole,
    pub location: NetworkLocation,
    pub status: PodStatus,
    #[serde(default)]
    pub resources: PodResources,
    /// Unix milliseconds at which the pod started.
    pub spawn_timestamp: u64,
}

impl Pod {
    /// Create an online pod spawned now.
    pub fn new(address: Address, role: PodRole, location: NetworkLocation) -> Self {
        Self {
            address,
            role,
            location,
            status: PodStatus::Online,
            resources: PodResources::default(),
            spawn_timestamp: unix_millis(),
        }
    }

    pub fn is_online(&self) -> bool {
        self.status == PodStatus::Online
    }
}

// =============================================================================
// CLUSTER B: VALUE TRANSFER
// =============================================================================

/// The four validators assigned to one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuorumMembers {
    pub witness_one: Address,
    pub witness_two: Address,
    pub partner_one: Address,
    pub partner_two: Address,
}

impl QuorumMembers {
    /// Members in canonical order: witnesses first, then partners.
    pub fn to_vec(&self) -> Vec<Address> {
        vec![
            self.witness_one.clone(),
            self.witness_two.clone(),
            self.partner_one.clone(),
            self.partner_two.clone(),
        ]
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.witness_one == *address
            || self.witness_two == *address
            || self.partner_one == *address
            || self.partner_two == *address
    }
}

/// A value transfer.
///
/// Fields are filled in stages: construction sets the counterparties, amount
/// and timestamp; quorum assignment sets the four validators; `id`,
/// `signature` and `hash` are derived afterwards. A witness ledger stores
/// the same record with `amount` set to `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub from: Address,
    pub to: Address,
    /// Transferred value; `None` once redacted into a witness ledger.
    pub amount: Option<u64>,
    /// Unix milliseconds at construction.
    pub timestamp: u64,
    pub witness_one: Option<Address>,
    pub witness_two: Option<Address>,
    pub partner_one: Option<Address>,
    pub partner_two: Option<Address>,
    /// Content hash over the quorum, counterparties and timestamp.
    pub id: Option<String>,
    /// Sender's DER signature over `id`, hex encoded.
    pub signature: Option<String>,
    /// Integrity fingerprint; `id` fields plus `amount`.
    pub hash: Option<String>,
    /// Same-process test transfer.
    #[serde(default)]
    pub local: bool,
}

impl Transaction {
    /// The assigned quorum, if all four members are present.
    pub fn quorum(&self) -> Option<QuorumMembers> {
        Some(QuorumMembers {
            witness_one: self.witness_one.clone()?,
            witness_two: self.witness_two.clone()?,
            partner_one: self.partner_one.clone()?,
            partner_two: self.partner_two.clone()?,
        })
    }

    /// Whether this is a genesis transfer.
    pub fn is_genesis(&self) -> bool {
        self.from.is_genesis()
    }

    /// The id, or an error naming the missing field.
    pub fn require_id(&self) -> Result<&str, LedgerEntryError> {
        self.id.as_deref().ok_or(LedgerEntryError::MissingId)
    }

    /// A copy with the amount removed, as stored by witnesses.
    pub fn redacted(&self) -> Self {
        Self {
            amount: None,
            ..self.clone()
        }
    }
}

// =============================================================================
// CLUSTER C: LEDGERS
// =============================================================================

/// The two ledger kinds each node keeps.
///
/// Persisted as `0` (owner) and `1` (witness).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum LedgerType {
    /// `MY_LEDGER`: the node's own transfers, true amounts.
    Owner,
    /// `WITNESS_LEDGER`: transfers the node validated, amounts redacted.
    Witness,
}

impl LedgerType {
    pub const ALL: [LedgerType; 2] = [LedgerType::Owner, LedgerType::Witness];

    pub fn file_stem(&self) -> &'static str {
        match self {
            LedgerType::Owner => "my_ledger",
            LedgerType::Witness => "witness_ledger",
        }
    }
}

impl From<LedgerType> for u8 {
    fn from(kind: LedgerType) -> Self {
        match kind {
            LedgerType::Owner => 0,
            LedgerType::Witness => 1,
        }
    }
}

impl TryFrom<u8> for LedgerType {
    type Error = LedgerEntryError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(LedgerType::Owner),
            1 => Ok(LedgerType::Witness),
            other => Err(LedgerEntryError::UnknownLedgerType(other)),
        }
    }
}

/// An append-only sequence of transaction entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    entries: Vec<Transaction>,
    #[serde(rename = "type")]
    kind: LedgerType,
}

impl Ledger {
    pub fn new(kind: LedgerType) -> Self {
        Self {
            entries: Vec::new(),
            kind,
        }
    }

    pub fn kind(&self) -> LedgerType {
        self.kind
    }

    pub fn entries(&self) -> &[Transaction] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry_by_id(&self, id: &str) -> Option<&Transaction> {
        self.entries.iter().find(|e| e.id.as_deref() == Some(id))
    }

    /// Append an entry.
    ///
    /// Witness ledgers always store the redacted form. Returns `Ok(false)`
    /// when an entry with the same id is already present.
    pub fn append(&mut self, entry: &Transaction) -> Result<bool, LedgerEntryError> {
        let id = entry.require_id()?;
        if self.entry_by_id(id).is_some() {
            return Ok(false);
        }
        let stored = match self.kind {
            LedgerType::Owner => entry.clone(),
            LedgerType::Witness => entry.redacted(),
        };
        self.entries.push(stored);
        Ok(true)
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

// =============================================================================
// CLUSTER D: VOTING
// =============================================================================

/// A single validator's vote on a transaction or ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub res: bool,
    /// Present whenever `res` is false.
    pub reason: Option<String>,
    /// Subject transaction id.
    pub id: String,
    /// The voter.
    pub validator: Address,
}

impl ValidationResult {
    pub fn approve(id: impl Into<String>, validator: Address) -> Self {
        Self {
            res: true,
            reason: None,
            id: id.into(),
            validator,
        }
    }

    pub fn reject(id: impl Into<String>, validator: Address, reason: impl Into<String>) -> Self {
        Self {
            res: false,
            reason: Some(reason.into()),
            id: id.into(),
            validator,
        }
    }

    /// The rejection reason, or an empty string for approvals.
    pub fn reason_str(&self) -> &str {
        self.reason.as_deref().unwrap_or("")
    }
}

/// Current wall-clock time in Unix milliseconds.
pub fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
