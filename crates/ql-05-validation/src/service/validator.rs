//! Validator side: answer `SELECTED_FOR_VALIDATION` and
//! `TRANSACTION_CONFIRMATION_REQUEST`.

use std::collections::{HashMap, HashSet};

use futures::stream::{self, StreamExt};
use ql_02_ledger_store::balance;
use ql_04_transaction_lifecycle::{verify_hash, verify_id, verify_signature};
use quorum_telemetry::metric_inc;
use shared_types::{
    Address, ConfirmationRequest, Ledger, LedgerType, PeerMessage, Transaction,
    ValidationRequest, ValidationResult,
};
use tracing::{debug, info};

use super::ValidationService;
use crate::domain::{Rejection, TimeoutPolicy};

/// Witnesses plus partners.
const QUORUM_SIZE: usize = 4;

/// One hash confirmation owed by one member of an entry's quorum.
struct EntryCheck {
    id: String,
    hash: String,
    member: Address,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Confirmation {
    Confirmed,
    Missing,
}

impl ValidationService {
    /// Vote on a transfer. Never fails: every problem becomes `res: false`.
    pub async fn validate(&self, request: ValidationRequest) -> ValidationResult {
        let me = self.address();
        let ValidationRequest {
            transaction: tx,
            sender_ledger,
        } = request;
        let id = tx.id.clone().unwrap_or_default();
        metric_inc!(quorum_telemetry::VALIDATION_REQUESTS_SERVED);

        match self.check_transaction(&me, &tx, &sender_ledger).await {
            Ok(()) => {
                debug!(tx_id = %id, "[ql-05] Approving transaction");
                ValidationResult::approve(id, me)
            }
            Err(rejection) => {
                info!(tx_id = %id, reason = %rejection, "[ql-05] Rejecting transaction");
                ValidationResult::reject(id, me, rejection.to_string())
            }
        }
    }

    /// Answer "is `hash` the hash of entry `id`" from our witness ledger.
    pub fn confirm(&self, request: &ConfirmationRequest) -> ValidationResult {
        let me = self.address();
        match self.witness_verdict(request) {
            Ok(()) => ValidationResult::approve(request.id.clone(), me),
            Err(rejection) => ValidationResult::reject(request.id.clone(), me, rejection.to_string()),
        }
    }

    fn witness_verdict(&self, request: &ConfirmationRequest) -> Result<(), Rejection> {
        match self.ledgers.entry_by_id(&request.id, LedgerType::Witness) {
            None => Err(Rejection::UnknownEntry {
                id: request.id.clone(),
            }),
            Some(entry) if entry.hash.as_deref() != Some(request.hash.as_str()) => {
                Err(Rejection::EntryHashMismatch {
                    id: request.id.clone(),
                })
            }
            Some(_) => Ok(()),
        }
    }

    async fn check_transaction(
        &self,
        me: &Address,
        tx: &Transaction,
        sender_ledger: &Ledger,
    ) -> Result<(), Rejection> {
        check_quorum(me, tx)?;
        verify_id(tx).map_err(|_| Rejection::IdMismatch)?;
        verify_signature(tx).map_err(|e| Rejection::InvalidSignature(e.to_string()))?;

        let amount = tx.amount.ok_or(Rejection::MissingAmount)?;
        if sender_ledger.kind() != LedgerType::Owner {
            return Err(Rejection::WrongLedgerType);
        }

        let entries = sender_ledger.entries();
        check_entry_layout(entries)?;
        if let [only] = entries {
            if only.is_genesis() {
                self.check_genesis_entry(only, &tx.from)?;
                if amount >= self.config.genesis_amount {
                    return Err(Rejection::GenesisAllowanceExceeded {
                        allowance: self.config.genesis_amount,
                        requested: amount,
                    });
                }
                return Ok(());
            }
        }

        let holdings = balance(sender_ledger, &tx.from);
        if holdings < i128::from(amount) {
            return Err(Rejection::InsufficientFunds {
                holdings,
                requested: amount,
            });
        }

        self.confirm_entries(me, entries, &tx.from, tx.local).await
    }

    fn check_genesis_entry(&self, entry: &Transaction, owner: &Address) -> Result<(), Rejection> {
        let trusted = entry.to == *owner
            && entry.amount.unwrap_or(0) <= self.config.genesis_amount
            && verify_id(entry).is_ok()
            && verify_hash(entry).is_ok();
        if trusted {
            Ok(())
        } else {
            Err(Rejection::UntrustedGenesis {
                id: entry.id.clone().unwrap_or_default(),
            })
        }
    }

    /// Every non-genesis entry must be vouched for by its own quorum, under
    /// the same timeout policy as a top-level vote.
    async fn confirm_entries(
        &self,
        me: &Address,
        entries: &[Transaction],
        owner: &Address,
        prefer_local: bool,
    ) -> Result<(), Rejection> {
        let mut checks = Vec::new();
        let mut confirmed: HashMap<String, usize> = HashMap::new();
        for entry in entries {
            if entry.is_genesis() {
                self.check_genesis_entry(entry, owner)?;
                continue;
            }
            let id = entry.id.clone().unwrap_or_default();
            let malformed = |detail: String| Rejection::MalformedEntry {
                id: id.clone(),
                detail,
            };
            let quorum = entry
                .quorum()
                .ok_or_else(|| malformed("no quorum".to_string()))?;
            verify_id(entry).map_err(|e| malformed(e.to_string()))?;
            verify_hash(entry).map_err(|e| malformed(e.to_string()))?;
            let hash = entry.hash.clone().unwrap_or_default();

            confirmed.insert(id.clone(), 0);
            checks.extend(quorum.to_vec().into_iter().map(|member| EntryCheck {
                id: id.clone(),
                hash: hash.clone(),
                member,
            }));
        }

        debug!(checks = checks.len(), "[ql-05] Confirming sender ledger entries");
        let mut pending = stream::iter(checks)
            .map(move |check| async move {
                let id = check.id.clone();
                (id, self.confirm_entry(me, check, prefer_local).await)
            })
            .buffer_unordered(self.config.max_nested_checks.max(1));

        while let Some((id, result)) = pending.next().await {
            if result? == Confirmation::Confirmed {
                *confirmed.entry(id).or_default() += 1;
            }
        }

        let required = match self.config.timeout_policy {
            TimeoutPolicy::Abstain => self.config.min_responses.min(QUORUM_SIZE),
            TimeoutPolicy::Reject => QUORUM_SIZE,
        };
        for entry in entries.iter().filter(|entry| !entry.is_genesis()) {
            let id = entry.id.clone().unwrap_or_default();
            let count = confirmed.get(&id).copied().unwrap_or(0);
            if count < required {
                return Err(Rejection::EntryUnderConfirmed {
                    id,
                    confirmed: count,
                    required,
                });
            }
        }
        Ok(())
    }

    /// A hash disagreement is always fatal. A member that is silent or has
    /// no record of the entry abstains, or is fatal under `Reject`.
    async fn confirm_entry(
        &self,
        me: &Address,
        check: EntryCheck,
        prefer_local: bool,
    ) -> Result<Confirmation, Rejection> {
        let EntryCheck { id, hash, member } = check;
        let unconfirmed = |detail: String| Rejection::EntryUnconfirmed {
            id: id.clone(),
            validator: member.short().to_string(),
            detail,
        };
        let missing = |detail: String| match self.config.timeout_policy {
            TimeoutPolicy::Abstain => {
                debug!(entry = %id, member = %member.short(), %detail, "[ql-05] Witness abstained");
                Ok(Confirmation::Missing)
            }
            TimeoutPolicy::Reject => Err(unconfirmed(detail)),
        };

        if member == *me {
            metric_inc!(quorum_telemetry::NESTED_CONFIRMATIONS, &["local"]);
            let request = ConfirmationRequest {
                id: id.clone(),
                hash,
            };
            return match self.witness_verdict(&request) {
                Ok(()) => Ok(Confirmation::Confirmed),
                Err(rejection @ Rejection::EntryHashMismatch { .. }) => {
                    Err(unconfirmed(rejection.to_string()))
                }
                Err(rejection) => missing(rejection.to_string()),
            };
        }

        let request = PeerMessage::TransactionConfirmationRequest(ConfirmationRequest {
            id: id.clone(),
            hash,
        });
        match self.call(&member, request, prefer_local).await {
            Ok(PeerMessage::TransactionConfirmationResult(result))
                if result.id == id && result.validator == member =>
            {
                if result.res {
                    metric_inc!(quorum_telemetry::NESTED_CONFIRMATIONS, &["confirmed"]);
                    Ok(Confirmation::Confirmed)
                } else if Rejection::is_hash_mismatch(result.reason_str()) {
                    metric_inc!(quorum_telemetry::NESTED_CONFIRMATIONS, &["denied"]);
                    Err(unconfirmed(result.reason_str().to_string()))
                } else {
                    metric_inc!(quorum_telemetry::NESTED_CONFIRMATIONS, &["denied"]);
                    missing(result.reason_str().to_string())
                }
            }
            Ok(other) => {
                metric_inc!(quorum_telemetry::NESTED_CONFIRMATIONS, &["denied"]);
                missing(format!("unexpected reply {:?}", other.kind()))
            }
            Err(failure) => {
                metric_inc!(quorum_telemetry::NESTED_CONFIRMATIONS, &["unreachable"]);
                missing(failure.describe())
            }
        }
    }
}

/// At most one genesis entry, and only as the first entry. Entry ids are
/// unique.
fn check_entry_layout(entries: &[Transaction]) -> Result<(), Rejection> {
    let mut seen = HashSet::new();
    for (index, entry) in entries.iter().enumerate() {
        let id = entry.id.clone().unwrap_or_default();
        if entry.is_genesis() && index != 0 {
            return Err(Rejection::MalformedEntry {
                id,
                detail: format!("genesis entry at position {index}"),
            });
        }
        if !seen.insert(id.clone()) {
            return Err(Rejection::MalformedEntry {
                id,
                detail: "duplicate entry".to_string(),
            });
        }
    }
    Ok(())
}

/// Four distinct members, none of them the sender, one of them us.
fn check_quorum(me: &Address, tx: &Transaction) -> Result<(), Rejection> {
    let quorum = tx
        .quorum()
        .ok_or(Rejection::MalformedQuorum("missing members"))?;
    let members = quorum.to_vec();
    if members.iter().collect::<HashSet<_>>().len() != members.len() {
        return Err(Rejection::MalformedQuorum("duplicate members"));
    }
    if quorum.contains(&tx.from) {
        return Err(Rejection::MalformedQuorum("sender is a member"));
    }
    if !quorum.contains(me) {
        return Err(Rejection::NotInQuorum);
    }
    Ok(())
}
