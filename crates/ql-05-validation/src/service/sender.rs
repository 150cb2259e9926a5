//! Sender side: select, seal, dispatch, aggregate, commit.

use futures::future::join_all;
use quorum_telemetry::{metric_inc, HistogramTimer};
use shared_types::{
    unix_millis, Address, LedgerType, PeerMessage, Transaction, ValidationRequest,
};
use tracing::{debug, info, warn};

use super::peers::CallFailure;
use super::ValidationService;
use crate::domain::{aggregate, Decision, ValidationError, Vote};

/// What happened to a submitted transfer.
#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    pub transaction: Transaction,
    pub votes: Vec<Vote>,
    pub decision: Decision,
}

impl SubmissionOutcome {
    pub fn committed(&self) -> bool {
        self.decision.approved
    }
}

impl ValidationService {
    /// Transfer `amount` to `to` and drive it through validation.
    ///
    /// `Err` means the transfer never reached a quorum (not enough peers,
    /// signing or storage failure). A quorum that votes no is an `Ok` outcome
    /// with `decision.approved == false`.
    pub async fn submit(
        &self,
        to: Address,
        amount: u64,
        local: bool,
    ) -> Result<SubmissionOutcome, ValidationError> {
        let me = self.address();
        metric_inc!(quorum_telemetry::TRANSACTIONS_SUBMITTED);

        let exclusions = self.witness_exclusions();
        let selection = self
            .selector
            .select_quorum(&me, &exclusions, &mut rand::thread_rng());
        let quorum = match selection {
            Ok(quorum) => quorum,
            Err(err) => {
                metric_inc!(quorum_telemetry::TRANSACTIONS_REJECTED, &["selection"]);
                warn!(error = %err, "[ql-05] Cannot form a quorum");
                return Err(err.into());
            }
        };

        let mut tx = ql_04_transaction_lifecycle::construct(me, to, amount, unix_millis());
        tx.local = local;
        ql_04_transaction_lifecycle::assign_quorum(&mut tx, &quorum);
        if let Err(err) = ql_04_transaction_lifecycle::seal(&mut tx, self.keys.key_pair()) {
            metric_inc!(quorum_telemetry::TRANSACTIONS_REJECTED, &["signing"]);
            return Err(err.into());
        }
        let id = tx.id.clone().unwrap_or_default();

        info!(
            tx_id = %id,
            to = %tx.to.short(),
            amount,
            "[ql-05] Dispatching transaction to quorum"
        );

        let votes = {
            let _timer = HistogramTimer::new(&quorum_telemetry::VALIDATION_DURATION);
            self.collect_votes(&tx).await
        };
        let decision = aggregate(
            &votes,
            self.config.timeout_policy,
            self.config.min_responses,
        );

        if decision.approved {
            self.commit_approved(&tx).await?;
            metric_inc!(quorum_telemetry::TRANSACTIONS_COMMITTED);
            info!(tx_id = %id, approvals = decision.approvals, "[ql-05] Transaction committed");
        } else {
            metric_inc!(quorum_telemetry::TRANSACTIONS_REJECTED, &["quorum"]);
            info!(
                tx_id = %id,
                reason = decision.reason.as_deref().unwrap_or(""),
                "[ql-05] Transaction rejected"
            );
        }

        Ok(SubmissionOutcome {
            transaction: tx,
            votes,
            decision,
        })
    }

    /// Ask all four quorum members concurrently; every member yields a vote.
    async fn collect_votes(&self, tx: &Transaction) -> Vec<Vote> {
        let Some(quorum) = tx.quorum() else {
            return Vec::new();
        };
        let request = ValidationRequest {
            transaction: tx.clone(),
            sender_ledger: self.ledgers.get(LedgerType::Owner),
        };
        let id = tx.id.as_deref().unwrap_or_default();

        let requests = quorum.to_vec().into_iter().map(|member| {
            let message = PeerMessage::SelectedForValidation(request.clone());
            async move {
                let reply = self.call(&member, message, tx.local).await;
                let vote = vote_from_reply(member, id, reply);
                let outcome = match &vote {
                    Vote::Cast(result) if result.res => "approve",
                    Vote::Cast(_) => "reject",
                    Vote::Abstained { .. } => "abstain",
                };
                metric_inc!(quorum_telemetry::VOTES, &[outcome]);
                vote
            }
        });
        join_all(requests).await
    }

    /// Record the approved transfer locally and tell the quorum and the
    /// recipient.
    async fn commit_approved(&self, tx: &Transaction) -> Result<(), ValidationError> {
        self.ledgers.append(tx, LedgerType::Owner)?;
        self.publish_ledger_sizes();

        let me = self.address();
        let mut recipients = tx.quorum().map(|q| q.to_vec()).unwrap_or_default();
        if tx.to != me && !recipients.contains(&tx.to) {
            recipients.push(tx.to.clone());
        }

        let notices = recipients.into_iter().map(|peer| {
            let message = PeerMessage::TransactionCommit(tx.clone());
            async move {
                if let Err(failure) = self.call(&peer, message, tx.local).await {
                    debug!(
                        peer = %peer.short(),
                        reason = %failure.describe(),
                        "[ql-05] Commit notice not delivered"
                    );
                }
            }
        });
        join_all(notices).await;
        Ok(())
    }
}

fn vote_from_reply(
    member: Address,
    id: &str,
    reply: Result<PeerMessage, CallFailure>,
) -> Vote {
    match reply {
        Ok(PeerMessage::ValidationResult(result))
            if result.validator == member && result.id == id =>
        {
            Vote::Cast(result)
        }
        Ok(other) => Vote::Abstained {
            validator: member,
            detail: format!("unexpected reply {:?}", other.kind()),
        },
        Err(failure) => Vote::Abstained {
            validator: member,
            detail: failure.describe(),
        },
    }
}
