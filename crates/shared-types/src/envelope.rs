//! # Peer Message Envelope
//!
//! Every message exchanged between pods is a `{ "type": .., "data": .. }`
//! envelope. Inbound bytes are decoded into the tagged union `PeerMessage`
//! at the transport boundary; protocol code never inspects raw JSON.
//!
//! ## Decoding Rules
//!
//! - Known `type` with a well-formed payload: decoded variant.
//! - Known envelope shape, unknown `type`: `EnvelopeError::UnknownType`.
//!   Callers log and drop these.
//! - Anything else: `EnvelopeError::Malformed`.

use serde::{Deserialize, Serialize};

use crate::entities::{Address, Ledger, Pod, Transaction, ValidationResult};
use crate::errors::EnvelopeError;

/// Payload of `SELECTED_FOR_VALIDATION`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRequest {
    pub transaction: Transaction,
    /// The sender's owner ledger, so the validator can re-derive trust.
    pub sender_ledger: Ledger,
}

/// Payload of `TRANSACTION_CONFIRMATION_REQUEST`: "is this entry hash valid".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationRequest {
    pub id: String,
    pub hash: String,
}

/// Payload of `LOG_EVENT`: a structured telemetry record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEvent {
    pub event: String,
    pub node: Option<Address>,
    pub timestamp: u64,
    #[serde(default)]
    pub payload: serde_json::Value,
}

/// Payload of `TEST_CONFIG`: load-test parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestConfig {
    /// Test length in seconds.
    #[serde(rename = "duration")]
    pub duration_secs: u64,
    pub num_senders: usize,
    /// Send to same-host pods through their local address.
    pub local: bool,
    /// Stop once the sender's owner ledger reaches this length.
    pub max_ledger_length: usize,
    /// Whether test senders may also be picked as witnesses.
    pub senders_as_validators: bool,
    #[serde(default)]
    pub sender_addresses: Vec<Address>,
}

/// Discriminant of `PeerMessage`, used as the dispatch key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Identity,
    ResponseIdentity,
    QueryAll,
    QueryAllResponse,
    SelectedForValidation,
    ValidationResult,
    TransactionConfirmationRequest,
    TransactionConfirmationResult,
    TransactionCommit,
    LogEvent,
    TestConfig,
    WipeLedger,
    Ack,
}

/// All messages a pod sends or receives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PeerMessage {
    /// Identity handshake carrying the caller's own descriptor.
    Identity(Pod),
    ResponseIdentity(Pod),
    QueryAll,
    QueryAllResponse(Vec<Pod>),
    SelectedForValidation(ValidationRequest),
    ValidationResult(ValidationResult),
    TransactionConfirmationRequest(ConfirmationRequest),
    TransactionConfirmationResult(ValidationResult),
    /// Positive outcome broadcast by the sender.
    TransactionCommit(Transaction),
    LogEvent(LogEvent),
    TestConfig(TestConfig),
    WipeLedger,
    Ack,
}

/// Envelope shape without payload interpretation; used to name the type of
/// a message that failed to decode.
#[derive(Deserialize)]
struct RawEnvelope {
    #[serde(rename = "type")]
    kind: String,
}

impl PeerMessage {
    pub fn kind(&self) -> MessageKind {
        match self {
            PeerMessage::Identity(_) => MessageKind::Identity,
            PeerMessage::ResponseIdentity(_) => MessageKind::ResponseIdentity,
            PeerMessage::QueryAll => MessageKind::QueryAll,
            PeerMessage::QueryAllResponse(_) => MessageKind::QueryAllResponse,
            PeerMessage::SelectedForValidation(_) => MessageKind::SelectedForValidation,
            PeerMessage::ValidationResult(_) => MessageKind::ValidationResult,
            PeerMessage::TransactionConfirmationRequest(_) => {
                MessageKind::TransactionConfirmationRequest
            }
            PeerMessage::TransactionConfirmationResult(_) => {
                MessageKind::TransactionConfirmationResult
            }
            PeerMessage::TransactionCommit(_) => MessageKind::TransactionCommit,
            PeerMessage::LogEvent(_) => MessageKind::LogEvent,
            PeerMessage::TestConfig(_) => MessageKind::TestConfig,
            PeerMessage::WipeLedger => MessageKind::WipeLedger,
            PeerMessage::Ack => MessageKind::Ack,
        }
    }

    /// Serialize to the JSON wire form.
    pub fn encode(&self) -> Result<Vec<u8>, EnvelopeError> {
        serde_json::to_vec(self).map_err(|e| EnvelopeError::Malformed(e.to_string()))
    }

    /// Decode from the JSON wire form.
    pub fn decode(bytes: &[u8]) -> Result<Self, EnvelopeError> {
        match serde_json::from_slice::<PeerMessage>(bytes) {
            Ok(message) => Ok(message),
            Err(err) => match serde_json::from_slice::<RawEnvelope>(bytes) {
                Ok(raw) if !Self::is_known_type(&raw.kind) => {
                    Err(EnvelopeError::UnknownType(raw.kind))
                }
                _ => Err(EnvelopeError::Malformed(err.to_string())),
            },
        }
    }

    fn is_known_type(tag: &str) -> bool {
        matches!(
            tag,
            "IDENTITY"
                | "RESPONSE_IDENTITY"
                | "QUERY_ALL"
                | "QUERY_ALL_RESPONSE"
                | "SELECTED_FOR_VALIDATION"
                | "VALIDATION_RESULT"
                | "TRANSACTION_CONFIRMATION_REQUEST"
                | "TRANSACTION_CONFIRMATION_RESULT"
                | "TRANSACTION_COMMIT"
                | "LOG_EVENT"
                | "TEST_CONFIG"
                | "WIPE_LEDGER"
                | "ACK"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::LedgerType;

    fn validator() -> Address {
        Address::genesis()
    }

    #[test]
    fn test_envelope_uses_type_and_data_fields() {
        let msg = PeerMessage::ValidationResult(ValidationResult::approve("abc", validator()));
        let json: serde_json::Value = serde_json::from_slice(&msg.encode().unwrap()).unwrap();
        assert_eq!(json["type"], "VALIDATION_RESULT");
        assert_eq!(json["data"]["id"], "abc");
        assert_eq!(json["data"]["res"], true);
    }

    #[test]
    fn test_unit_variant_decodes_without_data() {
        let decoded = PeerMessage::decode(br#"{"type":"WIPE_LEDGER"}"#).unwrap();
        assert_eq!(decoded, PeerMessage::WipeLedger);
    }

    #[test]
    fn test_unknown_type_is_reported_by_name() {
        let err = PeerMessage::decode(br#"{"type":"GOSSIP_BLOCK","data":{}}"#).unwrap_err();
        assert_eq!(err, EnvelopeError::UnknownType("GOSSIP_BLOCK".into()));
    }

    #[test]
    fn test_known_type_with_bad_payload_is_malformed() {
        let err =
            PeerMessage::decode(br#"{"type":"VALIDATION_RESULT","data":{"res":"yes"}}"#)
                .unwrap_err();
        assert!(matches!(err, EnvelopeError::Malformed(_)));
    }

    #[test]
    fn test_garbage_is_malformed() {
        assert!(matches!(
            PeerMessage::decode(b"not json"),
            Err(EnvelopeError::Malformed(_))
        ));
    }

    #[test]
    fn test_validation_request_carries_sender_ledger() {
        let request = ValidationRequest {
            transaction: Transaction {
                from: validator(),
                to: validator(),
                amount: Some(3),
                timestamp: 9,
                witness_one: None,
                witness_two: None,
                partner_one: None,
                partner_two: None,
                id: None,
                signature: None,
                hash: None,
                local: false,
            },
            sender_ledger: Ledger::new(LedgerType::Owner),
        };
        let msg = PeerMessage::SelectedForValidation(request.clone());
        let json: serde_json::Value = serde_json::from_slice(&msg.encode().unwrap()).unwrap();
        assert_eq!(json["data"]["senderLedger"]["type"], 0);
        assert_eq!(
            PeerMessage::decode(&msg.encode().unwrap()).unwrap(),
            PeerMessage::SelectedForValidation(request)
        );
    }
}
