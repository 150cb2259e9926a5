//! Content digests over the public transaction fields.
//!
//! Missing quorum members contribute an empty string, which is how genesis
//! transfers (no quorum) get a stable id.

use shared_crypto::sha256_hex;
use shared_types::{Address, Transaction};

fn member(slot: &Option<Address>) -> &str {
    slot.as_ref().map(Address::as_str).unwrap_or("")
}

/// `sha256(witnessOne ‖ witnessTwo ‖ partnerOne ‖ partnerTwo ‖ to ‖ from ‖ timestamp)`
pub fn derive_id(tx: &Transaction) -> String {
    let timestamp = tx.timestamp.to_string();
    sha256_hex(&[
        member(&tx.witness_one),
        member(&tx.witness_two),
        member(&tx.partner_one),
        member(&tx.partner_two),
        tx.to.as_str(),
        tx.from.as_str(),
        &timestamp,
    ])
}

/// `sha256(witnessOne ‖ witnessTwo ‖ partnerOne ‖ partnerTwo ‖ to ‖ amount ‖ from ‖ timestamp)`
pub fn derive_hash(tx: &Transaction) -> String {
    let timestamp = tx.timestamp.to_string();
    let amount = tx.amount.map(|a| a.to_string()).unwrap_or_default();
    sha256_hex(&[
        member(&tx.witness_one),
        member(&tx.witness_two),
        member(&tx.partner_one),
        member(&tx.partner_two),
        tx.to.as_str(),
        &amount,
        tx.from.as_str(),
        &timestamp,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u64) -> Address {
        Address::parse(&format!("04{:0128x}", n)).unwrap()
    }

    fn tx() -> Transaction {
        Transaction {
            from: addr(1),
            to: addr(2),
            amount: Some(100),
            timestamp: 1_700_000_000_000,
            witness_one: Some(addr(10)),
            witness_two: Some(addr(11)),
            partner_one: Some(addr(20)),
            partner_two: Some(addr(21)),
            id: None,
            signature: None,
            hash: None,
            local: false,
        }
    }

    #[test]
    fn test_id_is_deterministic() {
        assert_eq!(derive_id(&tx()), derive_id(&tx()));
        assert_eq!(derive_id(&tx()).len(), 64);
    }

    #[test]
    fn test_id_ignores_amount_and_derived_fields() {
        let mut other = tx();
        other.amount = Some(1);
        other.signature = Some("00".into());
        other.hash = Some("ff".into());
        other.local = true;
        assert_eq!(derive_id(&tx()), derive_id(&other));
    }

    #[test]
    fn test_id_covers_every_identity_field() {
        let base = derive_id(&tx());
        let mutations: Vec<Box<dyn Fn(&mut Transaction)>> = vec![
            Box::new(|t| t.witness_one = Some(addr(99))),
            Box::new(|t| t.witness_two = Some(addr(99))),
            Box::new(|t| t.partner_one = Some(addr(99))),
            Box::new(|t| t.partner_two = Some(addr(99))),
            Box::new(|t| t.to = addr(99)),
            Box::new(|t| t.from = addr(99)),
            Box::new(|t| t.timestamp += 1),
        ];
        for mutate in mutations {
            let mut changed = tx();
            mutate(&mut changed);
            assert_ne!(derive_id(&changed), base);
        }
    }

    #[test]
    fn test_hash_covers_amount() {
        let mut other = tx();
        other.amount = Some(101);
        assert_ne!(derive_hash(&tx()), derive_hash(&other));
        assert_ne!(derive_hash(&tx()), derive_id(&tx()));
    }
}
