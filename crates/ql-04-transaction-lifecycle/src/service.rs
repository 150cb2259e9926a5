//! Lifecycle operations.

use shared_crypto::{digest_from_hex, verify_digest, Secp256k1KeyPair, Secp256k1Signature};
use shared_types::{Address, QuorumMembers, Transaction};
use tracing::debug;

use crate::domain::{derive_hash, derive_id, LifecycleError};

/// A bare transfer with no quorum, id, signature or hash.
pub fn construct(from: Address, to: Address, amount: u64, timestamp: u64) -> Transaction {
    Transaction {
        from,
        to,
        amount: Some(amount),
        timestamp,
        witness_one: None,
        witness_two: None,
        partner_one: None,
        partner_two: None,
        id: None,
        signature: None,
        hash: None,
        local: false,
    }
}

/// Fill the four validator slots. Clears any id, signature and hash derived
/// for a previous quorum.
pub fn assign_quorum(tx: &mut Transaction, quorum: &QuorumMembers) {
    tx.witness_one = Some(quorum.witness_one.clone());
    tx.witness_two = Some(quorum.witness_two.clone());
    tx.partner_one = Some(quorum.partner_one.clone());
    tx.partner_two = Some(quorum.partner_two.clone());
    tx.id = None;
    tx.signature = None;
    tx.hash = None;
}

/// Sign the transaction id with `key`.
pub fn sign(tx: &mut Transaction, key: &Secp256k1KeyPair) -> Result<(), LifecycleError> {
    let id = tx.id.as_deref().ok_or(LifecycleError::MissingId)?;
    let digest = digest_from_hex(id)?;
    let signature = key.sign_digest(&digest)?;
    tx.signature = Some(signature.to_hex());
    Ok(())
}

/// Derive the id, sign it, then derive the hash.
pub fn seal(tx: &mut Transaction, key: &Secp256k1KeyPair) -> Result<(), LifecycleError> {
    if tx.quorum().is_none() {
        return Err(LifecycleError::QuorumNotAssigned);
    }
    tx.id = Some(derive_id(tx));
    sign(tx, key)?;
    tx.hash = Some(derive_hash(tx));
    debug!(tx_id = ?tx.id, "[ql-04] Transaction sealed");
    Ok(())
}

/// Recompute the id and compare it with the carried one.
pub fn verify_id(tx: &Transaction) -> Result<(), LifecycleError> {
    let carried = tx.id.as_deref().ok_or(LifecycleError::MissingId)?;
    let derived = derive_id(tx);
    if carried != derived {
        return Err(LifecycleError::IdMismatch {
            carried: carried.to_string(),
            derived,
        });
    }
    Ok(())
}

/// Check the carried signature against `from` over the carried id.
pub fn verify_signature(tx: &Transaction) -> Result<(), LifecycleError> {
    let id = tx.id.as_deref().ok_or(LifecycleError::MissingId)?;
    let signature_hex = tx
        .signature
        .as_deref()
        .ok_or(LifecycleError::MissingSignature)?;
    let digest = digest_from_hex(id)?;
    let signature = Secp256k1Signature::from_hex(signature_hex)?;
    verify_digest(&tx.from, &digest, &signature)?;
    Ok(())
}

/// Recompute the hash of an entry that still carries its amount.
pub fn verify_hash(tx: &Transaction) -> Result<(), LifecycleError> {
    let carried = tx.hash.as_deref().ok_or(LifecycleError::MissingHash)?;
    let derived = derive_hash(tx);
    if carried != derived {
        return Err(LifecycleError::HashMismatch {
            carried: carried.to_string(),
            derived,
        });
    }
    Ok(())
}

/// The unsigned, quorum-less transfer that seeds a wallet.
pub fn genesis_transfer(to: Address, amount: u64, timestamp: u64) -> Transaction {
    let mut tx = construct(Address::genesis(), to, amount, timestamp);
    tx.id = Some(derive_id(&tx));
    tx.hash = Some(derive_hash(&tx));
    tx
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_crypto::CryptoError;

    fn addr(n: u64) -> Address {
        Address::parse(&format!("04{:0128x}", n)).unwrap()
    }

    fn quorum() -> QuorumMembers {
        QuorumMembers {
            witness_one: addr(10),
            witness_two: addr(11),
            partner_one: addr(20),
            partner_two: addr(21),
        }
    }

    fn sealed(key: &Secp256k1KeyPair) -> Transaction {
        let mut tx = construct(key.address(), addr(2), 100, 42);
        assign_quorum(&mut tx, &quorum());
        seal(&mut tx, key).unwrap();
        tx
    }

    #[test]
    fn test_sealed_transaction_verifies() {
        let key = Secp256k1KeyPair::generate();
        let tx = sealed(&key);

        assert!(verify_id(&tx).is_ok());
        assert!(verify_signature(&tx).is_ok());
        assert!(verify_hash(&tx).is_ok());
    }

    #[test]
    fn test_seal_requires_quorum() {
        let key = Secp256k1KeyPair::generate();
        let mut tx = construct(key.address(), addr(2), 1, 1);
        assert_eq!(seal(&mut tx, &key), Err(LifecycleError::QuorumNotAssigned));
    }

    #[test]
    fn test_sign_requires_id() {
        let key = Secp256k1KeyPair::generate();
        let mut tx = construct(key.address(), addr(2), 1, 1);
        assert_eq!(sign(&mut tx, &key), Err(LifecycleError::MissingId));
    }

    #[test]
    fn test_swapped_quorum_breaks_id() {
        let key = Secp256k1KeyPair::generate();
        let mut tx = sealed(&key);
        tx.witness_one = Some(addr(77));

        assert!(matches!(verify_id(&tx), Err(LifecycleError::IdMismatch { .. })));
    }

    #[test]
    fn test_reassigning_quorum_clears_derived_fields() {
        let key = Secp256k1KeyPair::generate();
        let mut tx = sealed(&key);
        assign_quorum(&mut tx, &quorum());
        assert!(tx.id.is_none() && tx.signature.is_none() && tx.hash.is_none());
    }

    #[test]
    fn test_signature_from_other_key_fails() {
        let key = Secp256k1KeyPair::generate();
        let mut tx = sealed(&key);
        let forged = sealed(&Secp256k1KeyPair::generate());
        tx.signature = forged.signature;

        assert_eq!(
            verify_signature(&tx),
            Err(LifecycleError::Crypto(CryptoError::SignatureVerificationFailed))
        );
    }

    #[test]
    fn test_tampered_amount_breaks_hash_not_id() {
        let key = Secp256k1KeyPair::generate();
        let mut tx = sealed(&key);
        tx.amount = Some(1_000_000);

        assert!(verify_id(&tx).is_ok());
        assert!(matches!(verify_hash(&tx), Err(LifecycleError::HashMismatch { .. })));
    }

    #[test]
    fn test_unsigned_transaction_is_rejected() {
        let key = Secp256k1KeyPair::generate();
        let mut tx = sealed(&key);
        tx.signature = None;
        assert_eq!(verify_signature(&tx), Err(LifecycleError::MissingSignature));
    }

    #[test]
    fn test_genesis_transfer_shape() {
        let me = addr(5);
        let tx = genesis_transfer(me.clone(), 500, 0);

        assert!(tx.is_genesis());
        assert_eq!(tx.to, me);
        assert!(tx.quorum().is_none());
        assert!(verify_id(&tx).is_ok());
        assert!(verify_hash(&tx).is_ok());
        assert!(tx.signature.is_none());
    }
}
