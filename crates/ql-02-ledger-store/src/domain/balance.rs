use shared_types::{Address, Ledger};

/// Credits minus debits for `address` over every entry in `ledger`.
///
/// Entries without an amount (witness copies) contribute nothing. Amounts
/// are `u64`, so the sum is kept in `i128` and cannot wrap.
pub fn balance(ledger: &Ledger, address: &Address) -> i128 {
    ledger.entries().iter().fold(0i128, |acc, entry| {
        let amount = i128::from(entry.amount.unwrap_or(0));
        let mut next = acc;
        if entry.to == *address {
            next += amount;
        }
        if entry.from == *address {
            next -= amount;
        }
        next
    })
}
