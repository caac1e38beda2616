//! Account sign normalization.

use models::{Account, Transaction};
use serde_json::Value;

use crate::error::Result;
use crate::matcher;

/// Flip the amount sign of every transaction on a credit-type account.
///
/// Credit card statements report charges as positive amounts; flipping
/// them makes spending negative across all accounts. Must run exactly
/// once per pipeline run — a second pass would flip the matched
/// amounts back.
pub fn normalize_account_signs(txns: &mut [Transaction], accounts: &[Account]) -> Result<()> {
    for account in accounts {
        if !account.kind.eq_ignore_ascii_case("credit") {
            continue;
        }
        for txn in txns.iter_mut() {
            let text = matcher::field_text(txn, "account");
            if !matcher::search(&text, &account.name)? {
                continue;
            }
            if let Some(amount) = txn.get("amount").and_then(Value::as_f64) {
                txn.insert("amount".to_string(), Value::from(-amount));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn txns(v: Value) -> Vec<Transaction> {
        v.as_array()
            .unwrap()
            .iter()
            .map(|t| t.as_object().unwrap().clone())
            .collect()
    }

    fn accounts(v: Value) -> Vec<Account> {
        serde_json::from_value(v).unwrap()
    }

    fn amount(t: &Transaction) -> f64 {
        t.get("amount").and_then(Value::as_f64).unwrap()
    }

    #[test]
    fn test_credit_account_flips_sign() {
        let mut ts = txns(json!([
            {"account": "Visa", "amount": 20.0},
            {"account": "Visa", "amount": -4.5}
        ]));
        let accs = accounts(json!([{"name": "Visa", "type": "credit"}]));
        normalize_account_signs(&mut ts, &accs).unwrap();
        assert_eq!(amount(&ts[0]), -20.0);
        assert_eq!(amount(&ts[1]), 4.5);
    }

    #[test]
    fn test_account_pattern_is_substring_and_case_insensitive() {
        let mut ts = txns(json!([{"account": "Chase VISA Card", "amount": 10.0}]));
        let accs = accounts(json!([{"name": "visa", "type": "Credit"}]));
        normalize_account_signs(&mut ts, &accs).unwrap();
        assert_eq!(amount(&ts[0]), -10.0);
    }

    #[test]
    fn test_non_credit_accounts_untouched() {
        let mut ts = txns(json!([{"account": "Checking", "amount": 100.0}]));
        let accs = accounts(json!([{"name": "Checking", "type": "depository"}]));
        normalize_account_signs(&mut ts, &accs).unwrap();
        assert_eq!(amount(&ts[0]), 100.0);
    }

    #[test]
    fn test_unmatched_account_untouched() {
        let mut ts = txns(json!([
            {"account": "Checking", "amount": 9.0},
            {"amount": 7.0}
        ]));
        let accs = accounts(json!([{"name": "Visa", "type": "credit"}]));
        normalize_account_signs(&mut ts, &accs).unwrap();
        assert_eq!(amount(&ts[0]), 9.0);
        assert_eq!(amount(&ts[1]), 7.0);
    }

    #[test]
    fn test_running_twice_double_flips() {
        // Caller discipline: normalization is not idempotent.
        let mut ts = txns(json!([{"account": "Visa", "amount": 20.0}]));
        let accs = accounts(json!([{"name": "Visa", "type": "credit"}]));
        normalize_account_signs(&mut ts, &accs).unwrap();
        normalize_account_signs(&mut ts, &accs).unwrap();
        assert_eq!(amount(&ts[0]), 20.0);
    }
}
