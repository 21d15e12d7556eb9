//! Token issuing: pickup tokens and payment-correlation ids.

use chrono::Utc;
use rand::Rng;

const PAYMENT_ID_PREFIX: &str = "PAY";
const PAYMENT_SUFFIX_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const PAYMENT_SUFFIX_LEN: usize = 4;

/// Issues order tokens and payment ids.
///
/// Order tokens are deliberately low-cardinality: they are spoken aloud at
/// the counter, so `000`–`999` is the whole space and two open orders may
/// transiently share one. The ledger resolves token lookups to the most
/// recent match; nothing in the engine enforces token uniqueness.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenIssuer;

impl TokenIssuer {
    pub fn new() -> Self {
        Self
    }

    /// A uniform random 3-digit pickup code.
    pub fn issue_order_token(&self) -> String {
        let n: u16 = rand::thread_rng().gen_range(0..1000);
        format!("{n:03}")
    }

    /// Payment-correlation id: fixed prefix, second-resolution time
    /// component, random alphanumeric suffix. Display/correlation only,
    /// never a primary key.
    pub fn issue_payment_id(&self) -> String {
        let ts = Utc::now().timestamp();
        let time_part = format!("{ts}");
        let time_part = &time_part[time_part.len().saturating_sub(6)..];

        let mut rng = rand::thread_rng();
        let suffix: String = (0..PAYMENT_SUFFIX_LEN)
            .map(|_| {
                let idx = rng.gen_range(0..PAYMENT_SUFFIX_CHARSET.len());
                PAYMENT_SUFFIX_CHARSET[idx] as char
            })
            .collect();

        format!("{PAYMENT_ID_PREFIX}{time_part}{suffix}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_tokens_are_three_digits() {
        let issuer = TokenIssuer::new();
        for _ in 0..200 {
            let token = issuer.issue_order_token();
            assert_eq!(token.len(), 3);
            assert!(token.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn payment_ids_have_prefix_time_and_suffix() {
        let issuer = TokenIssuer::new();
        let id = issuer.issue_payment_id();
        assert!(id.starts_with(PAYMENT_ID_PREFIX));
        assert_eq!(id.len(), PAYMENT_ID_PREFIX.len() + 6 + PAYMENT_SUFFIX_LEN);
        let suffix = &id[id.len() - PAYMENT_SUFFIX_LEN..];
        assert!(suffix
            .bytes()
            .all(|b| PAYMENT_SUFFIX_CHARSET.contains(&b)));
    }

    #[test]
    fn payment_ids_rarely_collide() {
        let issuer = TokenIssuer::new();
        let ids: std::collections::HashSet<String> =
            (0..100).map(|_| issuer.issue_payment_id()).collect();
        // 36^4 suffixes within one second; 100 draws should not collapse.
        assert!(ids.len() > 90);
    }
}
