//! Credit balance capability

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::GenError;
use crate::types::Credential;

/// Account credit snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditBalance {
    pub gift: i64,
    pub purchase: i64,
    pub vip: i64,
    pub total: i64,
}

impl CreditBalance {
    pub fn new(gift: i64, purchase: i64, vip: i64) -> Self {
        Self {
            gift,
            purchase,
            vip,
            total: gift + purchase + vip,
        }
    }

    /// Nothing left to spend.
    pub fn is_exhausted(&self) -> bool {
        self.total <= 0
    }
}

#[async_trait]
pub trait CreditService: Send + Sync {
    /// Read-only balance lookup.
    async fn get_credit(&self, credential: &Credential) -> Result<CreditBalance, GenError>;

    /// Claim the daily credit grant. Returns the amount received.
    async fn receive_credit(&self, credential: &Credential) -> Result<i64, GenError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_sums_all_buckets() {
        let balance = CreditBalance::new(10, 5, 0);
        assert_eq!(balance.total, 15);
        assert!(!balance.is_exhausted());
        assert!(CreditBalance::default().is_exhausted());
    }
}
