//! Credit service over the transport

use async_trait::async_trait;
use futures::future::join_all;
use reqwest::Method;
use serde::Deserialize;
use std::sync::Arc;

use crate::error::GenError;
use crate::traits::{CreditBalance, CreditService};
use crate::transport::{RequestOptions, Transport};
use crate::types::Credential;

pub const USER_CREDIT_PATH: &str = "/commerce/v1/benefits/user_credit";
pub const CREDIT_RECEIVE_PATH: &str = "/commerce/v1/benefits/credit_receive";

/// Time zone the daily grant is claimed in
const GRANT_TIME_ZONE: &str = "Asia/Shanghai";

#[derive(Debug, Default, Deserialize)]
struct UserCreditData {
    #[serde(default)]
    credit: CreditBuckets,
}

#[derive(Debug, Default, Deserialize)]
struct CreditBuckets {
    #[serde(default)]
    gift_credit: i64,
    #[serde(default)]
    purchase_credit: i64,
    #[serde(default)]
    vip_credit: i64,
}

#[derive(Debug, Default, Deserialize)]
struct CreditReceiveData {
    #[serde(default)]
    receive_quota: i64,
    #[serde(default)]
    cur_total_credits: i64,
}

/// [`CreditService`] backed by the provider's commerce endpoints.
#[derive(Clone)]
pub struct HttpCreditService {
    transport: Arc<dyn Transport>,
}

impl HttpCreditService {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl CreditService for HttpCreditService {
    async fn get_credit(&self, credential: &Credential) -> Result<CreditBalance, GenError> {
        let data = self
            .transport
            .request(
                Method::POST,
                USER_CREDIT_PATH,
                credential,
                RequestOptions::new().with_data(serde_json::json!({})),
            )
            .await?;
        let parsed: UserCreditData = serde_json::from_value(data)
            .map_err(|e| GenError::ParseError(format!("invalid credit response: {e}")))?;

        let balance = CreditBalance::new(
            parsed.credit.gift_credit,
            parsed.credit.purchase_credit,
            parsed.credit.vip_credit,
        );
        tracing::debug!(
            gift = balance.gift,
            purchase = balance.purchase,
            vip = balance.vip,
            total = balance.total,
            "Fetched credit balance"
        );
        Ok(balance)
    }

    async fn receive_credit(&self, credential: &Credential) -> Result<i64, GenError> {
        let data = self
            .transport
            .request(
                Method::POST,
                CREDIT_RECEIVE_PATH,
                credential,
                RequestOptions::new().with_data(serde_json::json!({ "time_zone": GRANT_TIME_ZONE })),
            )
            .await?;
        let parsed: CreditReceiveData = serde_json::from_value(data)
            .map_err(|e| GenError::ParseError(format!("invalid credit grant response: {e}")))?;

        tracing::info!(
            received = parsed.receive_quota,
            total = parsed.cur_total_credits,
            "Claimed daily credits"
        );
        Ok(parsed.receive_quota)
    }
}

/// Check every credential concurrently. Results keep the input order.
pub async fn check_balances(
    service: &dyn CreditService,
    credentials: &[Credential],
) -> Vec<Result<CreditBalance, GenError>> {
    join_all(credentials.iter().map(|credential| service.get_credit(credential))).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executors::test_support::ScriptedTransport;
    use serde_json::json;

    #[tokio::test]
    async fn balance_sums_buckets() {
        let transport = Arc::new(ScriptedTransport::new(vec![Ok(json!({
            "credit": {"gift_credit": 60, "purchase_credit": 0, "vip_credit": 15}
        }))]));
        let service = HttpCreditService::new(transport.clone());

        let balance = service.get_credit(&Credential::new("t")).await.unwrap();
        assert_eq!(balance, CreditBalance::new(60, 0, 15));
        assert_eq!(balance.total, 75);
        assert_eq!(transport.calls()[0].path, USER_CREDIT_PATH);
    }

    #[tokio::test]
    async fn receive_sends_time_zone() {
        let transport = Arc::new(ScriptedTransport::new(vec![Ok(json!({
            "cur_total_credits": 66, "receive_quota": 66
        }))]));
        let service = HttpCreditService::new(transport.clone());

        let received = service.receive_credit(&Credential::new("t")).await.unwrap();
        assert_eq!(received, 66);

        let call = &transport.calls()[0];
        assert_eq!(call.path, CREDIT_RECEIVE_PATH);
        assert_eq!(call.data, Some(json!({"time_zone": "Asia/Shanghai"})));
    }

    #[tokio::test]
    async fn balances_are_checked_per_credential_in_order() {
        let transport = Arc::new(ScriptedTransport::from_fn(|_, call| {
            match call.token.as_str() {
                "rich" => Ok(json!({"credit": {"gift_credit": 10}})),
                "broke" => Ok(json!({"credit": {}})),
                _ => Err(GenError::api_error("1015", "login error")),
            }
        }));
        let service = HttpCreditService::new(transport);
        let credentials = vec![
            Credential::new("rich"),
            Credential::new("broke"),
            Credential::new("expired"),
        ];

        let results = check_balances(&service, &credentials).await;
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().total, 10);
        assert!(results[1].as_ref().unwrap().is_exhausted());
        assert!(results[2].is_err());
    }
}
