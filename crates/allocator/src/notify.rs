//! Run notifications.
//!
//! Executed runs push a summary to a Telegram chat. The notifier sits
//! behind a trait so the orchestrator can be exercised without network
//! access.

#![allow(async_fn_in_trait)]

use alloy_primitives::{Address, B256, I256, U256};
use reqwest::Client;
use serde::Serialize;

use crate::chain::explorer_tx_url;
use crate::config::OptimizationMode;
use crate::error::{AllocatorError, Result};

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// One vault's change in an executed rebalance
#[derive(Debug, Clone)]
pub struct AllocationChange {
    pub vault: Address,
    pub symbol: String,
    pub old_amount: U256,
    pub new_amount: U256,
    pub diff: I256,
}

/// Summary of an executed run, handed to the notifier
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub mode: OptimizationMode,
    pub chain_id: u64,
    pub earn_vault: Address,
    pub total_returns_before: f64,
    pub total_returns_after: f64,
    pub transferred: Option<U256>,
    pub tx_hash: Option<B256>,
    pub changes: Vec<AllocationChange>,
}

/// Notification delivery for executed runs.
pub trait RunNotifier {
    async fn notify_run(&self, summary: &RunSummary) -> Result<()>;
}

/// Renders the run summary into the message body.
pub fn format_run_message(summary: &RunSummary) -> String {
    let mut lines = vec![format!(
        "Earn allocator run ({} mode) on vault {}",
        summary.mode, summary.earn_vault
    )];
    lines.push(format!(
        "Returns: {:.4}% -> {:.4}%",
        summary.total_returns_before, summary.total_returns_after
    ));
    if let Some(transferred) = summary.transferred {
        lines.push(format!("Transferred: {transferred}"));
    }
    for change in &summary.changes {
        lines.push(format!(
            "{} ({}): {} -> {} ({})",
            change.symbol, change.vault, change.old_amount, change.new_amount, change.diff
        ));
    }
    if let Some(tx_hash) = summary.tx_hash {
        let link = crate::chain::chain_from_id(summary.chain_id)
            .ok()
            .and_then(|chain| explorer_tx_url(chain, tx_hash));
        match link {
            Some(url) => lines.push(url),
            None => lines.push(format!("tx: {tx_hash}")),
        }
    }
    lines.join("\n")
}

#[derive(Serialize)]
struct SendMessageRequest {
    chat_id: String,
    text: String,
}

/// Notifier pushing run summaries through the Telegram Bot API.
pub struct TelegramNotifier {
    client: Client,
    api_base: String,
    bot_token: String,
    chat_id: String,
}

impl TelegramNotifier {
    /// Creates a notifier for the given bot token and chat id.
    pub fn new(bot_token: String, chat_id: String) -> Self {
        Self {
            client: Client::new(),
            api_base: TELEGRAM_API_BASE.to_string(),
            bot_token,
            chat_id,
        }
    }

    /// Creates a notifier against a custom API base URL (for tests).
    pub fn with_api_base(api_base: String, bot_token: String, chat_id: String) -> Self {
        Self {
            client: Client::new(),
            api_base,
            bot_token,
            chat_id,
        }
    }
}

impl RunNotifier for TelegramNotifier {
    async fn notify_run(&self, summary: &RunSummary) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, self.bot_token);
        let body = SendMessageRequest {
            chat_id: self.chat_id.clone(),
            text: format_run_message(summary),
        };
        self.client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AllocatorError::Notify(e.to_string()))?
            .error_for_status()
            .map_err(|e| AllocatorError::Notify(e.to_string()))?;
        Ok(())
    }
}

// A run without a configured channel simply skips delivery
impl<N: RunNotifier> RunNotifier for Option<N> {
    async fn notify_run(&self, summary: &RunSummary) -> Result<()> {
        match self {
            Some(notifier) => notifier.notify_run(summary).await,
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn summary() -> RunSummary {
        RunSummary {
            mode: OptimizationMode::Drain,
            chain_id: 1,
            earn_vault: Address::with_last_byte(3),
            total_returns_before: 4.2,
            total_returns_after: 4.5,
            transferred: Some(U256::from(990u64)),
            tx_hash: Some(B256::repeat_byte(0xab)),
            changes: vec![AllocationChange {
                vault: Address::with_last_byte(1),
                symbol: "eUSDC".to_string(),
                old_amount: U256::from(1_000u64),
                new_amount: U256::from(10u64),
                diff: I256::try_from(-990).unwrap(),
            }],
        }
    }

    #[test]
    fn test_format_run_message_includes_transfer_and_link() {
        let message = format_run_message(&summary());
        assert!(message.contains("drain mode"));
        assert!(message.contains("Transferred: 990"));
        assert!(message.contains("https://etherscan.io/tx/"));
        assert!(message.contains("eUSDC"));
    }

    #[test]
    fn test_format_run_message_without_tx() {
        let mut summary = summary();
        summary.tx_hash = None;
        let message = format_run_message(&summary);
        assert!(!message.contains("etherscan.io"));
    }

    #[tokio::test]
    async fn test_telegram_notifier_posts_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bottoken/sendMessage"))
            .and(body_partial_json(serde_json::json!({ "chat_id": "42" })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let notifier =
            TelegramNotifier::with_api_base(server.uri(), "token".to_string(), "42".to_string());
        notifier.notify_run(&summary()).await.unwrap();
    }

    #[tokio::test]
    async fn test_telegram_notifier_surfaces_http_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let notifier =
            TelegramNotifier::with_api_base(server.uri(), "token".to_string(), "42".to_string());
        let result = notifier.notify_run(&summary()).await;
        assert!(matches!(result, Err(AllocatorError::Notify(_))));
    }
}
