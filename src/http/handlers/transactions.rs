//! `/api/transactions`: build unsigned donations, relay signed ones.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::http::error::{ApiError, ApiResult};
use crate::http::handlers::parse_address;
use crate::http::request::{required_text, ApiJson};
use crate::http::server::AppState;
use crate::models::{Donation, DonationStatus, NewDonation};
use crate::solana::format::{explorer_url, ExplorerKind};
use crate::solana::transaction::signature_from_wire;
use crate::solana::PreparedTransaction;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationTransactionBody {
    pub donor: Option<String>,
    pub recipient: Option<String>,
    pub amount: Option<f64>,
    #[serde(default)]
    pub is_charity_token: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationTransaction {
    #[serde(flatten)]
    pub prepared: PreparedTransaction,
    /// Lamports.
    pub estimated_fee: u64,
}

/// Unsigned donation transfer for the donor's wallet to sign.
pub async fn create_donation_transaction(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<DonationTransactionBody>,
) -> ApiResult<Json<DonationTransaction>> {
    let (Some(donor), Some(recipient), Some(amount)) = (
        required_text(&body.donor),
        required_text(&body.recipient),
        body.amount,
    ) else {
        return Err(ApiError::bad_request("Missing required fields"));
    };
    let donor = parse_address(donor)?;
    let recipient = parse_address(recipient)?;

    let transaction = state
        .solana
        .create_donation_transaction(&donor, &recipient, amount, body.is_charity_token)
        .await?;
    let estimated_fee = state.solana.estimate_fee(&transaction.message).await;

    tracing::info!(
        donor = %donor,
        recipient = %recipient,
        amount,
        charity_token = body.is_charity_token,
        "Donation transaction prepared"
    );

    Ok(Json(DonationTransaction {
        prepared: PreparedTransaction::from_transaction(&transaction),
        estimated_fee,
    }))
}

fn default_wait() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitBody {
    /// Base64 wire transaction signed by the wallet.
    pub transaction: String,
    #[serde(default = "default_wait")]
    pub wait_for_confirmation: bool,
    /// Donation to record against the resulting signature.
    #[serde(default)]
    pub donation: Option<NewDonation>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResult {
    pub signature: String,
    pub confirmed: bool,
    pub explorer_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub donation: Option<Donation>,
}

/// Relay a signed transaction, optionally wait for it, and record the
/// donation it pays for.
pub async fn submit_transaction(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<SubmitBody>,
) -> ApiResult<Json<SubmitResult>> {
    // Rejects unsigned or malformed payloads before they reach the node.
    signature_from_wire(&body.transaction)?;

    let signature = state.solana.send_transaction(&body.transaction).await?;
    let confirmed = body.wait_for_confirmation && state.confirm_within_budget(&signature).await;

    let donation = match body.donation {
        Some(mut donation) => {
            donation.transaction_signature = Some(signature.clone());
            donation.status = Some(if confirmed {
                DonationStatus::Confirmed
            } else {
                DonationStatus::Pending
            });
            Some(state.store.record_donation(&donation).await?)
        }
        None => None,
    };

    Ok(Json(SubmitResult {
        explorer_url: explorer_url(&signature, ExplorerKind::Tx, state.solana.cluster().as_str()),
        signature,
        confirmed,
        donation,
    }))
}
