//! End-to-end tests of the REST API against an in-memory store and a mock
//! JSON-RPC node.

use charity_platform::solana::Transaction;
use charity_sdk::{ApiFailure, CharityClient, DonationPayload, UserRegistration};
use reqwest::StatusCode;
use serde_json::{json, Value};

mod common;

use common::{
    address, spawn_platform, spawn_platform_on, spawn_platform_with, wallet, MockNode, ADMIN_KEY,
    MOCK_SIGNATURE,
};

fn failure(err: Box<dyn std::error::Error + Send + Sync>) -> ApiFailure {
    *err.downcast::<ApiFailure>().expect("API failure")
}

async fn register(client: &CharityClient, seed: u8, name: &str) -> Value {
    client
        .register_user(&UserRegistration {
            wallet_address: address(seed).to_string(),
            name: Some(name.to_string()),
            email: None,
        })
        .await
        .unwrap()
}

fn request_body(user_id: &str, title: &str, urgency: &str) -> Value {
    json!({
        "userId": user_id,
        "title": title,
        "description": "Help needed",
        "category": "MEDICAL",
        "targetAmount": "1000",
        "urgency": urgency,
        "deadline": "2030-01-01T00:00:00Z",
    })
}

#[tokio::test]
async fn test_health_reports_dependencies() {
    let platform = spawn_platform().await;
    let client = CharityClient::new(&platform.base_url);

    let health = client.health().await.unwrap();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["store"], "sqlite");
    assert_eq!(health["storeHealthy"], true);
    assert_eq!(health["chainHealthy"], true);
    assert_eq!(health["network"], "devnet");
    assert!(platform.rpc.called("getHealth"));
}

#[tokio::test]
async fn test_echo_endpoint() {
    let platform = spawn_platform().await;
    let http = common::http_client();

    let res = http.get(platform.url("/api/test")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Islamic Charity Platform API is running");

    let res = http
        .post(platform.url("/api/test"))
        .json(&json!({ "hello": "world" }))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["received"]["hello"], "world");

    let res = http
        .post(platform.url("/api/test"))
        .header("content-type", "application/json")
        .body("{broken")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Failed to parse JSON");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let platform = spawn_platform().await;
    let res = common::http_client()
        .get(platform.url("/api/test"))
        .send()
        .await
        .unwrap();
    assert!(res.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_user_registration_and_lookup() {
    let platform = spawn_platform().await;
    let client = CharityClient::new(&platform.base_url);

    let user = register(&client, 1, "Aisha").await;
    assert_eq!(user["walletAddress"], address(1).to_string());
    assert_eq!(user["role"], "USER");

    // Registering again updates instead of duplicating.
    let again = register(&client, 1, "Aisha B").await;
    assert_eq!(again["id"], user["id"]);
    assert_eq!(again["name"], "Aisha B");

    let profile = client.user(&address(1).to_string()).await.unwrap();
    assert_eq!(profile["_count"]["donations"], 0);

    let err = failure(client.user(&address(2).to_string()).await.unwrap_err());
    assert_eq!(err.status, StatusCode::NOT_FOUND);
    assert_eq!(err.message, "User not found");

    let res = common::http_client()
        .post(platform.url("/api/users"))
        .json(&json!({ "name": "No wallet" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Wallet address is required");
}

#[tokio::test]
async fn test_requests_are_listed_by_urgency() {
    let platform = spawn_platform().await;
    let client = CharityClient::new(&platform.base_url);
    let user = register(&client, 1, "Omar").await;
    let user_id = user["id"].as_str().unwrap();

    client
        .create_request(&request_body(user_id, "Roof repair", "LOW"))
        .await
        .unwrap();
    let urgent = client
        .create_request(&request_body(user_id, "Surgery", "URGENT"))
        .await
        .unwrap();
    assert_eq!(urgent["status"], "PENDING");
    assert_eq!(urgent["user"]["name"], "Omar");

    let page = client.list_requests(&[("limit", "10")]).await.unwrap();
    let titles: Vec<&str> = page["requests"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["Surgery", "Roof repair"]);
    assert_eq!(page["pagination"]["total"], 2);

    let filtered = client
        .list_requests(&[("urgency", "low")])
        .await
        .unwrap();
    assert_eq!(filtered["requests"].as_array().unwrap().len(), 1);

    let err = failure(
        client
            .list_requests(&[("category", "SPACESHIPS")])
            .await
            .unwrap_err(),
    );
    assert_eq!(err.status, StatusCode::BAD_REQUEST);

    let err = failure(client.request("missing").await.unwrap_err());
    assert_eq!(err.status, StatusCode::NOT_FOUND);
    assert_eq!(err.message, "Charity request not found");
}

#[tokio::test]
async fn test_create_request_validation() {
    let platform = spawn_platform().await;
    let client = CharityClient::new(&platform.base_url);

    let err = failure(
        client
            .create_request(&json!({ "title": "Only a title" }))
            .await
            .unwrap_err(),
    );
    assert_eq!(err.status, StatusCode::BAD_REQUEST);
    assert_eq!(err.message, "Missing required fields");

    // A blank amount from an empty form field is a missing field too.
    let mut blank_amount = request_body("u1", "Blank", "HIGH");
    blank_amount["targetAmount"] = json!("");
    let err = failure(client.create_request(&blank_amount).await.unwrap_err());
    assert_eq!(err.status, StatusCode::BAD_REQUEST);
    assert_eq!(err.message, "Missing required fields");

    let err = failure(
        client
            .create_request(&request_body("ghost", "Orphan", "HIGH"))
            .await
            .unwrap_err(),
    );
    assert_eq!(err.status, StatusCode::NOT_FOUND);
    assert_eq!(err.message, "User not found");
}

#[tokio::test]
async fn test_donation_credits_request_and_donor() {
    let platform = spawn_platform().await;
    let client = CharityClient::new(&platform.base_url);
    let owner = register(&client, 1, "Owner").await;
    let donor = register(&client, 2, "Donor").await;
    let request = client
        .create_request(&request_body(owner["id"].as_str().unwrap(), "Clinic", "HIGH"))
        .await
        .unwrap();
    let request_id = request["id"].as_str().unwrap();

    let donation = client
        .record_donation(&DonationPayload {
            donor_id: donor["id"].as_str().unwrap().to_string(),
            request_id: Some(request_id.to_string()),
            amount: 250.0,
            transaction_signature: Some(MOCK_SIGNATURE.to_string()),
            ..DonationPayload::default()
        })
        .await
        .unwrap();
    assert_eq!(donation["amount"], 250.0);

    let request = client.request(request_id).await.unwrap();
    assert_eq!(request["receivedAmount"], 250.0);
    assert_eq!(request["_count"]["donations"], 1);

    let profile = client.user(&address(2).to_string()).await.unwrap();
    assert_eq!(profile["totalDonated"], 250.0);

    let stats = client.stats().await.unwrap();
    assert_eq!(stats["success"], true);
    assert_eq!(stats["data"]["totalDonations"], 250.0);
    assert_eq!(stats["data"]["totalDonationCount"], 1);
    assert_eq!(stats["data"]["categories"]["MEDICAL"]["count"], 1);

    // Neither or both targets is rejected.
    let err = failure(
        client
            .record_donation(&DonationPayload {
                donor_id: donor["id"].as_str().unwrap().to_string(),
                amount: 10.0,
                ..DonationPayload::default()
            })
            .await
            .unwrap_err(),
    );
    assert_eq!(err.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_routes_require_key() {
    let platform = spawn_platform().await;

    let anonymous = CharityClient::new(&platform.base_url);
    let err = failure(anonymous.admin_status().await.unwrap_err());
    assert_eq!(err.status, StatusCode::UNAUTHORIZED);

    let wrong = CharityClient::new(&platform.base_url).with_admin_key("nope");
    let err = failure(wrong.admin_status().await.unwrap_err());
    assert_eq!(err.status, StatusCode::UNAUTHORIZED);

    let admin = CharityClient::new(&platform.base_url).with_admin_key(ADMIN_KEY);
    let status = admin.admin_status().await.unwrap();
    assert_eq!(status["status"], "operational");
    assert_eq!(status["zakatPool"], address(7).to_string());
}

#[tokio::test]
async fn test_admin_routes_absent_when_disabled() {
    let platform = spawn_platform_with(|config| config.admin.enabled = false, None).await;
    let res = common::http_client()
        .get(platform.url("/admin/status"))
        .bearer_auth(ADMIN_KEY)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_moderation_notifies_owner() {
    let platform = spawn_platform().await;
    let client = CharityClient::new(&platform.base_url).with_admin_key(ADMIN_KEY);
    let owner = register(&client, 1, "Owner").await;
    let owner_id = owner["id"].as_str().unwrap();

    let private = client
        .create_request(&json!({
            "userId": owner_id,
            "title": "Private appeal",
            "description": "Family matter",
            "category": "HOUSING",
            "targetAmount": 300,
            "urgency": "MEDIUM",
            "deadline": "2030-01-01",
            "isPublic": false,
        }))
        .await
        .unwrap();
    let id = private["id"].as_str().unwrap();

    // Hidden from the public listing, visible to moderators.
    let public = client.list_requests(&[]).await.unwrap();
    assert_eq!(public["pagination"]["total"], 0);
    let queue: Value = common::http_client()
        .get(platform.url("/admin/requests?status=PENDING"))
        .bearer_auth(ADMIN_KEY)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(queue["pagination"]["total"], 1);

    let approved = client.approve_request(id).await.unwrap();
    assert_eq!(approved["status"], "APPROVED");
    assert_eq!(approved["reviewedBy"], "admin");

    let rejected = client.reject_request(id, "Duplicate").await.unwrap();
    assert_eq!(rejected["status"], "REJECTED");
    assert_eq!(rejected["rejectionReason"], "Duplicate");

    let notifications: Value = common::http_client()
        .get(platform.url(&format!("/api/notifications?userId={owner_id}")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let kinds: Vec<&str> = notifications
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["kind"].as_str().unwrap())
        .collect();
    assert_eq!(kinds.len(), 2);
    assert!(kinds.contains(&"REQUEST_APPROVED"));
    assert!(kinds.contains(&"REQUEST_REJECTED"));

    let err = failure(client.approve_request("missing").await.unwrap_err());
    assert_eq!(err.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_wallet_balances() {
    let platform = spawn_platform().await;
    let client = CharityClient::new(&platform.base_url);

    let balances = client.wallet(&address(3).to_string()).await.unwrap();
    assert_eq!(balances["solBalance"], 2.5);
    assert_eq!(balances["charityTokenBalance"], 1.5);

    let err = failure(client.wallet("not-a-key").await.unwrap_err());
    assert_eq!(err.status, StatusCode::BAD_REQUEST);
    assert_eq!(err.message, "Invalid wallet address");
}

#[tokio::test]
async fn test_zakat_pool_balance() {
    let platform = spawn_platform().await;
    let pool = CharityClient::new(&platform.base_url).zakat_pool().await.unwrap();
    assert_eq!(pool["address"], address(7).to_string());
    assert_eq!(pool["balance"], 1_500_000_000u64);
}

#[tokio::test]
async fn test_zakat_pool_unconfigured() {
    let platform =
        spawn_platform_with(|config| config.solana.zakat_pool_address.clear(), None).await;
    let err = failure(
        CharityClient::new(&platform.base_url)
            .zakat_pool()
            .await
            .unwrap_err(),
    );
    assert_eq!(err.status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_zakat_distribution_signed_by_pool_owner() {
    let platform = spawn_platform_with(|_| {}, Some(wallet(7))).await;

    let res = common::http_client()
        .post(platform.url("/admin/zakat/distribute"))
        .bearer_auth(ADMIN_KEY)
        .json(&json!({ "recipient": address(4).to_string(), "amount": 12.5 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "CONFIRMED");
    assert_eq!(body["signature"], MOCK_SIGNATURE);
    assert!(body["transaction"].is_null());
    assert!(platform.rpc.called("sendTransaction"));
}

#[tokio::test]
async fn test_zakat_distribution_awaits_signature_without_authority() {
    let platform = spawn_platform().await;

    let res = common::http_client()
        .post(platform.url("/admin/zakat/distribute"))
        .bearer_auth(ADMIN_KEY)
        .json(&json!({ "recipient": address(4).to_string(), "amount": 3 }))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "AWAITING_SIGNATURE");
    assert!(body["signature"].is_null());
    assert!(body["transaction"]["transaction"].is_string());
    assert!(!platform.rpc.called("sendTransaction"));

    let res = common::http_client()
        .post(platform.url("/admin/zakat/distribute"))
        .bearer_auth(ADMIN_KEY)
        .json(&json!({ "recipient": address(4).to_string(), "amount": 0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_zakat_distribution_paid_by_pool_when_authority_differs() {
    // The authority is not the pool owner, so only the pool can complete
    // the transfer; it must also be the one paying the fees.
    let platform = spawn_platform_with(|_| {}, Some(wallet(8))).await;

    let res = common::http_client()
        .post(platform.url("/admin/zakat/distribute"))
        .bearer_auth(ADMIN_KEY)
        .json(&json!({ "recipient": address(4).to_string(), "amount": 5 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "AWAITING_SIGNATURE");
    assert_eq!(body["transaction"]["feePayer"], address(7).to_string());
    assert_eq!(body["transaction"]["signers"], json!([address(7).to_string()]));
    assert!(!platform.rpc.called("sendTransaction"));
}

#[tokio::test]
async fn test_projects_create_and_list() {
    let platform = spawn_platform().await;
    let client = CharityClient::new(&platform.base_url);
    let creator = register(&client, 1, "Yusuf").await;
    let http = common::http_client();

    let res = http
        .post(platform.url("/api/projects"))
        .json(&json!({
            "title": "Community well",
            "description": "Clean water for the village",
            "category": "WATER",
            "totalFunding": "12000",
            "totalStages": 3,
            "creatorId": creator["id"],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let project: Value = res.json().await.unwrap();
    assert_eq!(project["status"], "PENDING");
    assert_eq!(project["totalFunding"], 12000.0);
    assert_eq!(project["currentStage"], 1);

    let page = client.list_projects(&[("category", "water")]).await.unwrap();
    assert_eq!(page["pagination"]["total"], 1);
    assert_eq!(page["projects"][0]["title"], "Community well");

    let page = client.list_projects(&[("category", "SCHOOL")]).await.unwrap();
    assert_eq!(page["pagination"]["total"], 0);

    let res = http
        .post(platform.url("/api/projects"))
        .json(&json!({ "title": "No funding", "totalFunding": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Missing required fields");
}

#[tokio::test]
async fn test_donations_listed_by_donor() {
    let platform = spawn_platform().await;
    let client = CharityClient::new(&platform.base_url);
    let owner = register(&client, 1, "Owner").await;
    let donor = register(&client, 2, "Donor").await;
    let donor_id = donor["id"].as_str().unwrap();
    let request = client
        .create_request(&request_body(owner["id"].as_str().unwrap(), "School fees", "MEDIUM"))
        .await
        .unwrap();

    for amount in [20.0, 30.0] {
        client
            .record_donation(&DonationPayload {
                donor_id: donor_id.to_string(),
                request_id: Some(request["id"].as_str().unwrap().to_string()),
                amount,
                ..DonationPayload::default()
            })
            .await
            .unwrap();
    }

    let http = common::http_client();
    let donations: Value = http
        .get(platform.url(&format!("/api/donations?donorId={donor_id}")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(donations.as_array().unwrap().len(), 2);
    assert!(donations
        .as_array()
        .unwrap()
        .iter()
        .all(|d| d["status"] == "PENDING"));

    let res = http
        .get(platform.url("/api/donations?status=LOST"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_profile_update() {
    let platform = spawn_platform().await;
    let client = CharityClient::new(&platform.base_url);
    register(&client, 1, "Maryam").await;
    let http = common::http_client();

    let res = http
        .put(platform.url("/api/users"))
        .json(&json!({ "walletAddress": address(1).to_string(), "bio": "Engineer", "location": "Cairo" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let user: Value = res.json().await.unwrap();
    assert_eq!(user["bio"], "Engineer");
    assert_eq!(user["name"], "Maryam");

    let res = http
        .put(platform.url("/api/users"))
        .json(&json!({ "walletAddress": address(2).to_string(), "bio": "Nobody" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_token_info_and_wallet_history() {
    let platform = spawn_platform().await;
    let http = common::http_client();

    let token: Value = http
        .get(platform.url("/api/token"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(token["mint"], address(9).to_string());
    assert_eq!(token["decimals"], 9);
    assert_eq!(token["supply"], 1_000_000_000_000_000u64);
    assert_eq!(token["network"], "devnet");

    let history: Value = http
        .get(platform.url(&format!("/api/wallet/{}/history?limit=5", address(1))))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(history["address"], address(1).to_string());
    assert_eq!(history["transactions"], json!([]));
    assert!(platform.rpc.called("getSignaturesForAddress"));
}

#[tokio::test]
async fn test_donation_transaction_prepared_for_wallet() {
    let platform = spawn_platform().await;
    let http = common::http_client();

    let res = http
        .post(platform.url("/api/transactions/donation"))
        .json(&json!({
            "donor": address(1).to_string(),
            "recipient": address(2).to_string(),
            "amount": 0.25,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["feePayer"], address(1).to_string());
    assert_eq!(body["signers"], json!([address(1).to_string()]));
    assert_eq!(body["instructionCount"], 1);
    assert_eq!(body["estimatedFee"], 5000);
    assert!(body["transaction"].is_string());

    let res = http
        .post(platform.url("/api/transactions/donation"))
        .json(&json!({ "donor": address(1).to_string() }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

async fn signed_donation(platform: &common::TestPlatform) -> String {
    let donor = wallet(1);
    let mut tx: Transaction = platform
        .state
        .solana
        .create_donation_transaction(&donor.pubkey(), &address(2), 0.5, false)
        .await
        .unwrap();
    tx.sign(&donor).unwrap();
    tx.to_base64()
}

#[tokio::test]
async fn test_submit_records_confirmed_donation() {
    let platform = spawn_platform().await;
    let client = CharityClient::new(&platform.base_url);
    let owner = register(&client, 1, "Owner").await;
    let request = client
        .create_request(&request_body(owner["id"].as_str().unwrap(), "Flood relief", "URGENT"))
        .await
        .unwrap();
    let transaction = signed_donation(&platform).await;

    let res = common::http_client()
        .post(platform.url("/api/transactions/submit"))
        .json(&json!({
            "transaction": transaction,
            "donation": {
                "donorId": owner["id"],
                "requestId": request["id"],
                "amount": 0.5,
            },
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["signature"], MOCK_SIGNATURE);
    assert_eq!(body["confirmed"], true);
    assert_eq!(body["donation"]["status"], "CONFIRMED");
    assert_eq!(body["donation"]["transactionSignature"], MOCK_SIGNATURE);
    assert!(body["explorerUrl"].as_str().unwrap().contains("cluster=devnet"));

    // An unsigned transaction never reaches the node.
    let unsigned = platform
        .state
        .solana
        .create_donation_transaction(&address(1), &address(2), 0.5, false)
        .await
        .unwrap()
        .to_base64();
    let res = common::http_client()
        .post(platform.url("/api/transactions/submit"))
        .json(&json!({ "transaction": unsigned }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        platform
            .rpc
            .methods()
            .iter()
            .filter(|m| *m == "sendTransaction")
            .count(),
        1
    );
}

#[tokio::test]
async fn test_slow_confirmation_still_returns_signature() {
    // The node never reports a status, and polling would outlast the
    // request timeout; the handler stops early and records a pending
    // donation instead of timing the request out.
    let platform = spawn_platform_on(
        MockNode { confirms: false },
        |config| {
            config.server.request_timeout_secs = 2;
            config.solana.confirmation_retries = 50;
            config.solana.confirmation_delay_ms = 100;
        },
        None,
    )
    .await;
    let client = CharityClient::new(&platform.base_url);
    let owner = register(&client, 1, "Owner").await;
    let request = client
        .create_request(&request_body(owner["id"].as_str().unwrap(), "Water", "HIGH"))
        .await
        .unwrap();
    let transaction = signed_donation(&platform).await;

    let res = common::http_client()
        .post(platform.url("/api/transactions/submit"))
        .json(&json!({
            "transaction": transaction,
            "donation": {
                "donorId": owner["id"],
                "requestId": request["id"],
                "amount": 0.5,
            },
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["signature"], MOCK_SIGNATURE);
    assert_eq!(body["confirmed"], false);
    assert_eq!(body["donation"]["status"], "PENDING");

    let res = common::http_client()
        .post(platform.url("/api/airdrop"))
        .json(&json!({ "address": address(3).to_string() }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["signature"], MOCK_SIGNATURE);
    assert_eq!(body["confirmed"], false);
}

#[tokio::test]
async fn test_airdrop() {
    let platform = spawn_platform().await;
    let http = common::http_client();

    let res = http
        .post(platform.url("/api/airdrop"))
        .json(&json!({ "address": address(3).to_string(), "amount": 2 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["signature"], MOCK_SIGNATURE);
    assert_eq!(body["amount"], 2.0);
    assert_eq!(body["confirmed"], true);
    assert!(platform.rpc.called("requestAirdrop"));

    let res = http
        .post(platform.url("/api/airdrop"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let mainnet = spawn_platform_with(|config| config.solana.network = "mainnet-beta".to_string(), None).await;
    let res = http
        .post(mainnet.url("/api/airdrop"))
        .json(&json!({ "address": address(3).to_string() }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(!mainnet.rpc.called("requestAirdrop"));
}
