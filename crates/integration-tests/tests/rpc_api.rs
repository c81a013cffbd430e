//! JSON-RPC API tests
//!
//! Starts the real server on an ephemeral port over in-memory SQLite and
//! talks to it with the jsonrpsee HTTP client.

use std::sync::Arc;

use jsonrpsee::core::client::{ClientT, Error as ClientError};
use jsonrpsee::core::params::ObjectParams;
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use jsonrpsee::rpc_params;
use jsonrpsee::server::ServerHandle;
use serde_json::Value;
use waitlist_api_rpc::error::code;
use waitlist_api_rpc::{RpcServer, RpcServerConfig};
use waitlist_core::application::{dispatch_channel, shutdown_channel, WaitlistService};
use waitlist_core::domain::NoticeTemplates;
use waitlist_core::port::time_provider::SystemTimeProvider;
use waitlist_infra_notify::LogNotifier;
use waitlist_infra_sqlite::{create_pool, run_migrations, SqliteReservationStore};

async fn start_server() -> (HttpClient, ServerHandle) {
    let pool = create_pool("sqlite::memory:").await.unwrap();
    run_migrations(&pool).await.unwrap();

    let (dispatcher, worker) = dispatch_channel(Arc::new(LogNotifier::new()), 16);
    let (shutdown, token) = shutdown_channel();
    tokio::spawn(async move {
        worker.run(token).await;
        drop(shutdown);
    });

    let service = Arc::new(WaitlistService::new(
        Arc::new(SqliteReservationStore::new(pool)),
        dispatcher,
        Arc::new(SystemTimeProvider),
        NoticeTemplates::new("Microfilm Reader"),
    ));

    let config = RpcServerConfig {
        port: 0,
        ..Default::default()
    };
    let (addr, handle) = RpcServer::new(config, service).start().await.unwrap();

    let client = HttpClientBuilder::default()
        .build(format!("http://{}", addr))
        .unwrap();
    (client, handle)
}

fn join_params(name: &str, address: Option<&str>) -> ObjectParams {
    let mut params = ObjectParams::new();
    params.insert("display_name", name).unwrap();
    if let Some(address) = address {
        params.insert("contact_address", address).unwrap();
    }
    params
}

fn error_code(err: ClientError) -> i32 {
    match err {
        ClientError::Call(obj) => obj.code(),
        other => panic!("expected call error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_join_list_leave_over_rpc() {
    let (client, handle) = start_server().await;

    let alice: Value = client
        .request("waitlist.join.v1", join_params("Alice", Some("alice@library.org")))
        .await
        .unwrap();
    assert_eq!(alice["rank"], 1);
    assert_eq!(alice["display_name"], "Alice");

    let bob: Value = client
        .request("waitlist.join.v1", join_params("Bob", None))
        .await
        .unwrap();
    assert_eq!(bob["rank"], 2);

    let list: Value = client
        .request("waitlist.list.v1", rpc_params![])
        .await
        .unwrap();
    let entries = list["reservations"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["has_contact"], true);
    assert_eq!(entries[1]["has_contact"], false);
    assert!(entries[0].get("contact_address").is_none());

    let mut leave = ObjectParams::new();
    leave.insert("id", alice["id"].as_i64().unwrap()).unwrap();
    let left: Value = client.request("waitlist.leave.v1", leave).await.unwrap();
    assert_eq!(left["retired"], true);

    let list: Value = client
        .request("waitlist.list.v1", rpc_params![])
        .await
        .unwrap();
    assert_eq!(list["reservations"][0]["display_name"], "Bob");
    assert_eq!(list["reservations"][0]["rank"], 1);

    handle.stop().unwrap();
}

#[tokio::test]
async fn test_validation_errors_use_4000() {
    let (client, handle) = start_server().await;

    let err = client
        .request::<Value, _>("waitlist.join.v1", join_params("   ", None))
        .await
        .unwrap_err();
    assert_eq!(error_code(err), code::VALIDATION_ERROR);

    let err = client
        .request::<Value, _>("waitlist.join.v1", join_params("Alice", Some("not-an-email")))
        .await
        .unwrap_err();
    assert_eq!(error_code(err), code::VALIDATION_ERROR);

    handle.stop().unwrap();
}

#[tokio::test]
async fn test_stats_report_queue_and_resource() {
    let (client, handle) = start_server().await;

    client
        .request::<Value, _>("waitlist.join.v1", join_params("Alice", None))
        .await
        .unwrap();

    let stats: Value = client
        .request("admin.stats.v1", rpc_params![])
        .await
        .unwrap();
    assert_eq!(stats["active_reservations"], 1);
    assert_eq!(stats["resource_name"], "Microfilm Reader");
    assert_eq!(stats["notices"]["dropped"], 0);

    handle.stop().unwrap();
}
