//! Minimal teller example — the full interceptor chain in front of a gateway.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example basic
//!
//! Expects a gateway (or anything speaking HTTP) on localhost:3000; a failed
//! connection demonstrates the error-surfacing path instead.

use std::time::Duration;

use teller::middleware::{
    AuthConfig, BearerAuthInterceptor, CorrelationInterceptor, ErrorSurfaceInterceptor,
    LoadingInterceptor,
};
use teller::{
    Gateway, GatewayConfig, LoadingTracker, Notifications, Pipeline, Settings, TcpTransport,
    TransferOrder,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let tracker = LoadingTracker::new();
    let notifications = Notifications::new();
    let settings = Settings::new();

    // Toggle auth at runtime, the way a settings screen would:
    //   settings.set(teller::USE_AUTH_TOKEN, "true");
    //   settings.set(teller::BEARER_TOKEN, "dev-token");

    let pipeline = Pipeline::builder()
        .layer(LoadingInterceptor::new(tracker.clone()))
        .layer(CorrelationInterceptor::new())
        .layer(BearerAuthInterceptor::new(AuthConfig::default(), settings))
        .layer(ErrorSurfaceInterceptor::new(notifications.clone()))
        .transport(TcpTransport::new());

    // Follow the global busy stream, as a spinner would.
    let mut loading = tracker.subscribe();
    tokio::spawn(async move {
        while loading.changed().await.is_ok() {
            println!("[loading] {}", *loading.borrow_and_update());
        }
    });

    let gateway = Gateway::new(
        pipeline,
        GatewayConfig {
            account_base: "http://localhost:3000".to_owned(),
            payment_base: "http://localhost:3000".to_owned(),
        },
    );

    match gateway.balance("ACC-1001").await {
        Ok(balance) => println!("balance: {balance}"),
        Err(err) => println!("balance failed: {}", err.user_message()),
    }

    let order = TransferOrder {
        customer_id: 1,
        from_account: "ACC-1001".to_owned(),
        to_account: "ACC-2002".to_owned(),
        amount: 50.0,
        currency: "EUR".to_owned(),
    };
    match gateway.internal_transfer(&order).await {
        Ok(receipt) => println!("transfer {}: {}", receipt.payment_id, receipt.status),
        Err(err) => println!("transfer failed: {}", err.user_message()),
    }

    // Give expiry timers and the loading task a beat, then show what the
    // toast area would render.
    tokio::time::sleep(Duration::from_millis(100)).await;
    for note in notifications.current() {
        println!(
            "[{:?}] {} (correlation: {})",
            note.kind,
            note.message,
            note.correlation_id.as_deref().unwrap_or("-"),
        );
    }
}
