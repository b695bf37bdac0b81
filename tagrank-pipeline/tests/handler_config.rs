mod common;

use serde_json::Value;
use serial_test::serial;
use tagrank_pipeline::{InvocationContext, handler};

fn block_on<F: std::future::Future>(fut: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(fut)
}

#[test]
#[serial]
fn missing_credentials_are_logged_not_raised() {
    common::init_test_tracing();
    temp_env::with_vars_unset(
        [
            "CONSUMER_KEY",
            "CONSUMER_SECRET",
            "ACCESS_TOKEN",
            "ACCESS_TOKEN_SECRET",
        ],
        || {
            let ctx = InvocationContext::new("req-1", "tagrank-test");
            assert_eq!(block_on(handler(Value::Null, ctx)), None);
        },
    );
}
