use std::sync::Arc;

use finquote_core::{
    ClientConfig, HttpAuth, HttpClient, HttpError, QuoteClient, QuoteError, Updated,
};
use finquote_tests::{
    scripted_client, search_json, stock_json, stock_value, ScriptedHttpClient, TEST_BASE_URL,
};

#[tokio::test]
async fn fetch_builds_stock_url_with_encoded_ticker() {
    let script = ScriptedHttpClient::new();
    let client = scripted_client(&script);

    script.push_ok(stock_json("BRK.B", "Berkshire Hathaway", Some("NYSE"), 420.0, "t0"));
    client
        .fetch_stock("BRK.B")
        .await
        .expect("fetch must succeed");

    let requests = script.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url, format!("{TEST_BASE_URL}/stocks/BRK.B"));
}

#[tokio::test]
async fn configured_auth_rides_on_every_request() {
    let script = ScriptedHttpClient::new();
    let config = ClientConfig::new(TEST_BASE_URL).with_auth(HttpAuth::Header {
        name: String::from("x-api-key"),
        value: String::from("demo"),
    });
    let client = Arc::new(QuoteClient::with_http_client(
        config,
        Arc::clone(&script) as Arc<dyn HttpClient>,
    ));

    script.push_ok(stock_json("AAPL", "Apple Inc.", Some("NASDAQ"), 150.0, "t0"));
    client.fetch_stock("AAPL").await.expect("fetch must succeed");

    let requests = script.requests();
    assert_eq!(
        requests[0].headers.get("x-api-key").map(String::as_str),
        Some("demo")
    );
}

#[tokio::test]
async fn upstream_statuses_map_to_error_taxonomy() {
    let script = ScriptedHttpClient::new();
    let client = scripted_client(&script);

    script.push_status(404, "{}");
    let err = client.fetch_stock("GONE").await.expect_err("must fail");
    assert!(matches!(err, QuoteError::NotFound { ref ticker } if ticker == "GONE"));

    script.push_status(401, "{}");
    let err = client.fetch_stock("AAPL").await.expect_err("must fail");
    assert!(matches!(err, QuoteError::Unauthorized { status: 401 }));

    script.push_status(429, "{}");
    let err = client.fetch_stock("AAPL").await.expect_err("must fail");
    assert!(matches!(err, QuoteError::RateLimited));

    script.push_status(503, "{}");
    let err = client.fetch_stock("AAPL").await.expect_err("must fail");
    assert!(matches!(err, QuoteError::UpstreamStatus { status: 503 }));
}

#[tokio::test]
async fn transport_failures_propagate_unchanged() {
    let script = ScriptedHttpClient::new();
    let client = scripted_client(&script);

    script.push_error(HttpError::new("connection failed"));
    let err = client.fetch_stock("AAPL").await.expect_err("must fail");

    match err {
        QuoteError::Transport(inner) => assert_eq!(inner.message(), "connection failed"),
        other => panic!("expected transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_surfaces_as_malformed_payload() {
    let script = ScriptedHttpClient::new();
    let client = scripted_client(&script);

    script.push_ok("not json at all");
    let err = client.fetch_stock("AAPL").await.expect_err("must fail");
    assert!(matches!(err, QuoteError::MalformedPayload { .. }));

    script.push_ok(r#"{"ticker":"AAPL","name":"Apple Inc.","updated":"t0"}"#);
    let err = client.fetch_stock("AAPL").await.expect_err("must fail");
    assert!(matches!(err, QuoteError::MalformedPayload { .. }));
}

#[tokio::test]
async fn exhausted_budget_fails_before_the_wire() {
    let script = ScriptedHttpClient::new();
    let mut config = ClientConfig::new(TEST_BASE_URL);
    config.quota_limit = 1;
    let client = Arc::new(QuoteClient::with_http_client(
        config,
        Arc::clone(&script) as Arc<dyn HttpClient>,
    ));

    script.push_ok(stock_json("AAPL", "Apple Inc.", Some("NASDAQ"), 150.0, "t0"));
    client.fetch_stock("AAPL").await.expect("first fetch must succeed");

    let err = client.fetch_stock("AAPL").await.expect_err("must fail");
    assert!(matches!(err, QuoteError::RateLimited));
    assert_eq!(script.requests().len(), 1, "second call must not reach the transport");
}

#[tokio::test]
async fn search_builds_query_url_and_decodes_results() {
    let script = ScriptedHttpClient::new();
    let client = scripted_client(&script);

    script.push_ok(search_json(
        "apple inc",
        &[
            stock_value("AAPL", "Apple Inc.", Some("NASDAQ"), 150.0, "t0"),
            stock_value("APC.DE", "Apple Inc. (Xetra)", Some("XETRA"), 138.0, "t0"),
        ],
    ));

    let results = client
        .search_stocks("apple inc", 10)
        .await
        .expect("search must succeed");

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].ticker, "AAPL");
    assert_eq!(results[1].exchange.as_deref(), Some("XETRA"));

    let requests = script.requests();
    assert_eq!(
        requests[0].url,
        format!("{TEST_BASE_URL}/search?query=apple%20inc&limit=10")
    );
}

#[tokio::test]
async fn get_stock_returns_ready_instrument_bound_to_the_client() {
    let script = ScriptedHttpClient::new();
    let client = scripted_client(&script);

    script.push_ok(stock_json("BTC", "Bitcoin", Some("CRYPTO"), 60_000.0, "t0"));
    let mut stock = client.get_stock("BTC").await.expect("get must succeed");

    assert_eq!(stock.ticker().as_str(), "BTC");
    assert_eq!(stock.exchange(), None);
    assert_eq!(stock.price(), 60_000.0);

    // The held client handle serves later refreshes.
    script.push_ok(stock_json("BTC", "Bitcoin", Some("CRYPTO"), 61_250.0, "t1"));
    let new_price = stock.refresh().await.expect("refresh must succeed");
    assert_eq!(new_price, 61_250.0);
    assert_eq!(stock.updated(), &Updated::Text(String::from("t1")));
}

#[tokio::test]
async fn search_wraps_results_into_stocks() {
    let script = ScriptedHttpClient::new();
    let client = scripted_client(&script);

    script.push_ok(search_json(
        "gold",
        &[stock_value("XAU", "Gold Spot", Some("COMMODITY"), 2_400.0, "t0")],
    ));

    let stocks = client.search("gold", 5).await.expect("search must succeed");
    assert_eq!(stocks.len(), 1);
    assert_eq!(stocks[0].ticker().as_str(), "XAU");
    assert_eq!(stocks[0].exchange(), None);
}
