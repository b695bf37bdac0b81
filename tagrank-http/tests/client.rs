use serde::Deserialize;
use serde_json::json;
use tagrank_http::{Auth, HttpClient, HttpError, OAuth1Credentials, RequestOpts};
use wiremock::matchers::{header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Deserialize)]
struct Echo {
    ok: bool,
}

fn creds() -> OAuth1Credentials {
    OAuth1Credentials::new("ck", "cs", "at", "ats")
}

#[tokio::test]
async fn signed_get_with_raw_query_decodes_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1.1/search/tweets.json"))
        .and(query_param("q", "#sre"))
        .and(query_param("count", "10"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&format!("{}/1.1/", server.uri())).unwrap();
    let creds = creds();
    let got: Echo = client
        .get_json(
            "search/tweets.json",
            RequestOpts {
                auth: Some(Auth::OAuth1(&creds)),
                raw_query: Some("q=%23sre&src=typed_query&count=10"),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(got.ok);

    let requests = server.received_requests().await.unwrap();
    let auth = requests[0]
        .headers
        .get("authorization")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(auth.starts_with("OAuth "));
    assert!(auth.contains("oauth_consumer_key=\"ck\""));
    assert!(auth.contains("oauth_token=\"at\""));
}

#[tokio::test]
async fn unauthorized_maps_to_auth_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "errors": [{ "code": 89, "message": "Invalid or expired token." }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let err = client
        .get_json::<Echo>("anything", RequestOpts::default())
        .await
        .unwrap_err();

    assert!(err.is_auth());
    match err {
        HttpError::Api { status, message, .. } => {
            assert_eq!(status.as_u16(), 401);
            assert_eq!(message, "Invalid or expired token. (code 89)");
        }
        other => panic!("expected api error, got {other:?}"),
    }
}

#[tokio::test]
async fn server_errors_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("over capacity"))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let err = client
        .get_json::<Echo>("busy", RequestOpts::default())
        .await
        .unwrap_err();
    assert!(!err.is_auth());
    assert!(matches!(err, HttpError::Api { .. }));
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let err = client
        .get_json::<Echo>("broken", RequestOpts::default())
        .await
        .unwrap_err();
    match err {
        HttpError::Decode(_, snippet) => assert_eq!(snippet, "{not json"),
        other => panic!("expected decode error, got {other:?}"),
    }
}
