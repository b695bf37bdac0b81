//! Minimal wrapper around the Twitter/X v1.1 search API.
//!
//! Requests are signed with the user-context OAuth 1.0a credentials supplied at
//! construction and delegated to the shared HTTP client. Only the first page of
//! results is ever requested.
use async_trait::async_trait;
use tagrank_common::{Result, TagrankError};
use tagrank_http::{Auth, HttpClient, HttpError, OAuth1Credentials, RequestOpts};

use crate::twitter::search::TweetSearch;
use crate::twitter::types::{SearchResponse, Status};

pub const DEFAULT_API_BASE: &str = "https://api.twitter.com/1.1/";
const SEARCH_PATH: &str = "search/tweets.json";

#[derive(Clone)]
pub struct TwitterApi {
    http: HttpClient,
    credentials: OAuth1Credentials,
}

impl TwitterApi {
    pub fn new(base_url: &str, credentials: OAuth1Credentials) -> Result<Self> {
        let http = HttpClient::new(base_url)
            .map_err(|e| TagrankError::Config(format!("twitter base url: {e}")))?;
        Ok(Self { http, credentials })
    }

    pub fn base_url(&self) -> &str {
        self.http.base().as_str()
    }

    /// `GET search/tweets.json?<raw_query>` with the query passed through untouched.
    pub async fn search_raw(&self, raw_query: &str) -> Result<SearchResponse> {
        let resp: SearchResponse = self
            .http
            .get_json(
                SEARCH_PATH,
                RequestOpts {
                    auth: Some(Auth::OAuth1(&self.credentials)),
                    raw_query: Some(raw_query),
                    ..Default::default()
                },
            )
            .await
            .map_err(http_to_tagrank)?;

        tracing::debug!(
            raw_query,
            statuses = resp.statuses.len(),
            "twitter.search.response"
        );
        Ok(resp)
    }
}

#[async_trait]
impl TweetSearch for TwitterApi {
    async fn search(&self, raw_query: &str) -> Result<Vec<Status>> {
        Ok(self.search_raw(raw_query).await?.statuses)
    }
}

fn http_to_tagrank(e: HttpError) -> TagrankError {
    if e.is_auth() {
        TagrankError::Auth(e.to_string())
    } else {
        TagrankError::Search(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagrank_http::StatusCode;

    #[test]
    fn auth_statuses_map_to_auth_errors() {
        let err = http_to_tagrank(HttpError::Api {
            status: StatusCode::FORBIDDEN,
            message: "forbidden".into(),
            request_id: "-".into(),
        });
        assert!(matches!(err, TagrankError::Auth(_)));

        let err = http_to_tagrank(HttpError::Network("reset by peer".into()));
        assert!(matches!(err, TagrankError::Search(_)));
    }

    #[test]
    fn invalid_base_is_a_config_error() {
        let res = TwitterApi::new("not a url", OAuth1Credentials::new("a", "b", "c", "d"));
        assert!(matches!(res, Err(TagrankError::Config(_))));
    }
}
