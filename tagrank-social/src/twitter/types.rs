use serde::{Deserialize, Serialize};

/// `GET search/tweets.json` envelope (API v1.1).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SearchResponse {
    #[serde(default)]
    pub statuses: Vec<Status>,
    #[serde(default)]
    pub search_metadata: Option<SearchMetadata>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SearchMetadata {
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub next_results: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Status {
    pub id_str: String,
    #[serde(default, alias = "full_text")]
    pub text: String,
    pub user: User,
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub entities: Option<Entities>,
}

impl Status {
    /// Hashtag texts attached to the tweet, in entity order, without the leading `#`.
    pub fn hashtag_texts(&self) -> Vec<String> {
        self.entities
            .as_ref()
            .map(|e| e.hashtags.iter().map(|h| h.text.clone()).collect())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id_str: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub screen_name: Option<String>,
    #[serde(default)]
    pub followers_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Entities {
    #[serde(default)]
    pub hashtags: Vec<HashTag>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashTag {
    pub text: String,
    #[serde(default)]
    pub indices: Option<[u32; 2]>,
}
