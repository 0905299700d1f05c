#![cfg(feature = "integration")]

use std::sync::Arc;

use travelbrief::{FeedConfig, FeedQuery, FeedService, HttpUpstream, OpenAiGenerative};

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[tokio::test]
async fn live_feed_smoke() {
    let Some(api_key) = env_nonempty("TRAVELBRIEF_NEWS_API_KEY") else {
        return;
    };

    let config = FeedConfig::default();
    let mut service = FeedService::new(
        config.clone(),
        Arc::new(HttpUpstream::from_config(api_key, &config.upstream)),
    );
    if let Some(openai_key) = env_nonempty("OPENAI_API_KEY") {
        service = service.with_generative(Arc::new(OpenAiGenerative::new(openai_key)));
    }

    let query = FeedQuery::new("everything")
        .with_param("q", "travel safety")
        .with_param("pageSize", "5");
    let records = service.fetch(&query).await;

    assert!(!records.is_empty());
}
