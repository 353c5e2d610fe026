use reqwest::RequestBuilder;
use serde_json::Value;
use tracing::info;

use crate::{ClientResult, Payload, Settings, response::handle_response};

use super::HttpProvider;

const TOP_HEADLINES_URL: &str = "https://newsapi.org/v2/top-headlines";
const COUNTRY: &str = "in";
const CATEGORY: &str = "technology";

/// NewsAPI refuses page sizes above this.
const MAX_PAGE_SIZE: usize = 100;

impl HttpProvider {
    pub(crate) async fn top_headlines(
        &self,
        settings: &Settings,
        limit: usize,
    ) -> ClientResult<Vec<Value>> {
        info!(limit, "Fetching top news headlines");

        if limit == 0 {
            return Ok(Vec::new());
        }

        let res = self.headlines_request(settings, limit).send().await?;
        let payload = handle_response(res).await?;

        Ok(articles(&payload))
    }

    fn headlines_request(&self, settings: &Settings, limit: usize) -> RequestBuilder {
        let page_size = limit.min(MAX_PAGE_SIZE).to_string();
        let mut params = vec![
            ("country", COUNTRY),
            ("category", CATEGORY),
            ("pageSize", page_size.as_str()),
        ];
        if let Some(key) = settings.news_api_key() {
            params.push(("apiKey", key.expose()));
        }

        self.http.get(TOP_HEADLINES_URL).query(&params)
    }
}

fn articles(payload: &Payload) -> Vec<Value> {
    payload
        .get("articles")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FileSettings, provider::query_pairs};
    use serde_json::json;

    fn settings_with_key(key: &str) -> Settings {
        let key = key.to_string();
        Settings::resolve(FileSettings::default(), move |name| {
            (name == "NEWS_API_KEY").then(|| key.clone())
        })
    }

    #[test]
    fn headlines_request_has_fixed_country_and_category() {
        let provider = HttpProvider::new().unwrap();
        let settings = settings_with_key("abc123");

        let pairs = query_pairs(provider.headlines_request(&settings, 5));

        assert_eq!(
            pairs,
            [
                ("country".to_string(), "in".to_string()),
                ("category".to_string(), "technology".to_string()),
                ("pageSize".to_string(), "5".to_string()),
                ("apiKey".to_string(), "abc123".to_string()),
            ]
        );
    }

    #[test]
    fn missing_key_is_omitted() {
        let provider = HttpProvider::new().unwrap();
        let pairs = query_pairs(provider.headlines_request(&Settings::default(), 5));

        assert!(pairs.iter().all(|(k, _)| k != "apiKey"));
    }

    #[test]
    fn page_size_is_capped() {
        let provider = HttpProvider::new().unwrap();
        let pairs = query_pairs(provider.headlines_request(&Settings::default(), 500));

        assert!(pairs.contains(&("pageSize".to_string(), "100".to_string())));
    }

    #[test]
    fn articles_are_extracted_in_order() {
        let payload = json!({
            "status": "ok",
            "totalResults": 2,
            "articles": [{ "title": "First" }, { "title": "Second" }]
        });

        let list = articles(payload.as_object().unwrap());

        assert_eq!(list.len(), 2);
        assert_eq!(list[0]["title"], "First");
    }

    #[test]
    fn missing_articles_field_is_empty() {
        let payload = json!({ "status": "ok" });
        assert!(articles(payload.as_object().unwrap()).is_empty());
    }
}
