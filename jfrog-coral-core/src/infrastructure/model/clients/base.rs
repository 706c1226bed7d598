//! Base HTTP client with shared logic

use crate::config::Secret;
use crate::infrastructure::model::types::ModelError;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Base HTTP client with shared functionality
#[derive(Clone)]
pub struct HttpClientBase {
    pub id: String,
    pub endpoint: String,
    api_key: Option<Secret>,
    http: Client,
}

impl HttpClientBase {
    pub fn new(id: String, endpoint: String, api_key: Option<Secret>) -> Self {
        Self {
            id,
            endpoint,
            api_key,
            http: Client::new(),
        }
    }

    /// Build URL from endpoint and path
    pub fn build_url(&self, path: &str) -> String {
        let base = self.endpoint.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    /// Post JSON with bearer auth
    pub async fn post_with_bearer<Req, Res>(&self, url: &str, body: &Req) -> Result<Res, ModelError>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        let api_key = self.require_api_key()?;
        let request = self.http.post(url).bearer_auth(api_key).json(body);
        self.send(request).await
    }

    /// Post JSON with the key in the `x-goog-api-key` header (Gemini)
    pub async fn post_with_goog_key<Req, Res>(
        &self,
        url: &str,
        body: &Req,
    ) -> Result<Res, ModelError>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        let api_key = self.require_api_key()?;
        let request = self
            .http
            .post(url)
            .header("x-goog-api-key", api_key)
            .json(body);
        self.send(request).await
    }

    /// Post JSON, attaching bearer auth only when a key is configured (Ollama)
    pub async fn post_optional_auth<Req, Res>(
        &self,
        url: &str,
        body: &Req,
    ) -> Result<Res, ModelError>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        let mut request = self.http.post(url).json(body);
        if let Some(key) = self.api_key.as_ref().filter(|k| !k.expose().trim().is_empty()) {
            request = request.bearer_auth(key.expose());
        }
        self.send(request).await
    }

    async fn send<Res>(&self, request: reqwest::RequestBuilder) -> Result<Res, ModelError>
    where
        Res: DeserializeOwned,
    {
        request
            .send()
            .await
            .map_err(|e| ModelError::network(&self.id, e))?
            .error_for_status()
            .map_err(|e| ModelError::network(&self.id, e))?
            .json()
            .await
            .map_err(|e| ModelError::network(&self.id, e))
    }

    fn require_api_key(&self) -> Result<&str, ModelError> {
        self.api_key
            .as_ref()
            .map(Secret::expose)
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ModelError::missing_api_key(&self.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_url_joins_without_duplicate_slashes() {
        let base = HttpClientBase::new("openai".into(), "https://api.openai.com/".into(), None);
        assert_eq!(
            base.build_url("/v1/chat/completions"),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[tokio::test]
    async fn bearer_requests_fail_fast_without_key() {
        let base = HttpClientBase::new(
            "openai".into(),
            "http://127.0.0.1:9".into(),
            Some(Secret::new("  ")),
        );
        let result: Result<serde_json::Value, _> = base
            .post_with_bearer("http://127.0.0.1:9/x", &serde_json::json!({}))
            .await;
        assert!(matches!(result, Err(ModelError::MissingApiKey { .. })));
    }
}
