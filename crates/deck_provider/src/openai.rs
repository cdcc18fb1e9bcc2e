use deck_config::ProviderConfig;
use deck_domain::ChatMessage;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::{ChatCompletionRequest, ChatCompletionResponse, ChatProvider, Error, Result};

/// Client for any endpoint speaking the OpenAI chat completions protocol.
#[derive(Clone)]
pub struct OpenAiCompat {
    client: Client,
    url: Url,
    model: String,
    headers: HeaderMap,
}

impl OpenAiCompat {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(Error::Request)?;

        Ok(Self {
            client,
            url: config.url.clone(),
            model: config.model.clone(),
            headers: Self::headers(config.api_key.as_deref())?,
        })
    }

    fn headers(api_key: Option<&str>) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(api_key) = api_key {
            let mut value =
                HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(Error::Credential)?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait::async_trait]
impl ChatProvider for OpenAiCompat {
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String> {
        let request = ChatCompletionRequest::new(&self.model, messages);
        debug!(
            url = %self.url,
            model = %self.model,
            messages = request.messages.len(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(self.url.clone())
            .headers(self.headers.clone())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            debug!(status = status.as_u16(), "Chat completion request rejected");
            return Err(Error::Status { status: status.as_u16(), body });
        }

        let response: ChatCompletionResponse =
            serde_json::from_str(&body).map_err(Error::Decode)?;
        response.into_content()
    }
}
