use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde_json::Value;

use crate::erx::{emp, Erx, ResultE};
use crate::web::url::join as url_join;

static DEFAULT_USER_AGENT: &str = "EduGlobal-Client/0.1 (Rust; en-US)";

pub struct ClientBuilder {
    base: String,
    user_agent: Option<String>,
    timeout: Duration,
}

/// JSON client bound to one backend base url.
#[derive(Clone)]
pub struct Client {
    base: String,
    cli: reqwest::Client,
}

impl ClientBuilder {
    pub fn new(base: &str) -> ClientBuilder {
        ClientBuilder {
            base: base.to_string(),
            user_agent: None,
            timeout: Duration::from_secs(10),
        }
    }

    /// From the `api` section of the settings.
    pub fn from_settings(api: &crate::conf::Api) -> ClientBuilder {
        let mut builder = ClientBuilder::new(&api.base);
        builder.set_timeout(Duration::from_secs(api.timeout_secs.max(1)));
        if let Some(agent) = &api.user_agent {
            builder.set_user_agent(agent);
        }
        builder
    }

    pub fn set_user_agent(&mut self, agent: &str) -> &mut Self {
        self.user_agent = Some(agent.to_string());
        self
    }

    pub fn set_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.timeout = timeout;
        self
    }

    pub fn build(&self) -> ResultE<Client> {
        let mut headers = reqwest::header::HeaderMap::new();
        let json = reqwest::header::HeaderValue::from_static("application/json");
        headers.insert(reqwest::header::ACCEPT, json);

        let builder = reqwest::Client::builder()
            .user_agent(self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT))
            .default_headers(headers)
            .timeout(self.timeout);

        let cli = builder.build().map_err(emp)?;
        Ok(Client { base: self.base.clone(), cli })
    }
}

impl Client {
    pub fn url(&self, path: &str) -> String {
        url_join(&self.base, path)
    }

    /// The underlying reqwest client, for requests to hosts other than the backend.
    pub fn raw(&self) -> &reqwest::Client {
        &self.cli
    }

    fn request(&self, method: Method, path: &str, bearer: Option<&str>) -> RequestBuilder {
        let builder = self.cli.request(method, self.url(path));
        match bearer {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub async fn get_valued(&self, path: &str, bearer: Option<&str>) -> ResultE<Value> {
        tracing::debug!("GET {}", path);
        Self::send_valued(self.request(Method::GET, path, bearer)).await
    }

    pub async fn post_valued<T>(&self, path: &str, bearer: Option<&str>, body: &T) -> ResultE<Value>
    where
        T: serde::Serialize + ?Sized,
    {
        tracing::debug!("POST {}", path);
        Self::send_valued(self.request(Method::POST, path, bearer).json(body)).await
    }

    pub async fn put_valued<T>(&self, path: &str, bearer: Option<&str>, body: &T) -> ResultE<Value>
    where
        T: serde::Serialize + ?Sized,
    {
        tracing::debug!("PUT {}", path);
        Self::send_valued(self.request(Method::PUT, path, bearer).json(body)).await
    }

    pub async fn delete_valued(&self, path: &str, bearer: Option<&str>) -> ResultE<Value> {
        tracing::debug!("DELETE {}", path);
        Self::send_valued(self.request(Method::DELETE, path, bearer)).await
    }

    /// Send a prepared request and classify the outcome.
    pub async fn send_valued(builder: RequestBuilder) -> ResultE<Value> {
        let response = builder.send().await.map_err(emp)?;
        Self::_response_valued(response).await
    }

    async fn _response_valued(response: Response) -> ResultE<Value> {
        let status = response.status();
        let body = response.text().await.map_err(emp)?;

        if status.is_success() {
            if body.trim().is_empty() {
                return Ok(Value::Null);
            }
            return Ok(serde_json::from_str(&body)?);
        }

        Err(classify(status, &body))
    }
}

/// Pull the human message out of an error body: `{ "message": .. }`,
/// `{ "error": .. }`, or the raw text.
pub fn error_message(status: StatusCode, body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let found = parsed.as_ref().and_then(|v| {
        ["message", "error", "msg"]
            .iter()
            .find_map(|key| v.get(*key).and_then(Value::as_str).map(str::to_string))
    });

    match found {
        Some(message) if !message.is_empty() => message,
        _ if !body.trim().is_empty() && parsed.is_none() => body.trim().to_string(),
        _ => status.canonical_reason().unwrap_or("request failed").to_string(),
    }
}

/// Map a non-success status to the error taxonomy.
pub fn classify(status: StatusCode, body: &str) -> Erx {
    let message = error_message(status, body);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            let mut erx = Erx::unauthorized(&message);
            erx.add_extra("STATUS", status.as_str());
            erx
        },
        StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
            let mut erx = Erx::validation("", &message);
            erx.add_extra("STATUS", status.as_str());
            erx
        },
        _ => Erx::status(status.as_u16(), &message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::erx::PreL4;

    #[test]
    fn test_error_message() {
        let body = r#"{"message":"Category name is required."}"#;
        assert_eq!(error_message(StatusCode::BAD_REQUEST, body), "Category name is required.");
        assert_eq!(error_message(StatusCode::BAD_REQUEST, r#"{"error":"dup"}"#), "dup");
        assert_eq!(error_message(StatusCode::BAD_GATEWAY, "upstream down"), "upstream down");
        assert_eq!(error_message(StatusCode::NOT_FOUND, ""), "Not Found");
        assert_eq!(error_message(StatusCode::NOT_FOUND, "{}"), "Not Found");
    }

    #[test]
    fn test_classify() {
        assert!(classify(StatusCode::UNAUTHORIZED, "").is_auth());
        assert!(classify(StatusCode::FORBIDDEN, "").is_auth());
        assert!(classify(StatusCode::UNPROCESSABLE_ENTITY, r#"{"message":"bad"}"#).is_validation());

        let e = classify(StatusCode::INTERNAL_SERVER_ERROR, "");
        assert_eq!(e.pre(), PreL4::NETW);
        assert_eq!(e.extra_val("STATUS").as_deref(), Some("500"));
    }

    #[test]
    fn test_url() {
        let client = ClientBuilder::new("http://localhost:5000/api").build().unwrap();
        assert_eq!(client.url("/courses"), "http://localhost:5000/api/courses");
    }
}
