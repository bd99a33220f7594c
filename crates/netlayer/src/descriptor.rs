//! Declarative description of one API call.

use crate::error::{NetworkError, Result};
use derive_builder::Builder;
use http::Method;
use netlayer_transport::CachePolicy;
use netlayer_transport::traits::DEFAULT_TIMEOUT;
use secrecy::SecretString;
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// Name → value pairs for query strings and bodies.
///
/// Kept sorted by key, so encoded output is deterministic. Servers must not
/// rely on the order either way.
pub type Parameters = BTreeMap<String, Value>;

/// Body encoding, which also decides the default `Content-Type` header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// `application/json`
    #[default]
    Json,

    /// `multipart/form-data`
    FormData,

    /// `application/x-www-form-urlencoded`
    UrlEncoded,
}

impl ContentType {
    /// The MIME type for this encoding.
    pub fn mime(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::FormData => "multipart/form-data",
            Self::UrlEncoded => "application/x-www-form-urlencoded",
        }
    }
}

/// Declarative description of one API call.
///
/// Built once per call and read-only from then on. Credentials are held as
/// [`SecretString`] and never show up in `Debug` output.
///
/// # Example
///
/// ```rust
/// use netlayer::{ContentType, RequestDescriptor};
/// use http::Method;
///
/// let descriptor = RequestDescriptor::builder()
///     .base_url("https://api.example.com/3")
///     .path("movie/popular")
///     .query("page", 2)
///     .api_token("secret")
///     .retry_count(2u32)
///     .build()
///     .unwrap();
///
/// assert_eq!(descriptor.method, Method::GET);
/// assert_eq!(descriptor.content_type, ContentType::Json);
/// assert_eq!(descriptor.total_attempts(), 3);
/// ```
#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct RequestDescriptor {
    /// Scheme, host and optional base path
    pub base_url: String,

    /// Resource path, appended to `base_url`
    pub path: String,

    /// HTTP method
    #[builder(default = "Method::GET")]
    pub method: Method,

    /// Custom headers, applied after `Content-Type`
    #[builder(default)]
    pub headers: HashMap<String, String>,

    /// Query items, used only for GET
    #[builder(default, setter(strip_option))]
    pub query_parameters: Option<Parameters>,

    /// Body fields, used only for methods other than GET
    #[builder(default, setter(strip_option))]
    pub body: Option<Parameters>,

    /// Body encoding
    #[builder(default)]
    pub content_type: ContentType,

    /// Time allowed for each dispatch
    #[builder(default = "DEFAULT_TIMEOUT")]
    pub timeout: Duration,

    /// Caching hint passed through to the transport
    #[builder(default)]
    pub cache_policy: CachePolicy,

    /// Additional attempts after the first failure
    #[builder(default)]
    pub retry_count: u32,

    /// Whether a bearer token must be attached
    #[builder(default)]
    pub requires_authentication: bool,

    /// Bearer token for the `Authorization` header
    #[builder(default, setter(custom))]
    pub auth_token: Option<SecretString>,

    /// API key, attached per [`ApiKeyPlacement`](crate::ApiKeyPlacement)
    #[builder(default, setter(custom))]
    pub api_token: Option<SecretString>,
}

impl RequestDescriptor {
    /// Create a builder for constructing a RequestDescriptor.
    pub fn builder() -> RequestDescriptorBuilder {
        RequestDescriptorBuilder::default()
    }

    /// Total number of attempts the pipeline may make: `retry_count + 1`.
    pub fn total_attempts(&self) -> u64 {
        u64::from(self.retry_count) + 1
    }
}

impl RequestDescriptorBuilder {
    /// Add one custom header.
    pub fn header(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.headers
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Add one query item.
    pub fn query(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.query_parameters
            .get_or_insert(None)
            .get_or_insert_with(Parameters::new)
            .insert(name.into(), value.into());
        self
    }

    /// Add one body field.
    pub fn body_field(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.body
            .get_or_insert(None)
            .get_or_insert_with(Parameters::new)
            .insert(name.into(), value.into());
        self
    }

    /// Use the fields of any serializable struct or map as the body.
    ///
    /// Fails with `ParameterEncodingFailed` when `value` does not serialize to
    /// a JSON object.
    pub fn json_body<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<&mut Self> {
        let fields = match serde_json::to_value(value) {
            Ok(Value::Object(map)) => map.into_iter().collect::<Parameters>(),
            Ok(other) => {
                return Err(NetworkError::ParameterEncodingFailed(format!(
                    "body must serialize to a JSON object, got {}",
                    json_kind(&other)
                )));
            }
            Err(e) => return Err(NetworkError::ParameterEncodingFailed(e.to_string())),
        };
        self.body = Some(Some(fields));
        Ok(self)
    }

    /// Set the bearer token.
    pub fn auth_token(&mut self, token: impl Into<String>) -> &mut Self {
        self.auth_token = Some(Some(SecretString::new(token.into().into_boxed_str())));
        self
    }

    /// Set the API key.
    pub fn api_token(&mut self, token: impl Into<String>) -> &mut Self {
        self.api_token = Some(Some(SecretString::new(token.into().into_boxed_str())));
        self
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
