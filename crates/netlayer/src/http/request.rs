//! Turning a [`RequestDescriptor`] into a wire-ready [`TransportRequest`]

use super::encoding::{
    encode_json, encode_multipart, encode_url_encoded, generate_boundary, natural_string,
};
use crate::config::{API_KEY_HEADER, API_KEY_QUERY_PARAM, ApiKeyPlacement};
use crate::descriptor::{ContentType, RequestDescriptor};
use crate::error::{NetworkError, Result};
use ::http::{HeaderName, HeaderValue, Method, header};
use bytes::Bytes;
use netlayer_transport::TransportRequest;
use secrecy::ExposeSecret;
use url::Url;

/// Builds transport requests from descriptors.
///
/// Building is pure and synchronous: nothing touches the network, so every
/// error raised here is final and never goes through the retry budget.
pub trait RequestBuilder: Send + Sync {
    /// Build the transport request for `descriptor`.
    fn build(&self, descriptor: &RequestDescriptor) -> Result<TransportRequest>;
}

/// The standard request builder.
///
/// Composes the URL, attaches the API key and bearer token, applies custom
/// headers and encodes the body according to the descriptor's content type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultRequestBuilder {
    api_key_placement: ApiKeyPlacement,
}

impl DefaultRequestBuilder {
    /// Create a builder attaching API keys as `placement` says.
    pub fn new(api_key_placement: ApiKeyPlacement) -> Self {
        Self { api_key_placement }
    }

    /// Where API keys are attached.
    pub fn api_key_placement(&self) -> ApiKeyPlacement {
        self.api_key_placement
    }

    fn compose_url(&self, descriptor: &RequestDescriptor) -> Result<Url> {
        let base = descriptor.base_url.trim_end_matches('/');
        let path = descriptor.path.trim_start_matches('/');

        let raw = if path.is_empty() {
            base.to_string()
        } else {
            format!("{}/{}", base, path)
        };

        let mut url =
            Url::parse(&raw).map_err(|e| NetworkError::InvalidUrl(format!("{}: {}", raw, e)))?;

        if url.cannot_be_a_base() {
            return Err(NetworkError::InvalidUrl(format!(
                "{}: URL cannot carry a path or query",
                raw
            )));
        }

        let mut pairs: Vec<(&str, String)> = Vec::new();

        if self.api_key_placement == ApiKeyPlacement::QueryParam
            && let Some(token) = &descriptor.api_token
        {
            pairs.push((API_KEY_QUERY_PARAM, token.expose_secret().to_string()));
        }

        if descriptor.method == Method::GET
            && let Some(params) = &descriptor.query_parameters
        {
            pairs.extend(params.iter().map(|(k, v)| (k.as_str(), natural_string(v))));
        }

        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }

        Ok(url)
    }

    /// Encode the body, returning it with the `Content-Type` it requires.
    fn encode_body(&self, descriptor: &RequestDescriptor) -> Result<Option<(Bytes, String)>> {
        if descriptor.method == Method::GET {
            return Ok(None);
        }

        let Some(body) = &descriptor.body else {
            return Ok(None);
        };

        let encoded = match descriptor.content_type {
            ContentType::Json => (encode_json(body)?, ContentType::Json.mime().to_string()),
            ContentType::FormData => {
                let boundary = generate_boundary();
                (
                    encode_multipart(body, &boundary),
                    format!("{}; boundary={}", ContentType::FormData.mime(), boundary),
                )
            }
            ContentType::UrlEncoded => (
                encode_url_encoded(body),
                ContentType::UrlEncoded.mime().to_string(),
            ),
        };

        Ok(Some((Bytes::from(encoded.0), encoded.1)))
    }
}

impl RequestBuilder for DefaultRequestBuilder {
    fn build(&self, descriptor: &RequestDescriptor) -> Result<TransportRequest> {
        let url = self.compose_url(descriptor)?;

        let mut request = TransportRequest::new(descriptor.method.clone(), url)
            .with_timeout(descriptor.timeout)
            .with_cache_policy(descriptor.cache_policy);

        if self.api_key_placement == ApiKeyPlacement::Header
            && let Some(token) = &descriptor.api_token
        {
            let value = sensitive_value(token.expose_secret(), API_KEY_HEADER)?;
            request = request.with_header(HeaderName::from_static(API_KEY_HEADER), value);
        }

        let body = self.encode_body(descriptor)?;

        // The multipart boundary header overrides any custom Content-Type
        let boundary_content_type = match &body {
            Some((_, content_type)) if descriptor.content_type == ContentType::FormData => {
                Some(content_type_value(content_type)?)
            }
            _ => None,
        };

        let content_type = match &body {
            Some((_, content_type)) if boundary_content_type.is_none() => {
                content_type_value(content_type)?
            }
            _ => HeaderValue::from_static(descriptor.content_type.mime()),
        };
        request = request.with_header(header::CONTENT_TYPE, content_type);

        for (name, value) in &descriptor.headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                NetworkError::ParameterEncodingFailed(format!(
                    "Invalid header name '{}': {}",
                    name, e
                ))
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                NetworkError::ParameterEncodingFailed(format!(
                    "Invalid value for header '{}': {}",
                    name, e
                ))
            })?;
            request = request.with_header(name, value);
        }

        if let Some(content_type) = boundary_content_type {
            request = request.with_header(header::CONTENT_TYPE, content_type);
        }

        if descriptor.requires_authentication {
            let token = descriptor
                .auth_token
                .as_ref()
                .ok_or(NetworkError::AuthenticationFailed)?;
            let value = sensitive_value(
                &format!("Bearer {}", token.expose_secret()),
                header::AUTHORIZATION.as_str(),
            )?;
            request = request.with_header(header::AUTHORIZATION, value);
        }

        if let Some((bytes, _)) = body {
            request = request.with_body(bytes);
        }

        Ok(request)
    }
}

fn content_type_value(content_type: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(content_type)
        .map_err(|e| NetworkError::ParameterEncodingFailed(e.to_string()))
}

fn sensitive_value(value: &str, name: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(value).map_err(|_| {
        NetworkError::ParameterEncodingFailed(format!("Invalid value for header '{}'", name))
    })?;
    value.set_sensitive(true);
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::RequestDescriptorBuilder;
    use assert_matches::assert_matches;
    use netlayer_transport::CachePolicy;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::time::Duration;

    fn descriptor(base: &str, path: &str) -> RequestDescriptorBuilder {
        let mut builder = RequestDescriptor::builder();
        builder.base_url(base).path(path);
        builder
    }

    fn query_builder() -> DefaultRequestBuilder {
        DefaultRequestBuilder::new(ApiKeyPlacement::QueryParam)
    }

    #[rstest]
    #[case("https://api.example.com", "movies")]
    #[case("https://api.example.com/", "movies")]
    #[case("https://api.example.com", "/movies")]
    #[case("https://api.example.com/", "/movies")]
    fn test_single_separator_between_base_and_path(#[case] base: &str, #[case] path: &str) {
        let request = query_builder()
            .build(&descriptor(base, path).build().unwrap())
            .unwrap();
        assert_eq!(request.url.as_str(), "https://api.example.com/movies");
    }

    #[test]
    fn test_base_path_is_kept() {
        let request = query_builder()
            .build(&descriptor("https://api.example.com/3/", "/movie/popular").build().unwrap())
            .unwrap();
        assert_eq!(request.url.path(), "/3/movie/popular");
    }

    #[test]
    fn test_api_key_and_query_parameters_are_both_attached() {
        let request = query_builder()
            .build(
                &descriptor("https://api.example.com", "search")
                    .api_token("k123")
                    .query("page", 2)
                    .query("q", "star wars")
                    .build()
                    .unwrap(),
            )
            .unwrap();

        let pairs: Vec<(String, String)> = request.url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("api_key".into(), "k123".into())));
        assert!(pairs.contains(&("page".into(), "2".into())));
        assert!(pairs.contains(&("q".into(), "star wars".into())));
        assert!(request.url.as_str().contains("q=star+wars"));
    }

    #[test]
    fn test_path_query_string_is_preserved() {
        let request = query_builder()
            .build(
                &descriptor("https://api.example.com", "search?lang=en")
                    .query("page", 1)
                    .build()
                    .unwrap(),
            )
            .unwrap();
        assert_eq!(request.url.query(), Some("lang=en&page=1"));
    }

    #[test]
    fn test_no_query_without_items() {
        let request = query_builder()
            .build(&descriptor("https://api.example.com", "items").build().unwrap())
            .unwrap();
        assert_eq!(request.url.query(), None);
    }

    #[test]
    fn test_query_parameters_ignored_for_post() {
        let request = query_builder()
            .build(
                &descriptor("https://api.example.com", "items")
                    .method(Method::POST)
                    .query("page", 1)
                    .build()
                    .unwrap(),
            )
            .unwrap();
        assert_eq!(request.url.query(), None);
    }

    #[test]
    fn test_api_key_header_placement() {
        let builder = DefaultRequestBuilder::new(ApiKeyPlacement::Header);
        let request = builder
            .build(
                &descriptor("https://api.example.com", "items")
                    .api_token("k123")
                    .build()
                    .unwrap(),
            )
            .unwrap();

        assert_eq!(request.url.query(), None);
        assert_eq!(request.header("x-api-key"), Some("k123"));
        assert!(request.headers["x-api-key"].is_sensitive());
    }

    #[rstest]
    #[case("not a url")]
    #[case("")]
    #[case("/relative/only")]
    fn test_unresolvable_url_is_invalid(#[case] base: &str) {
        let err = query_builder()
            .build(&descriptor(base, "items").build().unwrap())
            .unwrap_err();
        assert_matches!(err, NetworkError::InvalidUrl(_));
    }

    #[test]
    fn test_cannot_be_a_base_url_is_invalid() {
        let err = query_builder()
            .build(&descriptor("mailto:someone@example.com", "").build().unwrap())
            .unwrap_err();
        assert_matches!(err, NetworkError::InvalidUrl(_));
    }

    #[test]
    fn test_method_timeout_and_cache_policy_pass_through() {
        let request = query_builder()
            .build(
                &descriptor("https://api.example.com", "items")
                    .method(Method::DELETE)
                    .timeout(Duration::from_secs(5))
                    .cache_policy(CachePolicy::ReloadIgnoringCache)
                    .build()
                    .unwrap(),
            )
            .unwrap();

        assert_eq!(request.method, Method::DELETE);
        assert_eq!(request.timeout, Duration::from_secs(5));
        assert_eq!(request.cache_policy, CachePolicy::ReloadIgnoringCache);
    }

    #[rstest]
    #[case(ContentType::Json, "application/json")]
    #[case(ContentType::FormData, "multipart/form-data")]
    #[case(ContentType::UrlEncoded, "application/x-www-form-urlencoded")]
    fn test_content_type_header_without_body(
        #[case] content_type: ContentType,
        #[case] expected: &str,
    ) {
        let request = query_builder()
            .build(
                &descriptor("https://api.example.com", "items")
                    .content_type(content_type)
                    .build()
                    .unwrap(),
            )
            .unwrap();
        assert_eq!(request.header("content-type"), Some(expected));
        assert!(request.body.is_none());
    }

    #[test]
    fn test_custom_headers_override_case_insensitively() {
        let request = query_builder()
            .build(
                &descriptor("https://api.example.com", "items")
                    .header("CONTENT-TYPE", "text/plain")
                    .header("X-Trace", "abc")
                    .build()
                    .unwrap(),
            )
            .unwrap();

        assert_eq!(request.header("Content-Type"), Some("text/plain"));
        assert_eq!(request.headers.get_all("content-type").iter().count(), 1);
        assert_eq!(request.header("x-trace"), Some("abc"));
    }

    #[rstest]
    #[case("bad header", "v")]
    #[case("X-Ok", "line\nbreak")]
    fn test_invalid_custom_header_fails_encoding(#[case] name: &str, #[case] value: &str) {
        let err = query_builder()
            .build(
                &descriptor("https://api.example.com", "items")
                    .header(name, value)
                    .build()
                    .unwrap(),
            )
            .unwrap_err();
        assert_matches!(err, NetworkError::ParameterEncodingFailed(_));
    }

    #[test]
    fn test_bearer_token_when_required() {
        let request = query_builder()
            .build(
                &descriptor("https://api.example.com", "me")
                    .requires_authentication(true)
                    .auth_token("t0k")
                    .build()
                    .unwrap(),
            )
            .unwrap();

        assert_eq!(request.header("authorization"), Some("Bearer t0k"));
        assert!(request.headers[header::AUTHORIZATION].is_sensitive());
    }

    #[test]
    fn test_bearer_token_not_sent_unless_required() {
        let request = query_builder()
            .build(
                &descriptor("https://api.example.com", "me")
                    .auth_token("t0k")
                    .build()
                    .unwrap(),
            )
            .unwrap();
        assert_eq!(request.header("authorization"), None);
    }

    #[test]
    fn test_missing_required_token_fails_authentication() {
        let err = query_builder()
            .build(
                &descriptor("https://api.example.com", "me")
                    .requires_authentication(true)
                    .build()
                    .unwrap(),
            )
            .unwrap_err();
        assert_matches!(err, NetworkError::AuthenticationFailed);
    }

    #[test]
    fn test_get_never_carries_a_body() {
        let request = query_builder()
            .build(
                &descriptor("https://api.example.com", "items")
                    .body_field("ignored", true)
                    .build()
                    .unwrap(),
            )
            .unwrap();
        assert!(request.body.is_none());
    }

    #[test]
    fn test_post_without_body_has_no_body() {
        let request = query_builder()
            .build(
                &descriptor("https://api.example.com", "items")
                    .method(Method::POST)
                    .build()
                    .unwrap(),
            )
            .unwrap();
        assert!(request.body.is_none());
    }

    #[test]
    fn test_json_body() {
        let request = query_builder()
            .build(
                &descriptor("https://api.example.com", "items")
                    .method(Method::POST)
                    .body_field("name", "widget")
                    .body_field("count", 3)
                    .build()
                    .unwrap(),
            )
            .unwrap();

        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(
            request.body.unwrap().as_ref(),
            br#"{"count":3,"name":"widget"}"#
        );
    }

    #[test]
    fn test_form_data_boundary_matches_header() {
        let request = query_builder()
            .build(
                &descriptor("https://api.example.com", "upload")
                    .method(Method::PUT)
                    .content_type(ContentType::FormData)
                    .body_field("a", "1")
                    .body_field("b", 2)
                    .build()
                    .unwrap(),
            )
            .unwrap();

        let content_type = request.header("content-type").unwrap().to_string();
        let boundary = content_type
            .strip_prefix("multipart/form-data; boundary=")
            .unwrap();
        let body = String::from_utf8(request.body.unwrap().to_vec()).unwrap();

        assert_eq!(body.matches(&format!("--{}\r\n", boundary)).count(), 2);
        assert!(body.ends_with(&format!("--{}--\r\n", boundary)));
        assert!(body.contains("name=\"b\"\r\n\r\n2\r\n"));
    }

    #[test]
    fn test_form_data_boundary_survives_custom_content_type() {
        let request = query_builder()
            .build(
                &descriptor("https://api.example.com", "upload")
                    .method(Method::POST)
                    .content_type(ContentType::FormData)
                    .header("Content-Type", "multipart/form-data")
                    .body_field("a", "1")
                    .build()
                    .unwrap(),
            )
            .unwrap();

        let content_type = request.header("content-type").unwrap().to_string();
        let boundary = content_type
            .strip_prefix("multipart/form-data; boundary=")
            .unwrap_or_else(|| panic!("boundary missing from Content-Type: {content_type}"));
        let body = String::from_utf8(request.body.unwrap().to_vec()).unwrap();

        assert!(body.starts_with(&format!("--{}\r\n", boundary)));
        assert!(body.ends_with(&format!("--{}--\r\n", boundary)));
        assert_eq!(request.headers.get_all("content-type").iter().count(), 1);
    }

    #[test]
    fn test_custom_content_type_wins_for_json_body() {
        let request = query_builder()
            .build(
                &descriptor("https://api.example.com", "items")
                    .method(Method::POST)
                    .header("Content-Type", "application/vnd.api+json")
                    .body_field("name", "widget")
                    .build()
                    .unwrap(),
            )
            .unwrap();

        assert_eq!(
            request.header("content-type"),
            Some("application/vnd.api+json")
        );
    }

    #[test]
    fn test_url_encoded_body() {
        let request = query_builder()
            .build(
                &descriptor("https://api.example.com", "login")
                    .method(Method::PATCH)
                    .content_type(ContentType::UrlEncoded)
                    .body_field("x", "1")
                    .body_field("y", "2")
                    .build()
                    .unwrap(),
            )
            .unwrap();

        assert_eq!(
            request.header("content-type"),
            Some("application/x-www-form-urlencoded")
        );
        assert_eq!(request.body.unwrap().as_ref(), b"x=1&y=2");
    }
}
