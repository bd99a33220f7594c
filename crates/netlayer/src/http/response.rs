//! Classifying and decoding transport responses

use crate::error::{NetworkError, Result};
use bytes::Bytes;
use netlayer_transport::TransportResponse;
use serde::de::DeserializeOwned;

/// A response sorted by its status code.
#[derive(Debug)]
pub enum ClassifiedOutcome {
    /// 2xx, with the raw body
    Success(Bytes),

    /// Anything else, already mapped to an error
    Failure(NetworkError),
}

impl ClassifiedOutcome {
    /// Whether the status was 2xx.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Convert into a `Result` over the success body.
    pub fn into_result(self) -> Result<Bytes> {
        match self {
            Self::Success(body) => Ok(body),
            Self::Failure(err) => Err(err),
        }
    }
}

/// Sort a response by status code.
///
/// - outside `100..=599`: `InvalidResponse`
/// - `200..=299`: `Success`
/// - `401`: `AuthenticationFailed`, whatever the body says
/// - anything else: `ServerError { status_code }`
pub fn classify(response: &TransportResponse) -> ClassifiedOutcome {
    match response.status {
        200..=299 => ClassifiedOutcome::Success(response.body.clone()),
        401 => ClassifiedOutcome::Failure(NetworkError::AuthenticationFailed),
        status @ 100..=599 => ClassifiedOutcome::Failure(NetworkError::ServerError {
            status_code: status,
        }),
        _ => ClassifiedOutcome::Failure(NetworkError::InvalidResponse),
    }
}

/// Turns transport responses into typed results.
pub trait ResponseHandler: Send + Sync {
    /// Classify `response` and decode a successful body into `T`.
    fn decode<T: DeserializeOwned>(&self, response: &TransportResponse) -> Result<T>;

    /// Classify `response` and return a successful body undecoded.
    fn decode_raw(&self, response: &TransportResponse) -> Result<Bytes> {
        classify(response).into_result()
    }
}

/// Decodes successful bodies as JSON.
///
/// An empty 2xx body is `NoData` rather than a decoding error, so callers can
/// tell "nothing came back" apart from "something malformed came back".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonResponseDecoder;

impl ResponseHandler for JsonResponseDecoder {
    fn decode<T: DeserializeOwned>(&self, response: &TransportResponse) -> Result<T> {
        let body = classify(response).into_result()?;

        if body.is_empty() {
            return Err(NetworkError::NoData);
        }

        serde_json::from_slice(&body).map_err(NetworkError::DecodingError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use http::HeaderMap;
    use rstest::rstest;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Movie {
        id: u64,
        title: String,
    }

    fn response(status: u16, body: &'static str) -> TransportResponse {
        TransportResponse::new(status, HeaderMap::new(), body)
    }

    #[rstest]
    #[case(200)]
    #[case(201)]
    #[case(204)]
    #[case(299)]
    fn test_classify_success(#[case] status: u16) {
        let outcome = classify(&response(status, "ok"));
        assert!(outcome.is_success());
        assert_eq!(outcome.into_result().unwrap(), Bytes::from_static(b"ok"));
    }

    #[rstest]
    #[case(100)]
    #[case(302)]
    #[case(400)]
    #[case(403)]
    #[case(404)]
    #[case(500)]
    #[case(503)]
    #[case(599)]
    fn test_classify_server_error(#[case] status: u16) {
        assert_matches!(
            classify(&response(status, "")),
            ClassifiedOutcome::Failure(NetworkError::ServerError { status_code }) if status_code == status
        );
    }

    #[test]
    fn test_classify_unauthorized_ignores_body() {
        assert_matches!(
            classify(&response(401, r#"{"id":1,"title":"x"}"#)),
            ClassifiedOutcome::Failure(NetworkError::AuthenticationFailed)
        );
    }

    #[rstest]
    #[case(0)]
    #[case(99)]
    #[case(600)]
    #[case(999)]
    fn test_classify_invalid_status(#[case] status: u16) {
        assert_matches!(
            classify(&response(status, "")),
            ClassifiedOutcome::Failure(NetworkError::InvalidResponse)
        );
    }

    #[test]
    fn test_decode_json() {
        let movie: Movie = JsonResponseDecoder
            .decode(&response(200, r#"{"id":7,"title":"Alien"}"#))
            .unwrap();
        assert_eq!(
            movie,
            Movie {
                id: 7,
                title: "Alien".to_string()
            }
        );
    }

    #[test]
    fn test_decode_empty_body_is_no_data() {
        let err = JsonResponseDecoder
            .decode::<Movie>(&response(200, ""))
            .unwrap_err();
        assert_matches!(err, NetworkError::NoData);
    }

    #[test]
    fn test_decode_mismatch_is_decoding_error() {
        let err = JsonResponseDecoder
            .decode::<Movie>(&response(200, r#"{"id":"seven"}"#))
            .unwrap_err();
        assert_matches!(err, NetworkError::DecodingError(_));
    }

    #[test]
    fn test_decode_failure_status_wins_over_body() {
        let err = JsonResponseDecoder
            .decode::<Movie>(&response(500, r#"{"id":7,"title":"Alien"}"#))
            .unwrap_err();
        assert_matches!(err, NetworkError::ServerError { status_code: 500 });
    }

    #[test]
    fn test_decode_raw_allows_empty_body() {
        let body = JsonResponseDecoder.decode_raw(&response(204, "")).unwrap();
        assert!(body.is_empty());
    }

    #[test]
    fn test_decode_raw_still_classifies() {
        let err = JsonResponseDecoder
            .decode_raw(&response(401, "nope"))
            .unwrap_err();
        assert_matches!(err, NetworkError::AuthenticationFailed);
    }
}
