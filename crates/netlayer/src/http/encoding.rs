//! Body encoders for the three supported content types.
//!
//! - JSON: the parameter map as one JSON object
//! - `multipart/form-data` (RFC 7578): one text part per field
//! - `application/x-www-form-urlencoded`: `key=value` pairs joined by `&`,
//!   percent-encoded on both sides
//!
//! Field order follows the map's key order. Neither multipart nor urlencoded
//! consumers may depend on it.

use crate::descriptor::Parameters;
use crate::error::{NetworkError, Result};
use serde_json::Value;
use url::form_urlencoded;
use uuid::Uuid;

/// The string a scalar turns into inside a query string or form body.
///
/// Strings are used as-is (no JSON quotes); numbers, booleans and `null` use
/// their JSON spelling; arrays and objects are written as compact JSON.
pub fn natural_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Encode the parameters as a JSON object.
pub fn encode_json(body: &Parameters) -> Result<Vec<u8>> {
    serde_json::to_vec(body).map_err(|e| NetworkError::ParameterEncodingFailed(e.to_string()))
}

/// Encode the parameters as `application/x-www-form-urlencoded`.
///
/// ```rust
/// use netlayer::http::encode_url_encoded;
/// use netlayer::Parameters;
///
/// let mut body = Parameters::new();
/// body.insert("q".into(), "rust & tokio".into());
/// body.insert("page".into(), 2.into());
///
/// assert_eq!(encode_url_encoded(&body), b"page=2&q=rust+%26+tokio");
/// ```
pub fn encode_url_encoded(body: &Parameters) -> Vec<u8> {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(body.iter().map(|(k, v)| (k.as_str(), natural_string(v))))
        .finish()
        .into_bytes()
}

/// A fresh multipart boundary.
pub fn generate_boundary() -> String {
    format!("Boundary-{}", Uuid::new_v4().simple())
}

/// Encode the parameters as `multipart/form-data` using `boundary`.
///
/// Values are written verbatim. Field names have `"`, CR and LF escaped as
/// `%22`, `%0D` and `%0A`, as HTML form submission does.
///
/// ```rust
/// use netlayer::http::encode_multipart;
/// use netlayer::Parameters;
///
/// let mut body = Parameters::new();
/// body.insert("a".into(), "1".into());
///
/// let encoded = String::from_utf8(encode_multipart(&body, "B")).unwrap();
/// assert_eq!(
///     encoded,
///     "--B\r\nContent-Disposition: form-data; name=\"a\"\r\n\r\n1\r\n--B--\r\n"
/// );
/// ```
pub fn encode_multipart(body: &Parameters, boundary: &str) -> Vec<u8> {
    let mut out = String::new();

    for (key, value) in body {
        out.push_str("--");
        out.push_str(boundary);
        out.push_str("\r\n");
        out.push_str("Content-Disposition: form-data; name=\"");
        out.push_str(&escape_field_name(key));
        out.push_str("\"\r\n\r\n");
        out.push_str(&natural_string(value));
        out.push_str("\r\n");
    }

    out.push_str("--");
    out.push_str(boundary);
    out.push_str("--\r\n");
    out.into_bytes()
}

fn escape_field_name(name: &str) -> String {
    name.replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
