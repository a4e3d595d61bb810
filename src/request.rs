// Request construction
// Every call builds its own header set; shared defaults are never mutated

use reqwest::header::{HeaderMap, HeaderValue, IntoHeaderName, CONTENT_TYPE};
use reqwest::multipart;
use reqwest::Method;
use serde_json::Value;

/// Request body variants
///
/// Multipart parts are buffered in memory so the transport body can be
/// rebuilt when the request is replayed after a session renewal.
#[derive(Debug, Clone)]
pub enum Body {
    Empty,
    Json(Value),
    Bytes(Vec<u8>),
    Multipart(MultipartForm),
}

/// Replayable multipart form
#[derive(Debug, Clone, Default)]
pub struct MultipartForm {
    parts: Vec<MultipartPart>,
}

#[derive(Debug, Clone)]
struct MultipartPart {
    name: String,
    data: PartData,
}

#[derive(Debug, Clone)]
enum PartData {
    Text(String),
    File {
        bytes: Vec<u8>,
        file_name: String,
        mime: String,
    },
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text field
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(MultipartPart {
            name: name.into(),
            data: PartData::Text(value.into()),
        });
        self
    }

    /// Add a file field from an in-memory buffer
    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        mime: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        self.parts.push(MultipartPart {
            name: name.into(),
            data: PartData::File {
                bytes,
                file_name: file_name.into(),
                mime: mime.into(),
            },
        });
        self
    }

    /// Build a fresh transport form; called once per attempt
    pub(crate) fn to_form(&self) -> Result<multipart::Form, reqwest::Error> {
        let mut form = multipart::Form::new();
        for part in &self.parts {
            match &part.data {
                PartData::Text(value) => {
                    form = form.text(part.name.clone(), value.clone());
                }
                PartData::File {
                    bytes,
                    file_name,
                    mime,
                } => {
                    let file = multipart::Part::bytes(bytes.clone())
                        .file_name(file_name.clone())
                        .mime_str(mime)?;
                    form = form.part(part.name.clone(), file);
                }
            }
        }
        Ok(form)
    }
}

/// Options for a single gateway call
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Body,
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            headers: HeaderMap::new(),
            body: Body::Empty,
        }
    }

    /// Shorthand for a JSON-bodied request
    pub fn json(method: Method, body: Value) -> Self {
        Self {
            method,
            headers: HeaderMap::new(),
            body: Body::Json(body),
        }
    }

    /// Shorthand for a multipart request
    pub fn multipart(method: Method, form: MultipartForm) -> Self {
        Self {
            method,
            headers: HeaderMap::new(),
            body: Body::Multipart(form),
        }
    }

    /// Add a header override
    pub fn header<K: IntoHeaderName>(mut self, name: K, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// Apply the content-type defaulting rules.
///
/// A multipart body must not carry a caller-set Content-Type: the transport
/// computes the boundary-bearing value itself. Otherwise, requests that can
/// carry a body default to JSON when the caller set nothing.
pub(crate) fn apply_content_type(headers: &mut HeaderMap, method: &Method, body: &Body) {
    if matches!(body, Body::Multipart(_)) {
        headers.remove(CONTENT_TYPE);
        return;
    }

    if !headers.contains_key(CONTENT_TYPE) && *method != Method::GET && *method != Method::HEAD {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_multipart_strips_content_type() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let body = Body::Multipart(MultipartForm::new().text("note", "scan"));
        apply_content_type(&mut headers, &Method::POST, &body);

        assert!(headers.get(CONTENT_TYPE).is_none());
    }

    #[test]
    fn test_post_defaults_to_json() {
        let mut headers = HeaderMap::new();
        apply_content_type(&mut headers, &Method::POST, &Body::Json(json!({})));
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
    }

    #[test]
    fn test_get_gets_no_default() {
        let mut headers = HeaderMap::new();
        apply_content_type(&mut headers, &Method::GET, &Body::Empty);
        assert!(headers.get(CONTENT_TYPE).is_none());

        let mut headers = HeaderMap::new();
        apply_content_type(&mut headers, &Method::HEAD, &Body::Empty);
        assert!(headers.get(CONTENT_TYPE).is_none());
    }

    #[test]
    fn test_caller_content_type_is_preserved() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));

        apply_content_type(&mut headers, &Method::PUT, &Body::Bytes(vec![1, 2, 3]));
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "text/plain");
    }

    #[test]
    fn test_multipart_form_rebuilds() {
        let form = MultipartForm::new()
            .text("description", "lab result")
            .file("document", "scan.png", "image/png", vec![0x89, 0x50]);

        // Same buffered parts must be able to produce a form more than once
        assert!(form.to_form().is_ok());
        assert!(form.to_form().is_ok());
    }

    #[test]
    fn test_multipart_rejects_bad_mime() {
        let form = MultipartForm::new().file("document", "scan.png", "not a mime", vec![1]);
        assert!(form.to_form().is_err());
    }
}
