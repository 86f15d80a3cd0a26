//! Observation of the response produced by the wrapped handler.

use axum::http::{header, HeaderMap, HeaderName, Response, StatusCode};
use http_body::Body as HttpBody;

/// Records what the handler sent back without touching it.
///
/// The response, including its body, is returned exactly as received, so
/// streaming bodies stay streaming.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResponseObserver {
    status: Option<StatusCode>,
    content_length: Option<String>,
    content_type: Option<String>,
    content_encoding: Option<String>,
}

impl ResponseObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record status and content headers, then hand the response back.
    pub fn observe<B: HttpBody>(&mut self, response: Response<B>) -> Response<B> {
        let headers = response.headers();
        self.status = Some(response.status());
        // hyper fills in Content-Length from an exact size hint when writing.
        self.content_length = header_value(headers, &header::CONTENT_LENGTH)
            .or_else(|| response.body().size_hint().exact().map(|n| n.to_string()));
        self.content_type = header_value(headers, &header::CONTENT_TYPE);
        self.content_encoding = header_value(headers, &header::CONTENT_ENCODING);
        response
    }

    /// Status seen on the response, `None` before anything was observed.
    pub fn observed_status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Effective status: what was observed, or 200.
    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }

    pub fn content_length(&self) -> Option<&str> {
        self.content_length.as_deref()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn content_encoding(&self) -> Option<&str> {
        self.content_encoding.as_deref()
    }
}

fn header_value(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_defaults_to_ok_before_observation() {
        let observer = ResponseObserver::new();
        assert_eq!(observer.observed_status(), None);
        assert_eq!(observer.status(), StatusCode::OK);
        assert_eq!(observer.content_type(), None);
    }

    #[test]
    fn test_records_status_and_headers() {
        let response = Response::builder()
            .status(StatusCode::CREATED)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::CONTENT_ENCODING, "gzip")
            .header(header::CONTENT_LENGTH, "17")
            .body(Body::from("ignored"))
            .unwrap();

        let mut observer = ResponseObserver::new();
        let response = observer.observe(response);

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(observer.status(), StatusCode::CREATED);
        assert_eq!(observer.content_type(), Some("application/json"));
        assert_eq!(observer.content_encoding(), Some("gzip"));
        assert_eq!(observer.content_length(), Some("17"));
    }

    #[test]
    fn test_content_length_from_exact_body_size() {
        let mut observer = ResponseObserver::new();
        observer.observe(Response::new(Body::from("hello")));
        assert_eq!(observer.content_length(), Some("5"));
    }
}
