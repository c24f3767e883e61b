//! HTTP transport abstraction for the Overpass client.
//!
//! The trait seam lets tests inject canned responses instead of touching
//! the network; the real implementation is a blocking reqwest client.

use super::OsmError;

/// Blocking HTTP operations used by the extractor.
pub trait HttpClient: Send + Sync {
    /// POST a form-encoded body and return the response bytes.
    ///
    /// # Arguments
    ///
    /// * `url` - The endpoint to post to
    /// * `form` - Form fields as key/value pairs
    fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<Vec<u8>, OsmError>;
}

/// Real HTTP client backed by reqwest.
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Create a client with the given request timeout.
    pub fn new(timeout_secs: u64) -> Result<Self, OsmError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| OsmError::Http(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<Vec<u8>, OsmError> {
        let response = self
            .client
            .post(url)
            .form(form)
            .send()
            .map_err(|e| OsmError::Http(format!("request to {url} failed: {e}")))?;

        if !response.status().is_success() {
            return Err(OsmError::Http(format!(
                "HTTP {} from {url}",
                response.status()
            )));
        }

        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| OsmError::Http(format!("failed to read response from {url}: {e}")))
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Scripted HTTP client for tests. Responses are served in order; an
    /// `Err` string becomes an `OsmError::Http`.
    pub struct MockHttpClient {
        responses: Mutex<VecDeque<Result<Vec<u8>, String>>>,
        pub requests: Mutex<Vec<String>>,
    }

    impl MockHttpClient {
        pub fn new(responses: Vec<Result<Vec<u8>, String>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn request_urls(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl HttpClient for MockHttpClient {
        fn post_form(&self, url: &str, _form: &[(&str, &str)]) -> Result<Vec<u8>, OsmError> {
            self.requests.lock().unwrap().push(url.to_string());
            match self.responses.lock().unwrap().pop_front() {
                Some(Ok(bytes)) => Ok(bytes),
                Some(Err(msg)) => Err(OsmError::Http(msg)),
                None => Err(OsmError::Http("mock exhausted".to_string())),
            }
        }
    }

    #[test]
    fn test_mock_serves_responses_in_order() {
        let mock = MockHttpClient::new(vec![Ok(vec![1, 2]), Err("boom".to_string())]);
        assert_eq!(mock.post_form("http://a", &[]).unwrap(), vec![1, 2]);
        assert!(mock.post_form("http://b", &[]).is_err());
        assert_eq!(mock.request_urls().len(), 2);
    }
}
