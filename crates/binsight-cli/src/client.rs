use binsight_api::ApiErrorBody;
use binsight_model::{StoredRecord, SurveyRecord};
use std::cell::Cell;
use std::fmt::{Display, Formatter};
use std::time::Duration;

#[derive(Debug)]
pub struct ClientError(pub String);

impl Display for ClientError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ClientError {}

/// Clears the in-flight flag when the submit attempt ends, success or not.
pub struct SubmitGuard<'a> {
    flag: &'a Cell<bool>,
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

/// HTTP client for the submission service. Owns the request-in-flight
/// state instead of leaving it as a free-floating global.
pub struct SubmissionClient {
    base_url: String,
    admin: Option<(String, String)>,
    http: reqwest::blocking::Client,
    in_flight: Cell<bool>,
}

impl SubmissionClient {
    #[must_use]
    pub fn new(base_url: String, admin: Option<(String, String)>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            admin,
            http: reqwest::blocking::Client::builder()
                .timeout(Duration::from_secs(15))
                .build()
                .unwrap_or_else(|_| reqwest::blocking::Client::new()),
            in_flight: Cell::new(false),
        }
    }

    /// Claim the in-flight slot. `None` while a prior submit has not
    /// finished yet.
    pub fn begin_submit(&self) -> Option<SubmitGuard<'_>> {
        if self.in_flight.get() {
            return None;
        }
        self.in_flight.set(true);
        Some(SubmitGuard {
            flag: &self.in_flight,
        })
    }

    pub fn submit(&self, record: &SurveyRecord) -> Result<String, ClientError> {
        let _guard = self
            .begin_submit()
            .ok_or_else(|| ClientError("a submission is already in flight".to_string()))?;
        let resp = self
            .http
            .post(format!("{}/api/submit", self.base_url))
            .json(record)
            .send()
            .map_err(|e| ClientError(format!("submit request failed: {e}")))?;
        if !resp.status().is_success() {
            return Err(error_from_response(resp));
        }
        let body: serde_json::Value = resp
            .json()
            .map_err(|e| ClientError(format!("submit response unreadable: {e}")))?;
        body.get("id")
            .and_then(|v| v.as_str())
            .map(ToString::to_string)
            .ok_or_else(|| ClientError("submit response carried no id".to_string()))
    }

    pub fn fetch_all(&self) -> Result<Vec<StoredRecord>, ClientError> {
        let mut req = self.http.get(format!("{}/api/submissions", self.base_url));
        if let Some((user, pass)) = &self.admin {
            req = req.basic_auth(user, Some(pass));
        }
        let resp = req
            .send()
            .map_err(|e| ClientError(format!("list request failed: {e}")))?;
        if !resp.status().is_success() {
            return Err(error_from_response(resp));
        }
        resp.json()
            .map_err(|e| ClientError(format!("list response unreadable: {e}")))
    }

    pub fn clear(&self) -> Result<(), ClientError> {
        let mut req = self
            .http
            .delete(format!("{}/api/submissions", self.base_url));
        if let Some((user, pass)) = &self.admin {
            req = req.basic_auth(user, Some(pass));
        }
        let resp = req
            .send()
            .map_err(|e| ClientError(format!("clear request failed: {e}")))?;
        if !resp.status().is_success() {
            return Err(error_from_response(resp));
        }
        Ok(())
    }

    pub fn delete(&self, id: &str) -> Result<(), ClientError> {
        let mut req = self
            .http
            .delete(format!("{}/api/submissions/{id}", self.base_url));
        if let Some((user, pass)) = &self.admin {
            req = req.basic_auth(user, Some(pass));
        }
        let resp = req
            .send()
            .map_err(|e| ClientError(format!("delete request failed: {e}")))?;
        if !resp.status().is_success() {
            return Err(error_from_response(resp));
        }
        Ok(())
    }
}

fn error_from_response(resp: reqwest::blocking::Response) -> ClientError {
    let status = resp.status();
    match resp.json::<ApiErrorBody>() {
        Ok(body) => ClientError(format!("{} ({status})", body.error)),
        Err(_) => ClientError(format!("request failed with status {status}")),
    }
}
