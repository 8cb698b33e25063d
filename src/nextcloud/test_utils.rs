use crate::config::ClientConfig;
use crate::error::{CloudError, Result};
use crate::store::client::NextcloudClient;
use crate::store::transport::{HttpRequest, HttpResponse, Transport};
use std::cell::RefCell;
use std::collections::VecDeque;

/// Transport that replays scripted responses and records every request.
#[derive(Debug, Default)]
pub struct FakeTransport {
    responses: RefCell<VecDeque<Result<HttpResponse>>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: u16, body: impl Into<Vec<u8>>) -> Self {
        self.responses
            .borrow_mut()
            .push_back(Ok(HttpResponse::new(status, body)));
        self
    }

    /// Script a connection-level failure.
    pub fn fail(self, reason: &str) -> Self {
        self.responses
            .borrow_mut()
            .push_back(Err(CloudError::InvalidRequest(reason.to_string())));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.borrow().last().cloned()
    }
}

impl Transport for FakeTransport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.requests.borrow_mut().push(request);
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(CloudError::InvalidRequest("no scripted response".into())))
    }
}

pub fn fake_client(transport: FakeTransport) -> NextcloudClient<FakeTransport> {
    fake_client_with("https://cloud.example.com", transport)
}

pub fn fake_client_with(url: &str, transport: FakeTransport) -> NextcloudClient<FakeTransport> {
    let config = ClientConfig::new(url, "admin", "password");
    NextcloudClient::with_transport(&config, transport).expect("valid test config")
}

/// An OCS envelope with the given status code and `data` id/url.
pub fn ocs_body(code: u64, id: u64, url: &str) -> String {
    let status = if code == 100 || code == 200 {
        "ok"
    } else {
        "failure"
    };
    format!(
        "<?xml version=\"1.0\"?>\n<ocs><meta><status>{status}</status>\
         <statuscode>{code}</statuscode><message>msg</message></meta>\
         <data><id>{id}</id><url>{url}</url></data></ocs>"
    )
}

/// A successful share listing with one element per id.
pub fn share_list_body(ids: &[u64]) -> String {
    let elements: String = ids
        .iter()
        .map(|id| format!("<element><id>{id}</id><url>https://cloud.example.com/s/{id}</url></element>"))
        .collect();
    format!(
        "<?xml version=\"1.0\"?>\n<ocs><meta><status>ok</status><statuscode>200</statuscode>\
         <message>OK</message></meta><data>{elements}</data></ocs>"
    )
}

/// A Sabre WebDAV error document.
pub fn sabre_error(exception: &str, message: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
         <d:error xmlns:d=\"DAV:\" xmlns:s=\"http://sabredav.org/ns\">\
         <s:exception>{exception}</s:exception><s:message>{message}</s:message></d:error>"
    )
}
