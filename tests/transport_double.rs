use gitlab_deployments::deployments::{
    list_deployments, list_deployments_with, ListDeploymentsOptions,
};
use gitlab_deployments::{Error, ProjectId, RawResponse, Request, Transport};
use std::sync::Mutex;

/// Answers every request with the same canned response and records the requests.
struct Recorder {
    status: u16,
    body: &'static str,
    requests: Mutex<Vec<Request>>,
}

impl Recorder {
    fn new(status: u16, body: &'static str) -> Self {
        Self {
            status,
            body,
            requests: Mutex::new(Vec::new()),
        }
    }

    fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Transport for Recorder {
    async fn execute(&self, request: Request) -> gitlab_deployments::Result<RawResponse> {
        self.requests.lock().unwrap().push(request);
        Ok(RawResponse {
            status: self.status,
            headers: reqwest::header::HeaderMap::new(),
            body: bytes::Bytes::from_static(self.body.as_bytes()),
        })
    }
}

#[tokio::test]
async fn one_request_per_call() {
    let transport = Recorder::new(200, "[]");
    let opts = ListDeploymentsOptions::new().search("prod");

    let resp = list_deployments(&transport, &ProjectId::from("ns/proj"), &opts)
        .await
        .unwrap();
    assert!(resp.data.is_empty());
    assert_eq!(resp.pagination, gitlab_deployments::Pagination::default());

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "projects/ns%2Fproj/deployments");
    assert_eq!(requests[0].query.as_deref(), Some("search=prod"));
}

#[tokio::test]
async fn invalid_identifier_makes_no_call() {
    let transport = Recorder::new(200, "[]");

    let err = list_deployments(
        &transport,
        &ProjectId::from("   "),
        &ListDeploymentsOptions::new(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, Error::InvalidIdentifier(_)));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn status_errors_are_not_retried() {
    let transport = Recorder::new(503, "");

    let err = list_deployments(&transport, &ProjectId::from(1), &ListDeploymentsOptions::new())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(503));
    assert!(matches!(err, Error::HttpStatus { message: None, .. }));
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn works_through_a_trait_object() {
    let transport: Box<dyn Transport> = Box::new(Recorder::new(200, "[]"));
    let resp = list_deployments(
        transport.as_ref(),
        &ProjectId::from(7),
        &ListDeploymentsOptions::new(),
    )
    .await
    .unwrap();
    assert_eq!(resp.status, 200);
}

#[tokio::test]
async fn request_modifier_headers_reach_the_transport() {
    let transport = Recorder::new(200, "[]");

    list_deployments_with(
        &transport,
        &ProjectId::from(7),
        &ListDeploymentsOptions::new(),
        |req| req.sudo("alice")?.header("x-request-id", "abc"),
    )
    .await
    .unwrap();

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].headers.get("sudo").unwrap(), "alice");
    assert_eq!(requests[0].headers.get("x-request-id").unwrap(), "abc");
}
