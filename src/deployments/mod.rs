//!
//! List the deployments of a project.
//!
//! GitLab API docs: <https://docs.gitlab.com/ee/api/deployments.html#list-project-deployments>
use crate::project::ProjectId;
use crate::transport::{execute_json, Request, Response, Transport};
use crate::Result;
use serde::Serialize;

pub mod types;

pub use types::{Commit, Deployable, Deployment, Environment, Loose, User, UserBasic};

/// Field to order deployments by
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrderBy {
    Id,
    Iid,
    CreatedAt,
    UpdatedAt,
    Ref,
}

/// Sort direction
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sort {
    Asc,
    Desc,
}

/// Options for [`list_deployments`]. Unset options are left out of the query.
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct ListDeploymentsOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    page: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    per_page: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    order_by: Option<OrderBy>,

    #[serde(skip_serializing_if = "Option::is_none")]
    sort: Option<Sort>,

    #[serde(skip_serializing_if = "Option::is_none")]
    search: Option<String>,
}

impl ListDeploymentsOptions {
    /// Create an empty set of options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Page to fetch, starting at 1
    #[must_use]
    pub fn page(self, page: u32) -> Self {
        Self {
            page: Some(page),
            ..self
        }
    }

    /// Number of items per page
    #[must_use]
    pub fn per_page(self, per_page: u32) -> Self {
        Self {
            per_page: Some(per_page),
            ..self
        }
    }

    /// Order deployments by this field
    #[must_use]
    pub fn order_by(self, order_by: OrderBy) -> Self {
        Self {
            order_by: Some(order_by),
            ..self
        }
    }

    /// Sort direction
    #[must_use]
    pub fn sort(self, sort: Sort) -> Self {
        Self {
            sort: Some(sort),
            ..self
        }
    }

    /// Free text filter
    #[must_use]
    pub fn search(self, search: &str) -> Self {
        Self {
            search: Some(search.into()),
            ..self
        }
    }
}

/// Returns the resource path for the deployments of a project
pub fn deployments_path(project: &ProjectId) -> Result<String> {
    Ok(format!("projects/{}/deployments", project.encoded()?))
}

/// Build the request for listing deployments without sending it
pub fn list_deployments_request(
    project: &ProjectId,
    options: &ListDeploymentsOptions,
) -> Result<Request> {
    Request::get(deployments_path(project)?).query(options)
}

/// List the deployments of a project.
/// The identifier is validated before anything is sent.
pub async fn list_deployments<C: Transport + ?Sized>(
    transport: &C,
    project: &ProjectId,
    options: &ListDeploymentsOptions,
) -> Result<Response<Vec<Deployment>>> {
    list_deployments_with(transport, project, options, Ok).await
}

/// Same as [`list_deployments`], with `modify` applied to the request
/// before it is sent (extra headers, sudo)
#[tracing::instrument(skip(transport, modify))]
pub async fn list_deployments_with<C, F>(
    transport: &C,
    project: &ProjectId,
    options: &ListDeploymentsOptions,
    modify: F,
) -> Result<Response<Vec<Deployment>>>
where
    C: Transport + ?Sized,
    F: FnOnce(Request) -> Result<Request> + Send,
{
    let request = modify(list_deployments_request(project, options)?)?;
    let resp: Response<Vec<Deployment>> = execute_json(transport, request).await?;
    tracing::debug!("received {} deployments", resp.data.len());
    Ok(resp)
}
