//!
//! Types returned from the deployments API.
//!
//! NOTE: Fields the server may leave out, or send as null, decode to their
//! default value so that sparse payloads are accepted. `environment` and
//! `deployable` are always required.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// Null decodes like an absent field
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Value of a field the API returns with varying JSON types
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Loose {
    /// Boolean value
    Bool(bool),
    /// Integral value
    Integer(i64),
    /// Non integral value
    Float(f64),
    /// String value
    String(String),
}

impl Loose {
    /// Returns the value if it is a string
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as a float if it is numeric, or a string holding a number
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            #[allow(clippy::cast_precision_loss)]
            Self::Integer(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::String(s) => s.trim().parse().ok(),
            Self::Bool(_) => None,
        }
    }
}

impl std::fmt::Display for Loose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

/// One deployment of a commit to an environment
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Deployment {
    /// Deployment ID
    pub id: u64,
    /// Per project sequence number
    pub iid: u64,
    /// Branch or tag that was deployed
    #[serde(rename = "ref", default, deserialize_with = "null_default")]
    pub git_ref: String,
    /// Commit SHA that was deployed
    #[serde(default, deserialize_with = "null_default")]
    pub sha: String,
    /// Creation time
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// User that triggered the deployment
    #[serde(default, deserialize_with = "null_default")]
    pub user: UserBasic,
    /// Target environment
    pub environment: Environment,
    /// Job that performed the deployment
    pub deployable: Deployable,
}

/// Deployment target
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Environment {
    /// Environment ID
    #[serde(default, deserialize_with = "null_default")]
    pub id: u64,
    /// Environment name, e.g. `production`
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    /// Externally reachable URL
    #[serde(default)]
    pub external_url: Option<String>,
}

/// CI job that produced a deployment
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Deployable {
    /// Job ID
    #[serde(default, deserialize_with = "null_default")]
    pub id: u64,
    /// Job name
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    /// Branch or tag the job ran for
    #[serde(rename = "ref", default, deserialize_with = "null_default")]
    pub git_ref: String,
    /// Pipeline stage
    #[serde(default, deserialize_with = "null_default")]
    pub stage: String,
    /// Job status, e.g. `success`
    #[serde(default, deserialize_with = "null_default")]
    pub status: String,
    /// True if the job ran for a tag
    #[serde(default, deserialize_with = "null_default")]
    pub tag: bool,
    /// Job coverage
    #[serde(default)]
    pub coverage: Option<Loose>,
    /// Creation time
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Start time, usually a timestamp string
    #[serde(default)]
    pub started_at: Option<Loose>,
    /// Finish time
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
    /// Runner that executed the job, kept as opaque JSON
    #[serde(default)]
    pub runner: Option<serde_json::Value>,
    /// Commit the job ran on
    #[serde(default, deserialize_with = "null_default")]
    pub commit: Commit,
    /// User that started the job
    #[serde(default, deserialize_with = "null_default")]
    pub user: User,
}

/// Commit that was deployed
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Commit {
    /// Full SHA
    #[serde(default, deserialize_with = "null_default")]
    pub id: String,
    /// Abbreviated SHA
    #[serde(default, deserialize_with = "null_default")]
    pub short_id: String,
    /// First line of the message
    #[serde(default, deserialize_with = "null_default")]
    pub title: String,
    /// Full commit message
    #[serde(default, deserialize_with = "null_default")]
    pub message: String,
    /// Author name
    #[serde(default, deserialize_with = "null_default")]
    pub author_name: String,
    /// Author email
    #[serde(default, deserialize_with = "null_default")]
    pub author_email: String,
    /// Commit time
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Full user profile
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct User {
    #[serde(deserialize_with = "null_default")]
    pub id: u64,
    #[serde(deserialize_with = "null_default")]
    pub username: String,
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    /// Account state, e.g. `active`
    #[serde(deserialize_with = "null_default")]
    pub state: String,
    pub avatar_url: Option<String>,
    pub web_url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub bio: Option<Loose>,
    pub location: Option<Loose>,
    pub skype: Option<String>,
    pub linkedin: Option<String>,
    pub twitter: Option<String>,
    pub website_url: Option<String>,
}

/// Abbreviated user profile
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct UserBasic {
    #[serde(deserialize_with = "null_default")]
    pub id: u64,
    #[serde(deserialize_with = "null_default")]
    pub username: String,
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    #[serde(deserialize_with = "null_default")]
    pub state: String,
    pub avatar_url: Option<String>,
    pub web_url: Option<String>,
}
