//! Error types for the blog API client.

use std::fmt;

use thiserror::Error;

/// Which remote collection a request was for. Carried in errors and log
/// lines so a failure names the resource and identifier involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Users,
    User,
    Posts,
    Comments,
}

impl Resource {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::User => "user",
            Self::Posts => "posts",
            Self::Comments => "comments",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed fetch. One attempt only; the caller decides what to do next.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{resource} request failed: {source}")]
    Transport {
        resource: Resource,
        id: Option<u64>,
        source: reqwest::Error,
    },

    #[error("{resource} request returned status {status}")]
    Status {
        resource: Resource,
        id: Option<u64>,
        status: reqwest::StatusCode,
    },

    #[error("failed to decode {resource} response: {source}")]
    Decode {
        resource: Resource,
        id: Option<u64>,
        source: reqwest::Error,
    },
}

impl ApiError {
    /// The resource the failing request was for.
    #[must_use]
    pub fn resource(&self) -> Resource {
        match self {
            Self::Transport { resource, .. }
            | Self::Status { resource, .. }
            | Self::Decode { resource, .. } => *resource,
        }
    }

    /// The identifier the failing request carried, if any.
    #[must_use]
    pub fn id(&self) -> Option<u64> {
        match self {
            Self::Transport { id, .. } | Self::Status { id, .. } | Self::Decode { id, .. } => *id,
        }
    }
}
