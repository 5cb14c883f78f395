//! Typed dispatch for SDK calls.
//!
//! The front end names SDK calls the way the API client does (`fetchDoc`,
//! `queryGroups`, ...). [`SdkMethod::from_name`] parses such a name once; the
//! rest of the bridge only sees the enum.

use crate::normalizer::QueryKind;
use std::fmt;

use super::ApiError;

/// Remote resource families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Doc,
    Group,
    Profile,
    Topic,
    User,
}

impl Resource {
    const ALL: [Resource; 5] = [
        Resource::Doc,
        Resource::Group,
        Resource::Profile,
        Resource::Topic,
        Resource::User,
    ];

    fn singular(self) -> &'static str {
        match self {
            Resource::Doc => "Doc",
            Resource::Group => "Group",
            Resource::Profile => "Profile",
            Resource::Topic => "Topic",
            Resource::User => "User",
        }
    }

    fn plural(self) -> &'static str {
        match self {
            Resource::Doc => "Docs",
            Resource::Group => "Groups",
            Resource::Profile => "Profiles",
            Resource::Topic => "Topics",
            Resource::User => "Users",
        }
    }

    /// Profile name carried by documents of this family, if it is restricted
    /// to one.
    pub fn profile(self) -> Option<&'static str> {
        match self {
            Resource::Doc => None,
            Resource::Group => Some("group"),
            Resource::Profile => Some("profile"),
            Resource::Topic => Some("topic"),
            Resource::User => Some("user"),
        }
    }
}

/// One SDK entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SdkMethod {
    Fetch(Resource),
    Query(Resource),
}

impl SdkMethod {
    pub const FETCH_DOC: SdkMethod = SdkMethod::Fetch(Resource::Doc);
    pub const QUERY_DOCS: SdkMethod = SdkMethod::Query(Resource::Doc);

    /// Parses `fetchDoc`, `queryDocs`, `fetchGroup`, `queryGroups`, ...
    pub fn from_name(name: &str) -> Result<Self, ApiError> {
        let parsed = if let Some(rest) = name.strip_prefix("fetch") {
            Resource::ALL
                .into_iter()
                .find(|r| r.singular() == rest)
                .map(SdkMethod::Fetch)
        } else if let Some(rest) = name.strip_prefix("query") {
            Resource::ALL
                .into_iter()
                .find(|r| r.plural() == rest)
                .map(SdkMethod::Query)
        } else {
            None
        };
        parsed.ok_or_else(|| ApiError::UnknownMethod(name.to_string()))
    }

    pub fn kind(self) -> QueryKind {
        match self {
            SdkMethod::Fetch(_) => QueryKind::Fetch,
            SdkMethod::Query(_) => QueryKind::Query,
        }
    }

    pub fn resource(self) -> Resource {
        match self {
            SdkMethod::Fetch(resource) | SdkMethod::Query(resource) => resource,
        }
    }
}

impl fmt::Display for SdkMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SdkMethod::Fetch(r) => write!(f, "fetch{}", r.singular()),
            SdkMethod::Query(r) => write!(f, "query{}", r.plural()),
        }
    }
}
