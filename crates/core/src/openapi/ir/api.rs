//! API-level IR for extracted operations.
//!
//! This module defines the intermediate representation between the document
//! model and TypeScript synthesis:
//! - OperationDescriptor: one path x method pair, parameters merged
//! - StatusPattern: classified response keys
//! - RoutingKind: whether an operation gets query wrappers

use std::fmt;

use crate::openapi::spec::{MaybeRef, RequestBody, Response, Schema};

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
}

impl HttpMethod {
    /// Parse the lowercase path-item key.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "get" => Some(Self::Get),
            "put" => Some(Self::Put),
            "post" => Some(Self::Post),
            "delete" => Some(Self::Delete),
            "options" => Some(Self::Options),
            "head" => Some(Self::Head),
            "patch" => Some(Self::Patch),
            "trace" => Some(Self::Trace),
            _ => None,
        }
    }

    /// Lowercase method as passed to the fetcher.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Put => "put",
            Self::Post => "post",
            Self::Delete => "delete",
            Self::Options => "options",
            Self::Head => "head",
            Self::Patch => "patch",
            Self::Trace => "trace",
        }
    }

    /// Only GET is a safe read that becomes a query by default.
    pub fn is_query(self) -> bool {
        matches!(self, Self::Get)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_ascii_uppercase())
    }
}

/// Operation routing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingKind {
    /// Gets a fetch wrapper, a query builder and a QueryOperation entry
    Query,
    /// Recognized but not emitted by this generator
    Mutation,
    /// Explicitly opted out through the component marker
    Excluded,
}

/// Parameter location. Cookie parameters are dropped during extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamLocation {
    Path,
    Query,
    Header,
}

impl ParamLocation {
    /// Map the `in` field; `None` for cookie or unknown locations.
    pub fn from_openapi(location: &str) -> Option<Self> {
        match location {
            "path" => Some(Self::Path),
            "query" => Some(Self::Query),
            "header" => Some(Self::Header),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Query => "query",
            Self::Header => "header",
        }
    }
}

/// HTTP status classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StatusClass {
    Informational,
    Success,
    Redirection,
    ClientError,
    ServerError,
}

impl StatusClass {
    /// Class for the leading digit of a status code.
    pub fn from_digit(digit: u8) -> Option<Self> {
        match digit {
            1 => Some(Self::Informational),
            2 => Some(Self::Success),
            3 => Some(Self::Redirection),
            4 => Some(Self::ClientError),
            5 => Some(Self::ServerError),
            _ => None,
        }
    }

    /// Name of the range alias in the utils file.
    pub fn range_type_name(self) -> &'static str {
        match self {
            Self::Informational => "InformationalStatus",
            Self::Success => "SuccessStatus",
            Self::Redirection => "RedirectionStatus",
            Self::ClientError => "ClientErrorStatus",
            Self::ServerError => "ServerErrorStatus",
        }
    }

    /// Half-open code range `[low, high)`.
    pub fn bounds(self) -> (u16, u16) {
        match self {
            Self::Informational => (100, 200),
            Self::Success => (200, 300),
            Self::Redirection => (300, 400),
            Self::ClientError => (400, 500),
            Self::ServerError => (500, 600),
        }
    }
}

/// Classified response key.
///
/// Ordering is literal codes ascending, then classes, then `default`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StatusPattern {
    /// `200`, `404`
    Literal(u16),
    /// `2XX`, `5XX`
    Class(StatusClass),
    /// `default`
    Default,
}

impl StatusPattern {
    /// Classify a response key. Returns `None` for anything that is not a
    /// code in 100..=599, an `nXX` class, or `default`.
    pub fn classify(key: &str) -> Option<Self> {
        if key == "default" {
            return Some(Self::Default);
        }
        let bytes = key.as_bytes();
        if bytes.len() != 3 || !bytes[0].is_ascii_digit() {
            return None;
        }
        let class = StatusClass::from_digit(bytes[0] - b'0')?;
        if bytes[1..].eq_ignore_ascii_case(b"XX") {
            return Some(Self::Class(class));
        }
        if bytes[1..].iter().all(u8::is_ascii_digit) {
            return key.parse().ok().map(Self::Literal);
        }
        None
    }

    /// Whether the pattern denotes a 2xx outcome.
    pub fn is_success(self) -> bool {
        match self {
            Self::Literal(code) => (200..300).contains(&code),
            Self::Class(class) => class == StatusClass::Success,
            Self::Default => false,
        }
    }
}

/// A parameter after path/operation merging.
#[derive(Debug, Clone)]
pub struct ParameterDescriptor<'a> {
    /// Raw name from the document
    pub name: &'a str,
    pub location: ParamLocation,
    pub required: bool,
    pub schema: Option<&'a Schema>,
    pub description: Option<&'a str>,
}

/// Request body, still pointing into the document.
#[derive(Debug, Clone, Copy)]
pub struct BodyDescriptor<'a> {
    pub source: &'a MaybeRef<RequestBody>,
    /// Resolved through the registry when the body is a reference
    pub required: bool,
}

/// One declared response.
#[derive(Debug, Clone, Copy)]
pub struct ResponseDescriptor<'a> {
    pub status: StatusPattern,
    pub source: &'a MaybeRef<Response>,
}

/// Normalized view of one path x method pair.
#[derive(Debug, Clone)]
pub struct OperationDescriptor<'a> {
    /// Raw operationId, or the one derived from method and path
    pub operation_id: String,
    pub http_method: HttpMethod,
    pub http_path: &'a str,
    /// Description, falling back to the summary
    pub doc: Option<String>,
    pub path_parameters: Vec<ParameterDescriptor<'a>>,
    pub query_parameters: Vec<ParameterDescriptor<'a>>,
    pub header_parameters: Vec<ParameterDescriptor<'a>>,
    pub request_body: Option<BodyDescriptor<'a>>,
    /// In document order
    pub responses_by_status: Vec<ResponseDescriptor<'a>>,
    pub routing_kind: RoutingKind,
}

impl OperationDescriptor<'_> {
    /// `GET /pets`, used in diagnostics.
    pub fn location(&self) -> String {
        format!("{} {}", self.http_method, self.http_path)
    }
}
