use std::fmt;

/// Identifies a cached query: a resource name followed by scoping parameters.
///
/// Prefix matching is segment-wise, so `["pendingRequests"]` matches
/// `["pendingRequests", "u1"]` but not `["pendingRequestsArchive"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new(resource: impl Into<String>) -> Self {
        Self(vec![resource.into()])
    }

    /// Append a scoping parameter
    pub fn with(mut self, param: impl ToString) -> Self {
        self.0.push(param.to_string());
        self
    }

    pub fn resource(&self) -> &str {
        &self.0[0]
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl From<&str> for QueryKey {
    fn from(resource: &str) -> Self {
        Self::new(resource)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}
