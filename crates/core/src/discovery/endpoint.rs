use std::fmt;

/// A resolved ticketing-service address (`host` or `host:port`).
///
/// Derived per request from the registry; never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoint {
    name: String,
}

impl ServiceEndpoint {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Plain-HTTP URL for `path` on this endpoint.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.name, path)
    }
}

impl fmt::Display for ServiceEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Outcome of picking the ticketing endpoint from the registered names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointSelection {
    /// Nothing registered.
    Unavailable,
    /// Exactly one candidate.
    Selected(ServiceEndpoint),
    /// More than one candidate; none may be chosen.
    Ambiguous(Vec<String>),
}

/// Pick the single registered service, if there is exactly one.
pub fn select_endpoint(mut names: Vec<String>) -> EndpointSelection {
    match names.len() {
        0 => EndpointSelection::Unavailable,
        1 => EndpointSelection::Selected(ServiceEndpoint::new(names.remove(0))),
        _ => EndpointSelection::Ambiguous(names),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_none() {
        assert_eq!(select_endpoint(vec![]), EndpointSelection::Unavailable);
    }

    #[test]
    fn test_select_single() {
        assert_eq!(
            select_endpoint(vec!["ticket-svc-7".to_string()]),
            EndpointSelection::Selected(ServiceEndpoint::new("ticket-svc-7"))
        );
    }

    #[test]
    fn test_select_many() {
        let names = vec!["svc-a".to_string(), "svc-b".to_string()];
        assert_eq!(
            select_endpoint(names.clone()),
            EndpointSelection::Ambiguous(names)
        );
    }

    #[test]
    fn test_endpoint_url() {
        let endpoint = ServiceEndpoint::new("ticket-svc-7");
        assert_eq!(endpoint.url("/tickets"), "http://ticket-svc-7/tickets");

        let endpoint = ServiceEndpoint::new("127.0.0.1:9090");
        assert_eq!(endpoint.url("/tickets"), "http://127.0.0.1:9090/tickets");
        assert_eq!(endpoint.to_string(), "127.0.0.1:9090");
    }
}
