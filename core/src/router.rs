//! Explicit route table
//!
//! Built once at startup and only read afterwards.

use heapless::Vec;

use crate::http::Method;

/// Maximum number of registered routes
pub const MAX_ROUTES: usize = 8;

/// What a route serves
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Endpoint {
    /// `/api/temps` sensor report
    Telemetry,
    /// `/api/health` liveness report
    Health,
    /// Static asset stored under this path
    Asset(&'static str),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Route {
    pub path: &'static str,
    pub endpoint: Endpoint,
}

/// Outcome of matching a request against the table
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Resolution {
    /// Serve the endpoint; `include_body` is false for HEAD
    Found { endpoint: Endpoint, include_body: bool },
    /// CORS preflight on a known path
    Preflight,
    MethodNotAllowed,
    NotFound,
}

/// Route table was full when registering
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RouterFull;

#[derive(Clone, Debug, Default)]
pub struct Router {
    routes: Vec<Route, MAX_ROUTES>,
}

impl Router {
    pub const fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// The device's routes: index page, telemetry, and health
    pub fn standard() -> Self {
        let mut router = Self::new();
        // Three routes always fit MAX_ROUTES
        let _ = router
            .route("/", Endpoint::Asset("/index.html"))
            .and_then(|r| r.route("/api/temps", Endpoint::Telemetry))
            .and_then(|r| r.route("/api/health", Endpoint::Health));
        router
    }

    /// Register `path`; a later registration of the same path replaces it
    pub fn route(&mut self, path: &'static str, endpoint: Endpoint) -> Result<&mut Self, RouterFull> {
        if let Some(existing) = self.routes.iter_mut().find(|r| r.path == path) {
            existing.endpoint = endpoint;
            return Ok(self);
        }
        self.routes
            .push(Route { path, endpoint })
            .map_err(|_| RouterFull)?;
        Ok(self)
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn lookup(&self, path: &str) -> Option<Endpoint> {
        self.routes
            .iter()
            .find(|r| r.path == path)
            .map(|r| r.endpoint)
    }

    pub fn resolve(&self, method: Method, path: &str) -> Resolution {
        let Some(endpoint) = self.lookup(path) else {
            return Resolution::NotFound;
        };
        match method {
            Method::Get => Resolution::Found {
                endpoint,
                include_body: true,
            },
            Method::Head => Resolution::Found {
                endpoint,
                include_body: false,
            },
            Method::Options => Resolution::Preflight,
            _ => Resolution::MethodNotAllowed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_routes() {
        let router = Router::standard();
        assert_eq!(router.routes().len(), 3);
        assert_eq!(router.lookup("/api/temps"), Some(Endpoint::Telemetry));
        assert_eq!(router.lookup("/api/health"), Some(Endpoint::Health));
        assert_eq!(router.lookup("/"), Some(Endpoint::Asset("/index.html")));
        assert_eq!(router.lookup("/api"), None);
    }

    #[test]
    fn test_resolve_methods() {
        let router = Router::standard();
        assert_eq!(
            router.resolve(Method::Get, "/api/temps"),
            Resolution::Found {
                endpoint: Endpoint::Telemetry,
                include_body: true
            }
        );
        assert_eq!(
            router.resolve(Method::Head, "/api/health"),
            Resolution::Found {
                endpoint: Endpoint::Health,
                include_body: false
            }
        );
        assert_eq!(router.resolve(Method::Options, "/"), Resolution::Preflight);
        assert_eq!(
            router.resolve(Method::Post, "/api/temps"),
            Resolution::MethodNotAllowed
        );
        assert_eq!(router.resolve(Method::Get, "/nope"), Resolution::NotFound);
        assert_eq!(router.resolve(Method::Post, "/nope"), Resolution::NotFound);
    }

    #[test]
    fn test_reregistering_replaces() {
        let mut router = Router::standard();
        router.route("/", Endpoint::Health).unwrap();
        assert_eq!(router.routes().len(), 3);
        assert_eq!(router.lookup("/"), Some(Endpoint::Health));
    }

    #[test]
    fn test_table_capacity() {
        const PATHS: [&str; MAX_ROUTES] = ["/0", "/1", "/2", "/3", "/4", "/5", "/6", "/7"];
        let mut router = Router::new();
        for path in PATHS {
            router.route(path, Endpoint::Health).unwrap();
        }
        assert_eq!(router.route("/8", Endpoint::Health).err(), Some(RouterFull));
    }
}
