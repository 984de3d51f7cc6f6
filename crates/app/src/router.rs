//! Ordered route table.
//!
//! Routes are checked in the order they were added and the first one whose path matcher
//! and method filter both accept the request handles it. Requests no route accepts go
//! to the fallback handler, which answers `404 Not Found` unless replaced.

use async_trait::async_trait;
use http::Method;
use tracing::trace;
use wire_http::handler::Handler;
use wire_http::protocol::{HttpRequest, HttpResponse};

use crate::handlers::NotFoundHandler;

/// How a route matches the request target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathMatcher {
    /// The target must equal the path.
    Exact(String),
    /// The target must start with the path.
    Prefix(String),
}

impl PathMatcher {
    pub fn exact(path: impl Into<String>) -> Self {
        Self::Exact(path.into())
    }

    pub fn prefix(path: impl Into<String>) -> Self {
        Self::Prefix(path.into())
    }

    pub fn matches(&self, target: &str) -> bool {
        match self {
            Self::Exact(path) => target == path,
            Self::Prefix(path) => target.starts_with(path.as_str()),
        }
    }
}

struct Route {
    matcher: PathMatcher,
    method: Option<Method>,
    handler: Box<dyn Handler>,
}

impl Route {
    fn accepts(&self, request: &HttpRequest<'_>) -> bool {
        self.matcher.matches(request.target()) && self.method.as_ref().is_none_or(|method| method == request.method())
    }
}

pub struct Router {
    routes: Vec<Route>,
    fallback: Box<dyn Handler>,
}

impl Router {
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    fn find(&self, request: &HttpRequest<'_>) -> Option<&Route> {
        self.routes.iter().find(|route| route.accepts(request))
    }
}

#[async_trait]
impl Handler for Router {
    async fn handle(&self, request: &mut HttpRequest<'_>, response: &mut HttpResponse) {
        match self.find(request) {
            Some(route) => {
                trace!(target_path = request.target(), matcher = ?route.matcher, "route matched");
                route.handler.handle(request, response).await;
            }
            None => self.fallback.handle(request, response).await,
        }
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let routes: Vec<_> = self.routes.iter().map(|route| (&route.matcher, &route.method)).collect();
        f.debug_struct("Router").field("routes", &routes).finish_non_exhaustive()
    }
}

pub struct RouterBuilder {
    routes: Vec<Route>,
    fallback: Option<Box<dyn Handler>>,
}

impl RouterBuilder {
    fn new() -> Self {
        Self { routes: Vec::new(), fallback: None }
    }

    /// Adds a route accepting any method.
    pub fn route(self, matcher: PathMatcher, handler: impl Handler + 'static) -> Self {
        self.push(matcher, None, handler)
    }

    /// Adds a route accepting only `method`.
    pub fn route_method(self, matcher: PathMatcher, method: Method, handler: impl Handler + 'static) -> Self {
        self.push(matcher, Some(method), handler)
    }

    pub fn fallback(mut self, handler: impl Handler + 'static) -> Self {
        self.fallback = Some(Box::new(handler));
        self
    }

    fn push(mut self, matcher: PathMatcher, method: Option<Method>, handler: impl Handler + 'static) -> Self {
        self.routes.push(Route { matcher, method, handler: Box::new(handler) });
        self
    }

    pub fn build(self) -> Router {
        Router { routes: self.routes, fallback: self.fallback.unwrap_or_else(|| Box::new(NotFoundHandler)) }
    }
}

impl std::fmt::Debug for RouterBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouterBuilder").field("routes", &self.routes.len()).finish_non_exhaustive()
    }
}
