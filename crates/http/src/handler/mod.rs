//! The single extension point of the server.
//!
//! A [`Handler`] receives the parsed request and the clean response for it, and fills
//! the response in. It reports nothing back: a failure it wants the client to see must
//! be expressed as a status code and body before it returns.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::protocol::{HttpRequest, HttpResponse, status};

#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, request: &mut HttpRequest<'_>, response: &mut HttpResponse);
}

#[async_trait]
impl<H: Handler + ?Sized> Handler for Arc<H> {
    async fn handle(&self, request: &mut HttpRequest<'_>, response: &mut HttpResponse) {
        self.as_ref().handle(request, response).await;
    }
}

#[async_trait]
impl<H: Handler + ?Sized> Handler for Box<H> {
    async fn handle(&self, request: &mut HttpRequest<'_>, response: &mut HttpResponse) {
        self.as_ref().handle(request, response).await;
    }
}

/// Used when no handler is supplied: every request gets `200 OK` with no body.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHandler;

#[async_trait]
impl Handler for DefaultHandler {
    async fn handle(&self, _request: &mut HttpRequest<'_>, response: &mut HttpResponse) {
        response.set_status(status::OK);
    }
}

/// A handler made from a synchronous function, see [`handler_fn`].
pub struct HandlerFn<F> {
    f: F,
}

#[async_trait]
impl<F> Handler for HandlerFn<F>
where
    F: Fn(&mut HttpRequest<'_>, &mut HttpResponse) + Send + Sync,
{
    async fn handle(&self, request: &mut HttpRequest<'_>, response: &mut HttpResponse) {
        (self.f)(request, response);
    }
}

impl<F> fmt::Debug for HandlerFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerFn").finish_non_exhaustive()
    }
}

/// Wraps a function that only needs the request head, such as a static responder.
pub fn handler_fn<F>(f: F) -> HandlerFn<F>
where
    F: Fn(&mut HttpRequest<'_>, &mut HttpResponse) + Send + Sync,
{
    HandlerFn { f }
}
