//! File storage and echo routes on top of `wire-http`.
//!
//! | route                  | handler                 |
//! |------------------------|-------------------------|
//! | `/`                    | [`RootHandler`]         |
//! | `/echo/<text>`         | [`EchoHandler`]         |
//! | `/user-agent`          | [`UserAgentHandler`]    |
//! | `GET /files/<name>`    | [`ReadFileHandler`]     |
//! | `POST /files/<name>`   | [`CreateFileHandler`]   |
//! | anything else          | [`NotFoundHandler`]     |

use std::sync::Arc;

use http::Method;

pub mod config;
pub mod handlers;
pub mod router;

pub use config::Config;
pub use router::{PathMatcher, Router};

use handlers::{
    CreateFileHandler, ECHO_PREFIX, EchoHandler, FILES_PREFIX, NotFoundHandler, ReadFileHandler, RootHandler,
    UserAgentHandler,
};

/// Builds the application's route table.
pub fn app_router(config: Arc<Config>) -> Router {
    Router::builder()
        .route(PathMatcher::exact("/"), RootHandler)
        .route(PathMatcher::prefix(ECHO_PREFIX), EchoHandler)
        .route(PathMatcher::prefix("/user-agent"), UserAgentHandler)
        .route_method(PathMatcher::prefix(FILES_PREFIX), Method::GET, ReadFileHandler::new(Arc::clone(&config)))
        .route_method(PathMatcher::prefix(FILES_PREFIX), Method::POST, CreateFileHandler::new(config))
        .fallback(NotFoundHandler)
        .build()
}
