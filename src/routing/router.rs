//! Route registration and lookup.
//!
//! # Responsibilities
//! - Keep one trie per HTTP method
//! - Map `"<METHOD>-<pattern>"` to the registered handler
//! - Resolve a request to its handler and path parameters
//! - Fall back to a 404 handler when nothing matches
//!
//! # Design Decisions
//! - Built during wiring, read-only once the engine serves (no locks on the hot path)
//! - Re-registering a method + pattern replaces the previous handler
//! - Param-equivalent patterns (`/p/:a`, `/p/:b`) share a node; the later one replaces the earlier
//! - Methods are isolated: a `GET` route never answers a `POST`

use std::collections::HashMap;

use axum::http::{Method, StatusCode};

use crate::http::{handler, Context, HandlerFunc};
use crate::routing::pattern;
use crate::routing::trie::Node;

/// Path parameters extracted from a matched route.
pub type Params = HashMap<String, String>;

pub struct Router {
    roots: HashMap<String, Node>,
    handlers: HashMap<String, HandlerFunc>,
    not_found: HandlerFunc,
}

impl Router {
    pub fn new() -> Self {
        Self {
            roots: HashMap::new(),
            handlers: HashMap::new(),
            not_found: not_found_handler(),
        }
    }

    /// Register `handler` for `method` requests matching `pattern`.
    pub fn add_route(&mut self, method: &Method, pattern: &str, handler: HandlerFunc) {
        if let Err(e) = pattern::validate(pattern) {
            tracing::warn!(method = %method, error = %e, "Pattern truncated at wildcard");
        }

        let parts = pattern::parse(pattern);
        let displaced = self
            .roots
            .entry(method.as_str().to_owned())
            .or_default()
            .insert(pattern, &parts, 0);
        if let Some(previous) = displaced {
            tracing::warn!(
                method = %method,
                pattern = %pattern,
                previous = %previous,
                "Route shadows an equivalent pattern, previous handler dropped"
            );
            self.handlers.remove(&route_key(method.as_str(), &previous));
        }

        let key = route_key(method.as_str(), pattern);
        if self.handlers.insert(key, handler).is_some() {
            tracing::warn!(method = %method, pattern = %pattern, "Route re-registered, previous handler replaced");
        }
    }

    /// Resolve `path` for `method` into the matched node and its parameters.
    pub fn get_route(&self, method: &str, path: &str) -> Option<(&Node, Params)> {
        let search_parts = pattern::parse(path);
        let root = self.roots.get(method)?;
        let node = root.search(&search_parts, 0)?;

        let mut params = Params::new();
        for (index, part) in pattern::parse(node.pattern()?).into_iter().enumerate() {
            if let Some(name) = part.strip_prefix(pattern::PARAM) {
                if let Some(value) = search_parts.get(index) {
                    params.insert(name.to_owned(), (*value).to_owned());
                }
            }
            if let Some(name) = part.strip_prefix(pattern::WILDCARD) {
                if !name.is_empty() {
                    let rest = search_parts.get(index..).unwrap_or_default();
                    params.insert(name.to_owned(), rest.join("/"));
                }
                break;
            }
        }
        Some((node, params))
    }

    /// Handler registered under the exact method + pattern, if any.
    pub fn handler(&self, method: &str, pattern: &str) -> Option<&HandlerFunc> {
        self.handlers.get(&route_key(method, pattern))
    }

    /// Append the resolved handler to the context's chain and start it.
    pub async fn handle(&self, c: &mut Context) {
        let resolved = self
            .get_route(c.method().as_str(), c.path())
            .and_then(|(node, params)| {
                let pattern = node.pattern()?;
                let handler = self.handler(c.method().as_str(), pattern)?;
                Some((pattern.to_owned(), params, handler.clone()))
            });

        match resolved {
            Some((pattern, params, handler)) => {
                c.set_route(pattern, params);
                c.push_handler(handler);
            }
            None => c.push_handler(self.not_found.clone()),
        }

        c.next().await;
    }

    /// Number of registered method + pattern pairs.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut routes: Vec<&String> = self.handlers.keys().collect();
        routes.sort();
        f.debug_struct("Router").field("routes", &routes).finish()
    }
}

fn route_key(method: &str, pattern: &str) -> String {
    format!("{method}-{pattern}")
}

fn not_found_handler() -> HandlerFunc {
    handler(|c| {
        Box::pin(async move {
            let body = format!("404 NOT FOUND: {}\n", c.path());
            c.string(StatusCode::NOT_FOUND, body);
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;
    use axum::http::Request;

    fn noop() -> HandlerFunc {
        handler(|_| Box::pin(async {}))
    }

    fn new_test_router() -> Router {
        let mut r = Router::new();
        r.add_route(&Method::GET, "/", noop());
        r.add_route(&Method::GET, "/hello/:name", noop());
        r.add_route(&Method::GET, "/hello/b/c", noop());
        r.add_route(&Method::GET, "/hi/:name", noop());
        r.add_route(&Method::GET, "/assets/*filepath", noop());
        r
    }

    fn context(method: Method, uri: &str) -> Context {
        let (parts, ()) = Request::builder()
            .method(method)
            .uri(uri)
            .body(())
            .unwrap()
            .into_parts();
        Context::new(parts, Bytes::new(), Vec::new())
    }

    #[test]
    fn test_get_route() {
        let r = new_test_router();
        let (node, params) = r.get_route("GET", "/hello/makabaka").unwrap();
        assert_eq!(node.pattern(), Some("/hello/:name"));
        assert_eq!(params["name"], "makabaka");
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_get_route_wildcard() {
        let r = new_test_router();
        let (node, params) = r.get_route("GET", "/assets/css/style.css").unwrap();
        assert_eq!(node.pattern(), Some("/assets/*filepath"));
        assert_eq!(params["filepath"], "css/style.css");
    }

    #[test]
    fn test_get_route_static_has_no_params() {
        let r = new_test_router();
        let (node, params) = r.get_route("GET", "/hello/b/c").unwrap();
        assert_eq!(node.pattern(), Some("/hello/b/c"));
        assert!(params.is_empty());

        let (node, _) = r.get_route("GET", "/").unwrap();
        assert_eq!(node.pattern(), Some("/"));
    }

    #[test]
    fn test_get_route_no_match() {
        let r = new_test_router();
        assert!(r.get_route("GET", "/nothing/here").is_none());
        assert!(r.get_route("GET", "/hello").is_none());
    }

    #[test]
    fn test_method_isolation() {
        let mut r = new_test_router();
        r.add_route(&Method::POST, "/login", noop());
        assert!(r.get_route("POST", "/hello/makabaka").is_none());
        assert!(r.get_route("GET", "/login").is_none());
        assert!(r.get_route("PUT", "/login").is_none());
        assert!(r.get_route("POST", "/login").is_some());
    }

    #[test]
    fn test_multiple_params() {
        let mut r = Router::new();
        r.add_route(&Method::GET, "/p/:lang/doc/:page", noop());
        let (_, params) = r.get_route("GET", "/p/go/doc/intro").unwrap();
        assert_eq!(params["lang"], "go");
        assert_eq!(params["page"], "intro");
    }

    #[test]
    fn test_unnamed_wildcard_binds_nothing() {
        let mut r = Router::new();
        r.add_route(&Method::GET, "/static/*", noop());
        let (node, params) = r.get_route("GET", "/static/a/b").unwrap();
        assert_eq!(node.pattern(), Some("/static/*"));
        assert!(params.is_empty());
    }

    #[test]
    fn test_truncated_pattern_still_registers() {
        let mut r = Router::new();
        r.add_route(&Method::GET, "/files/*path/ignored", noop());
        let (node, params) = r.get_route("GET", "/files/a/b").unwrap();
        assert_eq!(node.pattern(), Some("/files/*path/ignored"));
        assert_eq!(params["path"], "a/b");
        assert!(r.handler("GET", "/files/*path/ignored").is_some());
    }

    #[test]
    fn test_equivalent_param_pattern_replaces_previous() {
        let mut r = Router::new();
        r.add_route(&Method::GET, "/p/:a", noop());
        r.add_route(&Method::GET, "/p/:b", noop());

        assert_eq!(r.len(), 1);
        assert!(r.handler("GET", "/p/:a").is_none());
        let (node, params) = r.get_route("GET", "/p/go").unwrap();
        assert_eq!(node.pattern(), Some("/p/:b"));
        assert_eq!(params["b"], "go");
        assert!(r.handler("GET", "/p/:b").is_some());
    }

    #[tokio::test]
    async fn test_last_registration_wins() {
        let mut r = Router::new();
        r.add_route(
            &Method::GET,
            "/dup",
            handler(|c| Box::pin(async move { c.string(StatusCode::OK, "first") })),
        );
        r.add_route(
            &Method::GET,
            "/dup",
            handler(|c| Box::pin(async move { c.string(StatusCode::OK, "second") })),
        );
        assert_eq!(r.len(), 1);

        let mut c = context(Method::GET, "/dup");
        r.handle(&mut c).await;
        assert_eq!(c.body_written(), Some(&Bytes::from("second")));
    }

    #[tokio::test]
    async fn test_handle_sets_params_and_route() {
        let r = new_test_router();
        let mut c = context(Method::GET, "/hi/geek");
        r.handle(&mut c).await;
        assert_eq!(c.param("name"), Some("geek"));
        assert_eq!(c.full_path(), Some("/hi/:name"));
    }

    #[tokio::test]
    async fn test_handle_not_found() {
        let r = new_test_router();
        let mut c = context(Method::GET, "/missing/page");
        r.handle(&mut c).await;
        assert_eq!(c.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            c.body_written(),
            Some(&Bytes::from("404 NOT FOUND: /missing/page\n"))
        );
        assert!(c.full_path().is_none());
    }
}
