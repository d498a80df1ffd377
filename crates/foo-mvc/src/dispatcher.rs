//! The dispatch loop: resolve, run the controller, render the view.

use std::collections::HashMap;
use std::sync::Arc;

use foo_router::{Resolution, ResolveOptions, RouteTable, RouteTree};
use tracing::{debug, error, info};

use crate::controller::{normalize_name, Context, Controller, ControllerMap, View};
use crate::error::{DispatchError, Result};
use crate::request::Request;
use crate::response::Response;

/// Dispatcher settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// URL prefix the application is mounted under (e.g. `/foo-mvc`).
    pub base_url: String,
    /// Resolver options. The path-join fallback is on by default.
    pub options: ResolveOptions,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            options: ResolveOptions::new().with_fallback(true),
        }
    }
}

impl DispatcherConfig {
    /// Sets the base URL.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Enables or disables the path-join fallback.
    #[must_use]
    pub fn fallback(mut self, fallback: bool) -> Self {
        self.options = self.options.with_fallback(fallback);
        self
    }

    /// Sets the fallback separator.
    #[must_use]
    pub fn join(mut self, join: char) -> Self {
        self.options = self.options.with_join(join);
        self
    }
}

/// Builder for a [`Dispatcher`].
#[derive(Default)]
pub struct DispatcherBuilder {
    routes: RouteTable,
    config: DispatcherConfig,
    controllers: ControllerMap,
    views: HashMap<String, Arc<dyn View>>,
}

impl DispatcherBuilder {
    /// Sets the route table.
    #[must_use]
    pub fn routes(mut self, routes: RouteTable) -> Self {
        self.routes = routes;
        self
    }

    /// Sets the dispatcher configuration.
    #[must_use]
    pub fn config(mut self, config: DispatcherConfig) -> Self {
        self.config = config;
        self
    }

    /// Registers a controller under a normalized name.
    #[must_use]
    pub fn controller(mut self, name: &str, controller: impl Controller + 'static) -> Self {
        self.controllers
            .insert(normalize_name(name), Arc::new(controller));
        self
    }

    /// Registers a view under a normalized name.
    #[must_use]
    pub fn view(mut self, name: &str, view: impl View + 'static) -> Self {
        self.views.insert(normalize_name(name), Arc::new(view));
        self
    }

    /// Compiles the route table and builds the dispatcher.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Route`] if the route table does not compile.
    pub fn build(self) -> Result<Dispatcher> {
        let tree = self.routes.compile()?;
        info!(
            routes = tree.len(),
            controllers = self.controllers.len(),
            views = self.views.len(),
            "dispatcher ready"
        );
        Ok(Dispatcher {
            tree: Arc::new(tree),
            config: self.config,
            controllers: Arc::new(self.controllers),
            views: Arc::new(self.views),
        })
    }
}

/// Maps request paths to controllers and renders their views.
///
/// The route tree is compiled once in [`DispatcherBuilder::build`] and only
/// read afterwards, so a dispatcher can serve requests from many threads.
///
/// # Example
///
/// ```
/// use foo_mvc::{Context, Dispatcher, Result, ViewData};
/// use foo_router::RouteTable;
///
/// fn post(ctx: &mut Context<'_>) -> Result<()> {
///     let slug = ctx.param("slug").unwrap_or_default().to_string();
///     ctx.set_data("slug", slug);
///     ctx.set_view("post");
///     Ok(())
/// }
///
/// fn post_view(data: &ViewData) -> Result<String> {
///     Ok(format!("<h1>{}</h1>", data.get_str("slug").unwrap_or_default()))
/// }
///
/// let dispatcher = Dispatcher::builder()
///     .routes(RouteTable::new().route("blog/:slug", "Post.Show"))
///     .controller("Post.Show", post)
///     .view("post", post_view)
///     .build()
///     .unwrap();
///
/// let res = dispatcher.dispatch("/blog/hello");
/// assert_eq!(res.body_string(), Some("<h1>hello</h1>".to_string()));
/// ```
#[derive(Clone)]
pub struct Dispatcher {
    tree: Arc<RouteTree>,
    config: DispatcherConfig,
    controllers: Arc<ControllerMap>,
    views: Arc<HashMap<String, Arc<dyn View>>>,
}

impl Dispatcher {
    /// Creates a dispatcher builder.
    #[must_use]
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::default()
    }

    /// Returns the compiled route tree.
    #[must_use]
    pub fn tree(&self) -> &RouteTree {
        &self.tree
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Resolves a request URI to a normalized controller name and request.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::NotFound`] when the URI is outside the base
    /// URL or nothing resolves.
    pub fn route(&self, uri: &str) -> Result<(String, Request)> {
        let not_found = || DispatchError::NotFound {
            path: uri.to_string(),
        };
        let mut request = Request::from_uri(uri, &self.config.base_url).ok_or_else(not_found)?;

        let target = match self
            .tree
            .resolve_with(&request.route_path, &self.config.options)
        {
            Resolution::Matched { target, bindings } => {
                request.params = bindings;
                target
            }
            Resolution::Fallback { target } => {
                debug!(path = %uri, fallback = %target, "no route matched, using path fallback");
                target
            }
            Resolution::Unresolved => return Err(not_found()),
        };

        Ok((normalize_name(&target), request))
    }

    /// Dispatches a request, surfacing every failure as an error.
    ///
    /// # Errors
    ///
    /// Returns the first error from routing, the controller chain, or the view.
    pub fn try_dispatch(&self, uri: &str) -> Result<Response> {
        let (controller, request) = self.route(uri)?;
        debug!(path = %uri, controller = %controller, "dispatching");

        let mut ctx = Context::new(&self.controllers, &request);
        ctx.forward(&controller, false)?;
        let (view_name, data) = ctx.into_parts();

        let view = self
            .views
            .get(&view_name)
            .ok_or(DispatchError::ViewNotRegistered(view_name))?;
        let body = view.render(&data)?;
        Ok(Response::html(body))
    }

    /// Dispatches a request, mapping errors to 404 or 500 responses.
    #[must_use]
    pub fn dispatch(&self, uri: &str) -> Response {
        match self.try_dispatch(uri) {
            Ok(response) => response,
            Err(e) if e.is_not_found() => {
                debug!(path = %uri, error = %e, "not found");
                Response::not_found()
            }
            Err(e) => {
                error!(path = %uri, error = %e, "dispatch failed");
                Response::internal_server_error()
            }
        }
    }
}
