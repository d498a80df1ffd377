//! Controllers, views and the per-request context they share.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{DispatchError, Result};
use crate::request::Request;

/// A controller runs the action for a resolved route.
///
/// Plain functions with the right signature are controllers:
///
/// ```
/// use foo_mvc::{Context, Result};
///
/// fn index(ctx: &mut Context<'_>) -> Result<()> {
///     ctx.set_data("title", "Home");
///     Ok(())
/// }
/// ```
pub trait Controller: Send + Sync {
    /// Executes the action.
    ///
    /// # Errors
    ///
    /// Any error aborts the dispatch.
    fn action(&self, ctx: &mut Context<'_>) -> Result<()>;
}

impl<F> Controller for F
where
    F: Fn(&mut Context<'_>) -> Result<()> + Send + Sync,
{
    fn action(&self, ctx: &mut Context<'_>) -> Result<()> {
        self(ctx)
    }
}

/// A view turns the data collected by controllers into a response body.
pub trait View: Send + Sync {
    /// Renders the view.
    ///
    /// # Errors
    ///
    /// Any error aborts the dispatch.
    fn render(&self, data: &ViewData) -> Result<String>;
}

impl<F> View for F
where
    F: Fn(&ViewData) -> Result<String> + Send + Sync,
{
    fn render(&self, data: &ViewData) -> Result<String> {
        self(data)
    }
}

/// Data passed from controllers to the view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewData {
    values: Map<String, Value>,
}

impl ViewData {
    /// Creates empty view data.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Gets a value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Gets a string value.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Returns the data as a JSON object.
    #[must_use]
    pub fn to_json(&self) -> Value {
        Value::Object(self.values.clone())
    }
}

pub(crate) type ControllerMap = HashMap<String, Arc<dyn Controller>>;

/// Normalizes a controller or view identifier: lowercase, `.` becomes `_`.
///
/// ```
/// assert_eq!(foo_mvc::normalize_name("Post.Hello-World"), "post_hello-world");
/// ```
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.replace('.', "_").to_lowercase()
}

/// Per-request state shared by the controllers of one dispatch.
pub struct Context<'a> {
    controllers: &'a ControllerMap,
    request: &'a Request,
    view: String,
    data: ViewData,
    chain: Vec<String>,
}

impl<'a> Context<'a> {
    pub(crate) fn new(controllers: &'a ControllerMap, request: &'a Request) -> Self {
        Self {
            controllers,
            request,
            view: String::new(),
            data: ViewData::new(),
            chain: Vec::new(),
        }
    }

    /// Returns the request being dispatched.
    #[must_use]
    pub const fn request(&self) -> &Request {
        self.request
    }

    /// Gets a route parameter.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.request.param(name)
    }

    /// Passes a value to the view.
    pub fn set_data(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.data.insert(key, value);
    }

    /// Returns the data collected so far.
    #[must_use]
    pub const fn data(&self) -> &ViewData {
        &self.data
    }

    /// Overrides the view rendered at the end of the dispatch.
    pub fn set_view(&mut self, name: &str) {
        self.view = normalize_name(name);
    }

    /// Returns the view that will be rendered.
    #[must_use]
    pub fn view(&self) -> &str {
        &self.view
    }

    /// Returns the controllers currently running, outermost first.
    #[must_use]
    pub fn chain(&self) -> &[String] {
        &self.chain
    }

    /// Runs another controller within this request.
    ///
    /// `name` may use `.` separators (`Foo.Bar`). Unless `resume` is set the
    /// forwarded controller's view replaces the current one; either way the
    /// caller continues once the forwarded action returns.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::ControllerNotRegistered`] for an unknown controller.
    /// - [`DispatchError::ForwardLoop`] if the controller is already running.
    /// - Any error from the forwarded action.
    pub fn forward(&mut self, name: &str, resume: bool) -> Result<()> {
        let name = normalize_name(name);
        if self.chain.contains(&name) {
            let mut chain = self.chain.clone();
            chain.push(name);
            return Err(DispatchError::ForwardLoop { chain });
        }

        let controllers = self.controllers;
        let controller = controllers
            .get(&name)
            .ok_or_else(|| DispatchError::ControllerNotRegistered(name.clone()))?;

        debug!(controller = %name, resume, depth = self.chain.len(), "running controller");
        if !resume {
            self.view.clone_from(&name);
        }
        self.chain.push(name);
        let result = controller.action(self);
        self.chain.pop();
        result
    }

    pub(crate) fn into_parts(self) -> (String, ViewData) {
        (self.view, self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first(ctx: &mut Context<'_>) -> Result<()> {
        ctx.set_data("first", true);
        ctx.forward("Second", false)
    }

    fn second(ctx: &mut Context<'_>) -> Result<()> {
        ctx.set_data("second", ctx.chain().len());
        Ok(())
    }

    fn helper(ctx: &mut Context<'_>) -> Result<()> {
        ctx.set_data("helper", "ran");
        Ok(())
    }

    fn uses_helper(ctx: &mut Context<'_>) -> Result<()> {
        ctx.forward("helper", true)?;
        ctx.forward("helper", true)
    }

    fn search(ctx: &mut Context<'_>) -> Result<()> {
        let q = ctx.request().get_query("q").unwrap_or_default().to_string();
        let path = ctx.request().route_path.clone();
        ctx.set_data("q", q);
        ctx.set_data("path", path);
        Ok(())
    }

    fn looping(ctx: &mut Context<'_>) -> Result<()> {
        ctx.forward("looping", false)
    }

    fn registry() -> ControllerMap {
        let mut map: ControllerMap = HashMap::new();
        map.insert("first".to_string(), Arc::new(first));
        map.insert("second".to_string(), Arc::new(second));
        map.insert("helper".to_string(), Arc::new(helper));
        map.insert("uses_helper".to_string(), Arc::new(uses_helper));
        map.insert("looping".to_string(), Arc::new(looping));
        map.insert("search".to_string(), Arc::new(search));
        map
    }

    #[test]
    fn test_forward_switches_view() {
        let controllers = registry();
        let request = Request::default();
        let mut ctx = Context::new(&controllers, &request);
        ctx.forward("first", false).unwrap();
        let (view, data) = ctx.into_parts();
        assert_eq!(view, "second");
        assert_eq!(data.get("first"), Some(&Value::Bool(true)));
        assert_eq!(data.get("second"), Some(&Value::from(2)));
    }

    #[test]
    fn test_forward_with_resume_keeps_view() {
        let controllers = registry();
        let request = Request::default();
        let mut ctx = Context::new(&controllers, &request);
        ctx.forward("uses_helper", false).unwrap();
        assert_eq!(ctx.view(), "uses_helper");
        assert_eq!(ctx.data().get_str("helper"), Some("ran"));
        assert!(ctx.chain().is_empty());
    }

    #[test]
    fn test_forward_loop_detected() {
        let controllers = registry();
        let request = Request::default();
        let mut ctx = Context::new(&controllers, &request);
        match ctx.forward("looping", false) {
            Err(DispatchError::ForwardLoop { chain }) => {
                assert_eq!(chain, ["looping", "looping"]);
            }
            other => panic!("expected forward loop, got {other:?}"),
        }
    }

    #[test]
    fn test_forward_unknown_controller() {
        let controllers = registry();
        let request = Request::default();
        let mut ctx = Context::new(&controllers, &request);
        assert!(matches!(
            ctx.forward("Missing.Thing", false),
            Err(DispatchError::ControllerNotRegistered(name)) if name == "missing_thing"
        ));
    }

    #[test]
    fn test_controller_reads_request() {
        let controllers = registry();
        let request = Request::from_uri("/app/search?q=rust%20lang", "/app").unwrap();
        let mut ctx = Context::new(&controllers, &request);
        ctx.forward("search", false).unwrap();
        assert_eq!(ctx.data().get_str("q"), Some("rust lang"));
        assert_eq!(ctx.data().get_str("path"), Some("/search"));
    }

    #[test]
    fn test_set_view_normalizes() {
        let controllers = registry();
        let request = Request::default();
        let mut ctx = Context::new(&controllers, &request);
        ctx.set_view("Blog.Post");
        assert_eq!(ctx.view(), "blog_post");
    }

    #[test]
    fn test_view_data_json() {
        let mut data = ViewData::new();
        data.insert("title", "Hello");
        data.insert("count", 3);
        assert_eq!(data.to_json(), serde_json::json!({"title": "Hello", "count": 3}));
    }
}
