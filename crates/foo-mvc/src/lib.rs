//! # foo-mvc
//!
//! A lightweight MVC dispatcher.
//!
//! A request path is resolved against a compiled [`foo_router::RouteTree`] to
//! a controller name. The controller runs, optionally forwarding to other
//! controllers, and collects data for a view. The selected view then renders
//! the response body.
//!
//! ## Quick Start
//!
//! ```
//! use foo_mvc::{Context, Dispatcher, Result, ViewData};
//! use foo_router::RouteTable;
//!
//! fn index(ctx: &mut Context<'_>) -> Result<()> {
//!     ctx.set_data("title", "Welcome");
//!     Ok(())
//! }
//!
//! fn index_view(data: &ViewData) -> Result<String> {
//!     Ok(format!("<h1>{}</h1>", data.get_str("title").unwrap_or_default()))
//! }
//!
//! let dispatcher = Dispatcher::builder()
//!     .routes(RouteTable::new().route("", "Index"))
//!     .controller("Index", index)
//!     .view("Index", index_view)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(dispatcher.dispatch("/").status, 200);
//! assert_eq!(dispatcher.dispatch("/missing").status, 404);
//! ```
//!
//! ## Naming
//!
//! Controller and view names are case-insensitive and `.` is equivalent to
//! `_`, so a route target `Blog.Post` runs the controller registered as
//! `blog_post` and, by default, renders the view of the same name. When no
//! route matches, the path tokens joined with `_` name the controller
//! (`/about/team` runs `about_team`), unless the fallback is disabled in
//! [`DispatcherConfig`].

mod controller;
mod dispatcher;
mod error;
mod request;
mod response;

pub use controller::{normalize_name, Context, Controller, View, ViewData};
pub use dispatcher::{Dispatcher, DispatcherBuilder, DispatcherConfig};
pub use error::{DispatchError, Result};
pub use request::Request;
pub use response::Response;
