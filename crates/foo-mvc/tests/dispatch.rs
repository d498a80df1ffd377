//! Dispatching a small blog application end to end.

use foo_mvc::{Context, DispatchError, Dispatcher, DispatcherConfig, Result, ViewData};
use foo_router::RouteTable;

const ROUTES: &str = "\
; blog routes
= Index
blog/archive = Blog.Archive
blog/:slug = \"Blog.Post\"
admin/:section = Admin.:section
";

fn index(ctx: &mut Context<'_>) -> Result<()> {
    ctx.set_data("title", "Home");
    Ok(())
}

fn archive(ctx: &mut Context<'_>) -> Result<()> {
    ctx.set_data("title", "Archive");
    ctx.forward("Blog.Sidebar", true)
}

fn sidebar(ctx: &mut Context<'_>) -> Result<()> {
    ctx.set_data("sidebar", "recent posts");
    Ok(())
}

fn post(ctx: &mut Context<'_>) -> Result<()> {
    let slug = ctx.param("slug").unwrap_or_default().to_string();
    if slug == "draft" {
        return ctx.forward("Index", false);
    }
    ctx.set_data("title", slug);
    Ok(())
}

fn admin_users(ctx: &mut Context<'_>) -> Result<()> {
    ctx.set_data("title", "Users");
    ctx.set_view("Blog.Post");
    Ok(())
}

fn page(data: &ViewData) -> Result<String> {
    let mut body = format!("<h1>{}</h1>", data.get_str("title").unwrap_or_default());
    if let Some(sidebar) = data.get_str("sidebar") {
        body.push_str(&format!("<aside>{sidebar}</aside>"));
    }
    Ok(body)
}

fn broken(_data: &ViewData) -> Result<String> {
    Err(DispatchError::view("template missing"))
}

fn blog(config: DispatcherConfig) -> Dispatcher {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("routes.ini");
    std::fs::write(&path, ROUTES).unwrap();

    Dispatcher::builder()
        .routes(RouteTable::from_file(&path).unwrap())
        .config(config)
        .controller("Index", index)
        .controller("Blog.Archive", archive)
        .controller("Blog.Sidebar", sidebar)
        .controller("Blog.Post", post)
        .controller("Admin.Users", admin_users)
        .controller("Admin.Broken", index)
        .controller("contact", index)
        .view("Index", page)
        .view("Blog.Archive", page)
        .view("Blog.Post", page)
        .view("Admin.Broken", broken)
        .build()
        .unwrap()
}

fn body(d: &Dispatcher, uri: &str) -> String {
    let res = d.dispatch(uri);
    assert_eq!(res.status, 200, "status for {uri}");
    res.body_string().unwrap()
}

#[test]
fn default_route() {
    let d = blog(DispatcherConfig::default());
    assert_eq!(body(&d, "/"), "<h1>Home</h1>");
    assert_eq!(body(&d, ""), "<h1>Home</h1>");
}

#[test]
fn literal_route_beats_variable() {
    let d = blog(DispatcherConfig::default());
    assert_eq!(
        body(&d, "/blog/archive"),
        "<h1>Archive</h1><aside>recent posts</aside>"
    );
    assert_eq!(body(&d, "/blog/hello-world"), "<h1>hello-world</h1>");
}

#[test]
fn forward_without_resume_switches_view() {
    let d = blog(DispatcherConfig::default());
    assert_eq!(body(&d, "/blog/draft"), "<h1>Home</h1>");
}

#[test]
fn templated_controller_and_view_override() {
    let d = blog(DispatcherConfig::default());
    assert_eq!(body(&d, "/admin/users"), "<h1>Users</h1>");
    assert_eq!(d.dispatch("/admin/settings").status, 404);
}

#[test]
fn view_errors_are_500() {
    let d = blog(DispatcherConfig::default());
    assert!(matches!(
        d.try_dispatch("/admin/broken"),
        Err(DispatchError::View(_))
    ));
    assert_eq!(d.dispatch("/admin/broken").status, 500);
}

#[test]
fn missing_view_is_404() {
    let d = blog(DispatcherConfig::default());
    assert!(matches!(
        d.try_dispatch("/contact"),
        Err(DispatchError::ViewNotRegistered(name)) if name == "contact"
    ));
}

#[test]
fn path_fallback_and_base_url() {
    let d = blog(DispatcherConfig::default().base_url("/foo-mvc"));
    let (controller, _) = d.route("/foo-mvc/Contact").unwrap();
    assert_eq!(controller, "contact");
    assert_eq!(body(&d, "/foo-mvc/blog/archive?page=2"), "<h1>Archive</h1><aside>recent posts</aside>");
    assert_eq!(d.dispatch("/blog/archive").status, 404);
}

#[test]
fn concurrent_dispatch() {
    let d = blog(DispatcherConfig::default());
    std::thread::scope(|s| {
        for t in 0..4 {
            let d = &d;
            s.spawn(move || {
                for i in 0..200 {
                    let slug = format!("post-{t}-{i}");
                    assert_eq!(body(d, &format!("/blog/{slug}")), format!("<h1>{slug}</h1>"));
                    assert_eq!(body(d, "/"), "<h1>Home</h1>");
                }
            });
        }
    });
}
