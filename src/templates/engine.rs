use minijinja::{default_auto_escape_callback, Environment, Value};

pub trait TemplateEngine: Send + Sync {
    fn render(&self, template_name: &str, context: Value) -> Result<String, minijinja::Error>;
}

pub struct MiniJinjaEngine {
    env: Environment<'static>,
}

impl MiniJinjaEngine {
    /// Builds the environment with every embedded view; fails on a template syntax error
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(default_auto_escape_callback);

        for &(name, source) in EMBEDDED_TEMPLATES {
            env.add_template(name, source)?;
        }

        Ok(Self {
            env,
        })
    }
}

impl TemplateEngine for MiniJinjaEngine {
    fn render(&self, template_name: &str, context: Value) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template(template_name)?;
        tmpl.render(context)
    }
}

const EMBEDDED_TEMPLATES: &[(&str, &str)] = &[
    ("layout.html", include_str!("views/layout.html")),
    ("container.html", include_str!("views/container.html")),
    ("system/user/user.html", include_str!("views/system/user/user.html")),
    ("system/user/user_add.html", include_str!("views/system/user/user_add.html")),
    ("system/user/user_edit.html", include_str!("views/system/user/user_edit.html")),
    ("system/user/user_roleassign.html", include_str!("views/system/user/user_roleassign.html")),
];

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    #[test]
    fn test_all_views_compile() {
        let engine = MiniJinjaEngine::new().expect("embedded templates should parse");
        for &(name, _) in EMBEDDED_TEMPLATES {
            assert!(engine.env.get_template(name).is_ok(), "{name} missing");
        }
    }

    #[test]
    fn test_unknown_view_is_an_error() {
        let engine = MiniJinjaEngine::new().unwrap();
        assert!(engine.render("system/user/nope.html", context! {}).is_err());
    }

    #[test]
    fn test_container_escapes_user_input() {
        let engine = MiniJinjaEngine::new().unwrap();
        let html = engine
            .render(
                "container.html",
                context! { user => context! { name => "<script>x</script>", account => "root" }, roleName => "admin" },
            )
            .unwrap();

        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>x"));
        assert!(html.contains("admin"));
    }

    #[test]
    fn test_container_shows_error() {
        let engine = MiniJinjaEngine::new().unwrap();
        let html = engine.render("container.html", context! { error => "Not logged in" }).unwrap();

        assert!(html.contains("Not logged in"));
    }
}
