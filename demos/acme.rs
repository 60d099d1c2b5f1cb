//! The Acme demo: a handful of mock services wired through the container
//! and a small route table that resolves them per request.
//!
//! ```text
//! cargo run --example acme            # every route
//! cargo run --example acme /articles  # one route
//! RUST_LOG=ferrous_ioc=trace cargo run --example acme
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ferrous_ioc::{
    Arguments, Container, DiError, DiResult, Injectable, Key, Parameter, Producer, TracingObserver,
};
use tracing_subscriber::EnvFilter;

// ===== Acme services =====

struct Template;

impl Template {
    fn render(&self, view: &str) -> String {
        format!("<html><body>Rendered view: {view}</body></html>")
    }
}

impl Injectable for Template {
    fn parameters() -> Vec<Parameter> {
        Vec::new()
    }

    fn construct(_args: &mut Arguments) -> DiResult<Self> {
        Ok(Template)
    }
}

struct Email {
    to: String,
    subject: String,
    body: String,
}

struct Mailer {
    username: String,
    password: String,
    from: String,
}

impl Mailer {
    fn send(&self, email: &Email) -> bool {
        tracing::info!(
            from = %self.from,
            to = %email.to,
            subject = %email.subject,
            bytes = email.body.len(),
            "sending email"
        );
        !self.username.is_empty() && !self.password.is_empty()
    }
}

struct Article {
    title: &'static str,
}

struct Database {
    username: String,
    host: String,
    name: String,
    queries: AtomicUsize,
}

impl Database {
    fn new(username: &str, _password: &str, host: &str, name: &str) -> Self {
        Database {
            username: username.to_string(),
            host: host.to_string(),
            name: name.to_string(),
            queries: AtomicUsize::new(0),
        }
    }

    fn select(&self, query: &str) -> Vec<Article> {
        let count = self.queries.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(
            user = %self.username,
            host = %self.host,
            database = %self.name,
            query,
            count,
            "select"
        );
        let mut articles = vec![
            Article { title: "Using an IoC container" },
            Article { title: "Automatic resolution" },
            Article { title: "Binding interfaces" },
        ];
        articles.sort_by_key(|article| article.title);
        articles
    }
}

struct Authentication;

impl Authentication {
    fn verify_login(&self, username: &str, password: &str) -> bool {
        username == "username" && password == "password"
    }
}

trait NotifyUser: Send + Sync {
    fn send_notification(&self, message: &str) -> String;
}

struct TextMessageNotification;

impl NotifyUser for TextMessageNotification {
    fn send_notification(&self, message: &str) -> String {
        format!("SMS: {message}")
    }
}

impl Injectable for TextMessageNotification {
    fn parameters() -> Vec<Parameter> {
        Vec::new()
    }

    fn construct(_args: &mut Arguments) -> DiResult<Self> {
        Ok(TextMessageNotification)
    }
}

/// Never bound: built entirely by auto-wiring.
struct Controller {
    template: Arc<Template>,
    database: Arc<Database>,
    notifier: Arc<dyn NotifyUser>,
}

impl Controller {
    fn home(&self) -> String {
        let articles = self.database.select("SELECT * FROM articles");
        let page = self.template.render(&format!("home ({} articles)", articles.len()));
        self.notifier.send_notification("home page rendered");
        page
    }
}

impl Injectable for Controller {
    fn parameters() -> Vec<Parameter> {
        vec![
            Parameter::service::<Template>("template"),
            Parameter::key("database", "database"),
            Parameter::interface::<dyn NotifyUser>("notifier"),
        ]
    }

    fn construct(args: &mut Arguments) -> DiResult<Self> {
        Ok(Controller {
            template: args.next()?,
            database: args.next()?,
            notifier: args.next_trait()?,
        })
    }
}

// ===== Bootstrap =====

fn bootstrap() -> Container {
    let container = Container::new();
    container.add_observer(Arc::new(TracingObserver));

    container.bind("template", Producer::concrete::<Template>());

    container.bind(
        "mailer",
        Producer::factory(|_| {
            Ok(Mailer {
                username: "username".to_string(),
                password: "password".to_string(),
                from: "foo@bar.com".to_string(),
            })
        }),
    );

    container.singleton(
        "database",
        Producer::factory(|_| Ok(Database::new("username", "password", "host", "database"))),
    );

    container.instance("auth", Authentication);

    container.bind_trait::<dyn NotifyUser>(Producer::implementation::<
        dyn NotifyUser,
        TextMessageNotification,
        _,
    >(|notification| notification));

    container
}

// ===== Routes =====

type Handler = fn(&Container) -> DiResult<String>;

const ROUTES: &[(&str, Handler)] = &[
    ("/", home),
    ("/send-email", send_email),
    ("/login", login),
    ("/articles", articles),
    ("/automatic-resolution", automatic_resolution),
    ("/interface-to-implementation", interface_to_implementation),
];

fn home(container: &Container) -> DiResult<String> {
    let template = container.make_as::<Template>("template")?;
    Ok(template.render("home"))
}

fn send_email(container: &Container) -> DiResult<String> {
    let mailer = container.make_as::<Mailer>("mailer")?;
    let email = Email {
        to: "foo@bar.com".to_string(),
        subject: "Test email".to_string(),
        body: "This is a test email.".to_string(),
    };

    Ok(if mailer.send(&email) {
        "Email successfully sent!".to_string()
    } else {
        "Email could not be sent.".to_string()
    })
}

fn login(container: &Container) -> DiResult<String> {
    let auth = container.make_as::<Authentication>("auth")?;

    Ok(if auth.verify_login("username", "password") {
        "User successfully logged in!".to_string()
    } else {
        "Invalid credentials.".to_string()
    })
}

fn articles(container: &Container) -> DiResult<String> {
    let database = container.make_as::<Database>("database")?;

    let links: Vec<String> = database
        .select("SELECT * FROM articles ORDER BY title")
        .iter()
        .map(|article| format!("<a href=\"#\">{}</a><br>", article.title))
        .collect();
    Ok(links.join("\n"))
}

fn automatic_resolution(container: &Container) -> DiResult<String> {
    let controller = container.make_type::<Controller>()?;
    Ok(controller.home())
}

fn interface_to_implementation(container: &Container) -> DiResult<String> {
    let notification = container.make_trait::<dyn NotifyUser>(Key::of_trait::<dyn NotifyUser>())?;
    Ok(notification.send_notification("Somebody hit the url!"))
}

fn dispatch(container: &Container, path: &str) -> DiResult<String> {
    let (_, handler) = ROUTES
        .iter()
        .find(|(route, _)| *route == path)
        .ok_or_else(|| DiError::construction(format!("no route for {path}")))?;
    handler(container)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let container = bootstrap();
    let report = container.validate();
    for warning in &report.warnings {
        tracing::warn!(%warning, "configuration warning");
    }
    if let Err(errors) = report.into_result().map(drop) {
        for error in &errors {
            tracing::error!(%error, "invalid configuration");
        }
        return Err(format!("{} configuration errors", errors.len()).into());
    }

    let requested: Vec<String> = std::env::args().skip(1).collect();
    let paths: Vec<&str> = if requested.is_empty() {
        ROUTES.iter().map(|(route, _)| *route).collect()
    } else {
        requested.iter().map(String::as_str).collect()
    };

    for path in paths {
        println!("GET {path}");
        println!("{}\n", dispatch(&container, path)?);
    }
    Ok(())
}
