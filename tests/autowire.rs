/// Auto-wiring tests
///
/// Constructor injection of unbound concrete types: transitive resolution,
/// defaults, unresolvable parameters and the not-instantiable cases.

use ferrous_ioc::{
    Arguments, Container, ContainerOptions, DiError, DiResult, Injectable, Key, Parameter, Producer,
};
use std::sync::{Arc, Mutex};

// ===== Test Services =====

trait NotifyUser: Send + Sync {
    fn channel(&self) -> &'static str;
}

struct TextMessageNotification;

impl NotifyUser for TextMessageNotification {
    fn channel(&self) -> &'static str {
        "sms"
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

#[derive(Debug)]
struct Template;

impl Injectable for Template {
    fn parameters() -> Vec<Parameter> {
        Vec::new()
    }

    fn construct(_args: &mut Arguments) -> DiResult<Self> {
        Ok(Template)
    }
}

struct Controller {
    template: Arc<Template>,
    notifier: Arc<dyn NotifyUser>,
}

impl Injectable for Controller {
    fn parameters() -> Vec<Parameter> {
        vec![
            Parameter::service::<Template>("template"),
            Parameter::interface::<dyn NotifyUser>("notifier"),
        ]
    }

    fn construct(args: &mut Arguments) -> DiResult<Self> {
        Ok(Controller {
            template: args.next()?,
            notifier: args.next_trait()?,
        })
    }
}

#[derive(Debug)]
struct Paginator {
    per_page: usize,
}

impl Injectable for Paginator {
    fn parameters() -> Vec<Parameter> {
        vec![Parameter::value("per_page")]
    }

    fn construct(args: &mut Arguments) -> DiResult<Self> {
        Ok(Paginator { per_page: args.next_value()? })
    }
}

struct Report {
    title: String,
    paginator: Option<Arc<Paginator>>,
}

impl Injectable for Report {
    fn parameters() -> Vec<Parameter> {
        vec![
            Parameter::value("title").with_default(String::from("Untitled")),
            Parameter::optional::<Paginator>("paginator"),
        ]
    }

    fn construct(args: &mut Arguments) -> DiResult<Self> {
        Ok(Report {
            title: args.next_value()?,
            paginator: args.next_optional()?,
        })
    }
}

struct Ledger;
struct Audit;

struct Checkout {
    ledger: Arc<Ledger>,
    _audit: Arc<Audit>,
}

impl Injectable for Checkout {
    fn parameters() -> Vec<Parameter> {
        vec![Parameter::bound::<Ledger>("ledger"), Parameter::bound::<Audit>("audit")]
    }

    fn construct(args: &mut Arguments) -> DiResult<Self> {
        Ok(Checkout {
            ledger: args.next()?,
            _audit: args.next()?,
        })
    }
}

struct Unregistered;

// ===== Tests =====

#[test]
fn test_transitive_autowiring_through_bound_interface() {
    let container = Container::new();
    container.bind_trait::<dyn NotifyUser>(Producer::implementation::<
        dyn NotifyUser,
        TextMessageNotification,
        _,
    >(|t| t));

    let controller = container.make_type::<Controller>().unwrap();
    assert_eq!(controller.notifier.channel(), "sms");

    // Auto-wired types are transient.
    let again = container.make_type::<Controller>().unwrap();
    assert!(!Arc::ptr_eq(&controller, &again));
    assert!(!Arc::ptr_eq(&controller.template, &again.template));
}

#[test]
fn test_unbound_interface_parameter_is_not_instantiable() {
    let container = Container::new();

    match container.make_type::<Controller>() {
        Err(DiError::NotInstantiable { target, reason }) => {
            assert!(target.contains("NotifyUser"), "{target}");
            assert!(reason.contains("Controller"), "{reason}");
        }
        other => panic!("expected NotInstantiable, got {:?}", other.err()),
    }
}

#[test]
fn test_parameters_resolve_in_declaration_order() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let container = Container::new();

    let ledger_log = Arc::clone(&log);
    container.singleton(Key::of::<Ledger>(), Producer::factory(move |_| {
        ledger_log.lock().unwrap().push(String::from("ledger"));
        Ok(Ledger)
    }));
    let audit_log = Arc::clone(&log);
    container.bind(Key::of::<Audit>(), Producer::factory(move |c| {
        // The earlier sibling is fully built and cached by now.
        let ledger_cached = c.is_cached(Key::of::<Ledger>());
        audit_log.lock().unwrap().push(format!("audit, ledger cached: {ledger_cached}"));
        Ok(Audit)
    }));

    let checkout = container.make_type::<Checkout>().unwrap();
    assert_eq!(*log.lock().unwrap(), ["ledger", "audit, ledger cached: true"]);
    assert!(Arc::ptr_eq(&checkout.ledger, &container.make_as::<Ledger>(Key::of::<Ledger>()).unwrap()));
}

#[test]
fn test_primitive_without_default_is_unresolvable() {
    let container = Container::new();

    let err = container.make_type::<Paginator>().unwrap_err();
    assert!(err.is_unresolvable());
    assert!(err.to_string().contains("per_page"), "{err}");
}

#[test]
fn test_defaults_fill_unresolvable_parameters() {
    let container = Container::new();
    let report = container.make_type::<Report>().unwrap();
    assert_eq!(report.title, "Untitled");
    assert!(report.paginator.is_none());

    container.bind(Key::of::<Paginator>(), Producer::factory(|_| Ok(Paginator { per_page: 15 })));
    let report = container.make_type::<Report>().unwrap();
    assert_eq!(report.paginator.as_ref().map(|p| p.per_page), Some(15));
}

#[test]
fn test_bare_interface_or_name_is_unresolvable() {
    let container = Container::new();

    assert!(container.make(Key::of_trait::<dyn NotifyUser>()).unwrap_err().is_unresolvable());
    assert!(container.make("template").unwrap_err().is_unresolvable());
}

#[test]
fn test_type_without_metadata_is_not_instantiable() {
    let container = Container::new();

    let err = container.make(Key::of::<Unregistered>()).unwrap_err();
    assert!(err.is_not_instantiable());
    assert!(err.to_string().contains("Unregistered"));
}

#[test]
fn test_concrete_binding_by_name() {
    let container = Container::new();
    container.bind("template", Producer::concrete::<Template>());

    assert!(container.make_as::<Template>("template").is_ok());
    assert!(!container.is_cached("template"));

    container.singleton("template", Producer::concrete::<Template>());
    container.make("template").unwrap();
    assert!(container.is_cached("template"));
    assert!(!container.is_cached(Key::of::<Template>()));
}

#[test]
fn test_alias_follows_binding_chain() {
    let container = Container::new();
    container.singleton_trait::<dyn NotifyUser>(Producer::implementation::<
        dyn NotifyUser,
        TextMessageNotification,
        _,
    >(|t| t));
    container.singleton("notifier", Producer::alias(Key::of_trait::<dyn NotifyUser>()));

    let through_alias = container.make_trait::<dyn NotifyUser>("notifier").unwrap();
    let direct = container.resolve_trait::<dyn NotifyUser>().unwrap();
    assert!(Arc::ptr_eq(&through_alias, &direct));
    assert!(container.is_cached("notifier"));
}

#[test]
fn test_alias_to_unbound_interface_is_not_instantiable() {
    let container = Container::new();
    container.bind("notifier", Producer::alias(Key::of_trait::<dyn NotifyUser>()));

    let err = container.make("notifier").unwrap_err();
    assert!(err.is_not_instantiable(), "{err}");
}

#[test]
fn test_alias_to_registered_type() {
    let container = Container::new();
    container.register::<Template>();
    container.bind("view", Producer::alias(Key::of::<Template>()));

    assert!(container.make_as::<Template>("view").is_ok());
    assert!(!container.has_binding(Key::of::<Template>()));
}

#[test]
fn test_autowiring_can_be_disabled() {
    let container = Container::with_options(ContainerOptions::default().with_auto_wiring(false));

    let err = container.make_type::<Template>().unwrap_err();
    assert!(err.is_unresolvable());

    // Explicit concrete bindings still construct.
    container.bind(Key::of::<Template>(), Producer::concrete::<Template>());
    assert!(container.make_type::<Template>().is_ok());
}

#[test]
fn test_describe_reports_constructor() {
    let container = Container::new();
    assert!(container.describe(Key::of::<Controller>()).unwrap_err().is_not_instantiable());

    container.register::<Controller>();
    let descriptor = container.describe(Key::of::<Controller>()).unwrap();
    let names: Vec<_> = descriptor.parameters().iter().map(|p| p.name()).collect();
    assert_eq!(names, ["template", "notifier"]);
    assert_eq!(
        descriptor.parameters()[1].declared_key(),
        Some(&Key::of_trait::<dyn NotifyUser>())
    );
    assert!(container.describe(Key::of_trait::<dyn NotifyUser>()).unwrap_err().is_not_instantiable());
}

#[test]
fn test_construction_error_propagates() {
    #[derive(Debug)]
    struct Flaky;

    impl Injectable for Flaky {
        fn parameters() -> Vec<Parameter> {
            Vec::new()
        }

        fn construct(_args: &mut Arguments) -> DiResult<Self> {
            Err(DiError::construction(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "database offline",
            )))
        }
    }

    let container = Container::new();
    container.singleton(Key::of::<Flaky>(), Producer::concrete::<Flaky>());

    let err = container.make_type::<Flaky>().unwrap_err();
    assert!(matches!(err, DiError::Construction(_)));
    assert!(!container.is_cached(Key::of::<Flaky>()));
}
