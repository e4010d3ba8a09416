use latchkey::{
    argument, Container, ContainerError, ContainerHandle, DescriptorTable, ParameterSpec,
    ResolutionError, TypeDescriptor,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[test]
fn no_argument_type_autowires_and_caches() {
    struct Widget;

    let mut types = DescriptorTable::new();
    types.declare("Widget", TypeDescriptor::new(|_| Widget));

    let container = Container::with_introspector(types);
    assert!(container.has("Widget"));

    let first = container.get("Widget").unwrap();
    let second = container.get("Widget").unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn single_declared_type_resolves_by_name() {
    struct Database {
        url: String,
    }
    struct Repository {
        db: Arc<Database>,
    }

    let mut types = DescriptorTable::new();
    types.declare(
        "Repository",
        TypeDescriptor::new(|args| Repository {
            db: argument::<Database>(args, 0).expect("db"),
        })
        .param(ParameterSpec::service("db", "Database")),
    );

    let container = Container::with_introspector(types);
    container.set_value(
        "Database",
        Database {
            url: "pg://localhost".to_string(),
        },
    );

    let repo = container.get_as::<Repository>("Repository").unwrap();
    assert_eq!(repo.db.url, "pg://localhost");
}

#[test]
fn union_of_types_is_first_match_in_declared_order() {
    struct Logger {
        name: String,
    }
    struct Service {
        logger: Arc<Logger>,
    }

    let descriptor = || {
        TypeDescriptor::new(|args| Service {
            logger: argument::<Logger>(args, 0).expect("logger"),
        })
        .param(ParameterSpec::service("logger", "FileLogger").or_type("ConsoleLogger"))
    };

    // Only the second candidate exists: it wins by fallback.
    let mut types = DescriptorTable::new();
    types.declare("Service", descriptor());
    let container = Container::with_introspector(types);
    container.set_value("ConsoleLogger", Logger { name: "console".into() });
    let service = container.get_as::<Service>("Service").unwrap();
    assert_eq!(service.logger.name, "console");

    // Both exist: declaration order decides, not registration order.
    let mut types = DescriptorTable::new();
    types.declare("Service", descriptor());
    let container = Container::with_introspector(types);
    container.set_value("ConsoleLogger", Logger { name: "console".into() });
    container.set_value("FileLogger", Logger { name: "file".into() });
    let service = container.get_as::<Service>("Service").unwrap();
    assert_eq!(service.logger.name, "file");
}

#[test]
fn explicit_injection_bypasses_type_inference() {
    struct Database {
        url: String,
    }
    struct Reporting {
        db: Arc<Database>,
    }

    let mut types = DescriptorTable::new();
    types.declare(
        "Reporting",
        TypeDescriptor::new(|args| Reporting {
            db: argument::<Database>(args, 0).expect("db"),
        })
        .param(ParameterSpec::service("db", "Database").inject("db.replica")),
    );

    let container = Container::with_introspector(types);
    container.set_value("Database", Database { url: "primary".into() });
    container.set_value("db.replica", Database { url: "replica".into() });

    let reporting = container.get_as::<Reporting>("Reporting").unwrap();
    assert_eq!(reporting.db.url, "replica");
}

#[test]
fn default_value_applies_when_nothing_resolves() {
    struct Client {
        retries: u32,
    }

    let mut types = DescriptorTable::new();
    types.declare(
        "Client",
        TypeDescriptor::new(|args| Client {
            retries: *argument::<u32>(args, 0).expect("retries"),
        })
        .param(ParameterSpec::value("retries").default_to(3u32)),
    );

    let container = Container::with_introspector(types);
    let client = container.get_as::<Client>("Client").unwrap();
    assert_eq!(client.retries, 3);
}

#[test]
fn null_default_and_nullable_produce_absent_arguments() {
    struct Options {
        profile: Option<Arc<String>>,
        trace: Option<Arc<String>>,
    }

    let mut types = DescriptorTable::new();
    types.declare(
        "Options",
        TypeDescriptor::new(|args| Options {
            profile: argument::<String>(args, 0),
            trace: argument::<String>(args, 1),
        })
        .param(ParameterSpec::service("profile", "Profile").default_null())
        .param(ParameterSpec::service("trace", "Tracer").nullable()),
    );

    let container = Container::with_introspector(types);
    let options = container.get_as::<Options>("Options").unwrap();
    assert!(options.profile.is_none());
    assert!(options.trace.is_none());
}

#[test]
fn declared_default_beats_nullability() {
    struct Limits {
        max: u32,
    }

    let mut types = DescriptorTable::new();
    types.declare(
        "Limits",
        TypeDescriptor::new(|args| Limits {
            max: argument::<u32>(args, 0).map(|v| *v).unwrap_or(0),
        })
        .param(ParameterSpec::value("max").default_to(100u32).nullable()),
    );

    let container = Container::with_introspector(types);
    let limits = container.get_as::<Limits>("Limits").unwrap();
    assert_eq!(limits.max, 100);
}

#[test]
fn unresolvable_parameter_names_parameter_and_owner() {
    struct Gadget;

    let mut types = DescriptorTable::new();
    types.declare(
        "Gadget",
        TypeDescriptor::new(|_| Gadget).param(ParameterSpec::service("db", "Database")),
    );

    let container = Container::with_introspector(types);
    match container.get("Gadget") {
        Err(ContainerError::Resolution(ResolutionError::Parameter { name, declared, owner })) => {
            assert_eq!(name, "db");
            assert_eq!(declared, "Database");
            assert_eq!(owner, "Gadget");
        }
        other => panic!("expected Parameter error, got {:?}", other.err()),
    }

    let message = container.get("Gadget").unwrap_err().to_string();
    assert_eq!(
        message,
        "cannot resolve constructor parameter 'db' (Database) for Gadget"
    );
}

#[test]
fn self_type_parameter_receives_the_container_handle() {
    struct Locator {
        handle: Arc<ContainerHandle>,
    }

    let mut types = DescriptorTable::new();
    types.declare(
        "Locator",
        TypeDescriptor::new(|args| Locator {
            handle: argument::<ContainerHandle>(args, 0).expect("handle"),
        })
        .param(ParameterSpec::service("container", Container::SELF_ID)),
    );

    let container = Container::with_introspector(types);
    container.set_value("marker", 9i64);

    let locator = container.get_as::<Locator>("Locator").unwrap();
    let revived = locator.handle.upgrade().expect("container alive");
    assert_eq!(*revived.get_as::<i64>("marker").unwrap(), 9);
}

#[test]
fn declared_transient_lifecycle_is_honored() {
    static NEXT: AtomicU64 = AtomicU64::new(1);

    struct Ctx {
        id: u64,
    }

    let mut types = DescriptorTable::new();
    types.declare(
        "Ctx",
        TypeDescriptor::new(|_| Ctx {
            id: NEXT.fetch_add(1, Ordering::SeqCst),
        })
        .transient(),
    );

    let container = Container::with_introspector(types);
    let a = container.get_as::<Ctx>("Ctx").unwrap();
    let b = container.get_as::<Ctx>("Ctx").unwrap();
    assert_ne!(a.id, b.id);
}

#[test]
fn fallible_constructors_surface_factory_errors() {
    use latchkey::DiResult;

    struct Flaky;

    let mut types = DescriptorTable::new();
    types.declare(
        "Flaky",
        TypeDescriptor::new_fallible(|_| -> DiResult<Flaky> {
            Err(ResolutionError::Factory {
                id: "Flaky".to_string(),
                message: "init failed".to_string(),
            }
            .into())
        }),
    );

    let container = Container::with_introspector(types);
    let err = container.get("Flaky").unwrap_err();
    assert!(err.to_string().contains("init failed"));

    // The failed attempt cleared its frame mark: the retry reports the
    // same factory error, not a bogus cycle.
    let again = container.get("Flaky").unwrap_err();
    assert!(again.to_string().contains("init failed"));
}

#[test]
fn explicit_definition_wins_over_autowiring() {
    struct Widget {
        source: &'static str,
    }

    let mut types = DescriptorTable::new();
    types.declare("Widget", TypeDescriptor::new(|_| Widget { source: "autowired" }));

    let container = Container::with_introspector(types);
    container.set_factory("Widget", |_| Widget { source: "factory" });

    let widget = container.get_as::<Widget>("Widget").unwrap();
    assert_eq!(widget.source, "factory");
}

#[test]
fn transitive_autowiring_resolves_dependencies_of_dependencies() {
    struct Config;
    struct Database {
        #[allow(dead_code)]
        config: Arc<Config>,
    }
    struct App {
        #[allow(dead_code)]
        db: Arc<Database>,
    }

    let mut types = DescriptorTable::new();
    types.declare("Config", TypeDescriptor::new(|_| Config));
    types.declare(
        "Database",
        TypeDescriptor::new(|args| Database {
            config: argument::<Config>(args, 0).expect("config"),
        })
        .param(ParameterSpec::service("config", "Config")),
    );
    types.declare(
        "App",
        TypeDescriptor::new(|args| App {
            db: argument::<Database>(args, 0).expect("db"),
        })
        .param(ParameterSpec::service("db", "Database")),
    );

    let container = Container::with_introspector(types);
    assert!(container.get_as::<App>("App").is_ok());

    // Intermediate dependencies were cached as singletons along the way.
    let db_a = container.get("Database").unwrap();
    let db_b = container.get("Database").unwrap();
    assert!(Arc::ptr_eq(&db_a, &db_b));
}
