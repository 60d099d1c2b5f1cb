use ferrous_ioc::{Arguments, Container, ContainerOptions, DiError, DiResult, Injectable, Key, Parameter, Producer};
use std::sync::Arc;

struct A {
    _b: Arc<B>,
}

struct B {
    _a: Arc<A>,
}

impl Injectable for A {
    fn parameters() -> Vec<Parameter> {
        vec![Parameter::service::<B>("b")]
    }

    fn construct(args: &mut Arguments) -> DiResult<Self> {
        Ok(A { _b: args.next()? })
    }
}

impl Injectable for B {
    fn parameters() -> Vec<Parameter> {
        vec![Parameter::service::<A>("a")]
    }

    fn construct(args: &mut Arguments) -> DiResult<Self> {
        Ok(B { _a: args.next()? })
    }
}

fn short(name: &str) -> &str {
    name.rsplit("::").next().unwrap_or(name)
}

#[test]
fn test_constructor_cycle_is_detected() {
    let container = Container::new();

    match container.make_type::<A>() {
        Err(DiError::Circular(path)) => {
            let path: Vec<_> = path.iter().map(|segment| short(segment)).collect();
            assert_eq!(path, ["A", "B", "A"]);
        }
        other => panic!("expected Circular, got {:?}", other.err()),
    }

    // The stack unwinds on error; unrelated resolutions keep working.
    container.instance("ok", 1u8);
    assert!(container.make("ok").is_ok());
}

#[test]
fn test_factory_cycle_is_detected() {
    let container = Container::new();
    container.bind("a", Producer::factory(|c| c.make_as::<u8>("b").map(|v| *v)));
    container.bind("b", Producer::factory(|c| c.make_as::<u8>("c").map(|v| *v)));
    container.bind("c", Producer::factory(|c| c.make_as::<u8>("a").map(|v| *v)));

    let err = container.make("a").unwrap_err();
    assert!(err.is_circular());
    assert_eq!(err.to_string(), "Circular dependency: a -> b -> c -> a");
}

#[test]
fn test_cycle_path_starts_at_the_repeated_key() {
    let container = Container::new();
    container.bind("entry", Producer::factory(|c| c.make_as::<u8>("loop").map(|v| *v)));
    container.bind("loop", Producer::factory(|c| c.make_as::<u8>("loop").map(|v| *v)));

    match container.make("entry").unwrap_err() {
        DiError::Circular(path) => assert_eq!(path, ["loop", "loop"]),
        other => panic!("expected Circular, got {other}"),
    }
}

#[test]
fn test_self_alias_is_circular() {
    let container = Container::new();
    container.bind("x", Producer::alias("y"));
    container.bind("y", Producer::alias("x"));

    assert!(container.make("x").unwrap_err().is_circular());
}

#[test]
fn test_diamond_is_not_a_cycle() {
    struct Leaf;
    struct Left(Arc<Leaf>);
    struct Right(Arc<Leaf>);
    struct Top(Arc<Left>, Arc<Right>);

    impl Injectable for Leaf {
        fn parameters() -> Vec<Parameter> {
            Vec::new()
        }
        fn construct(_: &mut Arguments) -> DiResult<Self> {
            Ok(Leaf)
        }
    }
    impl Injectable for Left {
        fn parameters() -> Vec<Parameter> {
            vec![Parameter::service::<Leaf>("leaf")]
        }
        fn construct(args: &mut Arguments) -> DiResult<Self> {
            Ok(Left(args.next()?))
        }
    }
    impl Injectable for Right {
        fn parameters() -> Vec<Parameter> {
            vec![Parameter::service::<Leaf>("leaf")]
        }
        fn construct(args: &mut Arguments) -> DiResult<Self> {
            Ok(Right(args.next()?))
        }
    }
    impl Injectable for Top {
        fn parameters() -> Vec<Parameter> {
            vec![Parameter::service::<Left>("left"), Parameter::service::<Right>("right")]
        }
        fn construct(args: &mut Arguments) -> DiResult<Self> {
            Ok(Top(args.next()?, args.next()?))
        }
    }

    let container = Container::new();
    container.singleton(Key::of::<Leaf>(), Producer::concrete::<Leaf>());

    let top = container.make_type::<Top>().unwrap();
    assert!(Arc::ptr_eq(&(top.0).0, &(top.1).0));
}

#[test]
fn test_depth_limit() {
    let container = Container::with_options(ContainerOptions::default().with_max_depth(8));
    for i in 0..16u32 {
        let next = format!("level{}", i + 1);
        container.bind(format!("level{i}"), Producer::factory(move |c| {
            c.make_as::<u32>(next.clone()).map(|v| *v)
        }));
    }
    container.instance("level16", 16u32);

    match container.make("level0").unwrap_err() {
        DiError::DepthExceeded(depth) => assert_eq!(depth, 8),
        other => panic!("expected DepthExceeded, got {other}"),
    }

    let deep = Container::new();
    for i in 0..16u32 {
        let next = format!("level{}", i + 1);
        deep.bind(format!("level{i}"), Producer::factory(move |c| {
            c.make_as::<u32>(next.clone()).map(|v| *v)
        }));
    }
    deep.instance("level16", 16u32);
    assert_eq!(*deep.make_as::<u32>("level0").unwrap(), 16);
}
