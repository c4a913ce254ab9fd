/// Tests for override chains and the previous-definition accessor
///
/// These cover how later providers replace or build on the definitions of
/// earlier ones: overriding without consulting the previous definition,
/// passing the previous instance through, memoization of the previous call
/// and the typed decoration helpers.

use layered_di::{
    decorators::CountingDecorator, ContainerBuilder, Definitions, DiError, DiResult,
    ResolverContext,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

fn container_of(providers: Vec<Definitions>) -> layered_di::Container {
    let mut builder = ContainerBuilder::new();
    builder.add_providers(providers).unwrap();
    builder.build()
}

#[test]
fn test_passthrough_returns_same_instance() {
    struct Pool;

    let mut base = Definitions::new();
    base.value("pool", Pool);
    let mut passthrough = Definitions::new();
    passthrough.raw("pool", |_, previous| previous.get());

    let container = container_of(vec![base, passthrough]);
    let pool = container.get_as::<Pool>("pool").unwrap();

    // Passing the previous value through does not copy it
    assert!(Arc::ptr_eq(&pool, &container.get_as::<Pool>("pool").unwrap()));
}

#[test]
fn test_override_ignores_previous() {
    let previous_calls = Arc::new(AtomicUsize::new(0));
    let calls = previous_calls.clone();

    let mut base = Definitions::new();
    base.factory("db.url", move |_| {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok("postgres://prod".to_string())
    });
    let mut test_overrides = Definitions::new();
    test_overrides.value("db.url", "sqlite::memory:".to_string());

    let container = container_of(vec![base, test_overrides]);
    assert_eq!(*container.get_as::<String>("db.url").unwrap(), "sqlite::memory:");
    assert_eq!(previous_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_previous_is_memoized_within_one_resolution() {
    let previous_calls = Arc::new(AtomicUsize::new(0));
    let calls = previous_calls.clone();

    let mut base = Definitions::new();
    base.factory("counter", move |_| Ok(calls.fetch_add(1, Ordering::SeqCst)));

    let mut twice = Definitions::new();
    twice.extend("counter", |_, previous| {
        let first = previous.get_as::<usize>()?;
        let second = previous.get_as::<usize>()?;
        assert!(Arc::ptr_eq(&first, &second));
        Ok(*first + 100)
    });

    let container = container_of(vec![base, twice]);
    assert_eq!(*container.get_as::<usize>("counter").unwrap(), 100);
    assert_eq!(previous_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_previous_failure_is_replayed_not_retried() {
    let previous_calls = Arc::new(AtomicUsize::new(0));
    let calls = previous_calls.clone();

    let mut base = Definitions::new();
    base.factory("secret", move |_| -> DiResult<String> {
        calls.fetch_add(1, Ordering::SeqCst);
        Err(DiError::message("vault sealed"))
    });

    let mut fallback = Definitions::new();
    fallback.extend("secret", |_, previous| {
        let first = previous.get().unwrap_err();
        let second = previous.get().unwrap_err();
        assert_eq!(first.to_string(), second.to_string());
        Ok("fallback".to_string())
    });

    let container = container_of(vec![base, fallback]);
    assert_eq!(*container.get_as::<String>("secret").unwrap(), "fallback");
    assert_eq!(previous_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_previous_error_propagates_to_caller() {
    let mut base = Definitions::new();
    base.factory("secret", |_| -> DiResult<String> {
        Err(DiError::message("vault sealed"))
    });
    let mut wrapper = Definitions::new();
    wrapper.extend("secret", |_, previous| {
        let inner = previous.get_as::<String>()?;
        Ok(format!("wrapped({})", inner))
    });

    let container = container_of(vec![base, wrapper]);
    match container.get("secret") {
        Err(DiError::Factory(err)) => {
            assert_eq!(err.entry().map(|e| e.as_str()), Some("secret"));
            assert_eq!(err.inner().to_string(), "vault sealed");
        }
        other => panic!("expected factory error, got {:?}", other.map(|_| ())),
    }
    assert!(!container.is_resolved("secret"));
}

#[test]
fn test_first_definition_has_no_previous() {
    let mut only = Definitions::new();
    only.extend("name", |_, previous| {
        assert!(!previous.exists());
        assert_eq!(previous.entry(), &"name");
        let err = previous.get().unwrap_err();
        assert!(matches!(err, DiError::NoPrevious(_)));
        assert!(err.is_not_found());
        Ok("fresh".to_string())
    });

    let container = container_of(vec![only]);
    assert_eq!(*container.get_as::<String>("name").unwrap(), "fresh");
}

#[test]
fn test_unused_previous_is_not_an_error() {
    let mut only = Definitions::new();
    only.raw("x", |_, _previous| Ok(Arc::new(1i32) as layered_di::AnyArc));

    let container = container_of(vec![only]);
    assert_eq!(*container.get_as::<i32>("x").unwrap(), 1);
}

#[test]
fn test_three_level_chain_with_dependencies() {
    let mut config = Definitions::named("config");
    config.value("prefix", "app".to_string());
    config.factory("name", |ctx| Ok(ctx.get_as::<String>("prefix")?.to_string()));

    let mut env = Definitions::named("env");
    env.extend("name", |_, previous| {
        Ok(format!("{}-staging", previous.get_as::<String>()?))
    });

    let mut region = Definitions::named("region");
    region.extend("name", |ctx, previous| {
        let base = previous.get_as::<String>()?;
        assert!(ctx.has("prefix"));
        Ok(format!("{}-eu", base))
    });

    let container = container_of(vec![config, env, region]);
    assert_eq!(*container.get_as::<String>("name").unwrap(), "app-staging-eu");
}

#[test]
fn test_decorate_wraps_previous() {
    struct Counter {
        hits: Mutex<u32>,
    }

    let mut base = Definitions::new();
    base.value("counter", Counter { hits: Mutex::new(0) });

    let mut bump = Definitions::new();
    bump.decorate::<Counter, _>(
        "counter",
        |counter: Arc<Counter>, _: &ResolverContext<'_>| -> DiResult<Arc<Counter>> {
            *counter.hits.lock().unwrap() += 1;
            Ok(counter)
        },
    );

    let container = container_of(vec![base, bump]);
    let counter = container.get_as::<Counter>("counter").unwrap();
    assert_eq!(*counter.hits.lock().unwrap(), 1);
}

#[test]
fn test_decorate_without_previous_fails() {
    let decorator = CountingDecorator::new();
    let mut lonely = Definitions::new();
    lonely.decorate::<u32, _>("n", decorator.clone());

    let container = container_of(vec![lonely]);
    match container.get("n") {
        Err(DiError::NoPrevious(id)) => assert_eq!(id, "n"),
        other => panic!("expected NoPrevious, got {:?}", other.map(|_| ())),
    }
    assert_eq!(decorator.count(), 0);
}

#[test]
fn test_decorate_with_wrong_type_fails() {
    let mut base = Definitions::new();
    base.value("n", 1u8);
    let mut wrong = Definitions::new();
    wrong.decorate::<u64, _>("n", CountingDecorator::new());

    let container = container_of(vec![base, wrong]);
    match container.get("n") {
        Err(DiError::TypeMismatch { entry, .. }) => assert_eq!(entry, "n"),
        other => panic!("expected TypeMismatch, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_extend_list_appends_across_providers() {
    let mut core = Definitions::named("core");
    core.extend_list("routes", vec!["/health".to_string()]);
    let mut admin = Definitions::named("admin");
    admin.extend_list("routes", vec!["/admin".to_string(), "/admin/users".to_string()]);
    let mut api = Definitions::named("api");
    api.extend_list("routes", vec!["/api".to_string()]);

    let container = container_of(vec![core, admin, api]);
    let routes = container.get_as::<Vec<String>>("routes").unwrap();
    assert_eq!(*routes, vec!["/health", "/admin", "/admin/users", "/api"]);
}

#[test]
fn test_extend_list_over_plain_value() {
    let mut base = Definitions::new();
    base.value("tags", vec![1u32, 2]);
    let mut more = Definitions::new();
    more.extend_list("tags", vec![3u32]);

    let container = container_of(vec![base, more]);
    assert_eq!(*container.get_as::<Vec<u32>>("tags").unwrap(), vec![1, 2, 3]);
}
