use layered_di::{
    ContainerBuilder, Definitions, DiError, DiObserver, DiResult, EntryId, TracingObserver,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<String>>,
}

impl Recorder {
    fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }
}

impl DiObserver for Recorder {
    fn resolving(&self, entry: &EntryId) {
        self.events.lock().unwrap().push(format!("start {}", entry));
    }

    fn resolved(&self, entry: &EntryId, _duration: Duration) {
        self.events.lock().unwrap().push(format!("done {}", entry));
    }

    fn resolution_failed(&self, entry: &EntryId, error: &DiError) {
        let kind = match error {
            DiError::CycleDetected(_) => "cycle",
            DiError::NotFound(_) => "missing",
            _ => "other",
        };
        self.events.lock().unwrap().push(format!("fail {} ({})", entry, kind));
    }
}

#[test]
fn test_nested_events_follow_call_tree() {
    let recorder = Arc::new(Recorder::default());

    let mut defs = Definitions::new();
    defs.value("config", 1u8);
    defs.factory("service", |ctx| Ok(*ctx.get_as::<u8>("config")?));

    let mut builder = ContainerBuilder::new();
    builder.add_observer(recorder.clone());
    builder.add_provider(defs).unwrap();
    let container = builder.build();

    container.get("service").unwrap();
    assert_eq!(
        recorder.take(),
        vec!["start service", "start config", "done config", "done service"]
    );

    // Cache hits are silent
    container.get("service").unwrap();
    container.get("config").unwrap();
    assert!(recorder.take().is_empty());
}

#[test]
fn test_failures_are_reported_and_returned() {
    let recorder = Arc::new(Recorder::default());

    let mut defs = Definitions::new();
    defs.factory("needs_missing", |ctx| ctx.get("missing").map(|_| ()));
    defs.factory("a", |ctx| ctx.get("b").map(|_| ()));
    defs.factory("b", |ctx| ctx.get("a").map(|_| ()));
    defs.factory("bad", |_| -> DiResult<()> { Err(DiError::message("boom")) });

    let mut builder = ContainerBuilder::new();
    builder.add_observer(recorder.clone());
    builder.add_provider(defs).unwrap();
    let container = builder.build();

    assert!(container.get("needs_missing").unwrap_err().is_not_found());
    assert_eq!(
        recorder.take(),
        vec!["start needs_missing", "fail needs_missing (missing)"]
    );

    assert!(container.get("a").unwrap_err().cycle_path().is_some());
    assert_eq!(
        recorder.take(),
        vec!["start a", "start b", "fail b (cycle)", "fail a (cycle)"]
    );

    assert!(container.get("bad").is_err());
    assert_eq!(recorder.take(), vec!["start bad", "fail bad (other)"]);

    // Unregistered entries never reach the factory chain
    assert!(container.get("nope").is_err());
    assert!(recorder.take().is_empty());
}

#[test]
fn test_tracing_observer_with_subscriber() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("layered_di=trace"))
        .with_test_writer()
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let observer = TracingObserver::with_label("startup");
        assert_eq!(observer.label(), "startup");

        let mut base = Definitions::named("base");
        base.value("greeting", "hello".to_string());
        let mut loud = Definitions::named("loud");
        loud.extend("greeting", |_, previous| {
            Ok(previous.get_as::<String>()?.to_uppercase())
        });

        let mut builder = ContainerBuilder::new();
        builder.add_observer(Arc::new(observer));
        builder.add_providers(vec![base, loud]).unwrap();
        let container = builder.build();

        assert_eq!(*container.get_as::<String>("greeting").unwrap(), "HELLO");
        assert!(container.get("missing").is_err());
    });
}
