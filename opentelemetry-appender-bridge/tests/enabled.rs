#![cfg(feature = "spec_unstable_logs_enabled")]

use opentelemetry::logs::Severity;
use opentelemetry::InstrumentationScope;
use opentelemetry_appender_bridge::frameworks::{jul, log4j2};
use opentelemetry_appender_bridge::{AppenderBridge, BridgeConfig, Framework};
use opentelemetry_sdk::error::OTelSdkResult;
use opentelemetry_sdk::logs::{LogProcessor, SdkLogRecord, SdkLogger, SdkLoggerProvider};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug)]
enum Filter {
    AtLeast(Severity),
    Panic,
}

#[derive(Debug)]
struct CountingProcessor {
    filter: Filter,
    emitted: Arc<AtomicUsize>,
}

impl LogProcessor for CountingProcessor {
    fn emit(&self, _record: &mut SdkLogRecord, _scope: &InstrumentationScope) {
        self.emitted.fetch_add(1, Ordering::SeqCst);
    }

    fn force_flush(&self) -> OTelSdkResult {
        Ok(())
    }

    fn shutdown(&self) -> OTelSdkResult {
        Ok(())
    }

    fn event_enabled(&self, level: Severity, _target: &str, _name: Option<&str>) -> bool {
        match self.filter {
            Filter::AtLeast(threshold) => level >= threshold,
            Filter::Panic => panic!("filter misconfigured"),
        }
    }
}

fn setup(filter: Filter) -> (Arc<AtomicUsize>, AppenderBridge<SdkLoggerProvider, SdkLogger>) {
    let emitted = Arc::new(AtomicUsize::new(0));
    let provider = SdkLoggerProvider::builder()
        .with_log_processor(CountingProcessor {
            filter,
            emitted: Arc::clone(&emitted),
        })
        .build();
    let mut builder = AppenderBridge::builder(&provider);
    for framework in Framework::ALL {
        builder = builder.with_config(framework, BridgeConfig::default());
    }
    (emitted, builder.build())
}

#[test]
fn disabled_severities_are_not_emitted() {
    let (emitted, bridge) = setup(Filter::AtLeast(Severity::Warn));

    assert!(!bridge.capture(&jul::LogRecord::new(jul::levels::INFO, "routine")));
    assert!(!bridge.capture(&jul::LogRecord::new(jul::levels::FINE, "detail")));
    assert!(bridge.capture(&jul::LogRecord::new(jul::levels::WARNING, "disk full")));
    assert!(bridge.capture(&jul::LogRecord::new(jul::levels::SEVERE, "disk gone")));

    assert_eq!(emitted.load(Ordering::SeqCst), 2);
}

#[test]
fn events_without_severity_skip_the_check() {
    let (emitted, bridge) = setup(Filter::AtLeast(Severity::Fatal));
    let event = log4j2::LogEvent::new(
        "app",
        log4j2::levels::OFF,
        log4j2::Message::Formatted("no severity".into()),
    );

    assert!(bridge.capture(&event));
    assert_eq!(emitted.load(Ordering::SeqCst), 1);
}

#[test]
fn panicking_check_counts_as_disabled() {
    let (emitted, bridge) = setup(Filter::Panic);

    let captured = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        bridge.capture(&jul::LogRecord::new(jul::levels::SEVERE, "boom"))
    }));

    assert!(matches!(captured, Ok(false)));
    assert_eq!(emitted.load(Ordering::SeqCst), 0);
}
