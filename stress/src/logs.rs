/*
    Stress test results:
    The bridge maps a Logback event with one allow-listed MDC entry and hands
    it to a LoggerProvider whose only processor drops every record, so the
    numbers measure the mapping and emission overhead of the bridge itself.
*/

use opentelemetry::InstrumentationScope;
use opentelemetry_appender_bridge::frameworks::logback::{levels, LoggingEvent};
use opentelemetry_appender_bridge::{AppenderBridge, BridgeConfig, Framework};
use opentelemetry_sdk::error::OTelSdkResult;
use opentelemetry_sdk::logs::{LogProcessor, SdkLogRecord, SdkLoggerProvider};

mod throughput;

#[derive(Debug)]
pub struct NoOpLogProcessor;

impl LogProcessor for NoOpLogProcessor {
    fn emit(&self, _record: &mut SdkLogRecord, _scope: &InstrumentationScope) {}

    fn force_flush(&self) -> OTelSdkResult {
        Ok(())
    }

    fn shutdown(&self) -> OTelSdkResult {
        Ok(())
    }

    fn event_enabled(
        &self,
        _level: opentelemetry::logs::Severity,
        _target: &str,
        _name: Option<&str>,
    ) -> bool {
        true
    }
}

fn main() {
    // LoggerProvider with a no-op processor.
    let provider = SdkLoggerProvider::builder()
        .with_log_processor(NoOpLogProcessor)
        .build();

    let bridge = AppenderBridge::builder(&provider)
        .with_config(
            Framework::Logback,
            BridgeConfig::builder()
                .with_experimental_attributes(true)
                .with_context_data_attributes(["requestId"])
                .build(),
        )
        .build();

    throughput::test_throughput(move || {
        let event = LoggingEvent::new("com.example.Checkout", levels::ERROR, "payment declined")
            .with_mdc("requestId", "f3a1")
            .with_mdc("userId", "otel");
        bridge.capture(&event);
    });
}
