use crate::attributes::EventMapper;
use crate::config::BridgeConfig;
use crate::emitter::RecordEmitter;
use crate::event::LogEvent;
use crate::frameworks::Framework;
use crate::record::StructuredRecord;
use opentelemetry::logs::{Logger, LoggerProvider};
use opentelemetry::{otel_debug, otel_warn};
use opentelemetry_instrumentation_api::call_depth::{CallDepth, CallDepthKind};
use opentelemetry_instrumentation_api::fail_safe::catch_panic;
use std::fmt;

/// Call depth kind shared by every framework bridge.
///
/// A logging facade handing its event to another captured framework runs
/// both captures on the same thread; sharing one counter across frameworks
/// keeps only the outermost one.
pub const LOG_RECORD: CallDepthKind = "opentelemetry.log-record";

/// Bridges log events of the supported frameworks to an OpenTelemetry
/// [`LoggerProvider`].
///
/// ```no_run
/// use opentelemetry_appender_bridge::frameworks::logback::{levels, LoggingEvent};
/// use opentelemetry_appender_bridge::{AppenderBridge, BridgeConfig, Framework};
/// use opentelemetry_sdk::logs::SdkLoggerProvider;
///
/// let provider = SdkLoggerProvider::builder().build();
/// let bridge = AppenderBridge::builder(&provider)
///     .with_config(
///         Framework::Logback,
///         BridgeConfig::builder()
///             .with_context_data_attributes(["requestId"])
///             .build(),
///     )
///     .build();
///
/// let event = LoggingEvent::new("com.example.Checkout", levels::WARN, "disk full")
///     .with_mdc("requestId", "abc");
/// bridge.capture(&event);
/// ```
pub struct AppenderBridge<P, L>
where
    P: LoggerProvider<Logger = L> + Send + Sync,
    L: Logger + Send + Sync,
{
    emitter: RecordEmitter<P, L>,
    mappers: [EventMapper; 4],
}

impl<P, L> AppenderBridge<P, L>
where
    P: LoggerProvider<Logger = L> + Clone + Send + Sync,
    L: Logger + Send + Sync,
{
    /// Creates a bridge configured from the environment.
    pub fn new(provider: &P) -> Self {
        Self::builder(provider).build()
    }

    /// Returns a builder for a bridge over `provider`.
    pub fn builder(provider: &P) -> AppenderBridgeBuilder<'_, P> {
        AppenderBridgeBuilder {
            provider,
            configs: Default::default(),
        }
    }

    /// Captures `event` unless a capture is already in progress on this
    /// thread. Returns whether a record was handed to the logger.
    pub fn capture<E: LogEvent>(&self, event: &E) -> bool {
        let guard = CallDepth::enter(LOG_RECORD);
        if !guard.is_outermost() {
            otel_debug!(
                name: "AppenderBridge.NestedCaptureSkipped",
                depth = guard.depth(),
            );
            return false;
        }
        self.emit_event(event)
    }

    /// Captures `event`, then runs `body` while the capture is still in
    /// progress so that anything `body` logs through another captured
    /// framework is not captured again.
    pub fn intercept<E, R>(&self, event: &E, body: impl FnOnce() -> R) -> R
    where
        E: LogEvent,
    {
        let guard = CallDepth::enter(LOG_RECORD);
        if guard.is_outermost() {
            self.emit_event(event);
        }
        body()
    }

    /// Maps `event` without emitting it.
    pub fn map_event<E: LogEvent>(&self, event: &E) -> StructuredRecord {
        self.mapper(E::FRAMEWORK).map(event)
    }

    /// The mapper of `framework`.
    pub fn mapper(&self, framework: Framework) -> &EventMapper {
        &self.mappers[framework.index()]
    }

    /// The emitter records are handed to.
    pub fn emitter(&self) -> &RecordEmitter<P, L> {
        &self.emitter
    }

    /// Maps and emits `event`. A panic raised by the event's accessors or
    /// the mapping is reported and swallowed.
    fn emit_event<E: LogEvent>(&self, event: &E) -> bool {
        match catch_panic(|| self.map_and_emit(event)) {
            Ok(emitted) => emitted,
            Err(reason) => {
                otel_warn!(
                    name: "AppenderBridge.CapturePanicked",
                    instrumentation = E::FRAMEWORK.instrumentation_name(),
                    reason = reason.as_str(),
                );
                false
            }
        }
    }

    fn map_and_emit<E: LogEvent>(&self, event: &E) -> bool {
        let severity = event
            .level()
            .and_then(|level| E::FRAMEWORK.severity_ladder().map_level(level));
        if !self.emitter.enabled(event.logger_name(), severity) {
            return false;
        }
        let record = self.map_event(event);
        self.emitter.emit(record, event.logger_name());
        true
    }
}

impl<P, L> fmt::Debug for AppenderBridge<P, L>
where
    P: LoggerProvider<Logger = L> + Send + Sync,
    L: Logger + Send + Sync,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppenderBridge")
            .field("emitter", &self.emitter)
            .field("mappers", &self.mappers)
            .finish()
    }
}

/// Builder for [`AppenderBridge`].
///
/// Frameworks without an explicit configuration read theirs from the
/// environment when the bridge is built.
#[derive(Debug)]
pub struct AppenderBridgeBuilder<'a, P> {
    provider: &'a P,
    configs: [Option<BridgeConfig>; 4],
}

impl<'a, P> AppenderBridgeBuilder<'a, P> {
    /// Sets the configuration of `framework`.
    pub fn with_config(mut self, framework: Framework, config: BridgeConfig) -> Self {
        self.configs[framework.index()] = Some(config);
        self
    }

    /// Builds the bridge.
    pub fn build<L>(self) -> AppenderBridge<P, L>
    where
        P: LoggerProvider<Logger = L> + Clone + Send + Sync,
        L: Logger + Send + Sync,
    {
        let [jul, log4j1, log4j2, logback] = self.configs;
        let mapper = |framework: Framework, config: Option<BridgeConfig>| {
            EventMapper::new(
                framework,
                config.unwrap_or_else(|| BridgeConfig::from_env(framework)),
            )
        };
        AppenderBridge {
            emitter: RecordEmitter::new(self.provider),
            mappers: [
                mapper(Framework::JavaUtilLogging, jul),
                mapper(Framework::Log4j1, log4j1),
                mapper(Framework::Log4j2, log4j2),
                mapper(Framework::Logback, logback),
            ],
        }
    }
}
