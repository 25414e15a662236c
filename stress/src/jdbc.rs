/*
    Stress test results:
    Every iteration binds three parameters of a fresh statement and executes
    it inside a sampled span, so the numbers cover the side table round trip
    plus the span attribute write.
*/

use opentelemetry::trace::{Tracer, TracerProvider as _};
use opentelemetry_instrumentation_jdbc::{StatementId, StatementInstrumentation};
use opentelemetry_sdk::trace::SdkTracerProvider;

mod throughput;

fn main() {
    // No exporter: spans are recorded and dropped on end.
    let provider = SdkTracerProvider::builder().build();
    let tracer = provider.tracer("stress");
    let instrumentation = StatementInstrumentation::new();

    throughput::test_throughput(move || {
        let statement = StatementId::next();
        tracer.in_span("INSERT orders", |_cx| {
            instrumentation.on_bind(statement, 1, 42);
            instrumentation.on_bind(statement, 2, "pending");
            instrumentation.on_bind(statement, 3, 19.99);
            instrumentation.on_execute(statement);
        });
    });
}
