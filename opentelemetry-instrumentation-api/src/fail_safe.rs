//! Boundary keeping instrumentation failures away from the instrumented call
//! site.
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Runs `f`, turning a panic into `Err` carrying the panic message.
///
/// Instrumentation hooks run inline with application calls. A panic raised
/// by a telemetry sink must never reach the application, so hooks wrap their
/// sink calls with this function and report the error through internal
/// logging instead.
pub fn catch_panic<R>(f: impl FnOnce() -> R) -> Result<R, String> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| panic_message(payload.as_ref()))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_value_without_panic() {
        assert_eq!(catch_panic(|| 41 + 1), Ok(42));
    }

    #[test]
    fn reports_static_and_formatted_messages() {
        assert_eq!(catch_panic(|| panic!("exporter gone")), Err::<(), _>("exporter gone".into()));
        let code = 7;
        assert_eq!(
            catch_panic(|| panic!("exit code {code}")),
            Err::<(), _>("exit code 7".into())
        );
    }

    #[test]
    fn reports_opaque_payloads() {
        let result = catch_panic(|| std::panic::panic_any(3_u8));
        assert_eq!(result, Err::<(), _>("unknown panic payload".into()));
    }
}
