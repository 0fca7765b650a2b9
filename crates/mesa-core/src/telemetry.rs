//! Trace context propagation for outgoing HTTP requests

use std::collections::HashMap;

/// Header names and values carrying the current span context.
///
/// Empty until a text-map propagator is installed globally.
pub fn trace_context() -> HashMap<String, String> {
    #[allow(unused_mut)]
    let mut headers = HashMap::new();
    #[cfg(not(target_arch = "wasm32"))]
    {
        use opentelemetry::Context;
        use opentelemetry::global;

        global::get_text_map_propagator(|propagator| {
            propagator.inject_context(&Context::current(), &mut headers);
        });
    }
    headers
}
