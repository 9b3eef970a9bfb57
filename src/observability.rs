use std::env::var;

use tracing::{subscriber::set_global_default, Subscriber};
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Layer, Registry};

/// Build the subscriber. `RUST_LOG` overrides `env_filter`, `LOG_FORMAT=json` switches to JSON lines.
pub fn get_subscriber(env_filter: &str) -> impl Subscriber + Sync + Send {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(env_filter));

    let fmt = if var("LOG_FORMAT").is_ok_and(|x| x.eq_ignore_ascii_case("json")) {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };

    Registry::default().with(env_filter).with(fmt)
}

pub fn init_subscriber(subscriber: impl Subscriber + Sync + Send) {
    set_global_default(subscriber).expect("Failed to set subscriber");
}
