use crate::domain::model::Environment;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init_logger(environment: Environment, verbose: bool) {
    if environment.is_debug() {
        init_cli_logger(verbose)
    } else {
        init_json_logger(verbose)
    }
}

pub fn init_cli_logger(verbose: bool) {
    // development 預設就開 debug
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(true, verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

pub fn init_json_logger(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(false, verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(),
        )
        .init();
}

fn default_directives(debug: bool, verbose: bool) -> &'static str {
    match (debug, verbose) {
        (_, true) => "chore_alloc=debug,tower_http=debug,info",
        (true, false) => "chore_alloc=debug,info",
        (false, false) => "chore_alloc=info,warn",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives() {
        assert_eq!(default_directives(false, false), "chore_alloc=info,warn");
        assert_eq!(default_directives(true, false), "chore_alloc=debug,info");
        assert!(default_directives(false, true).contains("tower_http=debug"));
    }
}
