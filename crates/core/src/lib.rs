pub mod domain;
pub mod error;
pub mod ingest;
pub mod metrics;
pub mod pipeline;
pub mod rules;

pub mod config {
    use anyhow::Context;

    const DEFAULT_PORT: u16 = 3000;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub sentry_dsn: Option<String>,
        pub port: u16,
        pub input_path: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            let port = match std::env::var("PORT") {
                Ok(s) => s
                    .trim()
                    .parse::<u16>()
                    .with_context(|| format!("PORT must be a valid port number (got {s:?})"))?,
                Err(_) => DEFAULT_PORT,
            };

            Ok(Self {
                sentry_dsn: non_empty_var("SENTRY_DSN"),
                port,
                input_path: non_empty_var("PULSE_INPUT_PATH"),
            })
        }

        pub fn require_input_path(&self) -> anyhow::Result<&str> {
            self.input_path
                .as_deref()
                .context("PULSE_INPUT_PATH is required when --input/--sample are not given")
        }
    }

    fn non_empty_var(key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|s| !s.trim().is_empty())
    }
}
