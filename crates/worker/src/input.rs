use anyhow::Context;
use pulse_core::domain::contract::SnapshotPairInput;
use std::io::Read;
use std::path::PathBuf;

pub const SAMPLE_INPUT: &str = r#"{
  "today": { "revenue": 12000, "cost": 9000, "customers": 300 },
  "yesterday": { "revenue": 10000, "cost": 7000, "customers": 350 }
}"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Sample,
    Stdin,
    File(PathBuf),
}

impl std::fmt::Display for InputSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sample => write!(f, "sample"),
            Self::Stdin => write!(f, "stdin"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// `--sample` wins, then `--input`, then the configured default path.
pub fn resolve_source(
    input_arg: Option<&str>,
    sample: bool,
    settings: &pulse_core::config::Settings,
) -> anyhow::Result<InputSource> {
    if sample {
        return Ok(InputSource::Sample);
    }

    let path = match input_arg {
        Some(p) => p,
        None => settings.require_input_path()?,
    };

    if path == "-" {
        return Ok(InputSource::Stdin);
    }
    Ok(InputSource::File(PathBuf::from(path)))
}

pub fn read_input(source: &InputSource) -> anyhow::Result<SnapshotPairInput> {
    let text = match source {
        InputSource::Sample => SAMPLE_INPUT.to_string(),
        InputSource::Stdin => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read input from stdin")?;
            buf
        }
        InputSource::File(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read input file {}", path.display()))?,
    };

    let input = pulse_core::ingest::parse_input(&text)
        .with_context(|| format!("invalid input from {source}"))?;
    Ok(input)
}
