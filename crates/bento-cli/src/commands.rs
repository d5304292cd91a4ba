//! CLI command implementation

use std::path::PathBuf;

use anyhow::{Context, anyhow};
use tracing::{debug, info};

use bento_core::{
    AdapterRegistry, ConfigLoader, FormatterRegistry, NormalizeContext, Orchestrator, ReporterSpec,
    Severity, normalize,
};

/// Everything the check run needs from the command line.
pub struct CheckArgs {
    pub paths: Vec<PathBuf>,
    pub config: Option<PathBuf>,
    pub level: Option<String>,
    pub formatter: Option<String>,
    pub fix: bool,
}

/// Load configuration, run the orchestrator over the requested paths, and
/// return the run-wide severity.
pub async fn check(args: CheckArgs) -> anyhow::Result<Option<Severity>> {
    let cwd = std::env::current_dir().context("cannot determine current directory")?;
    let (document, config_dir) = ConfigLoader::load_or_discover(args.config.as_deref(), &cwd)?;

    let adapters = AdapterRegistry::with_builtins();
    let formatters = FormatterRegistry::with_builtins();

    let mut ctx = NormalizeContext::new(&adapters, &formatters, &config_dir);
    if let Some(name) = &args.level {
        ctx.level_ceiling = Severity::from_name(name)
            .ok_or_else(|| anyhow!("unknown severity '{name}' (valid: off, fatal, error, warn, info)"))?;
    }

    let mut config = normalize(&document, &ctx)?;
    if args.fix {
        config.fix = true;
    }

    if let Some(name) = &args.formatter {
        let formatter = formatters.resolve(name).ok_or_else(|| {
            anyhow!(
                "unknown formatter '{name}' (registered: {})",
                formatters.names().join(", ")
            )
        })?;
        config.reporters = vec![ReporterSpec {
            name: name.clone(),
            formatter,
            level: None,
            options: Vec::new(),
        }];
    } else if config.reporters.is_empty() {
        let formatter = formatters
            .resolve("stylish")
            .ok_or_else(|| anyhow!("built-in formatter missing"))?;
        config.reporters.push(ReporterSpec {
            name: "stylish".to_string(),
            formatter,
            level: None,
            options: Vec::new(),
        });
    }

    // The engine roots all matching at the config's directory; CLI paths
    // resolve against the invocation directory before being handed over.
    let bases: Vec<PathBuf> = args
        .paths
        .iter()
        .map(|path| if path.is_absolute() { path.clone() } else { cwd.join(path) })
        .collect();
    debug!("checking {} base path(s) from {}", bases.len(), config_dir.display());

    let mut orchestrator = Orchestrator::new(config, &config_dir);
    let outcome = orchestrator.run(&bases).await?;

    info!(
        "checked {} file(s), overall severity: {}",
        outcome.files.len(),
        outcome.overall.map(|s| s.name()).unwrap_or("none"),
    );
    Ok(outcome.overall)
}

/// Map the run-wide severity to the process exit code.
pub fn exit_code(overall: Option<Severity>) -> i32 {
    match overall {
        Some(Severity::Fatal) => 2,
        Some(Severity::Error) => 1,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_severity() {
        assert_eq!(exit_code(Some(Severity::Fatal)), 2);
        assert_eq!(exit_code(Some(Severity::Error)), 1);
        assert_eq!(exit_code(Some(Severity::Warn)), 0);
        assert_eq!(exit_code(Some(Severity::Info)), 0);
        assert_eq!(exit_code(None), 0);
    }
}
