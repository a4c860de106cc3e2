//! CLI subcommand handlers.

use crate::{Commands, ConfigAction, DataArgs};
use driftguard_core::config::{
    DriftGuardConfig, config_exists, load_config, workspace_config_path,
};
use driftguard_core::server::{self, AppState};
use driftguard_core::{DriftReport, DriftStatus, RETRAIN_PSI_THRESHOLD, check_files};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

/// Exit code when either snapshot cannot be found or read.
pub const EXIT_LOAD_FAILURE: u8 = 1;

/// Handle a CLI subcommand.
pub async fn handle_command(command: Commands, workspace: &Path) -> anyhow::Result<ExitCode> {
    match command {
        Commands::Check { data } => handle_check(data, workspace).await,
        Commands::Serve { data, host, port } => handle_serve(data, host, port, workspace).await,
        Commands::Config { action } => handle_config(action, workspace),
    }
}

/// Load layered config, then apply flags on top and re-validate.
/// Relative data paths resolve against the workspace.
fn resolve_config(data: DataArgs, workspace: &Path) -> anyhow::Result<DriftGuardConfig> {
    let mut config = load_config(Some(workspace))
        .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    if let Some(reference) = data.reference {
        config.data.reference_path = reference;
    }
    if let Some(current) = data.current {
        config.data.current_path = current;
    }
    if let Some(buckets) = data.buckets {
        config.drift.buckets = usize::from(buckets);
    }
    config.validate()?;
    config.data.reference_path = in_workspace(workspace, &config.data.reference_path);
    config.data.current_path = in_workspace(workspace, &config.data.current_path);
    Ok(config)
}

fn in_workspace(workspace: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        workspace.join(path)
    }
}

async fn handle_check(data: DataArgs, workspace: &Path) -> anyhow::Result<ExitCode> {
    let config = resolve_config(data, workspace)?;
    let reference = &config.data.reference_path;
    let current = &config.data.current_path;
    tracing::info!(
        reference = %reference.display(),
        current = %current.display(),
        buckets = config.drift.buckets,
        "DriftGuard drift check"
    );

    let report = match check_files(reference, current, config.drift.buckets).await {
        Ok(report) => report,
        Err(e) if e.is_not_found() => {
            tracing::error!("{e}");
            return Ok(ExitCode::from(EXIT_LOAD_FAILURE));
        }
        Err(e) => {
            tracing::error!("Failed to load data: {e}");
            return Ok(ExitCode::from(EXIT_LOAD_FAILURE));
        }
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    log_summary(&report);
    Ok(ExitCode::from(report.status.exit_code()))
}

fn log_summary(report: &DriftReport) {
    let line = summary_line(report);
    match report.status {
        DriftStatus::Retrain => tracing::warn!("{line}"),
        DriftStatus::Ok | DriftStatus::NoNumericColumns => tracing::info!("{line}"),
    }
}

/// One-line verdict, e.g. `[RETRAIN] max_psi = 0.3466 >= 0.25 -> trigger retraining.`
fn summary_line(report: &DriftReport) -> String {
    match (report.status, report.max_psi) {
        (DriftStatus::NoNumericColumns, _) => {
            "[WARN] No numeric columns in common; nothing to check.".to_string()
        }
        (_, None) => "[OK] No defined PSI values; no drift decision.".to_string(),
        (DriftStatus::Retrain, Some(max_psi)) => format!(
            "[RETRAIN] max_psi = {max_psi:.4} >= {RETRAIN_PSI_THRESHOLD} -> trigger retraining."
        ),
        (DriftStatus::Ok, Some(max_psi)) => {
            format!("[OK] max_psi = {max_psi:.4} < {RETRAIN_PSI_THRESHOLD} -> no action.")
        }
    }
}

async fn handle_serve(
    data: DataArgs,
    host: Option<String>,
    port: Option<u16>,
    workspace: &Path,
) -> anyhow::Result<ExitCode> {
    let mut config = resolve_config(data, workspace)?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let state = Arc::new(AppState::from_config(&config));
    tracing::info!(
        reference = %state.reference_path().display(),
        current = %state.current_path().display(),
        "Starting drift service"
    );
    server::run(state, &config.server.bind_addr()).await?;
    Ok(ExitCode::SUCCESS)
}

fn handle_config(action: ConfigAction, workspace: &Path) -> anyhow::Result<ExitCode> {
    match action {
        ConfigAction::Init => {
            let config_path = workspace_config_path(workspace);
            if config_path.exists() {
                println!(
                    "Configuration file already exists at: {}",
                    config_path.display()
                );
                return Ok(ExitCode::SUCCESS);
            }
            if let Some(dir) = config_path.parent() {
                std::fs::create_dir_all(dir)?;
            }

            let toml_str = toml::to_string_pretty(&DriftGuardConfig::default())?;
            std::fs::write(&config_path, &toml_str)?;
            println!(
                "Created default configuration at: {}",
                config_path.display()
            );
            Ok(ExitCode::SUCCESS)
        }
        ConfigAction::Show => {
            if !config_exists(Some(workspace)) {
                tracing::info!("No configuration file found; showing defaults and environment");
            }
            let config = load_config(Some(workspace))
                .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
            println!("{}", toml::to_string_pretty(&config)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use driftguard_core::DriftMetrics;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn report_with(psi: Option<f64>) -> DriftReport {
        DriftReport::aggregate(BTreeMap::from([(
            "delay".to_string(),
            DriftMetrics {
                psi,
                ..DriftMetrics::default()
            },
        )]))
    }

    #[test]
    fn test_summary_retrain() {
        assert_eq!(
            summary_line(&report_with(Some(0.34657))),
            "[RETRAIN] max_psi = 0.3466 >= 0.25 -> trigger retraining."
        );
    }

    #[test]
    fn test_summary_ok() {
        assert_eq!(
            summary_line(&report_with(Some(0.01))),
            "[OK] max_psi = 0.0100 < 0.25 -> no action."
        );
    }

    #[test]
    fn test_summary_undefined_and_no_columns() {
        assert!(summary_line(&report_with(None)).starts_with("[OK]"));
        assert!(summary_line(&DriftReport::no_numeric_columns()).starts_with("[WARN]"));
    }

    #[test]
    fn test_in_workspace() {
        let ws = Path::new("/srv/model");
        assert_eq!(
            in_workspace(ws, Path::new("data/ref.csv")),
            PathBuf::from("/srv/model/data/ref.csv")
        );
        assert_eq!(
            in_workspace(ws, Path::new("/abs/cur.csv")),
            PathBuf::from("/abs/cur.csv")
        );
    }

    #[test]
    fn test_resolve_config_applies_flags() {
        let dir = tempfile::tempdir().unwrap();
        let data = DataArgs {
            reference: Some(PathBuf::from("train.csv")),
            current: None,
            buckets: Some(4),
        };
        let config = resolve_config(data, dir.path()).unwrap();
        assert_eq!(config.data.reference_path, dir.path().join("train.csv"));
        assert_eq!(config.drift.buckets, 4);
    }

    #[test]
    fn test_resolve_config_rejects_excessive_buckets() {
        let dir = tempfile::tempdir().unwrap();
        let data = DataArgs {
            buckets: Some(u16::MAX),
            ..DataArgs::default()
        };
        assert!(resolve_config(data, dir.path()).is_err());
    }

    #[tokio::test]
    async fn test_check_missing_files_exits_one() {
        let dir = tempfile::tempdir().unwrap();
        let code = handle_check(DataArgs::default(), dir.path()).await.unwrap();
        assert_eq!(code, ExitCode::from(EXIT_LOAD_FAILURE));
    }

    #[tokio::test]
    async fn test_check_retrain_exits_two() {
        let dir = tempfile::tempdir().unwrap();
        let mut current = String::from("x\n");
        for i in 0..100 {
            current.push_str(if i < 50 { "1\n" } else { "5\n" });
        }
        std::fs::write(dir.path().join("ref.csv"), format!("x\n{}", "1\n".repeat(100))).unwrap();
        std::fs::write(dir.path().join("cur.csv"), current).unwrap();

        let data = DataArgs {
            reference: Some(PathBuf::from("ref.csv")),
            current: Some(PathBuf::from("cur.csv")),
            buckets: None,
        };
        let code = handle_check(data, dir.path()).await.unwrap();
        assert_eq!(code, ExitCode::from(2));
    }

    #[test]
    fn test_config_init_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        handle_config(ConfigAction::Init, dir.path()).unwrap();
        let written = std::fs::read_to_string(workspace_config_path(dir.path())).unwrap();
        assert!(written.contains("reference_path"));
    }
}
