use super::context::PipelineState;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// Summary of a finished pipeline run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineReport {
    pub modules: Vec<String>,
    pub archives: Vec<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub launchers: Vec<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executable_archive: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classpath: Option<String>,
    pub skipped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<String>,
    pub elapsed_ms: u64,
}

impl PipelineReport {
    pub fn from_state(state: PipelineState, elapsed: Duration) -> Self {
        let (modules, archives) = match state.resolution {
            Some(resolution) => (
                resolution.modules.names().map(str::to_string).collect(),
                resolution.archives,
            ),
            None => (Vec::new(), Vec::new()),
        };
        let (launchers, executable_archive, classpath) = match state.bundle {
            Some(outcome) => (
                outcome.launchers,
                Some(outcome.executable_archive),
                Some(outcome.classpath),
            ),
            None => (Vec::new(), None, None),
        };

        Self {
            modules,
            archives,
            runtime_dir: state.image.map(|image| image.root().to_path_buf()),
            launchers,
            executable_archive,
            classpath,
            skipped: state.skipped.is_some(),
            skip_reason: state.skipped,
            elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{ModuleName, ModuleSet, Resolution};

    #[test]
    fn test_skipped_report() {
        let state = PipelineState {
            resolution: Some(Resolution::default()),
            skipped: Some("no platform modules required".to_string()),
            ..Default::default()
        };

        let report = PipelineReport::from_state(state, Duration::from_millis(12));

        assert!(report.skipped);
        assert!(report.runtime_dir.is_none());
        assert_eq!(report.elapsed_ms, 12);
    }

    #[test]
    fn test_report_serializes_modules() {
        let modules: ModuleSet = ["java.sql", "java.base"]
            .iter()
            .filter_map(|n| ModuleName::new(n))
            .collect();
        let state = PipelineState {
            resolution: Some(Resolution {
                modules,
                archives: vec![PathBuf::from("/libs/app.jar")],
            }),
            ..Default::default()
        };

        let report = PipelineReport::from_state(state, Duration::ZERO);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["modules"], serde_json::json!(["java.base", "java.sql"]));
        assert_eq!(json["skipped"], false);
        assert!(json.get("runtime_dir").is_none());
    }
}
