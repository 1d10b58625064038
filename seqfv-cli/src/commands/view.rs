//! View commands - assemble a feature viewer board from recorded responses

use seqfv_core::{BoardConfig, FixtureService, FvView, MergePolicy, RenderSink, RowOrder, TrackRow, ViewOrchestrator};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{CliError, CliResult};

/// Which kind of identifier the board is built around
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Uniprot,
    Entity,
    Instance,
    Chromosome,
}

/// Sink that writes the board as JSON
pub struct JsonSink {
    pretty: bool,
    view: Option<FvView>,
}

impl JsonSink {
    pub fn new(pretty: bool) -> Self {
        Self { pretty, view: None }
    }

    pub fn to_json(&self) -> CliResult<String> {
        let view = self
            .view
            .as_ref()
            .ok_or_else(|| CliError::output("nothing was rendered"))?;
        let json = if self.pretty {
            serde_json::to_string_pretty(view)?
        } else {
            serde_json::to_string(view)?
        };
        Ok(json)
    }

    /// Write to a file, or stdout when no path is given
    pub fn write(&self, output: Option<&Path>) -> CliResult<()> {
        let json = self.to_json()?;
        match output {
            Some(path) => {
                std::fs::write(path, json)?;
                log::info!("Wrote board to {}", path.display());
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                writeln!(stdout, "{}", json)?;
            }
        }
        Ok(())
    }
}

impl RenderSink for JsonSink {
    fn render(&mut self, board: BoardConfig, rows: Vec<TrackRow>) {
        self.view = Some(FvView { board_config: board, row_config: rows });
    }
}

#[allow(clippy::too_many_arguments)]
pub async fn execute(
    config: &Config,
    kind: ViewKind,
    id: String,
    fixtures: PathBuf,
    output: Option<PathBuf>,
    filter: Option<String>,
    title: Option<String>,
    merge_policy: Option<MergePolicy>,
    row_order: Option<RowOrder>,
    dynamic_display: bool,
) -> CliResult<()> {
    log::info!("Building {:?} view for {}", kind, id);
    log::info!("Fixtures: {}", fixtures.display());

    if !fixtures.exists() {
        return Err(CliError::file_not_found(fixtures));
    }
    let service = FixtureService::load_from_file(&fixtures)?;

    let mut options = config
        .view_options()
        .map_err(|e| CliError::config(format!("{:#}", e)))?;
    // CLI arguments override the configuration file
    if let Some(policy) = merge_policy {
        options.merge_policy = policy;
    }
    if row_order.is_some() {
        options.row_order = row_order;
    }
    options.dynamic_display |= dynamic_display;
    options.filter_by_target_contains = filter;
    options.sequence_track_title = title;

    let orchestrator = ViewOrchestrator::new(service, options);
    let view = match kind {
        ViewKind::Uniprot => orchestrator.build_uniprot_fv(&id).await?,
        ViewKind::Entity => orchestrator.build_entity_fv(&id).await?,
        ViewKind::Instance => orchestrator.build_instance_fv(&id).await?,
        ViewKind::Chromosome => orchestrator.build_chromosome_fv(&id).await?,
    };

    if let Some(targets) = orchestrator.targets().wait().await {
        log::info!("Aligned targets: {}", targets.len());
        log::debug!("Targets: {:?}", targets);
    }
    log::info!("Board length {} with {} rows", view.board_config.length, view.row_config.len());

    let mut sink = JsonSink::new(config.general.pretty);
    view.deliver(&mut sink);
    sink.write(output.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use seqfv_core::types::*;
    use tempfile::tempdir;

    fn bundle_json() -> String {
        serde_json::json!({
            "alignments": [{
                "request": { "query_id": "4HHB_1", "from": "PDB_ENTITY", "to": "UNIPROT" },
                "response": {
                    "query_sequence": "MVLS",
                    "target_alignment": [{
                        "target_id": "P69905",
                        "target_sequence": "MVLS",
                        "aligned_regions": [
                            { "query_begin": 1, "query_end": 4, "target_begin": 1, "target_end": 4 }
                        ]
                    }]
                }
            }],
            "annotations": [{
                "query_id": "4HHB_1",
                "reference": "PDB_ENTITY",
                "response": []
            }]
        })
        .to_string()
    }

    #[test]
    fn test_sink_without_render_is_error() {
        let sink = JsonSink::new(true);
        assert!(matches!(sink.to_json(), Err(CliError::Output { .. })));
    }

    #[test]
    fn test_sink_serializes_board() -> CliResult<()> {
        let mut sink = JsonSink::new(false);
        sink.render(BoardConfig { length: 4, include_axis: true }, Vec::new());
        let json = sink.to_json()?;
        assert!(json.contains("\"boardConfig\""));
        assert!(json.contains("\"length\":4"));
        Ok(())
    }

    #[tokio::test]
    async fn test_entity_view_written_to_file() -> CliResult<()> {
        let dir = tempdir()?;
        let fixtures = dir.path().join("fixtures.json");
        let output = dir.path().join("board.json");
        std::fs::write(&fixtures, bundle_json())?;

        execute(
            &Config::default(),
            ViewKind::Entity,
            "4HHB_1".to_string(),
            fixtures,
            Some(output.clone()),
            None,
            None,
            Some(MergePolicy::Chain),
            None,
            false,
        )
        .await?;

        let written: FvView = serde_json::from_str(&std::fs::read_to_string(&output)?)?;
        assert_eq!(written.board_config.length, 4);
        assert_eq!(written.row_config.len(), 2);
        assert_eq!(written.row_config[1].row_title, format!("{} P69905", SequenceReference::Uniprot.label()));
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_fixtures_file() {
        let result = execute(
            &Config::default(),
            ViewKind::Uniprot,
            "P69905".to_string(),
            PathBuf::from("/nonexistent/fixtures.json"),
            None,
            None,
            None,
            None,
            None,
            false,
        )
        .await;
        assert!(matches!(result, Err(CliError::FileNotFound { .. })));
    }

    #[tokio::test]
    async fn test_unrecorded_id_is_fetch_error() -> CliResult<()> {
        let dir = tempdir()?;
        let fixtures = dir.path().join("fixtures.json");
        std::fs::write(&fixtures, bundle_json())?;
        let result = execute(
            &Config::default(),
            ViewKind::Entity,
            "1ABC_1".to_string(),
            fixtures,
            None,
            None,
            None,
            None,
            None,
            false,
        )
        .await;
        assert!(matches!(result, Err(CliError::Fetch { .. })));
        Ok(())
    }
}
