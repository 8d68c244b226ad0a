//! Formation CLI commands
//!
//! Thin host around `formation_core`: a directory-backed store, a CSV roster
//! importer and a scripted stand-in for the drag/drop front end.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use formation_core::persistence::{DispatchMode, FileRepository, SaveWorker};
use formation_core::presets;
use formation_core::{
    BoardConfig, BoardMount, BoardView, FormationBoard, Location, MoveDescriptor, MoveOutcome,
    PlayerId, PlayerRef, PositionId, SaveStatus, TeamId,
};

/// Explicit path first, then `FORMATION_BOARD_CONFIG`, then defaults
pub fn load_config(path: Option<&Path>) -> Result<BoardConfig> {
    let config = match path {
        Some(path) => BoardConfig::from_path(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => BoardConfig::from_env().context("Failed to load config from environment")?,
    };
    Ok(config)
}

pub fn list_presets() -> String {
    let mut out = String::new();
    for preset in presets::all_presets() {
        let _ = writeln!(out, "{:<8} {:>2} slots", preset.name, preset.len());
    }
    out
}

pub fn describe_preset(name: &str) -> Result<String> {
    let preset = presets::preset(name)?;
    let mut out = format!("{} ({} slots)\n", preset.name, preset.len());
    for slot in &preset.slots {
        let _ = writeln!(
            out,
            "  {:<4} {:<5} x={:>5.1} y={:>5.1}",
            slot.label, slot.position_id, slot.x_norm, slot.y_norm
        );
    }
    Ok(out)
}

/// Roster CSV row: `id,name,jersey,position` (jersey and position may be blank)
#[derive(Debug, Deserialize)]
struct RosterRow {
    id: String,
    name: String,
    #[serde(default)]
    jersey: Option<u8>,
    #[serde(default)]
    position: Option<String>,
}

/// CSV import statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportStats {
    pub total_rows: usize,
    pub imported: usize,
    pub failed: usize,
    pub duplicates: usize,
}

pub fn read_roster_csv(csv_path: &Path) -> Result<(Vec<PlayerRef>, ImportStats)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(csv_path)
        .with_context(|| format!("Failed to open CSV file: {}", csv_path.display()))?;

    let mut players: Vec<PlayerRef> = Vec::new();
    let mut stats = ImportStats::default();

    for (row, record) in reader.deserialize::<RosterRow>().enumerate() {
        stats.total_rows += 1;
        let line = row + 2;
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                stats.failed += 1;
                tracing::warn!(line, error = %err, "skipping roster row");
                continue;
            }
        };
        if record.id.is_empty() {
            stats.failed += 1;
            tracing::warn!(line, "skipping roster row without id");
            continue;
        }
        if players.iter().any(|player| player.id.as_str() == record.id) {
            stats.duplicates += 1;
            tracing::warn!(line, id = %record.id, "duplicate player id");
            continue;
        }

        let mut player = PlayerRef::new(record.id, record.name);
        if let Some(jersey) = record.jersey {
            player = player.with_jersey(jersey);
        }
        if let Some(position) = record.position.filter(|p| !p.is_empty()) {
            player = player.with_position(position);
        }
        players.push(player);
        stats.imported += 1;
    }

    Ok((players, stats))
}

pub fn import_roster(store: &Path, team: &str, csv_path: &Path) -> Result<ImportStats> {
    let (players, stats) = read_roster_csv(csv_path)?;
    if players.is_empty() {
        bail!("No players found in {}", csv_path.display());
    }
    let repository = FileRepository::new(store);
    repository
        .save_roster(&TeamId::from(team), &players)
        .with_context(|| format!("Failed to write roster for {}", team))?;
    Ok(stats)
}

fn mount(store: &Path, team: &str, config: BoardConfig, editable: bool) -> Result<FormationBoard> {
    let repository = Arc::new(FileRepository::new(store));
    let worker = SaveWorker::new(repository, DispatchMode::Inline);
    FormationBoard::mount(BoardMount::new(team, editable), config, worker)
        .with_context(|| format!("Failed to open formation board for {}", team))
}

/// Read-only render model at the given container width
pub fn board_view(store: &Path, team: &str, config: BoardConfig, width: f32) -> Result<BoardView> {
    let mut board = mount(store, team, config, false)?;
    board.resize(width);
    Ok(board.view())
}

pub fn render_text(view: &BoardView) -> String {
    let mut out = format!("Formation {}\n", view.preset);
    for slot in &view.slots {
        let chip = view.chips.iter().find(|chip| chip.location == Location::Slot(slot.position_id.clone()));
        match chip {
            Some(chip) => {
                let _ = writeln!(out, "  {:<4} #{:<3} {}", slot.label, chip.label, chip.name);
            }
            None => {
                let _ = writeln!(out, "  {:<4} (empty)", slot.label);
            }
        }
    }

    out.push_str("Bench\n");
    for cell in &view.bench {
        let chip = view.chips.iter().find(|chip| chip.location == Location::Bench(cell.index));
        match chip {
            Some(chip) => {
                let _ = writeln!(out, "  {:<4} #{:<3} {}", cell.index + 1, chip.label, chip.name);
            }
            None => {
                let _ = writeln!(out, "  {:<4} -", cell.index + 1);
            }
        }
    }

    if !view.unassigned.is_empty() {
        out.push_str("Unassigned\n");
        for player in &view.unassigned {
            let _ = writeln!(out, "  #{:<3} {}", player.chip_label(), player.name);
        }
    }
    out
}

/// One scripted edit. Origins are looked up from the current lineup.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case", tag = "step")]
pub enum ScriptStep {
    MoveToSlot { player: PlayerId, target: PositionId },
    MoveToSubSlot { player: PlayerId, index: usize },
    SwapPlayers { a: PlayerId, b: PlayerId },
    Demote { player: PlayerId },
    ChangePreset { preset: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptReport {
    pub applied: usize,
    pub unchanged: usize,
    /// (step number, reason), 1-based
    pub rejected: Vec<(usize, String)>,
    pub status: SaveStatus,
}

fn to_move(board: &FormationBoard, step: &ScriptStep) -> Result<Option<MoveDescriptor>> {
    let lineup = board.store().lineup();
    let mv = match step {
        ScriptStep::MoveToSlot { player, target } => MoveDescriptor::MoveToSlot {
            player: player.clone(),
            target: target.clone(),
            origin: lineup.locate(player),
        },
        ScriptStep::MoveToSubSlot { player, index } => MoveDescriptor::MoveToSubSlot {
            player: player.clone(),
            target_index: *index,
            origin: lineup.locate(player),
        },
        ScriptStep::SwapPlayers { a, b } => MoveDescriptor::SwapPlayers { a: a.clone(), b: b.clone() },
        ScriptStep::Demote { player } => match lineup.locate(player) {
            Location::Slot(origin_position) => {
                MoveDescriptor::DemoteToSubsGeneral { player: player.clone(), origin_position }
            }
            other => bail!("{} is not a starter ({})", player, other),
        },
        ScriptStep::ChangePreset { .. } => return Ok(None),
    };
    Ok(Some(mv))
}

pub fn parse_script(path: &Path) -> Result<Vec<ScriptStep>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read script: {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid script: {}", path.display()))
}

/// Run steps in order against the team's board and write the result.
/// Rejected steps are reported and skipped.
pub fn apply_script(
    store: &Path,
    team: &str,
    config: BoardConfig,
    steps: &[ScriptStep],
) -> Result<ScriptReport> {
    let mut board = mount(store, team, config, true)?;
    let mut report = ScriptReport {
        applied: 0,
        unchanged: 0,
        rejected: Vec::new(),
        status: board.status(),
    };

    for (i, step) in steps.iter().enumerate() {
        let number = i + 1;
        let result: Result<bool> = match step {
            ScriptStep::ChangePreset { preset } => board
                .change_preset(preset)
                .map(|change| change.changed)
                .map_err(Into::into),
            _ => to_move(&board, step).and_then(|mv| match mv {
                Some(mv) => board
                    .apply_move(&mv)
                    .map(|outcome| outcome != MoveOutcome::Unchanged)
                    .map_err(Into::into),
                None => Ok(false),
            }),
        };

        match result {
            Ok(true) => report.applied += 1,
            Ok(false) => report.unchanged += 1,
            Err(err) => {
                tracing::warn!(step = number, error = %err, "script step rejected");
                report.rejected.push((number, err.to_string()));
            }
        }
    }

    report.status = board.retry_save();
    if report.status == SaveStatus::Failed {
        bail!("Changes not saved for {}", team);
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use formation_core::{FormationRepository, Lineup};
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn roster_csv(players: usize) -> String {
        let mut csv = String::from("id,name,jersey,position\n");
        for i in 1..=players {
            csv.push_str(&format!("p{},Player {},{},\n", i, i, i));
        }
        csv
    }

    #[test]
    fn test_list_presets_includes_catalog() {
        let listing = list_presets();
        assert!(listing.contains("4-3-3"));
        assert!(listing.contains("4-4-1"));
        assert!(describe_preset("4-4-2").unwrap().contains("LS"));
        assert!(describe_preset("1-1-1").is_err());
    }

    #[test]
    fn test_read_roster_csv_skips_bad_rows() {
        let dir = TempDir::new().unwrap();
        let csv = write(
            &dir,
            "roster.csv",
            "id,name,jersey,position\np1,Ana Silva,1,GK\np2,Bea,notanumber,CB\np1,Twin,3,\n,Nobody,,\np3,Cleo,,ST\n",
        );

        let (players, stats) = read_roster_csv(&csv).unwrap();
        assert_eq!(stats.total_rows, 5);
        assert_eq!(stats.imported, 2);
        assert_eq!(stats.failed, 2);
        assert_eq!(stats.duplicates, 1);
        assert_eq!(players[0].jersey, Some(1));
        assert_eq!(players[0].position, "GK");
        assert_eq!(players[1].jersey, None);
        assert_eq!(players[1].chip_label(), "C");
    }

    #[test]
    fn test_import_then_show() {
        let dir = TempDir::new().unwrap();
        let csv = write(&dir, "roster.csv", &roster_csv(13));
        let store = dir.path().join("store");

        let stats = import_roster(&store, "lions", &csv).unwrap();
        assert_eq!(stats.imported, 13);

        let view = board_view(&store, "lions", BoardConfig::default(), 1600.0).unwrap();
        assert!(view.read_only);
        assert_eq!(view.bench.iter().filter(|cell| cell.player.is_some()).count(), 2);

        let text = render_text(&view);
        assert!(text.starts_with("Formation 4-3-3"));
        assert!(text.contains("GK   #1   Player 1"));
    }

    #[test]
    fn test_apply_script_persists_and_reports_rejections() {
        let dir = TempDir::new().unwrap();
        let csv = write(&dir, "roster.csv", &roster_csv(12));
        let store = dir.path().join("store");
        import_roster(&store, "lions", &csv).unwrap();

        let script = write(
            &dir,
            "script.json",
            r#"[
                {"step": "swap_players", "a": "p12", "b": "p1"},
                {"step": "move_to_slot", "player": "p9", "target": "st"},
                {"step": "demote", "player": "p12"},
                {"step": "demote", "player": "nobody"},
                {"step": "change_preset", "preset": "4-4-1"},
                {"step": "change_preset", "preset": "4-4-1"},
                {"step": "move_to_slot", "player": "p2", "target": "rwb"}
            ]"#,
        );
        let steps = parse_script(&script).unwrap();
        let report = apply_script(&store, "lions", BoardConfig::default(), &steps).unwrap();

        assert_eq!(report.applied, 4);
        assert_eq!(report.unchanged, 1);
        assert_eq!(report.rejected.iter().map(|(n, _)| *n).collect::<Vec<_>>(), vec![4, 7]);
        assert_eq!(report.status, SaveStatus::Saved);

        let saved = FileRepository::new(&store).load_formation(&"lions".into()).unwrap().unwrap();
        let lineup: Lineup = saved.to_lineup();
        assert_eq!(lineup.preset, "4-4-1");
        assert_eq!(lineup.starters.len(), 10);
        assert!(lineup.contains(&"p12".into()));
    }

    #[test]
    fn test_config_from_explicit_yaml() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "board.yaml", "bench_capacity: 5\nsave_debounce_ms: 0\n");
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.bench_capacity, 5);
    }
}
