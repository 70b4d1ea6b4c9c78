//! End to end: drop a file from one pane onto a folder shown in the other.

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use linkpane_core::{
    Config, DualPane, LinkCreator,
    controller::{DropOutcome, PaneId},
    model::{LinkEvent, LinkStage, PaneRoot},
    operators::link_creator::LinkRequest,
};
use tempfile::TempDir;

struct Layout {
    _dir: TempDir,
    report: std::path::PathBuf,
    backup: std::path::PathBuf,
    other: std::path::PathBuf,
}

fn layout() -> Layout {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("data");
    let backup = dir.path().join("backup");
    let other = dir.path().join("other");
    for d in [&data, &backup, &other] {
        fs::create_dir_all(d).unwrap();
    }
    fs::write(data.join("report.pdf"), b"%PDF-1.7").unwrap();

    Layout {
        report: data.join("report.pdf"),
        backup,
        other,
        _dir: dir,
    }
}

fn approve(_: &LinkRequest) -> bool {
    true
}

#[cfg(unix)]
#[test]
fn link_refreshes_only_the_pane_showing_the_target() {
    let fx = layout();
    let events: Arc<Mutex<Vec<LinkEvent>>> = Arc::default();
    let sink = Arc::clone(&events);
    let creator = LinkCreator::new().with_hook(Arc::new(move |event: &LinkEvent| {
        sink.lock().unwrap().push(event.clone());
    }));

    let mut panes = DualPane::with_creator(
        Config {
            default_root: Some(fx.other.clone()),
            ..Config::default()
        },
        creator,
    );
    panes.navigate(PaneId::Left, &fx.backup);

    assert!(panes.pane(PaneId::Left).contains(&fx.backup));
    assert!(!panes.pane(PaneId::Right).contains(&fx.backup));

    let outcome = panes.handle_drop(&fx.report, &fx.backup, &mut approve);
    let DropOutcome::Completed { result, refresh } = outcome else {
        panic!("drop was approved");
    };

    let created = result.unwrap();
    assert_eq!(created.link_path, fx.backup.join("report.pdf"));
    assert_eq!(fs::read_link(&created.link_path).unwrap(), fx.report);
    assert_eq!(refresh.as_slice(), &[PaneId::Left]);

    let stages: Vec<LinkStage> = events.lock().unwrap().iter().map(|e| e.stage).collect();
    assert_eq!(stages, vec![LinkStage::Requested, LinkStage::Created]);
}

#[cfg(unix)]
#[test]
fn both_panes_refresh_when_both_show_an_ancestor() {
    let fx = layout();
    let root = fx.backup.parent().unwrap().to_path_buf();
    let panes = DualPane::new(Config {
        default_root: Some(root),
        confirm_before_link: false,
        ..Config::default()
    });

    let DropOutcome::Completed { result, refresh } =
        panes.handle_drop(&fx.report, &fx.backup, &mut approve)
    else {
        panic!("confirmation is disabled");
    };

    assert!(result.is_ok());
    assert_eq!(refresh.as_slice(), &[PaneId::Left, PaneId::Right]);
}

#[test]
fn stepping_up_and_resetting_round_trip() {
    let fx = layout();
    let mut panes = DualPane::new(Config {
        default_root: Some(fx.backup.clone()),
        ..Config::default()
    });

    assert!(panes.step_up(PaneId::Right).changed());
    assert_eq!(
        panes.pane(PaneId::Right).current_root(),
        &PaneRoot::Dir(fx.backup.parent().unwrap().to_path_buf())
    );

    panes.navigate(PaneId::Right, Path::new(""));
    assert!(!panes.pane(PaneId::Right).contains(&fx.backup));
    assert!(!panes.step_up(PaneId::Right).changed());

    panes.reset(PaneId::Right);
    assert_eq!(
        panes.pane(PaneId::Right).current_root(),
        &PaneRoot::Dir(fx.backup.clone())
    );
}
