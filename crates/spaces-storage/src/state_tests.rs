// SPDX-License-Identifier: MIT

use super::*;
use spaces_core::{Event, WindowId, WorkspaceId};

fn created(id: WorkspaceId, window: Option<WindowId>, urls: &[&str]) -> Event {
    Event::WorkspaceCreated {
        permanent_id: id,
        window_id: window,
        urls: urls.iter().map(|s| s.to_string()).collect(),
        display_name: "Workspace".into(),
        is_named: false,
        created_at: 0,
    }
}

#[test]
fn created_event_lands_in_active_when_window_present() {
    let id = WorkspaceId::new();
    let mut state = MaterializedState::default();
    state.apply_event(&created(id, Some(WindowId::new(1)), &["https://a.com"]));

    assert!(state.active_spaces.contains_key(&id));
    assert!(!state.closed_spaces.contains_key(&id));
}

#[test]
fn created_event_is_idempotent() {
    let id = WorkspaceId::new();
    let mut state = MaterializedState::default();
    let event = created(id, Some(WindowId::new(1)), &["https://a.com"]);
    state.apply_event(&event);
    state.apply_event(&event);

    assert_eq!(state.active_spaces.len(), 1);
    assert_eq!(state.active_spaces[&id].version, 1);
}

#[test]
fn close_then_restore_preserves_url_order() {
    let id = WorkspaceId::new();
    let mut state = MaterializedState::default();
    state.apply_event(&created(
        id,
        Some(WindowId::new(42)),
        &["https://a.com", "https://b.com", "https://c.com"],
    ));

    state.apply_event(&Event::Closed { permanent_id: id, modified_at: 1 });
    assert!(state.closed_spaces.contains_key(&id));
    assert!(!state.active_spaces.contains_key(&id));
    assert_eq!(
        state.closed_urls(&id),
        vec!["https://a.com", "https://b.com", "https://c.com"]
    );

    state.apply_event(&Event::Restored { permanent_id: id, window_id: WindowId::new(99), modified_at: 2 });
    let restored = &state.active_spaces[&id];
    assert_eq!(restored.window_id, Some(WindowId::new(99)));
    assert_ne!(restored.window_id, Some(WindowId::new(42)));
    assert_eq!(
        restored.urls,
        vec!["https://a.com", "https://b.com", "https://c.com"]
    );
}

#[test]
fn rename_bumps_version_and_sets_is_named() {
    let id = WorkspaceId::new();
    let mut state = MaterializedState::default();
    state.apply_event(&created(id, Some(WindowId::new(1)), &[]));

    state.apply_event(&Event::Renamed { permanent_id: id, display_name: "Dev".into(), modified_at: 5 });
    let ws = &state.active_spaces[&id];
    assert_eq!(ws.display_name, "Dev");
    assert!(ws.is_named);
    assert_eq!(ws.version, 2);
}

#[test]
fn tabs_updated_does_not_override_a_user_name() {
    let id = WorkspaceId::new();
    let mut state = MaterializedState::default();
    state.apply_event(&created(id, Some(WindowId::new(1)), &[]));
    state.apply_event(&Event::Renamed { permanent_id: id, display_name: "Dev".into(), modified_at: 1 });

    state.apply_event(&Event::TabsUpdated {
        permanent_id: id,
        urls: vec!["https://example.com".into()],
        auto_name: "example.com".into(),
        modified_at: 2,
    });

    assert_eq!(state.active_spaces[&id].display_name, "Dev");
}

#[test]
fn delete_cascades_tab_records() {
    let id = WorkspaceId::new();
    let mut state = MaterializedState::default();
    state.apply_event(&created(id, Some(WindowId::new(1)), &["https://a.com"]));
    state.apply_event(&Event::Closed { permanent_id: id, modified_at: 1 });
    assert!(state.tabs_by_space.contains_key(&id));

    state.apply_event(&Event::Deleted { permanent_id: id });
    assert!(!state.closed_spaces.contains_key(&id));
    assert!(!state.tabs_by_space.contains_key(&id));
}

#[test]
fn identity_bind_and_unbind_round_trip() {
    let id = WorkspaceId::new();
    let window = WindowId::new(7);
    let mut state = MaterializedState::default();
    state.apply_event(&Event::IdentityBound { window_id: window, permanent_id: id });
    assert_eq!(state.meta.permanent_id_mappings.get(&window), Some(&id));

    state.apply_event(&Event::IdentityUnbound { window_id: window });
    assert!(!state.meta.permanent_id_mappings.contains_key(&window));
}
