// SPDX-License-Identifier: MIT

//! Event application for the workspace domain: the only domain this
//! engine has today, but kept as its own module the way the teacher
//! codebase splits `MaterializedState::apply_event` by concern.

use super::MaterializedState;
use spaces_core::{Event, Tab, TabId, TabKind, Workspace};

pub(super) fn apply(state: &mut MaterializedState, event: &Event) {
    match event {
        Event::WorkspaceCreated {
            permanent_id,
            window_id,
            urls,
            display_name,
            is_named,
            created_at,
        } => {
            if state.get(permanent_id).is_some() {
                return; // idempotent: already materialized
            }
            let workspace = Workspace {
                permanent_id: *permanent_id,
                display_name: display_name.clone(),
                is_named: *is_named,
                urls: urls.clone(),
                is_active: window_id.is_some(),
                window_id: *window_id,
                created_at: *created_at,
                last_used: *created_at,
                last_modified: *created_at,
                version: 1,
                source_window_id: *window_id,
            };
            if workspace.is_active {
                state.active_spaces.insert(*permanent_id, workspace);
            } else {
                state.closed_spaces.insert(*permanent_id, workspace);
            }
        }

        Event::TabsUpdated { permanent_id, urls, auto_name, modified_at } => {
            if let Some(ws) = state.active_spaces.get_mut(permanent_id) {
                ws.urls = urls.clone();
                if !ws.is_named {
                    ws.display_name = auto_name.clone();
                }
                ws.last_modified = *modified_at;
                ws.last_used = *modified_at;
                ws.version += 1;
            }
        }

        Event::Renamed { permanent_id, display_name, modified_at } => {
            let ws = state
                .active_spaces
                .get_mut(permanent_id)
                .or_else(|| state.closed_spaces.get_mut(permanent_id));
            if let Some(ws) = ws {
                ws.display_name = display_name.clone();
                ws.is_named = true;
                ws.last_modified = *modified_at;
                ws.version += 1;
            }
        }

        Event::Closed { permanent_id, modified_at } => {
            if let Some(mut ws) = state.active_spaces.remove(permanent_id) {
                let tabs = ws
                    .urls
                    .iter()
                    .enumerate()
                    .map(|(index, url)| Tab {
                        tab_id: TabId::new(),
                        permanent_id: *permanent_id,
                        kind: TabKind::Closed,
                        url: url.clone(),
                        index: index as u32,
                        created_at: *modified_at,
                    })
                    .collect();
                state.tabs_by_space.insert(*permanent_id, tabs);

                ws.is_active = false;
                ws.window_id = None;
                ws.last_modified = *modified_at;
                ws.version += 1;
                state.closed_spaces.insert(*permanent_id, ws);
            }
        }

        Event::Restored { permanent_id, window_id, modified_at } => {
            if let Some(mut ws) = state.closed_spaces.remove(permanent_id) {
                ws.urls = state.closed_urls(permanent_id);
                ws.is_active = true;
                ws.window_id = Some(*window_id);
                ws.source_window_id = Some(*window_id);
                ws.last_modified = *modified_at;
                ws.last_used = *modified_at;
                ws.version += 1;
                state.active_spaces.insert(*permanent_id, ws);
            }
        }

        Event::Deleted { permanent_id } => {
            state.closed_spaces.remove(permanent_id);
            state.tabs_by_space.remove(permanent_id);
        }

        Event::IdentityBound { .. } | Event::IdentityUnbound { .. } => {
            unreachable!("identity events are applied directly in apply_event")
        }
    }
}
