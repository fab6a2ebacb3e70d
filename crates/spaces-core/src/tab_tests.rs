// SPDX-License-Identifier: MIT

use super::*;
use crate::workspace::WorkspaceId;

fn tab(index: u32) -> Tab {
    Tab {
        tab_id: TabId::new(),
        permanent_id: WorkspaceId::new(),
        kind: TabKind::Closed,
        url: format!("https://example.com/{index}"),
        index,
        created_at: 0,
    }
}

#[test]
fn tabs_sort_by_index() {
    let mut tabs = vec![tab(2), tab(0), tab(1)];
    tabs.sort_by_key(|t| t.index);
    let urls: Vec<_> = tabs.iter().map(|t| t.url.clone()).collect();
    assert_eq!(
        urls,
        vec![
            "https://example.com/0",
            "https://example.com/1",
            "https://example.com/2",
        ]
    );
}

#[test]
fn tab_id_has_stable_prefix() {
    let t = tab(0);
    assert!(t.tab_id.as_str().starts_with("tab-"));
}
