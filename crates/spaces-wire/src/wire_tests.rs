// SPDX-License-Identifier: MIT

use super::*;
use proptest::prelude::*;
use spaces_core::WorkspaceId;
use std::collections::HashMap;

#[test]
fn observer_request_round_trips_through_json() {
    let req = ObserverRequest::RenameSpace { permanent_id: WorkspaceId::new(), name: "Dev".into() };
    let json = serde_json::to_string(&req).unwrap();
    assert!(json.starts_with(r#"{"type":"RenameSpace""#));
    let back: ObserverRequest = serde_json::from_str(&json).unwrap();
    assert_eq!(back, req);
}

#[yare::parameterized(
    ok = { Response::Ok, r#"{"type":"Ok"}"# },
    error = { Response::Error { message: "unknown workspace".into() }, r#"{"type":"Error","message":"unknown workspace"}"# },
)]
fn response_tag_matches_variant_name(resp: Response, expected_json: &str) {
    let json = serde_json::to_string(&resp).unwrap();
    assert_eq!(json, expected_json);
    let back: Response = serde_json::from_str(&json).unwrap();
    assert_eq!(back, resp);
}

#[test]
fn broadcast_state_updated_round_trips_with_empty_snapshot() {
    let msg = Broadcast::StateUpdated {
        snapshot: StateSnapshot::new(vec![], vec![]),
        touched: vec![WorkspaceId::new()],
    };
    let json = serde_json::to_string(&msg).unwrap();
    let back: Broadcast = serde_json::from_str(&json).unwrap();
    assert_eq!(back, msg);
}

#[test]
fn export_document_round_trips() {
    let doc = ExportDocument {
        version: "1.0.0".into(),
        timestamp: 1_000,
        spaces: SpacesSection { active: HashMap::new(), closed: HashMap::new() },
        metadata: ExportMetadata { exported_by: "test".into(), description: None },
    };
    let json = serde_json::to_string(&doc).unwrap();
    let back: ExportDocument = serde_json::from_str(&json).unwrap();
    assert_eq!(back, doc);
}

fn doc() -> ExportDocument {
    ExportDocument {
        version: "1.0.0".into(),
        timestamp: 0,
        spaces: SpacesSection { active: HashMap::new(), closed: HashMap::new() },
        metadata: ExportMetadata { exported_by: "test".into(), description: None },
    }
}

fn snapshot() -> StateSnapshot {
    StateSnapshot::new(vec![spaces_core::Workspace::builder().build()], vec![])
}

fn all_requests() -> Vec<ObserverRequest> {
    let id = WorkspaceId::new();
    vec![
        ObserverRequest::GetSpaces,
        ObserverRequest::RenameSpace { permanent_id: id, name: "Dev".into() },
        ObserverRequest::CloseSpace { window_id: spaces_core::WindowId::new(1) },
        ObserverRequest::RestoreSpace { permanent_id: id },
        ObserverRequest::DeleteClosed { permanent_id: id },
        ObserverRequest::ImportDocument { doc: doc(), options: ImportOptions::default() },
        ObserverRequest::ExportDocument,
        ObserverRequest::Reload,
    ]
}

fn all_responses() -> Vec<Response> {
    vec![
        Response::Ok,
        Response::Spaces { snapshot: snapshot() },
        Response::Exported { doc: Box::new(doc()) },
        Response::Imported { imported_counts: ImportedCounts::default(), errors: vec![] },
        Response::Restored { window_id: spaces_core::WindowId::new(1) },
        Response::Error { message: "boom".into() },
    ]
}

fn all_broadcasts() -> Vec<Broadcast> {
    vec![
        Broadcast::StateUpdated { snapshot: snapshot(), touched: vec![WorkspaceId::new()] },
        Broadcast::ImportCompleted {
            imported_counts: ImportedCounts::default(),
            errors: vec![ImportFieldError { field: "spaces.active".into(), message: "bad".into() }],
        },
    ]
}

proptest! {
    #[test]
    fn observer_request_serde_roundtrip(req in proptest::sample::select(all_requests())) {
        let json = serde_json::to_string(&req).unwrap();
        let back: ObserverRequest = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, req);
    }

    #[test]
    fn response_serde_roundtrip(resp in proptest::sample::select(all_responses())) {
        let json = serde_json::to_string(&resp).unwrap();
        let back: Response = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, resp);
    }

    #[test]
    fn broadcast_serde_roundtrip(msg in proptest::sample::select(all_broadcasts())) {
        let json = serde_json::to_string(&msg).unwrap();
        let back: Broadcast = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, msg);
    }
}
