use serde::{Deserialize, Serialize};

use crate::core::{CameraState, Viewport};
use crate::error::{GrapherError, GrapherResult};
use crate::interaction::InteractionMode;

use super::{EngineStatus, LoopState};

pub const SESSION_SNAPSHOT_JSON_SCHEMA_V1: u32 = 1;

/// Serializable session state used by regression tests and debugging tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub surface: String,
    pub status: EngineStatus,
    pub loop_state: LoopState,
    pub viewport: Viewport,
    pub target_camera: CameraState,
    pub live_camera: Option<CameraState>,
    pub interaction_mode: InteractionMode,
    pub ticks_rendered: u64,
    pub tick_faults: u64,
    pub pending_notifications: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshotJsonContractV1 {
    pub schema_version: u32,
    pub snapshot: SessionSnapshot,
}

impl SessionSnapshot {
    pub fn to_json_contract_v1_pretty(&self) -> GrapherResult<String> {
        let payload = SessionSnapshotJsonContractV1 {
            schema_version: SESSION_SNAPSHOT_JSON_SCHEMA_V1,
            snapshot: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            GrapherError::InvalidData(format!("failed to serialize snapshot contract v1: {e}"))
        })
    }

    /// Accepts either a bare snapshot or a versioned contract payload.
    pub fn from_json_compat_str(input: &str) -> GrapherResult<Self> {
        if let Ok(snapshot) = serde_json::from_str::<SessionSnapshot>(input) {
            return Ok(snapshot);
        }
        let payload: SessionSnapshotJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            GrapherError::InvalidData(format!("failed to parse snapshot json payload: {e}"))
        })?;
        if payload.schema_version != SESSION_SNAPSHOT_JSON_SCHEMA_V1 {
            return Err(GrapherError::InvalidData(format!(
                "unsupported snapshot schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::SessionSnapshot;
    use crate::api::{EngineStatus, LoopState};
    use crate::core::{CameraState, Viewport};
    use crate::error::GrapherError;
    use crate::interaction::InteractionMode;

    fn snapshot() -> SessionSnapshot {
        SessionSnapshot {
            surface: "#graph-canvas".to_owned(),
            status: EngineStatus::Ready,
            loop_state: LoopState::Running,
            viewport: Viewport::new(800, 600),
            target_camera: CameraState::new(0.5, 0.25, 1.0),
            live_camera: Some(CameraState::new(0.0, 0.0, 8.0)),
            interaction_mode: InteractionMode::Idle,
            ticks_rendered: 12,
            tick_faults: 0,
            pending_notifications: 0,
        }
    }

    #[test]
    fn contract_and_bare_payloads_both_parse() {
        let snapshot = snapshot();
        let contract = snapshot.to_json_contract_v1_pretty().expect("contract");
        assert!(contract.contains("\"schema_version\": 1"));
        assert_eq!(
            SessionSnapshot::from_json_compat_str(&contract).expect("contract parse"),
            snapshot
        );

        let bare = serde_json::to_string(&snapshot).expect("bare");
        assert_eq!(
            SessionSnapshot::from_json_compat_str(&bare).expect("bare parse"),
            snapshot
        );
    }

    #[test]
    fn unknown_schema_version_is_rejected() {
        let contract = snapshot()
            .to_json_contract_v1_pretty()
            .expect("contract")
            .replace("\"schema_version\": 1", "\"schema_version\": 7");
        let err = SessionSnapshot::from_json_compat_str(&contract).expect_err("version");
        assert!(matches!(err, GrapherError::InvalidData(msg) if msg.contains("7")));
    }
}
