use fluxpos_domain::entity::EntityKind;
use fluxpos_domain::outbox::OutboxAction;

/// Sync engine error variants.
///
/// Per-record delivery failures are not errors — they are recorded on the
/// outbox row (`failed` + `last_error`) and the drain continues. This enum
/// covers problems the engine itself cannot absorb: rejected enqueue input
/// and local store faults.
#[derive(Debug, thiserror::Error)]
pub enum SyncServiceError {
    #[error("unsupported action {action} for entity {entity}")]
    UnsupportedAction {
        entity: EntityKind,
        action: OutboxAction,
    },
    #[error("payload has no usable id field")]
    PayloadMissingId,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl SyncServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedAction { .. } => "UNSUPPORTED_ACTION",
            Self::PayloadMissingId => "PAYLOAD_MISSING_ID",
            Self::Internal(_) => "INTERNAL",
        }
    }
}
