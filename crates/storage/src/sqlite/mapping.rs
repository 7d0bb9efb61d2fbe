use quiz_core::model::{SessionId, SessionState};

use crate::repository::StorageError;

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn session_id_to_i64(id: SessionId) -> Result<i64, StorageError> {
    i64::try_from(id.value()).map_err(|_| StorageError::Serialization("session_id overflow".into()))
}

pub(crate) fn session_id_from_i64(v: i64) -> Result<SessionId, StorageError> {
    u64::try_from(v)
        .map(SessionId::new)
        .map_err(|_| StorageError::Serialization("session_id sign overflow".into()))
}

pub(crate) fn encode_state(state: &SessionState) -> Result<String, StorageError> {
    serde_json::to_string(state).map_err(ser)
}

pub(crate) fn decode_state(raw: &str) -> Result<SessionState, StorageError> {
    serde_json::from_str(raw).map_err(ser)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_ids_beyond_i64() {
        assert!(session_id_to_i64(SessionId::new(u64::MAX)).is_err());
        assert!(session_id_from_i64(-1).is_err());
        assert_eq!(session_id_from_i64(7).unwrap(), SessionId::new(7));
    }

    #[test]
    fn rejects_garbage_state() {
        assert!(matches!(
            decode_state("{\"finished\":{}}"),
            Err(StorageError::Serialization(_))
        ));
        assert_eq!(decode_state("\"not_started\"").unwrap(), SessionState::NotStarted);
    }
}
