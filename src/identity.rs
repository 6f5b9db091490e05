//! Player identity
//!
//! A single UUID generated on first visit and reused for every session
//! afterwards, so the warehouse can stitch one player's history together.

/// LocalStorage key (used only in wasm32)
#[allow(dead_code)]
const STORAGE_KEY: &str = "player_id";

/// Load the persisted player id, generating and storing one if absent
#[cfg(target_arch = "wasm32")]
pub fn player_id() -> String {
    let storage = web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten();

    if let Some(storage) = &storage {
        if let Ok(Some(id)) = storage.get_item(STORAGE_KEY) {
            if !id.is_empty() {
                return id;
            }
        }
    }

    let id = uuid::Uuid::new_v4().to_string();
    if let Some(storage) = &storage {
        let _ = storage.set_item(STORAGE_KEY, &id);
    }
    log::info!("Generated player id {id}");
    id
}

/// Native builds get a fresh id per process
#[cfg(not(target_arch = "wasm32"))]
pub fn player_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_is_a_uuid() {
        let id = player_id();
        assert!(uuid::Uuid::parse_str(&id).is_ok());
    }
}
