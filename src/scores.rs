//! Best-score tracking
//!
//! A single high-water mark persisted to LocalStorage, updated only when
//! a finished session strictly beats it. The slot is shared across
//! sessions; it is not scoped to a player or session id.

/// LocalStorage key (used only in wasm32)
#[allow(dead_code)]
const STORAGE_KEY: &str = "best_score";

#[derive(Debug, Clone, Copy, Default)]
pub struct BestScore {
    best: u32,
}

impl BestScore {
    pub fn new(best: u32) -> Self {
        Self { best }
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    /// Record a finished session. Returns the new best when `final_score`
    /// strictly exceeds the stored one; a tie changes nothing and emits
    /// nothing downstream.
    pub fn record(&mut self, final_score: u32) -> Option<u32> {
        if final_score > self.best {
            self.best = final_score;
            self.save();
            Some(self.best)
        } else {
            None
        }
    }

    /// Load the persisted best from LocalStorage (WASM only); missing or
    /// malformed values read as zero
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(value)) = storage.get_item(STORAGE_KEY) {
                if let Ok(best) = value.parse() {
                    log::info!("Loaded best score: {best}");
                    return Self { best };
                }
            }
        }

        Self::default()
    }

    #[cfg(target_arch = "wasm32")]
    fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            let _ = storage.set_item(STORAGE_KEY, &self.best.to_string());
            log::info!("Best score saved: {}", self.best);
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn save(&self) {
        // No-op for native
    }
}
