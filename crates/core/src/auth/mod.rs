//! Account access: login, registration, emergency bypass and the session
//! that remembers them.

mod service;
mod session;
mod traits;
mod types;

pub use service::AuthService;
pub use session::{SessionError, SessionStore};
pub use traits::*;
pub use types::*;

use std::sync::Arc;

use crate::config::SessionConfig;

/// Open the session store described by config.
pub fn open_session(config: &SessionConfig) -> Arc<SessionStore> {
    Arc::new(SessionStore::open(&config.path, config.emergency_bypass))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_session_from_config() {
        let dir = TempDir::new().unwrap();
        let config = SessionConfig {
            path: dir.path().join("s.json"),
            emergency_bypass: false,
        };
        let store = open_session(&config);
        assert!(!store.emergency_bypass());
        assert!(!store.is_authenticated());
    }
}
