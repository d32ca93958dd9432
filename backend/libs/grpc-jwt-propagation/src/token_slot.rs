//! Shared holder for the client's current access token

use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Most recent access token, shared between the refresh task and the client call gate
///
/// Readers always observe a complete token: either the one before a `replace` or the
/// one after, never a mix. Cloning the slot shares the same underlying token.
///
/// A slot can only be created with a token in hand, so the call gate never sees an
/// empty value.
#[derive(Clone)]
pub struct TokenSlot {
    current: Arc<RwLock<Arc<str>>>,
}

impl TokenSlot {
    pub fn new(initial: impl Into<Arc<str>>) -> Self {
        Self {
            current: Arc::new(RwLock::new(initial.into())),
        }
    }

    /// Snapshot of the current token
    pub fn current(&self) -> Arc<str> {
        self.current.read().clone()
    }

    /// Overwrite the token; later `current()` calls see the new value
    pub fn replace(&self, token: impl Into<Arc<str>>) {
        *self.current.write() = token.into();
    }
}

impl fmt::Debug for TokenSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSlot")
            .field("current", &"<redacted>")
            .finish()
    }
}
