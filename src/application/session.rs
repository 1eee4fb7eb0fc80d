use crate::domain::identity::Identity;
use crate::domain::ports::AuthGateway;
use crate::error::Result;
use tokio::sync::watch;
use tracing::info;

/// Holds the current authenticated identity for the process.
///
/// Constructed once at startup and injected into whatever needs it; the
/// host's auth callbacks push changes via [`SessionStore::set`], and the
/// host's app-foreground event calls [`SessionStore::on_resume`].
pub struct SessionStore {
    tx: watch::Sender<Option<Identity>>,
}

impl SessionStore {
    pub fn new(initial: Option<Identity>) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    pub fn current(&self) -> Option<Identity> {
        self.tx.borrow().clone()
    }

    /// Receiver that observes every identity change.
    pub fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.tx.subscribe()
    }

    /// Called by the host when auth state changes (sign-in, sign-out,
    /// token refresh).
    pub fn set(&self, identity: Option<Identity>) {
        self.tx.send_replace(identity);
    }

    /// Re-reads the identity when the app returns to the foreground and
    /// publishes it only if it differs from what subscribers already saw.
    pub async fn on_resume(&self, auth: &dyn AuthGateway) -> Result<()> {
        let refreshed = auth.current_identity().await?;
        let changed = self.tx.send_if_modified(|current| {
            if *current != refreshed {
                *current = refreshed.clone();
                true
            } else {
                false
            }
        });
        if changed {
            info!(
                signed_in = self.current().is_some(),
                "session refreshed on resume"
            );
        }
        Ok(())
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(None)
    }
}
