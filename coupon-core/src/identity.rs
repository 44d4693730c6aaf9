use coupon_shared::ClientIdentity;

/// Supplies the identity a session claims under. The distribution services
/// never synthesize identities themselves; whoever drives them provides one.
pub trait IdentityProvider: Send + Sync {
    fn identity(&self) -> ClientIdentity;
}

/// Fixed identity, handy for tests and for callers that already resolved one
#[derive(Debug, Clone)]
pub struct StaticIdentity(pub ClientIdentity);

impl StaticIdentity {
    pub fn new(ip_address: impl Into<String>, fingerprint: impl Into<String>) -> Self {
        Self(ClientIdentity::new(ip_address, fingerprint))
    }
}

impl IdentityProvider for StaticIdentity {
    fn identity(&self) -> ClientIdentity {
        tracing::trace!("Resolved static identity {}", self.0.ip_address);
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_identity_is_stable() {
        let provider = StaticIdentity::new("192.168.1.7", "k3x9z");
        assert_eq!(provider.identity(), provider.identity());
        assert_eq!(provider.identity().key(), "192.168.1.7");
    }
}
