use joinhider_common::types::UserId;
use joinhider_config::BotConfig;

/// Owner check guarding broadcasts and statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorizationGate {
    owner_id: UserId,
}

impl AuthorizationGate {
    #[must_use]
    pub fn new(owner_id: UserId) -> Self {
        Self { owner_id }
    }

    #[must_use]
    pub fn from_config(config: &BotConfig) -> Self {
        Self::new(config.owner_id)
    }

    /// True iff an owner is configured and `caller` is that owner.
    #[must_use]
    pub fn authorize(&self, caller: UserId) -> bool {
        self.owner_id != 0 && caller == self.owner_id
    }

    /// Configured owner, if any.
    #[must_use]
    pub fn owner(&self) -> Option<UserId> {
        (self.owner_id != 0).then_some(self.owner_id)
    }
}
