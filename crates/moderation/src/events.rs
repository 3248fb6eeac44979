//! Classification of membership-change notices.
//!
//! A notice carries either a list of newly added members or a single
//! departed member. [`classify`] turns it into exactly one
//! [`MembershipEvent`] without touching storage or the network.

use joinhider_common::types::{ChatRef, MessageId, UserId, UserRef};

/// Raw membership-change notice as delivered by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipNotice {
    pub chat: ChatRef,
    /// Id of the service message announcing the change.
    pub message_id: MessageId,
    pub added: Vec<UserRef>,
    pub departed: Option<UserRef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipEvent {
    /// The bot itself is among the added members.
    AgentAdded,
    /// Other members joined; the bot is not among them.
    MemberJoined { members: Vec<UserRef> },
    /// The bot itself left or was removed.
    AgentRemoved,
    /// Another member left.
    MemberLeft { member: UserRef },
}

/// Classify a notice relative to the bot's own identity.
///
/// Added members win over a departed member if both are present. A notice
/// with neither yields `None`.
#[must_use]
pub fn classify(notice: &MembershipNotice, agent_id: UserId) -> Option<MembershipEvent> {
    if !notice.added.is_empty() {
        if notice.added.iter().any(|m| m.id == agent_id) {
            return Some(MembershipEvent::AgentAdded);
        }
        return Some(MembershipEvent::MemberJoined {
            members: notice.added.clone(),
        });
    }

    let departed = notice.departed.as_ref()?;
    if departed.id == agent_id {
        Some(MembershipEvent::AgentRemoved)
    } else {
        Some(MembershipEvent::MemberLeft {
            member: departed.clone(),
        })
    }
}
