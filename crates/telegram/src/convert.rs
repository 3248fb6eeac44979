//! teloxide types to moderation-core types.

use teloxide::types::{CallbackQuery, Chat, Message, User};

use {
    joinhider_channels::SentMessage,
    joinhider_common::types::{ChatKind, ChatRef, UserRef},
    joinhider_moderation::{CallbackRequest, CommandRequest, MembershipNotice},
};

pub fn chat_ref(chat: &Chat) -> ChatRef {
    let kind = if chat.is_private() {
        ChatKind::Private
    } else if chat.is_supergroup() {
        ChatKind::Supergroup
    } else if chat.is_group() {
        ChatKind::Group
    } else {
        ChatKind::Channel
    };
    ChatRef {
        id: chat.id.0,
        kind,
        title: chat.title().map(str::to_string),
    }
}

pub fn user_ref(user: &User) -> UserRef {
    UserRef {
        id: user.id.0 as i64,
        username: user.username.clone(),
        first_name: user.first_name.clone(),
    }
}

/// Join or leave service message, if `msg` is one.
pub fn membership_notice(msg: &Message) -> Option<MembershipNotice> {
    let added: Vec<UserRef> = msg
        .new_chat_members()
        .map(|members| members.iter().map(user_ref).collect())
        .unwrap_or_default();
    let departed = msg.left_chat_member().map(user_ref);
    if added.is_empty() && departed.is_none() {
        return None;
    }
    Some(MembershipNotice {
        chat: chat_ref(&msg.chat),
        message_id: msg.id.0,
        added,
        departed,
    })
}

pub fn command_request(msg: &Message) -> CommandRequest {
    CommandRequest {
        chat: chat_ref(&msg.chat),
        sender: msg.from.as_ref().map(user_ref),
        message_id: msg.id.0,
    }
}

/// Button press, if it carries callback data.
pub fn callback_request(query: &CallbackQuery) -> Option<CallbackRequest> {
    let data = query.data.clone()?;
    let chat = query.message.as_ref().map(|m| chat_ref(m.chat()));
    let message = query.message.as_ref().map(|m| SentMessage {
        chat_id: m.chat().id.0,
        message_id: m.id().0,
    });
    Some(CallbackRequest {
        id: query.id.clone(),
        data,
        from: user_ref(&query.from),
        chat,
        message,
    })
}
