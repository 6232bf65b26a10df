use super::message::{Message, MessageId, Recipient, UserId};
use crate::config::CoreConfig;
use crate::constants::{operators, RESOLVED_TOPIC_PREFIX};
use serde::Serialize;
use std::fmt;

/// Operand of an `is:` term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IsOperand {
    Dm,
    Starred,
    Mentioned,
    Alerted,
    Unread,
    Resolved,
}

impl IsOperand {
    pub fn parse(operand: &str) -> Option<Self> {
        match operand.to_lowercase().as_str() {
            "dm" | "private" => Some(Self::Dm),
            "starred" => Some(Self::Starred),
            "mentioned" => Some(Self::Mentioned),
            "alerted" => Some(Self::Alerted),
            "unread" => Some(Self::Unread),
            "resolved" => Some(Self::Resolved),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dm => "dm",
            Self::Starred => "starred",
            Self::Mentioned => "mentioned",
            Self::Alerted => "alerted",
            Self::Unread => "unread",
            Self::Resolved => "resolved",
        }
    }
}

/// Operand of a `has:` term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HasOperand {
    Link,
    Attachment,
    Image,
}

impl HasOperand {
    pub fn parse(operand: &str) -> Option<Self> {
        match operand.to_lowercase().as_str() {
            "link" => Some(Self::Link),
            "attachment" => Some(Self::Attachment),
            "image" => Some(Self::Image),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Link => "link",
            Self::Attachment => "attachment",
            Self::Image => "image",
        }
    }
}

/// Operand of an `in:` term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InOperand {
    Home,
    All,
}

impl InOperand {
    pub fn parse(operand: &str) -> Option<Self> {
        match operand.to_lowercase().as_str() {
            "home" => Some(Self::Home),
            "all" => Some(Self::All),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::All => "all",
        }
    }
}

/// One filter term of a narrow, with its operand already parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "operator", content = "operand", rename_all = "kebab-case")]
pub enum TermKind {
    Stream(String),
    Topic(String),
    /// Viewing anchor. Does not restrict which messages match.
    Near(MessageId),
    Id(MessageId),
    Is(IsOperand),
    Has(HasOperand),
    In(InOperand),
    Sender(UserId),
    /// Exact set of direct-message participants other than the current user
    Dm(Vec<UserId>),
    DmIncluding(UserId),
    /// Full-text search. Only the server can evaluate it.
    Search(String),
}

impl TermKind {
    pub fn operator(&self) -> &'static str {
        match self {
            Self::Stream(_) => operators::STREAM,
            Self::Topic(_) => operators::TOPIC,
            Self::Near(_) => operators::NEAR,
            Self::Id(_) => operators::ID,
            Self::Is(_) => operators::IS,
            Self::Has(_) => operators::HAS,
            Self::In(_) => operators::IN,
            Self::Sender(_) => operators::SENDER,
            Self::Dm(_) => operators::DM,
            Self::DmIncluding(_) => operators::DM_INCLUDING,
            Self::Search(_) => operators::SEARCH,
        }
    }

    pub fn operand(&self) -> String {
        match self {
            Self::Stream(s) | Self::Topic(s) | Self::Search(s) => s.clone(),
            Self::Near(id) | Self::Id(id) => id.to_string(),
            Self::Is(op) => op.as_str().to_string(),
            Self::Has(op) => op.as_str().to_string(),
            Self::In(op) => op.as_str().to_string(),
            Self::Sender(user) | Self::DmIncluding(user) => user.to_string(),
            Self::Dm(users) => users
                .iter()
                .map(|u| u.to_string())
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    /// Whether `-operator:operand` is meaningful for this term.
    pub fn can_negate(&self) -> bool {
        !matches!(self, Self::Near(_) | Self::Search(_))
    }

    /// Evaluates the term against a message, ignoring negation.
    ///
    /// Attributes a message doesn't carry (a topic on a direct message, a
    /// participant set on a stream message) never match.
    fn matches(&self, message: &Message, config: &CoreConfig) -> bool {
        match self {
            Self::Stream(stream) => message
                .stream_name()
                .is_some_and(|name| name.to_lowercase() == stream.to_lowercase()),
            Self::Topic(topic) => message
                .topic()
                .is_some_and(|name| name.to_lowercase() == topic.to_lowercase()),
            // Search text is only evaluated by the server; reconcile never
            // filters the cache for a narrow containing it.
            Self::Near(_) | Self::Search(_) => true,
            Self::Id(id) => message.id == *id,
            Self::Is(op) => match op {
                IsOperand::Dm => message.is_private(),
                IsOperand::Starred => message.flags.starred,
                IsOperand::Mentioned => message.flags.mentioned,
                IsOperand::Alerted => message.flags.has_alert_word,
                IsOperand::Unread => message.is_unread(),
                IsOperand::Resolved => message
                    .topic()
                    .is_some_and(|topic| topic.starts_with(RESOLVED_TOPIC_PREFIX)),
            },
            Self::Has(op) => match op {
                HasOperand::Link => message.flags.has_link,
                HasOperand::Attachment => message.flags.has_attachment,
                HasOperand::Image => message.flags.has_image,
            },
            Self::In(op) => match op {
                InOperand::All => true,
                InOperand::Home => match &message.recipient {
                    Recipient::Stream { stream, .. } => !config.is_stream_muted(stream),
                    Recipient::Private { .. } => true,
                },
            },
            Self::Sender(user) => message.sender_id == *user,
            Self::Dm(users) => {
                message.is_private()
                    && without_current_user(message.participants(), config.current_user_id)
                        == without_current_user(users.clone(), config.current_user_id)
            }
            Self::DmIncluding(user) => message.participants().contains(user),
        }
    }
}

/// Canonical participant set: sorted, deduplicated, and without the current
/// user unless the conversation is with themselves only.
fn without_current_user(mut ids: Vec<UserId>, current_user: Option<UserId>) -> Vec<UserId> {
    ids.sort_unstable();
    ids.dedup();
    if let Some(me) = current_user {
        if ids.len() > 1 {
            ids.retain(|id| *id != me);
        }
    }
    ids
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Term {
    #[serde(flatten)]
    pub kind: TermKind,
    pub negated: bool,
}

impl Term {
    pub fn new(kind: TermKind) -> Self {
        Self {
            kind,
            negated: false,
        }
    }

    pub fn negated(kind: TermKind) -> Self {
        Self {
            kind,
            negated: true,
        }
    }

    /// Negated terms never name a conversation or an anchor.
    pub(crate) fn is_positive(&self) -> bool {
        !self.negated
    }

    pub fn matches(&self, message: &Message, config: &CoreConfig) -> bool {
        self.kind.matches(message, config) != self.negated
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operand = self.kind.operand();
        if let TermKind::Search(_) = self.kind {
            return write!(f, "{operand}");
        }
        if self.negated {
            write!(f, "-")?;
        }
        if operand.chars().any(char::is_whitespace) {
            write!(f, "{}:\"{}\"", self.kind.operator(), operand)
        } else {
            write!(f, "{}:{}", self.kind.operator(), operand)
        }
    }
}
