//! Narrows: parsed filter terms bound to the user context they are evaluated in.
//!
//! A [`Narrow`] is the only thing the reconciler knows about filtering. It
//! exposes one predicate (`matches`) and a few derived properties; everything
//! operator-specific lives in [`TermKind`].
//!
//! # Textual form
//! - `stream:general topic:lunch` - whitespace-separated `operator:operand` tokens
//! - `topic:"lunch plans"` - double quotes group operands containing spaces
//! - `-is:starred` - leading `-` negates a term
//! - `deploy failed` - bare words become a single `search` term
//! - `sender:me` - `me` resolves to the configured current user

use super::message::{Message, MessageId, Recipient, UserId};
use super::term::{HasOperand, InOperand, IsOperand, Term, TermKind};
use crate::config::CoreConfig;
use crate::constants::{operators, ME_OPERAND};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NarrowError {
    #[error("Unknown operator: {0}")]
    UnknownOperator(String),

    #[error("Empty operand for operator {operator}")]
    EmptyOperand { operator: String },

    #[error("Invalid message id for {operator}: {operand}")]
    InvalidMessageId { operator: String, operand: String },

    #[error("Invalid user id for {operator}: {operand}")]
    InvalidUserId { operator: String, operand: String },

    #[error("Unknown operand for {operator}: {operand}")]
    UnknownOperand { operator: String, operand: String },

    #[error("Unterminated quote in narrow: {0}")]
    UnterminatedQuote(String),

    #[error("'me' used for {operator} but no current user is configured")]
    MeWithoutCurrentUser { operator: String },

    #[error("Operator {0} cannot be negated")]
    CannotNegate(String),
}

#[derive(Debug, Clone)]
pub struct Narrow {
    terms: Vec<Term>,
    config: Arc<CoreConfig>,
}

impl PartialEq for Narrow {
    fn eq(&self, other: &Self) -> bool {
        self.terms == other.terms
    }
}

impl Eq for Narrow {}

impl Narrow {
    pub fn new(terms: Vec<Term>, config: Arc<CoreConfig>) -> Self {
        Self { terms, config }
    }

    /// Parse the textual form of a narrow. See the module docs for the syntax.
    pub fn parse(input: &str, config: Arc<CoreConfig>) -> Result<Self, NarrowError> {
        let mut terms = Vec::new();
        let mut search_words: Vec<String> = Vec::new();

        for token in tokenize(input)? {
            let (raw_operator, operand) = match split_operator(&token) {
                Some(parts) => parts,
                None => {
                    search_words.push(token.clone());
                    continue;
                }
            };

            let (negated, operator) = match raw_operator.strip_prefix('-') {
                Some(op) => (true, op),
                None => (false, raw_operator),
            };

            let kind = parse_term_kind(&operator.to_lowercase(), operand, &config)?;
            if negated && !kind.can_negate() {
                return Err(NarrowError::CannotNegate(kind.operator().to_string()));
            }
            terms.push(Term { kind, negated });
        }

        if !search_words.is_empty() {
            terms.push(Term::new(TermKind::Search(search_words.join(" "))));
        }

        Ok(Self { terms, config })
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// An empty narrow matches every message.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Whether the message belongs to this narrow.
    ///
    /// Narrows that exclude muted topics drop messages in muted topics here,
    /// so callers see one predicate for both.
    pub fn matches(&self, message: &Message) -> bool {
        if self.excludes_muted_topics() {
            if let Recipient::Stream { stream, topic } = &message.recipient {
                if self.config.is_topic_muted(stream, topic) {
                    return false;
                }
            }
        }
        self.terms.iter().all(|term| term.matches(message, &self.config))
    }

    /// The narrow pins a specific message id as its viewing anchor.
    pub fn is_anchored_near(&self) -> bool {
        self.near_target().is_some()
    }

    /// Anchor id of the `near` term, if any.
    pub fn near_target(&self) -> Option<MessageId> {
        self.terms.iter().find_map(|term| match term.kind {
            TermKind::Near(id) if term.is_positive() => Some(id),
            _ => None,
        })
    }

    /// False when matching requires the server (full-text search).
    pub fn unread_computable_locally(&self) -> bool {
        !self
            .terms
            .iter()
            .any(|term| matches!(term.kind, TermKind::Search(_)))
    }

    /// True for broad views that do not name a conversation, sender or
    /// anchor. Such views hide messages in muted topics.
    pub fn excludes_muted_topics(&self) -> bool {
        !self.terms.iter().filter(|t| t.is_positive()).any(|term| {
            matches!(
                term.kind,
                TermKind::Stream(_)
                    | TermKind::Topic(_)
                    | TermKind::Near(_)
                    | TermKind::Id(_)
                    | TermKind::Sender(_)
                    | TermKind::Dm(_)
                    | TermKind::DmIncluding(_)
                    | TermKind::Search(_)
                    | TermKind::Is(
                        IsOperand::Starred
                            | IsOperand::Mentioned
                            | IsOperand::Alerted
                            | IsOperand::Dm
                    )
                    | TermKind::In(InOperand::All)
            )
        })
    }
}

impl fmt::Display for Narrow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{term}")?;
        }
        Ok(())
    }
}

/// Split on whitespace outside double quotes. Quotes are removed.
fn tokenize(input: &str) -> Result<Vec<String>, NarrowError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in input.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }

    if in_quotes {
        return Err(NarrowError::UnterminatedQuote(input.to_string()));
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    Ok(tokens)
}

/// `op:operand` -> `Some((op, operand))`. Tokens without an operator are
/// search words.
fn split_operator(token: &str) -> Option<(&str, &str)> {
    let (operator, operand) = token.split_once(':')?;
    if operator.is_empty() || operator == "-" {
        return None;
    }
    Some((operator, operand))
}

fn parse_term_kind(
    operator: &str,
    operand: &str,
    config: &CoreConfig,
) -> Result<TermKind, NarrowError> {
    let operand = operand.trim();
    if operand.is_empty() {
        return Err(NarrowError::EmptyOperand {
            operator: operator.to_string(),
        });
    }

    let unknown_operand = || NarrowError::UnknownOperand {
        operator: operator.to_string(),
        operand: operand.to_string(),
    };

    let kind = match operator {
        operators::STREAM | operators::CHANNEL => TermKind::Stream(operand.to_string()),
        operators::TOPIC | operators::SUBJECT => TermKind::Topic(operand.to_string()),
        operators::NEAR => TermKind::Near(parse_message_id(operator, operand)?),
        operators::ID => TermKind::Id(parse_message_id(operator, operand)?),
        operators::IS => TermKind::Is(IsOperand::parse(operand).ok_or_else(unknown_operand)?),
        operators::HAS => TermKind::Has(HasOperand::parse(operand).ok_or_else(unknown_operand)?),
        operators::IN => TermKind::In(InOperand::parse(operand).ok_or_else(unknown_operand)?),
        operators::SENDER | operators::FROM => {
            TermKind::Sender(parse_user_id(operator, operand, config)?)
        }
        operators::DM | operators::PM_WITH => {
            let mut users = Vec::new();
            for part in operand.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                users.push(parse_user_id(operator, part, config)?);
            }
            if users.is_empty() {
                return Err(NarrowError::EmptyOperand {
                    operator: operator.to_string(),
                });
            }
            users.sort_unstable();
            users.dedup();
            TermKind::Dm(users)
        }
        operators::DM_INCLUDING | operators::GROUP_PM_WITH => {
            TermKind::DmIncluding(parse_user_id(operator, operand, config)?)
        }
        operators::SEARCH => TermKind::Search(operand.to_string()),
        other => return Err(NarrowError::UnknownOperator(other.to_string())),
    };
    Ok(kind)
}

fn parse_message_id(operator: &str, operand: &str) -> Result<MessageId, NarrowError> {
    match operand.parse::<MessageId>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(NarrowError::InvalidMessageId {
            operator: operator.to_string(),
            operand: operand.to_string(),
        }),
    }
}

fn parse_user_id(operator: &str, operand: &str, config: &CoreConfig) -> Result<UserId, NarrowError> {
    if operand.eq_ignore_ascii_case(ME_OPERAND) {
        return config
            .current_user_id
            .ok_or_else(|| NarrowError::MeWithoutCurrentUser {
                operator: operator.to_string(),
            });
    }
    operand.parse::<UserId>().map_err(|_| NarrowError::InvalidUserId {
        operator: operator.to_string(),
        operand: operand.to_string(),
    })
}
