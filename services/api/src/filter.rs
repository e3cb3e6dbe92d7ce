//! Message list filtering
//!
//! The list endpoint takes four optional query parameters that compose
//! with logical AND: a comma-separated set of status flags (OR across
//! the listed flags), a case-insensitive substring search and an
//! inclusive/exclusive creation date window. The filter runs over the
//! owner-scoped set already loaded from the store and never mutates it.

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{ApiError, ApiResult};
use crate::models::message::{Message, MessageQuery};

/// Status flags a message can be filtered on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFlag {
    Recent,
    Read,
    Answered,
}

impl StatusFlag {
    /// Parse one token of the `filter` parameter. Unknown tokens are
    /// dropped rather than rejected.
    fn parse(token: &str) -> Option<Self> {
        match token.trim() {
            "recent" => Some(StatusFlag::Recent),
            "read" => Some(StatusFlag::Read),
            "answered" => Some(StatusFlag::Answered),
            _ => None,
        }
    }

    fn matches(self, message: &Message) -> bool {
        match self {
            StatusFlag::Recent => message.is_recent,
            StatusFlag::Read => message.is_read,
            StatusFlag::Answered => message.is_answered,
        }
    }
}

/// Listing behaviors that are deployment policy rather than hard rules.
#[derive(Debug, Clone)]
pub struct QueryPolicy {
    /// Drop banned messages from every listing
    pub exclude_banned: bool,
    /// Include the contact email in the free-text search
    pub search_email: bool,
}

impl Default for QueryPolicy {
    fn default() -> Self {
        QueryPolicy {
            exclude_banned: true,
            search_email: true,
        }
    }
}

impl QueryPolicy {
    /// Create a QueryPolicy from environment variables
    ///
    /// # Environment Variables
    /// - `MESSAGES_EXCLUDE_BANNED`: drop banned messages (default: true)
    /// - `MESSAGES_SEARCH_EMAIL`: search the contact email too (default: true)
    pub fn from_env() -> Self {
        let default = QueryPolicy::default();

        QueryPolicy {
            exclude_banned: env_flag("MESSAGES_EXCLUDE_BANNED", default.exclude_banned),
            search_email: env_flag("MESSAGES_SEARCH_EMAIL", default.search_email),
        }
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parsed form of [`MessageQuery`]
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    /// `None` when the `filter` parameter is absent. An empty vec means
    /// the parameter was present but held no recognized flag, which
    /// selects nothing.
    flags: Option<Vec<StatusFlag>>,
    search: Option<String>,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
}

impl ListFilter {
    /// Parse the raw query parameters, rejecting malformed dates.
    pub fn from_query(query: &MessageQuery) -> ApiResult<Self> {
        let flags = query
            .filter
            .as_deref()
            .map(|raw| raw.split(',').filter_map(StatusFlag::parse).collect());

        let search = query
            .search
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|s| s.to_lowercase());

        let from = query
            .fd
            .as_deref()
            .map(|raw| parse_date(raw, "fd"))
            .transpose()?;

        let to = query
            .td
            .as_deref()
            .map(|raw| parse_date(raw, "td"))
            .transpose()?;

        Ok(ListFilter {
            flags,
            search,
            from,
            to,
        })
    }

    /// Apply the filter to an owner-scoped set of messages and order the
    /// result newest first.
    pub fn apply(&self, mut messages: Vec<Message>, policy: &QueryPolicy) -> Vec<Message> {
        messages.retain(|m| self.accepts(m, policy));
        messages.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        messages
    }

    fn accepts(&self, message: &Message, policy: &QueryPolicy) -> bool {
        if policy.exclude_banned && message.is_banned {
            return false;
        }

        if let Some(flags) = &self.flags {
            if !flags.iter().any(|flag| flag.matches(message)) {
                return false;
            }
        }

        if let Some(needle) = &self.search {
            let mut hit = contains_ci(message.title.as_deref(), needle)
                || message.content.to_lowercase().contains(needle);
            if policy.search_email {
                hit = hit || contains_ci(message.email.as_deref(), needle);
            }
            if !hit {
                return false;
            }
        }

        if let Some(from) = self.from {
            if message.created_at < from {
                return false;
            }
        }

        if let Some(to) = self.to {
            if message.created_at >= to {
                return false;
            }
        }

        true
    }
}

fn contains_ci(haystack: Option<&str>, needle: &str) -> bool {
    haystack
        .map(|h| h.to_lowercase().contains(needle))
        .unwrap_or(false)
}

/// Parse a `YYYY-MM-DD` calendar date into UTC midnight.
fn parse_date(raw: &str, param: &str) -> ApiResult<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        ApiError::InvalidParameter(format!("{}: expected a YYYY-MM-DD date, got {:?}", param, raw))
    })?;

    let midnight = date.and_time(chrono::NaiveTime::MIN);
    Ok(DateTime::from_naive_utc_and_offset(midnight, Utc))
}
