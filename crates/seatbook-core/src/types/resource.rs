//! Seat identifiers, hold owners, and seat status.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::types::id::UserId;

/// Maximum length of a client-supplied client id.
pub const MAX_CLIENT_ID_LEN: usize = 64;

/// A seat, addressed by coach and seat number. The canonical text form is
/// `C{coach}-S{seat}`, e.g. `C3-S10`. Both numbers start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceId {
    coach: u16,
    seat: u16,
}

impl ResourceId {
    /// Build a resource id. Returns `None` when either number is zero.
    pub fn new(coach: u16, seat: u16) -> Option<Self> {
        if coach == 0 || seat == 0 {
            return None;
        }
        Some(Self { coach, seat })
    }

    /// Coach number.
    pub fn coach(&self) -> u16 {
        self.coach
    }

    /// Seat number within the coach.
    pub fn seat(&self) -> u16 {
        self.seat
    }

    /// Every seat of a `coaches` × `seats_per_coach` inventory, in order.
    pub fn inventory(coaches: u16, seats_per_coach: u16) -> Vec<Self> {
        (1..=coaches)
            .flat_map(|coach| (1..=seats_per_coach).map(move |seat| Self { coach, seat }))
            .collect()
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{}-S{}", self.coach, self.seat)
    }
}

fn parse_number(part: &str) -> Option<u16> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

impl FromStr for ResourceId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AppError::validation(format!("Invalid resource id: '{s}'"));

        let rest = s.strip_prefix('C').ok_or_else(invalid)?;
        let (coach, seat) = rest.split_once("-S").ok_or_else(invalid)?;
        let coach = parse_number(coach).ok_or_else(invalid)?;
        let seat = parse_number(seat).ok_or_else(invalid)?;

        Self::new(coach, seat).ok_or_else(invalid)
    }
}

impl TryFrom<String> for ResourceId {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ResourceId> for String {
    fn from(id: ResourceId) -> String {
        id.to_string()
    }
}

/// Per-tab identifier chosen by the client. Restricted to
/// `[A-Za-z0-9_-]{1,64}` so it can be embedded in a holder id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClientId(String);

impl ClientId {
    /// Borrow the raw value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ClientId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let valid = !s.is_empty()
            && s.len() <= MAX_CLIENT_ID_LEN
            && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
        if !valid {
            return Err(AppError::validation(format!(
                "client_id must be 1-{MAX_CLIENT_ID_LEN} characters of [A-Za-z0-9_-]"
            )));
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for ClientId {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClientId> for String {
    fn from(id: ClientId) -> String {
        id.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The value stored in a lock entry: who holds the seat.
///
/// Built server-side as `{user_id}/{client_id}` so a holder id can only
/// ever name the authenticated user that created it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HolderId(String);

impl HolderId {
    /// Compose the holder id for a verified user and one of their clients.
    pub fn compose(user_id: &UserId, client_id: &ClientId) -> Self {
        Self(format!("{user_id}/{client_id}"))
    }

    /// Wrap a value read back from the lock store.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Borrow the raw value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The user portion, if the value was produced by [`HolderId::compose`].
    pub fn user_id(&self) -> Option<UserId> {
        self.0.split_once('/').and_then(|(user, _)| user.parse().ok())
    }
}

impl fmt::Display for HolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Externally visible status of a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceStatus {
    /// Free to acquire.
    Available,
    /// Under a live, TTL-bounded hold.
    Held,
    /// Permanently booked. Terminal.
    Allocated,
}

impl ResourceStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Held => "held",
            Self::Allocated => "allocated",
        }
    }

    /// No transition ever leaves a terminal status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Allocated)
    }
}

impl fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "available" => Ok(Self::Available),
            "held" => Ok(Self::Held),
            "allocated" => Ok(Self::Allocated),
            _ => Err(AppError::validation(format!(
                "Invalid resource status: '{s}'"
            ))),
        }
    }
}
