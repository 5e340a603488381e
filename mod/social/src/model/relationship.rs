use serde::{Deserialize, Serialize};

/// The kind of a directed relationship edge.
///
/// One enum everywhere — edge rows, precondition checks, error mapping —
/// never a raw string discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipKind {
    /// Accepted following relationship.
    Follow,
    /// Pending follow request against a private account.
    Request,
    /// Unilateral block; clears prior follow state in both directions.
    Block,
    /// Unilateral suppression; no visibility effect.
    Mute,
}

impl RelationshipKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipKind::Follow => "follow",
            RelationshipKind::Request => "request",
            RelationshipKind::Block => "block",
            RelationshipKind::Mute => "mute",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "follow" => Some(RelationshipKind::Follow),
            "request" => Some(RelationshipKind::Request),
            "block" => Some(RelationshipKind::Block),
            "mute" => Some(RelationshipKind::Mute),
            _ => None,
        }
    }
}

/// A directed relationship edge between two accounts.
///
/// At most one edge exists per (from_id, to_id, kind) — enforced by the
/// schema. The `id` stays stable when a REQUEST edge is promoted to FOLLOW
/// in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relationship {
    /// Unique identifier (UUIDv4, no dashes).
    pub id: String,

    /// The account that initiated the relationship.
    pub from_id: String,

    /// The account the relationship points at.
    pub to_id: String,

    /// FOLLOW / REQUEST / BLOCK / MUTE.
    pub kind: RelationshipKind,

    /// Free-form note the initiator attached (e.g. a block reason).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// RFC 3339 creation timestamp.
    pub created_at: String,

    /// RFC 3339 last update timestamp.
    pub updated_at: String,
}

/// A relationship-changing operation, as named by the API surface.
///
/// The mapping from operation to edge kind and transition direction is a
/// total function — the compiler keeps it exhaustive when a new operation
/// is added.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationshipOp {
    Follow,
    Unfollow,
    Block,
    Unblock,
    Mute,
    Unmute,
    AcceptFollowRequest,
    DenyFollowRequest,
}

impl RelationshipOp {
    /// The edge kind the operation manipulates.
    pub fn kind(&self) -> RelationshipKind {
        match self {
            RelationshipOp::Follow | RelationshipOp::Unfollow => RelationshipKind::Follow,
            RelationshipOp::Block | RelationshipOp::Unblock => RelationshipKind::Block,
            RelationshipOp::Mute | RelationshipOp::Unmute => RelationshipKind::Mute,
            RelationshipOp::AcceptFollowRequest | RelationshipOp::DenyFollowRequest => {
                RelationshipKind::Request
            }
        }
    }

    /// Whether the operation creates relationship state (as opposed to
    /// removing it).
    pub fn is_positive(&self) -> bool {
        match self {
            RelationshipOp::Follow
            | RelationshipOp::Block
            | RelationshipOp::Mute
            | RelationshipOp::AcceptFollowRequest => true,
            RelationshipOp::Unfollow
            | RelationshipOp::Unblock
            | RelationshipOp::Unmute
            | RelationshipOp::DenyFollowRequest => false,
        }
    }

    /// Human verb for error messages: "cannot {verb} yourself".
    pub fn verb(&self) -> &'static str {
        match self {
            RelationshipOp::Follow => "follow",
            RelationshipOp::Unfollow => "unfollow",
            RelationshipOp::Block => "block",
            RelationshipOp::Unblock => "unblock",
            RelationshipOp::Mute => "mute",
            RelationshipOp::Unmute => "unmute",
            RelationshipOp::AcceptFollowRequest => "accept a follow request from",
            RelationshipOp::DenyFollowRequest => "deny a follow request from",
        }
    }
}

/// Relationship counts for an account.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatsCounts {
    /// FOLLOW edges pointing at the account.
    pub followers: u64,
    /// FOLLOW edges the account initiated.
    pub following: u64,
    /// BLOCK edges the account initiated.
    pub blocked: u64,
    /// BLOCK edges pointing at the account.
    pub blockers: u64,
    /// MUTE edges the account initiated.
    pub muting: u64,
    /// MUTE edges pointing at the account.
    pub muters: u64,
    /// Pending REQUEST edges pointing at the account.
    pub requests: u64,
    /// Accounts followed in both directions.
    pub mutuals: u64,
}

/// Viewer-relative relationship flags. All false for anonymous viewers.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatsFlags {
    /// viewer → subject FOLLOW exists.
    pub is_following: bool,
    /// subject → viewer FOLLOW exists.
    pub is_follower: bool,
    /// viewer → subject BLOCK exists.
    pub is_blocking: bool,
    /// subject → viewer BLOCK exists.
    pub is_blocked: bool,
    /// viewer → subject MUTE exists.
    pub is_muting: bool,
    /// viewer → subject REQUEST pending.
    pub is_requesting: bool,
    /// subject → viewer REQUEST pending.
    pub is_requested: bool,
}

/// Counts plus viewer-relative flags for one account.
#[derive(Debug, Clone, Serialize)]
pub struct RelationshipStats {
    pub counts: StatsCounts,
    pub flags: StatsFlags,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_roundtrips_through_strings() {
        for kind in [
            RelationshipKind::Follow,
            RelationshipKind::Request,
            RelationshipKind::Block,
            RelationshipKind::Mute,
        ] {
            assert_eq!(RelationshipKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(RelationshipKind::parse("friend"), None);
    }

    #[test]
    fn kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&RelationshipKind::Request).unwrap(),
            "\"request\""
        );
    }

    #[test]
    fn op_mapping_is_consistent() {
        assert_eq!(RelationshipOp::Follow.kind(), RelationshipKind::Follow);
        assert_eq!(RelationshipOp::Unfollow.kind(), RelationshipKind::Follow);
        assert_eq!(RelationshipOp::AcceptFollowRequest.kind(), RelationshipKind::Request);
        assert!(RelationshipOp::Block.is_positive());
        assert!(!RelationshipOp::Unblock.is_positive());
    }
}
