//! Team
//!
//! View-side transformations over a server-supplied referral tree. The
//! tree is fetched wholesale and never mutated; only view state (expanded
//! node ids, search text) lives client-side.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Deserializer};
use smallvec::SmallVec;

pub mod table;

/// Parent label used for top-level members.
pub const ROOT_PARENT: &str = "Root";

/// Branch position of a member within a binary placement tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Placed under the left leg.
    Left,
    /// Placed under the right leg.
    Right,
}

impl Position {
    /// Case-insensitive parse. Anything other than "left"/"right" (in any
    /// casing) is `None`: real records carry inconsistent casing, `null`,
    /// or junk values, and none of those may default to a side.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.eq_ignore_ascii_case("left") {
            Some(Position::Left)
        } else if raw.eq_ignore_ascii_case("right") {
            Some(Position::Right)
        } else {
            None
        }
    }

    /// Uppercase display label.
    pub fn label(self) -> &'static str {
        match self {
            Position::Left => "LEFT",
            Position::Right => "RIGHT",
        }
    }
}

/// Display label for an optional position, with the "N/A" fallback.
pub fn position_label(position: Option<Position>) -> &'static str {
    position.map_or("N/A", Position::label)
}

fn deserialize_position<'de, D>(deserializer: D) -> Result<Option<Position>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(Position::parse))
}

/// A member of the referral tree, as served by the backend.
///
/// The backend's shapes are only partially reliable: ids arrive under `id`
/// or `_id`, several fields may be absent, and `position` casing varies.
/// All of that is absorbed here so downstream code sees one typed record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    /// Stable member id.
    #[serde(alias = "_id")]
    pub id: String,

    /// Display name.
    pub name: String,

    /// Login handle.
    #[serde(default)]
    pub username: String,

    /// Contact email, when the backend includes it.
    #[serde(default)]
    pub email: Option<String>,

    /// Contact phone number, when the backend includes it.
    #[serde(default)]
    pub mobile_no: Option<String>,

    /// Code the member shares to attribute signups.
    #[serde(default)]
    pub referral_code: String,

    /// Whether the membership is currently active.
    #[serde(default)]
    pub is_active: bool,

    /// Free-form rank label ("Bronze".."Diamond").
    #[serde(default)]
    pub rank: String,

    /// Branch placement; case-folded on parse, `None` when missing or junk.
    #[serde(default, deserialize_with = "deserialize_position")]
    pub position: Option<Position>,

    /// Server-computed direct referral count, when present.
    #[serde(default)]
    pub direct_referrals: Option<u32>,

    /// Server-computed total downline size, when present.
    #[serde(default)]
    pub total_team: Option<u32>,

    /// Members recruited directly by this member, in server order.
    #[serde(default)]
    pub children: Vec<TeamMember>,
}

impl TeamMember {
    /// Direct referral count, preferring the server's figure.
    ///
    /// A missing or zero server count falls back to the visible child
    /// count, so the column never reads zero for a member with children.
    pub fn direct_count(&self) -> usize {
        match self.direct_referrals {
            Some(count) if count > 0 => count as usize,
            _ => self.children.len(),
        }
    }
}

/// A tree member annotated with its depth and parent for flat display.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatMember<'a> {
    /// The underlying tree node.
    pub member: &'a TeamMember,

    /// Depth in the tree, starting at 0 for top-level members.
    pub display_level: usize,

    /// Name of the parent member, [`ROOT_PARENT`] at the top level.
    pub parent_name: &'a str,
}

#[derive(Debug, Clone)]
struct Frame<'a> {
    member: &'a TeamMember,
    level: usize,
    parent: &'a str,
}

/// Lazy pre-order traversal of a referral tree.
///
/// Each node is emitted immediately before its children, in original child
/// order, with the level incremented once per descent. The iterator is
/// `Clone`, so a traversal can be restarted from any point. Depth is
/// bounded only by the data; the explicit stack keeps arbitrary depth off
/// the call stack.
#[derive(Debug, Clone)]
pub struct Flatten<'a> {
    stack: SmallVec<[Frame<'a>; 16]>,
}

/// Flatten a referral tree into a leveled, parent-annotated sequence.
pub fn flatten(tree: &[TeamMember]) -> Flatten<'_> {
    Flatten {
        stack: tree
            .iter()
            .rev()
            .map(|member| Frame {
                member,
                level: 0,
                parent: ROOT_PARENT,
            })
            .collect(),
    }
}

impl<'a> Iterator for Flatten<'a> {
    type Item = FlatMember<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let Frame {
            member,
            level,
            parent,
        } = self.stack.pop()?;

        for child in member.children.iter().rev() {
            self.stack.push(Frame {
                member: child,
                level: level + 1,
                parent: &member.name,
            });
        }

        Some(FlatMember {
            member,
            display_level: level,
            parent_name: parent,
        })
    }
}

/// Case-insensitive substring match across the searchable member fields:
/// name, username, referral code, email, rank and phone (logical OR).
pub fn matches_search(member: &TeamMember, search: &str) -> bool {
    let needle = search.trim().to_lowercase();

    if needle.is_empty() {
        return true;
    }

    let hit = |field: &str| field.to_lowercase().contains(needle.as_str());

    hit(&member.name)
        || hit(&member.username)
        || hit(&member.referral_code)
        || member.email.as_deref().is_some_and(hit)
        || hit(&member.rank)
        || member.mobile_no.as_deref().is_some_and(hit)
}

/// Filter flattened rows by search text.
///
/// Blank or whitespace-only search returns the rows unchanged, in the same
/// order.
pub fn filter_members<'a>(rows: Vec<FlatMember<'a>>, search: &str) -> Vec<FlatMember<'a>> {
    if search.trim().is_empty() {
        return rows;
    }

    rows.into_iter()
        .filter(|row| matches_search(row.member, search))
        .collect()
}

/// Client-local expanded/collapsed view state for tree rendering.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExpandedNodes {
    ids: FxHashSet<String>,
}

impl ExpandedNodes {
    /// Mark every node in the tree expanded.
    pub fn expand_all(tree: &[TeamMember]) -> Self {
        ExpandedNodes {
            ids: flatten(tree).map(|row| row.member.id.clone()).collect(),
        }
    }

    /// Reduce the expanded set back to just the top-level node ids.
    pub fn collapse_all(tree: &[TeamMember]) -> Self {
        ExpandedNodes {
            ids: tree.iter().map(|member| member.id.clone()).collect(),
        }
    }

    /// Flip the expanded state of one node.
    pub fn toggle(&mut self, id: &str) {
        if !self.ids.remove(id) {
            self.ids.insert(id.to_string());
        }
    }

    /// Whether the node with `id` is expanded.
    pub fn is_expanded(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Number of expanded nodes.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check if no node is expanded.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Per-branch member totals for a referral tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PositionCounts {
    /// Members placed on the left leg, at any depth.
    pub left: usize,

    /// Members placed on the right leg, at any depth.
    pub right: usize,
}

/// Count members by branch position, descending into children.
///
/// Comparison is case-folded (handled at parse time); members with a
/// missing or unrecognized position are counted in neither bucket.
pub fn count_by_position(tree: &[TeamMember]) -> PositionCounts {
    flatten(tree).fold(PositionCounts::default(), |mut counts, row| {
        match row.member.position {
            Some(Position::Left) => counts.left += 1,
            Some(Position::Right) => counts.right += 1,
            None => {}
        }
        counts
    })
}
