//! Team Table
//!
//! Plain-text rendering of a flattened referral tree, using the
//! dashboard's display rules: depth-0 rows read "Direct", deeper
//! rows show "Level n+1" and their parent's name, a missing rank renders
//! as "Bronze", and a missing position as "N/A".

use tabled::{Table, Tabled};

use crate::team::{FlatMember, position_label};

#[derive(Debug, Tabled)]
struct TeamRow {
    #[tabled(rename = "Level")]
    level: String,

    #[tabled(rename = "Name")]
    name: String,

    #[tabled(rename = "Username")]
    username: String,

    #[tabled(rename = "Referral Code")]
    referral_code: String,

    #[tabled(rename = "Rank")]
    rank: String,

    #[tabled(rename = "Status")]
    status: String,

    #[tabled(rename = "Position")]
    position: String,

    #[tabled(rename = "Direct")]
    direct: usize,

    #[tabled(rename = "Team")]
    team: u32,
}

impl From<FlatMember<'_>> for TeamRow {
    fn from(row: FlatMember<'_>) -> Self {
        let member = row.member;

        let level = if row.display_level == 0 {
            "Direct".to_string()
        } else {
            format!("Level {}", row.display_level + 1)
        };

        let name = if row.display_level == 0 {
            member.name.clone()
        } else {
            format!("{} ({})", member.name, row.parent_name)
        };

        let rank = if member.rank.is_empty() {
            "Bronze".to_string()
        } else {
            member.rank.clone()
        };

        TeamRow {
            level,
            name,
            username: member.username.clone(),
            referral_code: member.referral_code.clone(),
            rank,
            status: if member.is_active { "Active" } else { "Inactive" }.to_string(),
            position: position_label(member.position).to_string(),
            direct: member.direct_count(),
            team: member.total_team.unwrap_or(0),
        }
    }
}

/// Render flattened team rows as a text table.
pub fn render_table<'a>(rows: impl IntoIterator<Item = FlatMember<'a>>) -> String {
    let rows: Vec<TeamRow> = rows.into_iter().map(TeamRow::from).collect();

    Table::new(rows).to_string()
}
