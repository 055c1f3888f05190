//! Trellis prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    api::{
        Envelope, ProductRecord, TeamOwner, TeamStats, TeamStructureData, TransferError,
        WalletBalances, WalletKind, validate_transfer,
    },
    cart::{Cart, CartError, StockPolicy, Totals},
    fixtures::{CartFixture, Fixture, FixtureError, TeamFixture},
    items::{LineItem, ProductId},
    notify::{Notice, Notifier, NullNotifier, RecordingNotifier, Severity},
    persistence::{
        CART_SLOT, CartSnapshots, DirSnapshotSlot, MemorySnapshotSlot, SnapshotError, SnapshotSlot,
    },
    team::{
        ExpandedNodes, FlatMember, Flatten, Position, PositionCounts, TeamMember,
        count_by_position, filter_members, flatten, matches_search, position_label,
        table::render_table,
    },
};
