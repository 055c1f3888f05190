//! API Response Shapes
//!
//! The backend owns the wire contract; these records model only the shapes
//! this crate destructures from responses, with explicit optional fields
//! and documented fallbacks instead of ad hoc presence checks. No HTTP
//! client lives here: callers hand in already-fetched JSON payloads.

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    items::{LineItem, ProductId},
    team::{PositionCounts, TeamMember},
};

fn default_true() -> bool {
    true
}

/// Standard success/data wrapper around every backend response.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    /// Whether the backend considers the request successful.
    #[serde(default)]
    pub success: bool,

    /// The payload, present only on success (and sometimes not even then).
    #[serde(default)]
    pub data: Option<T>,

    /// Optional human-readable status message.
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    /// The payload of a successful response; `None` for failures or
    /// success responses served without data.
    pub fn into_data(self) -> Option<T> {
        if self.success { self.data } else { None }
    }
}

/// Summary of the logged-in member heading the team view.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamOwner {
    /// Stable member id.
    #[serde(alias = "_id")]
    pub id: String,

    /// Display name.
    pub name: String,

    /// Login handle.
    #[serde(default)]
    pub username: String,

    /// Code the owner shares to attribute signups.
    #[serde(default)]
    pub referral_code: String,

    /// Rank label; the dashboard omits the badge when absent.
    #[serde(default)]
    pub rank: Option<String>,

    /// Active unless the backend explicitly says otherwise.
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Aggregate team statistics as served by the backend.
///
/// Branch totals are optional: older backend versions serve zero or omit
/// them entirely, in which case the client recounts from the tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeamStats {
    /// Members recruited directly by the owner.
    pub direct_referrals: u32,

    /// Total downline size.
    pub total_team: u32,

    /// Server-computed left-leg total, when computed.
    pub left_team: Option<u32>,

    /// Server-computed right-leg total, when computed.
    pub right_team: Option<u32>,
}

impl TeamStats {
    /// Left-leg total, falling back to a local recount.
    ///
    /// A server value of zero is treated as absent: the backend serves 0
    /// when it has not computed branch totals for this member.
    pub fn left_total(&self, counted: PositionCounts) -> usize {
        match self.left_team {
            Some(total) if total > 0 => total as usize,
            _ => counted.left,
        }
    }

    /// Right-leg total, falling back to a local recount.
    ///
    /// Zero is treated as absent, as for [`TeamStats::left_total`].
    pub fn right_total(&self, counted: PositionCounts) -> usize {
        match self.right_team {
            Some(total) if total > 0 => total as usize,
            _ => counted.right,
        }
    }
}

/// The team-structure payload: owner summary, aggregate stats, and the
/// referral tree itself.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStructureData {
    /// The member whose team is being viewed.
    pub user: TeamOwner,

    /// Aggregate statistics.
    #[serde(default)]
    pub stats: TeamStats,

    /// Top-level team members and their downlines.
    #[serde(default)]
    pub tree: Vec<TeamMember>,
}

/// One catalog product as listed by the storefront.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    /// Stable product id; string-coerced like every other id.
    #[serde(alias = "_id")]
    pub id: ProductId,

    /// Display name.
    pub name: String,

    /// Display image URL.
    #[serde(default)]
    pub image: Option<String>,

    /// Original unit price.
    pub price: Decimal,

    /// Discounted unit price, when the product is on offer.
    #[serde(default)]
    pub discount_price: Option<Decimal>,

    /// Point value per unit.
    #[serde(default)]
    pub pv: Option<Decimal>,

    /// In stock unless the backend explicitly says otherwise.
    #[serde(default = "default_true")]
    pub in_stock: bool,
}

impl ProductRecord {
    /// Build a cart line for this product with the requested quantity.
    pub fn to_line_item(&self, quantity: u32) -> LineItem {
        LineItem {
            product_id: self.id.clone(),
            name: self.name.clone(),
            image: self.image.clone(),
            price: self.price,
            discount_price: self.discount_price,
            quantity,
            pv: self.pv,
            in_stock: self.in_stock,
        }
    }
}

/// The named server-held wallets of a member.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WalletBalances {
    /// Balance spendable on purchases.
    pub purchase_wallet: Decimal,

    /// Earnings balance.
    pub earned_wallet: Decimal,

    /// Referral bonus balance.
    pub referral_wallet: Decimal,

    /// Repurchase credit balance.
    pub repurchase_wallet: Decimal,

    /// Cashback balance.
    pub cashback_wallet: Decimal,
}

/// One of the named wallets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletKind {
    /// Balance spendable on purchases ("Shopping Wallet").
    Purchase,
    /// Earnings balance.
    Earned,
    /// Referral bonus balance.
    Referral,
    /// Repurchase credit balance.
    Repurchase,
    /// Cashback balance.
    Cashback,
}

impl WalletKind {
    /// Display label shown on wallet forms.
    pub fn label(self) -> &'static str {
        match self {
            WalletKind::Purchase => "Shopping Wallet",
            WalletKind::Earned => "Earned Wallet",
            WalletKind::Referral => "Referral Wallet",
            WalletKind::Repurchase => "Repurchase Wallet",
            WalletKind::Cashback => "Cashback Wallet",
        }
    }
}

impl WalletBalances {
    /// The balance of one named wallet.
    pub fn balance(&self, kind: WalletKind) -> Decimal {
        match kind {
            WalletKind::Purchase => self.purchase_wallet,
            WalletKind::Earned => self.earned_wallet,
            WalletKind::Referral => self.referral_wallet,
            WalletKind::Repurchase => self.repurchase_wallet,
            WalletKind::Cashback => self.cashback_wallet,
        }
    }
}

/// Reasons a wallet transfer is rejected before it reaches the backend.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransferError {
    /// Source and destination are the same wallet.
    #[error("source and destination wallets cannot be the same")]
    SameWallet,

    /// The amount is missing, zero or negative.
    #[error("transfer amount must be greater than zero")]
    InvalidAmount,

    /// The source wallet holds less than the requested amount.
    #[error("insufficient balance in {wallet}: available {available}")]
    InsufficientBalance {
        /// Label of the source wallet.
        wallet: &'static str,
        /// Balance actually available.
        available: Decimal,
    },
}

/// Client-side validation performed before a transfer request is sent.
///
/// The backend re-validates; this only catches what the form can catch,
/// so the user sees an immediate notice instead of a round trip.
///
/// # Errors
///
/// - [`TransferError::SameWallet`]: `from` equals `to`.
/// - [`TransferError::InvalidAmount`]: `amount` is not positive.
/// - [`TransferError::InsufficientBalance`]: `from` holds less than `amount`.
pub fn validate_transfer(
    balances: &WalletBalances,
    from: WalletKind,
    to: WalletKind,
    amount: Decimal,
) -> Result<(), TransferError> {
    if from == to {
        return Err(TransferError::SameWallet);
    }

    if amount <= Decimal::ZERO {
        return Err(TransferError::InvalidAmount);
    }

    let available = balances.balance(from);
    if available < amount {
        return Err(TransferError::InsufficientBalance {
            wallet: from.label(),
            available,
        });
    }

    Ok(())
}
