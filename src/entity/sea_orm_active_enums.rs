use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Where an order sits in its lifecycle.
///
/// `Open` is the editable ("temporary") bill of a table. `MergedAway` is
/// terminal: the contents now live on another table's order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum OrderState {
    #[sea_orm(string_value = "open")]
    Open,
    #[sea_orm(string_value = "finalized")]
    Finalized,
    #[sea_orm(string_value = "settle_pending")]
    SettlePending,
    #[sea_orm(string_value = "settled")]
    Settled,
    #[sea_orm(string_value = "merged_away")]
    MergedAway,
}

impl OrderState {
    pub fn is_temporary(self) -> bool {
        self == OrderState::Open
    }

    pub fn is_merged(self) -> bool {
        self == OrderState::MergedAway
    }

    /// Legacy settlement marker: 0 normal, 1 marked, 2 settled.
    pub fn flag(self) -> i32 {
        match self {
            OrderState::SettlePending => 1,
            OrderState::Settled => 2,
            _ => 0,
        }
    }

    /// State after an edit that carries an `isTemporary` value.
    /// Only the open/finalized pair is toggled; settlement states are kept.
    pub fn with_temporary(self, is_temporary: Option<bool>) -> Self {
        match (self, is_temporary) {
            (OrderState::Open, Some(false)) => OrderState::Finalized,
            (OrderState::Finalized, Some(true)) => OrderState::Open,
            (state, _) => state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_views_follow_state() {
        assert!(OrderState::Open.is_temporary());
        assert!(!OrderState::Finalized.is_temporary());
        assert!(OrderState::MergedAway.is_merged());
        assert_eq!(OrderState::Open.flag(), 0);
        assert_eq!(OrderState::SettlePending.flag(), 1);
        assert_eq!(OrderState::Settled.flag(), 2);
    }

    #[test]
    fn temporary_toggle_only_moves_between_open_and_finalized() {
        assert_eq!(OrderState::Open.with_temporary(Some(false)), OrderState::Finalized);
        assert_eq!(OrderState::Finalized.with_temporary(Some(true)), OrderState::Open);
        assert_eq!(OrderState::Open.with_temporary(None), OrderState::Open);
        assert_eq!(
            OrderState::SettlePending.with_temporary(Some(true)),
            OrderState::SettlePending
        );
        assert_eq!(OrderState::Settled.with_temporary(Some(false)), OrderState::Settled);
    }
}
