//! Wire-only response types served by the stats endpoints.
//!
//! These are read models for the staff-facing surfaces; they never
//! feed back into cart or order state, so they live here rather than
//! in the core types crate.

use serde::{Deserialize, Serialize};

use red_lantern_core::Price;

/// One dish's popularity entry in today's stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopularDish {
    pub name: String,
    pub count: u32,
}

/// Today's sales summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayStats {
    pub total_orders: u32,
    pub total_revenue: Price,
    #[serde(default)]
    pub popular_dishes: Vec<PopularDish>,
}

/// One day's slice of the weekly stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyStat {
    pub date: String,
    pub orders: u32,
    pub revenue: Price,
}

/// This week's sales summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyStats {
    pub total_orders: u32,
    pub total_revenue: Price,
    #[serde(default)]
    pub daily_stats: Vec<DailyStat>,
}
