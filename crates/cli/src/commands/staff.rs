//! Staff-side commands: queue management and sales stats.
//!
//! The full staff console is a separate web surface; these commands
//! cover the operations staff actually run against the backend (status
//! transitions and the daily/weekly numbers) for use from a terminal.

use std::error::Error;

use red_lantern_core::{OrderId, OrderStatus};

use crate::config::AppConfig;

/// Move an order to a new status.
pub async fn set_status(
    config: &AppConfig,
    id: OrderId,
    status: OrderStatus,
) -> Result<(), Box<dyn Error>> {
    let client = config.api_client()?;
    let order = client.update_status(id, status).await?;
    println!("Order #{} is now {}.", order.id, order.status);
    if order.status.is_terminal() {
        println!("(left the live queue)");
    }
    Ok(())
}

/// Print today's or this week's sales summary.
pub async fn stats(config: &AppConfig, weekly: bool) -> Result<(), Box<dyn Error>> {
    let client = config.api_client()?;

    if weekly {
        let stats = client.weekly_stats().await?;
        println!(
            "This week: {} orders, {} revenue",
            stats.total_orders, stats.total_revenue
        );
        for day in &stats.daily_stats {
            println!(
                "  {}  {:>4} orders  {:>9}",
                day.date,
                day.orders,
                day.revenue.to_string()
            );
        }
    } else {
        let stats = client.today_stats().await?;
        println!(
            "Today: {} orders, {} revenue",
            stats.total_orders, stats.total_revenue
        );
        for dish in &stats.popular_dishes {
            println!("  {:<28} x{}", dish.name, dish.count);
        }
    }
    Ok(())
}
