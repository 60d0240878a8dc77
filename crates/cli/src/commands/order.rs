//! Order submission and tracking commands.

use std::error::Error;

use red_lantern_core::{CreateOrderRequest, Order, OrderId};

use crate::config::AppConfig;

/// Submit the current cart as an order, then clear the cart.
pub async fn submit(config: &AppConfig, notes: &str) -> Result<(), Box<dyn Error>> {
    let manager = config.cart_manager();
    manager.ready().await;

    if manager.is_empty() {
        println!("Your cart is empty - nothing to submit.");
        return Ok(());
    }

    let client = config.api_client()?;
    let request = CreateOrderRequest {
        user_id: manager.owner_id().await,
        notes: notes.to_string(),
        items: manager.order_draft().await,
    };
    let order = client.create_order(&request).await?;

    // The submitted lines are the kitchen's problem now.
    manager.clear_cart().await;

    println!("Order #{} placed.", order.id);
    println!("  pickup code: {}", order.pickup_code);
    println!("  queue spot:  {}", order.queue_number);
    println!("  total:       {}", order.total_price);
    println!("  est. wait:   ~{} min", order.total_estimated_minutes);
    Ok(())
}

/// Which slice of the order history to list.
#[derive(Debug, Clone, Copy)]
pub enum ListScope {
    /// Orders still moving through the queue.
    Active,
    /// Completed and cancelled orders.
    History,
    /// Everything.
    All,
}

/// List this installation's orders.
pub async fn list(config: &AppConfig, scope: ListScope) -> Result<(), Box<dyn Error>> {
    let manager = config.cart_manager();
    let user_id = manager.owner_id().await;

    let client = config.api_client()?;
    let orders = match scope {
        ListScope::Active => client.active_orders(&user_id).await?,
        ListScope::History => client.history_orders(&user_id).await?,
        ListScope::All => client.orders_for_user(&user_id).await?,
    };

    if orders.is_empty() {
        let label = match scope {
            ListScope::Active => "active",
            ListScope::History => "past",
            ListScope::All => "past or active",
        };
        println!("No {label} orders.");
        return Ok(());
    }
    for order in &orders {
        print_row(order);
    }
    Ok(())
}

/// Show one order in detail.
pub async fn show(config: &AppConfig, id: OrderId) -> Result<(), Box<dyn Error>> {
    let client = config.api_client()?;
    let order = client.order(id).await?;
    print_details(&order);
    Ok(())
}

/// Look an order up by pickup code.
pub async fn status(config: &AppConfig, pickup_code: &str) -> Result<(), Box<dyn Error>> {
    let client = config.api_client()?;
    match client.order_by_pickup_code(pickup_code).await {
        Ok(order) => {
            print_details(&order);
            Ok(())
        }
        Err(e) if e.is_not_found() => {
            println!("No order found for pickup code {pickup_code}.");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Cancel an order.
pub async fn cancel(config: &AppConfig, id: OrderId) -> Result<(), Box<dyn Error>> {
    let client = config.api_client()?;
    let order = client.cancel_order(id).await?;
    println!("Order #{} is now {}.", order.id, order.status);
    Ok(())
}

/// Confirm pickup of an order.
pub async fn pickup(config: &AppConfig, id: OrderId) -> Result<(), Box<dyn Error>> {
    let client = config.api_client()?;
    let order = client.confirm_pickup(id).await?;
    println!("Order #{} is now {}. Enjoy!", order.id, order.status);
    Ok(())
}

fn print_row(order: &Order) {
    println!(
        "#{:<5} {:<10} {:>9}  queue {:<3} code {}  {}",
        order.id.to_string(),
        order.status.to_string(),
        order.total_price.to_string(),
        order.queue_number,
        order.pickup_code,
        order.created_at.format("%Y-%m-%d %H:%M")
    );
}

fn print_details(order: &Order) {
    println!("Order #{} - {}", order.id, order.status);
    println!("  placed:      {}", order.created_at.format("%Y-%m-%d %H:%M"));
    println!("  queue spot:  {}", order.queue_number);
    println!("  est. wait:   ~{} min", order.total_estimated_minutes);
    for item in &order.items {
        println!(
            "  {:>3} x {:<28} {:>9}",
            item.quantity,
            item.dish_name,
            item.subtotal.to_string()
        );
        if !item.item_notes.is_empty() {
            println!("        note: {}", item.item_notes);
        }
    }
    println!("  total:       {}", order.total_price);
}
