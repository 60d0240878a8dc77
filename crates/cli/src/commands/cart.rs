//! Cart commands.
//!
//! Every command constructs the manager over the data directory, so
//! the cart each invocation sees is whatever the previous invocation
//! persisted.

use std::error::Error;

use red_lantern_core::{CartState, DishId};

use crate::config::AppConfig;

/// Print the cart with line and grand totals.
pub async fn show(config: &AppConfig) {
    let manager = config.cart_manager();
    let state = manager.snapshot().await;

    if state.is_empty() {
        println!("Your cart is empty.");
        return;
    }
    print_cart(&state);
}

/// Fetch the dish from the menu and add it to the cart.
pub async fn add(config: &AppConfig, id: DishId, quantity: u32) -> Result<(), Box<dyn Error>> {
    let client = config.api_client()?;
    let dish = client.dish(id).await?;
    if !dish.available {
        println!("'{}' is currently unavailable.", dish.name);
        return Ok(());
    }

    let manager = config.cart_manager();
    manager.add_dish(&dish, quantity).await;
    let state = manager.snapshot().await;
    println!(
        "Added {quantity} x {} - line at {}, cart total {}",
        dish.name,
        state.quantity_of(id),
        state.total_price
    );
    Ok(())
}

/// Remove a line entirely.
pub async fn remove(config: &AppConfig, id: DishId) {
    let manager = config.cart_manager();
    manager.ready().await;
    if !manager.has_item(id) {
        println!("Dish {id} is not in the cart.");
        return;
    }
    manager.remove_item(id).await;
    println!("Removed dish {id}.");
}

/// Increase a line's quantity by one.
pub async fn increase(config: &AppConfig, id: DishId) {
    let manager = config.cart_manager();
    manager.ready().await;
    if !manager.has_item(id) {
        println!("Dish {id} is not in the cart.");
        return;
    }
    manager.increase_quantity(id).await;
    println!("Dish {id} now at {}.", manager.quantity_of(id));
}

/// Decrease a line's quantity by one, removing it at one.
pub async fn decrease(config: &AppConfig, id: DishId) {
    let manager = config.cart_manager();
    manager.ready().await;
    if !manager.has_item(id) {
        println!("Dish {id} is not in the cart.");
        return;
    }
    manager.decrease_quantity(id).await;
    match manager.quantity_of(id) {
        0 => println!("Dish {id} removed."),
        quantity => println!("Dish {id} now at {quantity}."),
    }
}

/// Set a line's quantity to an absolute value.
pub async fn set_quantity(config: &AppConfig, id: DishId, quantity: u32) {
    let manager = config.cart_manager();
    manager.ready().await;
    if !manager.has_item(id) {
        println!("Dish {id} is not in the cart; use 'cart add' first.");
        return;
    }
    manager.set_quantity(id, quantity).await;
    match quantity {
        0 => println!("Dish {id} removed."),
        _ => println!("Dish {id} set to {quantity}."),
    }
}

/// Attach notes to a line.
pub async fn note(config: &AppConfig, id: DishId, text: &str) {
    let manager = config.cart_manager();
    manager.ready().await;
    if !manager.has_item(id) {
        println!("Dish {id} is not in the cart.");
        return;
    }
    manager.update_item_notes(id, text).await;
    if text.is_empty() {
        println!("Notes cleared on dish {id}.");
    } else {
        println!("Noted on dish {id}: {text}");
    }
}

/// Empty the cart.
pub async fn clear(config: &AppConfig) {
    let manager = config.cart_manager();
    manager.clear_cart().await;
    println!("Cart cleared.");
}

fn print_cart(state: &CartState) {
    for line in &state.items {
        println!(
            "#{:<4} {:<28} {:>3} x {:>8} = {:>9}",
            line.id.to_string(),
            line.name,
            line.quantity,
            line.unit_price.to_string(),
            line.line_total().to_string()
        );
        if let Some(notes) = &line.notes {
            println!("      note: {notes}");
        }
    }
    println!(
        "      {} item(s), total {}",
        state.total_quantity, state.total_price
    );
}
