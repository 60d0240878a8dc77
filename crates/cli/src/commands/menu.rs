//! Menu browsing commands.

use std::error::Error;

use red_lantern_core::{Dish, DishId};

use crate::config::AppConfig;

/// List dishes, optionally restricted to one category.
pub async fn list(config: &AppConfig, category: Option<&str>) -> Result<(), Box<dyn Error>> {
    let client = config.api_client()?;
    let dishes = match category {
        Some(category) => client.dishes_by_category(category).await?,
        None => client.dishes().await?,
    };

    if dishes.is_empty() {
        println!("The menu is empty.");
        return Ok(());
    }
    for dish in &dishes {
        print_row(dish);
    }
    Ok(())
}

/// Show one dish in detail.
pub async fn show(config: &AppConfig, id: DishId) -> Result<(), Box<dyn Error>> {
    let client = config.api_client()?;
    let dish = client.dish(id).await?;

    println!("#{}  {}  [{}]", dish.id, dish.name, dish.category);
    println!("  price:     {}", dish.price);
    if !dish.description.is_empty() {
        println!("  about:     {}", dish.description);
    }
    println!("  ready in:  ~{} min", dish.estimated_minutes);
    if !dish.available {
        println!("  (currently unavailable)");
    }
    Ok(())
}

/// Show the first `limit` available dishes.
pub async fn popular(config: &AppConfig, limit: usize) -> Result<(), Box<dyn Error>> {
    let client = config.api_client()?;
    let dishes = client.popular_dishes(limit).await?;

    if dishes.is_empty() {
        println!("Nothing is available right now.");
        return Ok(());
    }
    for dish in &dishes {
        print_row(dish);
    }
    Ok(())
}

fn print_row(dish: &Dish) {
    let marker = if dish.available { ' ' } else { '-' };
    println!(
        "{marker}#{:<4} {:<28} {:>8}  {}",
        dish.id.to_string(),
        dish.name,
        dish.price.to_string(),
        dish.category
    );
}
