//! Red Lantern CLI - terminal ordering client.
//!
//! # Usage
//!
//! ```bash
//! # Browse the menu
//! rl-cli menu list
//! rl-cli menu list --category Noodles
//! rl-cli menu show 3
//!
//! # Build a cart (persisted in the data directory across invocations)
//! rl-cli cart add 3 --quantity 2
//! rl-cli cart note 3 "extra spicy"
//! rl-cli cart show
//!
//! # Submit and track the order
//! rl-cli order submit --notes "no utensils"
//! rl-cli order status RL4921
//! ```
//!
//! # Environment
//!
//! - `RED_LANTERN_API_URL` - backend base URL (required for network commands)
//! - `RED_LANTERN_DATA_DIR` - cart/identity storage directory (default: .red-lantern)

#![cfg_attr(not(test), forbid(unsafe_code))]
// A CLI's stdout is its interface.
#![allow(clippy::print_stdout)]

use clap::{Parser, Subcommand};

use red_lantern_core::{DishId, OrderId, OrderStatus};

mod commands;
mod config;

use config::AppConfig;

#[derive(Parser)]
#[command(name = "rl-cli")]
#[command(author, version, about = "Red Lantern terminal ordering client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the menu
    Menu {
        #[command(subcommand)]
        action: MenuAction,
    },
    /// Inspect and mutate the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Submit and track orders
    Order {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// Staff operations: queue management and stats
    Staff {
        #[command(subcommand)]
        action: StaffAction,
    },
    /// Check whether the backend is reachable
    Health,
}

#[derive(Subcommand)]
enum MenuAction {
    /// List dishes, optionally one category
    List {
        /// Menu category, e.g. "Staple" or "Noodles"
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Show one dish in detail
    Show { id: DishId },
    /// Show the first available dishes
    Popular {
        #[arg(short, long, default_value_t = 3)]
        limit: usize,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Print the cart with line and grand totals
    Show,
    /// Add a dish (merges with an existing line)
    Add {
        id: DishId,
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a line entirely
    Remove { id: DishId },
    /// Increase a line's quantity by one
    Inc { id: DishId },
    /// Decrease a line's quantity by one (removes at one)
    Dec { id: DishId },
    /// Set a line's quantity to an absolute value (zero removes)
    Set { id: DishId, quantity: u32 },
    /// Attach free-text notes to a line (empty clears)
    Note { id: DishId, text: String },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum OrderAction {
    /// Submit the current cart as an order
    Submit {
        /// Order-level notes for the kitchen
        #[arg(short, long, default_value = "")]
        notes: String,
    },
    /// List your orders (active by default)
    List {
        /// Include completed and cancelled orders
        #[arg(long, conflicts_with = "history")]
        all: bool,
        /// Only completed and cancelled orders
        #[arg(long)]
        history: bool,
    },
    /// Show one order in detail
    Show { id: OrderId },
    /// Look an order up by pickup code
    Status { pickup_code: String },
    /// Cancel an order
    Cancel { id: OrderId },
    /// Confirm you picked the order up
    Pickup { id: OrderId },
}

#[derive(Subcommand)]
enum StaffAction {
    /// Move an order to a new status
    SetStatus {
        id: OrderId,
        /// One of PENDING, CONFIRMED, PREPARING, READY, COMPLETED, CANCELLED
        status: OrderStatus,
    },
    /// Print today's (or this week's) sales summary
    Stats {
        #[arg(long)]
        weekly: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;

    match cli.command {
        Commands::Menu { action } => match action {
            MenuAction::List { category } => {
                commands::menu::list(&config, category.as_deref()).await?;
            }
            MenuAction::Show { id } => commands::menu::show(&config, id).await?,
            MenuAction::Popular { limit } => commands::menu::popular(&config, limit).await?,
        },
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&config).await,
            CartAction::Add { id, quantity } => {
                commands::cart::add(&config, id, quantity).await?;
            }
            CartAction::Remove { id } => commands::cart::remove(&config, id).await,
            CartAction::Inc { id } => commands::cart::increase(&config, id).await,
            CartAction::Dec { id } => commands::cart::decrease(&config, id).await,
            CartAction::Set { id, quantity } => {
                commands::cart::set_quantity(&config, id, quantity).await;
            }
            CartAction::Note { id, text } => commands::cart::note(&config, id, &text).await,
            CartAction::Clear => commands::cart::clear(&config).await,
        },
        Commands::Order { action } => match action {
            OrderAction::Submit { notes } => commands::order::submit(&config, &notes).await?,
            OrderAction::List { all, history } => {
                let scope = if all {
                    commands::order::ListScope::All
                } else if history {
                    commands::order::ListScope::History
                } else {
                    commands::order::ListScope::Active
                };
                commands::order::list(&config, scope).await?;
            }
            OrderAction::Show { id } => commands::order::show(&config, id).await?,
            OrderAction::Status { pickup_code } => {
                commands::order::status(&config, &pickup_code).await?;
            }
            OrderAction::Cancel { id } => commands::order::cancel(&config, id).await?,
            OrderAction::Pickup { id } => commands::order::pickup(&config, id).await?,
        },
        Commands::Staff { action } => match action {
            StaffAction::SetStatus { id, status } => {
                commands::staff::set_status(&config, id, status).await?;
            }
            StaffAction::Stats { weekly } => commands::staff::stats(&config, weekly).await?,
        },
        Commands::Health => {
            let client = config.api_client()?;
            if client.health().await {
                println!("Backend is up.");
            } else {
                println!("Backend is unreachable.");
            }
        }
    }
    Ok(())
}
