//! Shopfront CLI - browse the catalog and manage the cart from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # First page of the home grid
//! shopfront products
//!
//! # Search + filters, second "load more" page
//! shopfront products --search tesla --brand Tesla --min 10 --max 500 --page 2
//!
//! # Basket
//! shopfront cart add 7
//! shopfront cart inc 7
//! shopfront cart show
//!
//! # Favorites and language
//! shopfront favorites toggle 7
//! shopfront language en
//!
//! # Machine-readable output
//! shopfront --json cart show
//! ```
//!
//! State (cart, favorites, language) persists in the local database between
//! runs; the catalog is fetched once per run.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use serde::Serialize;
use shopfront_app::commands::cart::{self as cart_cmd, CartResponse};
use shopfront_app::commands::favorites::{self as favorites_cmd, FavoritesResponse};
use shopfront_app::commands::product::{self as product_cmd, ProductDto, ProductListResponse, SearchParams};
use shopfront_app::commands::settings::{self as settings_cmd, LanguageResponse};
use shopfront_app::{initialize_stores, init_tracing, AppConfig, AppError, AppState, Language, Translator};

#[derive(Parser)]
#[command(name = "shopfront")]
#[command(author, version, about = "Shopfront storefront client")]
struct Cli {
    /// Print responses as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Log store activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog products
    Products {
        /// Text matched against name, brand, model and description
        #[arg(short, long)]
        search: Option<String>,

        /// Brand filter (repeatable)
        #[arg(short, long)]
        brand: Vec<String>,

        /// Model filter (repeatable)
        #[arg(short, long)]
        model: Vec<String>,

        /// Minimum price, e.g. 10.50
        #[arg(long)]
        min: Option<String>,

        /// Maximum price, e.g. 500
        #[arg(long)]
        max: Option<String>,

        /// "Load more" page (1-based)
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// Show one product
    Product {
        /// Product id
        id: String,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: Option<CartAction>,
    },
    /// Manage favorites
    Favorites {
        #[command(subcommand)]
        action: Option<FavoritesAction>,
    },
    /// Show or change the display language
    Language {
        /// `en` or `tr`
        language: Option<Language>,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents and totals
    Show,
    /// Add one unit of a product
    Add { id: String },
    /// Remove a line
    Remove { id: String },
    /// Increase a line's quantity
    Inc { id: String },
    /// Decrease a line's quantity (removes it at zero)
    Dec { id: String },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum FavoritesAction {
    /// List favorites
    Show,
    /// Add a product
    Add { id: String },
    /// Remove a product
    Remove { id: String },
    /// Add if absent, remove if present
    Toggle { id: String },
    /// Remove all favorites
    Clear,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        eprintln!("{e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    let (state, db) = AppState::open(config).await?;
    initialize_stores(&state).await;

    let result = dispatch(&state, cli.command, cli.json).await;
    db.close().await;
    result
}

async fn dispatch(
    state: &AppState,
    command: Commands,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let out = Output {
        json,
        t: state.translator(),
    };

    match command {
        Commands::Products {
            search,
            brand,
            model,
            min,
            max,
            page,
        } => {
            let params = SearchParams {
                search,
                brands: brand,
                models: model,
                min_price: min,
                max_price: max,
                page,
            };
            let response = product_cmd::search_products(state, &params)?;
            out.emit(&response, || out.product_list(&response))?;
        }
        Commands::Product { id } => {
            let response = product_cmd::get_product(state, &id)?;
            out.emit(&response, || out.product_detail(&response))?;
        }
        Commands::Cart { action } => {
            let response = match action.unwrap_or(CartAction::Show) {
                CartAction::Show => cart_cmd::get_cart(state),
                CartAction::Add { id } => cart_cmd::add_to_cart(state, &id).await?,
                CartAction::Remove { id } => cart_cmd::remove_from_cart(state, &id).await,
                CartAction::Inc { id } => cart_cmd::increase_quantity(state, &id).await,
                CartAction::Dec { id } => cart_cmd::decrease_quantity(state, &id).await,
                CartAction::Clear => cart_cmd::clear_cart(state).await,
            };
            out.emit(&response, || out.cart(&response))?;
        }
        Commands::Favorites { action } => {
            let response = match action.unwrap_or(FavoritesAction::Show) {
                FavoritesAction::Show => favorites_cmd::get_favorites(state),
                FavoritesAction::Add { id } => favorites_cmd::add_to_favorites(state, &id).await?,
                FavoritesAction::Remove { id } => {
                    favorites_cmd::remove_from_favorites(state, &id).await
                }
                FavoritesAction::Toggle { id } => {
                    favorites_cmd::toggle_favorite(state, &id).await?
                }
                FavoritesAction::Clear => favorites_cmd::clear_favorites(state).await,
            };
            out.emit(&response, || out.favorites(&response))?;
        }
        Commands::Language { language } => {
            let response = match language {
                Some(language) => settings_cmd::change_language(state, language).await?,
                None => settings_cmd::get_language(state),
            };
            // The confirmation is already in the new language
            let out = Output {
                json,
                t: state.translator(),
            };
            out.emit(&response, || out.language(&response))?;
        }
    }

    Ok(())
}

// =============================================================================
// Rendering
// =============================================================================

struct Output {
    json: bool,
    t: Translator,
}

impl Output {
    fn emit<T: Serialize>(&self, response: &T, text: impl FnOnce()) -> serde_json::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(response)?);
        } else {
            text();
        }
        Ok(())
    }

    fn status(&self, message: Option<&String>, error: Option<&AppError>) {
        if let Some(message) = message {
            println!("{message}");
        }
        if let Some(error) = error {
            eprintln!("{}: {}", self.t.t("common.error"), error.message);
        }
    }

    fn product_list(&self, response: &ProductListResponse) {
        self.status(None, response.error.as_ref());
        if let Some(message) = &response.message {
            println!("{message}");
            return;
        }

        for p in &response.items {
            let marker = match (p.in_cart, p.is_favorite) {
                (true, true) => "[cart ★]",
                (true, false) => "[cart]",
                (false, true) => "[★]",
                (false, false) => "",
            };
            println!(
                "{:>6}  {:<32} {:<14} {:>14} {}",
                p.id, p.name, p.brand, p.formatted_price, marker
            );
        }

        let shown = response.items.len().to_string();
        let total = response.total.to_string();
        println!(
            "\n{}",
            self.t.t_with(
                "home.loadMore",
                &[("shown", shown.as_str()), ("total", total.as_str())]
            )
        );
    }

    fn product_detail(&self, p: &ProductDto) {
        println!("{}", p.name);
        println!("{} / {}", p.brand, p.model);
        println!("{}: {}", self.t.t("productDetail.price"), p.formatted_price);
        if !p.description.is_empty() {
            println!("\n{}", p.description);
        }
        if p.in_cart {
            println!("\n{} ({})", self.t.t("home.inCart"), p.cart_quantity);
        }
    }

    fn cart(&self, response: &CartResponse) {
        self.status(response.message.as_ref(), response.error.as_ref());
        println!(
            "{} ({} {})",
            self.t.t("basket.title"),
            response.totals.total_quantity,
            self.t.t("basket.items")
        );

        if response.items.is_empty() {
            println!("{}", self.t.t("basket.emptyCartMessage"));
            return;
        }

        for line in &response.items {
            println!(
                "{:>6}  {:<32} x{:<4} {:>14}",
                line.product_id, line.name, line.quantity, line.formatted_line_total
            );
        }
        println!(
            "{}: {}",
            self.t.t("basket.totalPrice"),
            response.totals.formatted_total
        );
    }

    fn favorites(&self, response: &FavoritesResponse) {
        self.status(response.message.as_ref(), response.error.as_ref());
        println!("{} ({})", self.t.t("favorites.title"), response.count);

        if response.items.is_empty() {
            println!("{}", self.t.t("favorites.emptyFavoritesMessage"));
            return;
        }

        for p in &response.items {
            println!("{:>6}  {:<32} {:>14}", p.id, p.name, p.formatted_price);
        }
    }

    fn language(&self, response: &LanguageResponse) {
        if let Some(message) = &response.message {
            println!("{message}");
        }
        println!("{}: {}", self.t.t("profile.language"), response.language);
    }
}
