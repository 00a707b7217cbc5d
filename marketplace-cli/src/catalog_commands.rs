use anyhow::Result;
use colored::Colorize;
use comfy_table::{Cell, Color};
use futures::future::join_all;
use marketplace_client::api::ListingQuery;
use marketplace_client::Marketplace;
use marketplace_types::display::{
    badge_progress, license_progress_label, resale_label, round_label, sold_summary,
};
use marketplace_types::models::PageQuery;
use marketplace_types::{License, Product, PurchaseType, Stage};

use crate::cli::{Intent, LicenseCommands, MarketCommands, ProductCommands};
use crate::render;

pub async fn handle_products(client: &Marketplace, cmd: ProductCommands) -> Result<()> {
    match cmd {
        ProductCommands::List { page, limit, search, json } => {
            let query = PageQuery { page: page.max(1), limit, search };
            let result = client.products().list(&query).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
                return Ok(());
            }
            print_products(client, &result.items);
            render::print_pagination(result.pagination);
            Ok(())
        },
        ProductCommands::Show { id, json } => {
            let product = client.products().get(&id).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&product)?);
                return Ok(());
            }
            show_product(client, &product);
            Ok(())
        },
        ProductCommands::Mine => {
            let products = client.products().mine().await?;
            print_products(client, &products);
            Ok(())
        },
    }
}

fn print_products(client: &Marketplace, products: &[Product]) {
    if products.is_empty() {
        println!("{}", "No products found.".yellow());
        return;
    }
    let currency = client.preferences().settings().currency;
    let mut table = render::table(vec!["ID", "Title", "Price", "Stage", "Round", "Sold"]);
    for product in products {
        let sold = Cell::new(license_progress_label(
            product.total_licenses,
            product.remaining_licenses,
        ))
        .fg(if product.is_sold_out() { Color::Red } else { Color::Reset });
        table.add_row(vec![
            Cell::new(&product.id),
            Cell::new(&product.title),
            Cell::new(render::money(product.price, &currency)),
            render::stage_cell(&product.current_stage),
            Cell::new(round_label(product.current_round)),
            sold,
        ]);
    }
    println!("{table}");
}

fn show_product(client: &Marketplace, product: &Product) {
    let currency = client.preferences().settings().currency;
    println!("{}", product.title.cyan().bold());
    if let Some(description) = &product.description {
        println!("{}\n", description);
    }
    println!(
        "  Stage:    {} · {}",
        render::stage_text(&product.current_stage),
        round_label(product.current_round)
    );
    println!("  Price:    {}", render::money(product.price, &currency));
    println!(
        "  Licenses: {} ({})",
        sold_summary(product),
        license_progress_label(product.total_licenses, product.remaining_licenses)
    );
    if product.is_sold_out() {
        println!("  {}", "Sold out for this round".red());
    }
}

pub async fn handle_market(client: &Marketplace, cmd: MarketCommands) -> Result<()> {
    match cmd {
        MarketCommands::List { page, stage, search } => {
            let query =
                ListingQuery { stage: stage.map(Stage::from), search, ..ListingQuery::page(page) };
            let result = client.market().listings(&query).await?;
            print_products(client, &result.items);
            render::print_pagination(result.pagination);
            Ok(())
        },
        MarketCommands::Buy { product_id, intent } => {
            let purchase_type = match intent {
                Intent::Use => PurchaseType::Use,
                Intent::Resell => PurchaseType::Resell,
            };
            let receipt = client.market().purchase(&product_id, purchase_type).await?;
            println!("{} License {} acquired", "✓".green(), receipt.license.id.green());
            if let Some(key) = &receipt.license.license_key {
                println!("  Key: {}", key);
            }
            if let Some(credits) = receipt.remaining_credits {
                println!("  Credits left: {:.2}", credits);
            }
            Ok(())
        },
        MarketCommands::Resell { license_id, price } => {
            let license = client.market().resell(&license_id, price).await?;
            println!("{} License {} listed for resale", "✓".green(), license.id.green());
            Ok(())
        },
    }
}

pub async fn handle_licenses(client: &Marketplace, cmd: LicenseCommands) -> Result<()> {
    match cmd {
        LicenseCommands::List { json } => {
            let licenses = client.licenses().list().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&licenses)?);
                return Ok(());
            }
            print_licenses(client, &licenses).await;
            Ok(())
        },
        LicenseCommands::Verify { key } => {
            let result = client.licenses().verify(&key).await?;
            if result.valid {
                println!("{} License key is valid", "✓".green());
                if let Some(license) = result.license {
                    println!("  Product: {}", license.product_id);
                    println!("  Owner:   {}", license.owner_id);
                }
            } else {
                println!("{} License key is not valid", "✗".red());
            }
            Ok(())
        },
    }
}

async fn print_licenses(client: &Marketplace, licenses: &[License]) {
    if licenses.is_empty() {
        println!("{}", "No licenses yet.".yellow());
        return;
    }

    // Some list responses omit the joined product; fetch those concurrently.
    let products = client.products();
    let missing = licenses
        .iter()
        .filter(|l| l.product.is_none())
        .map(|l| products.get(&l.product_id));
    let fetched: Vec<Product> =
        join_all(missing).await.into_iter().filter_map(Result::ok).collect();

    let mut table = render::table(vec!["ID", "Product", "Stage", "Acquired", "Resale"]);
    for license in licenses {
        let product = license
            .product
            .as_ref()
            .or_else(|| fetched.iter().find(|p| p.id == license.product_id));
        let resale = Cell::new(resale_label(license)).fg(if license.can_resell() {
            Color::Green
        } else {
            Color::DarkGrey
        });
        table.add_row(vec![
            Cell::new(&license.id),
            Cell::new(product.map_or(license.product_id.as_str(), |p| p.title.as_str())),
            product.map_or_else(|| Cell::new("-"), |p| render::stage_cell(&p.current_stage)),
            Cell::new(round_label(license.round_acquired)),
            resale,
        ]);
    }
    println!("{table}");
}

pub async fn badges(client: &Marketplace, json: bool) -> Result<()> {
    let progress = client.badges().progress().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&progress)?);
        return Ok(());
    }
    if progress.is_empty() {
        println!("{}", "No badge activity yet.".yellow());
        return Ok(());
    }

    let mut table = render::table(vec!["Type", "Amount", "Tier", "Next", "Progress"]);
    for entry in &progress {
        let next = entry.next_badge();
        table.add_row(vec![
            Cell::new(format!("{:?}", entry.badge_type)),
            Cell::new(format!("{:.2}", entry.current_amount)),
            Cell::new(entry.current_tier.map_or("-", |t| t.label())),
            Cell::new(next.map_or("-", |b| b.name.as_str())),
            Cell::new(next.map_or_else(
                || "100%".to_string(),
                |b| format!("{}%", badge_progress(b, entry.current_amount)),
            )),
        ]);
    }
    println!("{table}");
    Ok(())
}
