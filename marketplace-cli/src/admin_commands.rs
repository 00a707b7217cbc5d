use anyhow::Result;
use colored::Colorize;
use comfy_table::{Cell, Color};
use marketplace_client::api::AccountStatus;
use marketplace_client::{GuardDecision, Marketplace, RouteGuard};
use marketplace_types::models::PageQuery;
use marketplace_types::ProductStatus;

use crate::cli::AdminCommands;
use crate::render;

pub async fn handle_admin(client: &Marketplace, cmd: AdminCommands) -> Result<()> {
    require_admin(client).await?;

    match cmd {
        AdminCommands::Stats => {
            let stats = client.admin().stats().await?;
            let currency = client.preferences().settings().currency;
            println!("{}", "Marketplace".cyan().bold());
            println!("  Users:            {}", stats.total_users);
            println!("  Products:         {}", stats.total_products);
            println!("  Pending review:   {}", stats.pending_products);
            println!("  Revenue:          {}", render::money(stats.total_revenue, &currency));
            Ok(())
        },
        AdminCommands::Pending { page } => {
            let result =
                client
                    .admin()
                    .products(Some(ProductStatus::Pending), &PageQuery::page(page))
                    .await?;
            if result.is_empty() {
                println!("{}", "Nothing to review.".green());
                return Ok(());
            }
            let mut table = render::table(vec!["ID", "Title", "Creator", "Licenses", "Stage"]);
            for product in &result.items {
                table.add_row(vec![
                    Cell::new(&product.id),
                    Cell::new(&product.title),
                    Cell::new(product.creator_id.as_deref().unwrap_or("-")),
                    Cell::new(product.total_licenses),
                    render::stage_cell(&product.current_stage),
                ]);
            }
            println!("{table}");
            render::print_pagination(result.pagination);
            Ok(())
        },
        AdminCommands::Approve { id } => {
            let product = client.admin().approve(&id).await?;
            println!("{} Approved {}", "✓".green(), product.title.green());
            Ok(())
        },
        AdminCommands::Reject { id, reason } => {
            if reason.trim().is_empty() {
                anyhow::bail!("A rejection reason is required");
            }
            let product = client.admin().reject(&id, reason.trim()).await?;
            println!("{} Rejected {}", "✓".green(), product.title);
            Ok(())
        },
        AdminCommands::Users { page } => {
            let result = client.admin().users(&PageQuery::page(page)).await?;
            let mut table = render::table(vec!["ID", "Email", "Role", "Status"]);
            for row in &result.items {
                let status = match row.status {
                    AccountStatus::Active => Cell::new("Active").fg(Color::Green),
                    AccountStatus::Suspended => Cell::new("Suspended").fg(Color::Red),
                };
                table.add_row(vec![
                    Cell::new(&row.user.id),
                    Cell::new(&row.user.email),
                    Cell::new(&row.user.role),
                    status,
                ]);
            }
            println!("{table}");
            render::print_pagination(result.pagination);
            Ok(())
        },
        AdminCommands::SetStatus { user_id, suspend, activate } => {
            if suspend == activate {
                anyhow::bail!("Specify either --suspend or --activate");
            }
            let status = if suspend { AccountStatus::Suspended } else { AccountStatus::Active };
            let row = client.admin().set_user_status(&user_id, status).await?;
            println!("{} {} is now {:?}", "✓".green(), row.user.email, row.status);
            Ok(())
        },
    }
}

async fn require_admin(client: &Marketplace) -> Result<()> {
    match client.check_route(&RouteGuard::admin_only()).await {
        GuardDecision::Allow => Ok(()),
        GuardDecision::Redirect(route) if route == marketplace_client::LOGIN_ROUTE => {
            anyhow::bail!("Sign in first: marketplace login <email>")
        },
        GuardDecision::Redirect(_) => anyhow::bail!("This command requires an admin account"),
        GuardDecision::Pending => anyhow::bail!("Could not determine your role; try again"),
    }
}
