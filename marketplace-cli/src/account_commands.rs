use anyhow::Result;
use colored::Colorize;
use comfy_table::{Cell, Color};
use marketplace_client::Marketplace;
use marketplace_types::models::PayoutStatus;

use crate::cli::{PayoutCommands, ReferralCommands};
use crate::render;

pub async fn handle_referral(client: &Marketplace, cmd: ReferralCommands) -> Result<()> {
    match cmd {
        ReferralCommands::Code => {
            let code = client.referral().code().await?;
            println!("Your referral code: {}", code.code.green().bold());
            if let Some(link) = code.link {
                println!("Share: {}", link);
            }
            Ok(())
        },
        ReferralCommands::Stats => {
            let stats = client.referral().stats().await?;
            let currency = client.preferences().settings().currency;
            println!("{}", "Referrals".cyan().bold());
            println!("  Signed up: {}", stats.total_referrals);
            println!("  Active:    {}", stats.active_referrals);
            println!("  Earned:    {}", render::money(stats.total_earnings, &currency));
            Ok(())
        },
        ReferralCommands::Apply { code } => {
            client.referral().apply(&code).await?;
            println!("{} Referral code applied", "✓".green());
            Ok(())
        },
    }
}

pub async fn handle_payouts(client: &Marketplace, cmd: PayoutCommands) -> Result<()> {
    match cmd {
        PayoutCommands::List => list_payouts(client).await,
        PayoutCommands::Request { amount } => {
            if amount <= 0.0 {
                anyhow::bail!("Amount must be positive");
            }
            let payout = client.payouts().request(amount).await?;
            println!("{} Payout {} requested ({:?})", "✓".green(), payout.id, payout.status);
            Ok(())
        },
        PayoutCommands::Status => connect_status(client).await,
        PayoutCommands::Onboard { refresh } => {
            let link = if refresh {
                client.payouts().refresh_link().await?
            } else {
                client.payouts().onboarding_link().await?
            };
            println!("Open this link to finish Stripe onboarding:\n{}", link.url.cyan());
            Ok(())
        },
    }
}

async fn list_payouts(client: &Marketplace) -> Result<()> {
    let payouts = client.payouts().list().await?;
    if payouts.is_empty() {
        println!("{}", "No payouts yet.".yellow());
        return Ok(());
    }
    let currency = client.preferences().settings().currency;
    let mut table = render::table(vec!["ID", "Amount", "Status", "Requested"]);
    for payout in &payouts {
        let status = match payout.status {
            PayoutStatus::Paid => Cell::new("Paid").fg(Color::Green),
            PayoutStatus::Failed => Cell::new("Failed").fg(Color::Red),
            PayoutStatus::Processing => Cell::new("Processing").fg(Color::Blue),
            PayoutStatus::Pending => Cell::new("Pending").fg(Color::Yellow),
        };
        table.add_row(vec![
            Cell::new(&payout.id),
            Cell::new(render::money(payout.amount, &currency)),
            status,
            Cell::new(
                payout
                    .created_at
                    .map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string()),
            ),
        ]);
    }
    println!("{table}");
    Ok(())
}

async fn connect_status(client: &Marketplace) -> Result<()> {
    let status = client.payouts().connect_status().await?;
    let flag = |on: bool| if on { "yes".green() } else { "no".red() };
    println!("{}", "Stripe Connect".cyan().bold());
    println!("  Connected:         {}", flag(status.connected));
    println!("  Details submitted: {}", flag(status.details_submitted));
    println!("  Charges enabled:   {}", flag(status.charges_enabled));
    println!("  Payouts enabled:   {}", flag(status.payouts_enabled));

    if status.needs_onboarding() && !client.preferences().stripe_alert_dismissed() {
        println!(
            "\n{} Finish onboarding with {}",
            "!".yellow().bold(),
            "marketplace payouts onboard".cyan()
        );
        client.preferences().dismiss_stripe_alert()?;
    }
    Ok(())
}
