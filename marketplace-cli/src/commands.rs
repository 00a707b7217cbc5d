use anyhow::Result;
use colored::Colorize;
use marketplace_client::api::RegisterRequest;
use marketplace_client::flows::{
    ForgotPasswordFlow, FormState, ResetPasswordFlow, ResetState, ToastQueue,
};
use marketplace_client::{Marketplace, Theme};

use crate::cli::{Commands, ThemeCommands};
use crate::render;

pub async fn dispatch(client: &Marketplace, command: Commands) -> Result<()> {
    match command {
        Commands::Login { email, password } => login(client, &email, &password).await,
        Commands::Register { email, name, password, referral_code } => {
            register(client, &email, &name, &password, referral_code.as_deref()).await
        },
        Commands::Logout => logout(client).await,
        Commands::Whoami { json } => whoami(client, json).await,
        Commands::ForgotPassword { email } => forgot_password(client, email).await,
        Commands::ResetPassword { url, password } => reset_password(client, &url, &password).await,
        Commands::ChangePassword { current, new } => {
            client.auth().change_password(&current, &new).await?;
            println!("{} Password changed", "✓".green());
            Ok(())
        },
        Commands::Products(cmd) => crate::catalog_commands::handle_products(client, cmd).await,
        Commands::Market(cmd) => crate::catalog_commands::handle_market(client, cmd).await,
        Commands::Licenses(cmd) => crate::catalog_commands::handle_licenses(client, cmd).await,
        Commands::Badges { json } => crate::catalog_commands::badges(client, json).await,
        Commands::Referral(cmd) => crate::account_commands::handle_referral(client, cmd).await,
        Commands::Payouts(cmd) => crate::account_commands::handle_payouts(client, cmd).await,
        Commands::Admin(cmd) => crate::admin_commands::handle_admin(client, cmd).await,
        Commands::Theme(cmd) => theme(client, cmd),
    }
}

async fn login(client: &Marketplace, email: &str, password: &str) -> Result<()> {
    let user = client.auth().login(email, password).await?;
    println!(
        "{} Signed in as {} ({})",
        "✓".green(),
        user.email.green(),
        user.role
    );
    Ok(())
}

async fn register(
    client: &Marketplace,
    email: &str,
    name: &str,
    password: &str,
    referral_code: Option<&str>,
) -> Result<()> {
    let request = RegisterRequest { name, email, password, referral_code };
    let user = client.auth().register(&request).await?;
    if client.session().is_authenticated() {
        println!("{} Account created, signed in as {}", "✓".green(), user.email.green());
    } else {
        println!("{} Account created. Check {} to verify your email.", "✓".green(), user.email);
    }
    Ok(())
}

async fn logout(client: &Marketplace) -> Result<()> {
    if !client.session().is_authenticated() {
        println!("{}", "Not signed in.".yellow());
        return Ok(());
    }
    client.auth().logout().await;
    println!("{} Signed out", "✓".green());
    Ok(())
}

async fn whoami(client: &Marketplace, json: bool) -> Result<()> {
    if !client.session().is_authenticated() {
        println!("{}", "Not signed in.".yellow());
        return Ok(());
    }
    let user = client.auth().current_user().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&user)?);
        return Ok(());
    }

    println!("{}", user.name.as_deref().unwrap_or(&user.email).cyan().bold());
    println!("  Email:    {}", user.email);
    println!("  Role:     {}", user.role);
    println!("  Verified: {}", if user.email_verified { "yes".green() } else { "no".yellow() });
    if let Some(credits) = user.credits {
        println!("  Credits:  {:.2}", credits);
    }
    Ok(())
}

async fn forgot_password(client: &Marketplace, email: String) -> Result<()> {
    let toasts = ToastQueue::new();
    let mut flow = ForgotPasswordFlow::new(client, toasts.clone());
    flow.set_email(email);
    let state = flow.submit().await;

    if let Some(err) = flow.field_error() {
        anyhow::bail!("{}", err);
    }
    let failed = render::print_toasts(&toasts);
    if state != FormState::CheckEmail || failed {
        anyhow::bail!("Password reset email was not sent");
    }
    Ok(())
}

async fn reset_password(client: &Marketplace, url: &str, password: &str) -> Result<()> {
    let toasts = ToastQueue::new();
    let mut flow = ResetPasswordFlow::new(client, toasts.clone(), url)?;
    // The CLI asks for the password once; confirmation is implicit.
    let state = flow.submit(password, password).await;

    if let Some(err) = flow.field_error() {
        anyhow::bail!("{}", err);
    }
    render::print_toasts(&toasts);
    match (state, flow.redirect()) {
        (ResetState::Complete, Some(_)) => {
            println!("Run {} to sign in.", "marketplace login <email>".cyan());
            Ok(())
        },
        _ => anyhow::bail!("Password was not changed"),
    }
}

fn theme(client: &Marketplace, cmd: ThemeCommands) -> Result<()> {
    match cmd {
        ThemeCommands::Get => {
            println!("{}", client.preferences().theme());
            Ok(())
        },
        ThemeCommands::Set { theme } => {
            let theme: Theme = theme.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            client.preferences().set_theme(theme)?;
            println!("{} Theme set to {}", "✓".green(), theme);
            Ok(())
        },
    }
}
