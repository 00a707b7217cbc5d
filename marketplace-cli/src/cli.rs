use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "marketplace",
    about = "License marketplace client",
    version = env!("CARGO_PKG_VERSION"),
    author,
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, env = "NEXT_PUBLIC_API_URL", help = "Base URL of the REST API")]
    pub api_url: Option<String>,

    #[arg(long, env = "MARKETPLACE_SESSION_FILE", help = "Where the session is persisted")]
    pub session_file: Option<PathBuf>,

    #[arg(short, long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Sign in and store the session")]
    Login {
        #[arg(help = "Account email")]
        email: String,

        #[arg(long, env = "MARKETPLACE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    #[command(about = "Create an account")]
    Register {
        #[arg(help = "Account email")]
        email: String,

        #[arg(long, help = "Display name")]
        name: String,

        #[arg(long, env = "MARKETPLACE_PASSWORD", hide_env_values = true)]
        password: String,

        #[arg(long, help = "Referral code of the user who invited you")]
        referral_code: Option<String>,
    },

    #[command(about = "Clear the stored session")]
    Logout,

    #[command(about = "Show the signed-in user")]
    Whoami {
        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },

    #[command(about = "Email a password reset link")]
    ForgotPassword {
        #[arg(help = "Account email")]
        email: String,
    },

    #[command(about = "Set a new password from a reset link")]
    ResetPassword {
        #[arg(long, help = "Full link from the reset email")]
        url: String,

        #[arg(long, env = "MARKETPLACE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    #[command(about = "Change the password of the signed-in user")]
    ChangePassword {
        #[arg(long)]
        current: String,

        #[arg(long)]
        new: String,
    },

    #[command(subcommand, about = "Browse and manage products")]
    Products(ProductCommands),

    #[command(subcommand, about = "Marketplace listings and purchases")]
    Market(MarketCommands),

    #[command(subcommand, about = "Owned licenses")]
    Licenses(LicenseCommands),

    #[command(about = "Badge progress")]
    Badges {
        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },

    #[command(subcommand, about = "Referral code and rewards")]
    Referral(ReferralCommands),

    #[command(subcommand, about = "Payouts and Stripe onboarding")]
    Payouts(PayoutCommands),

    #[command(subcommand, about = "Moderation (admins only)")]
    Admin(AdminCommands),

    #[command(subcommand, about = "Colour theme preference")]
    Theme(ThemeCommands),
}

#[derive(Subcommand)]
pub enum ProductCommands {
    #[command(about = "List approved products")]
    List {
        #[arg(short, long, default_value = "1")]
        page: u32,

        #[arg(long, default_value = "10")]
        limit: u32,

        #[arg(short, long, help = "Free-text filter")]
        search: Option<String>,

        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },

    #[command(about = "Show one product")]
    Show {
        id: String,

        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },

    #[command(about = "Products you created")]
    Mine,
}

#[derive(Subcommand)]
pub enum MarketCommands {
    #[command(about = "List marketplace offers")]
    List {
        #[arg(short, long, default_value = "1")]
        page: u32,

        #[arg(long, help = "Only this stage (newboom, blossom, evergreen, exit)")]
        stage: Option<String>,

        #[arg(short, long)]
        search: Option<String>,
    },

    #[command(about = "Buy a license")]
    Buy {
        #[arg(help = "Product ID")]
        product_id: String,

        #[arg(long = "for", value_enum, default_value = "use", help = "Personal use or resale")]
        intent: Intent,
    },

    #[command(about = "Offer an owned license for resale")]
    Resell {
        #[arg(help = "License ID")]
        license_id: String,

        #[arg(long)]
        price: f64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Intent {
    Use,
    Resell,
}

#[derive(Subcommand)]
pub enum LicenseCommands {
    #[command(about = "List your licenses")]
    List {
        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },

    #[command(about = "Check a license key")]
    Verify { key: String },
}

#[derive(Subcommand)]
pub enum ReferralCommands {
    #[command(about = "Show your referral code")]
    Code,

    #[command(about = "Show referral statistics")]
    Stats,

    #[command(about = "Apply someone else's referral code")]
    Apply { code: String },
}

#[derive(Subcommand)]
pub enum PayoutCommands {
    #[command(about = "List payouts")]
    List,

    #[command(about = "Request a payout")]
    Request { amount: f64 },

    #[command(about = "Stripe Connect account status")]
    Status,

    #[command(about = "Print a Stripe onboarding link")]
    Onboard {
        #[arg(long, help = "Generate a fresh link for an expired session")]
        refresh: bool,
    },
}

#[derive(Subcommand)]
pub enum AdminCommands {
    #[command(about = "Dashboard counters")]
    Stats,

    #[command(about = "Products awaiting review")]
    Pending {
        #[arg(short, long, default_value = "1")]
        page: u32,
    },

    #[command(about = "Approve a product")]
    Approve { id: String },

    #[command(about = "Reject a product")]
    Reject {
        id: String,

        #[arg(long)]
        reason: String,
    },

    #[command(about = "List users")]
    Users {
        #[arg(short, long, default_value = "1")]
        page: u32,
    },

    #[command(about = "Suspend or reactivate a user")]
    SetStatus {
        user_id: String,

        #[arg(long, help = "Suspend the account")]
        suspend: bool,

        #[arg(long, help = "Reactivate the account")]
        activate: bool,
    },
}

#[derive(Subcommand)]
pub enum ThemeCommands {
    #[command(about = "Show the stored theme")]
    Get,

    #[command(about = "Store a theme (light, dark, system)")]
    Set { theme: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_buy_intent() {
        let cli = Cli::try_parse_from(["marketplace", "market", "buy", "p-1"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Market(MarketCommands::Buy { intent: Intent::Use, .. })
        ));

        let cli = Cli::try_parse_from(["marketplace", "market", "buy", "p-1", "--for", "resell"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Market(MarketCommands::Buy { intent: Intent::Resell, .. })
        ));
    }

    #[test]
    fn test_reset_password_args() {
        let cli = Cli::try_parse_from([
            "marketplace",
            "--api-url",
            "http://localhost:5000/api",
            "reset-password",
            "--url",
            "https://app.example.com/reset-password?token=t",
            "--password",
            "new-password",
        ])
        .unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("http://localhost:5000/api"));
        assert!(matches!(cli.command, Commands::ResetPassword { .. }));
    }
}
