use clap::Parser;
use hiden_renew::{flow, LoginOutcome, RenewOutcome, Settings};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "hiden-renew")]
#[command(about = "Unattended HidenCloud service renewal")]
#[command(version)]
struct Cli {
    /// Run with a visible browser window
    #[arg(long)]
    headed: bool,

    /// Validate configuration without launching a browser
    #[arg(long)]
    check: bool,

    /// Log in but skip the renewal flow
    #[arg(long)]
    login_only: bool,

    /// Verbose output (-v for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode (only errors)
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> hiden_renew::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = if cli.quiet {
        Level::ERROR
    } else {
        match cli.verbose {
            0 => Level::INFO,
            _ => Level::DEBUG,
        }
    };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    let mut settings = Settings::from_env();
    if cli.headed {
        settings.headless = false;
    }

    if cli.check {
        println!("Target: {}", settings.service_url());
        println!(
            "  Cookie auth: {}",
            if settings.cookie.is_some() { "available" } else { "not set" }
        );
        println!(
            "  Credential auth: {}",
            if settings.credentials().is_some() { "available" } else { "not set" }
        );
        if !settings.has_auth_path() {
            println!("  No usable authentication path");
            std::process::exit(1);
        }
        return Ok(());
    }

    let stealth = eoka::StealthConfig {
        headless: settings.headless,
        viewport_width: 1280,
        viewport_height: 720,
        ..Default::default()
    };
    let browser = eoka::Browser::launch_with_config(stealth).await?;
    let page = browser.new_page("about:blank").await?;

    let mut success = false;
    match flow::auth::login(&page, &settings).await {
        LoginOutcome::Authenticated(method) => {
            println!("✓ Logged in via {}", method);
            if cli.login_only {
                success = true;
            } else {
                match flow::renew::renew(&page, &settings).await {
                    RenewOutcome::Renewed => {
                        println!("✓ Renewal flow completed");
                        success = true;
                    }
                    RenewOutcome::Failed(kind) => println!("✗ Renewal failed ({})", kind),
                }
            }
        }
        LoginOutcome::Failed(kind) => println!("✗ Login failed ({})", kind),
    }

    browser.close().await?;

    if !success {
        std::process::exit(1);
    }

    Ok(())
}
