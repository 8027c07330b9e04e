//! Reference data seeder for the chart builder.
//!
//! Seeds countries and business domains. With `--with-demo`, also creates a
//! demo company carrying a complete chart that passes submission checks.
//! With `--token <user>`, prints a bearer token for local development signed
//! with the configured `jwt.secret`, and seeds nothing.
//!
//! Usage: cargo run --bin seeder [-- --with-demo | --token <user>]

use anyhow::Context;
use coa_core::chart::demo::demo_accounts;
use coa_core::chart::{AccountStore, Company, CompanyStore};
use coa_db::{AccountRepository, CompanyRepository, ReferenceRepository};
use coa_shared::{AppConfig, JwtConfig, JwtService, UserId};

const COUNTRIES: &[(&str, &str)] = &[
    ("Australia", "au"),
    ("Brazil", "br"),
    ("Canada", "ca"),
    ("France", "fr"),
    ("Germany", "de"),
    ("India", "in"),
    ("Indonesia", "id"),
    ("Kenya", "ke"),
    ("Mexico", "mx"),
    ("Netherlands", "nl"),
    ("Saudi Arabia", "sa"),
    ("Singapore", "sg"),
    ("South Africa", "za"),
    ("United Arab Emirates", "ae"),
    ("United Kingdom", "gb"),
    ("United States", "us"),
];

const DOMAINS: &[&str] = &[
    "Agriculture",
    "Distribution",
    "Education",
    "Healthcare",
    "Manufacturing",
    "Non Profit",
    "Retail",
    "Services",
];

const DEMO_COMPANY: &str = "Demo Company";
const DEMO_ABBR: &str = "DC";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Some(position) = args.iter().position(|arg| arg == "--token") {
        let user = args
            .get(position + 1)
            .context("--token needs a user, e.g. --token ana@example.com")?;
        println!("{}", dev_token(&UserId::new(user.as_str()))?);
        return Ok(());
    }

    let with_demo = args.iter().any(|arg| arg == "--with-demo");
    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    println!("Connecting to database...");
    let db = coa_db::connect(&database_url)
        .await
        .context("failed to connect to database")?;

    println!("Seeding countries...");
    let reference = ReferenceRepository::new(db.clone());
    let mut inserted = 0;
    for (name, code) in COUNTRIES {
        if reference.ensure_country(name, code).await? {
            inserted += 1;
        }
    }
    println!("  {inserted} new, {} already present", COUNTRIES.len() - inserted);

    println!("Seeding domains...");
    let mut inserted = 0;
    for name in DOMAINS {
        if reference.ensure_domain(name).await? {
            inserted += 1;
        }
    }
    println!("  {inserted} new, {} already present", DOMAINS.len() - inserted);

    if with_demo {
        println!("Seeding demo chart...");
        seed_demo_chart(&db).await?;
    }

    println!("Seeding complete!");
    Ok(())
}

/// Creates the demo company and its chart unless it already exists.
async fn seed_demo_chart(db: &sea_orm::DatabaseConnection) -> anyhow::Result<()> {
    let companies = CompanyRepository::new(db.clone());
    if companies.find(DEMO_COMPANY).await?.is_some() {
        println!("  {DEMO_COMPANY} already exists, skipping...");
        return Ok(());
    }

    let company = Company {
        name: DEMO_COMPANY.to_string(),
        company_name: DEMO_COMPANY.to_string(),
        abbr: DEMO_ABBR.to_string(),
        country: "India".to_string(),
        default_currency: "INR".to_string(),
        chart_of_accounts: None,
        chart_of_accounts_name: None,
        submitted: false,
        forked: true,
        forked_from: None,
        stars: 0,
        stars_given_by: Vec::new(),
        domain: None,
        included_in_erpnext: false,
    };
    companies.insert(&company).await?;

    let accounts = demo_accounts(DEMO_COMPANY, DEMO_ABBR);
    AccountRepository::new(db.clone())
        .insert_many(&accounts)
        .await?;
    println!("  Created {DEMO_COMPANY} with {} accounts", accounts.len());
    Ok(())
}

/// Issues a token the server accepts, using the server's own JWT settings.
fn dev_token(user: &UserId) -> anyhow::Result<String> {
    let config = AppConfig::load().context("failed to load configuration")?;
    let jwt = JwtService::new(JwtConfig {
        secret: config.jwt.secret,
        token_expires_secs: i64::try_from(config.jwt.token_expiry_secs)
            .context("jwt.token_expiry_secs out of range")?,
    });
    Ok(jwt.generate_token(user)?)
}
