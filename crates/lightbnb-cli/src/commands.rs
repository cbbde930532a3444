use crate::cli::{GlobalArgs, ReservationsArgs, SearchArgs, UserArgs, UserLookup};
use anyhow::Context;
use lightbnb_db::{DEFAULT_LIMIT, Database, DbConfig, SearchOptions, build_search_query};
use serde::Serialize;

/// Config file if present, otherwise the environment; `--database` wins over both.
pub fn resolve_config(global: &GlobalArgs) -> anyhow::Result<DbConfig> {
    let mut config = if global.config.exists() {
        DbConfig::load(&global.config)
            .with_context(|| format!("failed to load {}", global.config.display()))?
    } else if let Some(url) = &global.database {
        DbConfig::new(url.clone())
    } else {
        DbConfig::from_env().context(
            "no config file found; set DATABASE_URL, pass --database or create lightbnb.toml",
        )?
    };
    if let Some(url) = &global.database {
        config.database_url = url.clone();
    }
    config.validate()?;
    Ok(config)
}

fn connect(global: &GlobalArgs) -> anyhow::Result<Database> {
    let config = resolve_config(global)?;
    Ok(Database::connect(&config)?)
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub async fn user(args: UserArgs) -> anyhow::Result<()> {
    let db = connect(&args.global)?;
    let user = match &args.lookup {
        UserLookup::Email(email) => db.get_user_with_email(email).await?,
        UserLookup::Id(id) => db.get_user_with_id(*id).await?,
    };
    if user.is_none() {
        tracing::info!(lookup = ?args.lookup, "no such user");
    }
    print_json(&user)
}

pub async fn reservations(args: ReservationsArgs) -> anyhow::Result<()> {
    let db = connect(&args.global)?;
    let rows = db
        .get_all_reservations(args.guest_id, args.limit.unwrap_or(DEFAULT_LIMIT))
        .await?;
    tracing::info!(guest_id = args.guest_id, count = rows.len(), "reservations loaded");
    print_json(&rows)
}

pub fn search_options(args: &SearchArgs) -> SearchOptions {
    SearchOptions {
        owner_id: args.owner_id,
        city: args.city.clone(),
        minimum_price_per_night: args.min_price,
        maximum_price_per_night: args.max_price,
        minimum_rating: args.min_rating,
    }
}

#[derive(Debug, Serialize)]
struct DryRun {
    sql: String,
    params: Vec<String>,
}

pub async fn search(args: SearchArgs) -> anyhow::Result<()> {
    let options = search_options(&args);
    let limit = args.limit.unwrap_or(DEFAULT_LIMIT);

    if args.dry_run {
        let q = build_search_query(&options, limit)?;
        return print_json(&DryRun {
            sql: q.to_sql(),
            params: q.debug_params(),
        });
    }

    let db = connect(&args.global)?;
    let rows = db.get_all_properties(&options, limit).await?;
    tracing::info!(count = rows.len(), "properties found");
    print_json(&rows)
}
