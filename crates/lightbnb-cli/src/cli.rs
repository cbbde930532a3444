use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpTopic {
    Root,
    User,
    Reservations,
    Search,
}

#[derive(Debug, Clone)]
pub enum Command {
    Help(HelpTopic),
    User(UserArgs),
    Reservations(ReservationsArgs),
    Search(SearchArgs),
}

/// Connection options every command accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalArgs {
    pub config: PathBuf,
    pub database: Option<String>,
}

impl Default for GlobalArgs {
    fn default() -> Self {
        Self {
            config: PathBuf::from("lightbnb.toml"),
            database: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserLookup {
    Email(String),
    Id(i32),
}

#[derive(Debug, Clone)]
pub struct UserArgs {
    pub global: GlobalArgs,
    pub lookup: UserLookup,
}

#[derive(Debug, Clone)]
pub struct ReservationsArgs {
    pub global: GlobalArgs,
    pub guest_id: i32,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct SearchArgs {
    pub global: GlobalArgs,
    pub owner_id: Option<i32>,
    pub city: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_rating: Option<f64>,
    pub limit: Option<i64>,
    pub dry_run: bool,
}

pub fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let mut it = args.iter().skip(1);
    let Some(first) = it.next() else {
        return Ok(Command::Help(HelpTopic::Root));
    };

    match first.as_str() {
        "-h" | "--help" => Ok(Command::Help(HelpTopic::Root)),
        "user" => parse_user(it.map(|s| s.as_str())),
        "reservations" => parse_reservations(it.map(|s| s.as_str())),
        "search" => parse_search(it.map(|s| s.as_str())),
        _ => anyhow::bail!("unknown command: {first}"),
    }
}

/// Pull the value for `flag` from either `--flag value` or `--flag=value`.
fn flag_value<'a>(
    flag: &str,
    token: &'a str,
    it: &mut impl Iterator<Item = &'a str>,
) -> anyhow::Result<Option<&'a str>> {
    if token == flag {
        let Some(v) = it.next() else {
            anyhow::bail!("{flag} requires a value");
        };
        return Ok(Some(v));
    }
    Ok(token
        .strip_prefix(flag)
        .and_then(|rest| rest.strip_prefix('=')))
}

fn parse_number<T: std::str::FromStr>(flag: &str, value: &str) -> anyhow::Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid value for {flag}: {value:?} ({e})"))
}

/// Consume `--config` / `--database`. Returns `false` if `token` is neither.
fn parse_global<'a>(
    token: &'a str,
    it: &mut impl Iterator<Item = &'a str>,
    global: &mut GlobalArgs,
) -> anyhow::Result<bool> {
    if let Some(v) = flag_value("--config", token, &mut *it)? {
        global.config = PathBuf::from(v);
        return Ok(true);
    }
    if let Some(v) = flag_value("--database", token, &mut *it)? {
        global.database = Some(v.to_string());
        return Ok(true);
    }
    Ok(false)
}

fn parse_user<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut global = GlobalArgs::default();
    let mut lookup: Option<UserLookup> = None;

    while let Some(token) = it.next() {
        if matches!(token, "-h" | "--help") {
            return Ok(Command::Help(HelpTopic::User));
        }
        if parse_global(token, &mut it, &mut global)? {
            continue;
        }
        let next = if let Some(v) = flag_value("--email", token, &mut it)? {
            UserLookup::Email(v.to_string())
        } else if let Some(v) = flag_value("--id", token, &mut it)? {
            UserLookup::Id(parse_number("--id", v)?)
        } else {
            anyhow::bail!("unknown argument: {token}");
        };
        if lookup.is_some() {
            anyhow::bail!("pass exactly one of --email or --id");
        }
        lookup = Some(next);
    }

    let Some(lookup) = lookup else {
        anyhow::bail!("user requires --email <EMAIL> or --id <ID>");
    };
    Ok(Command::User(UserArgs { global, lookup }))
}

fn parse_reservations<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut global = GlobalArgs::default();
    let mut guest_id: Option<i32> = None;
    let mut limit: Option<i64> = None;

    while let Some(token) = it.next() {
        if matches!(token, "-h" | "--help") {
            return Ok(Command::Help(HelpTopic::Reservations));
        }
        if parse_global(token, &mut it, &mut global)? {
            continue;
        }
        if let Some(v) = flag_value("--guest", token, &mut it)? {
            guest_id = Some(parse_number("--guest", v)?);
        } else if let Some(v) = flag_value("--limit", token, &mut it)? {
            limit = Some(parse_number("--limit", v)?);
        } else {
            anyhow::bail!("unknown argument: {token}");
        }
    }

    let Some(guest_id) = guest_id else {
        anyhow::bail!("reservations requires --guest <ID>");
    };
    Ok(Command::Reservations(ReservationsArgs {
        global,
        guest_id,
        limit,
    }))
}

fn parse_search<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut args = SearchArgs {
        global: GlobalArgs::default(),
        owner_id: None,
        city: None,
        min_price: None,
        max_price: None,
        min_rating: None,
        limit: None,
        dry_run: false,
    };

    while let Some(token) = it.next() {
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Search)),
            "--dry-run" => {
                args.dry_run = true;
                continue;
            }
            _ => {}
        }
        if parse_global(token, &mut it, &mut args.global)? {
            continue;
        }
        if let Some(v) = flag_value("--owner", token, &mut it)? {
            args.owner_id = Some(parse_number("--owner", v)?);
        } else if let Some(v) = flag_value("--city", token, &mut it)? {
            args.city = Some(v.to_string());
        } else if let Some(v) = flag_value("--min-price", token, &mut it)? {
            args.min_price = Some(parse_number("--min-price", v)?);
        } else if let Some(v) = flag_value("--max-price", token, &mut it)? {
            args.max_price = Some(parse_number("--max-price", v)?);
        } else if let Some(v) = flag_value("--min-rating", token, &mut it)? {
            args.min_rating = Some(parse_number("--min-rating", v)?);
        } else if let Some(v) = flag_value("--limit", token, &mut it)? {
            args.limit = Some(parse_number("--limit", v)?);
        } else {
            anyhow::bail!("unknown argument: {token}");
        }
    }

    Ok(Command::Search(args))
}

pub fn print_help(topic: HelpTopic) {
    match topic {
        HelpTopic::Root => {
            println!(
                "\
lightbnb - query the LightBnB database

USAGE:
  lightbnb <COMMAND> [OPTIONS]

COMMANDS:
  user          Look up a user by email or id
  reservations  List a guest's reservations
  search        Search properties

Run `lightbnb <command> --help` for more."
            );
        }
        HelpTopic::User => {
            println!(
                "\
USAGE:
  lightbnb user --email <EMAIL> [OPTIONS]
  lightbnb user --id <ID> [OPTIONS]

OPTIONS:
  --config <FILE>       Config file path (default: lightbnb.toml)
  --database <URL>      Override database.url from config
  -h, --help            Print help"
            );
        }
        HelpTopic::Reservations => {
            println!(
                "\
USAGE:
  lightbnb reservations --guest <ID> [OPTIONS]

OPTIONS:
  --limit <N>           Maximum rows (default: 10)
  --config <FILE>       Config file path (default: lightbnb.toml)
  --database <URL>      Override database.url from config
  -h, --help            Print help"
            );
        }
        HelpTopic::Search => {
            println!(
                "\
USAGE:
  lightbnb search [OPTIONS]

FILTERS:
  --owner <ID>          Only this owner's listings (other filters ignored)
  --city <TEXT>         City contains TEXT
  --min-price <DOLLARS> Minimum nightly price
  --max-price <DOLLARS> Maximum nightly price
  --min-rating <R>      Minimum average review rating (0-5)
  --limit <N>           Maximum rows (default: 10)

OPTIONS:
  --dry-run             Print the SQL and parameters without connecting
  --config <FILE>       Config file path (default: lightbnb.toml)
  --database <URL>      Override database.url from config
  -h, --help            Print help"
            );
        }
    }
}
