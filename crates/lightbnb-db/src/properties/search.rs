use super::Property;
use crate::client::GenericClient;
use crate::error::{DbError, DbResult};
use crate::sql::{Sql, sql};
use crate::validate::{self, dollars_to_cents};
use serde::Deserialize;
use serde::de::{self, Deserializer};
use std::fmt;
use std::str::FromStr;

const OWNER_LISTINGS_SQL: &str = "SELECT * FROM properties WHERE owner_id = ";

const SEARCH_BASE_SQL: &str = "SELECT properties.*, avg(property_reviews.rating)::float8 AS average_rating \
     FROM properties \
     JOIN property_reviews ON properties.id = property_reviews.property_id";

/// Filters for [`get_all_properties`]. Every field is optional.
///
/// Prices are dollars per night (cents allowed); they are compared against
/// `cost_per_night` in cents. Deserializing accepts search-form input: a blank
/// string means "no filter" and numbers may arrive as strings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// "My listings": when set, every other filter is ignored.
    #[serde(deserialize_with = "blank_as_none")]
    pub owner_id: Option<i32>,
    /// Substring match on the city name.
    pub city: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    pub minimum_price_per_night: Option<f64>,
    #[serde(deserialize_with = "blank_as_none")]
    pub maximum_price_per_night: Option<f64>,
    /// Lower bound on the mean review rating (0 to 5).
    #[serde(deserialize_with = "blank_as_none")]
    pub minimum_rating: Option<f64>,
}

/// A form field: either already typed, or text that still needs parsing.
#[derive(Deserialize)]
#[serde(untagged)]
enum FormValue<T> {
    Value(T),
    Text(String),
}

fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: fmt::Display,
{
    match Option::<FormValue<T>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(FormValue::Value(v)) => Ok(Some(v)),
        Some(FormValue::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            text.parse()
                .map(Some)
                .map_err(|e| de::Error::custom(format!("invalid value {text:?}: {e}")))
        }
    }
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn owner(mut self, owner_id: i32) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn min_price(mut self, dollars: impl Into<f64>) -> Self {
        self.minimum_price_per_night = Some(dollars.into());
        self
    }

    pub fn max_price(mut self, dollars: impl Into<f64>) -> Self {
        self.maximum_price_per_night = Some(dollars.into());
        self
    }

    pub fn min_rating(mut self, rating: f64) -> Self {
        self.minimum_rating = Some(rating);
        self
    }

    /// City filter with surrounding whitespace removed; blank counts as absent.
    fn city_filter(&self) -> Option<&str> {
        self.city
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }

    fn price_bounds_cents(&self) -> DbResult<(Option<i32>, Option<i32>)> {
        let min = self
            .minimum_price_per_night
            .map(|d| dollars_to_cents("minimum_price_per_night", d))
            .transpose()?;
        let max = self
            .maximum_price_per_night
            .map(|d| dollars_to_cents("maximum_price_per_night", d))
            .transpose()?;
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Err(DbError::validation(format!(
                    "minimum_price_per_night ({min} cents) exceeds maximum_price_per_night ({max} cents)"
                )));
            }
        }
        Ok((min, max))
    }

    fn rating_floor(&self) -> DbResult<Option<f64>> {
        match self.minimum_rating {
            Some(r) if !(0.0..=5.0).contains(&r) => Err(DbError::validation(format!(
                "minimum_rating must be between 0 and 5 (got {r})"
            ))),
            other => Ok(other),
        }
    }
}

/// Escape `LIKE` wildcards so user input only ever matches literally.
fn like_contains(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Build the property search statement.
///
/// With `owner_id` set this is a plain listing of that owner's properties.
/// Otherwise properties are joined to their reviews and each present filter
/// adds its own predicate:
///
/// ```text
/// ... WHERE properties.city LIKE $1
///       AND properties.cost_per_night >= $2
///       AND properties.cost_per_night <= $3
///     GROUP BY properties.id
///     HAVING avg(property_reviews.rating)::float8 >= $4
///     LIMIT $5
/// ```
pub fn build_search_query(options: &SearchOptions, limit: i64) -> DbResult<Sql> {
    let limit = validate::check_limit(limit)?;

    if let Some(owner_id) = options.owner_id {
        let mut q = sql(OWNER_LISTINGS_SQL);
        q.tag("properties.by_owner");
        q.push_bind(owner_id).limit(limit);
        return Ok(q);
    }

    let (min_cents, max_cents) = options.price_bounds_cents()?;
    let rating_floor = options.rating_floor()?;

    let mut predicates = Vec::new();
    if let Some(city) = options.city_filter() {
        let mut p = Sql::new("properties.city LIKE ");
        p.push_bind(like_contains(city));
        predicates.push(p);
    }
    if let Some(cents) = min_cents {
        let mut p = Sql::new("properties.cost_per_night >= ");
        p.push_bind(cents);
        predicates.push(p);
    }
    if let Some(cents) = max_cents {
        let mut p = Sql::new("properties.cost_per_night <= ");
        p.push_bind(cents);
        predicates.push(p);
    }

    let mut q = sql(SEARCH_BASE_SQL);
    q.tag("properties.search");
    q.push_where_and(predicates);
    q.push(" GROUP BY properties.id");
    if let Some(rating) = rating_floor {
        q.push(" HAVING avg(property_reviews.rating)::float8 >= ")
            .push_bind(rating);
    }
    q.limit(limit);
    Ok(q)
}

/// Search properties; see [`build_search_query`] for how filters combine.
pub async fn get_all_properties(
    conn: &impl GenericClient,
    options: &SearchOptions,
    limit: i64,
) -> DbResult<Vec<Property>> {
    let q = build_search_query(options, limit)?;
    tracing::debug!(
        target: "lightbnb.properties",
        owner_id = ?options.owner_id,
        city = ?options.city_filter(),
        param_count = q.param_count(),
        "searching properties"
    );
    q.fetch_all_as(conn).await
}
