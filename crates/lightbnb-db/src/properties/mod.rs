//! `properties` table: filtered search and listing creation.
//!
//! Both statements are assembled with [`Sql`](crate::Sql), so placeholder
//! numbers always line up with the bound values regardless of which filters
//! are present.

mod insert;
mod search;


pub use insert::{NewProperty, PROPERTY_INSERT_COLUMNS, add_property, build_insert_query};
pub use search::{SearchOptions, build_search_query, get_all_properties};

use crate::error::DbResult;
use crate::row::{FromRow, RowExt};
use serde::Serialize;
use tokio_postgres::Row;

/// A `properties` row. `cost_per_night` is in cents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Property {
    pub id: i32,
    pub owner_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_photo_url: String,
    pub cover_photo_url: String,
    pub cost_per_night: i32,
    pub parking_spaces: i32,
    pub number_of_bathrooms: i32,
    pub number_of_bedrooms: i32,
    pub country: String,
    pub street: String,
    pub city: String,
    pub province: String,
    pub post_code: String,
    /// Mean review rating; only present on general search results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,
}

impl FromRow for Property {
    fn from_row(row: &Row) -> DbResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            owner_id: row.try_get_column("owner_id")?,
            title: row.try_get_column("title")?,
            description: row.try_get_column("description")?,
            thumbnail_photo_url: row.try_get_column("thumbnail_photo_url")?,
            cover_photo_url: row.try_get_column("cover_photo_url")?,
            cost_per_night: row.try_get_column("cost_per_night")?,
            parking_spaces: row.try_get_column("parking_spaces")?,
            number_of_bathrooms: row.try_get_column("number_of_bathrooms")?,
            number_of_bedrooms: row.try_get_column("number_of_bedrooms")?,
            country: row.try_get_column("country")?,
            street: row.try_get_column("street")?,
            city: row.try_get_column("city")?,
            province: row.try_get_column("province")?,
            post_code: row.try_get_column("post_code")?,
            average_rating: row.try_get_optional_column("average_rating")?,
        })
    }
}
