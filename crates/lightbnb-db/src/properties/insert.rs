use super::Property;
use crate::client::GenericClient;
use crate::error::{DbError, DbResult};
use crate::sql::{Sql, sql};
use crate::validate;
use serde::Deserialize;

/// Insert column order. [`build_insert_query`] binds [`NewProperty`] fields in exactly this order.
pub const PROPERTY_INSERT_COLUMNS: [&str; 14] = [
    "title",
    "description",
    "number_of_bedrooms",
    "number_of_bathrooms",
    "parking_spaces",
    "cost_per_night",
    "thumbnail_photo_url",
    "cover_photo_url",
    "street",
    "country",
    "city",
    "province",
    "post_code",
    "owner_id",
];

/// A listing to create. `cost_per_night` is in cents.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewProperty {
    pub title: String,
    pub description: String,
    pub number_of_bedrooms: i32,
    pub number_of_bathrooms: i32,
    pub parking_spaces: i32,
    pub cost_per_night: i32,
    pub thumbnail_photo_url: String,
    pub cover_photo_url: String,
    pub street: String,
    pub country: String,
    pub city: String,
    pub province: String,
    pub post_code: String,
    pub owner_id: i32,
}

impl NewProperty {
    pub fn validate(&self) -> DbResult<()> {
        validate::require_non_blank("title", &self.title)?;
        validate::require_non_blank("city", &self.city)?;
        validate::require_non_negative("number_of_bedrooms", self.number_of_bedrooms)?;
        validate::require_non_negative("number_of_bathrooms", self.number_of_bathrooms)?;
        validate::require_non_negative("parking_spaces", self.parking_spaces)?;
        validate::require_non_negative("cost_per_night", self.cost_per_night)?;
        if self.owner_id <= 0 {
            return Err(DbError::validation(format!(
                "owner_id must be a positive id (got {})",
                self.owner_id
            )));
        }
        Ok(())
    }
}

/// Build `INSERT INTO properties (...) VALUES ($1, ..., $14) RETURNING *`.
pub fn build_insert_query(property: &NewProperty) -> Sql {
    let mut q = sql("INSERT INTO properties (");
    q.tag("properties.insert");
    q.push(&PROPERTY_INSERT_COLUMNS.join(", "));
    q.push(") VALUES (");

    let p = property.clone();
    q.push_bind(p.title)
        .push(", ")
        .push_bind(p.description)
        .push(", ")
        .push_bind(p.number_of_bedrooms)
        .push(", ")
        .push_bind(p.number_of_bathrooms)
        .push(", ")
        .push_bind(p.parking_spaces)
        .push(", ")
        .push_bind(p.cost_per_night)
        .push(", ")
        .push_bind(p.thumbnail_photo_url)
        .push(", ")
        .push_bind(p.cover_photo_url)
        .push(", ")
        .push_bind(p.street)
        .push(", ")
        .push_bind(p.country)
        .push(", ")
        .push_bind(p.city)
        .push(", ")
        .push_bind(p.province)
        .push(", ")
        .push_bind(p.post_code)
        .push(", ")
        .push_bind(p.owner_id);

    q.push(") RETURNING *");
    q
}

/// Validate and insert a listing, returning the stored row.
pub async fn add_property(conn: &impl GenericClient, property: &NewProperty) -> DbResult<Property> {
    property.validate()?;
    build_insert_query(property).fetch_one_as(conn).await
}
