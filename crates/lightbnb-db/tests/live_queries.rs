//! Accessors against a real Postgres.
//!
//! Skipped unless `DATABASE_URL` is set (a `.env` file works too). Each test
//! creates the schema as temporary tables inside a transaction and rolls it
//! back, so the target database is left untouched.

use lightbnb_db::monitor::{LoggedClient, MonitorConfig};
use lightbnb_db::{
    DEFAULT_LIMIT, DbError, NewProperty, NewUser, Property, SearchOptions, add_property,
    add_user, get_all_properties, get_all_reservations, get_user_with_email, get_user_with_id,
};
use std::time::Duration;

const SCHEMA: &str = include_str!("fixtures/schema.sql");

async fn try_connect() -> Option<tokio_postgres::Client> {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").ok()?;
    let (client, connection) = tokio_postgres::connect(&database_url, tokio_postgres::NoTls)
        .await
        .expect("Failed to connect to DATABASE_URL with NoTls");
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            eprintln!("tokio-postgres connection error: {e}");
        }
    });
    Some(client)
}

fn guest(name: &str) -> NewUser {
    NewUser {
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        password: "$2a$10$FB/BOAVhpuLvpOREQVmvmezD4ED/.JBIDRh70tGevYzYzQgFId2u.".to_string(),
    }
}

fn listing(owner_id: i32, title: &str, city: &str, cost_per_night: i32) -> NewProperty {
    NewProperty {
        title: title.to_string(),
        description: "description".to_string(),
        number_of_bedrooms: 2,
        number_of_bathrooms: 1,
        parking_spaces: 1,
        cost_per_night,
        thumbnail_photo_url: "https://images.pexels.com/photos/2086676/thumb.jpeg".to_string(),
        cover_photo_url: "https://images.pexels.com/photos/2086676/cover.jpeg".to_string(),
        street: "1 Ocean Drive".to_string(),
        country: "United States".to_string(),
        city: city.to_string(),
        province: "Florida".to_string(),
        post_code: "33139".to_string(),
        owner_id,
    }
}

async fn add_review(
    tx: &tokio_postgres::Transaction<'_>,
    guest_id: i32,
    property_id: i32,
    rating: i16,
) {
    let row = tx
        .query_one(
            "INSERT INTO reservations (start_date, end_date, property_id, guest_id) \
             VALUES ('2018-09-11', '2018-09-26', $1, $2) RETURNING id",
            &[&property_id, &guest_id],
        )
        .await
        .unwrap();
    let reservation_id: i32 = row.get(0);
    tx.execute(
        "INSERT INTO property_reviews (guest_id, property_id, reservation_id, rating) \
         VALUES ($1, $2, $3, $4)",
        &[&guest_id, &property_id, &reservation_id, &rating],
    )
    .await
    .unwrap();
}

fn titles(properties: &[Property]) -> Vec<&str> {
    let mut titles: Vec<&str> = properties.iter().map(|p| p.title.as_str()).collect();
    titles.sort_unstable();
    titles
}

#[tokio::test]
async fn users_lookup_and_insert() {
    let Some(mut client) = try_connect().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let tx = client.transaction().await.unwrap();
    tx.batch_execute(SCHEMA).await.unwrap();

    let eva = add_user(&tx, &guest("Eva Stanley")).await.unwrap();
    assert_eq!(eva.email, "eva.stanley@example.com");

    let by_email = get_user_with_email(&tx, &eva.email).await.unwrap();
    assert_eq!(by_email.as_ref(), Some(&eva));
    let by_id = get_user_with_id(&tx, eva.id).await.unwrap();
    assert_eq!(by_id, Some(eva.clone()));

    // Absence is a value, not an error.
    assert_eq!(get_user_with_email(&tx, "nobody@example.com").await.unwrap(), None);
    assert_eq!(get_user_with_id(&tx, eva.id + 1000).await.unwrap(), None);

    // Reads are idempotent.
    assert_eq!(
        get_user_with_email(&tx, &eva.email).await.unwrap(),
        get_user_with_email(&tx, &eva.email).await.unwrap()
    );

    tx.rollback().await.unwrap();
}

#[tokio::test]
async fn duplicate_email_is_a_unique_violation() {
    let Some(mut client) = try_connect().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let tx = client.transaction().await.unwrap();
    tx.batch_execute(SCHEMA).await.unwrap();

    add_user(&tx, &guest("Eva Stanley")).await.unwrap();
    let err = add_user(&tx, &guest("Eva Stanley")).await.unwrap_err();
    assert!(err.is_unique_violation(), "{err:?}");

    tx.rollback().await.unwrap();
}

#[tokio::test]
async fn property_search_filters() {
    let Some(mut client) = try_connect().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let tx = client.transaction().await.unwrap();
    tx.batch_execute(SCHEMA).await.unwrap();

    let owner = add_user(&tx, &guest("Dominic Parks")).await.unwrap();
    let reviewer = add_user(&tx, &guest("Sue Luna")).await.unwrap();

    let bayview = add_property(&tx, &listing(owner.id, "Bayview", "Miami", 10_000))
        .await
        .unwrap();
    let palms = add_property(&tx, &listing(owner.id, "Palms", "Miami Beach", 30_000))
        .await
        .unwrap();
    let maple = add_property(&tx, &listing(reviewer.id, "Maple", "Toronto", 5_000))
        .await
        .unwrap();
    // No reviews: never appears in the review-joined search.
    add_property(&tx, &listing(owner.id, "Unreviewed", "Miami", 9_000))
        .await
        .unwrap();

    add_review(&tx, reviewer.id, bayview.id, 5).await;
    add_review(&tx, reviewer.id, bayview.id, 4).await;
    add_review(&tx, reviewer.id, palms.id, 2).await;
    add_review(&tx, owner.id, maple.id, 3).await;

    let all = get_all_properties(&tx, &SearchOptions::default(), DEFAULT_LIMIT)
        .await
        .unwrap();
    assert_eq!(titles(&all), vec!["Bayview", "Maple", "Palms"]);

    let miami = get_all_properties(&tx, &SearchOptions::new().city("Miami"), DEFAULT_LIMIT)
        .await
        .unwrap();
    assert_eq!(titles(&miami), vec!["Bayview", "Palms"]);

    let affordable = get_all_properties(
        &tx,
        &SearchOptions::new().city("Miami").max_price(200),
        DEFAULT_LIMIT,
    )
    .await
    .unwrap();
    assert_eq!(titles(&affordable), vec!["Bayview"]);
    assert_eq!(affordable[0].average_rating, Some(4.5));

    let pricey = get_all_properties(&tx, &SearchOptions::new().min_price(60), DEFAULT_LIMIT)
        .await
        .unwrap();
    assert_eq!(titles(&pricey), vec!["Bayview", "Palms"]);

    let well_rated = get_all_properties(&tx, &SearchOptions::new().min_rating(4.0), DEFAULT_LIMIT)
        .await
        .unwrap();
    assert_eq!(titles(&well_rated), vec!["Bayview"]);

    let limited = get_all_properties(&tx, &SearchOptions::default(), 2)
        .await
        .unwrap();
    assert_eq!(limited.len(), 2);

    let mine = get_all_properties(&tx, &SearchOptions::new().owner(owner.id), DEFAULT_LIMIT)
        .await
        .unwrap();
    assert_eq!(titles(&mine), vec!["Bayview", "Palms", "Unreviewed"]);
    assert!(mine.iter().all(|p| p.average_rating.is_none()));

    tx.rollback().await.unwrap();
}

#[tokio::test]
async fn add_property_returns_stored_row() {
    let Some(mut client) = try_connect().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let tx = client.transaction().await.unwrap();
    tx.batch_execute(SCHEMA).await.unwrap();

    let owner = add_user(&tx, &guest("Dominic Parks")).await.unwrap();
    let input = listing(owner.id, "Speed lamp", "Sotboske", 93_061);
    let stored = add_property(&tx, &input).await.unwrap();

    assert!(stored.id > 0);
    assert_eq!(stored.owner_id, owner.id);
    assert_eq!(stored.title, input.title);
    assert_eq!(stored.description.as_deref(), Some("description"));
    assert_eq!(stored.cost_per_night, 93_061);
    assert_eq!(stored.post_code, input.post_code);
    assert_eq!(stored.average_rating, None);

    // Unknown owner trips the foreign key.
    let err = add_property(&tx, &listing(owner.id + 1000, "Ghost", "Nowhere", 1))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::ForeignKeyViolation(_)), "{err:?}");

    tx.rollback().await.unwrap();
}

#[tokio::test]
async fn reservations_for_guest() {
    let Some(mut client) = try_connect().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let tx = client.transaction().await.unwrap();
    tx.batch_execute(SCHEMA).await.unwrap();

    let owner = add_user(&tx, &guest("Dominic Parks")).await.unwrap();
    let traveller = add_user(&tx, &guest("Sue Luna")).await.unwrap();
    let place = add_property(&tx, &listing(owner.id, "Bayview", "Miami", 10_000))
        .await
        .unwrap();
    for _ in 0..3 {
        add_review(&tx, traveller.id, place.id, 4).await;
    }

    let logged = LoggedClient::new(&tx)
        .with_config(MonitorConfig::new().with_query_timeout(Duration::from_secs(5)));

    let all = get_all_reservations(&logged, traveller.id, DEFAULT_LIMIT)
        .await
        .unwrap();
    assert_eq!(all.len(), 3);
    assert!(all.iter().all(|r| r.guest_id == traveller.id && r.property_id == place.id));
    assert!(all.iter().all(|r| r.start_date < r.end_date));

    let two = get_all_reservations(&logged, traveller.id, 2).await.unwrap();
    assert_eq!(two.len(), 2);

    let none = get_all_reservations(&logged, owner.id, DEFAULT_LIMIT)
        .await
        .unwrap();
    assert!(none.is_empty());

    drop(logged);
    tx.rollback().await.unwrap();
}
