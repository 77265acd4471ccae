//! Marketplace server with a seeded catalog
//!
//! Run with `cargo run --example marketplace [config.yaml]`, then try:
//!
//! ```text
//! curl localhost:8000/venues
//! curl 'localhost:8000/venues?city=Lahore&capacity=250-500'
//! curl 'localhost:8000/venues?search=garden&services=Catering'
//! ```
//!
//! Verification links are printed to the log instead of being mailed.

use chrono::Utc;
use shadiejo::core::auth::hash_password;
use shadiejo::prelude::*;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

struct Seed {
    name: &'static str,
    description: &'static str,
    venue_type: &'static str,
    city: &'static str,
    address: &'static str,
    capacity: i64,
    price_per_day: f64,
    amenities: &'static str,
}

const SEEDS: &[Seed] = &[
    Seed {
        name: "Royal Palm Marquee",
        description: "Air-conditioned marquee beside the golf course",
        venue_type: "Marquee",
        city: "Lahore",
        address: "52 Canal Bank Road",
        capacity: 450,
        price_per_day: 350_000.0,
        amenities: "Catering, Parking, Decoration",
    },
    Seed {
        name: "Sea Breeze Banquet",
        description: "Banquet hall with a rooftop terrace",
        venue_type: "Banquet Hall",
        city: "Karachi",
        address: "Block 5, Clifton",
        capacity: 800,
        price_per_day: 500_000.0,
        amenities: "Catering, Valet",
    },
    Seed {
        name: "Margalla Lawns",
        description: "Garden Estate at the foot of the hills",
        venue_type: "Lawn",
        city: "Islamabad",
        address: "F-7 Markaz",
        capacity: 1200,
        price_per_day: 650_000.0,
        amenities: "Parking, Generator",
    },
    Seed {
        name: "Shalimar Courtyard",
        description: "Intimate courtyard for nikkah ceremonies",
        venue_type: "Farmhouse",
        city: "Lahore",
        address: "GT Road",
        capacity: 150,
        price_per_day: 90_000.0,
        amenities: "Catering",
    },
];

async fn seed(store: &dyn MarketplaceStore) -> Result<()> {
    let now = Utc::now();
    let vendor = store
        .insert_vendor(Vendor {
            id: 0,
            name: "Demo Events".into(),
            email: "vendor@shadiejo.test".into(),
            phone: "03001234567".into(),
            cnic_number: "35202-1234567-1".into(),
            cnic_front_image: None,
            cnic_back_image: None,
            password_hash: hash_password("vendor-demo")?,
            is_active: true,
            is_verified: true,
            created_at: now,
            updated_at: now,
        })
        .await?;

    for seed in SEEDS {
        let draft = VenueDraft {
            name: seed.name.into(),
            description: seed.description.into(),
            venue_type: seed.venue_type.into(),
            city: seed.city.into(),
            address: seed.address.into(),
            capacity: seed.capacity,
            price_per_day: seed.price_per_day,
            amenities: Amenities::parse(seed.amenities),
        };
        store
            .insert_venue(Venue::from_draft(0, vendor.id, draft, VenueImages::default()))
            .await?;
    }

    tracing::info!(
        venues = SEEDS.len(),
        "seeded demo vendor vendor@shadiejo.test / vendor-demo"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("shadiejo=debug,tower_http=info")),
        )
        .init();

    let mut builder = ServerBuilder::new();
    if let Some(path) = std::env::args().nth(1) {
        builder = builder.with_config(MarketplaceConfig::from_yaml_file(&path)?);
    }

    let store: Arc<dyn MarketplaceStore> = Arc::new(InMemoryMarketplaceStore::new());
    seed(store.as_ref()).await?;

    let bind = builder.config().server.bind;
    builder
        .with_shared_store(store)
        .with_mailer(LogMailer)
        .serve(&bind)
        .await
}
