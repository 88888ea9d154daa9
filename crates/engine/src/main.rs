//! Seeded demo run: markdown a batch, reserve, confirm, sweep, print totals.

use anyhow::Context;
use chrono::Duration;

use shelflife_catalog::{NewBatch, NewProduct};
use shelflife_core::{Clock, SystemClock};
use shelflife_engine::{Engine, ReservationRequest};
use shelflife_offers::Audience;
use shelflife_reservations::RandomCodeGenerator;
use shelflife_store::InMemoryStore;

fn main() -> anyhow::Result<()> {
    shelflife_observability::init();

    let clock = SystemClock;
    let now = clock.now();
    let engine = Engine::new(InMemoryStore::new(), clock, RandomCodeGenerator);

    let milk = engine.add_product(NewProduct {
        sku: "MILK-1L".to_string(),
        name: "Whole Milk".to_string(),
        category: "dairy".to_string(),
        size: "1L".to_string(),
        base_price: 4.99,
        weight_grams: 1030.0,
    })?;
    engine.add_batch(NewBatch {
        product_id: milk.id,
        qty_total: 20,
        expiry_ts: now + Duration::hours(5),
        store_id: "demo-store".to_string(),
    })?;

    let report = engine.apply_markdowns()?;
    tracing::info!(offers_created = report.offers_created, "seeded and marked down");

    let offer = engine
        .offers(Audience::Nonprofit)?
        .into_iter()
        .next()
        .context("no nonprofit offer visible")?;

    let reservation = engine.create_reservation(ReservationRequest {
        offer_id: offer.id,
        user_id: "food-bank-3".to_string(),
        qty: 3,
        pickup_start_ts: now,
        pickup_end_ts: now + Duration::hours(1),
    })?;
    tracing::info!(code = %reservation.confirmation_code, "reservation placed");

    engine.confirm_pickup(reservation.id, "staff-1")?;
    engine.sweep_no_shows()?;

    let summary = engine.impact_summary()?;
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
