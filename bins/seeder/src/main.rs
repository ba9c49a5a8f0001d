//! Database seeder for Kendra development and testing.
//!
//! Seeds a small organizational hierarchy (one zone down to two KVKs)
//! plus sample section data for local development.
//!
//! Usage: cargo run --bin seeder

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use std::str::FromStr;
use uuid::Uuid;

use kendra_db::entities::{
    bank_accounts, buildings, districts, employees, kvks, organizations, states, trainings,
    vehicles, zones,
};

/// Seed zone ID (consistent for all seeds)
const ZONE_ID: &str = "00000000-0000-0000-0000-0000000000a1";
/// Seed state ID
const STATE_ID: &str = "00000000-0000-0000-0000-0000000000b1";
/// Seed district ID
const DISTRICT_ID: &str = "00000000-0000-0000-0000-0000000000c1";
/// Seed host-organization ID
const ORG_ID: &str = "00000000-0000-0000-0000-0000000000d1";
/// Seed KVK IDs
const KVK_LUDHIANA_ID: &str = "00000000-0000-0000-0000-0000000000e1";
const KVK_SAMRALA_ID: &str = "00000000-0000-0000-0000-0000000000e2";

fn id(text: &str) -> Uuid {
    Uuid::from_str(text).expect("valid seed uuid")
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = kendra_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding hierarchy...");
    seed_hierarchy(&db).await;

    println!("Seeding employees...");
    seed_employees(&db).await;

    println!("Seeding bank accounts...");
    seed_bank_accounts(&db).await;

    println!("Seeding infrastructure and vehicles...");
    seed_assets(&db).await;

    println!("Seeding trainings...");
    seed_trainings(&db).await;

    println!("Done.");
}

async fn seed_hierarchy(db: &DatabaseConnection) {
    let now = chrono::Utc::now().into();

    zones::ActiveModel {
        id: Set(id(ZONE_ID)),
        name: Set("Zone I (North)".to_string()),
        code: Set("Z1".to_string()),
        created_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to seed zone");

    states::ActiveModel {
        id: Set(id(STATE_ID)),
        zone_id: Set(id(ZONE_ID)),
        name: Set("Punjab".to_string()),
        created_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to seed state");

    districts::ActiveModel {
        id: Set(id(DISTRICT_ID)),
        state_id: Set(id(STATE_ID)),
        name: Set("Ludhiana".to_string()),
        created_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to seed district");

    organizations::ActiveModel {
        id: Set(id(ORG_ID)),
        district_id: Set(id(DISTRICT_ID)),
        name: Set("Punjab Agricultural University".to_string()),
        org_type: Set(Some("State Agricultural University".to_string())),
        created_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to seed organization");

    for (kvk_id, name, year) in [
        (KVK_LUDHIANA_ID, "KVK Ludhiana", 1982),
        (KVK_SAMRALA_ID, "KVK Samrala", 1994),
    ] {
        kvks::ActiveModel {
            id: Set(id(kvk_id)),
            org_id: Set(id(ORG_ID)),
            name: Set(name.to_string()),
            establishment_year: Set(Some(year)),
            address: Set(Some("PAU Campus, Ludhiana, Punjab".to_string())),
            email: Set(Some(format!(
                "{}@example.org",
                name.to_lowercase().replace(' ', ".")
            ))),
            phone: Set(Some("+91-161-0000000".to_string())),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
        .expect("Failed to seed KVK");
    }
}

async fn seed_employees(db: &DatabaseConnection) {
    let now = chrono::Utc::now().into();
    let rows = [
        ("A. Sharma", "Senior Scientist & Head", "Agronomy", 2012, 6, 1),
        ("B. Singh", "Subject Matter Specialist", "Horticulture", 2018, 3, 15),
        ("C. Kaur", "Subject Matter Specialist", "Soil Science", 2020, 7, 1),
    ];

    for (name, designation, discipline, year, month, day) in rows {
        employees::ActiveModel {
            id: Set(Uuid::new_v4()),
            kvk_id: Set(id(KVK_LUDHIANA_ID)),
            name: Set(name.to_string()),
            designation: Set(designation.to_string()),
            discipline: Set(Some(discipline.to_string())),
            pay_level: Set(Some("Level 11".to_string())),
            date_of_joining: Set(NaiveDate::from_ymd_opt(year, month, day)),
            date_of_birth: Set(NaiveDate::from_ymd_opt(year - 30, 1, 10)),
            is_permanent: Set(true),
            created_at: Set(now),
        }
        .insert(db)
        .await
        .expect("Failed to seed employee");
    }
}

async fn seed_bank_accounts(db: &DatabaseConnection) {
    let now = chrono::Utc::now().into();

    bank_accounts::ActiveModel {
        id: Set(Uuid::new_v4()),
        kvk_id: Set(id(KVK_LUDHIANA_ID)),
        bank_name: Set("State Bank of India".to_string()),
        branch: Set(Some("PAU Campus".to_string())),
        account_number: Set("000111222333".to_string()),
        ifsc: Set(Some("SBIN0000123".to_string())),
        account_type: Set(Some("Savings".to_string())),
        balance: Set(Some(Decimal::new(123_456_750, 2))),
        created_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to seed bank account");
}

async fn seed_assets(db: &DatabaseConnection) {
    let now = chrono::Utc::now().into();

    buildings::ActiveModel {
        id: Set(Uuid::new_v4()),
        kvk_id: Set(id(KVK_LUDHIANA_ID)),
        name: Set("Administrative Block".to_string()),
        building_type: Set("Office".to_string()),
        completion_year: Set(Some(1985)),
        plinth_area_sqm: Set(Some(Decimal::new(45_000, 2))),
        status: Set(Some("In Use".to_string())),
        created_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to seed building");

    for (registration, year, operational) in [
        ("PB-10-AB-0001", 2015, true),
        ("PB-10-CD-0002", 2015, true),
        ("PB-10-EF-0003", 2021, false),
    ] {
        vehicles::ActiveModel {
            id: Set(Uuid::new_v4()),
            kvk_id: Set(id(KVK_LUDHIANA_ID)),
            vehicle_type: Set("Tractor".to_string()),
            registration_number: Set(registration.to_string()),
            purchase_year: Set(Some(year)),
            cost: Set(Some(Decimal::new(85_000_000, 2))),
            is_operational: Set(operational),
            created_at: Set(now),
        }
        .insert(db)
        .await
        .expect("Failed to seed vehicle");
    }
}

async fn seed_trainings(db: &DatabaseConnection) {
    let now = chrono::Utc::now().into();

    trainings::ActiveModel {
        id: Set(Uuid::new_v4()),
        kvk_id: Set(id(KVK_SAMRALA_ID)),
        title: Set("Integrated Pest Management for Paddy".to_string()),
        thematic_area: Set(Some("Plant Protection".to_string())),
        start_date: Set(NaiveDate::from_ymd_opt(2025, 7, 14)),
        end_date: Set(NaiveDate::from_ymd_opt(2025, 7, 18)),
        participants: Set(Some(42)),
        created_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to seed training");
}
