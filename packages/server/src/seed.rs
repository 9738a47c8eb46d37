use sea_orm::sea_query::{Index, OnConflict, PostgresQueryBuilder};
use sea_orm::*;
use tracing::info;

use crate::entity::{comfort, media, room};

/// Default amenities seeded on startup.
const DEFAULT_COMFORTS: &[&str] = &[
    "Wi-Fi",
    "Air conditioning",
    "Breakfast included",
    "Parking",
    "Pool",
    "Gym",
    "Spa",
    "Pet friendly",
    "Room service",
    "Airport shuttle",
];

/// Seed the `comfort` table with the default amenity catalog.
pub async fn seed_comforts(db: &DatabaseConnection) -> Result<(), DbErr> {
    let mut inserted = 0u32;
    for &name in DEFAULT_COMFORTS {
        let model = comfort::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        };

        let result = comfort::Entity::insert(model)
            .on_conflict(
                OnConflict::column(comfort::Column::Name)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await;

        match result {
            Ok(_) => inserted += 1,
            Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e),
        }
    }

    if inserted > 0 {
        info!("Seeded {} new comforts", inserted);
    }

    Ok(())
}

/// Ensure required database indexes exist.
///
/// SeaORM's schema-sync doesn't support composite non-unique indexes,
/// so we create them manually on startup.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Composite index for the price existence filters and the cheapest-
    // room sort key: SELECT MIN(price) FROM room WHERE hotel_id = ?
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_room_hotel_price")
        .table(room::Entity)
        .col(room::Column::HotelId)
        .col(room::Column::Price)
        .to_string(PostgresQueryBuilder);

    match db.execute_unprepared(&stmt).await {
        Ok(_) => {
            info!("Ensured index idx_room_hotel_price exists");
        }
        Err(e) => {
            tracing::warn!("Failed to create index idx_room_hotel_price: {}", e);
        }
    }

    // Composite index for primary-photo lookups:
    // SELECT * FROM media WHERE hotel_id = ? AND is_primary
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_media_hotel_primary")
        .table(media::Entity)
        .col(media::Column::HotelId)
        .col(media::Column::IsPrimary)
        .to_string(PostgresQueryBuilder);

    match db.execute_unprepared(&stmt).await {
        Ok(_) => {
            info!("Ensured index idx_media_hotel_primary exists");
        }
        Err(e) => {
            tracing::warn!("Failed to create index idx_media_hotel_primary: {}", e);
        }
    }

    Ok(())
}
