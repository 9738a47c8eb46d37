pub mod booking_favorite;
pub mod booking_history;
pub mod comfort;
pub mod hotel;
pub mod hotel_comfort;
pub mod media;
pub mod review;
pub mod room;
pub mod user;
