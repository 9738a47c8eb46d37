pub mod auth;
pub mod booking;
pub mod hotel;
pub mod media;
pub mod room;
pub mod shared;
