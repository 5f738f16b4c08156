pub mod auth_service;
pub mod bulk_checkin;
pub mod check_in;
pub mod event_query;
pub mod registration;
pub mod status_clock;
