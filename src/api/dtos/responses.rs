use serde::Serialize;

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize)]
pub struct BulkCheckInResponse {
    pub message: String,
    pub checked_in_count: usize,
    pub unmatched_rows: usize,
    pub malformed_rows: usize,
}
