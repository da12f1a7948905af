pub mod ask_response;
pub mod ingest;
pub mod question;
pub mod status_response;
