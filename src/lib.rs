pub mod app_state;
pub mod classifier;
pub mod error;
pub mod ingest;
pub mod io_struct;
pub mod nasa;
pub mod preprocess;
pub mod server;
