pub mod csv_handler;

pub use csv_handler::render_report;
