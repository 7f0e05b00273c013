// Market data access: the remote provider, CSV files and the in-memory store.
pub mod coingecko;
pub mod csv_parser;
pub mod market_data;
pub mod offline;
