// Market data module entrypoint
pub mod adapters;   // venue-specific fetchers (Coinbase, Gemini)
pub mod normaliser; // converts wire strings -> exact decimals
pub mod router;     // fans out to every venue and quotes the merged book
