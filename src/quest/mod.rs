//! Quest module: the date itinerary state machine, its section catalog,
//! screen sequencing, and durable snapshot storage. State lives in WASM
//! memory (thread_local) and is written through to localStorage on every
//! mutation.

pub mod sections;
pub mod state;
pub mod screens;
pub mod steps;
pub mod storage;
