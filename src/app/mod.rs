pub mod gateway;

pub use gateway::{build_orchestrator, build_router, HttpLookupOrchestrator};
