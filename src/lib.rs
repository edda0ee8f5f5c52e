// Library surface for headless/integration tests and reuse.
// The core stays presentation-free; the TUI binary in main.rs drives it
// through the session operations and the observer contract in surface.rs.
pub mod compare;
pub mod config;
pub mod corpus;
pub mod session;
pub mod surface;
pub mod timer;
