//! An I/O free simulator of the Distance Vector routing protocol.
//!
//! Routers exchange split-horizon filtered copies of their routing tables in synchronized
//! rounds until no table changes anymore, optionally absorbing one scripted link failure.
pub mod concepts;
pub mod feedback;
pub mod framework;
pub mod router;
pub mod simulation;
