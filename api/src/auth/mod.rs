//! Request authentication and coarse access gates

pub mod api_key;
pub mod gate;

pub use api_key::actor_middleware;
pub use gate::enforce_gate;
