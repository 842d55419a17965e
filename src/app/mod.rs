// Application layer: operator-facing surfaces built on the core client.

pub mod menu;
pub mod output;
