pub mod abilities;
pub mod ai;
pub mod catch;
pub mod engine;
pub mod items;
pub mod rewards;
pub mod snapshot;
pub mod state;
pub mod status;
pub mod targeting;

#[cfg(test)]
pub(crate) mod tests;
