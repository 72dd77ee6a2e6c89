pub mod milestones;
pub mod posts;
pub mod reports;
pub mod state;
pub mod strategies;
pub mod tasks;
pub mod tenants;
