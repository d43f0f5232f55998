pub mod chart;
pub mod event;
pub mod goal;
pub mod money;
pub mod settings;
pub mod snapshot;
pub mod transaction;
pub mod view;
