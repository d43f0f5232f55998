pub mod auth_gate;
pub mod chart_service;
pub mod format_service;
pub mod ledger_service;
pub mod notifier;
