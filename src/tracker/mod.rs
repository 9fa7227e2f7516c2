pub mod ledger;
pub mod services;
pub mod weekly;
