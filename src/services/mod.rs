pub mod kot_service;
pub mod merge_service;
pub mod order_service;
pub mod report_service;
pub mod sequence;
pub mod settlement_service;
pub mod stock_ledger;
