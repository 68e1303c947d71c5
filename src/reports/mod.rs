// Reports module - SELIC comparison, average-cost calculator and profit report

pub mod average_cost;
pub mod benchmark;
pub mod profit;

pub use average_cost::{solve_target_average, SolverError, TargetPurchase};
pub use benchmark::{compare_with_selic, BenchmarkReport, LotBenchmark, Winner};
pub use profit::{calculate_profit, ProfitReport};
