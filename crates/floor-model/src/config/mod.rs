mod scheduler;
pub use scheduler::SchedulerConfig;

mod gateway;
pub use gateway::GatewayConfig;
