// Application Layer - Use Cases and Business Logic

pub mod constants;
pub mod dispatch;
pub mod waitlist;

// Re-exports
pub use dispatch::{
    dispatch_channel, shutdown_channel, DispatchSnapshot, DispatchWorker,
    NotificationDispatcher, ShutdownSender, ShutdownToken,
};
pub use waitlist::{JoinRequest, LeaveOutcome, WaitlistService};
