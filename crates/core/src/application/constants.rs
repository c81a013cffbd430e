// Application constants (no magic values)

/// Number of queue positions notified after a departure (rank 1 and rank 2)
pub const HEAD_NOTIFY_DEPTH: u32 = 2;

/// Default capacity of the outbound notice queue
pub const DEFAULT_DISPATCH_CAPACITY: usize = 256;
