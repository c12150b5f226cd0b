//! Scan orchestration: the session state machine and its async driver

pub mod scanner;
pub mod session;

pub use scanner::Scanner;
pub use session::{PendingFetch, ScanSession, ScrollPosition, SessionState};
