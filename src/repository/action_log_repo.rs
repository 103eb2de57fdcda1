// ==========================================
// Exam Ops - Action Log Repository
// ==========================================
// Red line: every upload, resolution, correlation and
// attendance write is recorded here
// ==========================================

mod core;
mod queries;

#[cfg(test)]
mod tests;

pub use self::core::ActionLogRepository;
