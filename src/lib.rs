// Library surface for the binary, headless tests and reuse.
// The terminal loop itself lives in main.rs.
pub mod app_dirs;
pub mod config;
pub mod controls;
pub mod engine;
pub mod progress;
pub mod question;
pub mod rewards;
pub mod runtime;
pub mod sampler;
pub mod scoring;
pub mod session;
pub mod sound;
pub mod stats;
pub mod timer;
pub mod ui;

pub use engine::{QuizEngine, Snapshot};
pub use question::QuestionBank;
