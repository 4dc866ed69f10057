pub mod session;
pub mod supervisor;

pub use supervisor::run;
