pub mod gate;
pub mod secret;

pub use gate::MasterGate;
pub use secret::MasterFile;
