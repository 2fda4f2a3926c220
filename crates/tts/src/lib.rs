pub mod fpt;
pub mod voice;

pub use fpt::{FptTts, SynthesisJob};
pub use voice::Voice;
