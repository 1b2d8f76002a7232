mod audio;

pub use audio::{AudioFormat, SampleEncoding, SampleRate};
