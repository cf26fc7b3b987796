//! The three built-in action handlers (spec.md §4.6).

mod completion;
mod to_image;
mod to_speech;

pub use completion::CompletionHandler;
pub use to_image::ToImageHandler;
pub use to_speech::ToSpeechHandler;
