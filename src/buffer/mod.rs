// 容量制限付きブロッキングバッファのモジュール

pub mod bounded;
pub mod error;

// 公開API
pub use bounded::BoundedBuffer;
pub use error::{PutError, TakeError};
