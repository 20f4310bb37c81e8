//! Transport abstraction and implementations

mod elastic;
mod traits;

pub use elastic::{ElasticEmailTransport, API_KEY_HEADER};
pub use traits::*;
