//! Domain vocabulary shared by every layer of the brush service.
//!
//! Nothing in here touches storage or HTTP; the types are plain data plus
//! the rules (cursor bounds, cascade policy) the other crates agree on.

pub mod cascade;
pub mod error;
pub mod pagination;
pub mod types;
