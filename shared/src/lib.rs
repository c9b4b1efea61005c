//! Types shared between the EasyLoc backend and its clients: domain enums,
//! request/response DTOs, the response envelope, and domain constants.

pub mod constants;
pub mod dto;
pub mod types;

pub use constants::*;
pub use dto::*;
pub use types::*;
