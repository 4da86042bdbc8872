//! Build-script host fixtures. Every module declares marked DTOs and pulls
//! the generated models back in with `include_models!`.

pub mod audit;
pub mod billing;
pub mod custom;
pub mod data;
pub mod dto;
pub mod ignored;
