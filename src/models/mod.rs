mod import;
mod product;
mod user;

pub use import::*;
pub use product::*;
pub use user::*;
