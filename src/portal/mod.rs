mod reporter;
mod session;
#[cfg(test)]
mod testing;
mod types;

pub(crate) use reporter::Reporter;
pub(crate) use session::{HttpSession, SessionOptions};
