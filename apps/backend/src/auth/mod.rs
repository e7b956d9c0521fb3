pub mod claims;
pub mod jwt;
pub mod otp;
pub mod password;

pub use claims::{Claims, TokenPayload, UserRole};
pub use jwt::{IssuedToken, TokenError, TokenService};
pub use otp::Otp;
