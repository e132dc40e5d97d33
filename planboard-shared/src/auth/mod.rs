/// Authentication utilities
///
/// - `jwt`: signed bearer token creation and validation
/// - `password`: Argon2id password hashing and verification
/// - `middleware`: request auth context shared with the API layer

pub mod jwt;
pub mod middleware;
pub mod password;
