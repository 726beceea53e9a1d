pub mod refresh_token;

pub use refresh_token::connect;
pub use refresh_token::RedisRefreshTokenStore;
