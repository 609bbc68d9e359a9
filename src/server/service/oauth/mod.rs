//! Provider authentication adapters.
//!
//! Each adapter runs the provider side of a login (redirect URL, callback verification
//! and profile fetch) and hands back a provider profile for the identity linker. Neither
//! adapter touches the database.

pub mod discord;
pub mod steam;

pub use discord::DiscordAuthService;
pub use steam::SteamAuthService;
