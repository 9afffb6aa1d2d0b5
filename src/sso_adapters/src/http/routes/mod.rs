pub mod error;
pub mod google;
pub mod login;
pub mod logout;
pub mod refresh;
pub mod register;

pub use error::{AuthApiError, ErrorResponse};
pub use google::{GoogleCallbackQuery, google_callback, google_login};
pub use login::{LoginRequest, login};
pub use logout::{LogoutRequest, LogoutResponse, logout};
pub use refresh::{RefreshRequest, RefreshResponse, refresh};
pub use register::{RegisterRequest, RegisterResponse, register};
