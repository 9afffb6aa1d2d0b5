mod linking;
mod login;
mod logout;
mod oauth;
mod refresh;
mod register;
mod session;

pub use login::LoginUseCase;
pub use logout::LogoutUseCase;
pub use oauth::OAuthUseCase;
pub use refresh::RefreshUseCase;
pub use register::RegisterUseCase;
