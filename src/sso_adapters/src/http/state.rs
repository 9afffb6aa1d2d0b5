use crate::oauth::GoogleOAuthClient;

/// Shared state handed to every route.
#[derive(Clone)]
pub struct AppState<A> {
    pub auth: A,
    pub google: GoogleOAuthClient,
}

impl<A> AppState<A> {
    pub fn new(auth: A, google: GoogleOAuthClient) -> Self {
        Self { auth, google }
    }
}
